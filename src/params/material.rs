//! Soil and bedrock material properties

use log::debug;

use super::base::{ensure_non_negative, ensure_positive, number, ParamSet, ParamSpec};
use super::value::{ParamMap, ParamValue};
use crate::error::{ParamError, ParamResult};

/// Soil column and bedrock properties with derived elastic moduli.
///
/// Units follow the engine convention of kN, m, s and t (1 t/m³ = 1000 kg/m³),
/// so moduli come out in kPa. `G`, `E` and `K` are recomputed after every
/// validated mutation and cannot be set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    /// Shear-wave velocity of the soil in m/s
    vs: f64,
    /// Mass density of the soil in t/m³
    rho: f64,
    /// Poisson's ratio
    nu: f64,
    /// Cohesion in kPa
    cohesion: f64,
    /// Peak shear strain of the pressure-independent multi-yield model
    peak_strain: f64,
    /// Reference confining pressure in kPa
    ref_press: f64,
    /// Shear-wave velocity of the bedrock in m/s
    rock_vs: f64,
    /// Mass density of the bedrock in t/m³
    rock_den: f64,
    /// Thickness of the soil column in m
    soil_depth: f64,

    g: f64,
    e: f64,
    k: f64,
}

impl MaterialParams {
    /// Build from a possibly partial mapping; omitted fields take their defaults
    pub fn new(data: &ParamMap) -> ParamResult<Self> {
        let mut material = Self::default();
        material.set_from_dict(data)?;
        Ok(material)
    }

    pub fn vs(&self) -> f64 {
        self.vs
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    pub fn cohesion(&self) -> f64 {
        self.cohesion
    }

    pub fn peak_strain(&self) -> f64 {
        self.peak_strain
    }

    pub fn ref_press(&self) -> f64 {
        self.ref_press
    }

    pub fn rock_vs(&self) -> f64 {
        self.rock_vs
    }

    pub fn rock_den(&self) -> f64 {
        self.rock_den
    }

    pub fn soil_depth(&self) -> f64 {
        self.soil_depth
    }

    /// Shear modulus G = rho * Vs²
    pub fn shear_modulus(&self) -> f64 {
        self.g
    }

    /// Young's modulus E = 2G(1 + nu)
    pub fn youngs_modulus(&self) -> f64 {
        self.e
    }

    /// Bulk modulus K = E / (3(1 - 2nu))
    pub fn bulk_modulus(&self) -> f64 {
        self.k
    }

    /// Fundamental period of the soil column over rigid rock, T = 4H / Vs
    pub fn site_period(&self) -> f64 {
        4.0 * self.soil_depth / self.vs
    }

    /// Soil-to-rock impedance ratio (rho * Vs) / (rho_rock * Vs_rock)
    pub fn impedance_ratio(&self) -> f64 {
        (self.rho * self.vs) / (self.rock_den * self.rock_vs)
    }
}

impl Default for MaterialParams {
    fn default() -> Self {
        let mut material = Self {
            vs: 100.0,
            rho: 1.7,
            nu: 0.3,
            cohesion: 95.0,
            peak_strain: 0.05,
            ref_press: 100.0,
            rock_vs: 760.0,
            rock_den: 2.4,
            soil_depth: 30.0,
            g: 0.0,
            e: 0.0,
            k: 0.0,
        };
        material.recompute();
        material
    }
}

impl MaterialParams {
    fn recompute(&mut self) {
        self.g = self.rho * self.vs.powi(2);
        self.e = 2.0 * self.g * (1.0 + self.nu);
        self.k = self.e / (3.0 * (1.0 - 2.0 * self.nu));
    }
}

impl ParamSet for MaterialParams {
    const KIND: &'static str = "MaterialParams";
    const DECLARED: &'static [ParamSpec] = &[
        ParamSpec::optional("Vs", "m/s"),
        ParamSpec::optional("rho", "t/m3"),
        ParamSpec::optional("nu", ""),
        ParamSpec::optional("cohesion", "kPa"),
        ParamSpec::optional("peakStrain", ""),
        ParamSpec::optional("ref_press", "kPa"),
        ParamSpec::optional("rock_Vs", "m/s"),
        ParamSpec::optional("rockDen", "t/m3"),
        ParamSpec::optional("soilDepth", "m"),
    ];
    const DERIVED: &'static [&'static str] = &["G", "E", "K"];

    fn value(&self, name: &str) -> Option<ParamValue> {
        let x = match name {
            "Vs" => self.vs,
            "rho" => self.rho,
            "nu" => self.nu,
            "cohesion" => self.cohesion,
            "peakStrain" => self.peak_strain,
            "ref_press" => self.ref_press,
            "rock_Vs" => self.rock_vs,
            "rockDen" => self.rock_den,
            "soilDepth" => self.soil_depth,
            "G" => self.g,
            "E" => self.e,
            "K" => self.k,
            _ => return None,
        };
        Some(ParamValue::Float(x))
    }

    fn assign(&mut self, name: &str, value: &ParamValue) -> ParamResult<()> {
        let x = number(Self::KIND, name, value)?;
        let slot = match name {
            "Vs" => &mut self.vs,
            "rho" => &mut self.rho,
            "nu" => &mut self.nu,
            "cohesion" => &mut self.cohesion,
            "peakStrain" => &mut self.peak_strain,
            "ref_press" => &mut self.ref_press,
            "rock_Vs" => &mut self.rock_vs,
            "rockDen" => &mut self.rock_den,
            "soilDepth" => &mut self.soil_depth,
            _ => {
                return Err(ParamError::UnknownParameter {
                    kind: Self::KIND,
                    name: name.to_string(),
                })
            }
        };
        *slot = x;
        Ok(())
    }

    fn derive(&mut self) -> ParamResult<()> {
        let kind = Self::KIND;
        ensure_positive(kind, "Vs", self.vs)?;
        ensure_positive(kind, "rho", self.rho)?;
        if !(0.0..0.5).contains(&self.nu) {
            // K = E / (3(1 - 2nu)) is singular at 0.5
            return Err(ParamError::invalid(
                kind,
                "nu",
                format!("must lie in [0, 0.5), got {}", self.nu),
            ));
        }
        ensure_non_negative(kind, "cohesion", self.cohesion)?;
        ensure_positive(kind, "peakStrain", self.peak_strain)?;
        ensure_positive(kind, "ref_press", self.ref_press)?;
        ensure_positive(kind, "rock_Vs", self.rock_vs)?;
        ensure_positive(kind, "rockDen", self.rock_den)?;
        ensure_positive(kind, "soilDepth", self.soil_depth)?;

        self.recompute();
        debug!(
            "{kind}: G = {:.3}, E = {:.3}, K = {:.3}",
            self.g, self.e, self.k
        );
        Ok(())
    }

    fn with_defaults(&self) -> Self {
        Self::default()
    }
}
