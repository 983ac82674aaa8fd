//! Mesh sizing from the shortest resolved wavelength

use log::{debug, warn};

use super::base::{count, ensure_positive, number, ParamSet, ParamSpec};
use super::material::MaterialParams;
use super::value::{ParamMap, ParamValue};
use crate::error::{ParamError, ParamResult};

/// Highest frequency resolved by default, in Hz
pub const DEFAULT_F_MAX: f64 = 25.0;

/// Elements per shortest wavelength used by default.
/// The usual rule of thumb for wave propagation is 8 to 10.
pub const DEFAULT_ELEMENTS_PER_WAVELENGTH: usize = 8;

/// Vertical discretization of the soil column.
///
/// The material's `Vs` and `soilDepth` are captured when the mesh is built.
/// Later changes to the material are not seen until [`MeshParams::resync`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeshParams {
    vs: f64,
    soil_depth: f64,

    /// Highest frequency of interest in Hz
    f_max: f64,
    /// Oversampling factor n
    n_per_wavelength: usize,

    ele_size: f64,
    num_elements: usize,
    num_nodes: usize,
    ele_height: f64,
}

impl MeshParams {
    /// Size a mesh for `material` resolving waves up to `f_max`
    pub fn new(material: &MaterialParams, f_max: f64) -> ParamResult<Self> {
        let mut mesh = Self::blank(material);
        mesh.f_max = f_max;
        mesh.derive()?;
        Ok(mesh)
    }

    /// Size a mesh with [`DEFAULT_F_MAX`]
    pub fn from_material(material: &MaterialParams) -> ParamResult<Self> {
        Self::new(material, DEFAULT_F_MAX)
    }

    /// Size a mesh for `material` from a possibly partial mapping
    pub fn from_dict(material: &MaterialParams, data: &ParamMap) -> ParamResult<Self> {
        let mut mesh = Self::blank(material);
        mesh.set_from_dict(data)?;
        Ok(mesh)
    }

    fn blank(material: &MaterialParams) -> Self {
        Self {
            vs: material.vs(),
            soil_depth: material.soil_depth(),
            f_max: DEFAULT_F_MAX,
            n_per_wavelength: DEFAULT_ELEMENTS_PER_WAVELENGTH,
            ele_size: 0.0,
            num_elements: 0,
            num_nodes: 0,
            ele_height: 0.0,
        }
    }

    /// Re-capture `Vs` and `soilDepth` from `material` and re-derive the mesh
    pub fn resync(&mut self, material: &MaterialParams) -> ParamResult<()> {
        let mut staged = self.clone();
        staged.vs = material.vs();
        staged.soil_depth = material.soil_depth();
        staged.derive()?;
        *self = staged;
        Ok(())
    }

    pub fn f_max(&self) -> f64 {
        self.f_max
    }

    pub fn elements_per_wavelength(&self) -> usize {
        self.n_per_wavelength
    }

    /// Target element size Vs / (f_max * n)
    pub fn ele_size(&self) -> f64 {
        self.ele_size
    }

    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Actual element height soilDepth / numElements, never above `ele_size`
    pub fn ele_height(&self) -> f64 {
        self.ele_height
    }

    /// Captured shear-wave velocity
    pub fn vs(&self) -> f64 {
        self.vs
    }

    /// Captured soil depth
    pub fn soil_depth(&self) -> f64 {
        self.soil_depth
    }

    /// Highest frequency the actual element height resolves at n elements per wavelength
    pub fn max_resolved_frequency(&self) -> f64 {
        self.vs / (self.n_per_wavelength as f64 * self.ele_height)
    }
}

/// Largest element count a mesh may have
const MAX_ELEMENTS: f64 = u32::MAX as f64;

/// Number of elements covering `depth` with elements no larger than `size`.
/// Ratios within rounding noise of a whole number are not bumped up.
/// `None` when the count is not finite or exceeds [`MAX_ELEMENTS`].
fn element_count(depth: f64, size: f64) -> Option<usize> {
    let ratio = depth / size;
    if !ratio.is_finite() {
        return None;
    }
    let nearest = ratio.round();
    let n = if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest
    } else {
        ratio.ceil()
    };
    (n <= MAX_ELEMENTS).then(|| (n as usize).max(1))
}

impl ParamSet for MeshParams {
    const KIND: &'static str = "MeshParams";
    const DECLARED: &'static [ParamSpec] = &[
        ParamSpec::optional("f_max", "Hz"),
        ParamSpec::optional("nPerWavelength", ""),
    ];
    const DERIVED: &'static [&'static str] = &[
        "Vs",
        "soilDepth",
        "eleSize",
        "numElements",
        "numNodes",
        "eleHeight",
    ];

    fn value(&self, name: &str) -> Option<ParamValue> {
        let value: ParamValue = match name {
            "f_max" => self.f_max.into(),
            "nPerWavelength" => self.n_per_wavelength.into(),
            "Vs" => self.vs.into(),
            "soilDepth" => self.soil_depth.into(),
            "eleSize" => self.ele_size.into(),
            "numElements" => self.num_elements.into(),
            "numNodes" => self.num_nodes.into(),
            "eleHeight" => self.ele_height.into(),
            _ => return None,
        };
        Some(value)
    }

    fn assign(&mut self, name: &str, value: &ParamValue) -> ParamResult<()> {
        match name {
            "f_max" => self.f_max = number(Self::KIND, name, value)?,
            "nPerWavelength" => {
                let n = count(Self::KIND, name, value)?;
                if n < 1 {
                    return Err(ParamError::invalid(
                        Self::KIND,
                        name,
                        format!("must be >= 1, got {n}"),
                    ));
                }
                self.n_per_wavelength = n as usize;
            }
            _ => {
                return Err(ParamError::UnknownParameter {
                    kind: Self::KIND,
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn derive(&mut self) -> ParamResult<()> {
        let kind = Self::KIND;
        ensure_positive(kind, "f_max", self.f_max)?;

        let ele_size = self.vs / (self.f_max * self.n_per_wavelength as f64);
        if !(ele_size.is_finite() && ele_size > 0.0) {
            return Err(ParamError::invalid(
                kind,
                "eleSize",
                format!("must be a positive finite length, got {ele_size}"),
            ));
        }
        ensure_positive(kind, "soilDepth", self.soil_depth)?;

        let too_fine = || {
            ParamError::invalid(
                kind,
                "eleSize",
                format!(
                    "{ele_size} m splits {} m into more than {MAX_ELEMENTS} elements",
                    self.soil_depth
                ),
            )
        };
        let num_elements = element_count(self.soil_depth, ele_size).ok_or_else(too_fine)?;
        let num_nodes = num_elements.checked_add(1).ok_or_else(too_fine)?;

        self.ele_size = ele_size;
        self.num_elements = num_elements;
        self.num_nodes = num_nodes;
        self.ele_height = self.soil_depth / self.num_elements as f64;

        if self.num_elements < 2 {
            warn!(
                "{kind}: soil column of {} m gets a single element at f_max = {} Hz",
                self.soil_depth, self.f_max
            );
        }
        debug!(
            "{kind}: eleSize = {:.4} m, {} elements, {} nodes",
            self.ele_size, self.num_elements, self.num_nodes
        );
        Ok(())
    }

    fn with_defaults(&self) -> Self {
        Self {
            f_max: DEFAULT_F_MAX,
            n_per_wavelength: DEFAULT_ELEMENTS_PER_WAVELENGTH,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::param_map;
    use approx::assert_relative_eq;

    fn material(vs: f64, depth: f64) -> MaterialParams {
        MaterialParams::new(&param_map([("Vs", vs), ("soilDepth", depth)])).unwrap()
    }

    #[test]
    fn test_reference_column() {
        let mesh = MeshParams::new(&material(250.0, 30.0), 25.0).unwrap();
        assert_relative_eq!(mesh.ele_size(), 1.25);
        assert_eq!(mesh.num_elements(), 24);
        assert_eq!(mesh.num_nodes(), 25);
        assert_relative_eq!(mesh.ele_height(), 1.25);
    }

    #[test]
    fn test_partial_element_rounds_up() {
        let mesh = MeshParams::new(&material(250.0, 30.5), 25.0).unwrap();
        assert_eq!(mesh.num_elements(), 25);
        assert!(mesh.ele_height() <= mesh.ele_size());
        assert_relative_eq!(mesh.ele_height() * 25.0, 30.5, max_relative = 1e-12);
    }

    #[test]
    fn test_rounding_noise_not_bumped() {
        // 0.3 / 0.1 is 2.9999999999999996 in binary floating point
        assert_eq!(element_count(0.3, 0.1), Some(3));
        assert_eq!(element_count(0.5, 1.0), Some(1));
    }

    #[test]
    fn test_defaults() {
        let mesh = MeshParams::from_material(&material(200.0, 20.0)).unwrap();
        assert_eq!(mesh.f_max(), DEFAULT_F_MAX);
        assert_eq!(mesh.elements_per_wavelength(), DEFAULT_ELEMENTS_PER_WAVELENGTH);
        assert_relative_eq!(mesh.ele_size(), 1.0);
        assert_eq!(mesh.num_elements(), 20);
    }

    #[test]
    fn test_oversampling_configurable() {
        let m = material(250.0, 30.0);
        let mesh = MeshParams::from_dict(&m, &param_map([("f_max", 25.0), ("nPerWavelength", 10.0)])).unwrap();
        assert_relative_eq!(mesh.ele_size(), 1.0);
        assert_eq!(mesh.num_elements(), 30);
        assert!(MeshParams::from_dict(&m, &param_map([("nPerWavelength", 0.0)])).is_err());
        assert!(MeshParams::from_dict(&m, &param_map([("nPerWavelength", 8.5)])).is_err());
    }

    #[test]
    fn test_non_positive_frequency_rejected() {
        let m = material(250.0, 30.0);
        assert!(matches!(
            MeshParams::new(&m, 0.0),
            Err(ParamError::InvalidParameter { .. })
        ));
        assert!(MeshParams::new(&m, -5.0).is_err());
    }

    #[test]
    fn test_excessive_element_count_rejected() {
        let m = material(250.0, 30.0);
        let err = MeshParams::new(&m, 1e300).unwrap_err();
        assert!(matches!(err, ParamError::InvalidParameter { ref name, .. } if name == "eleSize"));
        assert!(MeshParams::new(&m, 1e10).is_err());
        assert_eq!(element_count(30.0, 0.0), None);
        assert_eq!(element_count(1e10, 1.0), None);

        let mut mesh = MeshParams::new(&m, 25.0).unwrap();
        let before = mesh.clone();
        assert!(mesh.update_params(&param_map([("f_max", 1e300)])).is_err());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_snapshot_until_resync() {
        let mut m = material(250.0, 30.0);
        let mut mesh = MeshParams::new(&m, 25.0).unwrap();

        m.update_params(&param_map([("Vs", 500.0)])).unwrap();
        assert_eq!(mesh.vs(), 250.0);
        assert_eq!(mesh.num_elements(), 24);

        mesh.resync(&m).unwrap();
        assert_relative_eq!(mesh.ele_size(), 2.5);
        assert_eq!(mesh.num_elements(), 12);
    }

    #[test]
    fn test_update_frequency() {
        let mut mesh = MeshParams::new(&material(250.0, 30.0), 25.0).unwrap();
        mesh.update_params(&param_map([("f_max", 50.0)])).unwrap();
        assert_eq!(mesh.num_elements(), 48);

        let before = mesh.clone();
        assert!(mesh.update_params(&param_map([("soilDepth", 10.0)])).is_err());
        assert!(mesh.update_params(&param_map([("f_max", -1.0)])).is_err());
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_dict_round_trip() {
        let m = material(250.0, 30.0);
        let mesh = MeshParams::new(&m, 25.0).unwrap();
        let dict = mesh.get_params_dict();
        assert_eq!(dict["numNodes"], ParamValue::Int(25));
        let again = MeshParams::from_dict(&m, &dict).unwrap();
        assert_eq!(again, mesh);
    }

    #[test]
    fn test_max_resolved_frequency() {
        let mesh = MeshParams::new(&material(250.0, 30.5), 25.0).unwrap();
        assert!(mesh.max_resolved_frequency() >= 25.0);
    }
}
