//! Time integration, damping and I/O settings

use std::f64::consts::PI;

use log::{debug, warn};

use super::base::{count, ensure_non_negative, ensure_positive, number, text, ParamSet, ParamSpec};
use super::value::{ParamMap, ParamValue};
use crate::error::{ParamError, ParamResult};

/// Newmark average-acceleration constants
pub const NEWMARK_GAMMA: f64 = 0.5;
pub const NEWMARK_BETA: f64 = 0.25;

/// Settings for the transient analysis run by the engine.
///
/// `dt` and `steps` have no sensible default and must always be supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    gamma: f64,
    beta: f64,
    /// Mass-proportional Rayleigh coefficient
    a0: f64,
    /// Stiffness-proportional Rayleigh coefficient
    a1: f64,
    dt: f64,
    steps: usize,
    input_file: String,
    output_file: String,
}

impl AnalysisParams {
    /// Build from a mapping holding at least `dt` and `steps`
    pub fn new(data: &ParamMap) -> ParamResult<Self> {
        let mut analysis = Self::blank();
        analysis.set_from_dict(data)?;
        Ok(analysis)
    }

    fn blank() -> Self {
        Self {
            gamma: NEWMARK_GAMMA,
            beta: NEWMARK_BETA,
            a0: 0.0,
            a1: 0.0,
            dt: 0.0,
            steps: 0,
            input_file: String::new(),
            output_file: String::new(),
        }
    }

    /// Set `a0` and `a1` for a damping ratio `zeta` matched at frequencies `f1` and `f2` (Hz)
    pub fn with_rayleigh_damping(mut self, zeta: f64, f1: f64, f2: f64) -> ParamResult<Self> {
        let (a0, a1) = rayleigh_coefficients(zeta, f1, f2)?;
        self.a0 = a0;
        self.a1 = a1;
        self.derive()?;
        Ok(self)
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn a0(&self) -> f64 {
        self.a0
    }

    pub fn a1(&self) -> f64 {
        self.a1
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn input_file(&self) -> &str {
        &self.input_file
    }

    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    /// Simulated time covered by the run
    pub fn duration(&self) -> f64 {
        self.dt * self.steps as f64
    }

    /// Newmark is unconditionally stable for 2β >= γ >= 1/2
    pub fn is_unconditionally_stable(&self) -> bool {
        self.gamma >= 0.5 && 2.0 * self.beta >= self.gamma
    }
}

/// Rayleigh coefficients giving damping ratio `zeta` at two frequencies.
///
/// With ω = 2πf: a0 = 2ζω1ω2 / (ω1 + ω2), a1 = 2ζ / (ω1 + ω2).
pub fn rayleigh_coefficients(zeta: f64, f1: f64, f2: f64) -> ParamResult<(f64, f64)> {
    const KIND: &str = "AnalysisParams";
    if !(0.0..1.0).contains(&zeta) {
        return Err(ParamError::invalid(
            KIND,
            "zeta",
            format!("must lie in [0, 1), got {zeta}"),
        ));
    }
    ensure_positive(KIND, "f1", f1)?;
    ensure_positive(KIND, "f2", f2)?;
    if f1 == f2 {
        return Err(ParamError::invalid(
            KIND,
            "f2",
            format!("must differ from f1 = {f1}"),
        ));
    }

    let w1 = 2.0 * PI * f1;
    let w2 = 2.0 * PI * f2;
    Ok((2.0 * zeta * w1 * w2 / (w1 + w2), 2.0 * zeta / (w1 + w2)))
}

impl ParamSet for AnalysisParams {
    const KIND: &'static str = "AnalysisParams";
    const DECLARED: &'static [ParamSpec] = &[
        ParamSpec::optional("gamma", ""),
        ParamSpec::optional("beta", ""),
        ParamSpec::optional("a0", "1/s"),
        ParamSpec::optional("a1", "s"),
        ParamSpec::required("dt", "s"),
        ParamSpec::required("steps", ""),
        ParamSpec::optional("inputFile", ""),
        ParamSpec::optional("outputFile", ""),
    ];
    const DERIVED: &'static [&'static str] = &[];

    fn value(&self, name: &str) -> Option<ParamValue> {
        let value = match name {
            "gamma" => ParamValue::Float(self.gamma),
            "beta" => ParamValue::Float(self.beta),
            "a0" => ParamValue::Float(self.a0),
            "a1" => ParamValue::Float(self.a1),
            "dt" => ParamValue::Float(self.dt),
            "steps" => ParamValue::from(self.steps),
            "inputFile" => ParamValue::Text(self.input_file.clone()),
            "outputFile" => ParamValue::Text(self.output_file.clone()),
            _ => return None,
        };
        Some(value)
    }

    fn assign(&mut self, name: &str, value: &ParamValue) -> ParamResult<()> {
        let kind = Self::KIND;
        match name {
            "gamma" => self.gamma = number(kind, name, value)?,
            "beta" => self.beta = number(kind, name, value)?,
            "a0" => self.a0 = number(kind, name, value)?,
            "a1" => self.a1 = number(kind, name, value)?,
            "dt" => self.dt = number(kind, name, value)?,
            "steps" => {
                let steps = count(kind, name, value)?;
                if steps < 1 {
                    return Err(ParamError::invalid(
                        kind,
                        name,
                        format!("must be a positive integer, got {steps}"),
                    ));
                }
                self.steps = steps as usize;
            }
            "inputFile" => self.input_file = text(kind, name, value)?,
            "outputFile" => self.output_file = text(kind, name, value)?,
            _ => {
                return Err(ParamError::UnknownParameter {
                    kind,
                    name: name.to_string(),
                })
            }
        }
        Ok(())
    }

    fn derive(&mut self) -> ParamResult<()> {
        let kind = Self::KIND;
        ensure_positive(kind, "gamma", self.gamma)?;
        ensure_positive(kind, "beta", self.beta)?;
        ensure_non_negative(kind, "a0", self.a0)?;
        ensure_non_negative(kind, "a1", self.a1)?;
        ensure_positive(kind, "dt", self.dt)?;
        if self.steps == 0 {
            return Err(ParamError::invalid(kind, "steps", "must be a positive integer, got 0"));
        }

        if !self.is_unconditionally_stable() {
            warn!(
                "{kind}: Newmark gamma = {}, beta = {} is only conditionally stable",
                self.gamma, self.beta
            );
        }
        debug!(
            "{kind}: {} steps of {} s ({} s)",
            self.steps,
            self.dt,
            self.duration()
        );
        Ok(())
    }

    fn with_defaults(&self) -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::param_map;
    use approx::assert_relative_eq;

    fn run() -> AnalysisParams {
        AnalysisParams::new(&param_map([("dt", 0.005), ("steps", 4000.0)])).unwrap()
    }

    #[test]
    fn test_defaults() {
        let a = run();
        assert_eq!(a.gamma(), 0.5);
        assert_eq!(a.beta(), 0.25);
        assert_eq!(a.a0(), 0.0);
        assert_eq!(a.a1(), 0.0);
        assert_eq!(a.steps(), 4000);
        assert_eq!(a.input_file(), "");
        assert!(a.is_unconditionally_stable());
        assert_relative_eq!(a.duration(), 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_time_step_and_count_required() {
        let err = AnalysisParams::new(&param_map([("steps", 10.0)])).unwrap_err();
        assert!(matches!(err, ParamError::MissingParameter { name: "dt", .. }));
        let err = AnalysisParams::new(&param_map([("dt", 0.01)])).unwrap_err();
        assert!(matches!(err, ParamError::MissingParameter { name: "steps", .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AnalysisParams::new(&param_map([("dt", 0.0), ("steps", 10.0)])).is_err());
        assert!(AnalysisParams::new(&param_map([("dt", 0.01), ("steps", 0.0)])).is_err());
        assert!(AnalysisParams::new(&param_map([("dt", 0.01), ("steps", 2.5)])).is_err());
        let err = AnalysisParams::new(&param_map([("dt", 0.01), ("steps", 1e25)])).unwrap_err();
        assert!(matches!(err, ParamError::InvalidParameter { ref name, .. } if name == "steps"));
        assert!(AnalysisParams::new(&param_map([("dt", 0.01), ("steps", 10.0), ("a0", -0.1)])).is_err());
    }

    #[test]
    fn test_paths_are_text() {
        let mut a = run();
        a.update_params(&param_map([("inputFile", "motions/el_centro.acc"), ("outputFile", "out/")]))
            .unwrap();
        assert_eq!(a.input_file(), "motions/el_centro.acc");
        assert_eq!(a.output_file(), "out/");

        let err = a.update_params(&param_map([("dt", "fast")])).unwrap_err();
        assert!(matches!(err, ParamError::InvalidParameter { .. }));
    }

    #[test]
    fn test_unknown_key_leaves_state_untouched() {
        let mut a = run();
        let before = a.clone();
        let err = a.update_params(&param_map([("dt", 0.01), ("alpha", 0.1)])).unwrap_err();
        assert!(matches!(err, ParamError::UnknownParameter { ref name, .. } if name == "alpha"));
        assert_eq!(a, before);
    }

    #[test]
    fn test_rayleigh_damping() {
        let a = run().with_rayleigh_damping(0.05, 1.0, 10.0).unwrap();
        let (w1, w2) = (2.0 * PI, 20.0 * PI);
        assert_relative_eq!(a.a0(), 0.1 * w1 * w2 / (w1 + w2), max_relative = 1e-12);
        assert_relative_eq!(a.a1(), 0.1 / (w1 + w2), max_relative = 1e-12);

        // damping ratio recovered at both target frequencies
        for w in [w1, w2] {
            assert_relative_eq!(a.a0() / (2.0 * w) + a.a1() * w / 2.0, 0.05, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_rayleigh_damping_rejects_degenerate_input() {
        assert!(rayleigh_coefficients(0.05, 5.0, 5.0).is_err());
        assert!(rayleigh_coefficients(1.5, 1.0, 5.0).is_err());
        assert!(rayleigh_coefficients(0.05, 0.0, 5.0).is_err());
    }

    #[test]
    fn test_conditional_stability_detected() {
        let a = AnalysisParams::new(&param_map([("dt", 0.01), ("steps", 10.0), ("beta", 0.0)]));
        assert!(a.is_err());
        let a = AnalysisParams::new(&param_map([("dt", 0.01), ("steps", 10.0), ("beta", 1.0 / 6.0)])).unwrap();
        assert!(!a.is_unconditionally_stable());
    }

    #[test]
    fn test_dict_round_trip() {
        let a = run();
        let dict = a.get_params_dict();
        assert_eq!(dict.len(), 8);
        assert_eq!(AnalysisParams::new(&dict).unwrap(), a);
    }
}
