//! Shared validated key-value behavior for all parameter sets

use log::debug;

use super::value::{ParamMap, ParamValue};
use crate::error::{ParamError, ParamResult};

/// Declaration of a settable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Name used in dictionaries and by the engine
    pub name: &'static str,
    /// Whether `set_from_dict` must be given this parameter
    pub required: bool,
    /// Unit label for display, empty when dimensionless
    pub unit: &'static str,
}

impl ParamSpec {
    pub const fn optional(name: &'static str, unit: &'static str) -> Self {
        Self {
            name,
            required: false,
            unit,
        }
    }

    pub const fn required(name: &'static str, unit: &'static str) -> Self {
        Self {
            name,
            required: true,
            unit,
        }
    }
}

/// Validated parameter storage shared by material, mesh and analysis parameters.
///
/// Implementors declare their settable names in [`ParamSet::DECLARED`], their
/// read-only names in [`ParamSet::DERIVED`], and provide typed access to each.
/// Every mutation through this trait is all-or-nothing: the change is staged on
/// a copy, re-derived and validated, and only then committed.
pub trait ParamSet: Clone {
    /// Name used in error messages
    const KIND: &'static str;
    /// Settable parameters, in export order
    const DECLARED: &'static [ParamSpec];
    /// Read-only parameters computed from the settable ones, in export order
    const DERIVED: &'static [&'static str];

    /// Current value of a declared or derived parameter
    fn value(&self, name: &str) -> Option<ParamValue>;

    /// Store a declared parameter without validating ranges
    fn assign(&mut self, name: &str, value: &ParamValue) -> ParamResult<()>;

    /// Validate the settable parameters and recompute every derived one
    fn derive(&mut self) -> ParamResult<()>;

    /// A copy with every settable parameter reset to its default.
    /// Context captured at construction (such as a material snapshot) is kept.
    fn with_defaults(&self) -> Self;

    fn is_declared(name: &str) -> bool {
        Self::DECLARED.iter().any(|spec| spec.name == name)
    }

    fn is_derived(name: &str) -> bool {
        Self::DERIVED.contains(&name)
    }

    /// Apply `changes` and re-derive dependent fields.
    ///
    /// Fails with [`ParamError::UnknownParameter`] for undeclared names; on any
    /// failure `self` is left exactly as it was.
    fn update_params(&mut self, changes: &ParamMap) -> ParamResult<()> {
        let mut staged = self.clone();
        staged.apply(changes)?;
        *self = staged;
        Ok(())
    }

    /// Snapshot of every settable and derived parameter
    fn get_params_dict(&self) -> ParamMap {
        Self::DECLARED
            .iter()
            .map(|spec| spec.name)
            .chain(Self::DERIVED.iter().copied())
            .filter_map(|name| self.value(name).map(|v| (name.to_string(), v)))
            .collect()
    }

    /// Re-initialize from `data`, filling defaults for omitted optional fields
    fn set_from_dict(&mut self, data: &ParamMap) -> ParamResult<()> {
        if let Some(spec) = Self::DECLARED
            .iter()
            .find(|spec| spec.required && !data.contains_key(spec.name))
        {
            return Err(ParamError::MissingParameter {
                kind: Self::KIND,
                name: spec.name,
            });
        }
        let mut fresh = self.with_defaults();
        fresh.apply(data)?;
        *self = fresh;
        Ok(())
    }

    /// Re-initialize from a JSON object
    fn set_from_json(&mut self, json: &str) -> ParamResult<()> {
        let data: ParamMap = serde_json::from_str(json)?;
        self.set_from_dict(&data)
    }

    /// Export [`ParamSet::get_params_dict`] as pretty JSON
    fn to_json(&self) -> ParamResult<String> {
        Ok(serde_json::to_string_pretty(&self.get_params_dict())?)
    }

    /// Apply in place without staging. Callers go through `update_params` or
    /// `set_from_dict`, which discard `self` on error.
    fn apply(&mut self, changes: &ParamMap) -> ParamResult<()> {
        if let Some(name) = changes
            .keys()
            .find(|name| !Self::is_declared(name) && !Self::is_derived(name))
        {
            return Err(ParamError::UnknownParameter {
                kind: Self::KIND,
                name: name.clone(),
            });
        }

        for (name, value) in changes.iter().filter(|(name, _)| Self::is_declared(name)) {
            self.assign(name, value)?;
        }
        self.derive()?;

        // Derived names are accepted only as assertions about the result
        for (name, got) in changes.iter().filter(|(name, _)| Self::is_derived(name)) {
            let expected = self.value(name);
            if !expected.as_ref().is_some_and(|e| e.matches(got)) {
                return Err(ParamError::DerivedParameter {
                    kind: Self::KIND,
                    name: name.clone(),
                    expected: expected.map(|e| e.to_string()).unwrap_or_default(),
                    got: got.to_string(),
                });
            }
        }

        debug!("{}: applied {} parameter(s)", Self::KIND, changes.len());
        Ok(())
    }
}

// Typed readers used by `ParamSet::assign` implementations

pub(crate) fn number(kind: &'static str, name: &str, value: &ParamValue) -> ParamResult<f64> {
    match value.as_f64() {
        Some(x) if x.is_finite() => Ok(x),
        Some(x) => Err(ParamError::invalid(kind, name, format!("{x} is not finite"))),
        None => Err(ParamError::invalid(kind, name, format!("expected a number, got {value}"))),
    }
}

pub(crate) fn count(kind: &'static str, name: &str, value: &ParamValue) -> ParamResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| ParamError::invalid(kind, name, format!("expected an integer, got {value}")))
}

pub(crate) fn text(kind: &'static str, name: &str, value: &ParamValue) -> ParamResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ParamError::invalid(kind, name, format!("expected text, got {value}")))
}

// Range checks used by `ParamSet::derive` implementations

pub(crate) fn ensure_positive(kind: &'static str, name: &str, x: f64) -> ParamResult<()> {
    if x > 0.0 {
        Ok(())
    } else {
        Err(ParamError::invalid(kind, name, format!("must be > 0, got {x}")))
    }
}

pub(crate) fn ensure_non_negative(kind: &'static str, name: &str, x: f64) -> ParamResult<()> {
    if x >= 0.0 {
        Ok(())
    } else {
        Err(ParamError::invalid(kind, name, format!("must be >= 0, got {x}")))
    }
}
