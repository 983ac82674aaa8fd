//! Parameter values and mappings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value as exchanged with callers and the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Whole number (counts, step totals)
    Int(i64),
    /// Real number (moduli, velocities, sizes)
    Float(f64),
    /// Free text (file paths)
    Text(String),
}

/// Name -> value mapping used for import and export
pub type ParamMap = BTreeMap<String, ParamValue>;

impl ParamValue {
    /// Numeric view of the value; integers widen to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            Self::Text(_) => None,
        }
    }

    /// Integer view; floats are accepted only when they hold a whole number
    /// that fits in an i64
    pub fn as_i64(&self) -> Option<i64> {
        // 2^63 is exactly representable, so the upper bound is exclusive
        const RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(x) if RANGE.contains(x) && x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when both values denote the same quantity.
    ///
    /// Numbers compare with a relative tolerance of 1e-9 so that values
    /// exported by `get_params_dict` can be fed back unchanged.
    pub fn matches(&self, other: &ParamValue) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => {
                    let scale = a.abs().max(b.abs()).max(1.0);
                    (a - b).abs() <= 1e-9 * scale
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<usize> for ParamValue {
    fn from(i: usize) -> Self {
        Self::Int(i as i64)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Build a [`ParamMap`] from `(name, value)` pairs
pub fn param_map<I, K, V>(entries: I) -> ParamMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
