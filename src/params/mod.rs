//! Parameter sets handed to the finite element engine

mod analysis;
mod base;
mod material;
mod mesh;
mod value;

pub use analysis::{rayleigh_coefficients, AnalysisParams, NEWMARK_BETA, NEWMARK_GAMMA};
pub use base::{ParamSet, ParamSpec};
pub use material::MaterialParams;
pub use mesh::{MeshParams, DEFAULT_ELEMENTS_PER_WAVELENGTH, DEFAULT_F_MAX};
pub use value::{param_map, ParamMap, ParamValue};
