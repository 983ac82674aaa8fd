//! SSI Params - validated parameters for soil-structure interaction analyses
//!
//! This library prepares the numeric configuration that an external finite
//! element engine consumes for a site response / SSI run:
//! - Soil and bedrock material properties with derived moduli (G, E, K)
//! - Mesh sizing from the highest frequency of interest
//! - Newmark integration, Rayleigh damping and I/O settings
//!
//! Every parameter set shares the same validated key-value interface
//! ([`params::ParamSet`]): unknown names are rejected, updates are
//! all-or-nothing and derived values are always current.
//!
//! ## Example
//! ```rust
//! use ssi_params::prelude::*;
//!
//! let material = MaterialParams::new(&param_map([("Vs", 250.0), ("rho", 1.7), ("nu", 0.3)]))?;
//! let mesh = MeshParams::new(&material, 25.0)?;
//! let analysis = AnalysisParams::new(&param_map([("dt", 0.005), ("steps", 4000.0)]))?;
//!
//! assert_eq!(mesh.num_elements(), 24);
//! assert_eq!(material.shear_modulus(), 106250.0);
//! assert_eq!(analysis.gamma(), 0.5);
//!
//! // Everything the engine needs, as plain dictionaries
//! let dict = material.get_params_dict();
//! assert!(dict.contains_key("K"));
//! # Ok::<(), ssi_params::error::ParamError>(())
//! ```

pub mod error;
pub mod params;
pub mod setup;

// Re-export common types
pub mod prelude {
    pub use crate::error::{ParamError, ParamResult};
    pub use crate::params::{
        param_map, AnalysisParams, MaterialParams, MeshParams, ParamMap, ParamSet, ParamValue,
    };
    pub use crate::setup::{AnalysisSetup, EngineInput, SetupConfig};
}
