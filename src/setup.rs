//! Analysis setup - material, mesh and analysis parameters assembled from one config

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ParamResult;
use crate::params::{AnalysisParams, MaterialParams, MeshParams, ParamMap, ParamSet};

/// JSON configuration with one section per parameter set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupConfig {
    /// Material section; omitted fields take material defaults
    #[serde(default)]
    pub material: ParamMap,
    /// Mesh section; may be omitted entirely
    #[serde(default)]
    pub mesh: ParamMap,
    /// Analysis section; must hold at least `dt` and `steps`
    pub analysis: ParamMap,
}

impl SetupConfig {
    pub fn from_json_str(json: &str) -> ParamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config file from disk
    pub fn load(path: impl AsRef<Path>) -> ParamResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Parameter dictionaries as consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInput {
    pub material: ParamMap,
    pub mesh: ParamMap,
    pub analysis: ParamMap,
}

/// The three validated parameter sets for one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSetup {
    pub material: MaterialParams,
    pub mesh: MeshParams,
    pub analysis: AnalysisParams,
}

impl AnalysisSetup {
    /// Build material, then the mesh from that material, then the analysis settings
    pub fn build(config: &SetupConfig) -> ParamResult<Self> {
        let material = MaterialParams::new(&config.material)?;
        let mesh = MeshParams::from_dict(&material, &config.mesh)?;
        let analysis = AnalysisParams::new(&config.analysis)?;

        info!(
            "Setup ready: Vs = {} m/s over {} m, {} elements of {:.3} m, {} steps of {} s",
            material.vs(),
            material.soil_depth(),
            mesh.num_elements(),
            mesh.ele_height(),
            analysis.steps(),
            analysis.dt()
        );

        Ok(Self {
            material,
            mesh,
            analysis,
        })
    }

    /// Load and build from a config file
    pub fn from_file(path: impl AsRef<Path>) -> ParamResult<Self> {
        Self::build(&SetupConfig::load(path)?)
    }

    /// Apply material changes and bring the mesh back in line with them.
    /// Nothing changes if either step fails.
    pub fn update_material(&mut self, changes: &ParamMap) -> ParamResult<()> {
        let mut material = self.material.clone();
        material.update_params(changes)?;
        let mut mesh = self.mesh.clone();
        mesh.resync(&material)?;
        self.material = material;
        self.mesh = mesh;
        Ok(())
    }

    pub fn export(&self) -> EngineInput {
        EngineInput {
            material: self.material.get_params_dict(),
            mesh: self.mesh.get_params_dict(),
            analysis: self.analysis.get_params_dict(),
        }
    }

    pub fn to_json(&self) -> ParamResult<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }
}
