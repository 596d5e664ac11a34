//! Scenario file format.
//!
//! ```yaml
//! name: thesis step
//! vehicle:
//!   type: QuarterCarModel
//!   params: { ms: 270, mu: 60, ks: 27000, cs: 2000, ku: 200000 }
//! road:
//!   type: step
//!   params: { amplitude: 0.05, activation_time: 1.0 }
//! t_span: [0.0, 3.0]
//! samples: 5000
//! ```
//!
//! `vehicle.params` may be omitted to use the variant's default constants,
//! `initial_conditions` to start at rest, and `samples` to use the
//! configured grid density.

use std::path::Path;

use rc_core::{EngineConfig, ReportFormat, linspace};
use rc_sim::{ParamMap, RoadProfile, Scenario, SimOptions, Vehicle, VehicleKind, VehicleModel};
use serde::Deserialize;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: ParamMap,
    #[serde(default)]
    pub initial_conditions: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: ParamMap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub name: String,
    pub vehicle: VehicleSpec,
    pub road: RoadSpec,
    pub t_span: (f64, f64),
    #[serde(default)]
    pub samples: Option<usize>,
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub report: ReportFormat,
}

impl ScenarioFile {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| CliError::ScenarioFileRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build the typed run request.
    pub fn to_scenario(&self) -> CliResult<Scenario> {
        let kind: VehicleKind = self.vehicle.kind.parse()?;
        let params = if self.vehicle.params.is_empty() {
            Vehicle::default_for(kind).params()
        } else {
            self.vehicle.params.clone()
        };
        let model =
            VehicleModel::from_params(kind.as_str(), &params, &self.vehicle.initial_conditions)?;
        let road = RoadProfile::from_params(&self.road.kind, &self.road.params)?;

        let (t0, t1) = self.t_span;
        let options = match self.samples {
            Some(n) => SimOptions {
                t_span: self.t_span,
                t_eval: linspace(t0, t1, n),
                config: self.config,
            },
            None => SimOptions::with_default_grid(t0, t1, self.config)?,
        };
        options.validate()?;

        Ok(Scenario {
            name: self.name.clone(),
            model,
            road,
            options,
        })
    }
}
