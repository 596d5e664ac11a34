//! Analysis record types.
//!
//! The record keeps models and road profiles in their tagged parameter-map
//! form so stored files stay readable by other tools and can be rebuilt
//! into typed values on demand.

use rc_core::EngineConfig;
use rc_metrics::{ComfortMetrics, compute_metrics};
use rc_sim::{
    ParamMap, RoadProfile, Scenario, SimOptions, SolverStats, Trajectory, VehicleKind,
    VehicleModel,
};
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

/// `YYYY-MM-DDTHH:MM:SS.ffffff`, local time without offset.
const EXECUTION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn execution_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format(EXECUTION_DATE_FORMAT)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: ParamMap,
    #[serde(default)]
    pub initial_conditions: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSnapshot {
    #[serde(rename = "type")]
    pub kind: String,
    pub params: ParamMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSeries {
    pub t: Vec<f64>,
    /// One row per state component.
    pub y: Vec<Vec<f64>>,
    pub road_profile: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_profile_rear: Option<Vec<f64>>,
}

/// A named, self-describing simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub name: String,
    pub execution_date: String,
    pub vehicle_model: VehicleSnapshot,
    pub road_profile: RoadSnapshot,
    pub results: ResultSeries,
    pub t_span: (f64, f64),
    pub t_eval: Vec<f64>,
}

impl AnalysisRecord {
    /// Package a finished run, stamped with the current local time.
    pub fn from_run(
        name: impl Into<String>,
        model: &VehicleModel,
        road: &RoadProfile,
        opts: &SimOptions,
        traj: &Trajectory,
    ) -> Self {
        Self {
            name: name.into(),
            execution_date: execution_timestamp(),
            vehicle_model: VehicleSnapshot {
                kind: model.kind().as_str().to_string(),
                params: model.vehicle().params(),
                initial_conditions: model.initial_state().to_vec(),
            },
            road_profile: RoadSnapshot {
                kind: road.tag().to_string(),
                params: road.params(),
            },
            results: ResultSeries {
                t: traj.t.clone(),
                y: traj.y.clone(),
                road_profile: traj.road.clone(),
                road_profile_rear: traj.road_rear.clone(),
            },
            t_span: opts.t_span,
            t_eval: opts.t_eval.clone(),
        }
    }

    pub fn from_scenario(scenario: &Scenario, traj: &Trajectory) -> Self {
        Self::from_run(
            scenario.name.clone(),
            &scenario.model,
            &scenario.road,
            &scenario.options,
            traj,
        )
    }

    pub fn with_execution_date(mut self, execution_date: impl Into<String>) -> Self {
        self.execution_date = execution_date.into();
        self
    }

    pub fn kind(&self) -> ResultsResult<VehicleKind> {
        self.vehicle_model
            .kind
            .parse()
            .map_err(|_| ResultsError::MalformedRecord {
                what: format!(
                    "{}: unknown vehicle type '{}'",
                    self.name, self.vehicle_model.kind
                ),
            })
    }

    /// Rebuild the typed vehicle model.
    pub fn to_model(&self) -> ResultsResult<VehicleModel> {
        Ok(VehicleModel::from_params(
            &self.vehicle_model.kind,
            &self.vehicle_model.params,
            &self.vehicle_model.initial_conditions,
        )?)
    }

    /// Rebuild the typed road profile.
    pub fn to_road(&self) -> ResultsResult<RoadProfile> {
        Ok(RoadProfile::from_params(
            &self.road_profile.kind,
            &self.road_profile.params,
        )?)
    }

    /// Options that reproduce the stored run under `config`.
    pub fn options(&self, config: EngineConfig) -> SimOptions {
        SimOptions {
            t_span: self.t_span,
            t_eval: self.t_eval.clone(),
            config,
        }
    }

    /// Stored trajectory, checked for shape. Solver statistics are not
    /// persisted and come back zeroed.
    pub fn trajectory(&self) -> ResultsResult<Trajectory> {
        let traj = Trajectory {
            kind: self.kind()?,
            t: self.results.t.clone(),
            y: self.results.y.clone(),
            road: self.results.road_profile.clone(),
            road_rear: self.results.road_profile_rear.clone(),
            stats: SolverStats::default(),
        };
        traj.check_shape()
            .map_err(|e| ResultsError::MalformedRecord {
                what: format!("{}: {e}", self.name),
            })?;
        Ok(traj)
    }

    /// Recompute comfort metrics from the stored series, without integrating.
    pub fn metrics(&self) -> ResultsResult<ComfortMetrics> {
        Ok(compute_metrics(&self.trajectory()?)?)
    }

    /// Integrate the stored model and road again.
    pub fn rerun(&self, config: EngineConfig) -> ResultsResult<Trajectory> {
        let model = self.to_model()?;
        let road = self.to_road()?;
        Ok(rc_sim::run_sim(&model, &road, &self.options(config))?)
    }

    /// Parse one record from a JSON value. Missing or mistyped fields are
    /// reported as a malformed record.
    pub fn from_value(value: serde_json::Value) -> ResultsResult<Self> {
        let label = value
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("<unnamed>")
            .to_string();
        serde_json::from_value(value).map_err(|e| ResultsError::MalformedRecord {
            what: format!("{label}: {e}"),
        })
    }
}
