use serde::{Deserialize, Serialize};

use crate::core::{ChartConfig, ChartOutput, ChartOutputKind};
use crate::error::{PipelineError, PipelineResult};
use crate::transport::ChartService;

use super::{PipelineController, PipelineState};

pub const PIPELINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable view of the controller for diagnostics and host UIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    pub schema_version: u32,
    pub state: PipelineState,
    pub phase: PipelineState,
    pub generation: u64,
    pub file_name: Option<String>,
    pub sheets: Option<Vec<String>>,
    pub selected_sheet: Option<String>,
    pub columns: Option<Vec<String>>,
    pub config: ChartConfig,
    pub output: Option<ChartOutputKind>,
    pub artifact_file_name: Option<String>,
    pub live_artifacts: usize,
}

impl PipelineSnapshot {
    pub fn to_json_pretty(&self) -> PipelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::InvalidData(format!("failed to serialize pipeline snapshot: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> PipelineResult<Self> {
        let snapshot: Self = serde_json::from_str(input).map_err(|e| {
            PipelineError::InvalidData(format!("failed to parse pipeline snapshot: {e}"))
        })?;
        if snapshot.schema_version != PIPELINE_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(PipelineError::InvalidData(format!(
                "unsupported pipeline snapshot schema version: {}",
                snapshot.schema_version
            )));
        }
        Ok(snapshot)
    }
}

impl<S: ChartService> PipelineController<S> {
    #[must_use]
    pub fn snapshot(&self) -> PipelineSnapshot {
        let session = self.session();
        PipelineSnapshot {
            schema_version: PIPELINE_SNAPSHOT_JSON_SCHEMA_V1,
            state: self.state(),
            phase: self.phase(),
            generation: self.generation(),
            file_name: session.source().map(|file| file.name().to_owned()),
            sheets: session.sheets().map(<[String]>::to_vec),
            selected_sheet: session.selected_sheet().map(str::to_owned),
            columns: session.columns().map(<[String]>::to_vec),
            config: session.config().clone(),
            output: session.output().map(ChartOutput::kind),
            artifact_file_name: session
                .output()
                .and_then(ChartOutput::artifact)
                .map(|handle| handle.file_name()),
            live_artifacts: session.artifacts().live_count(),
        }
    }
}
