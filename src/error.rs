use thiserror::Error;

use crate::api::PipelineState;
use crate::core::MissingField;
use crate::transport::{DiscoveryStage, TransportError};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("{stage} discovery failed: {source}")]
    DiscoveryFailed {
        stage: DiscoveryStage,
        #[source]
        source: TransportError,
    },

    #[error("chart configuration incomplete: missing {0}")]
    ValidationFailed(MissingField),

    #[error("chart generation failed: {0}")]
    GenerationFailed(#[source] TransportError),

    #[error("operation `{operation}` is not valid in state {state:?}")]
    InvalidTransition {
        operation: &'static str,
        state: PipelineState,
    },

    #[error("a chart generation request is already outstanding")]
    GenerationInFlight,

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
