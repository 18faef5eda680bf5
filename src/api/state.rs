use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::transport::{DiscoveryStage, Operation};

/// Failure recorded by the last request-driven transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    DiscoveryFailed(DiscoveryStage),
    GenerationFailed,
}

/// Workflow states. There is no terminal state: a new file restarts the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    AwaitingSheets,
    SheetsReady,
    AwaitingColumns,
    ColumnsReady,
    Generating,
    ResultReady,
    Error(FailureKind),
}

impl PipelineState {
    /// Position in the forward flow; `None` for [`PipelineState::Error`].
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Idle => Some(0),
            Self::AwaitingSheets => Some(1),
            Self::SheetsReady => Some(2),
            Self::AwaitingColumns => Some(3),
            Self::ColumnsReady => Some(4),
            Self::Generating => Some(5),
            Self::ResultReady => Some(6),
            Self::Error(_) => None,
        }
    }

    /// Whether this state is at or past `other` in the forward flow.
    #[must_use]
    pub fn has_reached(self, other: Self) -> bool {
        match (self.rank(), other.rank()) {
            (Some(current), Some(target)) => current >= target,
            _ => false,
        }
    }

    /// Operation whose response this state is waiting for.
    #[must_use]
    pub const fn awaited_operation(self) -> Option<Operation> {
        match self {
            Self::AwaitingSheets => Some(Operation::DiscoverSheets),
            Self::AwaitingColumns => Some(Operation::DiscoverColumns),
            Self::Generating => Some(Operation::GenerateChart),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub const SHEETS_FAILED_NOTICE: &str = "Failed to get sheet names";
pub const COLUMNS_FAILED_NOTICE: &str = "Failed to load columns";
pub const VALIDATION_FAILED_NOTICE: &str = "Please fill all required fields.";
pub const GENERATION_FAILED_NOTICE: &str = "Error generating chart";

/// Capacity of the controller's notice queue.
pub const MAX_QUEUED_NOTICES: usize = 32;

/// User-facing message queued by the controller for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: &'static str,
    pub error: PipelineError,
}

impl Notice {
    #[must_use]
    pub fn for_error(error: PipelineError) -> Self {
        let message = match &error {
            PipelineError::DiscoveryFailed {
                stage: DiscoveryStage::Sheets,
                ..
            } => SHEETS_FAILED_NOTICE,
            PipelineError::DiscoveryFailed {
                stage: DiscoveryStage::Columns,
                ..
            } => COLUMNS_FAILED_NOTICE,
            PipelineError::ValidationFailed(_) => VALIDATION_FAILED_NOTICE,
            _ => GENERATION_FAILED_NOTICE,
        };
        Self { message, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_ordering() {
        assert!(PipelineState::ResultReady.has_reached(PipelineState::ColumnsReady));
        assert!(PipelineState::SheetsReady.has_reached(PipelineState::SheetsReady));
        assert!(!PipelineState::AwaitingSheets.has_reached(PipelineState::SheetsReady));
        assert!(
            !PipelineState::Error(FailureKind::GenerationFailed)
                .has_reached(PipelineState::Idle)
        );
    }

    #[test]
    fn awaiting_states_name_their_operation() {
        assert_eq!(
            PipelineState::AwaitingColumns.awaited_operation(),
            Some(Operation::DiscoverColumns)
        );
        assert_eq!(PipelineState::ResultReady.awaited_operation(), None);
    }
}
