//! Session state and the pipeline controller driving it.

mod controller;
mod request;
mod session;
mod snapshot;
mod state;

pub use controller::PipelineController;
pub use request::{ApplyOutcome, Completion, PendingRequest, RequestTag};
pub use session::SessionState;
pub use snapshot::{PIPELINE_SNAPSHOT_JSON_SCHEMA_V1, PipelineSnapshot};
pub use state::{
    COLUMNS_FAILED_NOTICE, FailureKind, GENERATION_FAILED_NOTICE, MAX_QUEUED_NOTICES, Notice,
    PipelineState, SHEETS_FAILED_NOTICE, VALIDATION_FAILED_NOTICE,
};
