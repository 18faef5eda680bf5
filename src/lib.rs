//! chart-pipeline: client-side workflow controller for a remote charting service.
//!
//! A user supplies a spreadsheet-like file, picks a sheet and columns,
//! configures a chart, and receives either an interactive payload or a
//! downloadable image. The crate keeps a strict split between the session
//! data (`api`), the service seam (`transport`), and result hand-off
//! (`render`); parsing and rendering stay on the service side.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod transport;

pub use api::{ApplyOutcome, PipelineController, PipelineState};
pub use error::{PipelineError, PipelineResult};
