mod download;
mod null_widget;
mod presenter;

pub use download::DownloadAction;
pub use null_widget::NullWidget;
pub use presenter::{Presentation, ResultPresenter};

use crate::core::RenderablePayload;
use crate::error::PipelineResult;

/// Contract implemented by the widget that draws interactive charts.
///
/// Widgets receive the payload exactly as the service produced it; drawing
/// stays isolated from pipeline and transport logic.
pub trait ChartWidget {
    fn draw(&mut self, payload: &RenderablePayload) -> PipelineResult<()>;

    /// Removes whatever the widget currently shows.
    fn clear(&mut self) {}
}
