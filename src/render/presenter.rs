use tracing::{debug, trace};

use crate::api::PipelineController;
use crate::core::ChartOutput;
use crate::error::{PipelineError, PipelineResult};
use crate::transport::ChartService;

use super::{ChartWidget, DownloadAction};

/// What the presenter did with the controller's current result.
#[derive(Debug, Clone, Copy)]
pub enum Presentation<'a> {
    /// No result yet; the widget was cleared.
    Empty,
    /// The payload was handed to the widget.
    Rendered { traces: usize },
    /// A binary artifact is ready to download; the widget was cleared.
    Download(DownloadAction<'a>),
}

impl<'a> Presentation<'a> {
    #[must_use]
    pub fn download(&self) -> Option<DownloadAction<'a>> {
        match self {
            Self::Download(action) => Some(*action),
            _ => None,
        }
    }
}

/// Routes a pipeline result to the chart widget or to a download action.
#[derive(Debug, Default)]
pub struct ResultPresenter<W> {
    widget: W,
}

impl<W: ChartWidget> ResultPresenter<W> {
    pub fn new(widget: W) -> Self {
        Self { widget }
    }

    #[must_use]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn into_widget(self) -> W {
        self.widget
    }

    pub fn present<'a, S: ChartService>(
        &mut self,
        controller: &'a PipelineController<S>,
    ) -> PipelineResult<Presentation<'a>> {
        match controller.output() {
            None => {
                trace!("no chart result to present");
                self.widget.clear();
                Ok(Presentation::Empty)
            }
            Some(ChartOutput::Payload(payload)) => {
                self.widget.draw(payload)?;
                debug!(traces = payload.trace_count(), "chart payload presented");
                Ok(Presentation::Rendered {
                    traces: payload.trace_count(),
                })
            }
            Some(ChartOutput::Artifact(handle)) => {
                let bytes = controller.resolve_artifact(handle).ok_or_else(|| {
                    PipelineError::InvalidData(format!(
                        "artifact {} is no longer available",
                        handle.id().get()
                    ))
                })?;
                self.widget.clear();
                debug!(file = %handle.file_name(), len = bytes.len(), "download ready");
                Ok(Presentation::Download(DownloadAction::new(handle, bytes)))
            }
        }
    }
}
