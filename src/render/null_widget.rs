use serde_json::Value;

use crate::core::RenderablePayload;
use crate::error::{PipelineError, PipelineResult};
use crate::render::ChartWidget;

/// Headless widget used by tests and command-line hosts.
///
/// It still checks the payload shape so callers catch malformed charts
/// before a real widget is attached.
#[derive(Debug, Default)]
pub struct NullWidget {
    pub draw_count: usize,
    pub last_trace_count: usize,
    pub showing: bool,
}

impl ChartWidget for NullWidget {
    fn draw(&mut self, payload: &RenderablePayload) -> PipelineResult<()> {
        if let Some(index) = payload.data.iter().position(|trace| !trace.is_object()) {
            return Err(PipelineError::InvalidData(format!(
                "trace {index} is not an object"
            )));
        }
        if !matches!(payload.layout, Value::Object(_)) {
            return Err(PipelineError::InvalidData(
                "chart layout must be an object".to_owned(),
            ));
        }
        self.draw_count += 1;
        self.last_trace_count = payload.trace_count();
        self.showing = true;
        Ok(())
    }

    fn clear(&mut self) {
        self.showing = false;
        self.last_trace_count = 0;
    }
}
