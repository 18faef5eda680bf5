use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PipelineError, PipelineResult};

/// Chart description handed verbatim to the rendering widget.
///
/// `data` is the list of traces and `layout` the figure layout. Neither is
/// interpreted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderablePayload {
    pub data: Vec<Value>,
    #[serde(default = "empty_layout")]
    pub layout: Value,
}

#[derive(Debug, Deserialize)]
struct PreviewEnvelope {
    chart: Value,
}

impl RenderablePayload {
    #[must_use]
    pub fn new(data: Vec<Value>, layout: Value) -> Self {
        Self { data, layout }
    }

    #[must_use]
    pub fn trace_count(&self) -> usize {
        self.data.len()
    }

    /// Decodes the body of a preview generation response.
    ///
    /// The `chart` field is normally a JSON document encoded as a string and
    /// needs a second parse; an already-decoded object is accepted as well.
    pub fn from_preview_body(body: &[u8]) -> PipelineResult<Self> {
        let envelope: PreviewEnvelope = serde_json::from_slice(body).map_err(|e| {
            PipelineError::InvalidData(format!("failed to parse preview response: {e}"))
        })?;
        match envelope.chart {
            Value::String(encoded) => Self::from_json_str(&encoded),
            chart @ Value::Object(_) => serde_json::from_value(chart).map_err(|e| {
                PipelineError::InvalidData(format!("failed to decode chart object: {e}"))
            }),
            other => Err(PipelineError::InvalidData(format!(
                "preview `chart` field must be a string or object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(input: &str) -> PipelineResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            PipelineError::InvalidData(format!("failed to parse chart payload: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> PipelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PipelineError::InvalidData(format!("failed to serialize chart payload: {e}"))
        })
    }
}

fn empty_layout() -> Value {
    Value::Object(serde_json::Map::new())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_string_encoded_chart() {
        let figure = json!({
            "data": [{"type": "bar", "x": ["A", "B"], "y": [100, 120]}],
            "layout": {"title": {"text": "Sales Chart"}}
        });
        let body = json!({ "chart": figure.to_string() }).to_string();

        let payload = RenderablePayload::from_preview_body(body.as_bytes()).unwrap();
        assert_eq!(payload.trace_count(), 1);
        assert_eq!(payload.layout["title"]["text"], "Sales Chart");
    }

    #[test]
    fn accepts_object_chart_and_missing_layout() {
        let body = json!({ "chart": { "data": [] } }).to_string();
        let payload = RenderablePayload::from_preview_body(body.as_bytes()).unwrap();
        assert_eq!(payload.trace_count(), 0);
        assert_eq!(payload.layout, json!({}));
    }

    #[test]
    fn rejects_malformed_bodies() {
        assert!(RenderablePayload::from_preview_body(b"not json").is_err());
        assert!(RenderablePayload::from_preview_body(br#"{"figure": "{}"}"#).is_err());
        assert!(RenderablePayload::from_preview_body(br#"{"chart": 42}"#).is_err());
        assert!(RenderablePayload::from_preview_body(br#"{"chart": "{\"layout\": {}}"}"#).is_err());
    }
}
