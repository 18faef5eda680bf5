use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::core::{ChartConfig, OutputFormat, RenderablePayload, SourceFile};

use super::{GeneratedChart, Operation, TransportError};

pub const UPLOAD_PATH: &str = "/upload/";
pub const COLUMNS_PATH: &str = "/columns/";
pub const GENERATE_PATH: &str = "/generate/";

#[derive(Debug, Deserialize)]
struct SheetsResponse {
    sheets: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ColumnsResponse {
    columns: Vec<String>,
}

/// Text fields of a `/generate/` form, in wire order, excluding `file`.
///
/// `y_col` is sent as an empty string when the kind does not plot a Y axis.
#[must_use]
pub fn generate_fields(sheet: &str, config: &ChartConfig) -> Vec<(&'static str, String)> {
    vec![
        ("sheet_name", sheet.to_owned()),
        ("chart_type", config.kind.as_str().to_owned()),
        ("x_col", config.x_column.clone().unwrap_or_default()),
        (
            "y_col",
            config.effective_y_column().unwrap_or_default().to_owned(),
        ),
        ("chart_title", config.title.clone()),
        ("color", config.color.to_hex()),
        ("format", config.format.code().to_owned()),
    ]
}

pub(super) fn build_form(
    operation: Operation,
    file: &SourceFile,
    fields: Vec<(&'static str, String)>,
) -> Result<Form, TransportError> {
    let part = Part::bytes(file.bytes().to_vec())
        .file_name(file.name().to_owned())
        .mime_str(file.media_type())
        .map_err(|e| {
            TransportError::new(
                operation,
                format!("invalid media type `{}`: {e}", file.media_type()),
            )
        })?;

    let form = fields
        .into_iter()
        .fold(Form::new().part("file", part), |form, (name, value)| {
            form.text(name, value)
        });
    Ok(form)
}

/// Decodes `{ "sheets": [...] }` or `{ "columns": [...] }` into names.
pub fn decode_name_list(operation: Operation, body: &[u8]) -> Result<Vec<String>, TransportError> {
    let parsed = match operation {
        Operation::DiscoverSheets => {
            serde_json::from_slice::<SheetsResponse>(body).map(|r| r.sheets)
        }
        Operation::DiscoverColumns => {
            serde_json::from_slice::<ColumnsResponse>(body).map(|r| r.columns)
        }
        Operation::GenerateChart => {
            return Err(TransportError::new(
                operation,
                "generation responses do not carry a name list",
            ));
        }
    };
    parsed.map_err(|e| TransportError::new(operation, format!("invalid response body: {e}")))
}

/// Interprets a successful `/generate/` body according to the requested format.
///
/// Preview bodies are parsed into a payload; every other format is kept as
/// raw bytes, untouched.
pub fn decode_generate_body(
    format: OutputFormat,
    body: Vec<u8>,
    content_type: Option<String>,
) -> Result<GeneratedChart, TransportError> {
    if format.is_binary() {
        return Ok(GeneratedChart::Binary {
            bytes: body,
            content_type,
        });
    }
    RenderablePayload::from_preview_body(&body)
        .map(GeneratedChart::Payload)
        .map_err(|e| TransportError::new(Operation::GenerateChart, e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::{ChartConfigPatch, ChartKind};

    fn field<'a>(fields: &'a [(&'static str, String)], name: &str) -> &'a str {
        fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or_else(|| panic!("missing field {name}"))
    }

    #[test]
    fn generate_fields_follow_wire_order() {
        let mut config = ChartConfig::default();
        config.apply(ChartConfigPatch::new().x_column("Category").y_column("Sales"));

        let fields = generate_fields("Sheet1", &config);
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["sheet_name", "chart_type", "x_col", "y_col", "chart_title", "color", "format"]
        );
        assert_eq!(field(&fields, "chart_type"), "bar");
        assert_eq!(field(&fields, "y_col"), "Sales");
        assert_eq!(field(&fields, "color"), "#1f77b4");
        assert_eq!(field(&fields, "format"), "json");
    }

    #[test]
    fn single_axis_kinds_send_empty_y_column() {
        let mut config = ChartConfig::default();
        config.apply(
            ChartConfigPatch::new()
                .kind(ChartKind::Treemap)
                .x_column("Region")
                .y_column("Sales")
                .format(OutputFormat::Png),
        );

        let fields = generate_fields("Sheet1", &config);
        assert_eq!(field(&fields, "y_col"), "");
        assert_eq!(field(&fields, "format"), "png");
    }

    #[test]
    fn name_lists_decode_per_operation() {
        let sheets = decode_name_list(
            Operation::DiscoverSheets,
            json!({"sheets": ["Sheet1", "Sheet2"]}).to_string().as_bytes(),
        )
        .unwrap();
        assert_eq!(sheets, ["Sheet1", "Sheet2"]);

        let err = decode_name_list(
            Operation::DiscoverColumns,
            json!({"sheets": ["Sheet1"]}).to_string().as_bytes(),
        )
        .unwrap_err();
        assert_eq!(err.operation, Operation::DiscoverColumns);
    }

    #[test]
    fn binary_bodies_are_kept_verbatim() {
        let bytes = vec![0x89, b'P', b'N', b'G', 0x00, 0xff];
        let decoded =
            decode_generate_body(OutputFormat::Png, bytes.clone(), Some("image/png".into()))
                .unwrap();
        assert_eq!(
            decoded,
            GeneratedChart::Binary {
                bytes,
                content_type: Some("image/png".into())
            }
        );
    }

    #[test]
    fn preview_bodies_become_payloads() {
        let body = json!({"chart": json!({"data": [{"type": "pie"}], "layout": {}}).to_string()});
        let decoded =
            decode_generate_body(OutputFormat::Preview, body.to_string().into_bytes(), None)
                .unwrap();
        assert!(matches!(decoded, GeneratedChart::Payload(p) if p.trace_count() == 1));

        let err = decode_generate_body(OutputFormat::Preview, b"\x89PNG".to_vec(), None)
            .unwrap_err();
        assert_eq!(err.operation, Operation::GenerateChart);
    }
}
