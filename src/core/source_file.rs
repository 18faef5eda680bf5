use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};

const CSV_MEDIA_TYPE: &str = "text/csv";
const XLSX_MEDIA_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MEDIA_TYPE: &str = "application/vnd.ms-excel";
const OCTET_STREAM_MEDIA_TYPE: &str = "application/octet-stream";

const SAMPLE_FILE_NAME: &str = "sample.csv";
const SAMPLE_CSV: &str = "Category,Sales,Profit,Region
A,100,20,North
B,120,25,South
C,150,30,East
D,130,35,West
E,170,50,North
F,160,40,South
G,180,45,East
H,190,55,West
I,200,60,North
J,210,65,South
K,220,70,East
L,230,75,West
M,240,80,North
N,250,85,South
O,260,90,East";

/// Spreadsheet-like file supplied by the user.
///
/// Immutable once created. Clones share the underlying bytes, so the same
/// file can be attached to every request of a session without copying.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> PipelineResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PipelineError::InvalidData(
                "source file name must not be empty".to_owned(),
            ));
        }
        let media_type = media_type.into();
        let media_type = if media_type.trim().is_empty() {
            media_type_for_name(&name).to_owned()
        } else {
            media_type
        };
        Ok(Self {
            name,
            media_type,
            bytes: bytes.into(),
        })
    }

    /// Reads a file from disk and infers its media type from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            PipelineError::Io(format!("failed to read `{}`: {err}", path.display()))
        })?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                PipelineError::InvalidData(format!(
                    "`{}` has no usable file name",
                    path.display()
                ))
            })?
            .to_owned();
        let media_type = media_type_for_name(&name);
        Self::new(name, media_type, bytes)
    }

    /// Built-in sample dataset (`sample.csv`) with a `Category` column and
    /// three numeric/text columns to chart against.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            name: SAMPLE_FILE_NAME.to_owned(),
            media_type: CSV_MEDIA_TYPE.to_owned(),
            bytes: Arc::from(SAMPLE_CSV.as_bytes()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Media type the browser would declare for a spreadsheet file name.
#[must_use]
pub fn media_type_for_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => CSV_MEDIA_TYPE,
        Some("xlsx") => XLSX_MEDIA_TYPE,
        Some("xls") => XLS_MEDIA_TYPE,
        _ => OCTET_STREAM_MEDIA_TYPE,
    }
}
