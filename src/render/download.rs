use std::path::{Path, PathBuf};

use crate::core::ArtifactHandle;
use crate::error::{PipelineError, PipelineResult};

/// User-triggerable download of a binary chart.
///
/// Borrows the bytes from the controller that owns the artifact, so an
/// action can never outlive a reset or a newer result.
#[derive(Debug, Clone, Copy)]
pub struct DownloadAction<'a> {
    handle: &'a ArtifactHandle,
    bytes: &'a [u8],
}

impl<'a> DownloadAction<'a> {
    pub(crate) fn new(handle: &'a ArtifactHandle, bytes: &'a [u8]) -> Self {
        Self { handle, bytes }
    }

    #[must_use]
    pub fn handle(&self) -> &'a ArtifactHandle {
        self.handle
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.handle.file_name()
    }

    #[must_use]
    pub fn media_type(&self) -> &'a str {
        self.handle.media_type()
    }

    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Link text shown next to the download, e.g. `Click to download PNG`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "Click to download {}",
            self.handle.extension().to_ascii_uppercase()
        )
    }

    /// Writes the artifact as `chart.<extension>` inside `dir`.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> PipelineResult<PathBuf> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PipelineError::Io(format!(
                "`{}` is not a directory",
                dir.display()
            )));
        }
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.bytes).map_err(|err| {
            PipelineError::Io(format!("failed to write `{}`: {err}", path.display()))
        })?;
        Ok(path)
    }
}
