use crate::core::{
    ArtifactHandle, ArtifactStore, ChartConfig, ChartConfigPatch, ChartOutput, RenderablePayload,
    SourceFile,
};

use super::PipelineState;

/// Data of the in-progress workflow.
///
/// Every upstream mutation clears its dependents in the same call, so a
/// request issued right after never sees stale derived state. Only the
/// controller mutates a session.
#[derive(Debug, Default)]
pub struct SessionState {
    source: Option<SourceFile>,
    sheets: Option<Vec<String>>,
    selected_sheet: Option<String>,
    columns: Option<Vec<String>>,
    config: ChartConfig,
    output: Option<ChartOutput>,
    artifacts: ArtifactStore,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn source(&self) -> Option<&SourceFile> {
        self.source.as_ref()
    }

    /// Discovered sheet names, `None` until discovery succeeds.
    #[must_use]
    pub fn sheets(&self) -> Option<&[String]> {
        self.sheets.as_deref()
    }

    #[must_use]
    pub fn selected_sheet(&self) -> Option<&str> {
        self.selected_sheet.as_deref()
    }

    /// Discovered column names for the selected sheet.
    #[must_use]
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn output(&self) -> Option<&ChartOutput> {
        self.output.as_ref()
    }

    #[must_use]
    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Bytes of a live artifact issued by this session.
    #[must_use]
    pub fn resolve_artifact(&self, handle: &ArtifactHandle) -> Option<&[u8]> {
        self.artifacts.resolve(handle)
    }

    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets
            .as_ref()
            .is_some_and(|sheets| sheets.iter().any(|sheet| sheet == name))
    }

    /// State the workflow settles in given only the data held here.
    #[must_use]
    pub fn settled_state(&self) -> PipelineState {
        if self.output.is_some() {
            PipelineState::ResultReady
        } else if self.columns.is_some() {
            PipelineState::ColumnsReady
        } else if self.source.is_some() && self.sheets.is_some() {
            PipelineState::SheetsReady
        } else {
            PipelineState::Idle
        }
    }

    pub(crate) fn replace_source(&mut self, file: SourceFile) {
        self.sheets = None;
        self.selected_sheet = None;
        self.invalidate_columns();
        self.source = Some(file);
    }

    /// Forgets the file after its sheets could not be discovered.
    pub(crate) fn discard_source(&mut self) {
        self.source = None;
        self.sheets = None;
        self.selected_sheet = None;
        self.invalidate_columns();
    }

    pub(crate) fn set_sheets(&mut self, sheets: Vec<String>) {
        self.sheets = Some(sheets);
    }

    pub(crate) fn select_sheet(&mut self, name: &str) {
        self.invalidate_columns();
        self.selected_sheet = Some(name.to_owned());
    }

    pub(crate) fn set_columns(&mut self, columns: Vec<String>) {
        self.columns = Some(columns);
    }

    pub(crate) fn configure(&mut self, patch: ChartConfigPatch) {
        self.config.apply(patch);
    }

    pub(crate) fn store_payload(&mut self, payload: RenderablePayload) {
        self.clear_output();
        self.output = Some(ChartOutput::Payload(payload));
    }

    pub(crate) fn store_artifact(
        &mut self,
        bytes: Vec<u8>,
        extension: &str,
        media_type: String,
    ) -> ArtifactHandle {
        self.clear_output();
        let handle = self.artifacts.insert(bytes, extension, media_type);
        self.output = Some(ChartOutput::Artifact(handle.clone()));
        handle
    }

    /// Drops the current result and revokes its artifact, if any.
    pub(crate) fn clear_output(&mut self) {
        if let Some(ChartOutput::Artifact(handle)) = self.output.take() {
            self.artifacts.revoke(&handle);
        }
    }

    /// Returns every field to its initial value and revokes all artifacts.
    pub(crate) fn clear(&mut self) {
        self.discard_source();
        self.config = ChartConfig::default();
        self.artifacts.revoke_all();
    }

    fn invalidate_columns(&mut self) {
        self.columns = None;
        self.config.clear_selections();
        self.clear_output();
    }
}
