use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::{ArtifactHandle, ChartConfigPatch, ChartOutput, MissingField, SourceFile};
use crate::error::{PipelineError, PipelineResult};
use crate::transport::{ChartService, DiscoveryStage, GeneratedChart, Operation, TransportError};

use super::request::Outcome;
use super::{
    ApplyOutcome, Completion, FailureKind, MAX_QUEUED_NOTICES, Notice, PendingRequest,
    PipelineState, RequestTag, SessionState,
};

/// State machine sequencing upload, sheet and column discovery, and chart
/// generation against a [`ChartService`].
///
/// Transitions are synchronous: each one updates the session and returns the
/// request to send, if any. Completions come back through [`Self::apply`],
/// which drops responses issued for an earlier generation.
///
/// While a generation request is outstanding, further [`Self::generate`]
/// calls are rejected with [`PipelineError::GenerationInFlight`].
///
/// Failures queue a [`Notice`]; hosts drain them with [`Self::take_notices`].
/// At most [`MAX_QUEUED_NOTICES`] are kept, older ones are dropped first.
pub struct PipelineController<S> {
    service: Arc<S>,
    session: SessionState,
    state: PipelineState,
    generation: u64,
    sequence: u64,
    notices: Vec<Notice>,
}

impl<S: ChartService> PipelineController<S> {
    pub fn new(service: S) -> Self {
        Self::with_shared_service(Arc::new(service))
    }

    pub fn with_shared_service(service: Arc<S>) -> Self {
        Self {
            service,
            session: SessionState::new(),
            state: PipelineState::Idle,
            generation: 0,
            sequence: 0,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Raw state, including [`PipelineState::Error`] after a failed transition.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// State used to validate the next operation. After a failure this is
    /// the state the pipeline resumed in.
    #[must_use]
    pub fn phase(&self) -> PipelineState {
        match self.state {
            PipelineState::Error(_) => self.session.settled_state(),
            state => state,
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn output(&self) -> Option<&ChartOutput> {
        self.session.output()
    }

    #[must_use]
    pub fn resolve_artifact(&self, handle: &ArtifactHandle) -> Option<&[u8]> {
        self.session.resolve_artifact(handle)
    }

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Stores `file` as the new source and requests its sheet names.
    ///
    /// Valid from any state. Everything derived from a previous file is
    /// cleared first, and any outstanding request becomes stale.
    pub fn submit_file(&mut self, file: SourceFile) -> PendingRequest<S> {
        let generation = self.advance_generation();
        self.session.replace_source(file.clone());
        self.state = PipelineState::AwaitingSheets;
        debug!(
            generation,
            file = file.name(),
            len = file.len(),
            "submitted source file"
        );
        let tag = self.issue(Operation::DiscoverSheets);
        PendingRequest::sheets(Arc::clone(&self.service), tag, file)
    }

    /// Submits the built-in sample dataset.
    pub fn submit_sample(&mut self) -> PendingRequest<S> {
        self.submit_file(SourceFile::sample())
    }

    /// Selects a discovered sheet and requests its columns.
    ///
    /// Returns `None` (and changes nothing) unless sheets are ready and
    /// `name` is one of them. Reselecting the current sheet fetches again.
    pub fn select_sheet(&mut self, name: &str) -> Option<PendingRequest<S>> {
        let phase = self.phase();
        if !phase.has_reached(PipelineState::SheetsReady) || !self.session.has_sheet(name) {
            trace!(sheet = name, state = ?phase, "ignoring sheet selection");
            return None;
        }
        let file = self.session.source()?.clone();

        let generation = self.advance_generation();
        self.session.select_sheet(name);
        self.state = PipelineState::AwaitingColumns;
        debug!(generation, sheet = name, "selected sheet");
        let tag = self.issue(Operation::DiscoverColumns);
        Some(PendingRequest::columns(
            Arc::clone(&self.service),
            tag,
            file,
            name.to_owned(),
        ))
    }

    /// Merges `patch` into the chart configuration without issuing a request.
    ///
    /// Returns `false` when columns are not ready yet.
    pub fn configure_chart(&mut self, patch: ChartConfigPatch) -> bool {
        let phase = self.phase();
        if !phase.has_reached(PipelineState::ColumnsReady) {
            trace!(state = ?phase, "ignoring chart configuration");
            return false;
        }
        trace!(?patch, "configure chart");
        self.session.configure(patch);
        true
    }

    /// Validates the configuration and requests a chart.
    pub fn generate(&mut self) -> PipelineResult<PendingRequest<S>> {
        let phase = self.phase();
        if phase == PipelineState::Generating {
            return Err(PipelineError::GenerationInFlight);
        }

        let Some(file) = self.session.source().cloned() else {
            return Err(self.reject_generate(MissingField::SourceFile));
        };
        let Some(sheet) = self.session.selected_sheet().map(str::to_owned) else {
            return Err(self.reject_generate(MissingField::Sheet));
        };
        if !matches!(
            phase,
            PipelineState::ColumnsReady | PipelineState::ResultReady
        ) {
            return Err(PipelineError::InvalidTransition {
                operation: "generate",
                state: phase,
            });
        }
        if let Err(missing) = self.session.config().check_columns() {
            return Err(self.reject_generate(missing));
        }

        let config = self.session.config().clone();
        self.state = PipelineState::Generating;
        let tag = self.issue(Operation::GenerateChart);
        debug!(
            generation = tag.generation,
            sequence = tag.sequence,
            kind = config.kind.as_str(),
            format = config.format.code(),
            "requesting chart"
        );
        Ok(PendingRequest::chart(
            Arc::clone(&self.service),
            tag,
            file,
            sheet,
            config,
        ))
    }

    /// Discards every entity, revokes live artifacts, and returns to `Idle`.
    pub fn reset(&mut self) {
        let generation = self.advance_generation();
        let revoked = self.session.artifacts().live_count();
        self.session.clear();
        self.state = PipelineState::Idle;
        debug!(generation, revoked, "pipeline reset");
    }

    /// Applies a completion if it is still current.
    pub fn apply(&mut self, completion: Completion) -> ApplyOutcome {
        let Completion { tag, outcome } = completion;
        if tag.generation != self.generation
            || tag.sequence != self.sequence
            || self.state.awaited_operation() != Some(tag.operation)
        {
            warn!(
                operation = tag.operation.as_str(),
                issued_generation = tag.generation,
                current_generation = self.generation,
                issued_sequence = tag.sequence,
                current_sequence = self.sequence,
                state = ?self.state,
                "discarding stale response"
            );
            return ApplyOutcome::Discarded;
        }

        match outcome {
            Outcome::Sheets(result) => self.apply_sheets(result),
            Outcome::Columns(result) => self.apply_columns(result),
            Outcome::Chart { format, result } => {
                let result = result.and_then(|chart| match (format.is_binary(), chart) {
                    (false, chart @ GeneratedChart::Payload(_))
                    | (true, chart @ GeneratedChart::Binary { .. }) => Ok(chart),
                    _ => Err(TransportError::new(
                        Operation::GenerateChart,
                        format!(
                            "response shape does not match requested format `{}`",
                            format.code()
                        ),
                    )),
                });
                self.apply_chart(format.extension(), format.fallback_media_type(), result)
            }
        }
    }

    /// Sends `pending` and applies its completion.
    pub async fn drive(&mut self, pending: PendingRequest<S>) -> ApplyOutcome {
        let completion = pending.send().await;
        self.apply(completion)
    }

    fn apply_sheets(&mut self, result: Result<Vec<String>, TransportError>) -> ApplyOutcome {
        match result {
            Ok(sheets) => {
                if sheets.is_empty() {
                    warn!("service reported no sheets");
                }
                debug!(count = sheets.len(), "sheets discovered");
                self.session.set_sheets(sheets);
                self.state = PipelineState::SheetsReady;
                ApplyOutcome::Applied
            }
            Err(source) => {
                self.session.discard_source();
                self.fail(
                    FailureKind::DiscoveryFailed(DiscoveryStage::Sheets),
                    PipelineError::DiscoveryFailed {
                        stage: DiscoveryStage::Sheets,
                        source,
                    },
                )
            }
        }
    }

    fn apply_columns(&mut self, result: Result<Vec<String>, TransportError>) -> ApplyOutcome {
        match result {
            Ok(columns) => {
                debug!(count = columns.len(), "columns discovered");
                self.session.set_columns(columns);
                self.state = PipelineState::ColumnsReady;
                ApplyOutcome::Applied
            }
            Err(source) => self.fail(
                FailureKind::DiscoveryFailed(DiscoveryStage::Columns),
                PipelineError::DiscoveryFailed {
                    stage: DiscoveryStage::Columns,
                    source,
                },
            ),
        }
    }

    fn apply_chart(
        &mut self,
        extension: &str,
        fallback_media_type: &str,
        result: Result<GeneratedChart, TransportError>,
    ) -> ApplyOutcome {
        match result {
            Ok(GeneratedChart::Payload(payload)) => {
                debug!(traces = payload.trace_count(), "chart payload stored");
                self.session.store_payload(payload);
            }
            Ok(GeneratedChart::Binary {
                bytes,
                content_type,
            }) => {
                let media_type = content_type
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| fallback_media_type.to_owned());
                let handle = self.session.store_artifact(bytes, extension, media_type);
                debug!(
                    artifact = handle.id().get(),
                    file = %handle.file_name(),
                    len = handle.len(),
                    "chart artifact stored"
                );
            }
            Err(err) => {
                return self.fail(
                    FailureKind::GenerationFailed,
                    PipelineError::GenerationFailed(err),
                );
            }
        }
        self.state = PipelineState::ResultReady;
        ApplyOutcome::Applied
    }

    fn fail(&mut self, kind: FailureKind, error: PipelineError) -> ApplyOutcome {
        warn!(error = %error, "pipeline transition failed");
        self.state = PipelineState::Error(kind);
        self.push_notice(Notice::for_error(error.clone()));
        ApplyOutcome::Failed(error)
    }

    fn reject_generate(&mut self, missing: MissingField) -> PipelineError {
        let error = PipelineError::ValidationFailed(missing);
        debug!(missing = %missing, "chart request rejected");
        self.push_notice(Notice::for_error(error.clone()));
        error
    }

    fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_QUEUED_NOTICES {
            let dropped = self.notices.len() + 1 - MAX_QUEUED_NOTICES;
            self.notices.drain(..dropped);
            trace!(dropped, "notice queue full");
        }
        self.notices.push(notice);
    }

    /// Tags a new request; every earlier request becomes unappliable.
    fn issue(&mut self, operation: Operation) -> RequestTag {
        self.sequence += 1;
        RequestTag {
            generation: self.generation,
            sequence: self.sequence,
            operation,
        }
    }

    fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
