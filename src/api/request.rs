use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{ChartConfig, OutputFormat, SourceFile};
use crate::error::PipelineError;
use crate::transport::{ChartService, GeneratedChart, Operation, TransportError};

/// Identifies the session generation, request, and operation a request was
/// issued for.
///
/// The generation advances on every submit, sheet selection, and reset; a
/// completion whose generation is behind the controller's is stale. The
/// sequence is unique per issued request, so only the latest request of a
/// generation can be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTag {
    pub generation: u64,
    pub sequence: u64,
    pub operation: Operation,
}

#[derive(Debug, Clone)]
enum RequestKind {
    Sheets,
    Columns { sheet: String },
    Chart { sheet: String, config: ChartConfig },
}

/// A request whose state changes are already applied, waiting to be sent.
///
/// Owns everything it needs, so sending it borrows nothing from the
/// controller. Feed the resulting [`Completion`] back through
/// [`super::PipelineController::apply`]; dropping it unsent leaves the
/// controller waiting until the next upstream change.
#[must_use = "a pending request does nothing until it is sent and applied"]
pub struct PendingRequest<S> {
    service: Arc<S>,
    tag: RequestTag,
    file: SourceFile,
    kind: RequestKind,
}

impl<S> PendingRequest<S> {
    pub(crate) fn sheets(service: Arc<S>, tag: RequestTag, file: SourceFile) -> Self {
        Self {
            service,
            tag,
            file,
            kind: RequestKind::Sheets,
        }
    }

    pub(crate) fn columns(service: Arc<S>, tag: RequestTag, file: SourceFile, sheet: String) -> Self {
        Self {
            service,
            tag,
            file,
            kind: RequestKind::Columns { sheet },
        }
    }

    pub(crate) fn chart(
        service: Arc<S>,
        tag: RequestTag,
        file: SourceFile,
        sheet: String,
        config: ChartConfig,
    ) -> Self {
        Self {
            service,
            tag,
            file,
            kind: RequestKind::Chart { sheet, config },
        }
    }

    #[must_use]
    pub fn tag(&self) -> RequestTag {
        self.tag
    }

    #[must_use]
    pub fn file(&self) -> &SourceFile {
        &self.file
    }
}

impl<S: ChartService> PendingRequest<S> {
    /// Performs the single request/response cycle.
    pub async fn send(self) -> Completion {
        let Self {
            service,
            tag,
            file,
            kind,
        } = self;

        let outcome = match kind {
            RequestKind::Sheets => Outcome::Sheets(service.discover_sheets(&file).await),
            RequestKind::Columns { sheet } => {
                Outcome::Columns(service.discover_columns(&file, &sheet).await)
            }
            RequestKind::Chart { sheet, config } => Outcome::Chart {
                format: config.format,
                result: service.generate_chart(&file, &sheet, &config).await,
            },
        };
        Completion { tag, outcome }
    }
}

impl<S> fmt::Debug for PendingRequest<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("tag", &self.tag)
            .field("file", &self.file)
            .field("kind", &self.kind)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Sheets(Result<Vec<String>, TransportError>),
    Columns(Result<Vec<String>, TransportError>),
    Chart {
        format: OutputFormat,
        result: Result<GeneratedChart, TransportError>,
    },
}

/// Response of a sent [`PendingRequest`], tagged with its issue generation.
#[derive(Debug, Clone)]
pub struct Completion {
    pub(crate) tag: RequestTag,
    pub(crate) outcome: Outcome,
}

impl Completion {
    #[must_use]
    pub fn tag(&self) -> RequestTag {
        self.tag
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        match &self.outcome {
            Outcome::Sheets(result) | Outcome::Columns(result) => result.is_ok(),
            Outcome::Chart { result, .. } => result.is_ok(),
        }
    }
}

/// What [`super::PipelineController::apply`] did with a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ApplyOutcome {
    /// The response was current and the session now reflects it.
    Applied,
    /// The response belonged to a superseded generation and was ignored.
    Discarded,
    /// The response was current but reported a failure; a notice was queued.
    Failed(PipelineError),
}

impl ApplyOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub fn is_discarded(&self) -> bool {
        matches!(self, Self::Discarded)
    }
}
