use serde::{Deserialize, Serialize};

use super::{ArtifactHandle, RenderablePayload};

/// Result of a successful generation call.
///
/// Exactly one shape exists at a time; a new result replaces the old one
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartOutput {
    Payload(RenderablePayload),
    Artifact(ArtifactHandle),
}

/// Discriminant of [`ChartOutput`], used in snapshots and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartOutputKind {
    Payload,
    Artifact,
}

impl ChartOutput {
    #[must_use]
    pub fn kind(&self) -> ChartOutputKind {
        match self {
            Self::Payload(_) => ChartOutputKind::Payload,
            Self::Artifact(_) => ChartOutputKind::Artifact,
        }
    }

    #[must_use]
    pub fn payload(&self) -> Option<&RenderablePayload> {
        match self {
            Self::Payload(payload) => Some(payload),
            Self::Artifact(_) => None,
        }
    }

    #[must_use]
    pub fn artifact(&self) -> Option<&ArtifactHandle> {
        match self {
            Self::Payload(_) => None,
            Self::Artifact(handle) => Some(handle),
        }
    }
}
