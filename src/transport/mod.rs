//! Transport adapter for the remote chart service.
//!
//! Each operation is one request/response cycle with no retry. Failures are
//! folded into [`TransportError`], which only carries the attempted
//! operation and a diagnostic message.

mod config;
mod http;
mod wire;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ChartConfig, RenderablePayload, SourceFile};

pub use config::ServiceConfig;
pub use http::HttpChartService;
pub use wire::{
    COLUMNS_PATH, GENERATE_PATH, UPLOAD_PATH, decode_generate_body, decode_name_list,
    generate_fields,
};

/// Operation names attached to transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    DiscoverSheets,
    DiscoverColumns,
    GenerateChart,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DiscoverSheets => "discover_sheets",
            Self::DiscoverColumns => "discover_columns",
            Self::GenerateChart => "generate_chart",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which metadata discovery call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryStage {
    Sheets,
    Columns,
}

impl DiscoveryStage {
    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::Sheets => Operation::DiscoverSheets,
            Self::Columns => Operation::DiscoverColumns,
        }
    }
}

impl fmt::Display for DiscoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sheets => "sheets",
            Self::Columns => "columns",
        })
    }
}

/// Uniform failure of a single transport operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct TransportError {
    pub operation: Operation,
    pub message: String,
}

impl TransportError {
    #[must_use]
    pub fn new(operation: Operation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Raw outcome of a generation call, before it becomes a session result.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedChart {
    Payload(RenderablePayload),
    Binary {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
}

/// Contract of the remote metadata and chart-generation service.
///
/// The pipeline only talks to the service through this trait, so tests and
/// hosts can swap the HTTP implementation for their own.
#[async_trait]
pub trait ChartService: Send + Sync {
    async fn discover_sheets(&self, file: &SourceFile) -> Result<Vec<String>, TransportError>;

    async fn discover_columns(
        &self,
        file: &SourceFile,
        sheet: &str,
    ) -> Result<Vec<String>, TransportError>;

    async fn generate_chart(
        &self,
        file: &SourceFile,
        sheet: &str,
        config: &ChartConfig,
    ) -> Result<GeneratedChart, TransportError>;
}
