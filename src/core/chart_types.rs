use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Chart kinds understood by the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
    Histogram,
    Box,
    Area,
    Polar,
    Treemap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 9] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Pie,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Area,
        ChartKind::Polar,
        ChartKind::Treemap,
    ];

    /// Wire value sent as the `chart_type` form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Histogram => "histogram",
            Self::Box => "box",
            Self::Area => "area",
            Self::Polar => "polar",
            Self::Treemap => "treemap",
        }
    }

    /// Whether the chart plots both an X and a Y column.
    ///
    /// Kinds outside this subset ignore any configured Y column.
    #[must_use]
    pub const fn requires_y_column(self) -> bool {
        matches!(
            self,
            Self::Bar | Self::Line | Self::Scatter | Self::Box | Self::Area | Self::Polar
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PipelineError::InvalidData(format!("unknown chart kind `{s}`")))
    }
}

/// Requested response shape for a generation call.
///
/// `Preview` yields a renderable payload; every other variant yields an
/// opaque binary artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "json")]
    Preview,
    Png,
    Jpeg,
    Svg,
    Pdf,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Preview,
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Svg,
        OutputFormat::Pdf,
        OutputFormat::Webp,
    ];

    /// Wire value sent as the `format` form field.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Preview => "json",
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Webp => "webp",
        }
    }

    #[must_use]
    pub const fn is_binary(self) -> bool {
        !matches!(self, Self::Preview)
    }

    /// Extension of the downloadable artifact (`chart.<extension>`).
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.code()
    }

    /// Media type assumed when the service omits `Content-Type`.
    #[must_use]
    pub const fn fallback_media_type(self) -> &'static str {
        match self {
            Self::Preview => "application/json",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OutputFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("preview") {
            return Ok(Self::Preview);
        }
        if s.eq_ignore_ascii_case("jpg") {
            return Ok(Self::Jpeg);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| PipelineError::InvalidData(format!("unknown output format `{s}`")))
    }
}
