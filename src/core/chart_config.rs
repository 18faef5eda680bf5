use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ChartKind, OutputFormat, RgbColor};

pub const DEFAULT_CHART_TITLE: &str = "Sales Chart";

/// Field whose absence blocks a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissingField {
    SourceFile,
    Sheet,
    XColumn,
    YColumn,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SourceFile => "source file",
            Self::Sheet => "sheet",
            Self::XColumn => "x column",
            Self::YColumn => "y column",
        })
    }
}

/// Chart parameters sent with a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub x_column: Option<String>,
    /// Only meaningful for two-axis kinds; see [`ChartConfig::effective_y_column`].
    #[serde(default)]
    pub y_column: Option<String>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub color: RgbColor,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            x_column: None,
            y_column: None,
            title: default_title(),
            color: RgbColor::DEFAULT,
            format: OutputFormat::default(),
        }
    }
}

impl ChartConfig {
    /// Y column as the service should see it: `None` for kinds that do not
    /// plot a second axis, even when one is stored.
    #[must_use]
    pub fn effective_y_column(&self) -> Option<&str> {
        if self.kind.requires_y_column() {
            self.y_column.as_deref().filter(|name| !name.trim().is_empty())
        } else {
            None
        }
    }

    /// Checks the column selections required by the current chart kind.
    pub fn check_columns(&self) -> Result<(), MissingField> {
        if is_unset(&self.x_column) {
            return Err(MissingField::XColumn);
        }
        if self.kind.requires_y_column() && is_unset(&self.y_column) {
            return Err(MissingField::YColumn);
        }
        Ok(())
    }

    /// Drops the column selections while keeping kind, title, color, and format.
    pub fn clear_selections(&mut self) {
        self.x_column = None;
        self.y_column = None;
    }

    pub fn apply(&mut self, patch: ChartConfigPatch) {
        let ChartConfigPatch {
            kind,
            x_column,
            y_column,
            title,
            color,
            format,
        } = patch;

        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(x_column) = x_column {
            self.x_column = normalize_column(x_column);
        }
        if let Some(y_column) = y_column {
            self.y_column = normalize_column(y_column);
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(format) = format {
            self.format = format;
        }
    }
}

/// Partial update merged into a [`ChartConfig`].
///
/// Column fields are doubly optional: `None` leaves the selection untouched,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartConfigPatch {
    pub kind: Option<ChartKind>,
    pub x_column: Option<Option<String>>,
    pub y_column: Option<Option<String>>,
    pub title: Option<String>,
    pub color: Option<RgbColor>,
    pub format: Option<OutputFormat>,
}

impl ChartConfigPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: ChartKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn x_column(mut self, column: impl Into<String>) -> Self {
        self.x_column = Some(Some(column.into()));
        self
    }

    #[must_use]
    pub fn y_column(mut self, column: impl Into<String>) -> Self {
        self.y_column = Some(Some(column.into()));
        self
    }

    #[must_use]
    pub fn clear_x_column(mut self) -> Self {
        self.x_column = Some(None);
        self
    }

    #[must_use]
    pub fn clear_y_column(mut self) -> Self {
        self.y_column = Some(None);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn default_title() -> String {
    DEFAULT_CHART_TITLE.to_owned()
}

fn is_unset(column: &Option<String>) -> bool {
    column.as_deref().is_none_or(|name| name.trim().is_empty())
}

// The column pickers use an empty string for "-- Select --".
fn normalize_column(column: Option<String>) -> Option<String> {
    column.filter(|name| !name.trim().is_empty())
}
