mod artifact;
mod chart_config;
mod chart_types;
mod color;
mod output;
mod payload;
mod source_file;

pub use artifact::{ArtifactHandle, ArtifactId, ArtifactStore};
pub use chart_config::{ChartConfig, ChartConfigPatch, DEFAULT_CHART_TITLE, MissingField};
pub use chart_types::{ChartKind, OutputFormat};
pub use color::RgbColor;
pub use output::{ChartOutput, ChartOutputKind};
pub use payload::RenderablePayload;
pub use source_file::{SourceFile, media_type_for_name};
