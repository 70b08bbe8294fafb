//! Editor configuration, populated from environment variables.

use crate::audit::DEFAULT_MIN_TITLE_LEN;
use crate::types::Position;

/// Row layout used when the canonical order is laid out left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Position of the first block in the row.
    pub origin: Position,
    /// Horizontal distance between consecutive blocks.
    pub spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: Position::new(80.0, 160.0),
            spacing: 360.0,
        }
    }
}

/// Runtime configuration for an [`EditorStore`](crate::EditorStore).
///
/// Every field has a default, so a store works with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PGRAPH_LAYOUT_X` | `80` | x of the first block in the inline layout |
/// | `PGRAPH_LAYOUT_Y` | `160` | y of the inline layout row |
/// | `PGRAPH_LAYOUT_SPACING` | `360` | horizontal spacing between blocks |
/// | `PGRAPH_COPY_SUFFIX` | ` (Copy)` | appended to duplicated titles |
/// | `PGRAPH_AUDIT_MIN_TITLE` | `3` | trimmed title length the audit preview approves |
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub layout: LayoutConfig,

    /// Where a block lands when the caller gives no position.
    pub default_position: Position,

    /// Offset applied to a duplicate's position, on both axes.
    pub duplicate_offset: f64,

    /// Suffix appended to a duplicated block's title.
    pub copy_suffix: String,

    /// Minimum trimmed title length for the audit preview to approve.
    pub min_audit_title_len: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            default_position: Position::new(250.0, 250.0),
            duplicate_offset: 50.0,
            copy_suffix: " (Copy)".into(),
            min_audit_title_len: DEFAULT_MIN_TITLE_LEN,
        }
    }
}

impl EditorConfig {
    /// Populate config from environment variables, applying defaults where
    /// absent or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let layout = LayoutConfig {
            origin: Position::new(
                env_parse("PGRAPH_LAYOUT_X").unwrap_or(defaults.layout.origin.x),
                env_parse("PGRAPH_LAYOUT_Y").unwrap_or(defaults.layout.origin.y),
            ),
            spacing: env_parse("PGRAPH_LAYOUT_SPACING").unwrap_or(defaults.layout.spacing),
        };

        Self {
            layout,
            copy_suffix: std::env::var("PGRAPH_COPY_SUFFIX").unwrap_or(defaults.copy_suffix),
            min_audit_title_len: env_parse("PGRAPH_AUDIT_MIN_TITLE")
                .unwrap_or(defaults.min_audit_title_len),
            ..defaults
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("config: ignoring unparsable {key}={raw:?}");
            None
        }
    }
}
