//! Configuration types deserialized from `frost.toml`.

use serde::Deserialize;

/// The top-level codec configuration parsed from `frost.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct CodecConfig {
    /// Default inputs for the device model.
    #[serde(default)]
    pub device: DeviceConfigSection,
    /// Chipdb ingestion strictness.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Bitstream rendering settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// The `[device]` table.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceConfigSection {
    /// Chipdb used when the command line does not name one.
    pub chipdb: Option<String>,
}

/// The `[ingest]` table.
#[derive(Debug, Default, Deserialize)]
pub struct IngestConfig {
    /// What to do when a `.net` index is declared twice.
    #[serde(default)]
    pub duplicate_nets: DuplicateNets,
    /// What to do with section labels the loader does not know.
    #[serde(default)]
    pub unknown_sections: UnknownSections,
}

/// Handling of a net index that is ingested more than once.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateNets {
    /// Fail ingestion (default).
    #[default]
    Reject,
    /// Replace the earlier net, keeping the legacy tool's behaviour.
    Overwrite,
}

/// Handling of unrecognised chipdb section labels.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSections {
    /// Fail ingestion (default).
    #[default]
    Reject,
    /// Skip the section with a warning.
    Skip,
}

/// The `[output]` table.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Emit a `.device <type>` line before the tile sections.
    #[serde(default = "default_true")]
    pub device_line: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { device_line: true }
    }
}

fn default_true() -> bool {
    true
}
