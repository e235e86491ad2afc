use serde::{Deserialize, Serialize};

use crate::converter::ConverterConfig;
use crate::placer::PlacerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub placer: PlacerConfig,
}

/// Where converted files are written
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Appended to the input folder name to form the output folder name.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default)]
    pub layout: OutputLayout,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            layout: OutputLayout::default(),
        }
    }
}

fn default_suffix() -> String {
    "_wav".to_string()
}

/// Placement of the output folder relative to the input folder.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// `<input>/<name>_wav`
    #[default]
    Nested,
    /// `<input>/../<name>_wav`
    Sibling,
}
