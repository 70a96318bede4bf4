/// Configuration for the infuser
use crate::formats::INDENT_WIDTH;
use crate::sfc::parser::DEFAULT_MESSAGE_TAG;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What to do with a component that has more message blocks than meta entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MissingEntryPolicy {
    /// Reject the component
    #[default]
    Fail,
    /// Keep the block's own messages, reformatted
    KeepOriginal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfuseConfig {
    /// Tag name of message blocks
    #[serde(default = "default_block_tag")]
    pub block_tag: String,

    /// Indentation of JSON and JSON5 payloads; YAML always uses two spaces
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    #[serde(default)]
    pub missing_entries: MissingEntryPolicy,
}

fn default_block_tag() -> String {
    DEFAULT_MESSAGE_TAG.to_string()
}

fn default_indent_width() -> usize {
    INDENT_WIDTH
}

impl Default for InfuseConfig {
    fn default() -> Self {
        Self {
            block_tag: default_block_tag(),
            indent_width: default_indent_width(),
            missing_entries: MissingEntryPolicy::default(),
        }
    }
}

impl InfuseConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Load from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse JSON config: {}", e))
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e))
    }
}
