/// Message representations embedded in component files
/// Each handler decodes block content into a message tree and pretty-prints it back
pub mod json;
pub mod json5;
pub mod yaml;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Indentation used for pretty-printed message payloads.
pub const INDENT_WIDTH: usize = 2;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// The textual representation a message block is written in (its `lang` attribute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Representation {
    #[default]
    Json,
    Json5,
    Yaml,
}

impl Representation {
    /// Resolve a `lang` tag. Absent or unrecognized tags fall back to JSON.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("json5") => Self::Json5,
            _ => Self::Json,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Json5 => "json5",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Representation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Representation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(Some(&tag)))
    }
}

/// What a piece of text is being formatted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A whole component file, passed through untouched.
    Component,
    /// A message payload written in the given representation.
    Messages(Representation),
}

/// Trait for representation-specific handlers
pub trait MessageFormat: Send + Sync {
    /// Decode block content into a message tree
    fn decode(&self, content: &str) -> Result<Value, FormatError>;

    /// Pretty-print a message tree, always ending with a newline
    fn pretty(&self, messages: &Value, indent: usize) -> Result<String, FormatError>;

    /// Get the representation this handler supports
    fn representation(&self) -> Representation;
}

/// Get the handler for a representation
pub fn get_handler(representation: Representation) -> Box<dyn MessageFormat> {
    match representation {
        Representation::Json => Box::new(json::JsonHandler::new()),
        Representation::Json5 => Box::new(json5::Json5Handler::new()),
        Representation::Yaml => Box::new(yaml::YamlHandler::new()),
    }
}

/// Decode block content written in `representation`.
pub fn parse_content(content: &str, representation: Representation) -> Result<Value, FormatError> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    get_handler(representation).decode(content)
}

/// Pretty-print a message tree in `representation`.
pub fn pretty(
    messages: &Value,
    representation: Representation,
    indent: usize,
) -> Result<String, FormatError> {
    get_handler(representation).pretty(messages, indent)
}

/// Whole component text passes through unchanged; this never fails.
pub fn format_component(source: &str) -> String {
    source.to_string()
}

/// Format source text for `target`.
///
/// Component text is returned as is. Message text is decoded and re-printed
/// with the fixed indentation width, so malformed input surfaces as an error.
pub fn format(source: &str, target: Target) -> Result<String, FormatError> {
    log::trace!("format: target={:?}, source={}", target, source);
    match target {
        Target::Component => Ok(format_component(source)),
        Target::Messages(representation) => {
            let messages = parse_content(source, representation)?;
            pretty(&messages, representation, INDENT_WIDTH)
        }
    }
}
