/// YAML message handler
use super::{FormatError, MessageFormat, Representation};
use serde_json::Value;

pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFormat for YamlHandler {
    fn decode(&self, content: &str) -> Result<Value, FormatError> {
        serde_yaml::from_str(content)
            .map_err(|e| FormatError::ParseError(format!("YAML parse error: {}", e)))
    }

    // serde_yaml always indents nested mappings by two spaces.
    fn pretty(&self, messages: &Value, _indent: usize) -> Result<String, FormatError> {
        let mut out = serde_yaml::to_string(messages)
            .map_err(|e| FormatError::SerializationError(format!("YAML serialize error: {}", e)))?;
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    fn representation(&self) -> Representation {
        Representation::Yaml
    }
}
