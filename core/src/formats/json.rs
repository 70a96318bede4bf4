/// JSON message handler
/// Prints like `JSON.stringify(messages, null, indent)`

use super::{FormatError, MessageFormat, Representation};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFormat for JsonHandler {
    fn decode(&self, content: &str) -> Result<Value, FormatError> {
        serde_json::from_str(content)
            .map_err(|e| FormatError::ParseError(format!("JSON parse error: {}", e)))
    }

    fn pretty(&self, messages: &Value, indent: usize) -> Result<String, FormatError> {
        let indent = " ".repeat(indent);
        let mut buf = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        messages
            .serialize(&mut serializer)
            .map_err(|e| FormatError::SerializationError(format!("JSON serialize error: {}", e)))?;

        let mut out = String::from_utf8(buf)
            .map_err(|e| FormatError::SerializationError(format!("JSON serialize error: {}", e)))?;
        out.push('\n');
        Ok(out)
    }

    fn representation(&self) -> Representation {
        Representation::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_key_order() {
        let handler = JsonHandler::new();
        let value = handler.decode(r#"{"zeta": "z", "alpha": "a"}"#).unwrap();
        let printed = handler.pretty(&value, 2).unwrap();
        assert_eq!(printed, "{\n  \"zeta\": \"z\",\n  \"alpha\": \"a\"\n}\n");
    }

    #[test]
    fn honours_indent_width() {
        let handler = JsonHandler::new();
        let printed = handler.pretty(&json!({"a": ["b"]}), 4).unwrap();
        assert_eq!(printed, "{\n    \"a\": [\n        \"b\"\n    ]\n}\n");
    }

    #[test]
    fn rejects_relaxed_syntax() {
        let handler = JsonHandler::new();
        assert!(handler.decode("{a: 'b'}").is_err());
    }
}
