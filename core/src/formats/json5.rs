/// JSON5 message handler
/// Identifier keys are printed bare, strings use whichever quote needs fewer escapes

use super::{FormatError, MessageFormat, Representation};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::fmt::Write;

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

pub struct Json5Handler;

impl Json5Handler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Json5Handler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFormat for Json5Handler {
    fn decode(&self, content: &str) -> Result<Value, FormatError> {
        json5::from_str(content)
            .map_err(|e| FormatError::ParseError(format!("JSON5 parse error: {}", e)))
    }

    fn pretty(&self, messages: &Value, indent: usize) -> Result<String, FormatError> {
        let mut out = String::new();
        write_value(&mut out, messages, indent, 0)
            .map_err(|e| FormatError::SerializationError(format!("JSON5 serialize error: {}", e)))?;
        out.push('\n');
        Ok(out)
    }

    fn representation(&self) -> Representation {
        Representation::Json5
    }
}

fn write_value(out: &mut String, value: &Value, indent: usize, depth: usize) -> std::fmt::Result {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => write!(out, "{}", b)?,
        Value::Number(n) => write!(out, "{}", n)?,
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return Ok(());
            }
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_value(out, item, indent, depth + 1)?;
            }
            newline(out, indent, depth);
            out.push(']');
        }
        Value::Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return Ok(());
            }
            out.push('{');
            for (idx, (key, item)) in map.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                if IDENTIFIER_RE.is_match(key) {
                    out.push_str(key);
                } else {
                    write_string(out, key);
                }
                out.push_str(": ");
                write_value(out, item, indent, depth + 1)?;
            }
            newline(out, indent, depth);
            out.push('}');
        }
    }
    Ok(())
}

fn newline(out: &mut String, indent: usize, depth: usize) {
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(indent * depth));
}

fn write_string(out: &mut String, s: &str) {
    let doubles = s.matches('"').count();
    let singles = s.matches('\'').count();
    let quote = if doubles > singles { '\'' } else { '"' };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
