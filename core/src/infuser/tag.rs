/// Serializes meta entries that have no block in the component yet
use crate::formats::{pretty, FormatError, Representation};
use crate::meta::MessageEntry;
use serde_json::{Map, Value};

/// Escape a value for use inside a double-quoted attribute.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// Build a complete message block for `entry`, preceded by a blank line.
pub fn build_tag(entry: &MessageEntry, tag_name: &str, indent: usize) -> Result<String, FormatError> {
    let mut tag = format!("<{}", tag_name);
    if let Some(locale) = entry.locale() {
        tag.push_str(&format!(" locale=\"{}\"", escape(locale)));
    }
    if entry.lang() != Representation::Json {
        tag.push_str(&format!(" lang=\"{}\"", escape(entry.lang().tag())));
    }
    tag.push('>');

    let empty = Value::Object(Map::new());
    let messages = entry.payload().unwrap_or(&empty);
    let body = pretty(messages, entry.lang(), indent)?;

    Ok(format!("\n\n{}\n{}</{}>", tag, body, tag_name))
}
