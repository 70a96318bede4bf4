/// Top-level block scanner for single-file components
///
/// Only the outermost elements are recognised. `<template>` may nest further
/// `<template>` elements; every other block is raw text up to its first
/// matching closing tag.

use super::{Block, BlockKind, DescriptorParser, ParseError, SfcDescriptor, SfcFile};
use log::{trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Component, Path};

static OPEN_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^<([A-Za-z][A-Za-z0-9_-]*)((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#,
    )
    .expect("valid open tag regex")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

pub const DEFAULT_MESSAGE_TAG: &str = "i18n";

#[derive(Debug, Clone)]
pub struct SfcParser {
    message_tag: String,
}

impl Default for SfcParser {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_TAG)
    }
}

impl SfcParser {
    pub fn new(message_tag: impl Into<String>) -> Self {
        Self {
            message_tag: message_tag.into(),
        }
    }

    pub fn message_tag(&self) -> &str {
        &self.message_tag
    }

    /// Scan `raw` for top-level blocks, in discovery order.
    pub fn parse_blocks(&self, raw: &str) -> Result<Vec<Block>, ParseError> {
        let mut blocks = Vec::new();
        let mut pos = 0;

        while let Some(rel) = raw[pos..].find('<') {
            let at = pos + rel;
            let rest = &raw[at..];

            if rest.starts_with("<!--") {
                let close = rest
                    .find("-->")
                    .ok_or(ParseError::UnclosedComment { offset: at })?;
                pos = at + close + 3;
                continue;
            }

            let Some(caps) = OPEN_TAG_RE.captures(rest) else {
                pos = at + 1;
                continue;
            };

            let name = &caps[1];
            let attrs = caps.get(2).map(|m| parse_attrs(m.as_str())).unwrap_or_default();
            let start = at + caps[0].len();
            let self_closing = !caps[3].is_empty();

            let (end, after) = if self_closing {
                (start, start)
            } else {
                find_close(raw, start, name).ok_or_else(|| ParseError::UnclosedElement {
                    tag: name.to_string(),
                    offset: at,
                })?
            };

            let kind = self.kind_of(name, self_closing);
            trace!("block: type={:?}, start={}, end={}", kind, start, end);
            blocks.push(Block {
                kind,
                start,
                end,
                attrs,
                content: raw[start..end].to_string(),
            });
            pos = after;
        }

        Ok(blocks)
    }

    // A self-closing message tag (`<i18n src="..." />`) has no inline messages.
    fn kind_of(&self, name: &str, self_closing: bool) -> BlockKind {
        match name {
            "template" => BlockKind::Template,
            "script" => BlockKind::Script,
            "style" => BlockKind::Style,
            n if n == self.message_tag && !self_closing => BlockKind::Messages,
            n => BlockKind::Custom(n.to_string()),
        }
    }
}

impl DescriptorParser for SfcParser {
    fn parse(&self, base_path: &str, file: &SfcFile) -> Result<SfcDescriptor, ParseError> {
        let (component, hierarchy) = component_path(base_path, &file.path);
        let mut descriptor = SfcDescriptor {
            content_path: file.path.clone(),
            component,
            hierarchy,
            raw: file.content.clone(),
            ..Default::default()
        };

        for block in self.parse_blocks(&file.content)? {
            match block.kind {
                BlockKind::Template if descriptor.template.is_none() => {
                    descriptor.template = Some(block)
                }
                BlockKind::Script if descriptor.script.is_none() => descriptor.script = Some(block),
                BlockKind::Template | BlockKind::Script => {
                    warn!(
                        "{}: ignoring duplicate {:?} block at byte {}",
                        file.path, block.kind, block.start
                    );
                }
                BlockKind::Style => descriptor.styles.push(block),
                BlockKind::Messages | BlockKind::Custom(_) => descriptor.custom_blocks.push(block),
            }
        }

        Ok(descriptor)
    }
}

fn parse_attrs(source: &str) -> BTreeMap<String, Option<String>> {
    ATTR_RE
        .captures_iter(source)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            (caps[1].to_string(), value)
        })
        .collect()
}

/// Locate the closing tag for `name`, searching from `from`.
/// Returns the byte offset where the closing tag starts and the offset just past it.
fn find_close(raw: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let nests = name == "template";
    let mut depth = 0usize;
    let mut pos = from;

    while let Some(rel) = raw[pos..].find('<') {
        let at = pos + rel;
        let rest = &raw[at..];

        if let Some(tail) = rest.strip_prefix("</").and_then(|r| r.strip_prefix(name)) {
            if tail.starts_with(|c: char| c == '>' || c.is_whitespace()) {
                if depth == 0 {
                    let gt = tail.find('>')?;
                    let after = at + 2 + name.len() + gt + 1;
                    return Some((at, after));
                }
                depth -= 1;
            }
        } else if nests {
            if let Some(tail) = rest.strip_prefix('<').and_then(|r| r.strip_prefix(name)) {
                if tail.starts_with(|c: char| c == '>' || c.is_whitespace()) {
                    depth += 1;
                }
            }
        }
        pos = at + 1;
    }

    None
}

fn component_path(base_path: &str, path: &str) -> (String, Vec<String>) {
    let path = Path::new(path);
    let component = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let relative = dir.strip_prefix(base_path).unwrap_or(dir);
    let mut hierarchy: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => segment.to_str().map(str::to_string),
            _ => None,
        })
        .collect();
    hierarchy.push(component.clone());

    (component, hierarchy)
}
