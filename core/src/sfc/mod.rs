/// Single-file component model: files, descriptors and their top-level blocks
pub mod parser;

pub use parser::SfcParser;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A component file as read from (and written back to) storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SfcFile {
    pub path: String,
    pub content: String,
}

impl SfcFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("element <{tag}> opened at byte {offset} is never closed")]
    UnclosedElement { tag: String, offset: usize },

    #[error("comment opened at byte {offset} is never closed")]
    UnclosedComment { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Template,
    Script,
    Style,
    /// A custom block carrying locale messages
    Messages,
    /// Any other custom block, by tag name
    Custom(String),
}

impl BlockKind {
    pub fn is_messages(&self) -> bool {
        matches!(self, Self::Messages)
    }
}

/// A top-level element of a component.
///
/// `start..end` is the byte range of the element's inner content within the raw
/// file; the opening and closing tags lie outside of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub start: usize,
    pub end: usize,
    /// Attribute name to value; `None` for boolean attributes
    pub attrs: BTreeMap<String, Option<String>>,
    pub content: String,
}

impl Block {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(|v| v.as_deref())
    }

    pub fn lang(&self) -> Option<&str> {
        self.attr("lang")
    }

    pub fn locale(&self) -> Option<&str> {
        self.attr("locale")
    }
}

#[derive(Debug, Clone, Default)]
pub struct SfcDescriptor {
    /// Path identifying which meta entries apply to this file
    pub content_path: String,
    /// File stem of the component
    pub component: String,
    /// Directory segments below the base path, ending with the component name
    pub hierarchy: Vec<String>,
    pub raw: String,
    pub template: Option<Block>,
    pub script: Option<Block>,
    pub styles: Vec<Block>,
    pub custom_blocks: Vec<Block>,
}

impl SfcDescriptor {
    /// All blocks ordered by their position in the raw file.
    pub fn blocks(&self) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.styles.iter().chain(self.custom_blocks.iter()).collect();
        blocks.extend(self.template.as_ref());
        blocks.extend(self.script.as_ref());
        blocks.sort_by_key(|b| b.start);
        blocks
    }

    pub fn message_blocks(&self) -> impl Iterator<Item = &Block> {
        self.custom_blocks.iter().filter(|b| b.kind.is_messages())
    }
}

/// Turns a component file into its descriptor
pub trait DescriptorParser {
    fn parse(&self, base_path: &str, file: &SfcFile) -> Result<SfcDescriptor, ParseError>;
}
