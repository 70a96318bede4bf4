/// Infuses meta locale messages back into component files
///
/// Every component is parsed into its blocks, each message block is rewritten
/// from its matching meta entry (or from its own content when the entry does
/// not match), and entries without a block are appended as new blocks.
pub mod merger;
pub mod tag;

pub use merger::{resolve, ContentBuilder, Merged, Resolution};
pub use tag::{build_tag, escape};

use crate::config::InfuseConfig;
use crate::formats::{format_component, FormatError, Representation};
use crate::meta::{MessageEntry, MetaLocaleMessage};
use crate::sfc::{DescriptorParser, ParseError, SfcDescriptor, SfcFile, SfcParser};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfuseError {
    #[error("Failed to parse `{path}`: {source}")]
    Parse { path: String, source: ParseError },

    #[error("`{path}` has {blocks} message blocks but only {entries} meta entries")]
    MissingEntries {
        path: String,
        blocks: usize,
        entries: usize,
    },

    #[error("Block {index} of `{path}` spans {start}..{end}, outside the {len} byte source")]
    BlockRange {
        path: String,
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Failed to format {lang} messages of block {index} in `{path}`: {source}")]
    Format {
        path: String,
        index: usize,
        lang: Representation,
        source: FormatError,
    },
}

/// A rebuilt component, ready to be written back to `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuiltFile {
    pub path: String,
    pub content: String,
    /// Message blocks that kept their own messages because the meta entry did not match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_updates: Vec<usize>,
}

impl From<RebuiltFile> for SfcFile {
    fn from(file: RebuiltFile) -> Self {
        SfcFile::new(file.path, file.content)
    }
}

pub struct Infuser<P = SfcParser> {
    parser: P,
    config: InfuseConfig,
}

impl Infuser<SfcParser> {
    pub fn new(config: InfuseConfig) -> Self {
        let parser = SfcParser::new(config.block_tag.clone());
        Self { parser, config }
    }
}

impl Default for Infuser<SfcParser> {
    fn default() -> Self {
        Self::new(InfuseConfig::default())
    }
}

impl<P: DescriptorParser> Infuser<P> {
    pub fn with_parser(parser: P, config: InfuseConfig) -> Self {
        Self { parser, config }
    }

    /// Rebuild every file, in input order. Stops at the first failure.
    pub fn infuse(
        &self,
        base_path: &str,
        files: &[SfcFile],
        meta: &MetaLocaleMessage,
    ) -> Result<Vec<RebuiltFile>, InfuseError> {
        files
            .iter()
            .map(|file| self.infuse_file(base_path, file, meta))
            .collect()
    }

    /// Rebuild a single file. Either the whole content is produced or nothing.
    pub fn infuse_file(
        &self,
        base_path: &str,
        file: &SfcFile,
        meta: &MetaLocaleMessage,
    ) -> Result<RebuiltFile, InfuseError> {
        let descriptor = self
            .parser
            .parse(base_path, file)
            .map_err(|source| InfuseError::Parse {
                path: file.path.clone(),
                source,
            })?;
        let entries = meta.entries_for(&descriptor.content_path);
        self.generate(&descriptor, entries)
    }

    fn generate(
        &self,
        descriptor: &SfcDescriptor,
        entries: &[MessageEntry],
    ) -> Result<RebuiltFile, InfuseError> {
        debug!(
            "{}: {} target message entries",
            descriptor.content_path,
            entries.len()
        );

        let blocks = descriptor.blocks();
        let merged = ContentBuilder::new(
            &descriptor.content_path,
            &descriptor.raw,
            entries,
            &self.config,
        )
        .build(&blocks)?;

        Ok(RebuiltFile {
            path: descriptor.content_path.clone(),
            content: format_component(&merged.content),
            skipped_updates: merged.skipped_updates,
        })
    }
}

/// Rebuild `files` with the default configuration.
pub fn infuse(
    base_path: &str,
    files: &[SfcFile],
    meta: &MetaLocaleMessage,
) -> Result<Vec<RebuiltFile>, InfuseError> {
    Infuser::new(InfuseConfig::default()).infuse(base_path, files, meta)
}
