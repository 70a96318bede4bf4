/// Extracts meta locale messages from component files
///
/// The inverse of infusing: every message block becomes one meta entry, so a
/// squeeze followed by an infuse leaves the messages as they were.
use crate::formats::{parse_content, FormatError, Representation};
use crate::infuser::InfuseError;
use crate::meta::{MessageEntry, MetaLocaleMessage};
use crate::sfc::{Block, DescriptorParser, SfcFile, SfcParser};
use log::debug;
use serde_json::Map;

pub fn squeeze(base_path: &str, files: &[SfcFile]) -> Result<MetaLocaleMessage, InfuseError> {
    squeeze_with(&SfcParser::default(), base_path, files)
}

pub fn squeeze_with<P: DescriptorParser>(
    parser: &P,
    base_path: &str,
    files: &[SfcFile],
) -> Result<MetaLocaleMessage, InfuseError> {
    let mut meta = MetaLocaleMessage {
        target: base_path.to_string(),
        ..Default::default()
    };

    for file in files {
        let descriptor = parser
            .parse(base_path, file)
            .map_err(|source| InfuseError::Parse {
                path: file.path.clone(),
                source,
            })?;

        let mut blocks: Vec<&Block> = descriptor.message_blocks().collect();
        blocks.sort_by_key(|b| b.start);

        let entries = blocks
            .into_iter()
            .enumerate()
            .map(|(index, block)| {
                to_entry(block).map_err(|(lang, source)| InfuseError::Format {
                    path: descriptor.content_path.clone(),
                    index,
                    lang,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("{}: squeezed {} message blocks", descriptor.content_path, entries.len());
        meta.components.insert(descriptor.content_path, entries);
    }

    Ok(meta)
}

fn to_entry(block: &Block) -> Result<MessageEntry, (Representation, FormatError)> {
    let lang = Representation::from_tag(block.lang());
    let decoded = parse_content(&block.content, lang).map_err(|e| (lang, e))?;

    Ok(match block.locale() {
        Some(locale) => {
            let mut messages = Map::new();
            messages.insert(locale.to_string(), decoded);
            MessageEntry::Localized {
                lang,
                locale: locale.to_string(),
                messages,
            }
        }
        None => MessageEntry::Unlocalized {
            lang,
            messages: decoded,
        },
    })
}
