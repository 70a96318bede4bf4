/// Rebuilds component content around updated message blocks
use super::tag::build_tag;
use super::InfuseError;
use crate::config::{InfuseConfig, MissingEntryPolicy};
use crate::formats::{parse_content, pretty, FormatError, Representation};
use crate::meta::MessageEntry;
use crate::sfc::Block;
use log::{debug, trace, warn};
use serde_json::Value;

/// Where the payload of a message block comes from.
#[derive(Debug, PartialEq)]
pub enum Resolution<'e> {
    /// The meta entry matches the block; its messages replace the block's
    Update(&'e Value),
    /// The block's own content, decoded
    Keep(Value),
}

impl Resolution<'_> {
    pub fn messages(&self) -> &Value {
        match self {
            Self::Update(messages) => messages,
            Self::Keep(messages) => messages,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }
}

/// Decide which messages a block is written with.
///
/// The entry applies only when its `lang` and `locale` both equal the block's.
/// Otherwise the block's current content is kept.
pub fn resolve<'e>(
    block: &Block,
    entry: Option<&'e MessageEntry>,
) -> Result<Resolution<'e>, FormatError> {
    let lang = Representation::from_tag(block.lang());
    let locale = block.locale();

    if let Some(entry) = entry {
        trace!(
            "meta.lang = {}, block.lang = {}, meta.locale = {:?}, block.locale = {:?}",
            entry.lang(),
            lang,
            entry.locale(),
            locale
        );
        if entry.lang() == lang && entry.locale() == locale {
            if let Some(messages) = entry.payload() {
                return Ok(Resolution::Update(messages));
            }
        }
    }

    parse_content(&block.content, lang).map(Resolution::Keep)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub content: String,
    /// Message block indices whose meta entry was not applied
    pub skipped_updates: Vec<usize>,
}

pub struct ContentBuilder<'a> {
    path: &'a str,
    raw: &'a str,
    entries: &'a [MessageEntry],
    config: &'a InfuseConfig,
}

impl<'a> ContentBuilder<'a> {
    pub fn new(
        path: &'a str,
        raw: &'a str,
        entries: &'a [MessageEntry],
        config: &'a InfuseConfig,
    ) -> Self {
        Self {
            path,
            raw,
            entries,
            config,
        }
    }

    /// Walk `blocks` (sorted by start) and rebuild the content.
    ///
    /// Bytes outside message blocks are copied as is. Entries left over after
    /// the last message block are appended as new blocks.
    pub fn build(&self, blocks: &[&Block]) -> Result<Merged, InfuseError> {
        self.check(blocks)?;

        let raw = self.raw;
        let mut content = String::with_capacity(raw.len());
        let mut offset = 0;
        let mut counter = 0;
        let mut skipped_updates = Vec::new();

        for block in blocks {
            if !block.kind.is_messages() {
                content.push_str(&raw[offset..block.end]);
                offset = block.end;
                continue;
            }

            let lang = Representation::from_tag(block.lang());
            let entry = self.entries.get(counter);
            let resolution =
                resolve(block, entry).map_err(|source| self.format_error(counter, lang, source))?;
            if entry.is_some() && !resolution.is_update() {
                warn!(
                    "{}: meta entry {} does not match block (lang={}, locale={:?}), keeping block messages",
                    self.path,
                    counter,
                    lang,
                    block.locale()
                );
                skipped_updates.push(counter);
            }

            let serialized = pretty(resolution.messages(), lang, self.config.indent_width)
                .map_err(|source| self.format_error(counter, lang, source))?;

            content.push_str(&raw[offset..block.start]);
            content.push('\n');
            content.push_str(&serialized);
            offset = block.end;
            counter += 1;
        }
        content.push_str(&raw[offset..]);

        for (index, entry) in self.entries.iter().enumerate().skip(counter) {
            let tag = build_tag(entry, &self.config.block_tag, self.config.indent_width)
                .map_err(|source| self.format_error(index, entry.lang(), source))?;
            content.push_str(&tag);
        }

        debug!(
            "{}: content size: raw={}, content={}",
            self.path,
            raw.len(),
            content.len()
        );
        Ok(Merged {
            content,
            skipped_updates,
        })
    }

    fn check(&self, blocks: &[&Block]) -> Result<(), InfuseError> {
        let mut previous_end = 0;
        for (index, block) in blocks.iter().enumerate() {
            let in_bounds = previous_end <= block.start
                && block.start <= block.end
                && block.end <= self.raw.len()
                && self.raw.is_char_boundary(block.start)
                && self.raw.is_char_boundary(block.end);
            if !in_bounds {
                return Err(InfuseError::BlockRange {
                    path: self.path.to_string(),
                    index,
                    start: block.start,
                    end: block.end,
                    len: self.raw.len(),
                });
            }
            previous_end = block.end;
        }

        let message_blocks = blocks.iter().filter(|b| b.kind.is_messages()).count();
        if message_blocks > self.entries.len() && self.config.missing_entries == MissingEntryPolicy::Fail {
            return Err(InfuseError::MissingEntries {
                path: self.path.to_string(),
                blocks: message_blocks,
                entries: self.entries.len(),
            });
        }
        Ok(())
    }

    fn format_error(&self, index: usize, lang: Representation, source: FormatError) -> InfuseError {
        InfuseError::Format {
            path: self.path.to_string(),
            index,
            lang,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfc::{BlockKind, SfcParser};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn localized(lang: Representation, locale: &str, messages: Value) -> MessageEntry {
        MessageEntry::Localized {
            lang,
            locale: locale.to_string(),
            messages: messages.as_object().cloned().unwrap(),
        }
    }

    fn unlocalized(lang: Representation, messages: Value) -> MessageEntry {
        MessageEntry::Unlocalized { lang, messages }
    }

    fn build_with(
        raw: &str,
        entries: &[MessageEntry],
        config: &InfuseConfig,
    ) -> Result<Merged, InfuseError> {
        let mut blocks = SfcParser::default().parse_blocks(raw).unwrap();
        blocks.sort_by_key(|b| b.start);
        let blocks: Vec<&Block> = blocks.iter().collect();
        ContentBuilder::new("App.vue", raw, entries, config).build(&blocks)
    }

    fn build(raw: &str, entries: &[MessageEntry]) -> Result<Merged, InfuseError> {
        build_with(raw, entries, &InfuseConfig::default())
    }

    #[test]
    fn file_without_message_blocks_is_unchanged() {
        let raw = "<template>\n  <p>hi</p>\n</template>\n\n<script>\nexport default {}\n</script>\n";
        let merged = build(raw, &[]).unwrap();
        assert_eq!(merged.content, raw);
        assert!(merged.skipped_updates.is_empty());
    }

    #[test]
    fn file_without_blocks_is_unchanged() {
        let merged = build("just text", &[]).unwrap();
        assert_eq!(merged.content, "just text");
    }

    #[test]
    fn matching_entry_replaces_block() {
        let raw = r#"<template>X</template><i18n locale="en">{"a":"b"}</i18n>"#;
        let entries = [localized(Representation::Json, "en", json!({"en": {"a": "b2"}}))];
        let merged = build(raw, &entries).unwrap();
        assert_eq!(
            merged.content,
            "<template>X</template><i18n locale=\"en\">\n{\n  \"a\": \"b2\"\n}\n</i18n>"
        );
        assert!(merged.skipped_updates.is_empty());
    }

    #[test]
    fn lang_mismatch_keeps_block_messages() {
        let raw = "<i18n lang=\"yaml\">\nen:\n  hello: Hello\n</i18n>\n";
        let entries = [unlocalized(Representation::Json, json!({"en": {"hello": "Updated"}}))];
        let merged = build(raw, &entries).unwrap();
        assert_eq!(merged.content, "<i18n lang=\"yaml\">\nen:\n  hello: Hello\n</i18n>\n");
        assert_eq!(merged.skipped_updates, vec![0]);
    }

    #[test]
    fn locale_mismatch_keeps_block_messages() {
        let raw = "<i18n locale=\"en\">{\"hello\":\"Hello\"}</i18n>";
        let entries = [localized(Representation::Json, "ja", json!({"ja": {"hello": "やあ"}}))];
        let merged = build(raw, &entries).unwrap();
        assert_eq!(merged.content, "<i18n locale=\"en\">\n{\n  \"hello\": \"Hello\"\n}\n</i18n>");
        assert_eq!(merged.skipped_updates, vec![0]);
    }

    #[test]
    fn resolve_prefers_matching_entry() {
        let raw = "<i18n lang=\"json5\">{en: {a: 'old'}}</i18n>";
        let blocks = SfcParser::default().parse_blocks(raw).unwrap();
        let entry = unlocalized(Representation::Json5, json!({"en": {"a": "new"}}));

        let resolution = resolve(&blocks[0], Some(&entry)).unwrap();
        assert_eq!(resolution, Resolution::Update(&json!({"en": {"a": "new"}})));

        let resolution = resolve(&blocks[0], None).unwrap();
        assert_eq!(resolution, Resolution::Keep(json!({"en": {"a": "old"}})));
    }

    #[test]
    fn unknown_block_lang_matches_json_entries() {
        let raw = "<i18n lang=\"toml\">{\"a\":\"b\"}</i18n>";
        let blocks = SfcParser::default().parse_blocks(raw).unwrap();
        let entry = unlocalized(Representation::Json, json!({"a": "c"}));
        assert!(resolve(&blocks[0], Some(&entry)).unwrap().is_update());
    }

    #[test]
    fn localized_entry_without_own_locale_falls_back() {
        let raw = "<i18n locale=\"en\">{\"a\":\"b\"}</i18n>";
        let blocks = SfcParser::default().parse_blocks(raw).unwrap();
        let entry = localized(Representation::Json, "en", json!({"fr": {"a": "c"}}));
        assert_eq!(
            resolve(&blocks[0], Some(&entry)).unwrap(),
            Resolution::Keep(json!({"a": "b"}))
        );
    }

    #[test]
    fn gaps_and_other_blocks_are_preserved() {
        let raw = concat!(
            "<template>\n  <p>{{ $t('a') }}</p>\n</template>\n\n",
            "<i18n>\n{\"en\":{\"a\":\"A\"}}\n</i18n>\n\n",
            "<style>\np { margin: 0 }\n</style>\n",
            "<i18n locale=\"ja\" lang=\"yaml\">\na: old\n</i18n>\n",
        );
        let entries = [
            unlocalized(Representation::Json, json!({"en": {"a": "A!"}})),
            localized(Representation::Yaml, "ja", json!({"ja": {"a": "new"}})),
        ];
        let merged = build(raw, &entries).unwrap();
        assert_eq!(
            merged.content,
            concat!(
                "<template>\n  <p>{{ $t('a') }}</p>\n</template>\n\n",
                "<i18n>\n{\n  \"en\": {\n    \"a\": \"A!\"\n  }\n}\n</i18n>\n\n",
                "<style>\np { margin: 0 }\n</style>\n",
                "<i18n locale=\"ja\" lang=\"yaml\">\na: new\n</i18n>\n",
            )
        );
    }

    #[test]
    fn extra_entries_are_appended_in_order() {
        let raw = "<template><p/></template>\n";
        let entries = [
            unlocalized(Representation::Json, json!({"en": {"a": "A"}})),
            localized(Representation::Json, "fr", json!({"fr": {"a": "Á"}})),
        ];
        let merged = build(raw, &entries).unwrap();
        assert_eq!(
            merged.content,
            concat!(
                "<template><p/></template>\n",
                "\n\n<i18n>\n{\n  \"en\": {\n    \"a\": \"A\"\n  }\n}\n</i18n>",
                "\n\n<i18n locale=\"fr\">\n{\n  \"a\": \"Á\"\n}\n</i18n>",
            )
        );
    }

    #[test]
    fn extra_entries_follow_existing_blocks() {
        let raw = "<i18n>{}</i18n>";
        let entries = [
            unlocalized(Representation::Json, json!({"en": {}})),
            unlocalized(Representation::Yaml, json!({"de": {"a": "b"}})),
        ];
        let merged = build(raw, &entries).unwrap();
        assert_eq!(
            merged.content,
            "<i18n>\n{\n  \"en\": {}\n}\n</i18n>\n\n<i18n lang=\"yaml\">\nde:\n  a: b\n</i18n>"
        );
    }

    #[test]
    fn missing_entries_fail_by_default() {
        let raw = "<i18n>{}</i18n><i18n locale=\"en\">{}</i18n>";
        let entries = [unlocalized(Representation::Json, json!({}))];
        let err = build(raw, &entries).unwrap_err();
        assert!(matches!(
            err,
            InfuseError::MissingEntries { blocks: 2, entries: 1, .. }
        ));
        assert!(err.to_string().contains("App.vue"));
    }

    #[test]
    fn missing_entries_can_keep_block_messages() {
        let config = InfuseConfig {
            missing_entries: MissingEntryPolicy::KeepOriginal,
            ..Default::default()
        };
        let raw = "<i18n locale=\"en\">{\"a\":\"b\"}</i18n>";
        let merged = build_with(raw, &[], &config).unwrap();
        assert_eq!(merged.content, "<i18n locale=\"en\">\n{\n  \"a\": \"b\"\n}\n</i18n>");
        assert!(merged.skipped_updates.is_empty());
    }

    #[test]
    fn malformed_block_content_reports_location() {
        let raw = "<i18n>{}</i18n><i18n lang=\"yaml\">a: [</i18n>";
        let entries = [
            unlocalized(Representation::Json, json!({})),
            unlocalized(Representation::Json, json!({})),
        ];
        let err = build(raw, &entries).unwrap_err();
        match err {
            InfuseError::Format { path, index, lang, .. } => {
                assert_eq!(path, "App.vue");
                assert_eq!(index, 1);
                assert_eq!(lang, Representation::Yaml);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_blocks_are_rejected() {
        let block = Block {
            kind: BlockKind::Style,
            start: 2,
            end: 40,
            attrs: Default::default(),
            content: String::new(),
        };
        let config = InfuseConfig::default();
        let err = ContentBuilder::new("App.vue", "short", &[], &config)
            .build(&[&block])
            .unwrap_err();
        assert!(matches!(err, InfuseError::BlockRange { index: 0, end: 40, len: 5, .. }));
    }

    #[test]
    fn respects_indent_width() {
        let config = InfuseConfig {
            indent_width: 4,
            ..Default::default()
        };
        let raw = "<i18n>{\"a\":{\"b\":\"c\"}}</i18n>";
        let entries = [unlocalized(Representation::Json, json!({"a": {"b": "d"}}))];
        let merged = build_with(raw, &entries, &config).unwrap();
        assert_eq!(
            merged.content,
            "<i18n>\n{\n    \"a\": {\n        \"b\": \"d\"\n    }\n}\n</i18n>"
        );
    }
}
