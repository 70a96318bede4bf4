/// Meta locale messages: the externally computed message updates, grouped per component
use crate::formats::Representation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetaError {
    #[error("Failed to read meta file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse meta: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One intended message block of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry", into = "RawEntry")]
pub enum MessageEntry {
    /// A block declaring a `locale`; messages are keyed by locale
    Localized {
        lang: Representation,
        locale: String,
        messages: Map<String, Value>,
    },
    /// A block holding messages for every locale
    Unlocalized { lang: Representation, messages: Value },
}

impl MessageEntry {
    pub fn lang(&self) -> Representation {
        match self {
            Self::Localized { lang, .. } | Self::Unlocalized { lang, .. } => *lang,
        }
    }

    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Localized { locale, .. } => Some(locale),
            Self::Unlocalized { .. } => None,
        }
    }

    /// The messages a block for this entry should contain.
    ///
    /// `None` when a localized entry has no messages under its own locale.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Localized {
                locale, messages, ..
            } => messages.get(locale),
            Self::Unlocalized { messages, .. } => Some(messages),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEntry {
    #[serde(default)]
    lang: Representation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    messages: Value,
}

impl TryFrom<RawEntry> for MessageEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        match (raw.locale, raw.messages) {
            (Some(locale), Value::Object(messages)) => Ok(Self::Localized {
                lang: raw.lang,
                locale,
                messages,
            }),
            (Some(locale), _) => Err(format!(
                "messages of the `{}` entry must be keyed by locale",
                locale
            )),
            (None, messages) => Ok(Self::Unlocalized {
                lang: raw.lang,
                messages,
            }),
        }
    }
}

impl From<MessageEntry> for RawEntry {
    fn from(entry: MessageEntry) -> Self {
        match entry {
            MessageEntry::Localized {
                lang,
                locale,
                messages,
            } => RawEntry {
                lang,
                locale: Some(locale),
                messages: Value::Object(messages),
            },
            MessageEntry::Unlocalized { lang, messages } => RawEntry {
                lang,
                locale: None,
                messages,
            },
        }
    }
}

/// Message entries for every component, keyed by content path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaLocaleMessage {
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub components: BTreeMap<String, Vec<MessageEntry>>,
}

impl MetaLocaleMessage {
    /// Entries for one component, in block order. Missing components have none.
    pub fn entries_for(&self, content_path: &str) -> &[MessageEntry] {
        self.components
            .get(content_path)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn from_json(json: &str) -> Result<Self, MetaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, MetaError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, MetaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
