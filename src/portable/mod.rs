//! # Portable blocks
//!
//! The flat, storage oriented block array that the content store persists.
//! Every array element is tagged by `_type`. Text blocks hold spans plus the
//! out-of-line definitions (`markDefs`) for marks that need attributes.
mod style;

pub use style::{Decorator, ListKind, Style};

use crate::key::Key;
use crate::model::de;
use crate::Error;
use derive_new::new;
use serde::{Deserialize, Serialize, Serializer};

macro_rules! type_tag {
    (#[$doc:meta] $name:ident, $tag:literal) => {
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        #[$doc]
        pub struct $name;

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($tag)
            }
        }
    };
}

type_tag!(
    /// The `_type` of a span (written, never checked)
    SpanTag,
    "span"
);

type_tag!(
    /// The `_type` of an asset reference (written, never checked)
    ReferenceTag,
    "reference"
);

/// One element of a portable block array
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum PortableBlock {
    /// A block of text
    Block(TextBlock),
    /// An image referencing an asset
    Image(ImageBlock),
    /// Any other block type found in storage
    #[serde(other)]
    Unknown,
}

/// A block of styled text, possibly one item of a list
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(rename = "_key", default)]
    pub key: Key,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub style: Style,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub children: Vec<Span>,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListKind>,
    #[serde(
        default,
        deserialize_with = "de::deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<u32>,
}

impl TextBlock {
    /// An empty block of the given style
    pub fn new(key: Key, style: Style) -> Self {
        Self {
            key,
            style,
            children: Vec::new(),
            mark_defs: Vec::new(),
            list_item: None,
            level: None,
        }
    }

    /// Find the mark definition with the given key
    pub fn mark_def(&self, key: &str) -> Option<&MarkDef> {
        self.mark_defs.iter().find(|def| def.key().map(Key::as_str) == Some(key))
    }

    /// Whether this block is the stored form of a code block:
    /// a `normal` block whose only span is marked `code` and nothing else.
    pub fn is_code_block(&self) -> bool {
        if self.style != Style::Normal || self.list_item.is_some() {
            return false;
        }
        match self.children.as_slice() {
            [span] => span.marks.len() == 1 && span.marks[0] == Decorator::Code.as_str(),
            _ => false,
        }
    }

    /// The concatenated text of all spans
    pub fn text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }
}

/// An inline run of text
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, new)]
pub struct Span {
    #[serde(rename = "_type", skip_deserializing)]
    #[new(default)]
    tag: SpanTag,
    #[serde(rename = "_key", default)]
    pub key: Key,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub text: String,
    /// Decorator names or keys into the block's `markDefs`
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub marks: Vec<String>,
}

/// An out-of-line mark definition
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum MarkDef {
    Link {
        #[serde(rename = "_key", default)]
        key: Key,
        #[serde(default, deserialize_with = "de::deserialize_or_default")]
        href: String,
    },
    #[serde(other)]
    Unknown,
}

impl MarkDef {
    pub fn key(&self) -> Option<&Key> {
        match self {
            Self::Link { key, .. } => Some(key),
            Self::Unknown => None,
        }
    }
}

/// An image block
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ImageBlock {
    #[serde(rename = "_key", default)]
    pub key: Key,
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub alt: String,
}

impl ImageBlock {
    /// The referenced asset id, if any
    pub fn asset_ref(&self) -> Option<&str> {
        self.asset.as_ref().map(|asset| asset.id.as_str())
    }
}

/// A reference to an asset in the content store
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, new)]
pub struct AssetRef {
    #[serde(rename = "_type", skip_deserializing)]
    #[new(default)]
    tag: ReferenceTag,
    #[serde(rename = "_ref", default)]
    pub id: String,
}

/// Parse a block array from JSON
pub fn from_json(input: &str) -> Result<Vec<PortableBlock>, Error> {
    serde_json::from_str(input).map_err(Error::PortableJson)
}

/// Write a block array as JSON
pub fn to_json(blocks: &[PortableBlock], pretty: bool) -> Result<String, Error> {
    let res = if pretty {
        serde_json::to_string_pretty(blocks)
    } else {
        serde_json::to_string(blocks)
    };
    res.map_err(Error::Serialize)
}

/// The plain text of a block array.
///
/// Text blocks are separated by an empty line, other blocks are left out.
pub fn to_plain_text(blocks: &[PortableBlock]) -> String {
    let texts: Vec<String> = blocks
        .iter()
        .filter_map(|block| match block {
            PortableBlock::Block(text_block) => Some(text_block.text()),
            PortableBlock::Image(_) | PortableBlock::Unknown => None,
        })
        .collect();
    texts.join("\n\n")
}
