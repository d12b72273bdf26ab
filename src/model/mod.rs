//! # The editor document model
//!
//! This module mirrors the JSON serialization of the rich-text editor's node
//! tree. Node and mark types the editor may produce but that we don't know
//! about are read into an `Unknown` variant instead of failing.
pub mod de;

use crate::Error;
use serde::{Deserialize, Serialize};

/// Attributes of a heading
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct HeadingAttrs {
    #[serde(default = "default_level", deserialize_with = "de::deserialize_level")]
    pub level: i64,
}

impl Default for HeadingAttrs {
    fn default() -> Self {
        Self { level: 1 }
    }
}

fn default_level() -> i64 {
    1
}

/// Attributes of a code block
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CodeBlockAttrs {
    #[serde(default)]
    pub language: Option<String>,
}

/// Attributes of an ordered list
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OrderedListAttrs {
    #[serde(default = "default_start")]
    pub start: u64,
}

impl Default for OrderedListAttrs {
    fn default() -> Self {
        Self { start: 1 }
    }
}

fn default_start() -> u64 {
    1
}

/// Attributes of the image node
///
/// `url` is only used for display. It is never persisted and comes back as
/// `null` when a document is rebuilt from stored blocks.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    #[serde(default)]
    pub asset_ref: Option<String>,
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub alt: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Attributes of a link mark
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LinkAttrs {
    #[serde(default, deserialize_with = "de::deserialize_or_default")]
    pub href: String,
}

/// The marks that can be on a text node
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mark {
    /// bold
    Bold,
    /// italics
    Italic,
    /// underlined
    Underline,
    /// monospace
    Code,
    /// hyper-linked
    Link {
        #[serde(default)]
        attrs: LinkAttrs,
    },
    /// Any mark we don't support
    #[serde(other)]
    Unknown,
}

impl Mark {
    /// A link mark pointing to `href`
    pub fn link<S: Into<String>>(href: S) -> Self {
        Self::Link {
            attrs: LinkAttrs { href: href.into() },
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Doc {
        #[serde(default)]
        content: Fragment,
    },
    Paragraph {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Fragment,
    },
    Heading {
        #[serde(default)]
        attrs: HeadingAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Fragment,
    },
    BulletList {
        #[serde(default)]
        content: Fragment,
    },
    OrderedList {
        #[serde(default)]
        attrs: OrderedListAttrs,
        #[serde(default)]
        content: Fragment,
    },
    ListItem {
        #[serde(default)]
        content: Fragment,
    },
    Blockquote {
        #[serde(default)]
        content: Fragment,
    },
    CodeBlock {
        #[serde(default)]
        attrs: CodeBlockAttrs,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        content: Fragment,
    },
    Text {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
    HardBreak,
    Image {
        #[serde(default)]
        attrs: ImageAttrs,
    },
    #[serde(other)]
    Unknown,
}

pub type Fragment = Vec<Node>;

impl Node {
    /// A text node without marks
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// A paragraph with the given inline content
    pub fn paragraph(content: Fragment) -> Self {
        Self::Paragraph { content }
    }

    /// The `type` this node is serialized with
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Doc { .. } => "doc",
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::BulletList { .. } => "bulletList",
            Self::OrderedList { .. } => "orderedList",
            Self::ListItem { .. } => "listItem",
            Self::Blockquote { .. } => "blockquote",
            Self::CodeBlock { .. } => "codeBlock",
            Self::Text { .. } => "text",
            Self::HardBreak => "hardBreak",
            Self::Image { .. } => "image",
            Self::Unknown => "unknown node",
        }
    }

    /// The child nodes, empty for leaves
    pub fn content(&self) -> &[Node] {
        match self {
            Self::Doc { content }
            | Self::Paragraph { content }
            | Self::Heading { content, .. }
            | Self::BulletList { content }
            | Self::OrderedList { content, .. }
            | Self::ListItem { content }
            | Self::Blockquote { content }
            | Self::CodeBlock { content, .. } => content,
            Self::Text { .. } | Self::HardBreak | Self::Image { .. } | Self::Unknown => &[],
        }
    }

    /// The visible text of this node and all its descendants.
    ///
    /// Hard breaks count as a newline.
    pub fn text_content(&self) -> String {
        let mut buf = String::new();
        self.collect_text(&mut buf);
        buf
    }

    fn collect_text(&self, buf: &mut String) {
        match self {
            Self::Text { text, .. } => buf.push_str(text),
            Self::HardBreak => buf.push('\n'),
            _ => {
                for child in self.content() {
                    child.collect_text(buf);
                }
            }
        }
    }

    /// Parse a node from its JSON serialization
    pub fn from_json(input: &str) -> Result<Self, Error> {
        serde_json::from_str(input).map_err(Error::EditorJson)
    }

    /// Write this node as JSON
    pub fn to_json(&self, pretty: bool) -> Result<String, Error> {
        let res = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        res.map_err(Error::Serialize)
    }
}
