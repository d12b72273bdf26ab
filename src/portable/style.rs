use displaydoc::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The style of a text block
///
/// Styles we don't know are kept as they were stored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Style {
    Normal,
    H1,
    H2,
    H3,
    H4,
    Blockquote,
    Other(String),
}

impl Default for Style {
    fn default() -> Self {
        Self::Normal
    }
}

impl Style {
    /// The heading style for `level`, clamped to `h1..=h4`
    pub fn heading(level: i64) -> Self {
        match level {
            i64::MIN..=1 => Self::H1,
            2 => Self::H2,
            3 => Self::H3,
            _ => Self::H4,
        }
    }

    /// The heading level, if this is a heading style
    pub fn heading_level(&self) -> Option<i64> {
        match self {
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "normal",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::Blockquote => "blockquote",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Style {
    fn from(s: String) -> Self {
        match s.as_str() {
            "normal" => Self::Normal,
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "blockquote" => Self::Blockquote,
            _ => Self::Other(s),
        }
    }
}

impl From<Style> for String {
    fn from(style: Style) -> String {
        match style {
            Style::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

/// The kind of list a block is an item of
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum ListKind {
    Bullet,
    Number,
    Other(String),
}

impl From<String> for ListKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "bullet" => Self::Bullet,
            "number" => Self::Number,
            _ => Self::Other(s),
        }
    }
}

impl From<ListKind> for String {
    fn from(kind: ListKind) -> String {
        match kind {
            ListKind::Bullet => String::from("bullet"),
            ListKind::Number => String::from("number"),
            ListKind::Other(s) => s,
        }
    }
}

#[derive(Debug, Display, Error)]
/// Unknown decorator `{0}`
pub struct UnknownDecorator(String);

/// A mark that needs no definition, stored by its name
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Decorator {
    Strong,
    Em,
    Underline,
    Code,
}

impl Decorator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Em => "em",
            Self::Underline => "underline",
            Self::Code => "code",
        }
    }
}

impl FromStr for Decorator {
    type Err = UnknownDecorator;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(Self::Strong),
            "em" => Ok(Self::Em),
            "underline" => Ok(Self::Underline),
            "code" => Ok(Self::Code),
            _ => Err(UnknownDecorator(s.to_owned())),
        }
    }
}
