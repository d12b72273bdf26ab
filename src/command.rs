//! # Conversion commands

use displaydoc::Display;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a direction
#[derive(Debug, Display, Error)]
pub enum ParseDirectionError {
    /// The direction `{0}` is not known (expected `to-portable`, `from-portable` or `text`)
    UnknownDirection(String),
}

/// What to convert the input into
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum Direction {
    /// to-portable
    ToPortable,
    /// from-portable
    FromPortable,
    /// text
    Text,
}

impl FromStr for Direction {
    type Err = ParseDirectionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to-portable" | "to" => Ok(Self::ToPortable),
            "from-portable" | "from" => Ok(Self::FromPortable),
            "text" => Ok(Self::Text),
            _ => Err(ParseDirectionError::UnknownDirection(s.to_owned())),
        }
    }
}
