//! # portable-doc
//!
//! Converts the node tree of a rich-text editor into the flat block array
//! stored by a content store, and back again.
//!
//! ```
//! use portable_doc::{from_portable, to_portable, model::Node};
//!
//! let doc = Node::Doc {
//!     content: vec![Node::paragraph(vec![Node::text("Hello")])],
//! };
//! let blocks = to_portable(&doc);
//! assert_eq!(from_portable(&blocks).text_content(), "Hello");
//! ```
pub mod command;
pub mod config;
pub mod convert;
pub mod key;
pub mod model;
pub mod portable;

pub use convert::{from_portable, from_portable_with, to_portable, to_portable_with, Options};

use displaydoc::Display;
use thiserror::Error;

/// Error when reading or writing documents
#[derive(Debug, Error, Display)]
pub enum Error {
    /// Invalid editor document: {0}
    EditorJson(#[source] serde_json::Error),
    /// Invalid portable blocks: {0}
    PortableJson(#[source] serde_json::Error),
    /// Could not serialize output: {0}
    Serialize(#[source] serde_json::Error),
}
