//! # Converting between editor documents and portable blocks
//!
//! Both directions are pure functions. They never fail: input they don't
//! understand is skipped or defaulted, and the output is always something the
//! other side can load.
mod from_portable;
mod to_portable;

pub use from_portable::MAX_LIST_DEPTH;

use crate::key::{KeyGen, RandomKeys};
use crate::model::Node;
use crate::portable::PortableBlock;
use serde::Deserialize;

/// How portable blocks are turned back into an editor document
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    /// Rebuild nested lists from the `level` of list blocks.
    ///
    /// If this is `false`, every run of list blocks with the same kind becomes
    /// a single flat list.
    pub nest_lists: bool,
    /// Put consecutive `blockquote` blocks into a single blockquote
    pub merge_blockquotes: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            nest_lists: true,
            merge_blockquotes: false,
        }
    }
}

/// Flatten an editor document into portable blocks with random keys
pub fn to_portable(doc: &Node) -> Vec<PortableBlock> {
    to_portable_with(doc, &mut RandomKeys)
}

/// Flatten an editor document into portable blocks, drawing keys from `keys`
///
/// A root that is not a `doc` node is converted as if it was the only child
/// of one.
pub fn to_portable_with<K: KeyGen>(doc: &Node, keys: &mut K) -> Vec<PortableBlock> {
    let nodes = match doc {
        Node::Doc { content } => content.as_slice(),
        other => std::slice::from_ref(other),
    };
    to_portable::convert(nodes, keys)
}

/// Rebuild an editor document from portable blocks with the default options
pub fn from_portable(blocks: &[PortableBlock]) -> Node {
    from_portable_with(blocks, &Options::default())
}

/// Rebuild an editor document from portable blocks
///
/// The result is a `doc` node with at least one child.
pub fn from_portable_with(blocks: &[PortableBlock], options: &Options) -> Node {
    from_portable::convert(blocks, options)
}
