//! # Block keys
//!
//! Blocks, spans and mark definitions carry a `_key`. Keys only need to be
//! unique within the block array they were generated for, so every
//! conversion owns its own generator.
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const KEY_LENGTH: usize = 12;

/// The `_key` of a block, span or mark definition
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for Key {
    fn from(id: u64) -> Self {
        Self(format!("k{}", id))
    }
}

/// A source of fresh keys
pub trait KeyGen {
    fn next_key(&mut self) -> Key;
}

/// Keys counting up from `k0`, for reproducible output
#[derive(Debug, Default)]
pub struct SequentialKeys(u64);

impl KeyGen for SequentialKeys {
    fn next_key(&mut self) -> Key {
        let id = self.0;
        self.0 = id + 1;
        Key::from(id)
    }
}

/// Random 12 character hex keys
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomKeys;

impl KeyGen for RandomKeys {
    fn next_key(&mut self) -> Key {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(KEY_LENGTH);
        Key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Key, KeyGen, RandomKeys, SequentialKeys};

    #[test]
    fn test_sequential() {
        let mut keys = SequentialKeys::default();
        assert_eq!(keys.next_key(), Key::from("k0"));
        assert_eq!(keys.next_key(), Key::from("k1"));
    }

    #[test]
    fn test_random() {
        let mut keys = RandomKeys;
        let a = keys.next_key();
        let b = keys.next_key();
        assert_eq!(a.as_str().len(), 12);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
