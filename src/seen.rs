// src/seen.rs
//! Process-lifetime memory of announcements already handled.
//!
//! Keys are SHA-256 digests of the exact announcement text, so memory per
//! entry is fixed regardless of how long a notice is. Nothing is persisted.

use sha2::{Digest, Sha256};
use std::collections::{HashSet, VecDeque};

type Key = [u8; 32];

fn key_of(text: &str) -> Key {
    Sha256::digest(text.as_bytes()).into()
}

#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    keys: HashSet<Key>,
    // insertion order, oldest first; used for eviction
    order: VecDeque<Key>,
    cap: Option<usize>,
}

impl SeenSet {
    /// Unbounded: nothing is ever forgotten while the process lives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `cap` entries, forgetting the oldest first.
    /// An evicted announcement would be treated as new if it reappears.
    pub fn bounded(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            keys: HashSet::with_capacity(cap.min(10_000)),
            order: VecDeque::with_capacity(cap.min(10_000)),
            cap: Some(cap),
        }
    }

    pub fn with_capacity(cap: Option<usize>) -> Self {
        match cap {
            Some(c) => Self::bounded(c),
            None => Self::new(),
        }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.keys.contains(&key_of(text))
    }

    /// Mark as seen. Returns `true` if it was not seen before.
    pub fn insert(&mut self, text: &str) -> bool {
        let key = key_of(text);
        if !self.keys.insert(key) {
            return false;
        }
        self.order.push_back(key);
        if let Some(cap) = self.cap {
            while self.order.len() > cap {
                if let Some(old) = self.order.pop_front() {
                    self.keys.remove(&old);
                }
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
