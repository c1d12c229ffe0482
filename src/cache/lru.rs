//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.
//!
//! Backed by a doubly-linked list threaded through a slab of nodes, with a
//! `HashMap` from key to slot index. Touch, remove, and evict are all O(1):
//! a touch unlinks the node and relinks it at the tail, never shifting
//! neighbors.
//! - Head = Least recently used
//! - Tail = Most recently used

use std::collections::HashMap;

/// A slab slot: the key plus its list neighbors.
#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Key to slab slot
    index: HashMap<String, usize>,
    /// Node storage; `None` marks a free slot
    nodes: Vec<Option<Node>>,
    /// Reusable free slots
    free: Vec<usize>,
    /// Least recently used
    head: Option<usize>,
    /// Most recently used
    tail: Option<usize>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as recently used (moves to tail).
    ///
    /// An existing key is unlinked and relinked at the tail; a new key is
    /// appended, which already makes it most recent. O(1) either way.
    pub fn touch(&mut self, key: &str) {
        if let Some(&idx) = self.index.get(key) {
            if self.tail != Some(idx) {
                self.unlink(idx);
                self.push_tail(idx);
            }
        } else {
            let idx = self.alloc(key.to_string());
            self.index.insert(key.to_string(), idx);
            self.push_tail(idx);
        }
    }

    // == Remove ==
    /// Removes a key from the tracker, preserving order of the rest.
    pub fn remove(&mut self, key: &str) {
        if let Some(idx) = self.index.remove(key) {
            self.unlink(idx);
            self.nodes[idx] = None;
            self.free.push(idx);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let idx = self.head?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        Some(node.key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        let idx = self.head?;
        self.nodes[idx].as_ref().map(|node| &node.key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Clear ==
    /// Forgets all tracked keys.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    // == Slab ==
    /// Places a fresh, unlinked node into a free slot (or a new one).
    fn alloc(&mut self, key: String) -> usize {
        let node = Node {
            key,
            prev: None,
            next: None,
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    // == List Maintenance ==
    /// Detaches a node from the list, patching neighbors and endpoints.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    /// Links a detached node at the tail (most recently used).
    fn push_tail(&mut self, idx: usize) {
        match self.tail {
            Some(t) => {
                if let Some(node) = self.nodes[t].as_mut() {
                    node.next = Some(idx);
                }
                if let Some(node) = self.nodes[idx].as_mut() {
                    node.prev = Some(t);
                    node.next = None;
                }
            }
            None => {
                self.head = Some(idx);
                if let Some(node) = self.nodes[idx].as_mut() {
                    node.prev = None;
                    node.next = None;
                }
            }
        }
        self.tail = Some(idx);
    }
}
