//! Per-variable unique table for ZDD nodes.

use std::collections::HashMap;

use crate::reference::ZddId;

/// The unique table slice for a single variable: maps a `(low, high)` child
/// pair to the one canonical node with that variable and those children.
///
/// Entries may point at dead (not yet reclaimed) nodes; `Zdd::make_node`
/// revives such hits instead of allocating a duplicate, and garbage
/// collection erases the entry when the node's slot is finally recycled.
#[derive(Debug, Clone)]
pub struct Subtable {
    /// The variable shared by all nodes in this subtable.
    pub variable: u32,
    map: HashMap<(ZddId, ZddId), ZddId>,
}

impl Subtable {
    /// Creates an empty subtable for the given variable.
    pub fn new(variable: u32) -> Self {
        Self {
            variable,
            map: HashMap::new(),
        }
    }

    /// Looks up the node with the given children.
    pub fn find(&self, low: ZddId, high: ZddId) -> Option<ZddId> {
        self.map.get(&(low, high)).copied()
    }

    /// Registers a node under its child pair.
    pub fn insert(&mut self, low: ZddId, high: ZddId, id: ZddId) {
        let previous = self.map.insert((low, high), id);
        debug_assert!(previous.is_none(), "duplicate unique table entry for x{}", self.variable);
    }

    /// Erases the entry for a child pair, returning the handle it mapped to.
    pub fn remove(&mut self, low: ZddId, high: ZddId) -> Option<ZddId> {
        self.map.remove(&(low, high))
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
