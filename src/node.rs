use crate::reference::ZddId;

/// A ZDD node: one vertex of the shared DAG.
///
/// # Fields
///
/// - `var`: the decision variable, or the sentinel `num_vars` for terminals
/// - `low`: sets NOT containing `var`
/// - `high`: sets containing `var` (stored with `var` removed)
/// - `marked`: one bit reserved for traversal bookkeeping; the algebra
///   itself never touches it
///
/// The reference count doubles as the node's lifecycle state:
///
/// - `ref_count >= 0` — alive, with `ref_count + 1` external references
/// - `ref_count == -1` — dead: children already dereffed, slot not yet
///   reclaimed; the node can still be revived by a cache hit or a unique
///   table hit
/// - `ref_count == i32::MIN` — reclaimed free slot awaiting reuse
///
/// # Invariants
///
/// - **Ordering**: `var < low.var` and `var < high.var` for alive nodes.
/// - **Zero-suppression**: `high` is never `ZddId::BOTTOM` for alive nodes;
///   such a configuration is represented by `low` directly.
#[derive(Debug, Copy, Clone)]
pub struct ZddNode {
    /// Decision variable (the sentinel `num_vars` for terminals).
    pub var: u32,
    /// Low child: sets not containing `var`.
    pub low: ZddId,
    /// High child: sets containing `var`.
    pub high: ZddId,
    /// Reserved traversal mark.
    pub marked: bool,
    ref_count: i32,
}

/// Refcount value of a dead (killed, not yet reclaimed) node.
const DEAD: i32 = -1;
/// Refcount value of a reclaimed slot on the free list.
const FREE: i32 = i32::MIN;

impl ZddNode {
    /// Creates a new alive node with a single external reference.
    pub fn new(var: u32, low: ZddId, high: ZddId) -> Self {
        debug_assert!(!high.is_bottom(), "ZDD node cannot have high=⊥ (zero-suppression rule)");
        Self {
            var,
            low,
            high,
            marked: false,
            ref_count: 0,
        }
    }

    /// Creates a terminal node carrying the sentinel variable.
    pub fn terminal(sentinel: u32, id: ZddId) -> Self {
        Self {
            var: sentinel,
            low: id,
            high: id,
            marked: false,
            ref_count: 0,
        }
    }

    /// External references minus one, while alive.
    pub fn ref_count(&self) -> i32 {
        self.ref_count
    }

    pub fn is_alive(&self) -> bool {
        self.ref_count >= 0
    }

    pub fn is_dead(&self) -> bool {
        self.ref_count == DEAD
    }

    pub fn is_free(&self) -> bool {
        self.ref_count == FREE
    }

    pub(crate) fn add_refs(&mut self, count: i32) {
        debug_assert!(self.is_alive());
        self.ref_count += count;
    }

    pub(crate) fn dec_ref(&mut self) {
        debug_assert!(self.ref_count > 0);
        self.ref_count -= 1;
    }

    /// Marks the node dead. The caller is responsible for the child cascade.
    pub(crate) fn kill(&mut self) {
        debug_assert!(self.ref_count == 0);
        self.ref_count = DEAD;
    }

    /// Marks a dead node alive again with a single external reference.
    pub(crate) fn set_alive(&mut self) {
        debug_assert!(self.is_dead());
        self.ref_count = 0;
    }

    /// Marks a dead node's slot as reclaimed.
    pub(crate) fn reclaim(&mut self) {
        debug_assert!(self.is_dead());
        self.ref_count = FREE;
    }
}
