//! The ZDD manager: arena, unique tables, lifecycle, GC, and the set algebra.
//!
//! # Overview
//!
//! A ZDD represents a family of finite sets over a fixed universe of
//! variables as a canonical shared DAG. The manager owns every node and is
//! the only way to create or combine diagrams:
//!
//! - **Node arena**: a growable vector of [`ZddNode`] records addressed by
//!   [`ZddId`] handles, with a free-index stack for recycled slots.
//! - **Unique tables**: one [`Subtable`] per variable enforcing the
//!   zero-suppression rule and structural sharing (hash consing).
//! - **Lifecycle**: explicit reference counts with cascading death and
//!   revival; a dead node keeps its slot until garbage collection and can be
//!   brought back by a unique table or operation cache hit.
//! - **Operation caches**: one memo table per operator ([`Cache`]).
//!
//! # Reference discipline
//!
//! Every operator leaves its arguments untouched and returns one owned
//! reference to its result; callers pair each returned handle with one
//! [`Zdd::release`]. Handles passed into [`Zdd::make_node`] each carry one
//! owned reference, which the call consumes.
//!
//! # Quick Start
//!
//! ```
//! use zdd_rs::zdd::Zdd;
//!
//! let mut zdd = Zdd::new(3);
//!
//! let e0 = zdd.elementary(0); // {{0}}
//! let e1 = zdd.elementary(1); // {{1}}
//!
//! let u = zdd.union(e0, e1); // {{0}, {1}}
//! assert_eq!(zdd.count_sets(u), 2u32.into());
//!
//! let j = zdd.join(e0, e1); // {{0, 1}}
//! assert_eq!(zdd.count_sets(j), 1u32.into());
//! ```

use std::cmp::Ordering;

use log::debug;

use crate::cache::Cache;
use crate::node::ZddNode;
use crate::reference::ZddId;
use crate::subtable::Subtable;

/// The ZDD manager: owns all nodes and performs all operations.
///
/// All state (arena, unique tables, operation caches, free list, dead-node
/// counter) lives in this one struct, and every mutating operation takes
/// `&mut self`, so exclusive single-threaded access is enforced by the type
/// system rather than by convention.
pub struct Zdd {
    pub(crate) nodes: Vec<ZddNode>,
    /// Recycled arena slots available for reuse.
    pub(crate) free: Vec<u32>,
    /// Number of dead, not yet reclaimed nodes.
    pub(crate) dead: usize,
    /// One unique table per variable.
    pub(crate) subtables: Vec<Subtable>,
    num_vars: u32,

    pub(crate) union_cache: Cache<(ZddId, ZddId)>,
    pub(crate) intersection_cache: Cache<(ZddId, ZddId)>,
    pub(crate) difference_cache: Cache<(ZddId, ZddId)>,
    pub(crate) join_cache: Cache<(ZddId, ZddId)>,
    pub(crate) meet_cache: Cache<(ZddId, ZddId)>,
    pub(crate) nonsubsets_cache: Cache<(ZddId, ZddId)>,
    pub(crate) nonsupersets_cache: Cache<(ZddId, ZddId)>,
    pub(crate) maximal_cache: Cache<ZddId>,
    pub(crate) choose_cache: Cache<(ZddId, u32)>,
}

impl Zdd {
    /// Largest supported universe: the permanent handles must fit the
    /// 32-bit handle width with one bit reserved for the traversal mark.
    pub const MAX_VARS: u32 = 4095;

    /// Creates a manager for a universe of `num_vars` variables.
    pub fn new(num_vars: u32) -> Self {
        Self::with_capacity(num_vars, 1 << 10)
    }

    /// Creates a manager with an initial arena capacity hint.
    ///
    /// Preallocates the permanent handles: ⊥ and ⊤, the elementary family
    /// `{{v}}` for every variable, and the tautology chain "all subsets of
    /// `{v, ..., num_vars - 1}`".
    pub fn with_capacity(num_vars: u32, capacity: usize) -> Self {
        assert!(
            num_vars <= Self::MAX_VARS,
            "universe of {} variables exceeds the supported {}",
            num_vars,
            Self::MAX_VARS
        );

        let permanent = 2 * num_vars as usize + 2;
        let mut nodes = Vec::with_capacity(capacity.max(permanent));

        // terminals carry the sentinel variable `num_vars`
        nodes.push(ZddNode::terminal(num_vars, ZddId::BOTTOM));
        nodes.push(ZddNode::terminal(num_vars, ZddId::TOP));

        let mut subtables: Vec<Subtable> = (0..num_vars).map(Subtable::new).collect();

        // elementary families at handles 2 ..= N + 1
        for var in 0..num_vars {
            let id = ZddId::new(nodes.len() as u32);
            nodes.push(ZddNode::new(var, ZddId::BOTTOM, ZddId::TOP));
            subtables[var as usize].insert(ZddId::BOTTOM, ZddId::TOP, id);
        }

        // tautology chain at handles N + 2 ..= 2N + 1, built bottom-up
        let mut below = ZddId::TOP;
        for var in (0..num_vars).rev() {
            let id = ZddId::new(nodes.len() as u32);
            nodes.push(ZddNode::new(var, below, below));
            subtables[var as usize].insert(below, below, id);
            below = id;
        }

        Self {
            nodes,
            free: Vec::new(),
            dead: 0,
            subtables,
            num_vars,
            union_cache: Cache::new(),
            intersection_cache: Cache::new(),
            difference_cache: Cache::new(),
            join_cache: Cache::new(),
            meet_cache: Cache::new(),
            nonsubsets_cache: Cache::new(),
            nonsupersets_cache: Cache::new(),
            maximal_cache: Cache::new(),
            choose_cache: Cache::new(),
        }
    }
}

impl Zdd {
    /// Number of variables in the universe.
    pub fn num_variables(&self) -> u32 {
        self.num_vars
    }

    /// Number of alive nodes, permanents included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - self.free.len() - self.dead
    }

    /// The empty family (⊥).
    pub fn bottom(&self) -> ZddId {
        ZddId::BOTTOM
    }

    /// The family containing only the empty set (⊤).
    pub fn top(&self) -> ZddId {
        ZddId::TOP
    }

    /// The elementary family `{{var}}`.
    pub fn elementary(&self, var: u32) -> ZddId {
        assert!(var < self.num_vars, "variable x{} out of range", var);
        ZddId::new(2 + var)
    }

    /// All subsets of the whole universe.
    pub fn tautology(&self) -> ZddId {
        self.tautology_from(0)
    }

    /// All subsets of `{var, ..., num_vars - 1}`; ⊤ for `var == num_vars`.
    pub fn tautology_from(&self, var: u32) -> ZddId {
        assert!(var <= self.num_vars, "variable x{} out of range", var);
        if var == self.num_vars {
            ZddId::TOP
        } else {
            ZddId::new(2 * self.num_vars + 1 - var)
        }
    }

    /// Returns true if `f` is ⊤ or a tautology chain node.
    pub fn is_tautology(&self, f: ZddId) -> bool {
        f.is_top() || (f.raw() >= self.num_vars + 2 && f.raw() < 2 * self.num_vars + 2)
    }

    /// Permanent handles are never collected and their refcounts are pinned.
    fn is_permanent(&self, f: ZddId) -> bool {
        f.raw() < 2 * self.num_vars + 2
    }

    /// Copies out the node record behind a handle.
    pub fn node(&self, f: ZddId) -> ZddNode {
        self.nodes[f.index()]
    }

    /// The decision variable of `f` (the sentinel `num_vars` for terminals).
    pub fn variable(&self, f: ZddId) -> u32 {
        self.nodes[f.index()].var
    }

    /// The low child of `f`.
    pub fn low(&self, f: ZddId) -> ZddId {
        self.nodes[f.index()].low
    }

    /// The high child of `f`.
    pub fn high(&self, f: ZddId) -> ZddId {
        self.nodes[f.index()].high
    }
}

impl Zdd {
    /// Adds one owned reference to `f` and returns it unchanged.
    pub fn acquire(&mut self, f: ZddId) -> ZddId {
        self.acquire_n(f, 1)
    }

    /// Adds `count` owned references to `f` and returns it unchanged.
    ///
    /// The multi-reference form exists for diagram-construction bootstrap,
    /// where a client hands out several copies of one handle at once.
    pub fn acquire_n(&mut self, f: ZddId, count: u32) -> ZddId {
        assert!(f.index() < self.nodes.len(), "handle {} out of bounds", f);
        if self.is_permanent(f) {
            return f;
        }
        let node = &mut self.nodes[f.index()];
        assert!(node.is_alive(), "acquire on dead handle {}", f);
        node.add_refs(count as i32);
        f
    }

    /// Drops one owned reference to `f`.
    ///
    /// When the last reference goes, the node dies: it stays in the arena
    /// (and in the unique table) until the next garbage collection, and the
    /// references it holds on its children cascade recursively.
    pub fn release(&mut self, f: ZddId) {
        assert!(f.index() < self.nodes.len(), "handle {} out of bounds", f);
        if self.is_permanent(f) {
            return;
        }
        let node = &mut self.nodes[f.index()];
        assert!(node.is_alive(), "release on dead handle {}", f);
        if node.ref_count() > 0 {
            node.dec_ref();
            return;
        }
        let low = node.low;
        let high = node.high;
        node.kill();
        self.dead += 1;
        self.release(low);
        self.release(high);
    }

    /// Brings a dead node back to life with one owned reference,
    /// re-acquiring its children (and reviving them first if needed).
    ///
    /// This is the exact mirror of the death cascade in [`Zdd::release`].
    fn revive(&mut self, f: ZddId) {
        debug_assert!(!self.is_permanent(f));
        let node = &mut self.nodes[f.index()];
        assert!(node.is_dead(), "revive on handle {} that is not dead", f);
        node.set_alive();
        let low = node.low;
        let high = node.high;
        self.dead -= 1;
        for child in [low, high] {
            if self.is_permanent(child) {
                continue;
            }
            if self.nodes[child.index()].is_dead() {
                self.revive(child);
            } else {
                self.nodes[child.index()].add_refs(1);
            }
        }
    }

    /// Turns a cache hit into an owned result: acquire if alive, revive if
    /// dead.
    fn cached(&mut self, result: ZddId) -> ZddId {
        if self.nodes[result.index()].is_alive() {
            self.acquire(result)
        } else {
            self.revive(result);
            result
        }
    }
}

impl Zdd {
    /// Creates or retrieves the canonical node `(var, low, high)`.
    ///
    /// The supplied `low` and `high` handles each carry one owned reference,
    /// which this call consumes; the returned handle carries one owned
    /// reference for the caller.
    ///
    /// Enforces the zero-suppression rule: `high == ⊥` yields `low` without
    /// creating a node.
    pub fn make_node(&mut self, var: u32, low: ZddId, high: ZddId) -> ZddId {
        assert!(var < self.num_vars, "variable x{} out of range", var);
        debug_assert!(var < self.variable(low), "ordering violated on low child");
        debug_assert!(var < self.variable(high), "ordering violated on high child");
        debug_assert!(self.nodes[low.index()].is_alive());
        debug_assert!(self.nodes[high.index()].is_alive());

        // zero-suppression: the ⊥ reference is dropped and the low
        // reference passes through to the caller
        if high.is_bottom() {
            self.release(high);
            return low;
        }

        if let Some(found) = self.subtables[var as usize].find(low, high) {
            if self.nodes[found.index()].is_dead() {
                self.revive(found);
            } else {
                self.acquire(found);
            }
            // the entry already owns references to its children; the two
            // supplied references are surplus
            self.release(low);
            self.release(high);
            return found;
        }

        let id = self.alloc(ZddNode::new(var, low, high));
        self.subtables[var as usize].insert(low, high, id);
        id
    }

    /// Picks an arena slot for a fresh node, collecting garbage first when
    /// no free slot exists and dead nodes exceed an eighth of the live ones.
    fn alloc(&mut self, node: ZddNode) -> ZddId {
        if self.free.is_empty() && self.dead > self.num_nodes() / 8 {
            self.collect_garbage();
        }
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.nodes[index as usize].is_free());
                self.nodes[index as usize] = node;
                ZddId::new(index)
            }
            None => {
                let index = self.nodes.len() as u32;
                self.nodes.push(node);
                ZddId::new(index)
            }
        }
    }

    /// Reclaims all dead nodes.
    ///
    /// Phase one purges every operation cache entry whose key or result
    /// handle is dead. Phase two sweeps the non-permanent arena slots:
    /// each dead node loses its unique table entry and its slot goes on the
    /// free list. Resets the dead-node counter.
    pub fn collect_garbage(&mut self) {
        let nodes = &self.nodes;
        let live = |id: ZddId| nodes[id.index()].is_alive();

        self.union_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.intersection_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.difference_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.join_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.meet_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.nonsubsets_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.nonsupersets_cache.retain(|&(f, g), r| live(f) && live(g) && live(r));
        self.maximal_cache.retain(|&f, r| live(f) && live(r));
        self.choose_cache.retain(|&(f, _), r| live(f) && live(r));

        let first_collectible = 2 * self.num_vars as usize + 2;
        let mut reclaimed = 0usize;
        for index in first_collectible..self.nodes.len() {
            if self.nodes[index].is_dead() {
                let node = self.nodes[index];
                let removed = self.subtables[node.var as usize].remove(node.low, node.high);
                debug_assert_eq!(removed, Some(ZddId::new(index as u32)));
                self.nodes[index].reclaim();
                self.free.push(index as u32);
                reclaimed += 1;
            }
        }
        debug_assert_eq!(reclaimed, self.dead);
        self.dead = 0;

        debug!(
            "collect_garbage: reclaimed {} nodes, {} free slots, {} alive",
            reclaimed,
            self.free.len(),
            self.num_nodes()
        );
    }
}

// The nine set-family operators. All follow the same shape: terminal and
// absorption shortcuts, per-operator cache probe (a hit on a dead result
// revives it), recursion on the smaller top variable, rebuild through
// `make_node`, cache insert.
impl Zdd {
    /// Union: sets in either family.
    pub fn union(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("union({}, {})", f, g);

        if f == g {
            return self.acquire(f);
        }
        // commutative: canonicalize operand order by handle value
        let (f, g) = if f <= g { (f, g) } else { (g, f) };
        if f.is_bottom() {
            return self.acquire(g);
        }

        let key = (f, g);
        if let Some(result) = self.union_cache.get(&key) {
            return self.cached(result);
        }

        let fv = self.variable(f);
        let gv = self.variable(g);
        let result = match fv.cmp(&gv) {
            Ordering::Less => {
                if self.is_tautology(f) {
                    // taut(v) already contains every set over {v, ...}
                    self.acquire(f)
                } else {
                    let f_node = self.node(f);
                    let low = self.union(f_node.low, g);
                    let high = self.acquire(f_node.high);
                    self.make_node(fv, low, high)
                }
            }
            Ordering::Greater => {
                if self.is_tautology(g) {
                    self.acquire(g)
                } else {
                    let g_node = self.node(g);
                    let low = self.union(f, g_node.low);
                    let high = self.acquire(g_node.high);
                    self.make_node(gv, low, high)
                }
            }
            Ordering::Equal => {
                let f_node = self.node(f);
                let g_node = self.node(g);
                let low = self.union(f_node.low, g_node.low);
                let high = self.union(f_node.high, g_node.high);
                self.make_node(fv, low, high)
            }
        };

        self.union_cache.insert(key, result);
        result
    }

    /// Intersection: sets in both families.
    pub fn intersection(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("intersection({}, {})", f, g);

        let (mut f, mut g) = (f, g);
        loop {
            if f == g {
                return self.acquire(f);
            }
            if f.is_bottom() || g.is_bottom() {
                return self.bottom();
            }
            let fv = self.variable(f);
            let gv = self.variable(g);
            if self.is_tautology(f) && fv <= gv {
                return self.acquire(g);
            }
            if self.is_tautology(g) && gv <= fv {
                return self.acquire(f);
            }
            // sets branching on a variable the other side lacks cannot match:
            // walk down the operand with the lower top variable
            match fv.cmp(&gv) {
                Ordering::Less => f = self.low(f),
                Ordering::Greater => g = self.low(g),
                Ordering::Equal => {
                    let (f, g) = if f <= g { (f, g) } else { (g, f) };
                    let key = (f, g);
                    if let Some(result) = self.intersection_cache.get(&key) {
                        return self.cached(result);
                    }
                    let f_node = self.node(f);
                    let g_node = self.node(g);
                    let low = self.intersection(f_node.low, g_node.low);
                    let high = self.intersection(f_node.high, g_node.high);
                    let result = self.make_node(fv, low, high);
                    self.intersection_cache.insert(key, result);
                    return result;
                }
            }
        }
    }

    /// Difference: sets of `f` not in `g`. Not symmetric.
    pub fn difference(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("difference({}, {})", f, g);

        let mut g = g;
        loop {
            if f.is_bottom() || f == g {
                return self.bottom();
            }
            if g.is_bottom() {
                return self.acquire(f);
            }
            let fv = self.variable(f);
            let gv = self.variable(g);
            if gv < fv {
                // g branches on a variable absent from f; only g.low overlaps
                g = self.low(g);
                continue;
            }
            let key = (f, g);
            if let Some(result) = self.difference_cache.get(&key) {
                return self.cached(result);
            }
            let f_node = self.node(f);
            let result = if fv < gv {
                let low = self.difference(f_node.low, g);
                let high = self.acquire(f_node.high);
                self.make_node(fv, low, high)
            } else {
                let g_node = self.node(g);
                let low = self.difference(f_node.low, g_node.low);
                let high = self.difference(f_node.high, g_node.high);
                self.make_node(fv, low, high)
            };
            self.difference_cache.insert(key, result);
            return result;
        }
    }

    /// Join: `{S ∪ T | S ∈ f, T ∈ g}`.
    pub fn join(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("join({}, {})", f, g);

        let (f, g) = if f <= g { (f, g) } else { (g, f) };
        if f.is_bottom() {
            return self.bottom();
        }
        if f.is_top() {
            return self.acquire(g);
        }

        let key = (f, g);
        if let Some(result) = self.join_cache.get(&key) {
            return self.cached(result);
        }

        let f_node = self.node(f);
        let g_node = self.node(g);
        let result = match f_node.var.cmp(&g_node.var) {
            Ordering::Less => {
                let low = self.join(f_node.low, g);
                let high = self.join(f_node.high, g);
                self.make_node(f_node.var, low, high)
            }
            Ordering::Greater => {
                let low = self.join(f, g_node.low);
                let high = self.join(f, g_node.high);
                self.make_node(g_node.var, low, high)
            }
            Ordering::Equal => {
                let low = self.join(f_node.low, g_node.low);
                // the variable ends up in the pair union when it comes from
                // f, from g, or from both
                let g_any = self.union(g_node.low, g_node.high);
                let from_f = self.join(f_node.high, g_any);
                self.release(g_any);
                let from_g = self.join(f_node.low, g_node.high);
                let high = self.union(from_f, from_g);
                self.release(from_f);
                self.release(from_g);
                self.make_node(f_node.var, low, high)
            }
        };

        self.join_cache.insert(key, result);
        result
    }

    /// Meet: `{S ∩ T | S ∈ f, T ∈ g}`.
    pub fn meet(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("meet({}, {})", f, g);

        let (f, g) = if f <= g { (f, g) } else { (g, f) };
        if f.is_bottom() {
            return self.bottom();
        }
        if f.is_top() {
            // every pairwise intersection with ∅ is ∅
            return self.top();
        }

        let key = (f, g);
        if let Some(result) = self.meet_cache.get(&key) {
            return self.cached(result);
        }

        let f_node = self.node(f);
        let g_node = self.node(g);
        let result = match f_node.var.cmp(&g_node.var) {
            Ordering::Less => {
                // f's top variable vanishes from every pair intersection
                let stripped = self.union(f_node.low, f_node.high);
                let result = self.meet(stripped, g);
                self.release(stripped);
                result
            }
            Ordering::Greater => {
                let stripped = self.union(g_node.low, g_node.high);
                let result = self.meet(f, stripped);
                self.release(stripped);
                result
            }
            Ordering::Equal => {
                // only pairs taking the variable from both sides keep it
                let g_any = self.union(g_node.low, g_node.high);
                let from_f_low = self.meet(f_node.low, g_any);
                self.release(g_any);
                let from_f_high = self.meet(f_node.high, g_node.low);
                let low = self.union(from_f_low, from_f_high);
                self.release(from_f_low);
                self.release(from_f_high);
                let high = self.meet(f_node.high, g_node.high);
                self.make_node(f_node.var, low, high)
            }
        };

        self.meet_cache.insert(key, result);
        result
    }

    /// Keeps only the inclusion-maximal sets of `f`.
    pub fn maximal(&mut self, f: ZddId) -> ZddId {
        debug!("maximal({})", f);

        if f.is_terminal() {
            return self.acquire(f);
        }

        if let Some(result) = self.maximal_cache.get(&f) {
            return self.cached(result);
        }

        let f_node = self.node(f);
        let high = self.maximal(f_node.high);
        let max_low = self.maximal(f_node.low);
        // drop low-branch sets subsumed by a surviving high-branch set
        let low = self.nonsubsets(max_low, high);
        self.release(max_low);
        let result = self.make_node(f_node.var, low, high);

        self.maximal_cache.insert(f, result);
        result
    }

    /// Sets of `f` that are not a subset of any set in `g`.
    pub fn nonsubsets(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("nonsubsets({}, {})", f, g);

        let mut g = g;
        loop {
            if g.is_bottom() {
                return self.acquire(f);
            }
            if f.is_terminal() || f == g {
                // ∅ is a subset of any set of a non-empty g
                return self.bottom();
            }
            let fv = self.variable(f);
            let gv = self.variable(g);
            if fv > gv {
                g = self.low(g);
                continue;
            }
            let key = (f, g);
            if let Some(result) = self.nonsubsets_cache.get(&key) {
                return self.cached(result);
            }
            let f_node = self.node(f);
            let result = if fv < gv {
                // f.high sets contain fv, which no set of g has
                let low = self.nonsubsets(f_node.low, g);
                let high = self.acquire(f_node.high);
                self.make_node(fv, low, high)
            } else {
                let g_node = self.node(g);
                let against_high = self.nonsubsets(f_node.low, g_node.high);
                let against_low = self.nonsubsets(f_node.low, g_node.low);
                let low = self.intersection(against_high, against_low);
                self.release(against_high);
                self.release(against_low);
                let high = self.nonsubsets(f_node.high, g_node.high);
                self.make_node(fv, low, high)
            };
            self.nonsubsets_cache.insert(key, result);
            return result;
        }
    }

    /// Sets of `f` that are not a superset of any set in `g`.
    pub fn nonsupersets(&mut self, f: ZddId, g: ZddId) -> ZddId {
        debug!("nonsupersets({}, {})", f, g);

        let mut g = g;
        loop {
            if g.is_bottom() {
                return self.acquire(f);
            }
            if f.is_bottom() || g.is_top() || f == g {
                // every set is a superset of itself and of ∅
                return self.bottom();
            }
            let fv = self.variable(f);
            let gv = self.variable(g);
            if gv < fv {
                // g.high sets contain gv, which no set of f has
                g = self.low(g);
                continue;
            }
            let key = (f, g);
            if let Some(result) = self.nonsupersets_cache.get(&key) {
                return self.cached(result);
            }
            let f_node = self.node(f);
            let result = if fv < gv {
                let low = self.nonsupersets(f_node.low, g);
                let high = self.nonsupersets(f_node.high, g);
                self.make_node(fv, low, high)
            } else {
                let g_node = self.node(g);
                let low = self.nonsupersets(f_node.low, g_node.low);
                let against_high = self.nonsupersets(f_node.high, g_node.high);
                let against_low = self.nonsupersets(f_node.high, g_node.low);
                let high = self.intersection(against_high, against_low);
                self.release(against_high);
                self.release(against_low);
                self.make_node(fv, low, high)
            };
            self.nonsupersets_cache.insert(key, result);
            return result;
        }
    }

    /// All `k`-element combinations over the elements of a family of
    /// singletons: `choose({{a}, {b}, {c}}, 2) = {{a,b}, {a,c}, {b,c}}`.
    pub fn choose(&mut self, f: ZddId, k: u32) -> ZddId {
        debug!("choose({}, {})", f, k);

        if f.is_terminal() {
            return if k > 0 { self.bottom() } else { self.top() };
        }
        if k == 1 {
            return self.acquire(f);
        }

        let key = (f, k);
        if let Some(result) = self.choose_cache.get(&key) {
            return self.cached(result);
        }

        let f_node = self.node(f);
        let low = self.choose(f_node.low, k);
        let result = if k > 0 {
            let high = self.choose(f_node.low, k - 1);
            self.make_node(f_node.var, low, high)
        } else {
            low
        };

        self.choose_cache.insert(key, result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_permanent_handles() {
        let zdd = Zdd::new(3);
        assert_eq!(zdd.num_variables(), 3);
        assert_eq!(zdd.num_nodes(), 8); // 2 terminals + 3 elementary + 3 tautology

        assert!(zdd.bottom().is_bottom());
        assert!(zdd.top().is_top());
        for v in 0..3 {
            let e = zdd.elementary(v);
            assert_eq!(zdd.variable(e), v);
            assert_eq!(zdd.low(e), zdd.bottom());
            assert_eq!(zdd.high(e), zdd.top());
        }
        assert_eq!(zdd.tautology(), zdd.tautology_from(0));
        assert_eq!(zdd.tautology_from(3), zdd.top());
        assert!(zdd.is_tautology(zdd.tautology_from(1)));
        assert!(!zdd.is_tautology(zdd.elementary(1)));
    }

    #[test]
    fn test_make_node_reduction_and_canonicity() {
        let mut zdd = Zdd::new(3);
        let e1 = zdd.elementary(1);

        // zero-suppression: high = ⊥ collapses to low
        let reduced = zdd.make_node(0, e1, zdd.bottom());
        assert_eq!(reduced, e1);

        // canonicity: same triple, same handle
        let h1 = zdd.make_node(0, e1, zdd.top());
        let h2 = zdd.make_node(0, e1, zdd.top());
        assert_eq!(h1, h2);

        // bootstrap entries are found, not duplicated
        let e0 = zdd.make_node(0, zdd.bottom(), zdd.top());
        assert_eq!(e0, zdd.elementary(0));

        zdd.release(h1);
        zdd.release(h2);
    }

    #[test]
    fn test_union_of_elementaries() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let u = zdd.union(e0, e1);
        assert_eq!(zdd.count_sets(u), 2u32.into());
        assert_eq!(zdd.count_nodes(u), 2);

        // idempotence and identity
        let uu = zdd.union(u, u);
        assert_eq!(uu, u);
        let ub = zdd.union(u, zdd.bottom());
        assert_eq!(ub, u);

        // commutativity
        let u2 = zdd.union(e1, e0);
        assert_eq!(u2, u);

        for handle in [u, uu, ub, u2] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_intersection() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let i = zdd.intersection(e0, e1);
        assert!(i.is_bottom());
        assert_eq!(zdd.count_sets(i), 0u32.into());

        let u = zdd.union(e0, e1);
        let back = zdd.intersection(u, e0);
        assert_eq!(back, e0);

        // tautology absorbs
        let t = zdd.intersection(u, zdd.tautology());
        assert_eq!(t, u);

        let same = zdd.intersection(u, u);
        assert_eq!(same, u);

        for handle in [u, t, same] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_difference() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let u = zdd.union(e0, e1);
        let d = zdd.difference(u, e0);
        assert_eq!(d, e1);

        let dd = zdd.difference(u, u);
        assert!(dd.is_bottom());
        let db = zdd.difference(u, zdd.bottom());
        assert_eq!(db, u);
        let bd = zdd.difference(zdd.bottom(), u);
        assert!(bd.is_bottom());

        for handle in [u, db] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_join() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let j = zdd.join(e0, e1);
        assert_eq!(zdd.count_sets(j), 1u32.into());
        assert_eq!(zdd.variable(j), 0);
        assert_eq!(zdd.count_nodes(j), 2);

        // {∅} is the join identity
        let jt = zdd.join(j, zdd.top());
        assert_eq!(jt, j);
        let jb = zdd.join(j, zdd.bottom());
        assert!(jb.is_bottom());

        for handle in [j, jt] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_meet() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let e2 = zdd.elementary(2);

        // {{0,1}} ⊓ {{0,2}} = {{0}}
        let a = zdd.join(e0, e1);
        let b = zdd.join(e0, e2);
        let m = zdd.meet(a, b);
        assert_eq!(m, e0);

        // disjoint sets meet in ∅: {{0}} ⊓ {{1}} = {∅}
        let m2 = zdd.meet(e0, e1);
        assert_eq!(m2, zdd.top());

        for handle in [a, b] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_maximal() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        // {{0}, {0,1}}: {0} is subsumed by {0,1}
        let j = zdd.join(e0, e1);
        let family = zdd.union(e0, j);
        let m = zdd.maximal(family);
        assert_eq!(zdd.count_sets(m), 1u32.into());
        assert_eq!(m, j);

        // already an antichain: unchanged
        let u = zdd.union(e0, e1);
        let mu = zdd.maximal(u);
        assert_eq!(mu, u);

        for handle in [j, family, m, u, mu] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_nonsubsets() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let u = zdd.union(e0, e1);
        let j = zdd.join(e0, e1);

        // {1} is not a subset of {0}
        let kept = zdd.nonsubsets(u, e0);
        assert_eq!(kept, e1);

        // both {0} and {1} are subsets of {0,1}
        let none = zdd.nonsubsets(u, j);
        assert!(none.is_bottom());

        let all = zdd.nonsubsets(u, zdd.bottom());
        assert_eq!(all, u);

        for handle in [u, j, all] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_nonsupersets() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let u = zdd.union(e0, e1);

        // {1} is not a superset of {0}
        let kept = zdd.nonsupersets(u, e0);
        assert_eq!(kept, e1);

        // every set is a superset of ∅
        let none = zdd.nonsupersets(u, zdd.top());
        assert!(none.is_bottom());

        let all = zdd.nonsupersets(u, zdd.bottom());
        assert_eq!(all, u);
        let bottom = zdd.nonsupersets(zdd.bottom(), u);
        assert!(bottom.is_bottom());

        for handle in [u, all] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_choose() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let e2 = zdd.elementary(2);

        let u01 = zdd.union(e0, e1);
        let singletons = zdd.union(u01, e2);

        let pairs = zdd.choose(singletons, 2);
        assert_eq!(zdd.count_sets(pairs), 3u32.into());

        let all = zdd.choose(singletons, 3);
        assert_eq!(zdd.count_sets(all), 1u32.into());

        let nothing = zdd.choose(singletons, 0);
        assert_eq!(nothing, zdd.top());

        let one = zdd.choose(singletons, 1);
        assert_eq!(one, singletons);

        for handle in [u01, singletons, pairs, all, one] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_tautology_counts() {
        let zdd = Zdd::new(3);
        assert_eq!(zdd.count_sets(zdd.tautology()), 8u32.into());
        assert_eq!(zdd.count_sets(zdd.tautology_from(1)), 4u32.into());
        assert_eq!(zdd.count_sets(zdd.tautology_from(2)), 2u32.into());
        assert_eq!(zdd.count_sets(zdd.top()), 1u32.into());
    }

    #[test]
    fn test_union_tautology_fast_path() {
        let mut zdd = Zdd::new(3);
        let e1 = zdd.elementary(1);
        let taut = zdd.tautology();

        let u = zdd.union(taut, e1);
        assert_eq!(u, taut);
        zdd.release(u);
    }

    #[test]
    fn test_associativity() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let e2 = zdd.elementary(2);

        let ab = zdd.union(e0, e1);
        let ab_c = zdd.union(ab, e2);
        let bc = zdd.union(e1, e2);
        let a_bc = zdd.union(e0, bc);
        assert_eq!(ab_c, a_bc);

        for handle in [ab, ab_c, bc, a_bc] {
            zdd.release(handle);
        }
    }

    #[test]
    fn test_death_and_revival_via_cache() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let u = zdd.union(e0, e1);
        let alive = zdd.num_nodes();
        zdd.release(u);
        // dead, but the slot is still there
        assert_eq!(zdd.num_nodes(), alive - 1);

        // recomputing hits the cache and revives the same node
        let u2 = zdd.union(e0, e1);
        assert_eq!(u2, u);
        assert_eq!(zdd.num_nodes(), alive);
        zdd.release(u2);
    }

    #[test]
    fn test_revival_via_unique_table() {
        let mut zdd = Zdd::new(3);
        let e1 = zdd.elementary(1);

        let h = zdd.make_node(0, e1, zdd.top());
        zdd.release(h);

        // same triple: the dead entry is revived, not duplicated
        let h2 = zdd.make_node(0, e1, zdd.top());
        assert_eq!(h2, h);
        zdd.release(h2);
    }

    #[test]
    fn test_no_leak_after_release() {
        let mut zdd = Zdd::new(3);
        let baseline = zdd.num_nodes();

        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let u = zdd.union(e0, e1);
        let j = zdd.join(e0, e1);
        let family = zdd.union(e0, j);
        let m = zdd.maximal(family);
        assert!(zdd.num_nodes() > baseline);

        for handle in [u, j, family, m] {
            zdd.release(handle);
        }
        zdd.collect_garbage();
        assert_eq!(zdd.num_nodes(), baseline);

        // collecting again is a no-op
        zdd.collect_garbage();
        assert_eq!(zdd.num_nodes(), baseline);
    }

    #[test]
    fn test_slot_reuse_after_collect() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let e2 = zdd.elementary(2);

        let u = zdd.union(e0, e1);
        zdd.release(u);
        zdd.collect_garbage();

        // the reclaimed slot backs the next allocation
        let j = zdd.join(e0, e2);
        assert_eq!(j.raw(), u.raw());
        zdd.release(j);
    }

    #[test]
    fn test_gc_triggers_during_allocation() {
        let mut zdd = Zdd::new(8);
        let baseline = zdd.num_nodes();

        // one fresh node per pair {i, j}, all held alive: nothing dies,
        // so no collection can happen during construction
        let mut pairs = Vec::new();
        for i in 0..8 {
            for j in (i + 1)..8 {
                let ei = zdd.elementary(i);
                let ej = zdd.elementary(j);
                pairs.push(zdd.join(ei, ej));
            }
        }
        let total_slots = zdd.nodes.len();
        assert!(zdd.free.is_empty());

        for pair in pairs {
            zdd.release(pair);
        }
        assert!(zdd.free.is_empty());
        assert_eq!(zdd.num_nodes(), baseline);

        // no free slot and far more dead nodes than an eighth of the
        // live count: the next allocation collects on its own
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let u = zdd.union(e0, e1);
        assert!(!zdd.free.is_empty());
        assert_eq!(zdd.nodes.len(), total_slots);
        assert_eq!(zdd.num_nodes(), baseline + 1);

        zdd.release(u);
        zdd.collect_garbage();
        assert_eq!(zdd.num_nodes(), baseline);
    }

    #[test]
    fn test_acquire_release_balance() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);

        let u = zdd.union(e0, e1);
        zdd.acquire_n(u, 3);
        for _ in 0..3 {
            zdd.release(u);
        }
        // the operator's own reference is still held
        assert!(zdd.node(u).is_alive());
        zdd.release(u);
        assert!(zdd.node(u).is_dead());
    }

    #[test]
    #[should_panic(expected = "release on dead handle")]
    fn test_double_release_panics() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let u = zdd.union(e0, e1);
        zdd.release(u);
        zdd.release(u);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_elementary_out_of_range_panics() {
        let zdd = Zdd::new(3);
        let _ = zdd.elementary(3);
    }

    #[test]
    fn test_maximal_is_antichain_subset() {
        let mut zdd = Zdd::new(3);
        let e0 = zdd.elementary(0);
        let e1 = zdd.elementary(1);
        let e2 = zdd.elementary(2);

        // {{0}, {1}, {0,1}, {1,2}}
        let j01 = zdd.join(e0, e1);
        let j12 = zdd.join(e1, e2);
        let u1 = zdd.union(e0, e1);
        let u2 = zdd.union(u1, j01);
        let family = zdd.union(u2, j12);
        assert_eq!(zdd.count_sets(family), 4u32.into());

        let m = zdd.maximal(family);
        // {0} ⊂ {0,1} and {1} ⊂ {0,1} drop out
        assert_eq!(zdd.count_sets(m), 2u32.into());
        assert!(zdd.count_sets(m) <= zdd.count_sets(family));

        // maximal sets survive as members of the original family
        let inter = zdd.intersection(m, family);
        assert_eq!(inter, m);

        for handle in [j01, j12, u1, u2, family, m, inter] {
            zdd.release(handle);
        }
    }
}
