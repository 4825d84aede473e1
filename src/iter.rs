//! Enumerating the sets of a family.

use crate::reference::ZddId;
use crate::zdd::Zdd;

/// Iterator that yields every set in a ZDD family as a sorted `Vec<u32>` of
/// variables.
///
/// Low branches are explored before high branches, so sets without a
/// variable come out before sets containing it.
pub struct SetIterator<'a> {
    zdd: &'a Zdd,
    /// Stack of (handle, set built so far, low branch already explored)
    stack: Vec<(ZddId, Vec<u32>, bool)>,
}

impl<'a> SetIterator<'a> {
    /// Creates an iterator over the sets of `root`.
    pub fn new(zdd: &'a Zdd, root: ZddId) -> Self {
        let mut iter = Self { zdd, stack: Vec::new() };
        if !root.is_bottom() {
            iter.stack.push((root, Vec::new(), false));
        }
        iter
    }
}

impl<'a> Iterator for SetIterator<'a> {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, set, visited_low)) = self.stack.pop() {
            if id.is_bottom() {
                continue;
            }
            if id.is_top() {
                return Some(set);
            }

            let node = self.zdd.node(id);
            if !visited_low {
                // come back for the high branch after the low branch is done
                self.stack.push((id, set.clone(), true));
                self.stack.push((node.low, set, false));
            } else {
                let mut with_var = set;
                with_var.push(node.var);
                self.stack.push((node.high, with_var, false));
            }
        }
        None
    }
}

impl Zdd {
    /// Returns an iterator over all sets in the family.
    ///
    /// # Example
    ///
    /// ```
    /// use zdd_rs::zdd::Zdd;
    ///
    /// let mut zdd = Zdd::new(3);
    /// let e0 = zdd.elementary(0);
    /// let e1 = zdd.elementary(1);
    /// let u = zdd.union(e0, e1);
    ///
    /// let sets: Vec<_> = zdd.sets(u).collect();
    /// assert_eq!(sets, vec![vec![1], vec![0]]);
    /// ```
    pub fn sets(&self, f: ZddId) -> SetIterator<'_> {
        SetIterator::new(self, f)
    }

    /// Collects all sets into a vector of sorted variable vectors.
    pub fn sets_as_vectors(&self, f: ZddId) -> Vec<Vec<u32>> {
        self.sets(f).collect()
    }

    /// Calls `visit` for every set in the family; stops early when `visit`
    /// returns false.
    pub fn for_each_set(&self, f: ZddId, mut visit: impl FnMut(&[u32]) -> bool) {
        for set in self.sets(f) {
            if !visit(&set) {
                return;
            }
        }
    }

    /// Returns one arbitrary set from the family, if non-empty.
    pub fn pick_one(&self, f: ZddId) -> Option<Vec<u32>> {
        if f.is_bottom() {
            return None;
        }
        let mut result = Vec::new();
        let mut current = f;
        while !current.is_top() {
            // following high edges always ends in ⊤, never ⊥
            let node = self.node(current);
            result.push(node.var);
            current = node.high;
        }
        Some(result)
    }
}
