//! Counting sets and nodes in a family.

use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;

use crate::reference::ZddId;
use crate::zdd::Zdd;

impl Zdd {
    /// Number of sets in the family.
    ///
    /// Families over many variables can hold more sets than any machine
    /// integer, so the count is a [`BigUint`].
    ///
    /// # Example
    ///
    /// ```
    /// use zdd_rs::zdd::Zdd;
    ///
    /// let zdd = Zdd::new(10);
    /// assert_eq!(zdd.count_sets(zdd.tautology()), 1024u32.into());
    /// ```
    pub fn count_sets(&self, f: ZddId) -> BigUint {
        let mut memo = HashMap::new();
        self.count_sets_rec(f, &mut memo)
    }

    fn count_sets_rec(&self, f: ZddId, memo: &mut HashMap<ZddId, BigUint>) -> BigUint {
        if f.is_bottom() {
            return BigUint::ZERO;
        }
        if f.is_top() {
            return BigUint::from(1u32);
        }
        if let Some(count) = memo.get(&f) {
            return count.clone();
        }
        let node = self.node(f);
        let count = self.count_sets_rec(node.low, memo) + self.count_sets_rec(node.high, memo);
        memo.insert(f, count.clone());
        count
    }

    /// Number of distinct non-terminal nodes reachable from `f`.
    pub fn count_nodes(&self, f: ZddId) -> usize {
        let mut visited = HashSet::new();
        self.count_nodes_rec(f, &mut visited);
        visited.len()
    }

    fn count_nodes_rec(&self, f: ZddId, visited: &mut HashSet<ZddId>) {
        if f.is_terminal() || !visited.insert(f) {
            return;
        }
        let node = self.node(f);
        self.count_nodes_rec(node.low, visited);
        self.count_nodes_rec(node.high, visited);
    }
}
