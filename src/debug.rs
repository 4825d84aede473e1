//! Human-readable renderings of families and manager state.

use std::fmt::Write;

use crate::reference::ZddId;
use crate::zdd::Zdd;

impl Zdd {
    /// Renders the family extensionally in bracket notation, for example
    /// `{{1}, {0}, {0, 1}}`. The empty family is `∅` and `{∅}` is ⊤.
    ///
    /// Enumerates every set, so this is only suitable for small families.
    pub fn to_bracket_string(&self, f: ZddId) -> String {
        if f.is_bottom() {
            return "∅".to_string();
        }
        let mut out = String::from("{");
        for (i, set) in self.sets(f).enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if set.is_empty() {
                out.push('∅');
            } else {
                out.push('{');
                for (j, var) in set.iter().enumerate() {
                    if j > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}", var);
                }
                out.push('}');
            }
        }
        out.push('}');
        out
    }

    /// Dumps the whole manager state as a multi-line string: arena slots
    /// with their lifecycle state, unique table sizes, and cache statistics.
    pub fn dump_state(&self) -> String {
        let mut out = String::new();
        let mut w = |line: String| {
            let _ = writeln!(out, "{}", line);
        };

        w(format!(
            "Zdd: {} vars, {} nodes ({} total slots, {} dead, {} free)",
            self.num_variables(),
            self.num_nodes(),
            self.nodes.len(),
            self.dead,
            self.free.len()
        ));

        w("nodes:".to_string());
        for (index, node) in self.nodes.iter().enumerate() {
            if node.is_free() {
                continue;
            }
            let state = if node.is_dead() {
                " dead".to_string()
            } else {
                format!(" ref={}", node.ref_count())
            };
            w(format!(
                "  @{}: x{} low={} high={}{}",
                index, node.var, node.low, node.high, state
            ));
        }

        w("subtables:".to_string());
        for subtable in &self.subtables {
            w(format!("  x{}: {} entries", subtable.variable, subtable.len()));
        }

        w("caches:".to_string());
        let caches = [
            ("union", self.union_cache.len(), self.union_cache.hits(), self.union_cache.misses()),
            (
                "intersection",
                self.intersection_cache.len(),
                self.intersection_cache.hits(),
                self.intersection_cache.misses(),
            ),
            (
                "difference",
                self.difference_cache.len(),
                self.difference_cache.hits(),
                self.difference_cache.misses(),
            ),
            ("join", self.join_cache.len(), self.join_cache.hits(), self.join_cache.misses()),
            ("meet", self.meet_cache.len(), self.meet_cache.hits(), self.meet_cache.misses()),
            (
                "nonsubsets",
                self.nonsubsets_cache.len(),
                self.nonsubsets_cache.hits(),
                self.nonsubsets_cache.misses(),
            ),
            (
                "nonsupersets",
                self.nonsupersets_cache.len(),
                self.nonsupersets_cache.hits(),
                self.nonsupersets_cache.misses(),
            ),
            ("maximal", self.maximal_cache.len(), self.maximal_cache.hits(), self.maximal_cache.misses()),
            ("choose", self.choose_cache.len(), self.choose_cache.hits(), self.choose_cache.misses()),
        ];
        for (name, len, hits, misses) in caches {
            w(format!("  {}: {} entries, {} hits, {} misses", name, len, hits, misses));
        }

        out
    }
}
