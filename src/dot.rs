//! Graphviz DOT export.

use std::collections::HashSet;
use std::fmt::Write;

use crate::reference::ZddId;
use crate::zdd::Zdd;

impl Zdd {
    /// Renders the diagram rooted at `f` in Graphviz DOT format.
    ///
    /// Nodes of one variable share a rank; low edges are dashed, high edges
    /// solid.
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
    /// let dot = zdd.to_dot(u);
    /// assert!(dot.starts_with("digraph ZDD {"));
    /// ```
    pub fn to_dot(&self, f: ZddId) -> String {
        let mut dot = String::new();
        writeln!(dot, "digraph ZDD {{").unwrap();
        writeln!(dot, "  rankdir=TB;").unwrap();
        writeln!(dot, "  node [shape=circle];").unwrap();
        writeln!(dot).unwrap();

        writeln!(dot, "  // Terminals").unwrap();
        writeln!(dot, "  bottom [label=\"⊥\", shape=square];").unwrap();
        writeln!(dot, "  top [label=\"⊤\", shape=square];").unwrap();
        writeln!(dot).unwrap();

        let mut visited = HashSet::new();
        let mut nodes_by_var: Vec<Vec<ZddId>> = vec![Vec::new(); self.num_variables() as usize];
        self.collect_nodes(f, &mut visited, &mut nodes_by_var);

        for (var, ids) in nodes_by_var.iter().enumerate() {
            if ids.is_empty() {
                continue;
            }
            writeln!(dot, "  // x{}", var).unwrap();
            writeln!(dot, "  {{ rank=same;").unwrap();
            for &id in ids {
                writeln!(dot, "    n{} [label=\"x{}\"];", id.raw(), var).unwrap();
            }
            writeln!(dot, "  }}").unwrap();
        }

        writeln!(dot).unwrap();
        writeln!(dot, "  // Edges").unwrap();
        for ids in &nodes_by_var {
            for &id in ids {
                let node = self.node(id);
                writeln!(dot, "  n{} -> {} [style=dashed];", id.raw(), dot_target(node.low)).unwrap();
                writeln!(dot, "  n{} -> {};", id.raw(), dot_target(node.high)).unwrap();
            }
        }

        writeln!(dot, "}}").unwrap();
        dot
    }

    fn collect_nodes(&self, id: ZddId, visited: &mut HashSet<ZddId>, nodes_by_var: &mut [Vec<ZddId>]) {
        if id.is_terminal() || !visited.insert(id) {
            return;
        }
        let node = self.node(id);
        nodes_by_var[node.var as usize].push(id);
        self.collect_nodes(node.low, visited, nodes_by_var);
        self.collect_nodes(node.high, visited, nodes_by_var);
    }
}

fn dot_target(id: ZddId) -> String {
    if id.is_bottom() {
        "bottom".to_string()
    } else if id.is_top() {
        "top".to_string()
    } else {
        format!("n{}", id.raw())
    }
}
