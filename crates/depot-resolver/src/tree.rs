//! Dependency tree rendering from a resolved lib map.
//!
//! The lib map is flat; the forest is reconstructed from each entry's
//! `dependents` (reverse edges). Roots are the libs nothing depends on,
//! i.e. the surviving top deps.

use std::collections::{HashMap, HashSet};

use depot_core::dependency::{Coord, Lib};
use depot_core::provider::Provider;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::materialize::LibMap;

/// Render the dependency forest, one line per node, using `summary` for
/// each lib/coord pair.
pub fn render_tree(lib_map: &LibMap, summary: &dyn Fn(&Lib, &Coord) -> String) -> String {
    let mut graph: DiGraph<Lib, ()> = DiGraph::new();
    let mut index: HashMap<&Lib, NodeIndex> = HashMap::new();

    for lib in lib_map.libs.keys() {
        let idx = graph.add_node(lib.clone());
        index.insert(lib, idx);
    }
    for (lib, resolved) in &lib_map.libs {
        for parent in &resolved.dependents {
            if let (Some(&from), Some(&to)) = (index.get(parent), index.get(lib)) {
                graph.add_edge(from, to, ());
            }
        }
    }

    let mut roots: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&idx| {
            graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .is_none()
        })
        .collect();
    roots.sort_by(|a, b| graph[*a].cmp(&graph[*b]));

    let mut output = String::new();
    let mut visited = HashSet::new();
    for root in roots {
        let lib = &graph[root];
        if let Some(resolved) = lib_map.get(lib) {
            output.push_str(&summary(lib, &resolved.coord));
            output.push('\n');
        }
        visited.insert(root);
        let children = sorted_children(&graph, root);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            print_subtree(
                &graph,
                lib_map,
                summary,
                &mut output,
                child,
                "",
                i == count - 1,
                &mut visited,
            );
        }
        visited.remove(&root);
    }
    output
}

/// Print the forest to stdout using the provider's coord summaries.
pub fn print_tree(lib_map: &LibMap, provider: &dyn Provider) {
    let rendered = render_tree(lib_map, &|lib, coord| provider.coord_summary(lib, coord));
    print!("{rendered}");
}

fn sorted_children(graph: &DiGraph<Lib, ()>, idx: NodeIndex) -> Vec<NodeIndex> {
    let mut children: Vec<NodeIndex> = graph
        .edges_directed(idx, Direction::Outgoing)
        .map(|e| e.target())
        .collect();
    children.sort_by(|a, b| graph[*a].cmp(&graph[*b]));
    children.dedup();
    children
}

#[allow(clippy::too_many_arguments)]
fn print_subtree(
    graph: &DiGraph<Lib, ()>,
    lib_map: &LibMap,
    summary: &dyn Fn(&Lib, &Coord) -> String,
    output: &mut String,
    idx: NodeIndex,
    prefix: &str,
    is_last: bool,
    visited: &mut HashSet<NodeIndex>,
) {
    let connector = if is_last { "└── " } else { "├── " };
    let lib = &graph[idx];
    if let Some(resolved) = lib_map.get(lib) {
        output.push_str(&format!("{prefix}{connector}{}\n", summary(lib, &resolved.coord)));
    }

    if !visited.insert(idx) {
        return;
    }

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    let children = sorted_children(graph, idx);
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        print_subtree(
            graph,
            lib_map,
            summary,
            output,
            child,
            &child_prefix,
            i == count - 1,
            visited,
        );
    }

    visited.remove(&idx);
}
