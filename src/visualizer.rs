use color_eyre::eyre::Result;
use petgraph::dot::Dot;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::prelude::StableGraph;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::process::Command;

use crate::fa::FA;

fn generate_stable_graph<T: FA>(fa: &T) -> StableGraph<String, String> {
    let mut stable_graph = StableGraph::new();

    let num_states = fa.get_num_states();

    let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

    for state_idx in 0..num_states {
        let mut node_label = fa.get_state_label(state_idx);

        if fa.get_acceptor_states()[state_idx] {
            node_label = format!("Accept\n{}", node_label);
        }
        if state_idx == fa.get_start_state() {
            node_label = format!("Start\n{}", node_label);
        }

        stable_graph.add_node(node_label);
    }

    // Parallel transitions share one edge whose label lists every symbol

    for state_idx in 0..num_states {
        for (symbol, target) in fa.get_state_transitions(state_idx) {
            let key = (NodeIndex::new(state_idx), NodeIndex::new(target));

            match edge_map.get(&key) {
                Some(edge_idx) => {
                    let old_label = &stable_graph[*edge_idx];
                    stable_graph[*edge_idx] = format!("{}, {}", old_label, symbol);
                }
                None => {
                    let edge_idx = stable_graph.add_edge(key.0, key.1, symbol.to_string());
                    edge_map.insert(key, edge_idx);
                }
            }
        }
    }

    stable_graph
}

/// Graphviz DOT source for an automaton.
pub fn generate_dot<T: FA>(fa: &T) -> String {
    let stable_graph = generate_stable_graph(fa);
    Dot::new(&stable_graph).to_string()
}

/// Write `<filename>.dot` and, when Graphviz is installed, render it to `<filename>.jpg`.
pub fn save_dot<T: FA>(fa: &T, filename: &str) -> Result<()> {
    let dot_filename = format!("{}.dot", filename);
    let mut dot_file = File::create(&dot_filename)?;

    dot_file.write_all(generate_dot(fa).as_bytes())?;

    tracing::info!("dot representation saved as {}", dot_filename);

    match Command::new("dot")
        .args(["-Tjpg", &dot_filename, "-o", &format!("{}.jpg", filename)])
        .output()
    {
        Ok(output) if output.status.success() => {
            tracing::info!("vizualization saved as {}.jpg", filename)
        }
        Ok(output) => tracing::warn!("graphviz exited with {}", output.status),
        Err(error) => tracing::warn!("could not run graphviz: {}", error),
    }

    Ok(())
}
