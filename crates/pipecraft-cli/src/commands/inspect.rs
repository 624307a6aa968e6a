//! `pipecraft inspect`: validates a pipeline and describes its structure.

use std::fmt::Write;

use pipecraft_graph::analysis::{self, Adjacency};
use pipecraft_graph::graph::GraphStore;
use pipecraft_graph::node::NodeId;

use super::load_graph;
use crate::config::DocumentArgs;

pub fn run(args: &DocumentArgs) -> anyhow::Result<()> {
    let graph = load_graph(args)?;
    print!("{}", describe(&graph)?);
    Ok(())
}

/// Lists nodes with their ports, edges, the analysis report and a cycle if one exists.
fn describe(store: &GraphStore) -> Result<String, std::fmt::Error> {
    let graph = store.graph();
    let mut out = String::new();

    writeln!(out, "Nodes ({}):", graph.node_count())?;
    for node in graph.nodes() {
        writeln!(out, "  {} [{}] {}", node.id, node.kind(), node.label())?;

        let Some(ports) = store.ports(&node.id) else {
            continue;
        };
        for port in ports.inputs.iter().chain(&ports.outputs) {
            let marker = if port.is_dynamic() { " (variable)" } else { "" };
            writeln!(out, "    {} {}{}", port.direction, port.id, marker)?;
        }
    }

    writeln!(out, "Edges ({}):", graph.edge_count())?;
    for edge in graph.edges() {
        writeln!(
            out,
            "  {}:{} -> {}:{}",
            edge.source, edge.source_port, edge.target, edge.target_port
        )?;
    }

    let report = analysis::analyze(graph);
    writeln!(out, "{report}")?;

    let adjacency = Adjacency::new(
        graph.node_ids().map(NodeId::as_str),
        graph
            .edges()
            .map(|edge| (edge.source.as_str(), edge.target.as_str())),
    );
    if let Some(cycle) = adjacency.find_cycle()
        && let Some(first) = cycle.first()
    {
        writeln!(out, "Cycle: {} -> {first}", cycle.join(" -> "))?;
    }

    Ok(out)
}
