use std::sync::{Arc, Mutex};

use serde_json::json;

use super::*;
use crate::document::PipelineDocument;
use crate::node::{NodeConfig, NodeId, NodeKind, Position, Size};
use crate::port::PortDirection;
use crate::{Error, ErrorKind, Result};

fn at(x: f64, y: f64) -> Position {
    Position::new(x, y)
}

fn text_patch(value: &str) -> NodeConfig {
    NodeConfig::new().with("value", value)
}

#[test]
fn add_node_allocates_sequential_ids_with_defaults() {
    let mut store = GraphStore::new();
    let first = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let second = store.add_node(NodeKind::Llm, at(10.0, 0.0));

    assert_eq!(first, "node_0");
    assert_eq!(second, "node_1");

    let llm = store.graph().node(&second).map(|node| node.config.clone());
    assert_eq!(
        llm.as_ref().and_then(|config| config.label()),
        Some("llm node")
    );
    assert_eq!(
        llm.as_ref().and_then(|config| config.get_str("model")),
        Some("gpt-4")
    );
}

#[test]
fn deleted_ids_are_never_reused() {
    let mut store = GraphStore::new();
    let ids: Vec<NodeId> = (0..3)
        .map(|_| store.add_node(NodeKind::Transform, at(0.0, 0.0)))
        .collect();

    store.remove_nodes(&ids[2..]);
    assert_eq!(store.add_node(NodeKind::Transform, at(0.0, 0.0)), "node_3");

    store.clear();
    assert_eq!(store.add_node(NodeKind::Transform, at(0.0, 0.0)), "node_4");
}

#[test]
fn removing_nodes_cascades_to_edges() -> Result<()> {
    let mut store = GraphStore::new();
    let a = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let b = store.add_node(NodeKind::Transform, at(1.0, 0.0));
    let c = store.add_node(NodeKind::Output, at(2.0, 0.0));
    store.add_edge(Connection::new(a.clone(), "output", b.clone(), "input"))?;
    store.add_edge(Connection::new(b.clone(), "output", c.clone(), "input"))?;

    let removal = store.remove_nodes(&[b]);

    assert_eq!(removal.nodes.len(), 1);
    assert_eq!(removal.edges.len(), 2);
    assert_eq!(store.graph().node_count(), 2);
    assert_eq!(store.graph().edge_count(), 0);
    assert!(store.graph().contains_node(&a));
    assert!(store.graph().contains_node(&c));
    Ok(())
}

#[test]
fn connect_rejects_self_loops_and_duplicates() -> Result<()> {
    let mut store = GraphStore::new();
    let a = store.add_node(NodeKind::Transform, at(0.0, 0.0));
    let b = store.add_node(NodeKind::Transform, at(1.0, 0.0));

    let self_loop = store.add_edge(Connection::new(a.clone(), "output", a.clone(), "input"));
    assert!(matches!(
        self_loop,
        Err(Error::Rejected(ConnectionRejection::SelfLoop { .. }))
    ));

    store.add_edge(Connection::new(a.clone(), "output", b.clone(), "input"))?;
    let duplicate = store.add_edge(Connection::new(a.clone(), "output", b.clone(), "input"));
    assert!(matches!(
        duplicate,
        Err(Error::Rejected(ConnectionRejection::Duplicate { .. }))
    ));

    // The reverse direction is a different connection and closes a cycle.
    store.add_edge(Connection::new(b, "output", a, "input"))?;
    assert_eq!(store.graph().edge_count(), 2);
    Ok(())
}

#[test]
fn connect_requires_existing_nodes_and_ports() {
    let mut store = GraphStore::new();
    let input = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let merge = store.add_node(NodeKind::Merge, at(1.0, 0.0));

    let missing = store.add_edge(Connection::new(input.clone(), "output", "ghost", "input"));
    assert!(matches!(
        missing,
        Err(Error::Rejected(ConnectionRejection::UnknownNode { .. }))
    ));

    let wrong_port = store.add_edge(Connection::new(input.clone(), "output", merge.clone(), "input"));
    assert!(matches!(
        wrong_port,
        Err(Error::Rejected(ConnectionRejection::UnknownPort {
            direction: PortDirection::Input,
            ..
        }))
    ));

    let wrong_side = store.add_edge(Connection::new(merge, "input1", input, "output"));
    assert!(wrong_side.is_err());
    assert_eq!(store.graph().edge_count(), 0);
}

#[test]
fn merge_accepts_two_sources_on_distinct_ports() -> Result<()> {
    let mut store = GraphStore::new();
    let a = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let b = store.add_node(NodeKind::Input, at(0.0, 1.0));
    let m = store.add_node(NodeKind::Merge, at(1.0, 0.0));

    store.add_edge(Connection::new(a, "output", m.clone(), "input1"))?;
    store.add_edge(Connection::new(b, "output", m.clone(), "input2"))?;

    assert_eq!(store.graph().incoming(&m).count(), 2);
    Ok(())
}

#[test]
fn editing_text_prunes_edges_of_removed_variables() -> Result<()> {
    let mut store = GraphStore::new();
    let source = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let text = store.add_node(NodeKind::Text, at(1.0, 0.0));

    store.update_node_config(&text, text_patch("Hello [[name]], you are [[age]]"))?;
    let ports = store.ports(&text).map(|ports| ports.inputs.len());
    assert_eq!(ports, Some(2));

    store.add_edge(Connection::new(source.clone(), "output", text.clone(), "var-name"))?;
    store.add_edge(Connection::new(source, "output", text.clone(), "var-age"))?;

    let pruned = store.update_node_config(&text, text_patch("Hello [[name]]"))?;

    assert_eq!(pruned.len(), 1);
    assert_eq!(pruned[0].target_port, "var-age");
    assert_eq!(store.graph().edge_count(), 1);
    Ok(())
}

#[test]
fn editing_text_keeps_edges_of_surviving_variables() -> Result<()> {
    let mut store = GraphStore::new();
    let source = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let text = store.add_node(NodeKind::Text, at(1.0, 0.0));

    store.update_node_config(&text, text_patch("[[x]]"))?;
    store.add_edge(Connection::new(source, "output", text.clone(), "var-x"))?;

    let pruned = store.update_node_config(&text, text_patch("now [[y]] and [[x]]"))?;
    assert!(pruned.is_empty());
    assert_eq!(store.graph().edge_count(), 1);
    Ok(())
}

#[test]
fn config_update_merges_shallowly() -> Result<()> {
    let mut store = GraphStore::new();
    let llm = store.add_node(NodeKind::Llm, at(0.0, 0.0));

    store.update_node_config(&llm, NodeConfig::new().with("temperature", 0.1))?;

    let config = store.graph().node(&llm).map(|node| node.config.clone());
    assert_eq!(config.as_ref().and_then(|c| c.get_str("model")), Some("gpt-4"));
    assert_eq!(
        config.as_ref().and_then(|c| c.get("temperature")).cloned(),
        Some(json!(0.1))
    );
    Ok(())
}

#[test]
fn operations_on_missing_nodes_fail() {
    let mut store = GraphStore::new();
    let ghost = NodeId::from("ghost");

    let results = [
        store.update_node_config(&ghost, NodeConfig::new()).map(|_| ()),
        store.resize_node(&ghost, Size::new(1.0, 1.0)),
        store.move_node(&ghost, at(1.0, 1.0)),
    ];
    for result in results {
        assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::NotFound));
    }
}

#[test]
fn resize_and_move_update_geometry() -> Result<()> {
    let mut store = GraphStore::new();
    let id = store.add_node(NodeKind::Condition, at(0.0, 0.0));

    store.resize_node(&id, Size::new(320.0, 180.0))?;
    store.move_node(&id, at(42.0, -7.5))?;

    let node = store.graph().node(&id).cloned();
    assert_eq!(node.as_ref().and_then(|n| n.size), Some(Size::new(320.0, 180.0)));
    assert_eq!(node.map(|n| n.position), Some(at(42.0, -7.5)));
    Ok(())
}

#[test]
fn hooks_run_after_each_commit_only() -> Result<()> {
    let commits = Arc::new(Mutex::new(Vec::new()));
    let mut store = GraphStore::new();
    {
        let commits = commits.clone();
        store.add_hook(move |graph: &PipelineGraph| {
            if let Ok(mut commits) = commits.lock() {
                commits.push(graph.node_count());
            }
        });
    }

    let a = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let _ = store.add_edge(Connection::new(a.clone(), "output", a.clone(), "input"));
    store.remove_nodes(&[NodeId::from("ghost")]);
    store.remove_nodes(&[a]);

    let seen = commits.lock().map(|c| c.clone()).unwrap_or_default();
    assert_eq!(seen, vec![1, 0]);
    Ok(())
}

#[test]
fn apply_dispatches_commands() -> Result<()> {
    let mut store = GraphStore::new();

    let outcome = store.apply(GraphCommand::AddNode {
        kind: NodeKind::Filter,
        position: at(0.0, 0.0),
    })?;
    let CommandOutcome::NodeAdded(filter) = outcome else {
        panic!("expected a node to be added, got {outcome:?}");
    };

    let output = store.add_node(NodeKind::Output, at(1.0, 0.0));
    let outcome = store.apply(GraphCommand::Connect(Connection::new(
        filter.clone(),
        "rejected",
        output,
        "input",
    )))?;
    let CommandOutcome::EdgeAdded(edge) = outcome else {
        panic!("expected an edge to be added, got {outcome:?}");
    };

    let outcome = store.apply(GraphCommand::RemoveEdges(vec![edge]))?;
    assert!(matches!(outcome, CommandOutcome::Removed(ref removal) if removal.edges.len() == 1));

    store.apply(GraphCommand::Clear)?;
    assert!(store.graph().is_empty());
    Ok(())
}

#[test]
fn rejected_replace_keeps_current_graph() -> Result<()> {
    let mut store = GraphStore::new();
    store.add_node(NodeKind::Input, at(0.0, 0.0));
    let before = store.graph().clone();

    let document = PipelineDocument::from_value(json!({
        "nodes": [
            { "id": "x", "type": "input", "position": { "x": 0, "y": 0 } },
            { "id": "x", "type": "output", "position": { "x": 0, "y": 0 } },
        ],
        "edges": [],
    }))?;

    let result = store.replace_all(document);
    assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::MalformedDocument));
    assert_eq!(store.graph(), &before);
    Ok(())
}

#[test]
fn imported_ids_advance_the_allocator() -> Result<()> {
    let mut store = GraphStore::new();
    let document = PipelineDocument::from_value(json!({
        "nodes": [
            { "id": "node_9", "type": "input", "position": { "x": 0, "y": 0 } },
            { "id": "custom", "type": "output", "position": { "x": 0, "y": 0 } },
        ],
        "edges": [],
    }))?;

    store.replace_all(document)?;
    assert_eq!(store.add_node(NodeKind::Text, at(0.0, 0.0)), "node_10");

    store.clear();
    assert_eq!(store.add_node(NodeKind::Text, at(0.0, 0.0)), "node_11");
    Ok(())
}

#[test]
fn exhausted_sequence_never_overwrites_a_node() -> Result<()> {
    let max = format!("node_{}", u64::MAX);
    let mut store = GraphStore::new();
    let document = PipelineDocument::from_value(json!({
        "nodes": [{ "id": max, "type": "input", "position": { "x": 0, "y": 0 } }],
        "edges": [],
    }))?;
    store.replace_all(document)?;

    let first = store.add_node(NodeKind::Output, at(0.0, 0.0));
    let second = store.add_node(NodeKind::Output, at(0.0, 0.0));

    assert_eq!(store.graph().node_count(), 3);
    assert_eq!(first, format!("{max}_1").as_str());
    assert_eq!(second, format!("{max}_2").as_str());
    assert_eq!(
        store.graph().node(&NodeId::new(max.as_str())).map(|node| node.kind()),
        Some(NodeKind::Input)
    );

    store.remove_nodes(&[second]);
    assert_eq!(store.add_node(NodeKind::Output, at(0.0, 0.0)), format!("{max}_3").as_str());
    Ok(())
}

#[test]
fn removing_edges_touching_keeps_the_nodes() -> Result<()> {
    let mut store = GraphStore::new();
    let a = store.add_node(NodeKind::Input, at(0.0, 0.0));
    let b = store.add_node(NodeKind::Transform, at(1.0, 0.0));
    let c = store.add_node(NodeKind::Output, at(2.0, 0.0));
    let d = store.add_node(NodeKind::Input, at(0.0, 1.0));
    let e = store.add_node(NodeKind::Output, at(2.0, 1.0));
    store.add_edge(Connection::new(a.clone(), "output", b.clone(), "input"))?;
    store.add_edge(Connection::new(b.clone(), "output", c.clone(), "input"))?;
    store.add_edge(Connection::new(d.clone(), "output", e.clone(), "input"))?;

    let commits = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&commits);
    store.add_hook(move |_: &PipelineGraph| {
        if let Ok(mut count) = counter.lock() {
            *count += 1;
        }
    });

    let removed = store.remove_edges_touching(&[b.clone()]);
    assert_eq!(removed.len(), 2);
    assert_eq!(store.graph().node_count(), 5);
    assert_eq!(store.graph().edges_touching(&b).count(), 0);
    assert_eq!(store.graph().edge_count(), 1);

    let outcome = store.apply(GraphCommand::RemoveEdgesTouching(vec![b, NodeId::from("ghost")]))?;
    assert_eq!(outcome, CommandOutcome::Removed(Removal::default()));
    assert_eq!(commits.lock().map(|count| *count).ok(), Some(1));
    Ok(())
}

#[test]
fn colliding_edge_ids_are_disambiguated() -> Result<()> {
    let mut store = GraphStore::new();
    let document = PipelineDocument::from_value(json!({
        "nodes": [
            { "id": "a", "type": "input", "position": { "x": 0, "y": 0 } },
            { "id": "aoutput-p", "type": "input", "position": { "x": 0, "y": 0 } },
            { "id": "q", "type": "merge", "position": { "x": 0, "y": 0 } },
            { "id": "poutput-q", "type": "merge", "position": { "x": 0, "y": 0 } },
        ],
        "edges": [],
    }))?;
    store.replace_all(document)?;

    // Both derive "reactflow__edge-aoutput-poutput-qinput1".
    let first = store.add_edge(Connection::new("a", "output", "poutput-q", "input1"))?;
    let second = store.add_edge(Connection::new("aoutput-p", "output", "q", "input1"))?;

    assert_eq!(first.as_str(), "reactflow__edge-aoutput-poutput-qinput1");
    assert_eq!(second.as_str(), "reactflow__edge-aoutput-poutput-qinput1-1");
    assert_eq!(store.graph().edge_count(), 2);
    Ok(())
}

#[test]
fn port_types_are_not_checked() -> Result<()> {
    let mut store = GraphStore::new();
    let filter = store.add_node(NodeKind::Filter, at(0.0, 0.0));
    let text = store.add_node(NodeKind::Text, at(200.0, 0.0));
    store.update_node_config(&text, text_patch("Explain why [[item]] was dropped"))?;

    let edge = store.add_edge(Connection::new(filter, "rejected", text, "var-item"))?;
    assert!(store.graph().edge(&edge).is_some());
    Ok(())
}

mod properties {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    const KINDS: [NodeKind; 5] = [
        NodeKind::Input,
        NodeKind::Text,
        NodeKind::Transform,
        NodeKind::Merge,
        NodeKind::Output,
    ];

    const TEMPLATES: [&str; 3] = ["[[a]]", "[[b]] and [[a]]", "no variables"];

    #[derive(Debug, Clone)]
    enum Op {
        Add { kind: usize, x: i16, y: i16 },
        Remove(usize),
        Connect(usize, usize),
        Edit(usize, usize),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            5 => (0..KINDS.len(), any::<i16>(), any::<i16>())
                .prop_map(|(kind, x, y)| Op::Add { kind, x, y }),
            2 => any::<usize>().prop_map(Op::Remove),
            5 => (any::<usize>(), any::<usize>()).prop_map(|(s, t)| Op::Connect(s, t)),
            2 => (any::<usize>(), 0..TEMPLATES.len()).prop_map(|(n, t)| Op::Edit(n, t)),
            1 => Just(Op::Clear),
        ]
    }

    fn nth_node(store: &GraphStore, index: usize) -> Option<NodeId> {
        let count = store.graph().node_count();
        if count == 0 {
            return None;
        }
        store.graph().node_ids().nth(index % count).cloned()
    }

    /// Runs `ops`, returning the store and every id `add_node` returned.
    fn run(ops: &[Op]) -> (GraphStore, Vec<NodeId>) {
        let mut store = GraphStore::new();
        let mut added = Vec::new();

        for op in ops {
            match op {
                Op::Add { kind, x, y } => {
                    let position = at(f64::from(*x), f64::from(*y));
                    added.push(store.add_node(KINDS[*kind], position));
                }
                Op::Remove(index) => {
                    if let Some(id) = nth_node(&store, *index) {
                        store.remove_nodes(&[id]);
                    }
                }
                Op::Connect(source, target) => {
                    let (Some(source), Some(target)) =
                        (nth_node(&store, *source), nth_node(&store, *target))
                    else {
                        continue;
                    };
                    let output = store
                        .ports(&source)
                        .and_then(|ports| ports.outputs.first().map(|port| port.id.clone()));
                    let input = store
                        .ports(&target)
                        .and_then(|ports| ports.inputs.first().map(|port| port.id.clone()));
                    if let (Some(output), Some(input)) = (output, input) {
                        // Self-loops and duplicates are expected rejections here.
                        let _ = store.add_edge(Connection::new(source, output, target, input));
                    }
                }
                Op::Edit(index, template) => {
                    if let Some(id) = nth_node(&store, *index) {
                        let patch = text_patch(TEMPLATES[*template]);
                        let _ = store.update_node_config(&id, patch);
                    }
                }
                Op::Clear => store.clear(),
            }
        }

        (store, added)
    }

    proptest! {
        #[test]
        fn allocated_ids_are_never_reused(ops in prop::collection::vec(op(), 0..48)) {
            let (_, added) = run(&ops);
            let distinct: HashSet<&NodeId> = added.iter().collect();
            prop_assert_eq!(distinct.len(), added.len());
        }

        #[test]
        fn graphs_survive_a_document_round_trip(ops in prop::collection::vec(op(), 0..48)) {
            let (store, _) = run(&ops);
            let document = store.to_document();

            let text = serde_json::to_string(&document)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;
            let parsed = PipelineDocument::from_json_str(&text)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;

            let mut restored = GraphStore::new();
            restored
                .replace_all(parsed)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;

            prop_assert_eq!(restored.to_document(), document);
            for id in store.graph().node_ids() {
                prop_assert_eq!(restored.ports(id), store.ports(id));
            }
        }

        #[test]
        fn edges_never_dangle(ops in prop::collection::vec(op(), 0..48)) {
            let (store, _) = run(&ops);
            for edge in store.graph().edges() {
                let source = store.ports(&edge.source);
                let target = store.ports(&edge.target);
                prop_assert!(source.is_some_and(|p| p.contains(PortDirection::Output, &edge.source_port)));
                prop_assert!(target.is_some_and(|p| p.contains(PortDirection::Input, &edge.target_port)));
            }
        }
    }
}
