//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use gridmind::grid::{GeoPosition, GridNode, GridTopology, LineStatus, NodeKind, NodeStatus, PowerLine};
use proptest::prelude::*;

/// Node with the given id, status and connections near Bhubaneswar.
pub fn node(id: &str, status: NodeStatus, connections: &[&str]) -> GridNode {
    GridNode {
        id: id.to_string(),
        name: format!("{id} test node"),
        kind: NodeKind::Transformer,
        position: GeoPosition::new(20.30, 85.82),
        status,
        health: 70,
        connections: connections.iter().map(|c| (*c).to_string()).collect(),
        voltage_kv: 33.0,
        load_pct: 60.0,
        temperature_c: 45.0,
        region: "test".to_string(),
    }
}

/// Normal line between two node ids.
pub fn line(id: &str, from: &str, to: &str) -> PowerLine {
    PowerLine {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        status: LineStatus::Normal,
        capacity_mw: 100.0,
        current_load_mw: 40.0,
    }
}

/// Chain `A - B - C - D` with `B` critical.
pub fn chain_topology() -> GridTopology {
    GridTopology::new(
        vec![
            node("A", NodeStatus::Healthy, &["B"]),
            node("B", NodeStatus::Critical, &["A", "C"]),
            node("C", NodeStatus::Warning, &["B", "D"]),
            node("D", NodeStatus::Healthy, &["C"]),
        ],
        vec![line("AB", "A", "B"), line("BC", "C", "B"), line("CD", "C", "D")],
    )
}

fn arb_status() -> impl Strategy<Value = NodeStatus> {
    prop::sample::select(NodeStatus::ALL.to_vec())
}

/// Id for index `k`: `N{k}` for real nodes, `GHOST{k - n}` past the end.
fn node_id(k: usize, n: usize) -> String {
    if k < n { format!("N{k}") } else { format!("GHOST{}", k - n) }
}

/// Random topology over ids `N0..Nn` with random statuses, connections and lines.
///
/// Connections may be one-sided, may list the node itself, or may name a
/// `GHOST` id that resolves to no node. Lines may join nodes that do not
/// list each other or end at a ghost, so the cascade must rely on
/// connections alone.
pub fn arb_topology() -> impl Strategy<Value = GridTopology> {
    (2usize..10).prop_flat_map(|n| {
        let span = n + 2;
        let statuses = prop::collection::vec(arb_status(), n);
        let adjacency = prop::collection::vec(prop::collection::vec(0..span, 0..4), n);
        let pairs = prop::collection::vec((0..n, 0..span), 0..(n * 2));
        (statuses, adjacency, pairs).prop_map(move |(statuses, adjacency, pairs)| {
            let nodes = statuses
                .into_iter()
                .zip(adjacency)
                .enumerate()
                .map(|(i, (status, adj))| {
                    let mut conns: Vec<String> = Vec::new();
                    for j in adj {
                        let id = node_id(j, n);
                        if !conns.contains(&id) {
                            conns.push(id);
                        }
                    }
                    let refs: Vec<&str> = conns.iter().map(String::as_str).collect();
                    node(&node_id(i, n), status, &refs)
                })
                .collect();
            let lines = pairs
                .into_iter()
                .enumerate()
                .map(|(k, (a, b))| line(&format!("L{k}"), &node_id(a, n), &node_id(b, n)))
                .collect();
            GridTopology::new(nodes, lines)
        })
    })
}
