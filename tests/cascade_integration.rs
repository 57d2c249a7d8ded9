//! Integration tests for the cascading-failure simulator.

mod common;

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use gridmind::config::AppConfig;
use gridmind::grid::cascade::{CascadeSimulator, TriggerOutcome, propagate};
use gridmind::grid::dataset::sample_topology;
use gridmind::grid::{GridTopology, NodeStatus};
use proptest::prelude::*;

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn khordha_t002_fails_neighbors_and_joining_lines() {
    let topo = sample_topology();
    let mut sim = AppConfig::demo().cascade_simulator();
    let outcome = sim.trigger(&topo, "KHD-T-002", Instant::now());

    assert!(matches!(outcome, TriggerOutcome::Started(_)));
    assert_eq!(sim.failed_nodes(), &ids(&["KHD-SUB-001", "KHD-T-004"]));
    assert_eq!(sim.failed_lines(), &ids(&["L002", "L005"]));
    assert!(sim.is_analyzing());
}

#[test]
fn healthy_substation_changes_nothing() {
    let topo = sample_topology();
    let mut sim = CascadeSimulator::default();
    let outcome = sim.trigger(&topo, "KHD-SUB-001", Instant::now());

    assert_eq!(outcome, TriggerOutcome::NotCritical(NodeStatus::Healthy));
    assert!(sim.failed_nodes().is_empty());
    assert!(sim.failed_lines().is_empty());
    assert!(!sim.is_analyzing());
}

#[test]
fn unknown_node_is_a_no_op() {
    let topo = sample_topology();
    let mut sim = CascadeSimulator::default();
    assert_eq!(
        sim.trigger(&topo, "KHD-T-999", Instant::now()),
        TriggerOutcome::UnknownNode
    );
    assert!(!sim.is_analyzing());
}

#[test]
fn second_trigger_during_window_is_dropped() {
    let topo = sample_topology();
    let mut sim = CascadeSimulator::default();
    let t0 = Instant::now();
    sim.trigger(&topo, "KHD-T-002", t0);

    let during = t0 + Duration::from_secs(2);
    sim.tick(during);
    assert_eq!(sim.trigger(&topo, "KHD-T-005", during), TriggerOutcome::Busy);
    assert_eq!(sim.origin(), Some("KHD-T-002"));

    let after = t0 + Duration::from_secs(5);
    assert!(sim.tick(after));
    let outcome = sim.trigger(&topo, "KHD-T-005", after);
    assert!(matches!(outcome, TriggerOutcome::Started(_)));
    assert_eq!(sim.failed_nodes(), &ids(&["KHD-SUB-002", "KHD-GEN-001"]));
    assert_eq!(sim.failed_lines(), &ids(&["L008", "L010"]));
}

#[test]
fn failure_stays_transient() {
    let topo = sample_topology();
    let mut sim = CascadeSimulator::default();
    sim.trigger(&topo, "KHD-T-002", Instant::now());
    assert_eq!(
        topo.node("KHD-SUB-001").map(|n| n.status),
        Some(NodeStatus::Healthy)
    );
}

#[test]
fn field_preset_reaches_two_hops() {
    let topo = common::chain_topology();
    let mut sim = AppConfig::field().cascade_simulator();
    sim.trigger(&topo, "B", Instant::now());
    assert_eq!(sim.failed_nodes(), &ids(&["A", "C", "D"]));
    assert_eq!(sim.failed_lines(), &ids(&["AB", "BC", "CD"]));
}

#[test]
fn one_sided_connection_still_fails_line() {
    // "C" lists "B" but the line is stored as C->B.
    let topo = common::chain_topology();
    let report = propagate(&topo, "B", 1);
    assert_eq!(report.failed_nodes, ids(&["A", "C"]));
    assert_eq!(report.failed_lines, ids(&["AB", "BC"]));
}

#[test]
fn dangling_connection_fails_without_a_line() {
    let topo = GridTopology::new(
        vec![
            common::node("A", NodeStatus::Critical, &["B", "GHOST0"]),
            common::node("B", NodeStatus::Healthy, &["A"]),
        ],
        vec![common::line("AB", "A", "B")],
    );
    let mut sim = CascadeSimulator::default();
    let outcome = sim.trigger(&topo, "A", Instant::now());

    assert!(matches!(outcome, TriggerOutcome::Started(_)));
    assert_eq!(sim.failed_nodes(), &ids(&["B", "GHOST0"]));
    assert_eq!(sim.failed_lines(), &ids(&["AB"]));
}

proptest! {
    #[test]
    fn non_critical_trigger_never_changes_state(topo in common::arb_topology(), pick in any::<prop::sample::Index>()) {
        let candidates: Vec<_> = topo.nodes().iter().filter(|n| n.status != NodeStatus::Critical).collect();
        if candidates.is_empty() {
            return Ok(());
        }
        let node = candidates[pick.index(candidates.len())];

        let mut sim = CascadeSimulator::default();
        sim.trigger(&topo, &node.id, Instant::now());
        prop_assert!(sim.failed_nodes().is_empty());
        prop_assert!(sim.failed_lines().is_empty());
        prop_assert!(!sim.is_analyzing());
    }

    #[test]
    fn critical_trigger_fails_exactly_connections(topo in common::arb_topology(), pick in any::<prop::sample::Index>()) {
        let candidates: Vec<_> = topo.nodes_with_status(NodeStatus::Critical).collect();
        if candidates.is_empty() {
            return Ok(());
        }
        let node = candidates[pick.index(candidates.len())];

        let mut sim = CascadeSimulator::default();
        sim.trigger(&topo, &node.id, Instant::now());

        let expected_nodes: BTreeSet<String> = node.connections.iter().cloned().collect();
        let expected_lines: BTreeSet<String> = topo
            .lines()
            .iter()
            .filter(|l| node.connections.iter().any(|c| l.connects(&node.id, c)))
            .map(|l| l.id.clone())
            .collect();
        prop_assert_eq!(sim.failed_nodes(), &expected_nodes);
        prop_assert_eq!(sim.failed_lines(), &expected_lines);
        prop_assert!(sim.is_analyzing());
    }

    #[test]
    fn reset_always_clears(topo in common::arb_topology(), pick in any::<prop::sample::Index>()) {
        let node = &topo.nodes()[pick.index(topo.nodes().len())];
        let mut sim = CascadeSimulator::default();
        sim.trigger(&topo, &node.id, Instant::now());
        sim.reset();
        prop_assert!(sim.failed_nodes().is_empty());
        prop_assert!(sim.failed_lines().is_empty());
        prop_assert!(!sim.is_analyzing());
    }
}
