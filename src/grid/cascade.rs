//! Cascading-failure simulation over a [`GridTopology`].
//!
//! A critical node marks its neighbors (and the lines joining them) as
//! failed. Failure is held here as transient state and is never written
//! back to the topology. Propagation stops at one hop unless a larger
//! depth is configured.

use std::collections::{BTreeSet, HashSet};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use super::topology::GridTopology;
use super::types::NodeStatus;

/// Default time the simulator stays busy after a trigger.
pub const DEFAULT_ANALYSIS_WINDOW: Duration = Duration::from_secs(5);

/// Node and line ids reached by one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Node that started the cascade.
    pub origin: String,
    /// Ids of nodes marked failed.
    pub failed_nodes: BTreeSet<String>,
    /// Ids of lines marked failed.
    pub failed_lines: BTreeSet<String>,
}

/// Result of asking the simulator to start a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Propagation ran; the simulator is now analyzing.
    Started(CascadeReport),
    /// The node exists but is not critical; nothing changed.
    NotCritical(NodeStatus),
    /// No node has this id; nothing changed.
    UnknownNode,
    /// A previous run is still analyzing; the request was dropped.
    Busy,
}

/// Serializable view of simulator state.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeSnapshot {
    /// Origin of the last run, if any.
    pub origin: Option<String>,
    /// Failed node ids.
    pub failed_nodes: Vec<String>,
    /// Failed line ids.
    pub failed_lines: Vec<String>,
    /// Whether the analysis window is still open.
    pub analyzing: bool,
}

/// Computes the failed node and line sets for a cascade from `origin`.
///
/// At depth 1 the failed nodes are exactly the origin's `connections` and
/// the failed lines are those joining the origin to one of them. Deeper
/// runs continue breadth-first through connections that resolve to a
/// node, collecting the joining line of every traversed hop.
pub fn propagate(topology: &GridTopology, origin: &str, depth: usize) -> CascadeReport {
    let mut report = CascadeReport {
        origin: origin.to_string(),
        ..CascadeReport::default()
    };
    let mut visited: HashSet<&str> = HashSet::from([origin]);
    let mut frontier: Vec<&str> = vec![origin];

    for _ in 0..depth {
        let mut next = Vec::new();
        for &parent in &frontier {
            for child in topology.neighbors(parent) {
                report
                    .failed_lines
                    .extend(topology.lines_between(parent, child).into_iter().map(String::from));
                let unseen = visited.insert(child.as_str());
                // A node listing itself fails along with its self-loop.
                if unseen || child == parent {
                    report.failed_nodes.insert(child.clone());
                }
                if unseen && topology.node(child).is_some() {
                    next.push(child.as_str());
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    report
}

/// Stateful simulator with a busy guard and a timed analysis window.
///
/// Time is passed in by the caller so the window can be driven from an
/// event loop, a request handler or a test.
#[derive(Debug, Clone)]
pub struct CascadeSimulator {
    window: Duration,
    depth: usize,
    origin: Option<String>,
    failed_nodes: BTreeSet<String>,
    failed_lines: BTreeSet<String>,
    analyzing_since: Option<Instant>,
}

impl Default for CascadeSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYSIS_WINDOW, 1)
    }
}

impl CascadeSimulator {
    /// Creates a simulator with the given analysis window and hop depth.
    ///
    /// A depth of zero is treated as one.
    pub fn new(window: Duration, depth: usize) -> Self {
        Self {
            window,
            depth: depth.max(1),
            origin: None,
            failed_nodes: BTreeSet::new(),
            failed_lines: BTreeSet::new(),
            analyzing_since: None,
        }
    }

    /// Starts a cascade from `node_id` if it is critical and no run is in flight.
    pub fn trigger(&mut self, topology: &GridTopology, node_id: &str, now: Instant) -> TriggerOutcome {
        let Some(node) = topology.node(node_id) else {
            debug!(node = node_id, "cascade ignored: unknown node");
            return TriggerOutcome::UnknownNode;
        };
        if node.status != NodeStatus::Critical {
            debug!(node = node_id, status = %node.status, "cascade ignored: node not critical");
            return TriggerOutcome::NotCritical(node.status);
        }
        if self.is_analyzing() {
            debug!(node = node_id, "cascade dropped: simulation in flight");
            return TriggerOutcome::Busy;
        }

        let report = propagate(topology, node_id, self.depth);
        info!(
            origin = node_id,
            nodes = report.failed_nodes.len(),
            lines = report.failed_lines.len(),
            "cascading failure simulated"
        );
        self.origin = Some(report.origin.clone());
        self.failed_nodes = report.failed_nodes.clone();
        self.failed_lines = report.failed_lines.clone();
        self.analyzing_since = Some(now);
        TriggerOutcome::Started(report)
    }

    /// Closes the analysis window once it has elapsed.
    ///
    /// Failed sets are kept. Returns `true` if this call cleared the flag.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.analyzing_since {
            Some(start) if now.saturating_duration_since(start) >= self.window => {
                self.analyzing_since = None;
                debug!("cascade analysis window closed");
                true
            }
            _ => false,
        }
    }

    /// Clears both failed sets and the busy flag.
    pub fn reset(&mut self) {
        self.origin = None;
        self.failed_nodes.clear();
        self.failed_lines.clear();
        self.analyzing_since = None;
    }

    /// Whether a run is still inside its analysis window.
    pub fn is_analyzing(&self) -> bool {
        self.analyzing_since.is_some()
    }

    /// Node that started the current failure set.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Ids of nodes currently marked failed.
    pub fn failed_nodes(&self) -> &BTreeSet<String> {
        &self.failed_nodes
    }

    /// Ids of lines currently marked failed.
    pub fn failed_lines(&self) -> &BTreeSet<String> {
        &self.failed_lines
    }

    /// Whether `id` is in the failed node set.
    pub fn is_node_failed(&self, id: &str) -> bool {
        self.failed_nodes.contains(id)
    }

    /// Whether `id` is in the failed line set.
    pub fn is_line_failed(&self, id: &str) -> bool {
        self.failed_lines.contains(id)
    }

    /// Configured hop depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Configured analysis window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Serializable state.
    pub fn snapshot(&self) -> CascadeSnapshot {
        CascadeSnapshot {
            origin: self.origin.clone(),
            failed_nodes: self.failed_nodes.iter().cloned().collect(),
            failed_lines: self.failed_lines.iter().cloned().collect(),
            analyzing: self.is_analyzing(),
        }
    }
}
