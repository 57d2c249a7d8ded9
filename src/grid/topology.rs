//! Id-indexed grid topology: node and line arenas with O(1) lookups.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::{GridNode, LineStatus, NodeStatus, PowerLine};
use crate::error::{GridError, Result};

/// Serialized form of a topology (used for dataset files and the API).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyData {
    /// Grid nodes.
    pub nodes: Vec<GridNode>,
    /// Power lines.
    #[serde(default)]
    pub lines: Vec<PowerLine>,
}

/// A power line together with both resolved endpoint nodes.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLine<'a> {
    /// The line record.
    pub line: &'a PowerLine,
    /// Node referenced by `line.from`.
    pub from: &'a GridNode,
    /// Node referenced by `line.to`.
    pub to: &'a GridNode,
}

/// Aggregate counts over a topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopologySummary {
    /// Total node count.
    pub node_count: usize,
    /// Total line count.
    pub line_count: usize,
    /// Node count per status label.
    pub nodes_by_status: BTreeMap<String, usize>,
    /// Node count per kind label.
    pub nodes_by_kind: BTreeMap<String, usize>,
    /// Line count per status label.
    pub lines_by_status: BTreeMap<String, usize>,
    /// Mean node health score (0 when empty).
    pub mean_health: f32,
    /// Lines whose endpoints do not both resolve.
    pub dangling_lines: usize,
}

/// The canonical grid store.
///
/// Nodes and lines live in insertion-ordered arenas. Id maps give O(1)
/// lookup and an unordered endpoint-pair map answers "which lines join
/// these two nodes" without scanning every line.
#[derive(Debug, Clone, Default)]
pub struct GridTopology {
    nodes: Vec<GridNode>,
    lines: Vec<PowerLine>,
    node_index: HashMap<String, usize>,
    line_index: HashMap<String, usize>,
    pair_index: HashMap<(String, String), Vec<usize>>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Checks the field constraints a node must satisfy to enter the topology.
///
/// # Errors
///
/// Returns [`GridError::InvalidNode`] naming the first violated field.
pub fn validate_node(node: &GridNode) -> Result<()> {
    let invalid = |field: &'static str, message: &str| GridError::InvalidNode {
        id: node.id.clone(),
        field,
        message: message.to_string(),
    };

    if node.id.trim().is_empty() {
        return Err(invalid("id", "must not be empty"));
    }
    if node.name.trim().is_empty() {
        return Err(invalid("name", "must not be empty"));
    }
    if node.health > 100 {
        return Err(invalid("health", "must be in [0, 100]"));
    }
    if !node.position.is_valid() {
        return Err(invalid("position", "must be a valid lat/lng pair"));
    }
    if !node.voltage_kv.is_finite() || node.voltage_kv < 0.0 {
        return Err(invalid("voltage_kv", "must be >= 0"));
    }
    if node.connections.iter().any(|c| *c == node.id) {
        return Err(invalid("connections", "must not reference the node itself"));
    }
    Ok(())
}

impl GridTopology {
    /// Builds a topology from node and line collections.
    ///
    /// The first record for an id wins; later duplicates are dropped.
    pub fn new(nodes: Vec<GridNode>, lines: Vec<PowerLine>) -> Self {
        let mut topo = Self::default();
        for node in nodes {
            if topo.node_index.contains_key(&node.id) {
                debug!(id = %node.id, "dropping duplicate node");
                continue;
            }
            topo.push_node(node);
        }
        for line in lines {
            if topo.line_index.contains_key(&line.id) {
                debug!(id = %line.id, "dropping duplicate line");
                continue;
            }
            topo.push_line(line);
        }
        topo
    }

    /// Loads a topology from a JSON file shaped like [`TopologyData`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let data: TopologyData = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            nodes = data.nodes.len(),
            lines = data.lines.len(),
            "loaded grid dataset"
        );
        Ok(Self::new(data.nodes, data.lines))
    }

    fn push_node(&mut self, node: GridNode) {
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn push_line(&mut self, line: PowerLine) {
        let slot = self.lines.len();
        self.line_index.insert(line.id.clone(), slot);
        self.pair_index
            .entry(pair_key(&line.from, &line.to))
            .or_default()
            .push(slot);
        self.lines.push(line);
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// All lines in insertion order.
    pub fn lines(&self) -> &[PowerLine] {
        &self.lines
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&GridNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Looks up a line by id.
    pub fn line(&self, id: &str) -> Option<&PowerLine> {
        self.line_index.get(id).map(|&i| &self.lines[i])
    }

    /// Returns the node's declared connections, or an empty slice if unknown.
    pub fn neighbors(&self, id: &str) -> &[String] {
        self.node(id).map_or(&[], |n| n.connections.as_slice())
    }

    /// Ids of every line whose unordered endpoints are exactly `{a, b}`.
    pub fn lines_between(&self, a: &str, b: &str) -> Vec<&str> {
        self.pair_index
            .get(&pair_key(a, b))
            .map(|slots| slots.iter().map(|&i| self.lines[i].id.as_str()).collect())
            .unwrap_or_default()
    }

    /// Lines whose endpoints both resolve, in insertion order.
    ///
    /// Dangling lines are skipped silently.
    pub fn resolved_lines(&self) -> impl Iterator<Item = ResolvedLine<'_>> {
        self.lines.iter().filter_map(|line| {
            let from = self.node(&line.from)?;
            let to = self.node(&line.to)?;
            Some(ResolvedLine { line, from, to })
        })
    }

    /// Lines with at least one endpoint missing from the node index.
    pub fn dangling_lines(&self) -> Vec<&PowerLine> {
        self.lines
            .iter()
            .filter(|l| self.node(&l.from).is_none() || self.node(&l.to).is_none())
            .collect()
    }

    /// Nodes tagged with `region`.
    pub fn nodes_in_region<'a>(&'a self, region: &'a str) -> impl Iterator<Item = &'a GridNode> {
        self.nodes.iter().filter(move |n| n.region == region)
    }

    /// Nodes currently in `status`.
    pub fn nodes_with_status(&self, status: NodeStatus) -> impl Iterator<Item = &GridNode> {
        self.nodes.iter().filter(move |n| n.status == status)
    }

    /// Validates and appends a node.
    ///
    /// Existing nodes are not updated to point back at the new node.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DuplicateNode`] if the id is taken, or
    /// [`GridError::InvalidNode`] if validation fails.
    pub fn ingest_node(&mut self, node: GridNode) -> Result<&GridNode> {
        validate_node(&node)?;
        if self.node_index.contains_key(&node.id) {
            return Err(GridError::DuplicateNode(node.id));
        }
        info!(id = %node.id, status = %node.status, "ingested grid node");
        let slot = self.nodes.len();
        self.push_node(node);
        Ok(&self.nodes[slot])
    }

    /// Computes aggregate counts for dashboards and the CLI.
    pub fn summary(&self) -> TopologySummary {
        let mut nodes_by_status = BTreeMap::new();
        let mut nodes_by_kind = BTreeMap::new();
        let mut lines_by_status = BTreeMap::new();
        for n in &self.nodes {
            *nodes_by_status.entry(n.status.to_string()).or_insert(0) += 1;
            *nodes_by_kind.entry(n.kind.to_string()).or_insert(0) += 1;
        }
        for l in &self.lines {
            *lines_by_status.entry(l.status.to_string()).or_insert(0) += 1;
        }
        let mean_health = if self.nodes.is_empty() {
            0.0
        } else {
            self.nodes.iter().map(|n| f32::from(n.health)).sum::<f32>() / self.nodes.len() as f32
        };

        TopologySummary {
            node_count: self.nodes.len(),
            line_count: self.lines.len(),
            nodes_by_status,
            nodes_by_kind,
            lines_by_status,
            mean_health,
            dangling_lines: self.dangling_lines().len(),
        }
    }

    /// Number of lines currently marked [`LineStatus::Overload`].
    pub fn overloaded_line_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.status == LineStatus::Overload)
            .count()
    }
}
