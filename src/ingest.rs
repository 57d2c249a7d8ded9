//! Data-ingestion flow: form drafts become grid nodes.
//!
//! A submitted draft is validated, appended to the topology and posted to
//! the handoff queue so the grid command view can pick it up.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::grid::topology::GridTopology;
use crate::grid::types::{GeoPosition, GridNode, NodeKind, NodeStatus};
use crate::handoff::{Handoff, INGESTED_NODE_KEY};

/// Fields entered on the ingestion form. Missing values get defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDraft {
    /// Node id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Equipment kind (defaults to transformer).
    #[serde(default)]
    pub kind: Option<NodeKind>,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Explicit status; derived from health when absent.
    #[serde(default)]
    pub status: Option<NodeStatus>,
    /// Health score (defaults to 100).
    #[serde(default)]
    pub health: Option<u8>,
    /// Connected node ids.
    #[serde(default)]
    pub connections: Vec<String>,
    /// Voltage (kV, defaults to 33).
    #[serde(default)]
    pub voltage_kv: Option<f32>,
    /// Loading percentage (defaults to 0).
    #[serde(default)]
    pub load_pct: Option<f32>,
    /// Temperature (°C, defaults to 25).
    #[serde(default)]
    pub temperature_c: Option<f32>,
    /// Region tag (defaults to the caller's region).
    #[serde(default)]
    pub region: Option<String>,
}

/// Status implied by a health score.
pub fn status_for_health(health: u8) -> NodeStatus {
    match health {
        0 => NodeStatus::Failed,
        1..50 => NodeStatus::Critical,
        50..75 => NodeStatus::Warning,
        _ => NodeStatus::Healthy,
    }
}

impl NodeDraft {
    /// Fills defaults and produces a node (not yet validated).
    pub fn into_node(self, default_region: &str) -> GridNode {
        let health = self.health.unwrap_or(100);
        let mut connections: Vec<String> = Vec::with_capacity(self.connections.len());
        for c in self.connections {
            let c = c.trim();
            if !c.is_empty() && !connections.iter().any(|x| x == c) {
                connections.push(c.to_string());
            }
        }
        GridNode {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            kind: self.kind.unwrap_or(NodeKind::Transformer),
            position: GeoPosition::new(self.lat, self.lng),
            status: self.status.unwrap_or_else(|| status_for_health(health)),
            health,
            connections,
            voltage_kv: self.voltage_kv.unwrap_or(33.0),
            load_pct: self.load_pct.unwrap_or(0.0),
            temperature_c: self.temperature_c.unwrap_or(25.0),
            region: self
                .region
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| default_region.to_string()),
        }
    }
}

/// Validates and appends a draft, then queues it on the handoff channel.
///
/// Nodes submitted before the next consumer runs accumulate in one
/// pending list.
///
/// # Errors
///
/// Returns an error if validation or ingestion fails (the topology is
/// unchanged) or if the handoff write fails (the node stays ingested).
pub fn submit(
    topology: &mut GridTopology,
    handoff: &mut Handoff,
    draft: NodeDraft,
    default_region: &str,
) -> Result<GridNode> {
    let node = topology.ingest_node(draft.into_node(default_region))?.clone();
    let mut pending: Vec<GridNode> = match handoff.take(INGESTED_NODE_KEY) {
        Ok(list) => list.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "discarding unreadable ingestion queue");
            Vec::new()
        }
    };
    pending.push(node.clone());
    handoff.put(INGESTED_NODE_KEY, &pending)?;
    Ok(node)
}

/// Drains every pending ingested node into `topology`.
///
/// Nodes already present are skipped, as are nodes that fail validation.
/// Returns the ids actually added, in submission order.
///
/// # Errors
///
/// Returns an error if the handoff blob is unreadable.
pub fn accept_pending(topology: &mut GridTopology, handoff: &mut Handoff) -> Result<Vec<String>> {
    let pending: Vec<GridNode> = handoff.take(INGESTED_NODE_KEY)?.unwrap_or_default();
    let mut accepted = Vec::with_capacity(pending.len());
    for node in pending {
        if topology.node(&node.id).is_some() {
            continue;
        }
        match topology.ingest_node(node) {
            Ok(n) => {
                info!(id = %n.id, "accepted node from ingestion handoff");
                accepted.push(n.id.clone());
            }
            Err(e) => warn!(error = %e, "dropping invalid node from ingestion handoff"),
        }
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::grid::dataset::sample_topology;

    fn draft(id: &str) -> NodeDraft {
        NodeDraft {
            id: id.into(),
            name: "Pipili Transformer".into(),
            lat: 20.11,
            lng: 85.83,
            health: Some(42),
            connections: vec![" KHD-T-001 ".into(), "".into(), "KHD-T-001".into()],
            ..NodeDraft::default()
        }
    }

    #[test]
    fn defaults_are_filled() {
        let n = draft("KHD-T-009").into_node("khordha");
        assert_eq!(n.kind, NodeKind::Transformer);
        assert_eq!(n.status, NodeStatus::Critical);
        assert_eq!(n.connections, vec!["KHD-T-001"]);
        assert_eq!(n.region, "khordha");
        assert_eq!(n.voltage_kv, 33.0);
    }

    #[test]
    fn health_maps_to_status() {
        assert_eq!(status_for_health(0), NodeStatus::Failed);
        assert_eq!(status_for_health(49), NodeStatus::Critical);
        assert_eq!(status_for_health(50), NodeStatus::Warning);
        assert_eq!(status_for_health(75), NodeStatus::Healthy);
    }

    #[test]
    fn submit_then_accept_elsewhere() {
        let mut producer = sample_topology();
        let mut consumer = sample_topology();
        let mut handoff = Handoff::in_memory();

        let node = submit(&mut producer, &mut handoff, draft("KHD-T-009"), "khordha");
        assert!(node.is_ok());
        assert!(producer.node("KHD-T-009").is_some());

        let accepted = accept_pending(&mut consumer, &mut handoff).unwrap_or_default();
        assert_eq!(accepted, vec!["KHD-T-009"]);
        assert!(consumer.node("KHD-T-009").is_some());

        // read-once
        let again = accept_pending(&mut consumer, &mut handoff).unwrap_or_default();
        assert!(again.is_empty());
    }

    #[test]
    fn queued_submissions_all_reach_consumer() {
        let mut producer = sample_topology();
        let mut consumer = sample_topology();
        let mut handoff = Handoff::in_memory();
        for id in ["KHD-T-011", "KHD-T-012", "KHD-T-013"] {
            assert!(submit(&mut producer, &mut handoff, draft(id), "khordha").is_ok());
        }

        let accepted = accept_pending(&mut consumer, &mut handoff).unwrap_or_default();
        assert_eq!(accepted, vec!["KHD-T-011", "KHD-T-012", "KHD-T-013"]);
        assert_eq!(consumer.nodes().len(), 11);
    }

    #[test]
    fn duplicate_submit_leaves_topology_unchanged() {
        let mut topo = sample_topology();
        let mut handoff = Handoff::in_memory();
        let before = topo.nodes().len();
        let r = submit(&mut topo, &mut handoff, draft("KHD-T-002"), "khordha");
        assert!(matches!(r, Err(GridError::DuplicateNode(_))));
        assert_eq!(topo.nodes().len(), before);
        assert!(!handoff.contains(INGESTED_NODE_KEY));
    }

    #[test]
    fn draft_parses_from_json() {
        let json = r#"{"id":"X-1","name":"X","lat":20.0,"lng":85.0,"kind":"generator"}"#;
        let d: std::result::Result<NodeDraft, _> = serde_json::from_str(json);
        assert_eq!(d.ok().and_then(|d| d.kind), Some(NodeKind::Generator));
    }
}
