//! CSV import of node drafts for bulk ingestion.

use std::io::Read;

use serde::Deserialize;

use crate::error::Result;
use crate::grid::types::{NodeKind, NodeStatus};
use crate::ingest::NodeDraft;

#[derive(Debug, Deserialize)]
struct NodeRow {
    id: String,
    name: String,
    #[serde(default)]
    kind: Option<NodeKind>,
    lat: f64,
    lng: f64,
    #[serde(default)]
    status: Option<NodeStatus>,
    #[serde(default)]
    health: Option<u8>,
    #[serde(default)]
    connections: String,
    #[serde(default)]
    voltage_kv: Option<f32>,
    #[serde(default)]
    load_pct: Option<f32>,
    #[serde(default)]
    temperature_c: Option<f32>,
    #[serde(default)]
    region: Option<String>,
}

impl From<NodeRow> for NodeDraft {
    fn from(r: NodeRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            kind: r.kind,
            lat: r.lat,
            lng: r.lng,
            status: r.status,
            health: r.health,
            connections: r.connections.split(';').map(str::to_string).collect(),
            voltage_kv: r.voltage_kv,
            load_pct: r.load_pct,
            temperature_c: r.temperature_c,
            region: r.region,
        }
    }
}

/// Reads node drafts from CSV with a header row.
///
/// Required columns: `id`, `name`, `lat`, `lng`. Optional columns follow
/// the node export layout; unknown columns are ignored. `connections` is
/// `;`-separated.
///
/// # Errors
///
/// Returns [`GridError::Csv`](crate::error::GridError::Csv) on the first
/// malformed row.
pub fn read_node_drafts(reader: impl Read) -> Result<Vec<NodeDraft>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut drafts = Vec::new();
    for row in rdr.deserialize::<NodeRow>() {
        drafts.push(row?.into());
    }
    Ok(drafts)
}
