//! Grid data model, topology store and failure simulation.

/// Cascading-failure simulator.
pub mod cascade;
/// Built-in sample datasets.
pub mod dataset;
pub mod topology;
pub mod types;

pub use cascade::{CascadeReport, CascadeSimulator, TriggerOutcome};
pub use topology::{GridTopology, TopologyData, TopologySummary};
pub use types::{GeoPosition, GridNode, LineStatus, NodeKind, NodeStatus, PowerLine};
