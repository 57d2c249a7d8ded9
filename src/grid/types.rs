//! Core grid records: nodes, power lines and their status enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of equipment a grid node models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Distribution or power transformer.
    Transformer,
    /// Switching / transforming substation.
    Substation,
    /// Generating station.
    Generator,
}

/// Operating status of a grid node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Operating normally.
    Healthy,
    /// Degraded, needs attention.
    Warning,
    /// About to fail. Only critical nodes can start a cascade.
    Critical,
    /// Out of service.
    Failed,
}

impl NodeStatus {
    /// All statuses in severity order.
    pub const ALL: [NodeStatus; 4] = [
        NodeStatus::Healthy,
        NodeStatus::Warning,
        NodeStatus::Critical,
        NodeStatus::Failed,
    ];

    /// Lowercase label used in CSV and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transformer => "transformer",
            Self::Substation => "substation",
            Self::Generator => "generator",
        })
    }
}

/// Status of a power line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    /// Carrying load within capacity.
    Normal,
    /// Carrying load above its rated capacity.
    Overload,
    /// Tripped or broken.
    Failed,
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Overload => "overload",
            Self::Failed => "failed",
        })
    }
}

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Latitude (-90..=90).
    pub lat: f64,
    /// Longitude (-180..=180).
    pub lng: f64,
}

impl GeoPosition {
    /// Creates a position from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both coordinates are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A transformer, substation or generator in the modeled grid.
///
/// Neighbors are referenced by id only; the owning [`GridTopology`]
/// resolves them through its index.
///
/// [`GridTopology`]: super::topology::GridTopology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridNode {
    /// Unique identifier, e.g. `KHD-T-002`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Equipment kind.
    pub kind: NodeKind,
    /// Map position.
    pub position: GeoPosition,
    /// Current operating status.
    pub status: NodeStatus,
    /// Health score, 0 (dead) to 100 (new).
    pub health: u8,
    /// Ids of directly connected nodes.
    #[serde(default)]
    pub connections: Vec<String>,
    /// Operating voltage (kV).
    pub voltage_kv: f32,
    /// Loading as a percentage of rating.
    pub load_pct: f32,
    /// Winding / oil temperature (°C).
    pub temperature_c: f32,
    /// Region tag used for filtering.
    pub region: String,
}

/// A transmission connection between two grid nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerLine {
    /// Unique identifier, e.g. `L002`.
    pub id: String,
    /// Id of one endpoint.
    pub from: String,
    /// Id of the other endpoint.
    pub to: String,
    /// Current line status.
    pub status: LineStatus,
    /// Rated capacity (MW).
    pub capacity_mw: f32,
    /// Present flow (MW).
    pub current_load_mw: f32,
}

impl PowerLine {
    /// Returns `true` when the line joins `a` and `b` in either direction.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// Loading as a fraction of capacity (0 when capacity is zero).
    pub fn utilization(&self) -> f32 {
        if self.capacity_mw > 0.0 {
            self.current_load_mw / self.capacity_mw
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: &str, to: &str) -> PowerLine {
        PowerLine {
            id: "L1".into(),
            from: from.into(),
            to: to.into(),
            status: LineStatus::Normal,
            capacity_mw: 100.0,
            current_load_mw: 40.0,
        }
    }

    #[test]
    fn connects_is_unordered() {
        let l = line("A", "B");
        assert!(l.connects("A", "B"));
        assert!(l.connects("B", "A"));
        assert!(!l.connects("A", "C"));
    }

    #[test]
    fn utilization_handles_zero_capacity() {
        let mut l = line("A", "B");
        assert!((l.utilization() - 0.4).abs() < 1e-6);
        l.capacity_mw = 0.0;
        assert_eq!(l.utilization(), 0.0);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&NodeStatus::Critical).ok();
        assert_eq!(json.as_deref(), Some("\"critical\""));
        let kind: Result<NodeKind, _> = serde_json::from_str("\"substation\"");
        assert_eq!(kind.ok(), Some(NodeKind::Substation));
    }

    #[test]
    fn geo_position_range_check() {
        assert!(GeoPosition::new(20.2, 85.8).is_valid());
        assert!(!GeoPosition::new(91.0, 0.0).is_valid());
        assert!(!GeoPosition::new(0.0, f64::NAN).is_valid());
    }
}
