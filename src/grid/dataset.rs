//! Built-in sample grid (Khordha district, Odisha).

use super::topology::GridTopology;
use super::types::{GeoPosition, GridNode, LineStatus, NodeKind, NodeStatus, PowerLine};

const REGION: &str = "khordha";

#[expect(clippy::too_many_arguments)]
fn node(
    id: &str,
    name: &str,
    kind: NodeKind,
    lat: f64,
    lng: f64,
    status: NodeStatus,
    health: u8,
    connections: &[&str],
    voltage_kv: f32,
    load_pct: f32,
    temperature_c: f32,
) -> GridNode {
    GridNode {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        position: GeoPosition::new(lat, lng),
        status,
        health,
        connections: connections.iter().map(|c| c.to_string()).collect(),
        voltage_kv,
        load_pct,
        temperature_c,
        region: REGION.to_string(),
    }
}

fn line(id: &str, from: &str, to: &str, status: LineStatus, capacity_mw: f32, load_mw: f32) -> PowerLine {
    PowerLine {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        status,
        capacity_mw,
        current_load_mw: load_mw,
    }
}

/// Sample nodes, in display order.
pub fn sample_nodes() -> Vec<GridNode> {
    use NodeKind::{Generator, Substation, Transformer};
    use NodeStatus::{Critical, Healthy, Warning};

    vec![
        node(
            "KHD-SUB-001",
            "Bhubaneswar Grid Substation",
            Substation,
            20.2961,
            85.8245,
            Healthy,
            94,
            &["KHD-T-001", "KHD-T-002", "KHD-T-003", "KHD-GEN-001"],
            132.0,
            64.0,
            38.5,
        ),
        node(
            "KHD-T-001",
            "Khordha Town Distribution Transformer",
            Transformer,
            20.1824,
            85.6166,
            Healthy,
            88,
            &["KHD-SUB-001", "KHD-T-003"],
            33.0,
            58.0,
            46.0,
        ),
        node(
            "KHD-T-002",
            "Jatni Power Transformer",
            Transformer,
            20.1597,
            85.7071,
            Critical,
            23,
            &["KHD-SUB-001", "KHD-T-004"],
            33.0,
            97.0,
            92.5,
        ),
        node(
            "KHD-T-003",
            "Balianta Transformer",
            Transformer,
            20.2503,
            85.9012,
            Warning,
            61,
            &["KHD-SUB-001", "KHD-T-001", "KHD-SUB-002"],
            33.0,
            81.0,
            67.0,
        ),
        node(
            "KHD-T-004",
            "Tangi Transformer",
            Transformer,
            20.0413,
            85.4237,
            Warning,
            58,
            &["KHD-T-002", "KHD-SUB-002"],
            11.0,
            84.0,
            71.5,
        ),
        node(
            "KHD-SUB-002",
            "Begunia Substation",
            Substation,
            20.1039,
            85.4859,
            Healthy,
            90,
            &["KHD-T-003", "KHD-T-004", "KHD-T-005"],
            132.0,
            55.0,
            36.0,
        ),
        node(
            "KHD-T-005",
            "Banapur Transformer",
            Transformer,
            19.7789,
            85.1731,
            Critical,
            31,
            &["KHD-SUB-002", "KHD-GEN-001"],
            11.0,
            93.0,
            88.0,
        ),
        node(
            "KHD-GEN-001",
            "Chandaka Solar Park",
            Generator,
            20.3667,
            85.7744,
            Healthy,
            97,
            &["KHD-SUB-001", "KHD-T-005"],
            33.0,
            42.0,
            31.0,
        ),
    ]
}

/// Sample lines.
pub fn sample_lines() -> Vec<PowerLine> {
    use LineStatus::{Normal, Overload};

    vec![
        line("L001", "KHD-SUB-001", "KHD-T-001", Normal, 120.0, 68.0),
        line("L002", "KHD-SUB-001", "KHD-T-002", Normal, 120.0, 104.0),
        line("L003", "KHD-SUB-001", "KHD-T-003", Normal, 120.0, 81.0),
        line("L004", "KHD-T-001", "KHD-T-003", Normal, 60.0, 22.0),
        line("L005", "KHD-T-002", "KHD-T-004", Overload, 60.0, 71.0),
        line("L006", "KHD-T-003", "KHD-SUB-002", Normal, 90.0, 47.0),
        line("L007", "KHD-T-004", "KHD-SUB-002", Normal, 60.0, 39.0),
        line("L008", "KHD-SUB-002", "KHD-T-005", Overload, 60.0, 66.0),
        line("L009", "KHD-GEN-001", "KHD-SUB-001", Normal, 150.0, 92.0),
        line("L010", "KHD-T-005", "KHD-GEN-001", Normal, 60.0, 18.0),
    ]
}

/// The built-in Khordha topology.
pub fn sample_topology() -> GridTopology {
    GridTopology::new(sample_nodes(), sample_lines())
}

/// Resolves a built-in dataset by name.
pub fn builtin(name: &str) -> Option<GridTopology> {
    match name {
        "khordha" => Some(sample_topology()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_no_dangling_lines() {
        let topo = sample_topology();
        assert!(topo.dangling_lines().is_empty());
        assert_eq!(topo.nodes().len(), 8);
        assert_eq!(topo.lines().len(), 10);
    }

    #[test]
    fn every_connection_resolves_to_a_node() {
        let topo = sample_topology();
        for n in topo.nodes() {
            for c in &n.connections {
                assert!(topo.node(c).is_some(), "{} -> {c} should resolve", n.id);
            }
        }
    }

    #[test]
    fn every_line_is_declared_by_both_endpoints() {
        let topo = sample_topology();
        for l in topo.lines() {
            assert!(topo.neighbors(&l.from).contains(&l.to), "{} missing on {}", l.id, l.from);
            assert!(topo.neighbors(&l.to).contains(&l.from), "{} missing on {}", l.id, l.to);
        }
    }

    #[test]
    fn builtin_lookup() {
        assert!(builtin("khordha").is_some());
        assert!(builtin("nowhere").is_none());
    }
}
