//! Static SVG rendering of the grid, used when tiles cannot load.

use std::collections::BTreeSet;

use super::projection::GeoBounds;
use crate::grid::topology::GridTopology;
use crate::grid::types::{LineStatus, NodeKind, NodeStatus};

/// Fraction of the node span added around the map edge.
const EDGE_PAD: f64 = 0.12;

/// Node and line ids drawn in the failure style.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureOverlay<'a> {
    /// Failed node ids.
    pub nodes: Option<&'a BTreeSet<String>>,
    /// Failed line ids.
    pub lines: Option<&'a BTreeSet<String>>,
}

impl<'a> FailureOverlay<'a> {
    /// Overlay over both failed sets.
    pub fn new(nodes: &'a BTreeSet<String>, lines: &'a BTreeSet<String>) -> Self {
        Self {
            nodes: Some(nodes),
            lines: Some(lines),
        }
    }

    fn node_failed(&self, id: &str) -> bool {
        self.nodes.is_some_and(|s| s.contains(id))
    }

    fn line_failed(&self, id: &str) -> bool {
        self.lines.is_some_and(|s| s.contains(id))
    }
}

/// Fill color for a node status.
pub fn status_fill(status: NodeStatus) -> &'static str {
    match status {
        NodeStatus::Healthy => "#22c55e",
        NodeStatus::Warning => "#eab308",
        NodeStatus::Critical => "#ef4444",
        NodeStatus::Failed => "#6b7280",
    }
}

fn line_stroke(status: LineStatus, failed: bool) -> (&'static str, &'static str) {
    if failed {
        return ("#dc2626", " stroke-dasharray=\"4 3\"");
    }
    match status {
        LineStatus::Normal => ("#38bdf8", ""),
        LineStatus::Overload => ("#f97316", ""),
        LineStatus::Failed => ("#6b7280", " stroke-dasharray=\"2 2\""),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the topology as a standalone SVG document.
///
/// Nodes are placed by percentage within their enclosing bounds; lines
/// with an unresolved endpoint are skipped.
pub fn render_svg(
    topology: &GridTopology,
    overlay: &FailureOverlay<'_>,
    width: u32,
    height: u32,
) -> String {
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
         viewBox=\"0 0 {width} {height}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"#0f172a\"/>\n"
    );

    let Some(bounds) = GeoBounds::enclosing(topology.nodes(), EDGE_PAD) else {
        out.push_str("</svg>\n");
        return out;
    };
    let w = f64::from(width);
    let h = f64::from(height);
    let place = |pos| {
        let (px, py) = bounds.to_percent(pos);
        (px / 100.0 * w, py / 100.0 * h)
    };

    for r in topology.resolved_lines() {
        let (x1, y1) = place(r.from.position);
        let (x2, y2) = place(r.to.position);
        let (color, dash) = line_stroke(r.line.status, overlay.line_failed(&r.line.id));
        out.push_str(&format!(
            "<line id=\"{}\" x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" \
             stroke=\"{color}\" stroke-width=\"2\"{dash}/>\n",
            escape(&r.line.id)
        ));
    }

    for n in topology.nodes() {
        let (cx, cy) = place(n.position);
        let failed = overlay.node_failed(&n.id);
        let fill = if failed {
            status_fill(NodeStatus::Failed)
        } else {
            status_fill(n.status)
        };
        let radius = match n.kind {
            NodeKind::Substation => 9,
            NodeKind::Generator => 8,
            NodeKind::Transformer => 6,
        };
        let stroke = if failed { "#dc2626" } else { "#e2e8f0" };
        out.push_str(&format!(
            "<g id=\"{id}\"><title>{name} ({status}, health {health})</title>\
             <circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{radius}\" fill=\"{fill}\" \
             stroke=\"{stroke}\" stroke-width=\"1.5\"/>\
             <text x=\"{tx:.1}\" y=\"{cy:.1}\" fill=\"#cbd5e1\" font-size=\"10\">{id}</text></g>\n",
            id = escape(&n.id),
            name = escape(&n.name),
            status = n.status,
            health = n.health,
            tx = cx + f64::from(radius) + 3.0,
        ));
    }

    out.push_str("</svg>\n");
    out
}
