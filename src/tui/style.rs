//! Color constants for the dashboard.

use ratatui::style::Color;

use crate::grid::types::{LineStatus, NodeStatus};

/// Healthy node.
pub const HEALTHY: Color = Color::Green;
/// Warning node.
pub const WARNING: Color = Color::Yellow;
/// Critical node.
pub const CRITICAL: Color = Color::LightRed;
/// Failed node or line, recorded or simulated.
pub const FAILED: Color = Color::Red;
/// Line in normal operation.
pub const LINE_NORMAL: Color = Color::Cyan;
/// Overloaded line.
pub const LINE_OVERLOAD: Color = Color::Magenta;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;

/// Node color; the simulated failure overlay wins over recorded status.
pub fn node_color(status: NodeStatus, simulated_failure: bool) -> Color {
    if simulated_failure {
        return FAILED;
    }
    match status {
        NodeStatus::Healthy => HEALTHY,
        NodeStatus::Warning => WARNING,
        NodeStatus::Critical => CRITICAL,
        NodeStatus::Failed => FAILED,
    }
}

/// Line color; the simulated failure overlay wins over recorded status.
pub fn line_color(status: LineStatus, simulated_failure: bool) -> Color {
    if simulated_failure {
        return FAILED;
    }
    match status {
        LineStatus::Normal => LINE_NORMAL,
        LineStatus::Overload => LINE_OVERLOAD,
        LineStatus::Failed => FAILED,
    }
}
