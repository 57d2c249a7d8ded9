//! Dashboard application state.

use std::time::Instant;

use crate::grid::cascade::{CascadeSimulator, TriggerOutcome};
use crate::grid::topology::GridTopology;
use crate::grid::types::GridNode;
use crate::map::projection::GeoBounds;

/// Padding around the node span on the map canvas.
const MAP_PAD: f64 = 0.1;

/// Dashboard state: topology, simulator, selection and last message.
pub struct App {
    /// Grid being displayed.
    pub topology: GridTopology,
    /// Cascade overlay.
    pub simulator: CascadeSimulator,
    /// Index into `topology.nodes()` of the highlighted node.
    pub selected: usize,
    /// Set when the user asks to leave.
    pub quit: bool,
    /// Time of the last simulator tick.
    pub last_tick: Instant,
    /// One-line feedback for the last action.
    pub message: String,
    /// Canvas bounds, `None` for an empty grid.
    pub bounds: Option<GeoBounds>,
}

impl App {
    /// Builds a dashboard over `topology`.
    pub fn new(topology: GridTopology, simulator: CascadeSimulator) -> Self {
        let bounds = GeoBounds::enclosing(topology.nodes(), MAP_PAD);
        Self {
            topology,
            simulator,
            selected: 0,
            quit: false,
            last_tick: Instant::now(),
            message: "Select a critical node and press c".to_string(),
            bounds,
        }
    }

    /// Closes the analysis window once it has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.simulator.tick(now) {
            self.message = "Analysis complete".to_string();
        }
        self.last_tick = now;
    }

    /// Currently highlighted node.
    pub fn selected_node(&self) -> Option<&GridNode> {
        self.topology.nodes().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let n = self.topology.nodes().len();
        if n > 0 {
            self.selected = (self.selected + 1) % n;
        }
    }

    pub fn select_prev(&mut self) {
        let n = self.topology.nodes().len();
        if n > 0 {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    /// Starts a cascade from the highlighted node.
    pub fn trigger_selected(&mut self, now: Instant) {
        let Some(id) = self.selected_node().map(|n| n.id.clone()) else {
            return;
        };
        self.message = match self.simulator.trigger(&self.topology, &id, now) {
            TriggerOutcome::Started(report) => format!(
                "Cascade from {id}: {} node(s), {} line(s) failed",
                report.failed_nodes.len(),
                report.failed_lines.len()
            ),
            TriggerOutcome::NotCritical(status) => format!("{id} is {status}, not critical"),
            TriggerOutcome::Busy => "Analysis in progress".to_string(),
            TriggerOutcome::UnknownNode => format!("{id} not found"),
        };
    }

    /// Clears the cascade overlay.
    pub fn reset(&mut self) {
        self.simulator.reset();
        self.message = "Simulation reset".to_string();
    }
}
