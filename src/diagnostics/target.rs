//! Grid-to-diagnostics handoff of the asset to inspect.

use tracing::info;

use crate::error::{GridError, Result};
use crate::grid::topology::GridTopology;
use crate::handoff::{DIAGNOSTIC_TARGET_KEY, Handoff};

/// Queues `node_id` for the next diagnostics run.
///
/// # Errors
///
/// Returns [`GridError::UnknownNode`] if the node does not exist, or a
/// handoff write error.
pub fn request_diagnosis(topology: &GridTopology, handoff: &mut Handoff, node_id: &str) -> Result<()> {
    if topology.node(node_id).is_none() {
        return Err(GridError::UnknownNode(node_id.to_string()));
    }
    handoff.put(DIAGNOSTIC_TARGET_KEY, &node_id)?;
    info!(node = node_id, "diagnosis requested");
    Ok(())
}

/// Consumes the queued asset id, if any.
///
/// # Errors
///
/// Returns an error if the stored blob cannot be read.
pub fn take_target(handoff: &mut Handoff) -> Result<Option<String>> {
    handoff.take(DIAGNOSTIC_TARGET_KEY)
}
