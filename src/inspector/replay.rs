use serde_json::Value;

use super::snapshot::build_snapshot;
use super::Shared;
use crate::devtools::ConsoleMessage;
use crate::error::InspectError;
use crate::tree::{path, traverse, Flow, Node, Path};
use crate::unit::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Not a jump command
    Ignored,
    /// Snapshot applied; `writes` stores received a new value
    Applied { writes: usize },
}

/// Applies a console jump command to the live stores.
///
/// Only stores whose recorded value differs from the current one are written.
/// Paths that no longer resolve to a store are skipped. Watchers stay silent
/// for the whole replay.
pub(crate) fn sync(shared: &Shared, message: &ConsoleMessage) -> Result<ReplayOutcome, InspectError> {
    if !message.is_jump() {
        return Ok(ReplayOutcome::Ignored);
    }

    let _travel = shared.mode.travel();
    let current = build_snapshot(&shared.root);
    let raw = message.state.as_deref().ok_or(InspectError::MissingState)?;
    let target: Value = serde_json::from_str(raw)?;

    let mut writes = 0;
    traverse(&target, |value, _, at: &Path| {
        if let Some(Node::Unit(Unit::Store(store))) = shared.root.get_path(at) {
            if path::get(&current, at) != Some(value) {
                store.set_state(value.clone());
                writes += 1;
            }
        }
        Flow::Descend
    });

    tracing::debug!(name = %shared.config.name, writes, "Applied console snapshot");
    Ok(ReplayOutcome::Applied { writes })
}
