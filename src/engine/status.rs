use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, StatusColor};

/// Per-node override recorded from the admin panel. `Auto` records an
/// explicit "follow the live feed" choice; a manual entry always carries the
/// pinned status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StatusOverride {
    Auto,
    Manual { status: StatusColor },
}

pub type OverrideMap = HashMap<NodeId, StatusOverride>;

/// Resolves the status each node should display and remembers the last
/// applied (mode, status) pair, so a refresh only reports nodes whose
/// resolution actually changed.
#[derive(Clone, Debug, Default)]
pub struct StatusOverlay {
    pub overrides: OverrideMap,
    live: HashMap<NodeId, StatusColor>,
    applied: HashMap<NodeId, (StatusOverride, StatusColor)>,
}

impl StatusOverlay {
    /// Replace the live snapshot. On poll failure the caller simply does not
    /// call this, and the previous snapshot stays in effect.
    pub fn update_live(&mut self, live: HashMap<NodeId, StatusColor>) {
        self.live = live;
    }

    pub fn set_override(&mut self, node: &str, value: StatusOverride) {
        self.overrides.insert(node.to_string(), value);
    }

    pub fn clear_override(&mut self, node: &str) {
        self.overrides.remove(node);
    }

    pub fn reset_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn override_for(&self, node: &str) -> Option<StatusOverride> {
        self.overrides.get(node).copied()
    }

    /// The status a node resolves to right now: manual override first, then
    /// the live feed, then the declared default.
    pub fn resolve(&self, node: &str, auto_status: StatusColor) -> StatusColor {
        self.resolve_pair(node, auto_status).1
    }

    /// The effective (mode, status) pair the cache diffs on. An auto entry's
    /// status tracks the live feed; a manual entry pins its own.
    fn resolve_pair(&self, node: &str, auto_status: StatusColor) -> (StatusOverride, StatusColor) {
        match self.overrides.get(node) {
            Some(StatusOverride::Manual { status }) => {
                (StatusOverride::Manual { status: *status }, *status)
            }
            Some(StatusOverride::Auto) | None => (
                StatusOverride::Auto,
                self.live.get(node).copied().unwrap_or(auto_status),
            ),
        }
    }

    /// Resolve every node against the shadow cache and return only the nodes
    /// whose (mode, status) pair changed. Calling this twice in a row with
    /// the same inputs returns an empty diff the second time.
    pub fn apply<'a>(
        &mut self,
        nodes: impl Iterator<Item = (&'a NodeId, StatusColor)>,
    ) -> Vec<(NodeId, StatusColor)> {
        let mut changed = Vec::new();
        for (id, auto_status) in nodes {
            let next = self.resolve_pair(id, auto_status);
            if self.applied.get(id) != Some(&next) {
                changed.push((id.clone(), next.1));
                self.applied.insert(id.clone(), next);
            }
        }
        changed
    }

    pub fn applied_for(&self, node: &str) -> Option<StatusColor> {
        self.applied.get(node).map(|&(_, status)| status)
    }
}
