use eframe::egui::{Pos2, Rect};

use crate::model::NodeId;

/// Interactive region targets, in draw order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Node(NodeId),
    GroupHeader(String),
}

#[derive(Clone, Debug)]
pub struct HitRegion {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Explicit region -> target registry rebuilt by layout on every redraw.
/// The last-pushed region wins, matching paint order.
#[derive(Clone, Debug, Default)]
pub struct HitRegistry {
    regions: Vec<HitRegion>,
}

impl HitRegistry {
    pub fn push(&mut self, rect: Rect, target: HitTarget) {
        self.regions.push(HitRegion { rect, target });
    }

    pub fn hit_test(&self, world: Pos2) -> Option<&HitTarget> {
        self.regions
            .iter()
            .rev()
            .find(|region| region.rect.contains(world))
            .map(|region| &region.target)
    }

    /// Pointer-down on any region suppresses canvas dragging, so node and
    /// header clicks coexist with pan.
    pub fn is_interactive(&self, world: Pos2) -> bool {
        self.hit_test(world).is_some()
    }
}
