use std::collections::HashSet;

use crate::engine::{
    CollapseSet, FilterState, LayoutConfig, OverrideMap, RedrawScheduler, RoutedPath,
    RouterConfig, StatusOverlay, StoryState, SurfaceLayout, Viewport, ViewportConfig,
    ViewportState, effective_groups, layout_surface, route,
};
use crate::model::{AtlasGraph, NodeId, SurfaceKind};
use crate::store::StateStore;

pub(in crate::app) struct RoutedEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: String,
    pub label: Option<String>,
    pub path: RoutedPath,
}

/// Everything one surface remembers between frames. Persisted pieces
/// (viewport, filter, collapse set, overrides, focus-line toggle) are written
/// back through the store on every mutation; the rest is rebuilt on demand.
pub(in crate::app) struct SurfaceState {
    pub kind: SurfaceKind,
    pub viewport: Viewport,
    pub filter: FilterState,
    pub collapsed: CollapseSet,
    pub overlay: StatusOverlay,
    pub story: StoryState,
    pub focus_lines: bool,
    pub hovered: Option<NodeId>,
    pub hovered_header: Option<String>,
    pub selected: Option<NodeId>,
    pub scheduler: RedrawScheduler,
    pub layout: Option<SurfaceLayout>,
    pub routed: Vec<RoutedEdge>,
    pub search: String,
    pub pending_center: Option<NodeId>,
    pub pending_fit: bool,
    pub dragging_canvas: bool,
}

impl SurfaceState {
    pub fn restore(kind: SurfaceKind, store: &mut StateStore) -> Self {
        let viewport_state: ViewportState = store
            .get(&key(kind, "viewport"))
            .unwrap_or_default();
        let mut overlay = StatusOverlay::default();
        overlay.overrides = store
            .get::<OverrideMap>(&key(kind, "overrides"))
            .unwrap_or_default();

        let mut surface = Self {
            kind,
            viewport: Viewport::new(viewport_state, ViewportConfig::default()),
            filter: store.get(&key(kind, "filter")).unwrap_or_default(),
            collapsed: store.get(&key(kind, "collapsed")).unwrap_or_default(),
            overlay,
            story: StoryState::default(),
            focus_lines: store.get(&key(kind, "focus_lines")).unwrap_or(true),
            hovered: None,
            hovered_header: None,
            selected: None,
            scheduler: RedrawScheduler::default(),
            layout: None,
            routed: Vec::new(),
            search: String::new(),
            pending_center: None,
            pending_fit: false,
            dragging_canvas: false,
        };
        surface.scheduler.schedule();
        surface
    }

    pub fn persist_viewport(&self, store: &mut StateStore) {
        store.set(&key(self.kind, "viewport"), &self.viewport.state);
    }

    pub fn persist_filter(&self, store: &mut StateStore) {
        store.set(&key(self.kind, "filter"), &self.filter);
    }

    pub fn persist_collapsed(&self, store: &mut StateStore) {
        store.set(&key(self.kind, "collapsed"), &self.collapsed);
    }

    pub fn persist_overrides(&self, store: &mut StateStore) {
        store.set(&key(self.kind, "overrides"), &self.overlay.overrides);
    }

    pub fn persist_focus_lines(&self, store: &mut StateStore) {
        store.set(&key(self.kind, "focus_lines"), &self.focus_lines);
    }

    pub fn visible_groups(&self, graph: &AtlasGraph) -> HashSet<String> {
        effective_groups(graph, &self.filter)
    }

    /// Recompute layout and connector routes after any structural change.
    /// Connections whose endpoints are hidden or unknown are skipped.
    pub fn rebuild(
        &mut self,
        graph: &AtlasGraph,
        layout_config: &LayoutConfig,
        router_config: &RouterConfig,
    ) {
        let visible = self.visible_groups(graph);
        let layout = layout_surface(
            graph,
            self.kind,
            &visible,
            self.collapsed.as_set(),
            layout_config,
        );

        self.routed = graph
            .connections
            .iter()
            .filter_map(|connection| {
                let from = layout.node_bounds.get(&connection.from)?;
                let to = layout.node_bounds.get(&connection.to)?;
                let path = route(*from, *to, *router_config)?;
                Some(RoutedEdge {
                    from: connection.from.clone(),
                    to: connection.to.clone(),
                    kind: connection.kind.clone(),
                    label: connection.label.clone(),
                    path,
                })
            })
            .collect();
        self.layout = Some(layout);
    }

    pub fn center_on_node(&mut self, node: &str) {
        self.pending_center = Some(node.to_string());
    }
}

fn key(kind: SurfaceKind, suffix: &str) -> String {
    format!("{}.{}", kind.key_prefix(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_atlas;

    fn sample_graph() -> AtlasGraph {
        parse_atlas(
            r#"{
                "groups": [
                    {"id": "core", "title": "Core", "nodes": [
                        {"id": "a", "label": "A"},
                        {"id": "b", "label": "B"}
                    ]},
                    {"id": "edge", "title": "Edge", "nodes": [
                        {"id": "c", "label": "C"}
                    ]}
                ],
                "connections": [
                    {"from": "a", "to": "b"},
                    {"from": "b", "to": "ghost"}
                ],
                "presets": [
                    {"id": "core-only", "title": "Core", "groups": ["core"]}
                ]
            }"#,
        )
        .expect("sample parses")
    }

    #[test]
    fn rebuild_routes_only_edges_with_both_endpoints_placed() {
        let graph = sample_graph();
        let mut store = StateStore::in_memory();
        let mut surface = SurfaceState::restore(SurfaceKind::Full, &mut store);

        surface.rebuild(&graph, &LayoutConfig::default(), &RouterConfig::default());
        assert_eq!(surface.routed.len(), 1);
        assert_eq!(surface.routed[0].from, "a");
    }

    #[test]
    fn hidden_group_drops_its_connectors() {
        let graph = sample_graph();
        let mut store = StateStore::in_memory();
        let mut surface = SurfaceState::restore(SurfaceKind::Full, &mut store);
        surface.filter.preset = Some("core-only".to_string());

        surface.rebuild(&graph, &LayoutConfig::default(), &RouterConfig::default());
        let layout = surface.layout.as_ref().unwrap();
        assert!(!layout.node_bounds.contains_key("c"));
        assert_eq!(surface.routed.len(), 1);
    }

    #[test]
    fn persisted_state_round_trips_through_restore() {
        let mut store = StateStore::in_memory();

        {
            let mut surface = SurfaceState::restore(SurfaceKind::Pipeline, &mut store);
            surface.viewport.pan(eframe::egui::vec2(40.0, -10.0));
            surface.persist_viewport(&mut store);
            surface.collapsed.toggle("core");
            surface.persist_collapsed(&mut store);
            surface.filter.tab = Some("data".to_string());
            surface.persist_filter(&mut store);
            surface.focus_lines = false;
            surface.persist_focus_lines(&mut store);
        }

        let restored = SurfaceState::restore(SurfaceKind::Pipeline, &mut store);
        assert_eq!(restored.viewport.state.origin_x, 40.0);
        assert!(restored.collapsed.is_collapsed("core"));
        assert_eq!(restored.filter.tab.as_deref(), Some("data"));
        assert!(!restored.focus_lines);

        // Another surface's keys are untouched.
        let other = SurfaceState::restore(SurfaceKind::Full, &mut store);
        assert_eq!(other.viewport.state.origin_x, 0.0);
    }
}
