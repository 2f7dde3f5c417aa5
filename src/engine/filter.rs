use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{AtlasGraph, SurfaceKind};

/// Persisted tab/preset selection for one surface. `None` on either axis
/// denotes the universal set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub tab: Option<String>,
    pub preset: Option<String>,
}

/// The visible-group set is the intersection of the preset's groups and the
/// tab's groups. Unknown tab or preset ids degrade to the universal set so a
/// stale persisted selection never blanks the surface.
pub fn effective_groups(graph: &AtlasGraph, filter: &FilterState) -> HashSet<String> {
    let mut visible: HashSet<String> = graph
        .groups
        .iter()
        .map(|group| group.id.clone())
        .collect();

    if let Some(preset_id) = &filter.preset
        && let Some(preset) = graph.preset(preset_id)
    {
        visible.retain(|id| preset.groups.contains(id));
    }

    if let Some(tab_id) = &filter.tab
        && let Some(tab) = graph.tab(tab_id)
        && let Some(allowed) = &tab.groups
    {
        visible.retain(|id| allowed.contains(id));
    }

    visible
}

/// Persisted set of collapsed group ids with the bulk operations the control
/// panel exposes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseSet(HashSet<String>);

impl CollapseSet {
    pub fn is_collapsed(&self, group_id: &str) -> bool {
        self.0.contains(group_id)
    }

    /// Returns whether the group is collapsed after the toggle.
    pub fn toggle(&mut self, group_id: &str) -> bool {
        if !self.0.remove(group_id) {
            self.0.insert(group_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn collapse_all(&mut self, graph: &AtlasGraph) {
        self.0 = graph.groups.iter().map(|group| group.id.clone()).collect();
    }

    pub fn expand_all(&mut self) {
        self.0.clear();
    }

    /// Collapse everything except the groups that appear on the flow surface.
    pub fn expand_flow_only(&mut self, graph: &AtlasGraph) {
        self.0 = graph
            .groups
            .iter()
            .filter(|group| !group.on_surface(SurfaceKind::Flow))
            .map(|group| group.id.clone())
            .collect();
    }

    pub fn as_set(&self) -> &HashSet<String> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_atlas;

    fn sample_graph() -> AtlasGraph {
        parse_atlas(
            r#"{
                "groups": [
                    {"id": "ingest", "title": "Ingest", "surfaces": ["full", "flow"],
                     "nodes": [{"id": "a", "label": "A"}]},
                    {"id": "storage", "title": "Storage",
                     "nodes": [{"id": "b", "label": "B"}]},
                    {"id": "bot", "title": "Bot", "surfaces": ["full"],
                     "nodes": [{"id": "c", "label": "C"}]}
                ],
                "tabs": [
                    {"id": "all", "title": "All"},
                    {"id": "data", "title": "Data", "groups": ["storage", "ingest"]}
                ],
                "presets": [
                    {"id": "pipeline", "title": "Pipeline", "groups": ["ingest", "bot"]}
                ]
            }"#,
        )
        .expect("sample parses")
    }

    #[test]
    fn no_selection_allows_every_group() {
        let graph = sample_graph();
        let visible = effective_groups(&graph, &FilterState::default());
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn intersection_is_a_subset_of_both_sides() {
        let graph = sample_graph();
        let filter = FilterState {
            tab: Some("data".to_string()),
            preset: Some("pipeline".to_string()),
        };

        let visible = effective_groups(&graph, &filter);
        assert_eq!(visible, HashSet::from(["ingest".to_string()]));

        let tab_groups = graph.tab("data").unwrap().groups.clone().unwrap();
        let preset_groups = &graph.preset("pipeline").unwrap().groups;
        for id in &visible {
            assert!(tab_groups.contains(id));
            assert!(preset_groups.contains(id));
        }
    }

    #[test]
    fn tab_without_group_list_is_universal() {
        let graph = sample_graph();
        let filter = FilterState {
            tab: Some("all".to_string()),
            preset: Some("pipeline".to_string()),
        };

        let visible = effective_groups(&graph, &filter);
        assert_eq!(
            visible,
            HashSet::from(["ingest".to_string(), "bot".to_string()])
        );
    }

    #[test]
    fn stale_selection_degrades_to_universal() {
        let graph = sample_graph();
        let filter = FilterState {
            tab: Some("deleted-tab".to_string()),
            preset: Some("deleted-preset".to_string()),
        };
        assert_eq!(effective_groups(&graph, &filter).len(), 3);
    }

    #[test]
    fn collapse_toggle_round_trips() {
        let mut collapsed = CollapseSet::default();
        assert!(collapsed.toggle("ingest"));
        assert!(collapsed.is_collapsed("ingest"));
        assert!(!collapsed.toggle("ingest"));
        assert!(!collapsed.is_collapsed("ingest"));
    }

    #[test]
    fn bulk_operations() {
        let graph = sample_graph();
        let mut collapsed = CollapseSet::default();

        collapsed.collapse_all(&graph);
        assert_eq!(collapsed.as_set().len(), 3);

        collapsed.expand_flow_only(&graph);
        assert!(!collapsed.is_collapsed("ingest"));
        assert!(!collapsed.is_collapsed("storage"));
        assert!(collapsed.is_collapsed("bot"));

        collapsed.expand_all();
        assert!(collapsed.as_set().is_empty());
    }
}
