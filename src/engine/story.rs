use crate::model::{AtlasGraph, NodeId, StoryStep};

/// Which step of the guided walkthrough is active, if any. Selecting the
/// active step again deactivates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryState {
    active: Option<String>,
}

impl StoryState {
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_step<'a>(&self, graph: &'a AtlasGraph) -> Option<&'a StoryStep> {
        let id = self.active.as_deref()?;
        graph.story.iter().find(|step| step.id == id)
    }

    /// Toggle a step. Returns the node the view should center on, if the step
    /// became active and names one.
    pub fn toggle(&mut self, graph: &AtlasGraph, step_id: &str) -> Option<NodeId> {
        if self.active.as_deref() == Some(step_id) {
            self.active = None;
            return None;
        }
        let step = graph.story.iter().find(|step| step.id == step_id)?;
        self.active = Some(step.id.clone());
        Some(step.focus_node.clone())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Whether a node belongs to the active step's emphasized set.
    pub fn emphasizes(&self, graph: &AtlasGraph, node: &str) -> bool {
        let Some(step) = self.active_step(graph) else {
            return false;
        };
        step.nodes.iter().any(|id| id == node) || step.focus_node == node
    }

    /// Whether a connector stays at full strength while a step is active:
    /// any edge touching the step's set does.
    pub fn edge_in_step(&self, graph: &AtlasGraph, from: &str, to: &str) -> bool {
        self.emphasizes(graph, from) || self.emphasizes(graph, to)
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
                    {"id": "core", "title": "Core", "nodes": [
                        {"id": "a", "label": "A"},
                        {"id": "b", "label": "B"},
                        {"id": "c", "label": "C"}
                    ]}
                ],
                "story": [
                    {"id": "intake", "label": "1", "title": "Intake",
                     "narration": "Data arrives.", "focusNode": "a",
                     "nodes": ["a", "b"]},
                    {"id": "serve", "label": "2", "title": "Serve",
                     "narration": "Pages read it.", "focusNode": "c",
                     "nodes": ["c"]}
                ]
            }"#,
        )
        .expect("sample parses")
    }

    #[test]
    fn toggle_activates_then_deactivates() {
        let graph = sample_graph();
        let mut story = StoryState::default();

        assert_eq!(story.toggle(&graph, "intake").as_deref(), Some("a"));
        assert_eq!(story.active_id(), Some("intake"));

        assert_eq!(story.toggle(&graph, "intake"), None);
        assert_eq!(story.active_id(), None);
    }

    #[test]
    fn switching_steps_replaces_the_active_one() {
        let graph = sample_graph();
        let mut story = StoryState::default();

        story.toggle(&graph, "intake");
        assert_eq!(story.toggle(&graph, "serve").as_deref(), Some("c"));
        assert_eq!(story.active_id(), Some("serve"));
    }

    #[test]
    fn unknown_step_is_ignored() {
        let graph = sample_graph();
        let mut story = StoryState::default();
        assert_eq!(story.toggle(&graph, "missing"), None);
        assert_eq!(story.active_id(), None);
    }

    #[test]
    fn emphasis_covers_the_step_set_only() {
        let graph = sample_graph();
        let mut story = StoryState::default();
        story.toggle(&graph, "intake");

        assert!(story.emphasizes(&graph, "a"));
        assert!(story.emphasizes(&graph, "b"));
        assert!(!story.emphasizes(&graph, "c"));

        assert!(story.edge_in_step(&graph, "a", "b"));
        assert!(!story.edge_in_step(&graph, "c", "c"));
    }

    #[test]
    fn edge_touching_the_focused_set_stays_active() {
        let graph = sample_graph();
        let mut story = StoryState::default();
        story.toggle(&graph, "intake");

        // One focused endpoint is enough; only edges fully outside dim.
        assert!(story.edge_in_step(&graph, "a", "c"));
        assert!(story.edge_in_step(&graph, "b", "c"));
        assert!(!story.edge_in_step(&graph, "c", "c"));
    }

    #[test]
    fn no_active_step_emphasizes_nothing() {
        let graph = sample_graph();
        let story = StoryState::default();
        assert!(!story.emphasizes(&graph, "a"));
        assert!(!story.edge_in_step(&graph, "a", "b"));
    }
}
