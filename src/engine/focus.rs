use std::collections::HashSet;

use crate::model::{AdjacencyIndex, NodeId};

/// Hover-derived highlight marks: the hovered node plus its direct peers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusMarks {
    pub active: Option<NodeId>,
    pub peers: HashSet<NodeId>,
}

impl FocusMarks {
    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id) || self.peers.contains(id)
    }
}

/// Compute the marks for a hovered node. A node with no connections yields
/// marks with an empty peer set, not empty marks.
pub fn focus_marks(adjacency: &AdjacencyIndex, hovered: Option<&NodeId>) -> FocusMarks {
    let Some(node) = hovered else {
        return FocusMarks::default();
    };
    FocusMarks {
        active: Some(node.clone()),
        peers: adjacency.get(node).cloned().unwrap_or_default(),
    }
}

/// Whether a connector endpoint pair touches the focused set. Used to decide
/// which edges stay at full strength while the rest dim.
pub fn edge_touches(marks: &FocusMarks, from: &str, to: &str) -> bool {
    let Some(active) = marks.active.as_deref() else {
        return false;
    };
    from == active || to == active
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Connection, build_adjacency};

    fn adjacency() -> AdjacencyIndex {
        build_adjacency(&[
            Connection {
                from: "a".to_string(),
                to: "b".to_string(),
                kind: "data".to_string(),
                label: None,
            },
            Connection {
                from: "b".to_string(),
                to: "c".to_string(),
                kind: "data".to_string(),
                label: None,
            },
        ])
    }

    #[test]
    fn hover_marks_active_and_peers() {
        let marks = focus_marks(&adjacency(), Some(&"b".to_string()));
        assert_eq!(marks.active.as_deref(), Some("b"));
        assert_eq!(
            marks.peers,
            HashSet::from(["a".to_string(), "c".to_string()])
        );
        assert!(marks.contains("b"));
        assert!(marks.contains("a"));
        assert!(!marks.contains("d"));
    }

    #[test]
    fn hover_on_isolated_node_keeps_marks_active() {
        let marks = focus_marks(&adjacency(), Some(&"lonely".to_string()));
        assert_eq!(marks.active.as_deref(), Some("lonely"));
        assert!(marks.peers.is_empty());
        assert!(!marks.is_empty());
    }

    #[test]
    fn no_hover_yields_empty_marks() {
        let marks = focus_marks(&adjacency(), None);
        assert!(marks.is_empty());
        assert!(!marks.contains("a"));
    }

    #[test]
    fn edge_dimming_follows_the_active_node() {
        let marks = focus_marks(&adjacency(), Some(&"b".to_string()));
        assert!(edge_touches(&marks, "a", "b"));
        assert!(edge_touches(&marks, "b", "c"));
        assert!(!edge_touches(&marks, "a", "c"));
        assert!(!edge_touches(&FocusMarks::default(), "a", "b"));
    }
}
