use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub type NodeId = String;

/// Symmetric neighbor lookup derived from the connection list.
pub type AdjacencyIndex = HashMap<NodeId, HashSet<NodeId>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Red,
    Blue,
    Black,
}

impl StatusColor {
    pub fn label(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Black => "black",
        }
    }

    pub fn all() -> [StatusColor; 4] {
        [Self::Green, Self::Red, Self::Blue, Self::Black]
    }
}

/// Closed role classification, derived once at load time from the node's
/// declared class string and id. Render code branches on this variant and
/// never re-derives the role from strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    Database,
    Table,
    Script,
    Service,
    Webhook,
    Bot,
    Page,
    Storage,
    External,
    Generic,
}

impl NodeRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Table => "table",
            Self::Script => "script",
            Self::Service => "service",
            Self::Webhook => "webhook",
            Self::Bot => "bot",
            Self::Page => "page",
            Self::Storage => "storage",
            Self::External => "external",
            Self::Generic => "node",
        }
    }

    pub(super) fn classify(class: Option<&str>, id: &str) -> Self {
        let class = class.unwrap_or("").to_ascii_lowercase();
        let id = id.to_ascii_lowercase();
        let matches = |needle: &str| class.contains(needle) || id.contains(needle);

        if matches("table") {
            Self::Table
        } else if matches("database") || matches("db") {
            Self::Database
        } else if matches("webhook") || matches("hook") {
            Self::Webhook
        } else if matches("script") || matches("lua") || matches("parser") {
            Self::Script
        } else if matches("bot") || matches("chat") {
            Self::Bot
        } else if matches("page") || matches("view") || matches("dashboard") {
            Self::Page
        } else if matches("storage") || matches("folder") || matches("file") {
            Self::Storage
        } else if matches("external") || matches("game") || matches("api") {
            Self::External
        } else if matches("service") || matches("watcher") || matches("worker") {
            Self::Service
        } else {
            Self::Generic
        }
    }
}

/// Diagram surfaces. Each surface owns its own persisted state under its key
/// prefix; content may declare which surfaces a group appears on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Full,
    Pipeline,
    Flow,
}

impl SurfaceKind {
    pub fn all() -> [SurfaceKind; 3] {
        [Self::Full, Self::Pipeline, Self::Flow]
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Full => "Full map",
            Self::Pipeline => "Pipeline map",
            Self::Flow => "Flow map",
        }
    }

    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Pipeline => "pipeline",
            Self::Flow => "flow",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub tag: Option<String>,
    pub subtitle: Option<String>,
    pub class: Option<String>,
    pub role: NodeRole,
    pub auto_status: StatusColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupLayout {
    Stack,
    Columns(usize),
}

#[derive(Clone, Debug)]
pub struct Group {
    pub id: String,
    pub title: String,
    pub layout: GroupLayout,
    /// Surfaces this group appears on; empty means every surface.
    pub surfaces: Vec<SurfaceKind>,
    pub nodes: Vec<Node>,
}

impl Group {
    pub fn on_surface(&self, surface: SurfaceKind) -> bool {
        self.surfaces.is_empty() || self.surfaces.contains(&surface)
    }
}

/// Directed labeled edge. Drawing uses the direction; adjacency does not.
#[derive(Clone, Debug)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: String,
    pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StoryStep {
    pub id: String,
    pub label: String,
    pub title: String,
    pub narration: String,
    pub focus_node: NodeId,
    pub nodes: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct TabDef {
    pub id: String,
    pub title: String,
    /// `None` denotes the universal set: the tab allows every group.
    pub groups: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct PresetDef {
    pub id: String,
    pub title: String,
    pub groups: Vec<String>,
}

/// The declarative graph description. Loaded once at startup and immutable
/// for the session; all mutable view state lives elsewhere.
#[derive(Clone, Debug)]
pub struct AtlasGraph {
    pub groups: Vec<Group>,
    pub connections: Vec<Connection>,
    pub story: Vec<StoryStep>,
    pub tabs: Vec<TabDef>,
    pub presets: Vec<PresetDef>,
    node_index: HashMap<NodeId, (usize, usize)>,
}

impl AtlasGraph {
    pub(super) fn new(
        groups: Vec<Group>,
        connections: Vec<Connection>,
        story: Vec<StoryStep>,
        tabs: Vec<TabDef>,
        presets: Vec<PresetDef>,
    ) -> Self {
        let mut node_index = HashMap::new();
        for (group_idx, group) in groups.iter().enumerate() {
            for (node_idx, node) in group.nodes.iter().enumerate() {
                node_index.insert(node.id.clone(), (group_idx, node_idx));
            }
        }

        Self {
            groups,
            connections,
            story,
            tabs,
            presets,
            node_index,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        let &(group_idx, node_idx) = self.node_index.get(id)?;
        self.groups.get(group_idx)?.nodes.get(node_idx)
    }

    pub fn group_of(&self, id: &str) -> Option<&Group> {
        let &(group_idx, _) = self.node_index.get(id)?;
        self.groups.get(group_idx)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn tab(&self, id: &str) -> Option<&TabDef> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn preset(&self, id: &str) -> Option<&PresetDef> {
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.groups.iter().flat_map(|group| group.nodes.iter())
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

/// Fold every connection's endpoints into each other's neighbor set.
///
/// The result is a pure function of the connection set: order-independent,
/// symmetric, and safe to rebuild from the same list at any time. Endpoints
/// that name no known node are retained; the render step simply finds no
/// bounds for them and skips the edge.
pub fn build_adjacency(connections: &[Connection]) -> AdjacencyIndex {
    let mut adjacency: AdjacencyIndex = HashMap::new();
    for connection in connections {
        adjacency
            .entry(connection.from.clone())
            .or_default()
            .insert(connection.to.clone());
        adjacency
            .entry(connection.to.clone())
            .or_default()
            .insert(connection.from.clone());
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(from: &str, to: &str) -> Connection {
        Connection {
            from: from.to_string(),
            to: to.to_string(),
            kind: "data".to_string(),
            label: None,
        }
    }

    #[test]
    fn adjacency_scenario() {
        let adjacency = build_adjacency(&[conn("a", "b"), conn("b", "c")]);

        assert_eq!(adjacency.len(), 3);
        assert_eq!(adjacency["a"], HashSet::from(["b".to_string()]));
        assert_eq!(
            adjacency["b"],
            HashSet::from(["a".to_string(), "c".to_string()])
        );
        assert_eq!(adjacency["c"], HashSet::from(["b".to_string()]));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let connections = [conn("a", "b"), conn("b", "c"), conn("c", "a"), conn("a", "b")];
        let adjacency = build_adjacency(&connections);

        for (id, neighbors) in &adjacency {
            for neighbor in neighbors {
                assert!(
                    adjacency[neighbor].contains(id),
                    "{neighbor} should list {id} back"
                );
            }
        }
    }

    #[test]
    fn adjacency_is_pure() {
        let connections = [conn("a", "b"), conn("b", "c"), conn("d", "a")];
        assert_eq!(build_adjacency(&connections), build_adjacency(&connections));
    }

    #[test]
    fn adjacency_keeps_dangling_endpoints() {
        let adjacency = build_adjacency(&[conn("a", "ghost")]);
        assert!(adjacency["ghost"].contains("a"));
    }

    #[test]
    fn role_classification_prefers_specific_matches() {
        assert_eq!(NodeRole::classify(Some("table"), "match-table"), NodeRole::Table);
        assert_eq!(NodeRole::classify(None, "stats-database"), NodeRole::Database);
        assert_eq!(NodeRole::classify(None, "discord-webhook"), NodeRole::Webhook);
        assert_eq!(NodeRole::classify(Some("lua"), "round-end"), NodeRole::Script);
        assert_eq!(NodeRole::classify(None, "demo-watcher"), NodeRole::Service);
        assert_eq!(NodeRole::classify(None, "mystery"), NodeRole::Generic);
    }
}
