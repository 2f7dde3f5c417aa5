use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use super::graph::{
    AtlasGraph, Connection, Group, GroupLayout, Node, NodeRole, PresetDef, StatusColor, StoryStep,
    SurfaceKind, TabDef,
};

#[derive(Debug, Deserialize)]
struct RawAtlas {
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    connections: Vec<RawConnection>,
    #[serde(default)]
    story: Vec<RawStoryStep>,
    #[serde(default)]
    tabs: Vec<RawTab>,
    #[serde(default)]
    presets: Vec<RawPreset>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: String,
    title: String,
    #[serde(default)]
    columns: Option<usize>,
    #[serde(default)]
    surfaces: Vec<SurfaceKind>,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    label: String,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default, rename = "autoStatus")]
    auto_status: Option<StatusColor>,
}

#[derive(Debug, Deserialize)]
struct RawConnection {
    from: String,
    to: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStoryStep {
    id: String,
    label: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    narration: String,
    #[serde(rename = "focusNode")]
    focus_node: String,
    #[serde(default)]
    nodes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTab {
    id: String,
    title: String,
    #[serde(default)]
    groups: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawPreset {
    id: String,
    title: String,
    groups: Vec<String>,
}

pub fn load_atlas(path: &Path) -> Result<AtlasGraph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read atlas description {}", path.display()))?;
    parse_atlas(&raw).with_context(|| format!("failed to parse atlas description {}", path.display()))
}

pub fn parse_atlas(raw: &str) -> Result<AtlasGraph> {
    let raw: RawAtlas = serde_json::from_str(raw).context("invalid atlas JSON")?;

    if raw.groups.is_empty() {
        bail!("atlas description contains no groups");
    }

    let mut seen = HashSet::new();
    let mut groups = Vec::with_capacity(raw.groups.len());
    for raw_group in raw.groups {
        let mut nodes = Vec::with_capacity(raw_group.nodes.len());
        for raw_node in raw_group.nodes {
            if !seen.insert(raw_node.id.clone()) {
                bail!("duplicate node id {:?}", raw_node.id);
            }

            let role = NodeRole::classify(raw_node.class.as_deref(), &raw_node.id);
            nodes.push(Node {
                id: raw_node.id,
                label: raw_node.label,
                tag: raw_node.tag,
                subtitle: raw_node.subtitle,
                class: raw_node.class,
                role,
                auto_status: raw_node.auto_status.unwrap_or(StatusColor::Blue),
            });
        }

        let layout = match raw_group.columns {
            Some(columns) if columns > 1 => GroupLayout::Columns(columns),
            _ => GroupLayout::Stack,
        };

        groups.push(Group {
            id: raw_group.id,
            title: raw_group.title,
            layout,
            surfaces: raw_group.surfaces,
            nodes,
        });
    }

    let connections = raw
        .connections
        .into_iter()
        .map(|raw_connection| Connection {
            from: raw_connection.from,
            to: raw_connection.to,
            kind: raw_connection.kind.unwrap_or_else(|| "data".to_string()),
            label: raw_connection.label,
        })
        .collect::<Vec<_>>();

    // Connections naming unknown nodes are kept: collapsed or filtered
    // content routinely leaves edges without a visible endpoint.
    let dangling = connections
        .iter()
        .flat_map(|connection| [&connection.from, &connection.to])
        .filter(|id| !seen.contains(*id))
        .count();
    if dangling > 0 {
        debug!(dangling, "atlas connections reference undeclared node ids");
    }

    let story = raw
        .story
        .into_iter()
        .map(|raw_step| StoryStep {
            title: raw_step.title.unwrap_or_else(|| raw_step.label.clone()),
            id: raw_step.id,
            label: raw_step.label,
            narration: raw_step.narration,
            focus_node: raw_step.focus_node,
            nodes: raw_step.nodes,
        })
        .collect();

    let tabs = raw
        .tabs
        .into_iter()
        .map(|raw_tab| TabDef {
            id: raw_tab.id,
            title: raw_tab.title,
            groups: raw_tab.groups,
        })
        .collect();

    let presets = raw
        .presets
        .into_iter()
        .map(|raw_preset| PresetDef {
            id: raw_preset.id,
            title: raw_preset.title,
            groups: raw_preset.groups,
        })
        .collect();

    Ok(AtlasGraph::new(groups, connections, story, tabs, presets))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "groups": [
            {
                "id": "ingest",
                "title": "Ingest",
                "surfaces": ["full", "flow"],
                "nodes": [
                    {"id": "demo-watcher", "label": "Demo watcher", "class": "service"},
                    {"id": "stats-parser", "label": "Stats parser", "autoStatus": "green"}
                ]
            },
            {
                "id": "storage",
                "title": "Storage",
                "columns": 3,
                "nodes": [
                    {"id": "stats-database", "label": "Stats DB", "subtitle": "postgres"}
                ]
            }
        ],
        "connections": [
            {"from": "demo-watcher", "to": "stats-parser", "type": "file"},
            {"from": "stats-parser", "to": "stats-database", "label": "rows"}
        ],
        "story": [
            {
                "id": "step-ingest",
                "label": "1. Ingest",
                "narration": "Files arrive and get parsed.",
                "focusNode": "demo-watcher",
                "nodes": ["demo-watcher", "stats-parser"]
            }
        ],
        "tabs": [
            {"id": "all", "title": "Everything"},
            {"id": "data", "title": "Data", "groups": ["storage"]}
        ],
        "presets": [
            {"id": "core", "title": "Core", "groups": ["ingest", "storage"]}
        ]
    }"#;

    #[test]
    fn parses_sample_atlas() {
        let atlas = parse_atlas(SAMPLE).expect("sample parses");
        assert_eq!(atlas.node_count(), 3);
        assert_eq!(atlas.connection_count(), 2);
        assert_eq!(atlas.story.len(), 1);

        let watcher = atlas.node("demo-watcher").expect("watcher exists");
        assert_eq!(watcher.role, NodeRole::Service);
        assert_eq!(watcher.auto_status, StatusColor::Blue);

        let parser = atlas.node("stats-parser").expect("parser exists");
        assert_eq!(parser.auto_status, StatusColor::Green);

        let storage = atlas.group("storage").expect("storage group");
        assert_eq!(storage.layout, GroupLayout::Columns(3));
        assert!(storage.on_surface(SurfaceKind::Pipeline));

        let ingest = atlas.group("ingest").expect("ingest group");
        assert!(ingest.on_surface(SurfaceKind::Flow));
        assert!(!ingest.on_surface(SurfaceKind::Pipeline));
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let raw = r#"{
            "groups": [{
                "id": "g", "title": "G",
                "nodes": [
                    {"id": "dup", "label": "A"},
                    {"id": "dup", "label": "B"}
                ]
            }]
        }"#;
        assert!(parse_atlas(raw).is_err());
    }

    #[test]
    fn keeps_connections_to_unknown_nodes() {
        let raw = r#"{
            "groups": [{"id": "g", "title": "G", "nodes": [{"id": "a", "label": "A"}]}],
            "connections": [{"from": "a", "to": "ghost"}]
        }"#;
        let atlas = parse_atlas(raw).expect("parses");
        assert_eq!(atlas.connection_count(), 1);
        assert!(atlas.node("ghost").is_none());
    }

    #[test]
    fn rejects_empty_description() {
        assert!(parse_atlas("{}").is_err());
        assert!(parse_atlas("not json").is_err());
    }
}
