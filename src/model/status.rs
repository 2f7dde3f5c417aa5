use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::graph::{NodeId, StatusColor};

pub const DATABASE_NODE: &str = "stats-database";
pub const API_NODE: &str = "stats-api";
pub const GAME_SERVER_NODE: &str = "game-server";
pub const TABLE_NODE_PREFIX: &str = "table-";

/// Shape of the periodic live-status signal written by the external
/// collector. Every field is optional: a partial report updates only the
/// nodes it mentions.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LiveStatusReport {
    #[serde(default)]
    pub database: Option<DatabaseStatus>,
    #[serde(default)]
    pub tables: Vec<TableStatus>,
    #[serde(default, rename = "apiStatus")]
    pub api_status: Option<String>,
    #[serde(default, rename = "gameServerOnline")]
    pub game_server_online: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseStatus {
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TableStatus {
    pub name: String,
    pub status: String,
}

pub fn read_report(path: &Path) -> Result<LiveStatusReport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read live status {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid live status JSON in {}", path.display()))
}

/// Fixed lookup from the report onto node ids and colors. Ids that the loaded
/// graph does not contain are ignored downstream; the mapping itself does not
/// need to know the graph.
pub fn map_report(report: &LiveStatusReport) -> HashMap<NodeId, StatusColor> {
    let mut colors = HashMap::new();

    if let Some(database) = &report.database {
        colors.insert(DATABASE_NODE.to_string(), color_for(&database.status));
    }

    for table in &report.tables {
        colors.insert(
            format!("{TABLE_NODE_PREFIX}{}", table.name),
            color_for(&table.status),
        );
    }

    if let Some(api_status) = &report.api_status {
        let color = if api_status.eq_ignore_ascii_case("online") {
            StatusColor::Green
        } else {
            StatusColor::Red
        };
        colors.insert(API_NODE.to_string(), color);
    }

    if let Some(online) = report.game_server_online {
        let color = if online {
            StatusColor::Green
        } else {
            StatusColor::Red
        };
        colors.insert(GAME_SERVER_NODE.to_string(), color);
    }

    colors
}

fn color_for(status: &str) -> StatusColor {
    let status = status.to_ascii_lowercase();
    match status.as_str() {
        "online" | "ok" | "up" | "healthy" => StatusColor::Green,
        "offline" | "error" | "down" | "failed" => StatusColor::Red,
        "idle" | "standby" | "paused" => StatusColor::Blue,
        _ => StatusColor::Black,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_full_report() {
        let report: LiveStatusReport = serde_json::from_str(
            r#"{
                "database": {"status": "online"},
                "tables": [
                    {"name": "matches", "status": "ok"},
                    {"name": "players", "status": "error"}
                ],
                "apiStatus": "online",
                "gameServerOnline": false
            }"#,
        )
        .expect("report parses");

        let colors = map_report(&report);
        assert_eq!(colors[DATABASE_NODE], StatusColor::Green);
        assert_eq!(colors["table-matches"], StatusColor::Green);
        assert_eq!(colors["table-players"], StatusColor::Red);
        assert_eq!(colors[API_NODE], StatusColor::Green);
        assert_eq!(colors[GAME_SERVER_NODE], StatusColor::Red);
    }

    #[test]
    fn partial_report_maps_only_named_entities() {
        let report: LiveStatusReport =
            serde_json::from_str(r#"{"gameServerOnline": true}"#).expect("report parses");
        let colors = map_report(&report);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[GAME_SERVER_NODE], StatusColor::Green);
    }

    #[test]
    fn unknown_status_strings_map_to_black() {
        let report: LiveStatusReport =
            serde_json::from_str(r#"{"database": {"status": "weird"}}"#).expect("report parses");
        assert_eq!(map_report(&report)[DATABASE_NODE], StatusColor::Black);
    }
}
