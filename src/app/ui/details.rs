use eframe::egui::{self, RichText, Ui};

use crate::engine::StatusOverride;
use crate::model::{NodeRole, StatusColor};

use super::super::AtlasModel;

impl AtlasModel {
    pub(in crate::app) fn details_panel(&mut self, ui: &mut Ui) {
        let Self {
            graph,
            adjacency,
            store,
            surfaces,
            active,
            ..
        } = self;
        let surface = &mut surfaces[*active];

        let Some(selected) = surface.selected.clone() else {
            return;
        };
        let Some(node) = graph.node(&selected) else {
            surface.selected = None;
            return;
        };

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading(&node.label);
            if ui.small_button("\u{2715}").clicked() {
                surface.selected = None;
            }
        });
        if surface.selected.is_none() {
            return;
        }

        ui.label(RichText::new(node.role.label()).weak());
        if let Some(group) = graph.group_of(&selected) {
            ui.label(format!("Group: {}", group.title));
        }
        if let Some(tag) = &node.tag {
            ui.label(format!("Tag: {tag}"));
        }
        if let Some(subtitle) = &node.subtitle {
            ui.label(subtitle);
        }
        if let Some(class) = &node.class {
            ui.label(RichText::new(format!("class: {class}")).weak());
        }
        match node.role {
            NodeRole::Table => {
                ui.label("Stores rows written by the ingest scripts.");
            }
            NodeRole::Database => {
                ui.label("Backing database; table nodes below mirror its schema.");
            }
            NodeRole::Script => {
                ui.label("Runs inside the game server and emits stat events.");
            }
            _ => {}
        }

        ui.horizontal(|ui| {
            ui.label(RichText::new(&node.id).monospace().weak());
            if ui.small_button("Copy id").clicked() {
                ui.ctx().copy_text(node.id.clone());
            }
        });
        if ui.button("Center in view").clicked() {
            surface.center_on_node(&selected);
        }

        ui.separator();
        ui.label("Status");
        let applied = surface
            .overlay
            .applied_for(&selected)
            .unwrap_or(node.auto_status);
        ui.label(format!("Current: {}", applied.label()));

        let current = surface.overlay.override_for(&selected);
        let selected_text = match current {
            None | Some(StatusOverride::Auto) => "Automatic".to_string(),
            Some(StatusOverride::Manual { status }) => format!("Manual: {}", status.label()),
        };
        egui::ComboBox::from_id_salt("status_override")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                let mut choice = current;
                let mut changed = ui
                    .selectable_value(&mut choice, Some(StatusOverride::Auto), "Automatic")
                    .changed();
                for status in StatusColor::all() {
                    changed |= ui
                        .selectable_value(
                            &mut choice,
                            Some(StatusOverride::Manual { status }),
                            status.label(),
                        )
                        .changed();
                }
                if changed && let Some(value) = choice {
                    surface.overlay.set_override(&selected, value);
                    surface.persist_overrides(store);
                }
            });
        if current.is_some() && ui.small_button("Clear override").clicked() {
            surface.overlay.clear_override(&selected);
            surface.persist_overrides(store);
        }

        ui.separator();
        ui.label("Connections");
        let mut peers: Vec<&String> = adjacency
            .get(&selected)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        peers.sort();
        if peers.is_empty() {
            ui.label(RichText::new("None").weak());
        }
        let mut jump = None;
        for peer in peers {
            let label = graph
                .node(peer)
                .map_or(peer.as_str(), |node| node.label.as_str());
            if ui.small_button(label).clicked() {
                jump = Some(peer.clone());
            }
        }
        if let Some(id) = jump {
            surface.selected = Some(id.clone());
            surface.center_on_node(&id);
        }
    }
}
