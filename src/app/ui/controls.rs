use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;

use super::super::AtlasModel;

const SEARCH_RESULT_LIMIT: usize = 8;

impl AtlasModel {
    pub(in crate::app) fn controls_panel(&mut self, ui: &mut Ui) {
        let Self {
            graph,
            store,
            poller,
            matcher,
            surfaces,
            active,
            ..
        } = self;
        let surface = &mut surfaces[*active];

        ui.add_space(6.0);
        ui.label("Search");
        ui.text_edit_singleline(&mut surface.search);
        if !surface.search.trim().is_empty() {
            let query = surface.search.trim();
            let mut scored: Vec<(i64, &str, &str)> = graph
                .nodes()
                .filter_map(|node| {
                    let score = matcher
                        .fuzzy_match(&node.label, query)
                        .or_else(|| matcher.fuzzy_match(&node.id, query))?;
                    Some((score, node.id.as_str(), node.label.as_str()))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));

            let mut jump = None;
            for (_, id, label) in scored.into_iter().take(SEARCH_RESULT_LIMIT) {
                if ui.small_button(label).clicked() {
                    jump = Some(id.to_string());
                }
            }
            if let Some(id) = jump {
                surface.selected = Some(id.clone());
                surface.center_on_node(&id);
            }
        }

        ui.separator();
        ui.label("View");
        ui.horizontal(|ui| {
            if ui.button("Fit").clicked() {
                surface.pending_fit = true;
            }
            if ui.button("Reset").clicked() && surface.viewport.reset() {
                surface.persist_viewport(store);
            }
        });
        if ui
            .checkbox(&mut surface.focus_lines, "Highlight connections on hover")
            .changed()
        {
            surface.persist_focus_lines(store);
        }
        ui.checkbox(&mut poller.enabled, "Poll live status");

        ui.separator();
        ui.label("Filters");
        let tab_title = surface
            .filter
            .tab
            .as_deref()
            .and_then(|id| graph.tab(id))
            .map_or("All", |tab| tab.title.as_str());
        egui::ComboBox::from_id_salt("tab_filter")
            .selected_text(tab_title.to_string())
            .show_ui(ui, |ui| {
                let mut changed = ui
                    .selectable_value(&mut surface.filter.tab, None, "All")
                    .changed();
                for tab in &graph.tabs {
                    changed |= ui
                        .selectable_value(
                            &mut surface.filter.tab,
                            Some(tab.id.clone()),
                            &tab.title,
                        )
                        .changed();
                }
                if changed {
                    surface.persist_filter(store);
                    surface.scheduler.schedule();
                }
            });

        let preset_title = surface
            .filter
            .preset
            .as_deref()
            .and_then(|id| graph.preset(id))
            .map_or("None", |preset| preset.title.as_str());
        egui::ComboBox::from_id_salt("preset_filter")
            .selected_text(preset_title.to_string())
            .show_ui(ui, |ui| {
                let mut changed = ui
                    .selectable_value(&mut surface.filter.preset, None, "None")
                    .changed();
                for preset in &graph.presets {
                    changed |= ui
                        .selectable_value(
                            &mut surface.filter.preset,
                            Some(preset.id.clone()),
                            &preset.title,
                        )
                        .changed();
                }
                if changed {
                    surface.persist_filter(store);
                    surface.scheduler.schedule();
                }
            });

        ui.separator();
        ui.label("Groups");
        ui.horizontal(|ui| {
            if ui.button("Collapse all").clicked() {
                surface.collapsed.collapse_all(graph);
                surface.persist_collapsed(store);
                surface.scheduler.schedule();
            }
            if ui.button("Expand all").clicked() {
                surface.collapsed.expand_all();
                surface.persist_collapsed(store);
                surface.scheduler.schedule();
            }
        });
        if ui.button("Flow focus").clicked() {
            surface.collapsed.expand_flow_only(graph);
            surface.persist_collapsed(store);
            surface.scheduler.schedule();
        }

        if !graph.story.is_empty() {
            ui.separator();
            ui.label("Walkthrough");
            let mut toggled = None;
            for step in &graph.story {
                let is_active = surface.story.active_id() == Some(step.id.as_str());
                let text = format!("{}. {}", step.label, step.title);
                if ui.selectable_label(is_active, text).clicked() {
                    toggled = Some(step.id.clone());
                }
            }
            if let Some(step_id) = toggled
                && let Some(target) = surface.story.toggle(graph, &step_id)
            {
                surface.center_on_node(&target);
            }
            if let Some(step) = surface.story.active_step(graph) {
                ui.add_space(4.0);
                ui.label(RichText::new(&step.narration).italics().weak());
            }
        }

        ui.separator();
        ui.label("Status");
        if !surface.overlay.overrides.is_empty() {
            ui.label(format!(
                "{} manual override(s)",
                surface.overlay.overrides.len()
            ));
        }
        if ui.button("Reset overrides").clicked() {
            surface.overlay.reset_overrides();
            surface.persist_overrides(store);
        }
    }
}
