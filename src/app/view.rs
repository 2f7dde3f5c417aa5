use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Rect, Sense, Stroke, StrokeKind, Ui,
    epaint::CubicBezierShape,
};

use crate::engine::{FocusMarks, HitTarget, edge_touches, focus_marks};

use super::AtlasModel;
use super::render_utils::{blend_color, dim_color, draw_background, ellipsize, status_fill};
use super::surface::SurfaceState;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Normal,
    Active,
    Peer,
    Dimmed,
}

impl AtlasModel {
    pub(in crate::app) fn draw_surface(&mut self, ui: &mut Ui) {
        let Self {
            graph,
            adjacency,
            store,
            surfaces,
            active,
            layout_config,
            router_config,
            ..
        } = self;
        let surface = &mut surfaces[*active];

        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let painter = ui.painter_at(rect);

        if surface.scheduler.take() || surface.layout.is_none() {
            surface.rebuild(graph, layout_config, router_config);
        }

        if surface.pending_fit {
            surface.pending_fit = false;
            if let Some(layout) = &surface.layout
                && surface
                    .viewport
                    .fit_to_view(rect.size(), layout.content_bounds)
            {
                surface.persist_viewport(store);
            }
        }
        if let Some(node) = surface.pending_center.take()
            && let Some(layout) = &surface.layout
            && let Some(bounds) = layout.node_bounds.get(&node)
            && surface.viewport.center_on(rect.size(), *bounds)
        {
            surface.persist_viewport(store);
        }

        handle_zoom(ui, surface, store, rect, &response);
        handle_pan_and_hover(ui, surface, store, rect, &response);

        let changed = surface
            .overlay
            .apply(graph.nodes().map(|node| (&node.id, node.auto_status)));
        if !changed.is_empty() {
            ui.ctx().request_repaint();
        }

        let marks = if surface.focus_lines {
            focus_marks(adjacency, surface.hovered.as_ref())
        } else {
            FocusMarks::default()
        };
        let story_active = surface.story.active_id().is_some();

        draw_background(&painter, rect, surface.viewport.origin(), surface.viewport.scale());

        let Some(layout) = &surface.layout else {
            return;
        };
        let scale = surface.viewport.scale();

        for frame in &layout.groups {
            let screen = surface.viewport.rect_to_screen(rect, frame.frame);
            painter.rect_filled(screen, 4.0, Color32::from_rgb(27, 32, 40));
            painter.rect_stroke(
                screen,
                4.0,
                Stroke::new(1.0, Color32::from_rgb(56, 64, 76)),
                StrokeKind::Inside,
            );

            let header = surface.viewport.rect_to_screen(rect, frame.header);
            let marker = if frame.collapsed { "\u{25b8}" } else { "\u{25be}" };
            let header_color = if surface.hovered_header.as_deref() == Some(frame.id.as_str()) {
                Color32::from_rgb(224, 232, 240)
            } else {
                Color32::from_rgb(174, 184, 196)
            };
            painter.text(
                header.left_center() + egui::vec2(8.0 * scale, 0.0),
                Align2::LEFT_CENTER,
                format!("{marker} {}", frame.title),
                FontId::proportional((13.0 * scale).clamp(9.0, 22.0)),
                header_color,
            );
        }

        for edge in &surface.routed {
            let emphasis = if story_active {
                if surface.story.edge_in_step(graph, &edge.from, &edge.to) {
                    Emphasis::Active
                } else {
                    Emphasis::Dimmed
                }
            } else if !marks.is_empty() {
                if edge_touches(&marks, &edge.from, &edge.to) {
                    Emphasis::Active
                } else {
                    Emphasis::Dimmed
                }
            } else {
                Emphasis::Normal
            };

            let base = if edge.kind == "control" {
                Color32::from_rgb(148, 118, 72)
            } else {
                Color32::from_rgb(104, 116, 130)
            };
            let (color, width) = match emphasis {
                Emphasis::Active => (blend_color(base, Color32::WHITE, 0.45), 2.4),
                Emphasis::Normal => (base, 1.6),
                _ => (dim_color(base, 0.3), 1.2),
            };

            let points = edge
                .path
                .points()
                .map(|point| surface.viewport.to_screen(rect, point));
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new(width * scale.clamp(0.5, 1.6), color),
            ));

            if scale > 0.7
                && emphasis != Emphasis::Dimmed
                && let Some(label) = &edge.label
            {
                let midpoint = surface.viewport.to_screen(rect, edge.path.midpoint());
                painter.text(
                    midpoint,
                    Align2::CENTER_CENTER,
                    ellipsize(label, 24),
                    FontId::proportional((10.0 * scale).clamp(8.0, 15.0)),
                    blend_color(color, Color32::WHITE, 0.3),
                );
            }
        }

        for node in graph.nodes() {
            let Some(bounds) = layout.node_bounds.get(&node.id) else {
                continue;
            };
            let screen = surface.viewport.rect_to_screen(rect, *bounds);
            if !rect.intersects(screen) {
                continue;
            }

            let emphasis = if story_active {
                if surface.story.emphasizes(graph, &node.id) {
                    Emphasis::Active
                } else {
                    Emphasis::Dimmed
                }
            } else if !marks.is_empty() {
                if marks.active.as_deref() == Some(node.id.as_str()) {
                    Emphasis::Active
                } else if marks.peers.contains(&node.id) {
                    Emphasis::Peer
                } else {
                    Emphasis::Dimmed
                }
            } else {
                Emphasis::Normal
            };

            let status = surface
                .overlay
                .applied_for(&node.id)
                .unwrap_or(node.auto_status);
            let fill = status_fill(status);
            let fill = match emphasis {
                Emphasis::Dimmed => dim_color(fill, 0.35),
                _ => fill,
            };
            painter.rect_filled(screen, 4.0, fill);

            let selected = surface.selected.as_deref() == Some(node.id.as_str());
            let stroke = match emphasis {
                Emphasis::Active => Stroke::new(2.0, Color32::WHITE),
                Emphasis::Peer => Stroke::new(1.6, Color32::from_rgb(214, 222, 230)),
                _ if selected => Stroke::new(2.0, Color32::from_rgb(240, 200, 90)),
                Emphasis::Normal => Stroke::new(1.0, Color32::from_rgb(70, 78, 90)),
                Emphasis::Dimmed => Stroke::new(1.0, Color32::from_rgb(44, 50, 60)),
            };
            painter.rect_stroke(screen, 4.0, stroke, StrokeKind::Inside);

            let text_color = match emphasis {
                Emphasis::Dimmed => Color32::from_rgb(130, 138, 148),
                _ => Color32::from_rgb(235, 240, 245),
            };
            painter.text(
                screen.center(),
                Align2::CENTER_CENTER,
                ellipsize(&node.label, 26),
                FontId::proportional((12.0 * scale).clamp(8.0, 20.0)),
                text_color,
            );
            if scale > 0.8
                && let Some(tag) = &node.tag
            {
                painter.text(
                    screen.center_bottom() - egui::vec2(0.0, 4.0 * scale),
                    Align2::CENTER_BOTTOM,
                    ellipsize(tag, 30),
                    FontId::proportional((9.0 * scale).clamp(7.0, 14.0)),
                    blend_color(text_color, Color32::BLACK, 0.25),
                );
            }
        }

        handle_clicks(surface, store, rect, &response);
    }
}

fn handle_zoom(
    ui: &Ui,
    surface: &mut SurfaceState,
    store: &mut crate::store::StateStore,
    rect: Rect,
    response: &egui::Response,
) {
    if !response.hovered() {
        return;
    }
    let scroll = ui.input(|input| input.raw_scroll_delta.y);
    if scroll.abs() <= f32::EPSILON {
        return;
    }

    let pointer = ui
        .input(|input| input.pointer.hover_pos())
        .unwrap_or_else(|| rect.center());
    let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
    if surface.viewport.zoom_at(factor, pointer, rect) {
        surface.persist_viewport(store);
    }
}

fn handle_pan_and_hover(
    ui: &Ui,
    surface: &mut SurfaceState,
    store: &mut crate::store::StateStore,
    rect: Rect,
    response: &egui::Response,
) {
    // Primary pans only when the press landed on empty canvas; nodes and
    // headers keep the click for selection. Secondary and middle always pan.
    if response.drag_started_by(egui::PointerButton::Primary)
        && let Some(press) = response.interact_pointer_pos()
    {
        let world = surface.viewport.to_world(rect, press);
        let on_widget = surface
            .layout
            .as_ref()
            .is_some_and(|layout| layout.hits.is_interactive(world));
        surface.dragging_canvas = !on_widget;
    }
    if response.drag_stopped() {
        surface.dragging_canvas = false;
    }

    let panning = response.dragged_by(egui::PointerButton::Secondary)
        || response.dragged_by(egui::PointerButton::Middle)
        || (response.dragged_by(egui::PointerButton::Primary) && surface.dragging_canvas);
    if panning && surface.viewport.pan(response.drag_delta()) {
        surface.persist_viewport(store);
    }

    surface.hovered = None;
    surface.hovered_header = None;
    if response.hovered()
        && !panning
        && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        && let Some(layout) = &surface.layout
    {
        let world = surface.viewport.to_world(rect, pointer);
        match layout.hits.hit_test(world) {
            Some(HitTarget::Node(id)) => {
                surface.hovered = Some(id.clone());
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
            Some(HitTarget::GroupHeader(id)) => {
                surface.hovered_header = Some(id.clone());
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
            None => {}
        }
    }
}

fn handle_clicks(
    surface: &mut SurfaceState,
    store: &mut crate::store::StateStore,
    rect: Rect,
    response: &egui::Response,
) {
    if !response.clicked() {
        return;
    }
    let Some(pointer) = response.interact_pointer_pos() else {
        return;
    };
    let Some(layout) = &surface.layout else {
        return;
    };

    let world = surface.viewport.to_world(rect, pointer);
    match layout.hits.hit_test(world) {
        Some(HitTarget::Node(id)) => {
            surface.selected = Some(id.clone());
        }
        Some(HitTarget::GroupHeader(id)) => {
            let id = id.clone();
            surface.collapsed.toggle(&id);
            surface.persist_collapsed(store);
            surface.scheduler.schedule();
        }
        None => {
            surface.selected = None;
        }
    }
}
