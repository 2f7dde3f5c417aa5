use std::collections::{HashMap, HashSet};

use eframe::egui::{Rect, pos2, vec2};

use crate::model::{AtlasGraph, GroupLayout, NodeId, SurfaceKind};

use super::hit::{HitRegistry, HitTarget};

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    /// How many group columns a surface flows into.
    pub surface_columns: usize,
    pub group_width: f32,
    pub node_height: f32,
    pub header_height: f32,
    pub padding: f32,
    pub gap: f32,
    pub column_gap: f32,
    pub row_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            surface_columns: 4,
            group_width: 260.0,
            node_height: 44.0,
            header_height: 30.0,
            padding: 12.0,
            gap: 10.0,
            column_gap: 48.0,
            row_gap: 48.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GroupFrame {
    pub id: String,
    pub title: String,
    pub frame: Rect,
    pub header: Rect,
    pub collapsed: bool,
}

/// Content-space geometry of one surface for the current visibility state.
/// Rebuilt on every redraw; collapsed and filtered-out nodes simply have no
/// entry in `node_bounds`, which is what makes the router skip their edges.
#[derive(Clone, Debug)]
pub struct SurfaceLayout {
    pub node_bounds: HashMap<NodeId, Rect>,
    pub groups: Vec<GroupFrame>,
    pub content_bounds: Rect,
    pub hits: HitRegistry,
}

impl SurfaceLayout {
    pub fn empty() -> Self {
        Self {
            node_bounds: HashMap::new(),
            groups: Vec::new(),
            content_bounds: Rect::NOTHING,
            hits: HitRegistry::default(),
        }
    }
}

pub fn layout_surface(
    graph: &AtlasGraph,
    surface: SurfaceKind,
    visible_groups: &HashSet<String>,
    collapsed: &HashSet<String>,
    config: &LayoutConfig,
) -> SurfaceLayout {
    let mut layout = SurfaceLayout::empty();
    let columns = config.surface_columns.max(1);
    let mut column_cursors = vec![0.0f32; columns];

    for group in &graph.groups {
        if !group.on_surface(surface) || !visible_groups.contains(&group.id) {
            continue;
        }

        let is_collapsed = collapsed.contains(&group.id);
        let inner_columns = match group.layout {
            GroupLayout::Stack => 1,
            GroupLayout::Columns(n) => n.max(1),
        };
        let rows = group.nodes.len().div_ceil(inner_columns);

        let body_height = if is_collapsed || rows == 0 {
            0.0
        } else {
            config.padding * 2.0
                + rows as f32 * config.node_height
                + rows.saturating_sub(1) as f32 * config.gap
        };
        let frame_height = config.header_height + body_height;

        // Shortest-column placement keeps surfaces roughly balanced.
        let (column, _) = column_cursors
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .unwrap_or((0, &0.0));
        let top = column_cursors[column];
        let left = column as f32 * (config.group_width + config.column_gap);
        column_cursors[column] = top + frame_height + config.row_gap;

        let frame = Rect::from_min_size(pos2(left, top), vec2(config.group_width, frame_height));
        let header = Rect::from_min_size(frame.min, vec2(config.group_width, config.header_height));
        layout
            .hits
            .push(header, HitTarget::GroupHeader(group.id.clone()));

        if !is_collapsed {
            let node_width = (config.group_width
                - config.padding * 2.0
                - (inner_columns.saturating_sub(1)) as f32 * config.gap)
                / inner_columns as f32;

            for (index, node) in group.nodes.iter().enumerate() {
                let row = index / inner_columns;
                let col = index % inner_columns;
                let bounds = Rect::from_min_size(
                    pos2(
                        left + config.padding + col as f32 * (node_width + config.gap),
                        top + config.header_height
                            + config.padding
                            + row as f32 * (config.node_height + config.gap),
                    ),
                    vec2(node_width, config.node_height),
                );
                layout.node_bounds.insert(node.id.clone(), bounds);
                layout.hits.push(bounds, HitTarget::Node(node.id.clone()));
            }
        }

        layout.groups.push(GroupFrame {
            id: group.id.clone(),
            title: group.title.clone(),
            frame,
            header,
            collapsed: is_collapsed,
        });

        layout.content_bounds = layout.content_bounds.union(frame);
    }

    layout
}
