use eframe::egui::{Pos2, Rect, pos2};

/// Curve shaping tunables. The defaults were arrived at visually; they are
/// configuration, not invariants.
#[derive(Clone, Copy, Debug)]
pub struct RouterConfig {
    pub curvature_scale: f32,
    pub curvature_min: f32,
    pub curvature_max: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            curvature_scale: 0.35,
            curvature_min: 60.0,
            curvature_max: 180.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A routed cubic curve between two node boxes, in content space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutedPath {
    pub start: Pos2,
    pub control_a: Pos2,
    pub control_b: Pos2,
    pub end: Pos2,
    pub orientation: Orientation,
}

impl RoutedPath {
    pub fn points(&self) -> [Pos2; 4] {
        [self.start, self.control_a, self.control_b, self.end]
    }

    pub fn midpoint(&self) -> Pos2 {
        // Cubic Bezier at t = 0.5.
        let [p0, p1, p2, p3] = self.points();
        pos2(
            (p0.x + 3.0 * p1.x + 3.0 * p2.x + p3.x) / 8.0,
            (p0.y + 3.0 * p1.y + 3.0 * p2.y + p3.y) / 8.0,
        )
    }
}

/// Compute anchors and control points for a connector between two boxes.
///
/// Orientation follows the dominant axis of the center-to-center delta; a tie
/// picks horizontal so that left-to-right chains stay straight. Anchors sit
/// on the near edges at the edge midline, and control points are offset from
/// the anchors along the dominant axis only, which yields a flat S-curve.
/// Returns `None` for unmeasured boxes (zero size or non-finite) so callers
/// never divide by zero or emit NaN geometry.
pub fn route(from: Rect, to: Rect, config: RouterConfig) -> Option<RoutedPath> {
    if !measured(from) || !measured(to) {
        return None;
    }

    let delta = to.center() - from.center();
    if delta.x.abs() >= delta.y.abs() {
        let sign = if delta.x >= 0.0 { 1.0 } else { -1.0 };
        let (start_x, end_x) = if delta.x >= 0.0 {
            (from.right(), to.left())
        } else {
            (from.left(), to.right())
        };
        let start = pos2(start_x, from.center().y);
        let end = pos2(end_x, to.center().y);
        let bend = curvature(delta.x.abs(), config) * sign;

        Some(RoutedPath {
            start,
            control_a: pos2(start.x + bend, start.y),
            control_b: pos2(end.x - bend, end.y),
            end,
            orientation: Orientation::Horizontal,
        })
    } else {
        let sign = if delta.y >= 0.0 { 1.0 } else { -1.0 };
        let (start_y, end_y) = if delta.y >= 0.0 {
            (from.bottom(), to.top())
        } else {
            (from.top(), to.bottom())
        };
        let start = pos2(from.center().x, start_y);
        let end = pos2(to.center().x, end_y);
        let bend = curvature(delta.y.abs(), config) * sign;

        Some(RoutedPath {
            start,
            control_a: pos2(start.x, start.y + bend),
            control_b: pos2(end.x, end.y - bend),
            end,
            orientation: Orientation::Vertical,
        })
    }
}

fn curvature(distance: f32, config: RouterConfig) -> f32 {
    (distance * config.curvature_scale).clamp(config.curvature_min, config.curvature_max)
}

fn measured(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}
