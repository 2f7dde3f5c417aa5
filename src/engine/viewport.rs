use eframe::egui::{Pos2, Rect, Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Persisted pan/zoom transform of one diagram surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f32,
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Breathing room applied to the fitted scale.
    pub fit_margin: f32,
    /// Fit never zooms in past this, even when content is tiny.
    pub fit_max_scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 2.5,
            fit_margin: 0.92,
            fit_max_scale: 1.8,
        }
    }
}

/// Pan/zoom transform manager. `screen = surface.min + origin + world * scale`.
///
/// Every mutating operation reports whether anything changed; the caller
/// persists the state exactly when it did, so the in-memory and stored
/// transforms cannot drift apart.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub state: ViewportState,
    pub config: ViewportConfig,
}

impl Viewport {
    pub fn new(state: ViewportState, config: ViewportConfig) -> Self {
        let mut viewport = Self { state, config };
        viewport.state.scale = viewport.clamp_scale(viewport.state.scale);
        viewport
    }

    pub fn origin(&self) -> Vec2 {
        vec2(self.state.origin_x, self.state.origin_y)
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn to_screen(&self, surface: Rect, world: Pos2) -> Pos2 {
        surface.min + self.origin() + world.to_vec2() * self.state.scale
    }

    pub fn to_world(&self, surface: Rect, screen: Pos2) -> Pos2 {
        (((screen - surface.min) - self.origin()) / self.state.scale).to_pos2()
    }

    pub fn rect_to_screen(&self, surface: Rect, world: Rect) -> Rect {
        Rect::from_min_max(
            self.to_screen(surface, world.min),
            self.to_screen(surface, world.max),
        )
    }

    /// Zoom so the content point under `pointer` stays under it.
    pub fn zoom_at(&mut self, factor: f32, pointer: Pos2, surface: Rect) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }

        let next_scale = self.clamp_scale(self.state.scale * factor);
        if (next_scale - self.state.scale).abs() <= f32::EPSILON {
            return false;
        }

        let world = self.to_world(surface, pointer);
        self.state.scale = next_scale;
        let origin = (pointer - surface.min) - world.to_vec2() * next_scale;
        self.state.origin_x = origin.x;
        self.state.origin_y = origin.y;
        true
    }

    pub fn pan(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.state.origin_x += delta.x;
        self.state.origin_y += delta.y;
        true
    }

    /// Scale and center so `content` fills the surface, within the fit cap.
    /// No-ops when either measurement is missing.
    pub fn fit_to_view(&mut self, surface_size: Vec2, content: Rect) -> bool {
        if !content.is_finite()
            || content.width() <= 0.0
            || content.height() <= 0.0
            || surface_size.x <= 0.0
            || surface_size.y <= 0.0
        {
            return false;
        }

        let fitted = (surface_size.x / content.width())
            .min(surface_size.y / content.height())
            * self.config.fit_margin;
        self.state.scale = fitted.clamp(self.config.min_scale, self.config.fit_max_scale);
        self.center_origin(surface_size, content.center());
        true
    }

    pub fn reset(&mut self) -> bool {
        let next = ViewportState::default();
        if self.state == next {
            return false;
        }
        self.state = next;
        true
    }

    /// Bring the element's center to the surface center at the current scale.
    pub fn center_on(&mut self, surface_size: Vec2, target: Rect) -> bool {
        if !target.is_finite() || surface_size.x <= 0.0 || surface_size.y <= 0.0 {
            return false;
        }
        self.center_origin(surface_size, target.center());
        true
    }

    fn center_origin(&mut self, surface_size: Vec2, world_center: Pos2) {
        let origin = surface_size * 0.5 - world_center.to_vec2() * self.state.scale;
        self.state.origin_x = origin.x;
        self.state.origin_y = origin.y;
    }

    fn clamp_scale(&self, scale: f32) -> f32 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }
}
