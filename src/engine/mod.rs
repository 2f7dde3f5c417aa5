mod filter;
mod focus;
mod hit;
mod layout;
mod router;
mod scheduler;
mod status;
mod story;
mod viewport;

pub use filter::{CollapseSet, FilterState, effective_groups};
pub use focus::{FocusMarks, edge_touches, focus_marks};
pub use hit::{HitRegistry, HitTarget};
pub use layout::{GroupFrame, LayoutConfig, SurfaceLayout, layout_surface};
pub use router::{RoutedPath, RouterConfig, route};
pub use scheduler::RedrawScheduler;
pub use status::{OverrideMap, StatusOverlay, StatusOverride};
pub use story::StoryState;
pub use viewport::{Viewport, ViewportConfig, ViewportState};
