//! Tiered skill-tree layout with a pan/zoom viewport, rendered to windows, RGBA buffers or SVG.

pub mod animation;
pub mod connector;
pub mod layout;
pub mod logging;
pub mod model;
pub mod projector;
pub mod raster;
pub mod scene;
pub mod settings;
pub mod source;
pub mod svg;
pub mod theme;
pub mod view;
pub mod viewport;

pub use layout::{LayoutResult, layout};
pub use model::{
    NodeId, NodeStatus, NodeType, Placement, SkillConnection, SkillNode, SkillTreeSnapshot, Vec2f,
};
pub use projector::{ScreenRect, project, unproject};
pub use view::{PointerEvent, SkillTreeView, SurfaceOutcome, ViewOptions};
pub use viewport::{ViewportController, ViewportEvent, ViewportTransform, ZoomDirection};
