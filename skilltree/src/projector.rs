//! Layout space <-> screen space, for overlays positioned outside the transformed group.

use serde::{Deserialize, Serialize};

use crate::model::Vec2f;
use crate::viewport::ViewportTransform;

/// The container's on-screen bounding box, as measured by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// A rect projection can be based on: finite origin, positive finite area.
    pub fn is_measurable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn size(&self) -> Vec2f {
        Vec2f::new(self.width, self.height)
    }

    pub fn contains(&self, p: Vec2f) -> bool {
        p.x >= self.left
            && p.y >= self.top
            && p.x < self.left + self.width
            && p.y < self.top + self.height
    }

    /// Screen point relative to the container's top-left corner.
    pub fn to_local(&self, p: Vec2f) -> Vec2f {
        Vec2f::new(p.x - self.left, p.y - self.top)
    }
}

/// Screen position of a layout point, or `None` while the container has no usable rect.
pub fn project(point: Vec2f, transform: &ViewportTransform, rect: Option<&ScreenRect>) -> Option<Vec2f> {
    let rect = rect.filter(|r| r.is_measurable())?;
    let local = transform.layout_to_local(point);
    Some(Vec2f::new(rect.left + local.x, rect.top + local.y))
}

/// Inverse of [`project`].
pub fn unproject(
    screen: Vec2f,
    transform: &ViewportTransform,
    rect: Option<&ScreenRect>,
) -> Option<Vec2f> {
    let rect = rect.filter(|r| r.is_measurable())?;
    if !screen.is_finite() || !(transform.scale().is_finite() && transform.scale() > 0.0) {
        return None;
    }
    Some(transform.local_to_layout(rect.to_local(screen)))
}
