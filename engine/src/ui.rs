//! Pixel-aligned rectangles for overlay chrome (toolbars, tooltips, empty states).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && px < self.x.saturating_add(self.w)
            && py >= self.y
            && py < self.y.saturating_add(self.h)
    }

    /// Float variant for pointer coordinates; negative or non-finite points are outside.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        if !(px.is_finite() && py.is_finite()) || px < 0.0 || py < 0.0 {
            return false;
        }
        self.contains(px as u32, py as u32)
    }

    /// The inner content area; saturates to zero size when insets exceed the rect.
    pub fn inset(&self, insets: Insets) -> Self {
        let w = self
            .w
            .saturating_sub(insets.left.saturating_add(insets.right));
        let h = self
            .h
            .saturating_sub(insets.top.saturating_add(insets.bottom));
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w,
            h,
        }
    }

    /// Places a child of `size` inside this rect at `anchor`, shrinking it to fit.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);
        let free_w = self.w - w;
        let free_h = self.h - h;

        let x = self.x
            + match anchor {
                Anchor::TopLeft | Anchor::BottomLeft => 0,
                Anchor::TopCenter | Anchor::Center | Anchor::BottomCenter => free_w / 2,
                Anchor::TopRight | Anchor::BottomRight => free_w,
            };
        let y = self.y
            + match anchor {
                Anchor::TopLeft | Anchor::TopCenter | Anchor::TopRight => 0,
                Anchor::Center => free_h / 2,
                Anchor::BottomLeft | Anchor::BottomCenter | Anchor::BottomRight => free_h,
            };

        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    Center,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_shrinks_rect_and_moves_origin() {
        let r = Rect::from_size(100, 80);
        assert_eq!(r.inset(Insets::all(10)), Rect::new(10, 10, 80, 60));
        assert!(r.inset(Insets::all(60)).is_empty());
    }

    #[test]
    fn place_bottom_right_hugs_corner() {
        let parent = Rect::new(10, 10, 100, 100);
        let child = parent.place(Size::new(20, 10), Anchor::BottomRight);
        assert_eq!(child, Rect::new(90, 100, 20, 10));
    }

    #[test]
    fn place_clamps_size_to_parent() {
        let parent = Rect::from_size(50, 40);
        let child = parent.place(Size::new(999, 999), Anchor::Center);
        assert_eq!(child, Rect::new(0, 0, 50, 40));
    }

    #[test]
    fn contains_point_rejects_negative_and_nan() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(9.9, 0.0));
        assert!(!r.contains_point(-0.5, 1.0));
        assert!(!r.contains_point(f32::NAN, 1.0));
        assert!(!r.contains_point(10.0, 1.0));
    }
}
