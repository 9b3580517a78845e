//! Curved prerequisite connectors and their stroke emphasis.

use std::fmt::Write as _;

use engine::graphics::Color;

use crate::model::{NodeStatus, Vec2f};

/// Cubic Bézier from a prerequisite to its dependent, in layout space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicPath {
    pub from: Vec2f,
    pub c1: Vec2f,
    pub c2: Vec2f,
    pub to: Vec2f,
}

/// Vertical S-curve: both control points sit on the horizontal midline between the endpoints,
/// so the curve leaves and enters each node vertically.
pub fn build_path(from: Vec2f, to: Vec2f) -> CubicPath {
    let mid_y = (from.y + to.y) / 2.0;
    CubicPath {
        from,
        c1: Vec2f::new(from.x, mid_y),
        c2: Vec2f::new(to.x, mid_y),
        to,
    }
}

impl CubicPath {
    /// `M x1,y1 C x1,midY x2,midY x2,y2`
    pub fn to_svg_d(&self) -> String {
        let mut d = String::with_capacity(64);
        let _ = write!(
            d,
            "M {},{} C {},{} {},{} {},{}",
            self.from.x, self.from.y, self.c1.x, self.c1.y, self.c2.x, self.c2.y, self.to.x,
            self.to.y
        );
        d
    }

    pub fn point_at(&self, t: f32) -> Vec2f {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let w0 = u * u * u;
        let w1 = 3.0 * u * u * t;
        let w2 = 3.0 * u * t * t;
        let w3 = t * t * t;
        Vec2f::new(
            w0 * self.from.x + w1 * self.c1.x + w2 * self.c2.x + w3 * self.to.x,
            w0 * self.from.y + w1 * self.c1.y + w2 * self.c2.y + w3 * self.to.y,
        )
    }

    /// Samples `segments + 1` evenly spaced points (by parameter) along the curve.
    pub fn flatten(&self, segments: usize) -> Vec<Vec2f> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }
}

/// Visual emphasis of a connector, derived from the statuses of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeTier {
    Strong,
    Active,
    Dormant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorStyle {
    pub color: Color,
    pub width: f32,
    /// 0.0..=1.0
    pub opacity: f32,
}

pub fn classify(from: NodeStatus, to: NodeStatus) -> StrokeTier {
    use NodeStatus::*;
    match (from, to) {
        (Completed, Completed) => StrokeTier::Strong,
        (Completed, InProgress | Available) => StrokeTier::Active,
        _ => StrokeTier::Dormant,
    }
}

impl StrokeTier {
    pub fn style(self) -> ConnectorStyle {
        match self {
            StrokeTier::Strong => ConnectorStyle {
                color: [16, 185, 129, 255],
                width: 3.0,
                opacity: 1.0,
            },
            StrokeTier::Active => ConnectorStyle {
                color: [56, 189, 248, 255],
                width: 2.5,
                opacity: 0.6,
            },
            StrokeTier::Dormant => ConnectorStyle {
                color: [100, 116, 139, 255],
                width: 1.5,
                opacity: 0.25,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_data_uses_midline_control_points() {
        let path = build_path(Vec2f::new(300.0, 100.0), Vec2f::new(230.0, 260.0));
        assert_eq!(path.to_svg_d(), "M 300,100 C 300,180 230,180 230,260");
    }

    #[test]
    fn point_at_hits_endpoints_and_midpoint() {
        let path = build_path(Vec2f::new(0.0, 0.0), Vec2f::new(100.0, 200.0));
        assert_eq!(path.point_at(0.0), path.from);
        assert_eq!(path.point_at(1.0), path.to);
        // Symmetric S-curve passes through the center of the bounding box.
        assert_eq!(path.point_at(0.5), Vec2f::new(50.0, 100.0));
    }

    #[test]
    fn flatten_includes_both_endpoints() {
        let path = build_path(Vec2f::new(10.0, 10.0), Vec2f::new(50.0, 90.0));
        let points = path.flatten(8);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], path.from);
        assert_eq!(points[8], path.to);
        assert_eq!(path.flatten(0).len(), 2);
    }

    #[test]
    fn classify_evaluates_rules_in_order() {
        use NodeStatus::*;
        assert_eq!(classify(Completed, Completed), StrokeTier::Strong);
        assert_eq!(classify(Completed, InProgress), StrokeTier::Active);
        assert_eq!(classify(Completed, Available), StrokeTier::Active);
        assert_eq!(classify(Completed, Locked), StrokeTier::Dormant);
        assert_eq!(classify(InProgress, Completed), StrokeTier::Dormant);
        assert_eq!(classify(Locked, Locked), StrokeTier::Dormant);
    }

    #[test]
    fn emphasis_decreases_from_strong_to_dormant() {
        let strong = StrokeTier::Strong.style();
        let active = StrokeTier::Active.style();
        let dormant = StrokeTier::Dormant.style();
        assert!(strong.opacity > active.opacity && active.opacity > dormant.opacity);
        assert!(strong.width > dormant.width);
        assert_eq!(strong.opacity, 1.0);
    }
}
