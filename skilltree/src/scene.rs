//! Backend-neutral display list for one frame of a tree.
//!
//! `world` primitives are in layout space and drawn through `transform`; `overlay` items are
//! container-local pixels and never scale.

use std::time::Duration;

use engine::graphics::Color;
use engine::ui::Rect;

use crate::animation::Reveal;
use crate::connector::{ConnectorStyle, CubicPath};
use crate::model::{NodeId, NodeStatus, Vec2f};
use crate::theme::Theme;
use crate::view::{Edge, Tooltip, ZoomControl};
use crate::viewport::ViewportTransform;

pub const EMPTY_MESSAGE: &str = "No skills yet";
pub const GRID_SPACING: f32 = 40.0;
pub const LABEL_SIZE: f32 = 12.0;
const LABEL_GAP: f32 = 8.0;
const RING_GAP: f32 = 5.0;
const RING_WIDTH: f32 = 4.0;
const GLOW_SPREAD: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Backdrop {
        size: Vec2f,
        color: Color,
    },
    GridLine {
        from: Vec2f,
        to: Vec2f,
        color: Color,
    },
    Connector {
        path: CubicPath,
        style: ConnectorStyle,
        /// Multiplies `style.opacity` while revealing.
        reveal: f32,
    },
    Glow {
        center: Vec2f,
        radius: f32,
        color: Color,
        opacity: f32,
    },
    Node {
        id: NodeId,
        center: Vec2f,
        radius: f32,
        fill: Color,
        outline: Color,
        hovered: bool,
        opacity: f32,
    },
    ProgressRing {
        center: Vec2f,
        radius: f32,
        width: f32,
        /// 0.0..=1.0, clockwise from 12 o'clock.
        fraction: f32,
        track: Color,
        fill: Color,
        opacity: f32,
    },
    /// Text centered horizontally on `anchor.x`, top edge at `anchor.y`.
    Label {
        anchor: Vec2f,
        text: String,
        size: f32,
        color: Color,
        opacity: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Panel {
        rect: Rect,
        fill: Color,
        border: Color,
    },
    Text {
        x: u32,
        y: u32,
        text: String,
        color: Color,
        scale: u32,
    },
    Button {
        control: ZoomControl,
        rect: Rect,
        label: &'static str,
        fill: Color,
        border: Color,
        text: Color,
        pressed: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Container size in pixels.
    pub size: Vec2f,
    pub background: Color,
    pub transform: ViewportTransform,
    pub world: Vec<Primitive>,
    pub overlay: Vec<Overlay>,
    /// Set instead of a canvas when there is nothing to show.
    pub empty_message: Option<&'static str>,
}

impl Scene {
    pub fn is_empty_state(&self) -> bool {
        self.empty_message.is_some()
    }

    pub fn node_count(&self) -> usize {
        self.world
            .iter()
            .filter(|p| matches!(p, Primitive::Node { .. }))
            .count()
    }

    pub fn connector_count(&self) -> usize {
        self.world
            .iter()
            .filter(|p| matches!(p, Primitive::Connector { .. }))
            .count()
    }
}

/// One node as the scene needs it; positions are already resolved.
#[derive(Debug, Clone, Copy)]
pub struct PlacedNode<'a> {
    pub id: &'a NodeId,
    pub label: &'a str,
    pub tier: u32,
    pub center: Vec2f,
    pub radius: f32,
    pub status: NodeStatus,
    pub progress_pct: u8,
}

pub struct SceneInput<'a> {
    pub size: Vec2f,
    pub canvas: Vec2f,
    pub transform: ViewportTransform,
    pub nodes: &'a [PlacedNode<'a>],
    pub edges: &'a [Edge],
    pub hovered: Option<&'a NodeId>,
    pub tooltip: Option<&'a Tooltip>,
    pub controls: &'a [(ZoomControl, Rect)],
    pub pressed: Option<ZoomControl>,
    pub theme: &'a Theme,
    pub reveal: Reveal,
    pub elapsed: Duration,
}

pub fn build_scene(input: &SceneInput<'_>) -> Scene {
    let theme = input.theme;
    let mut scene = Scene {
        size: input.size,
        background: theme.background,
        transform: input.transform,
        world: Vec::new(),
        overlay: Vec::new(),
        empty_message: None,
    };

    if input.nodes.is_empty() {
        scene.empty_message = Some(EMPTY_MESSAGE);
        push_empty_message(&mut scene, theme);
        return scene;
    }

    scene.world.push(Primitive::Backdrop {
        size: input.canvas,
        color: theme.grid,
    });
    push_grid(&mut scene.world, input.canvas, theme.background);

    let reveal_of = |tier: u32| input.reveal.progress(tier, input.elapsed);

    for edge in input.edges {
        scene.world.push(Primitive::Connector {
            path: edge.path,
            style: edge.tier.style(),
            reveal: reveal_of(edge.from_tier).min(reveal_of(edge.to_tier)),
        });
    }

    for node in input.nodes {
        let opacity = reveal_of(node.tier);
        if opacity <= 0.0 {
            continue;
        }
        // Grow from 60% while fading in.
        let radius = node.radius * (0.6 + 0.4 * opacity);
        let hovered = input.hovered == Some(node.id);

        if node.status == NodeStatus::Completed || hovered {
            scene.world.push(Primitive::Glow {
                center: node.center,
                radius: radius + GLOW_SPREAD,
                color: if hovered { theme.label } else { theme.glow },
                opacity: 0.25 * opacity,
            });
        }
        scene.world.push(Primitive::Node {
            id: node.id.clone(),
            center: node.center,
            radius,
            fill: theme.node_fill(node.status),
            outline: theme.node_outline(node.status),
            hovered,
            opacity,
        });
        if node.status == NodeStatus::InProgress {
            scene.world.push(Primitive::ProgressRing {
                center: node.center,
                radius: radius + RING_GAP,
                width: RING_WIDTH,
                fraction: f32::from(node.progress_pct.min(100)) / 100.0,
                track: theme.ring_track,
                fill: theme.ring_fill,
                opacity,
            });
        }
        scene.world.push(Primitive::Label {
            anchor: Vec2f::new(node.center.x, node.center.y + node.radius + LABEL_GAP),
            text: node.label.to_string(),
            size: LABEL_SIZE,
            color: if node.status == NodeStatus::Locked {
                theme.label_muted
            } else {
                theme.label
            },
            opacity,
        });
    }

    if let Some(tooltip) = input.tooltip {
        push_tooltip(&mut scene.overlay, tooltip, theme);
    }
    for &(control, rect) in input.controls {
        scene.overlay.push(Overlay::Button {
            control,
            rect,
            label: control.label(),
            fill: theme.button,
            border: theme.button_border,
            text: theme.button_text,
            pressed: input.pressed == Some(control),
        });
    }
    scene
}

fn push_grid(world: &mut Vec<Primitive>, canvas: Vec2f, color: Color) {
    let mut x = GRID_SPACING;
    while x < canvas.x {
        world.push(Primitive::GridLine {
            from: Vec2f::new(x, 0.0),
            to: Vec2f::new(x, canvas.y),
            color,
        });
        x += GRID_SPACING;
    }
    let mut y = GRID_SPACING;
    while y < canvas.y {
        world.push(Primitive::GridLine {
            from: Vec2f::new(0.0, y),
            to: Vec2f::new(canvas.x, y),
            color,
        });
        y += GRID_SPACING;
    }
}

fn push_tooltip(overlay: &mut Vec<Overlay>, tooltip: &Tooltip, theme: &Theme) {
    overlay.push(Overlay::Panel {
        rect: tooltip.rect,
        fill: theme.panel,
        border: theme.panel_border,
    });
    let line_h = engine::graphics::line_advance_y(tooltip.text_scale);
    for (i, line) in tooltip.lines.iter().enumerate() {
        overlay.push(Overlay::Text {
            x: tooltip.rect.x + Tooltip::PADDING,
            y: tooltip.rect.y + Tooltip::PADDING + i as u32 * line_h,
            text: line.clone(),
            color: if i == 0 { theme.panel_text } else { theme.label_muted },
            scale: tooltip.text_scale,
        });
    }
}

fn push_empty_message(scene: &mut Scene, theme: &Theme) {
    let scale = engine::graphics::DEFAULT_TEXT_SCALE;
    let w = engine::graphics::text_width(EMPTY_MESSAGE, scale) as f32;
    let h = engine::graphics::line_advance_y(scale) as f32;
    let x = ((scene.size.x - w) / 2.0).max(0.0);
    let y = ((scene.size.y - h) / 2.0).max(0.0);
    scene.overlay.push(Overlay::Text {
        x: x as u32,
        y: y as u32,
        text: EMPTY_MESSAGE.to_string(),
        color: theme.label_muted,
        scale,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::{StrokeTier, build_path};

    fn placed<'a>(id: &'a NodeId, tier: u32, status: NodeStatus, center: Vec2f) -> PlacedNode<'a> {
        PlacedNode {
            id,
            label: id.as_str(),
            tier,
            center,
            radius: 24.0,
            status,
            progress_pct: 50,
        }
    }

    fn input<'a>(nodes: &'a [PlacedNode<'a>], edges: &'a [Edge], reveal: Reveal) -> SceneInput<'a> {
        SceneInput {
            size: Vec2f::new(400.0, 300.0),
            canvas: Vec2f::new(200.0, 120.0),
            transform: ViewportTransform::IDENTITY,
            nodes,
            edges,
            hovered: None,
            tooltip: None,
            controls: &[],
            pressed: None,
            theme: &Theme::STANDARD,
            reveal,
            elapsed: Duration::from_millis(100),
        }
    }

    #[test]
    fn empty_input_only_carries_message() {
        let scene = build_scene(&input(&[], &[], Reveal::new(true)));
        assert_eq!(scene.empty_message, Some(EMPTY_MESSAGE));
        assert!(scene.world.is_empty());
        assert_eq!(scene.overlay.len(), 1);
    }

    #[test]
    fn status_decorations() {
        let (a, b) = (NodeId::from("a"), NodeId::from("b"));
        let nodes = [
            placed(&a, 0, NodeStatus::Completed, Vec2f::new(100.0, 40.0)),
            placed(&b, 1, NodeStatus::InProgress, Vec2f::new(100.0, 80.0)),
        ];
        let scene = build_scene(&input(&nodes, &[], Reveal::new(true)));

        let glows = scene.world.iter().filter(|p| matches!(p, Primitive::Glow { .. })).count();
        assert_eq!(glows, 1);
        let ring = scene.world.iter().find_map(|p| match p {
            Primitive::ProgressRing { fraction, .. } => Some(*fraction),
            _ => None,
        });
        assert_eq!(ring, Some(0.5));
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn grid_lines_stay_inside_canvas() {
        let a = NodeId::from("a");
        let nodes = [placed(&a, 0, NodeStatus::Available, Vec2f::new(100.0, 40.0))];
        let scene = build_scene(&input(&nodes, &[], Reveal::new(true)));
        let grid = scene.world.iter().filter(|p| matches!(p, Primitive::GridLine { .. })).count();
        // 200 wide -> x = 40..160, 120 tall -> y = 40, 80.
        assert_eq!(grid, 4 + 2);
    }

    #[test]
    fn connector_waits_for_later_endpoint() {
        let (a, b) = (NodeId::from("a"), NodeId::from("b"));
        let from = Vec2f::new(100.0, 40.0);
        let to = Vec2f::new(100.0, 200.0);
        let nodes = [
            placed(&a, 0, NodeStatus::Completed, from),
            placed(&b, 2, NodeStatus::Locked, to),
        ];
        let edges = [Edge {
            id: "ab".into(),
            path: build_path(from, to),
            tier: StrokeTier::Dormant,
            from_tier: 0,
            to_tier: 2,
        }];
        let scene = build_scene(&input(&nodes, &edges, Reveal::new(false)));

        let reveal = scene.world.iter().find_map(|p| match p {
            Primitive::Connector { reveal, .. } => Some(*reveal),
            _ => None,
        });
        assert_eq!(reveal, Some(0.0));
        assert_eq!(scene.node_count(), 1);
    }
}
