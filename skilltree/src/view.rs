//! The interactive surface: owns one tree's snapshot, layout and viewport, and turns raw
//! pointer input into viewport events, hover state and node activations.

use std::collections::HashMap;
use std::time::Duration;

use engine::graphics::{line_advance_y, text_width};
use engine::ui::{Anchor, Insets, Rect, Size};

use crate::animation::Reveal;
use crate::connector::{CubicPath, StrokeTier, build_path, classify};
use crate::layout::{LayoutResult, layout};
use crate::model::{NodeId, NodeStatus, SkillNode, SkillTreeSnapshot, Vec2f};
use crate::projector::{ScreenRect, project, unproject};
use crate::scene::{PlacedNode, Scene, SceneInput, build_scene};
use crate::theme::Theme;
use crate::viewport::{ViewportController, ViewportEvent, ViewportTransform, ZoomDirection};

/// Pointer travel (screen pixels) before a press turns into a pan.
pub const DRAG_THRESHOLD_PX: f32 = 4.0;
pub const CONTROL_SIZE: u32 = 32;
pub const CONTROL_GAP: u32 = 8;
pub const CONTROL_MARGIN: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomControl {
    ZoomIn,
    ZoomOut,
    Reset,
}

impl ZoomControl {
    pub const ALL: [ZoomControl; 3] = [ZoomControl::ZoomIn, ZoomControl::ZoomOut, ZoomControl::Reset];

    pub fn label(self) -> &'static str {
        match self {
            ZoomControl::ZoomIn => "+",
            ZoomControl::ZoomOut => "-",
            ZoomControl::Reset => "FIT",
        }
    }

    pub fn event(self) -> ViewportEvent {
        match self {
            ZoomControl::ZoomIn => ViewportEvent::ZoomIn,
            ZoomControl::ZoomOut => ViewportEvent::ZoomOut,
            ZoomControl::Reset => ViewportEvent::Reset,
        }
    }
}

/// Container-local rects of the zoom buttons: a vertical stack in the bottom-right corner.
pub fn control_rects(container: Size) -> Vec<(ZoomControl, Rect)> {
    let n = ZoomControl::ALL.len() as u32;
    let stack = Size::new(CONTROL_SIZE, n * CONTROL_SIZE + (n - 1) * CONTROL_GAP);
    let area = Rect::from_size(container.w, container.h).inset(Insets::all(CONTROL_MARGIN));
    if area.w < stack.w || area.h < stack.h {
        return Vec::new();
    }
    let stack = area.place(stack, Anchor::BottomRight);
    ZoomControl::ALL
        .iter()
        .enumerate()
        .map(|(i, &control)| {
            let y = stack.y + i as u32 * (CONTROL_SIZE + CONTROL_GAP);
            (control, Rect::new(stack.x, y, CONTROL_SIZE, CONTROL_SIZE))
        })
        .collect()
}

/// Host pointer input in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Leave,
    /// Browser convention: negative `delta_y` is wheel up.
    Wheel { x: f32, y: f32, delta_y: f32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOutcome {
    /// Nothing visible changed.
    Idle,
    /// Viewport or hover changed; redraw.
    Changed,
    /// A node was clicked (pressed and released without dragging).
    NodeActivated(NodeId),
    ControlApplied(ZoomControl),
}

#[derive(Debug, Clone, PartialEq)]
enum PressTarget {
    Canvas,
    Node(NodeId),
    Control(ZoomControl),
}

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    down: Vec2f,
    last: Vec2f,
    started: bool,
    target: PressTarget,
}

/// A connector whose endpoints both resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub path: CubicPath,
    pub tier: StrokeTier,
    pub from_tier: u32,
    pub to_tier: u32,
}

/// Hover card, already placed in container-local pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub node: NodeId,
    pub lines: Vec<String>,
    pub rect: Rect,
    pub text_scale: u32,
}

impl Tooltip {
    pub const PADDING: u32 = 8;
    const OFFSET: f32 = 10.0;
    const WRAP: usize = 28;

    pub fn lines_for(node: &SkillNode) -> Vec<String> {
        let mut lines = vec![node.display_name().to_string()];
        if node.status == NodeStatus::InProgress {
            lines.push(format!("{} {}%", node.status.label(), node.progress_pct.min(100)));
        } else {
            lines.push(node.status.label().to_string());
        }
        if let Some(xp) = node.xp_reward {
            lines.push(format!("{xp} XP"));
        }
        if let Some(description) = &node.description {
            lines.extend(wrap_words(description, Self::WRAP));
        }
        lines
    }
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub reduce_motion: bool,
    pub high_contrast: bool,
}

pub struct SkillTreeView {
    snapshot: SkillTreeSnapshot,
    layout: LayoutResult,
    /// First occurrence of each id in `snapshot.nodes`.
    index: HashMap<NodeId, usize>,
    edges: Vec<Edge>,
    viewport: ViewportController,
    rect: Option<ScreenRect>,
    fitted: bool,
    cursor: Option<Vec2f>,
    hovered: Option<NodeId>,
    drag: Option<DragState>,
    theme: Theme,
    reveal: Reveal,
    /// Time since the tree was shown, as last reported by [`SkillTreeView::tick`].
    clock: Duration,
}

impl SkillTreeView {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            snapshot: SkillTreeSnapshot::default(),
            layout: LayoutResult::default(),
            index: HashMap::new(),
            edges: Vec::new(),
            viewport: ViewportController::new(),
            rect: None,
            fitted: false,
            cursor: None,
            hovered: None,
            drag: None,
            theme: Theme::for_contrast(options.high_contrast),
            reveal: Reveal::new(options.reduce_motion),
            clock: Duration::ZERO,
        }
    }

    pub fn with_snapshot(options: ViewOptions, snapshot: SkillTreeSnapshot) -> Self {
        let mut view = Self::new(options);
        view.set_snapshot(snapshot);
        view
    }

    pub fn snapshot(&self) -> &SkillTreeSnapshot {
        &self.snapshot
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn rect(&self) -> Option<&ScreenRect> {
        self.rect.as_ref()
    }

    pub fn transform(&self) -> ViewportTransform {
        self.viewport.transform()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.started)
    }

    pub fn reveal(&self) -> Reveal {
        self.reveal
    }

    pub fn node(&self, id: &NodeId) -> Option<&SkillNode> {
        self.index.get(id).map(|&i| &self.snapshot.nodes[i])
    }

    /// Replaces the tree, recomputes layout and connectors, and refits if measured.
    pub fn set_snapshot(&mut self, snapshot: SkillTreeSnapshot) {
        self.layout = layout(&snapshot.nodes);
        self.index.clear();
        for (i, node) in snapshot.nodes.iter().enumerate() {
            self.index.entry(node.id.clone()).or_insert(i);
        }
        self.snapshot = snapshot;
        self.edges = self.resolve_edges();
        self.hovered = self.hovered.take().filter(|id| self.index.contains_key(id));
        self.drag = None;

        let canvas = self.layout.canvas_size();
        match self.rect {
            Some(rect) => {
                self.viewport.apply(ViewportEvent::FitToContainer {
                    container: rect.size(),
                    canvas,
                });
                self.fitted = true;
            }
            None => {
                self.viewport.apply(ViewportEvent::SetCanvas { canvas });
            }
        }
    }

    fn resolve_edges(&self) -> Vec<Edge> {
        let mut dropped = 0usize;
        let edges: Vec<Edge> = self
            .snapshot
            .connections
            .iter()
            .filter_map(|conn| {
                let resolved = self.node(&conn.from_node_id).zip(self.node(&conn.to_node_id));
                let Some((from, to)) = resolved else {
                    dropped += 1;
                    return None;
                };
                let start = self.layout.position(&from.id)?;
                let end = self.layout.position(&to.id)?;
                Some(Edge {
                    id: conn.id.clone(),
                    path: build_path(start, end),
                    tier: classify(from.status, to.status),
                    from_tier: from.tier,
                    to_tier: to.tier,
                })
            })
            .collect();
        if dropped > 0 {
            tracing::warn!(dropped, "skipped connections with unknown endpoints");
        }
        edges
    }

    /// Records the container's on-screen rect. The first usable measurement fits the tree.
    pub fn measure(&mut self, rect: ScreenRect) -> bool {
        if !rect.is_measurable() {
            return false;
        }
        let changed = self.rect != Some(rect);
        self.rect = Some(rect);
        if self.fitted {
            self.viewport.apply(ViewportEvent::Measure {
                container: rect.size(),
            });
        } else {
            self.viewport.apply(ViewportEvent::FitToContainer {
                container: rect.size(),
                canvas: self.layout.canvas_size(),
            });
            self.fitted = !self.layout.is_empty();
        }
        changed
    }

    /// Advances the entrance-animation clock. Nodes only become hoverable and clickable once
    /// their tier has started to reveal, so hover is re-checked. Returns whether it changed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        self.clock = elapsed;
        self.refresh_hover()
    }

    fn is_revealed(&self, node: &SkillNode, elapsed: Duration) -> bool {
        !self.reveal.is_enabled() || self.reveal.progress(node.tier, elapsed) > 0.0
    }

    /// Steps the viewport back one state. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.viewport.can_undo() {
            return false;
        }
        self.viewport.undo(1);
        self.refresh_hover();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.viewport.can_redo() {
            return false;
        }
        self.viewport.redo(1);
        self.refresh_hover();
        true
    }

    /// Feeds a viewport event directly, as the zoom buttons and headless replays do.
    pub fn apply(&mut self, event: ViewportEvent) -> ViewportTransform {
        let transform = self.viewport.apply(event);
        self.refresh_hover();
        transform
    }

    pub fn handle(&mut self, event: PointerEvent) -> SurfaceOutcome {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(Vec2f::new(x, y)),
            PointerEvent::Move { x, y } => self.pointer_move(Vec2f::new(x, y)),
            PointerEvent::Up { x, y } => self.pointer_up(Vec2f::new(x, y)),
            PointerEvent::Leave => {
                let had_state = self.drag.take().is_some() || self.hovered.is_some();
                self.cursor = None;
                self.hovered = None;
                if had_state {
                    SurfaceOutcome::Changed
                } else {
                    SurfaceOutcome::Idle
                }
            }
            PointerEvent::Wheel { x, y, delta_y } => self.wheel(Vec2f::new(x, y), delta_y),
        }
    }

    fn pointer_down(&mut self, p: Vec2f) -> SurfaceOutcome {
        let Some(rect) = self.rect.filter(|r| r.contains(p)) else {
            return SurfaceOutcome::Idle;
        };
        let target = match self.control_at(&rect, p) {
            Some(control) => PressTarget::Control(control),
            None => match self.node_at(p) {
                Some(id) => PressTarget::Node(id),
                None => PressTarget::Canvas,
            },
        };
        let repaint = matches!(target, PressTarget::Control(_));
        self.drag = Some(DragState {
            down: p,
            last: p,
            started: false,
            target,
        });
        if repaint {
            SurfaceOutcome::Changed
        } else {
            SurfaceOutcome::Idle
        }
    }

    fn pointer_move(&mut self, p: Vec2f) -> SurfaceOutcome {
        if !p.is_finite() {
            return SurfaceOutcome::Idle;
        }
        self.cursor = Some(p);

        let mut pan = None;
        if let Some(drag) = self.drag.as_mut() {
            if !matches!(drag.target, PressTarget::Control(_)) {
                if !drag.started && drag.down.distance_to(p) >= DRAG_THRESHOLD_PX {
                    drag.started = true;
                }
                if drag.started {
                    // `last` stays at `down` until the threshold is crossed, so the first pan
                    // covers the whole distance travelled.
                    pan = Some((p.x - drag.last.x, p.y - drag.last.y));
                    drag.last = p;
                }
            }
        }

        if let Some((dx, dy)) = pan {
            self.viewport.apply(ViewportEvent::PanBy { dx, dy });
            return SurfaceOutcome::Changed;
        }
        if self.is_dragging() {
            return SurfaceOutcome::Idle;
        }
        if self.refresh_hover() {
            SurfaceOutcome::Changed
        } else {
            SurfaceOutcome::Idle
        }
    }

    fn pointer_up(&mut self, p: Vec2f) -> SurfaceOutcome {
        let Some(drag) = self.drag.take() else {
            return SurfaceOutcome::Idle;
        };
        if drag.started {
            self.cursor = Some(p);
            self.refresh_hover();
            return SurfaceOutcome::Changed;
        }
        match drag.target {
            PressTarget::Control(control) => {
                let released_on = self.rect.and_then(|rect| self.control_at(&rect, p));
                if released_on == Some(control) {
                    self.apply(control.event());
                    tracing::debug!(?control, "zoom control applied");
                    SurfaceOutcome::ControlApplied(control)
                } else {
                    SurfaceOutcome::Changed
                }
            }
            PressTarget::Node(id) => {
                if self.node_at(p).as_ref() == Some(&id) {
                    tracing::debug!(%id, "node activated");
                    SurfaceOutcome::NodeActivated(id)
                } else {
                    SurfaceOutcome::Idle
                }
            }
            PressTarget::Canvas => SurfaceOutcome::Idle,
        }
    }

    fn wheel(&mut self, p: Vec2f, delta_y: f32) -> SurfaceOutcome {
        let Some(rect) = self.rect.filter(|r| r.contains(p)) else {
            return SurfaceOutcome::Idle;
        };
        let Some(direction) = ZoomDirection::from_wheel_delta(delta_y) else {
            return SurfaceOutcome::Idle;
        };
        self.cursor = Some(p);
        self.apply(ViewportEvent::Wheel {
            cursor: rect.to_local(p),
            direction,
        });
        SurfaceOutcome::Changed
    }

    /// Re-evaluates the hovered node under the last cursor position.
    fn refresh_hover(&mut self) -> bool {
        let next = self.cursor.and_then(|p| self.node_at(p));
        let changed = next != self.hovered;
        self.hovered = next;
        changed
    }

    /// Overrides hover, e.g. for headless renders of a tooltip.
    pub fn set_hovered(&mut self, id: Option<NodeId>) {
        self.hovered =
            id.filter(|id| self.node(id).is_some_and(|n| self.is_revealed(n, self.clock)));
    }

    fn control_at(&self, rect: &ScreenRect, p: Vec2f) -> Option<ZoomControl> {
        if self.layout.is_empty() {
            return None;
        }
        let local = rect.to_local(p);
        control_rects(container_size(rect))
            .into_iter()
            .find(|(_, r)| r.contains_point(local.x, local.y))
            .map(|(control, _)| control)
    }

    /// Node under a screen point: the nearest revealed center within that node's radius.
    pub fn node_at(&self, screen: Vec2f) -> Option<NodeId> {
        let rect = self.rect.as_ref()?;
        if !rect.contains(screen) {
            return None;
        }
        let p = unproject(screen, &self.transform(), Some(rect))?;
        self.index
            .iter()
            .filter(|&(_, &i)| self.is_revealed(&self.snapshot.nodes[i], self.clock))
            .filter_map(|(id, &i)| {
                let center = self.layout.position(id)?;
                let d = center.distance_to(p);
                (d <= self.snapshot.nodes[i].radius()).then_some((d, i))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, i)| self.snapshot.nodes[i].id.clone())
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let id = self.hovered.as_ref()?;
        let node = self.node(id).filter(|n| self.is_revealed(n, self.clock))?;
        let rect = self.rect.as_ref()?;
        let center = self.layout.position(id)?;
        let transform = self.transform();
        let anchor = rect.to_local(project(center, &transform, Some(rect))?);

        let text_scale = engine::graphics::DEFAULT_TEXT_SCALE;
        let lines = Tooltip::lines_for(node);
        let text_w = lines
            .iter()
            .map(|l| text_width(l, text_scale))
            .max()
            .unwrap_or(0);
        let w = text_w + 2 * Tooltip::PADDING;
        let h = lines.len() as u32 * line_advance_y(text_scale) + 2 * Tooltip::PADDING;

        let reach = node.radius() * transform.scale() + Tooltip::OFFSET;
        let max_x = (rect.width - w as f32).max(0.0);
        let max_y = (rect.height - h as f32).max(0.0);
        let x = (anchor.x - w as f32 / 2.0).clamp(0.0, max_x);
        let above = anchor.y - reach - h as f32;
        let y = if above >= 0.0 { above } else { anchor.y + reach }.clamp(0.0, max_y);

        Some(Tooltip {
            node: id.clone(),
            lines,
            rect: Rect::new(x as u32, y as u32, w, h),
            text_scale,
        })
    }

    /// Display list for the current state, `elapsed` after the tree was shown.
    pub fn scene(&self, elapsed: Duration) -> Scene {
        let size = self.rect.map(|r| r.size()).unwrap_or(Vec2f::ZERO);
        let mut nodes: Vec<(usize, PlacedNode<'_>)> = self
            .index
            .iter()
            .filter_map(|(id, &i)| {
                let node = &self.snapshot.nodes[i];
                Some((
                    i,
                    PlacedNode {
                        id,
                        label: node.display_name(),
                        tier: node.tier,
                        center: self.layout.position(id)?,
                        radius: node.radius(),
                        status: node.status,
                        progress_pct: node.progress_pct,
                    },
                ))
            })
            .collect();
        // Input order keeps draw order stable across frames.
        nodes.sort_by_key(|(i, _)| *i);
        let nodes: Vec<PlacedNode<'_>> = nodes.into_iter().map(|(_, n)| n).collect();

        let tooltip = self.tooltip().filter(|t| {
            self.node(&t.node)
                .is_some_and(|n| self.is_revealed(n, elapsed))
        });
        let controls = self
            .rect
            .map(|r| control_rects(container_size(&r)))
            .unwrap_or_default();
        let pressed = match self.drag.as_ref().map(|d| &d.target) {
            Some(PressTarget::Control(control)) => Some(*control),
            _ => None,
        };

        build_scene(&SceneInput {
            size,
            canvas: self.layout.canvas_size(),
            transform: self.transform(),
            nodes: &nodes,
            edges: &self.edges,
            hovered: self.hovered.as_ref(),
            tooltip: tooltip.as_ref(),
            controls: &controls,
            pressed,
            theme: &self.theme,
            reveal: self.reveal,
            elapsed,
        })
    }
}

fn container_size(rect: &ScreenRect) -> Size {
    Size::new(rect.width.max(0.0) as u32, rect.height.max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SkillConnection;
    use crate::scene::Overlay;

    fn sample_view() -> SkillTreeView {
        let snapshot = SkillTreeSnapshot::new(
            vec![
                SkillNode::new("a", 0, 0).named("Root").with_status(NodeStatus::Completed),
                SkillNode::new("b", 1, 0).with_status(NodeStatus::Completed),
                SkillNode::new("c", 1, 1)
                    .with_status(NodeStatus::InProgress)
                    .with_progress(40),
            ],
            vec![
                SkillConnection::new("ab", "a", "b"),
                SkillConnection::new("ac", "a", "c"),
                SkillConnection::new("ax", "a", "missing"),
            ],
        );
        let mut view = SkillTreeView::with_snapshot(still(), snapshot);
        view.measure(ScreenRect::from_size(600.0, 520.0));
        view
    }

    fn still() -> ViewOptions {
        ViewOptions {
            reduce_motion: true,
            high_contrast: false,
        }
    }

    fn screen_of(view: &SkillTreeView, id: &str) -> Vec2f {
        let center = view.layout().position(&NodeId::from(id)).unwrap();
        project(center, &view.transform(), view.rect()).unwrap()
    }

    #[test]
    fn dangling_connections_are_skipped() {
        let view = sample_view();
        let ids: Vec<&str> = view.edges().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["ab", "ac"]);
        assert_eq!(view.edges()[0].tier, StrokeTier::Strong);
        assert_eq!(view.edges()[1].tier, StrokeTier::Active);
    }

    #[test]
    fn first_measurement_fits_the_canvas() {
        let view = sample_view();
        let t = view.transform();
        // 600x520 canvas in a 600x520 container: 1:1 then the fit margin.
        assert!((t.scale() - 0.9).abs() < 1e-5, "{t:?}");
        assert_eq!(t.offset_y(), 20.0);
    }

    #[test]
    fn click_on_node_activates_it() {
        let mut view = sample_view();
        let p = screen_of(&view, "b");
        assert_eq!(view.handle(PointerEvent::Down { x: p.x, y: p.y }), SurfaceOutcome::Idle);
        assert_eq!(
            view.handle(PointerEvent::Up { x: p.x + 1.0, y: p.y }),
            SurfaceOutcome::NodeActivated(NodeId::from("b"))
        );
    }

    #[test]
    fn drag_past_threshold_pans_by_full_distance_and_suppresses_click() {
        let mut view = sample_view();
        let before = view.transform();
        let p = screen_of(&view, "b");
        view.handle(PointerEvent::Down { x: p.x, y: p.y });
        view.handle(PointerEvent::Move { x: p.x + 2.0, y: p.y });
        assert!(!view.is_dragging());
        assert_eq!(view.transform(), before);
        view.handle(PointerEvent::Move { x: p.x + 10.0, y: p.y + 5.0 });
        assert!(view.is_dragging());
        let after = view.transform();
        assert!((after.offset_x() - (before.offset_x() + 10.0)).abs() < 1e-3);
        assert!((after.offset_y() - (before.offset_y() + 5.0)).abs() < 1e-3);
        assert_eq!(
            view.handle(PointerEvent::Up { x: p.x + 10.0, y: p.y + 5.0 }),
            SurfaceOutcome::Changed
        );
        assert!(!view.is_dragging());
    }

    #[test]
    fn leave_cancels_drag() {
        let mut view = sample_view();
        view.handle(PointerEvent::Down { x: 10.0, y: 10.0 });
        view.handle(PointerEvent::Move { x: 30.0, y: 10.0 });
        assert!(view.is_dragging());
        view.handle(PointerEvent::Leave);
        let t = view.transform();
        view.handle(PointerEvent::Move { x: 80.0, y: 10.0 });
        assert_eq!(view.transform(), t);
    }

    #[test]
    fn hover_follows_cursor_and_builds_tooltip() {
        let mut view = sample_view();
        let p = screen_of(&view, "c");
        assert_eq!(
            view.handle(PointerEvent::Move { x: p.x, y: p.y }),
            SurfaceOutcome::Changed
        );
        assert_eq!(view.hovered(), Some(&NodeId::from("c")));
        let tooltip = view.tooltip().expect("hovered node has a tooltip");
        assert_eq!(tooltip.lines[1], "In Progress 40%");
        assert!(tooltip.rect.x + tooltip.rect.w <= 600);

        view.handle(PointerEvent::Move { x: 1.0, y: 1.0 });
        assert_eq!(view.hovered(), None);
    }

    #[test]
    fn wheel_zooms_about_container_local_cursor() {
        let mut view = sample_view();
        view.measure(ScreenRect::new(100.0, 50.0, 600.0, 520.0));
        let p = screen_of(&view, "a");
        let layout_point = view.layout().position(&NodeId::from("a")).unwrap();
        view.handle(PointerEvent::Wheel { x: p.x, y: p.y, delta_y: -120.0 });
        let after = project(layout_point, &view.transform(), view.rect()).unwrap();
        assert!((after.x - p.x).abs() < 1e-3 && (after.y - p.y).abs() < 1e-3);
    }

    #[test]
    fn zoom_buttons_apply_on_release() {
        let mut view = sample_view();
        let before = view.transform();
        let (_, rect) = control_rects(Size::new(600, 520))[0];
        let (x, y) = (rect.x as f32 + 4.0, rect.y as f32 + 4.0);
        assert_eq!(view.handle(PointerEvent::Down { x, y }), SurfaceOutcome::Changed);
        assert_eq!(
            view.handle(PointerEvent::Up { x, y }),
            SurfaceOutcome::ControlApplied(ZoomControl::ZoomIn)
        );
        assert!(view.transform().scale() > before.scale());

        let (_, reset) = control_rects(Size::new(600, 520))[2];
        let (x, y) = (reset.x as f32 + 1.0, reset.y as f32 + 1.0);
        view.handle(PointerEvent::Down { x, y });
        view.handle(PointerEvent::Up { x, y });
        assert_eq!(view.transform(), before);
    }

    #[test]
    fn controls_stack_in_bottom_right_corner() {
        let rects = control_rects(Size::new(800, 600));
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[2].1, Rect::new(752, 552, 32, 32));
        assert_eq!(rects[0].1.y + 2 * (CONTROL_SIZE + CONTROL_GAP), rects[2].1.y);
        assert!(control_rects(Size::new(20, 20)).is_empty());
    }

    #[test]
    fn empty_snapshot_shows_empty_state() {
        let mut view = SkillTreeView::new(ViewOptions::default());
        view.measure(ScreenRect::from_size(400.0, 300.0));
        let scene = view.scene(Duration::ZERO);
        assert!(scene.is_empty_state());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn snapshot_before_measurement_fits_once_measured() {
        let mut view = SkillTreeView::with_snapshot(
            ViewOptions::default(),
            SkillTreeSnapshot::new(vec![SkillNode::new("solo", 0, 0)], Vec::new()),
        );
        assert_eq!(view.transform(), ViewportTransform::IDENTITY);
        view.measure(ScreenRect::from_size(300.0, 260.0));
        assert!((view.transform().scale() - 0.45).abs() < 1e-5);
    }

    #[test]
    fn unrevealed_nodes_ignore_hover_and_clicks() {
        let mut view = SkillTreeView::with_snapshot(
            ViewOptions::default(),
            SkillTreeSnapshot::new(vec![SkillNode::new("a", 0, 0)], Vec::new()),
        );
        view.measure(ScreenRect::from_size(400.0, 400.0));
        let p = screen_of(&view, "a");

        assert_eq!(view.handle(PointerEvent::Move { x: p.x, y: p.y }), SurfaceOutcome::Idle);
        assert_eq!(view.hovered(), None);
        view.set_hovered(Some(NodeId::from("a")));
        assert_eq!(view.tooltip(), None);
        let scene = view.scene(Duration::ZERO);
        assert_eq!(scene.node_count(), 0);
        assert!(!scene.overlay.iter().any(|o| matches!(o, Overlay::Panel { .. })));
        view.handle(PointerEvent::Down { x: p.x, y: p.y });
        assert_eq!(view.handle(PointerEvent::Up { x: p.x, y: p.y }), SurfaceOutcome::Idle);

        // Once tier 0 starts revealing the cursor already over it picks it up.
        assert!(view.tick(Duration::from_millis(50)));
        assert_eq!(view.hovered(), Some(&NodeId::from("a")));
        assert!(view.tooltip().is_some());
        view.handle(PointerEvent::Down { x: p.x, y: p.y });
        assert_eq!(
            view.handle(PointerEvent::Up { x: p.x, y: p.y }),
            SurfaceOutcome::NodeActivated(NodeId::from("a"))
        );
    }

    #[test]
    fn undo_and_redo_walk_viewport_history() {
        let mut view = sample_view();
        let fitted = view.transform();
        view.apply(ViewportEvent::PanBy { dx: 30.0, dy: 0.0 });
        let panned = view.transform();

        assert!(view.undo());
        assert_eq!(view.transform(), fitted);
        assert!(view.redo());
        assert_eq!(view.transform(), panned);
        assert!(!view.redo());
    }

    #[test]
    fn wrap_words_breaks_on_width() {
        assert_eq!(
            wrap_words("one two three four", 9),
            ["one two", "three", "four"]
        );
    }
}
