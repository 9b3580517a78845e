//! Pan/zoom state for one rendered tree.
//!
//! Every operation is a total function of the current state plus one input. Invalid input
//! (non-finite coordinates, unmeasured containers) leaves the state untouched instead of
//! failing, so the controller can be fed raw host events.

use engine::{HeadlessRunner, TransitionLogic};
use serde::{Deserialize, Serialize};

use crate::model::Vec2f;

pub const MIN_SCALE: f32 = 0.2;
pub const MAX_SCALE: f32 = 3.0;
pub const WHEEL_ZOOM_IN: f32 = 1.08;
pub const WHEEL_ZOOM_OUT: f32 = 0.92;
pub const BUTTON_ZOOM_STEP: f32 = 1.2;
/// Fraction of the container the fitted canvas may occupy.
pub const FIT_MARGIN: f32 = 0.9;
pub const FIT_TOP_OFFSET: f32 = 20.0;

pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Maps layout space onto container-local pixels: `local = layout * scale + offset`.
///
/// Fields are private so `scale` can only be set through [`ViewportTransform::new`] and the
/// operations below, all of which clamp it. Deserialization goes through `new` as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TransformRecord")]
pub struct ViewportTransform {
    offset_x: f32,
    offset_y: f32,
    scale: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransformRecord {
    #[serde(default)]
    offset_x: f32,
    #[serde(default)]
    offset_y: f32,
    #[serde(default = "unit_scale")]
    scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl From<TransformRecord> for ViewportTransform {
    fn from(r: TransformRecord) -> Self {
        Self::new(r.offset_x, r.offset_y, r.scale)
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl ViewportTransform {
    pub const IDENTITY: ViewportTransform = ViewportTransform {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Non-finite offsets become 0 and `scale` is clamped into `[MIN_SCALE, MAX_SCALE]`.
    pub fn new(offset_x: f32, offset_y: f32, scale: f32) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            offset_x: finite(offset_x),
            offset_y: finite(offset_y),
            scale: clamp_scale(scale),
        }
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn layout_to_local(&self, p: Vec2f) -> Vec2f {
        Vec2f::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    pub fn local_to_layout(&self, p: Vec2f) -> Vec2f {
        Vec2f::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    /// Fits the whole canvas into the container, never enlarging past 1:1, horizontally
    /// centered and pinned near the top. Any unusable dimension keeps `self`.
    pub fn fit_to_container(self, container: Vec2f, canvas: Vec2f) -> Self {
        if !(positive(container.x)
            && positive(container.y)
            && positive(canvas.x)
            && positive(canvas.y))
        {
            return self;
        }
        let fit = (container.x / canvas.x)
            .min(container.y / canvas.y)
            .min(1.0);
        let scale = clamp_scale(fit * FIT_MARGIN);
        Self {
            offset_x: (container.x - canvas.x * scale) / 2.0,
            offset_y: FIT_TOP_OFFSET,
            scale,
        }
    }

    /// Rescales by `factor` while keeping the layout point under `anchor` (container-local)
    /// at the same place on screen.
    pub fn zoom_about(self, anchor: Vec2f, factor: f32) -> Self {
        if !anchor.is_finite() || !positive(factor) || !positive(self.scale) {
            return self;
        }
        let scale = clamp_scale(self.scale * factor);
        let ratio = scale / self.scale;
        Self {
            offset_x: anchor.x - (anchor.x - self.offset_x) * ratio,
            offset_y: anchor.y - (anchor.y - self.offset_y) * ratio,
            scale,
        }
    }

    pub fn zoom_at_point(self, cursor: Vec2f, direction: ZoomDirection) -> Self {
        self.zoom_about(cursor, direction.wheel_factor())
    }

    pub fn pan_by(self, dx: f32, dy: f32) -> Self {
        if !(dx.is_finite() && dy.is_finite()) {
            return self;
        }
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..self
        }
    }

    /// Button zoom about the container center, or about the origin when no container has been
    /// measured yet.
    pub fn zoom_in(self, container: Option<Vec2f>) -> Self {
        self.zoom_button(container, BUTTON_ZOOM_STEP)
    }

    pub fn zoom_out(self, container: Option<Vec2f>) -> Self {
        self.zoom_button(container, 1.0 / BUTTON_ZOOM_STEP)
    }

    fn zoom_button(self, container: Option<Vec2f>, factor: f32) -> Self {
        match container.filter(|c| positive(c.x) && positive(c.y)) {
            Some(c) => self.zoom_about(Vec2f::new(c.x / 2.0, c.y / 2.0), factor),
            None => Self {
                scale: clamp_scale(self.scale * factor),
                ..self
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Browser wheel convention: negative `delta_y` (wheel up) zooms in. Zero or non-finite
    /// deltas carry no direction.
    pub fn from_wheel_delta(delta_y: f32) -> Option<Self> {
        if !delta_y.is_finite() || delta_y == 0.0 {
            None
        } else if delta_y < 0.0 {
            Some(ZoomDirection::In)
        } else {
            Some(ZoomDirection::Out)
        }
    }

    pub fn wheel_factor(self) -> f32 {
        match self {
            ZoomDirection::In => WHEEL_ZOOM_IN,
            ZoomDirection::Out => WHEEL_ZOOM_OUT,
        }
    }
}

/// Transform plus the live measurements `Reset` and the zoom buttons need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub transform: ViewportTransform,
    pub container: Option<Vec2f>,
    pub canvas: Vec2f,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ViewportEvent {
    /// Records both measurements and fits.
    FitToContainer { container: Vec2f, canvas: Vec2f },
    /// Records the container size without changing the transform.
    Measure { container: Vec2f },
    /// Records a new canvas size without changing the transform.
    SetCanvas { canvas: Vec2f },
    Wheel { cursor: Vec2f, direction: ZoomDirection },
    PanBy { dx: f32, dy: f32 },
    ZoomIn,
    ZoomOut,
    Reset,
}

pub fn step(state: &ViewportState, event: ViewportEvent) -> ViewportState {
    let mut next = *state;
    match event {
        ViewportEvent::FitToContainer { container, canvas } => {
            if positive(container.x) && positive(container.y) {
                next.container = Some(container);
            }
            next.canvas = canvas;
            next.transform = state.transform.fit_to_container(container, canvas);
        }
        ViewportEvent::Measure { container } => {
            if positive(container.x) && positive(container.y) {
                next.container = Some(container);
            }
        }
        ViewportEvent::SetCanvas { canvas } => {
            next.canvas = canvas;
        }
        ViewportEvent::Wheel { cursor, direction } => {
            next.transform = state.transform.zoom_at_point(cursor, direction);
        }
        ViewportEvent::PanBy { dx, dy } => {
            next.transform = state.transform.pan_by(dx, dy);
        }
        ViewportEvent::ZoomIn => {
            next.transform = state.transform.zoom_in(state.container);
        }
        ViewportEvent::ZoomOut => {
            next.transform = state.transform.zoom_out(state.container);
        }
        ViewportEvent::Reset => {
            if let Some(container) = state.container {
                next.transform = state.transform.fit_to_container(container, state.canvas);
            }
        }
    }
    if next.transform != state.transform {
        tracing::trace!(?event, transform = ?next.transform, "viewport changed");
    }
    next
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportLogic;

impl TransitionLogic for ViewportLogic {
    type State = ViewportState;
    type Input = ViewportEvent;

    fn initial_state(&self) -> ViewportState {
        ViewportState::default()
    }

    fn step(&self, state: &ViewportState, input: ViewportEvent) -> ViewportState {
        step(state, input)
    }
}

/// States kept for undo; older ones are forgotten.
pub const HISTORY_LIMIT: usize = 256;

/// Owns the viewport of one tree and keeps a bounded history of its states.
pub struct ViewportController {
    runner: HeadlessRunner<ViewportLogic>,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportController {
    pub fn new() -> Self {
        Self {
            runner: HeadlessRunner::with_history_limit(ViewportLogic, HISTORY_LIMIT),
        }
    }

    pub fn state(&self) -> &ViewportState {
        self.runner.state()
    }

    pub fn transform(&self) -> ViewportTransform {
        self.runner.state().transform
    }

    pub fn apply(&mut self, event: ViewportEvent) -> ViewportTransform {
        self.runner.step(event);
        self.transform()
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = ViewportEvent>) -> ViewportTransform {
        self.runner.run(events);
        self.transform()
    }

    /// Number of retained states, including the current one.
    pub fn history_len(&self) -> usize {
        self.runner.history().len()
    }

    pub fn can_undo(&self) -> bool {
        self.runner.can_rewind()
    }

    pub fn can_redo(&self) -> bool {
        self.runner.can_forward()
    }

    /// Steps back through recorded states; returns the frame now current.
    pub fn undo(&mut self, frames: usize) -> usize {
        self.runner.rewind(frames)
    }

    /// Re-applies states dropped by [`undo`](Self::undo). Applying a new event after an undo
    /// discards them.
    pub fn redo(&mut self, frames: usize) -> usize {
        self.runner.forward(frames)
    }
}
