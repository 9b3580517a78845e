//! Property tests for the viewport state machine.
//!
//! Verifies:
//! 1. Scale never leaves [MIN_SCALE, MAX_SCALE] under any event sequence
//! 2. Wheel zoom keeps the layout point under the cursor fixed, clamped or not
//! 3. Panning is exactly additive
//! 4. Invalid fit input never changes the transform
//! 5. Replaying the same events through two controllers gives the same transform

use proptest::prelude::*;
use skilltree::viewport::{MAX_SCALE, MIN_SCALE, step};
use skilltree::{Vec2f, ViewportController, ViewportEvent, ViewportTransform, ZoomDirection};

fn arb_point() -> impl Strategy<Value = Vec2f> {
    (-2000.0f32..2000.0, -2000.0f32..2000.0).prop_map(|(x, y)| Vec2f::new(x, y))
}

fn arb_size() -> impl Strategy<Value = Vec2f> {
    (1.0f32..4000.0, 1.0f32..4000.0).prop_map(|(x, y)| Vec2f::new(x, y))
}

fn arb_direction() -> impl Strategy<Value = ZoomDirection> {
    prop_oneof![Just(ZoomDirection::In), Just(ZoomDirection::Out)]
}

fn arb_transform() -> impl Strategy<Value = ViewportTransform> {
    (-1000.0f32..1000.0, -1000.0f32..1000.0, MIN_SCALE..MAX_SCALE)
        .prop_map(|(x, y, s)| ViewportTransform::new(x, y, s))
}

fn arb_event() -> impl Strategy<Value = ViewportEvent> {
    prop_oneof![
        (arb_size(), arb_size())
            .prop_map(|(container, canvas)| ViewportEvent::FitToContainer { container, canvas }),
        arb_size().prop_map(|container| ViewportEvent::Measure { container }),
        (arb_point(), arb_direction())
            .prop_map(|(cursor, direction)| ViewportEvent::Wheel { cursor, direction }),
        (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(dx, dy)| ViewportEvent::PanBy { dx, dy }),
        Just(ViewportEvent::ZoomIn),
        Just(ViewportEvent::ZoomOut),
        Just(ViewportEvent::Reset),
    ]
}

proptest! {
    #[test]
    fn scale_stays_clamped(events in prop::collection::vec(arb_event(), 0..80)) {
        let mut controller = ViewportController::new();
        for event in events {
            let t = controller.apply(event);
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&t.scale()), "{t:?}");
        }
    }

    #[test]
    fn wheel_zoom_keeps_cursor_anchor(t in arb_transform(), cursor in arb_point(), direction in arb_direction()) {
        let anchor = t.local_to_layout(cursor);
        let zoomed = t.zoom_at_point(cursor, direction);
        let after = zoomed.layout_to_local(anchor);
        let tolerance = 1e-2 * (1.0 + cursor.x.abs().max(cursor.y.abs()));
        prop_assert!((after.x - cursor.x).abs() < tolerance, "{after:?} vs {cursor:?}");
        prop_assert!((after.y - cursor.y).abs() < tolerance, "{after:?} vs {cursor:?}");
    }

    #[test]
    fn pan_is_additive(t in arb_transform(), dx in -500.0f32..500.0, dy in -500.0f32..500.0) {
        let panned = t.pan_by(dx, dy);
        prop_assert_eq!(panned.scale(), t.scale());
        prop_assert_eq!(panned.offset_x(), t.offset_x() + dx);
        prop_assert_eq!(panned.offset_y(), t.offset_y() + dy);
    }

    #[test]
    fn invalid_fit_keeps_transform(t in arb_transform(), canvas in arb_size(), bad in prop_oneof![Just(0.0f32), Just(-5.0), Just(f32::NAN), Just(f32::INFINITY)]) {
        prop_assert_eq!(t.fit_to_container(Vec2f::new(bad, 600.0), canvas), t);
        prop_assert_eq!(t.fit_to_container(Vec2f::new(800.0, 600.0), Vec2f::new(canvas.x, bad)), t);
    }

    #[test]
    fn replay_is_deterministic(events in prop::collection::vec(arb_event(), 0..40)) {
        let mut a = ViewportController::new();
        let mut b = ViewportController::new();
        prop_assert_eq!(a.apply_all(events.clone()), b.apply_all(events));
    }
}

#[test]
fn fifty_zoom_ins_then_outs_hit_the_bounds() {
    let mut state = step(
        &Default::default(),
        ViewportEvent::FitToContainer {
            container: Vec2f::new(800.0, 600.0),
            canvas: Vec2f::new(400.0, 800.0),
        },
    );
    for _ in 0..50 {
        state = step(&state, ViewportEvent::ZoomIn);
    }
    assert_eq!(state.transform.scale(), MAX_SCALE);
    for _ in 0..50 {
        state = step(&state, ViewportEvent::ZoomOut);
    }
    assert_eq!(state.transform.scale(), MIN_SCALE);
}
