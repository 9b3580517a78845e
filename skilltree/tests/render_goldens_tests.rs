use std::time::Duration;

use engine::graphics::CpuRenderer;
use engine::regression::{assert_or_update_golden_hashes, rgba_sha256_hex};
use engine::regression_golden_path;
use engine::surface::SurfaceSize;
use skilltree::raster::{draw_scene, render_rgba};
use skilltree::{
    NodeId, PointerEvent, ScreenRect, SkillTreeSnapshot, SkillTreeView, ViewOptions,
    ViewportEvent,
};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

#[derive(Debug, Clone)]
enum Step {
    Fit,
    Viewport(ViewportEvent),
    Pointer(PointerEvent),
    Hover(&'static str),
}

fn sample_view() -> SkillTreeView {
    let options = ViewOptions {
        reduce_motion: true,
        high_contrast: false,
    };
    let mut view = SkillTreeView::with_snapshot(options, SkillTreeSnapshot::sample());
    view.measure(ScreenRect::from_size(WIDTH as f32, HEIGHT as f32));
    view
}

fn apply(view: &mut SkillTreeView, step: Step) {
    match step {
        Step::Fit => {
            view.apply(ViewportEvent::Reset);
        }
        Step::Viewport(event) => {
            view.apply(event);
        }
        Step::Pointer(event) => {
            view.handle(event);
        }
        Step::Hover(id) => view.set_hovered(Some(NodeId::from(id))),
    }
}

fn steps() -> Vec<Step> {
    vec![
        Step::Fit,
        Step::Viewport(ViewportEvent::ZoomIn),
        Step::Pointer(PointerEvent::Wheel {
            x: 320.0,
            y: 120.0,
            delta_y: -120.0,
        }),
        Step::Pointer(PointerEvent::Down { x: 100.0, y: 100.0 }),
        Step::Pointer(PointerEvent::Move { x: 60.0, y: 140.0 }),
        Step::Pointer(PointerEvent::Up { x: 60.0, y: 140.0 }),
        Step::Hover("word-problems"),
        Step::Viewport(ViewportEvent::Reset),
    ]
}

#[test]
fn sample_tree_interaction_frames_match_goldens() {
    let name = "sample_tree_interaction_frames";
    let mut view = sample_view();
    let golden = assert_or_update_golden_hashes(
        name,
        regression_golden_path!(name),
        WIDTH,
        HEIGHT,
        steps(),
        |step, buf| {
            apply(&mut view, step);
            let scene = view.scene(Duration::ZERO);
            let mut gfx = CpuRenderer::new(buf, SurfaceSize::new(WIDTH, HEIGHT));
            draw_scene(&scene, &mut gfx);
        },
    )
    .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(golden.hashes.len(), steps().len());
}

#[test]
fn rendering_is_deterministic_across_views() {
    let hash = |view: &SkillTreeView| rgba_sha256_hex(render_rgba(&view.scene(Duration::ZERO)).frame());
    let mut a = sample_view();
    let mut b = sample_view();
    assert_eq!(hash(&a), hash(&b));

    for step in steps() {
        apply(&mut a, step.clone());
        apply(&mut b, step);
        assert_eq!(hash(&a), hash(&b));
    }
}

#[test]
fn high_contrast_changes_the_frame() {
    let standard = sample_view();
    let options = ViewOptions {
        reduce_motion: true,
        high_contrast: true,
    };
    let mut contrast = SkillTreeView::with_snapshot(options, SkillTreeSnapshot::sample());
    contrast.measure(ScreenRect::from_size(WIDTH as f32, HEIGHT as f32));

    let a = render_rgba(&standard.scene(Duration::ZERO));
    let b = render_rgba(&contrast.scene(Duration::ZERO));
    assert_ne!(rgba_sha256_hex(a.frame()), rgba_sha256_hex(b.frame()));
}
