use std::time::Duration;

use skilltree::raster::render_rgba;
use skilltree::theme::Theme;
use skilltree::{
    NodeId, NodeStatus, ScreenRect, SkillNode, SkillTreeSnapshot, SkillTreeView, ViewOptions,
    project,
};

fn still(high_contrast: bool) -> ViewOptions {
    ViewOptions {
        reduce_motion: true,
        high_contrast,
    }
}

fn measured(snapshot: SkillTreeSnapshot, w: f32, h: f32) -> SkillTreeView {
    let mut view = SkillTreeView::with_snapshot(still(false), snapshot);
    view.measure(ScreenRect::from_size(w, h));
    view
}

fn pixel_at_node(view: &SkillTreeView, id: &str) -> [u8; 4] {
    let center = view.layout().position(&NodeId::from(id)).unwrap();
    let p = project(center, &view.transform(), view.rect()).unwrap();
    render_rgba(&view.scene(Duration::ZERO))
        .pixel(p.x as u32, p.y as u32)
        .unwrap()
}

#[test]
fn node_centers_use_status_fill() {
    let theme = Theme::STANDARD;
    let view = measured(SkillTreeSnapshot::sample(), 1024.0, 768.0);
    assert_eq!(
        pixel_at_node(&view, "number-sense"),
        theme.node_fill(NodeStatus::Completed)
    );
    assert_eq!(
        pixel_at_node(&view, "division"),
        theme.node_fill(NodeStatus::Locked)
    );
}

#[test]
fn top_left_corner_is_background() {
    let view = measured(SkillTreeSnapshot::sample(), 1024.0, 768.0);
    let frame = render_rgba(&view.scene(Duration::ZERO));
    assert_eq!(frame.pixel(0, 0), Some(Theme::STANDARD.background));
}

#[test]
fn empty_tree_renders_message_instead_of_canvas() {
    let view = measured(SkillTreeSnapshot::default(), 400.0, 300.0);
    let scene = view.scene(Duration::ZERO);
    assert!(scene.is_empty_state());
    assert!(scene.world.is_empty());

    let frame = render_rgba(&scene);
    let background = Theme::STANDARD.background;
    let painted = frame
        .frame()
        .chunks_exact(4)
        .filter(|px| *px != background.as_slice())
        .count();
    assert!(painted > 0, "empty-state text should be drawn");
}

#[test]
fn entrance_reveal_hides_later_tiers_at_first() {
    let snapshot = SkillTreeSnapshot::new(
        vec![SkillNode::new("a", 0, 0), SkillNode::new("b", 3, 0)],
        Vec::new(),
    );
    let mut view = SkillTreeView::with_snapshot(ViewOptions::default(), snapshot);
    view.measure(ScreenRect::from_size(600.0, 800.0));

    let early = view.scene(Duration::from_millis(100));
    assert_eq!(early.node_count(), 1);
    let late = view.scene(Duration::from_secs(2));
    assert_eq!(late.node_count(), 2);
}
