//! Raster backend over `engine::graphics::Renderer2d`. The viewport transform is applied per
//! point since the renderer has no transform stack.

use engine::graphics::{Color, Renderer2d, glyph_advance_x, line_advance_y, text_width};
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};
use engine::ui::Rect;

use crate::model::Vec2f;
use crate::scene::{Overlay, Primitive, Scene};
use crate::viewport::ViewportTransform;

/// Curve subdivisions per connector.
const CURVE_SEGMENTS: usize = 24;

pub fn draw_scene(scene: &Scene, gfx: &mut dyn Renderer2d) {
    gfx.clear(scene.background);
    let t = &scene.transform;
    for primitive in &scene.world {
        draw_primitive(gfx, t, primitive);
    }
    for item in &scene.overlay {
        draw_overlay(gfx, item);
    }
}

/// Renders `scene` into a fresh RGBA buffer the size of its container.
pub fn render_rgba(scene: &Scene) -> RgbaBufferSurface {
    let size = SurfaceSize::new(
        scene.size.x.max(0.0).round() as u32,
        scene.size.y.max(0.0).round() as u32,
    );
    let mut surface = RgbaBufferSurface::new(size);
    if !size.is_empty() {
        surface.draw_with(|gfx| draw_scene(scene, gfx));
    }
    surface
}

fn alpha(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn pt(t: &ViewportTransform, p: Vec2f) -> (f32, f32) {
    let local = t.layout_to_local(p);
    (local.x, local.y)
}

/// Integer rect covering `[min, max)` clipped at zero, or `None` when nothing is visible.
fn clipped_rect(min: (f32, f32), max: (f32, f32)) -> Option<Rect> {
    if !(min.0.is_finite() && min.1.is_finite() && max.0.is_finite() && max.1.is_finite()) {
        return None;
    }
    let x0 = min.0.max(0.0).round();
    let y0 = min.1.max(0.0).round();
    let x1 = max.0.round();
    let y1 = max.1.round();
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

fn with_alpha(color: Color, a: u8) -> Color {
    [color[0], color[1], color[2], a]
}

/// Block-font scale that best matches a layout-space font size on screen.
fn text_scale_for(size: f32, t: &ViewportTransform) -> u32 {
    let px = size * t.scale() / line_advance_y(1) as f32;
    px.round().clamp(1.0, 8.0) as u32
}

fn draw_primitive(gfx: &mut dyn Renderer2d, t: &ViewportTransform, primitive: &Primitive) {
    match primitive {
        Primitive::Backdrop { size, color } => {
            if let Some(rect) = clipped_rect(pt(t, Vec2f::ZERO), pt(t, *size)) {
                gfx.fill_rect(rect, *color);
            }
        }
        Primitive::GridLine { from, to, color } => {
            gfx.stroke_segment(pt(t, *from), pt(t, *to), 1.0, *color, 255);
        }
        Primitive::Connector {
            path,
            style,
            reveal,
        } => {
            let points: Vec<(f32, f32)> = path
                .flatten(CURVE_SEGMENTS)
                .into_iter()
                .map(|p| pt(t, p))
                .collect();
            let width = (style.width * t.scale()).max(1.0);
            gfx.stroke_polyline(&points, width, style.color, alpha(style.opacity * reveal));
        }
        Primitive::Glow {
            center,
            radius,
            color,
            opacity,
        } => {
            let (cx, cy) = pt(t, *center);
            gfx.fill_circle(cx, cy, radius * t.scale(), *color, alpha(*opacity));
        }
        Primitive::Node {
            center,
            radius,
            fill,
            outline,
            hovered,
            opacity,
            ..
        } => {
            let (cx, cy) = pt(t, *center);
            let r = radius * t.scale();
            let border = (if *hovered { 3.0 } else { 2.0 }) * t.scale().max(0.5);
            let a = alpha(*opacity);
            gfx.fill_circle(cx, cy, r + border, *outline, a);
            gfx.fill_circle(cx, cy, r, *fill, a);
        }
        Primitive::ProgressRing {
            center,
            radius,
            width,
            fraction,
            track,
            fill,
            opacity,
        } => {
            let (cx, cy) = pt(t, *center);
            let (r, w) = (radius * t.scale(), (width * t.scale()).max(1.0));
            let a = alpha(*opacity);
            gfx.stroke_arc(cx, cy, r, w, 1.0, *track, a);
            gfx.stroke_arc(cx, cy, r, w, *fraction, *fill, a);
        }
        Primitive::Label {
            anchor,
            text,
            size,
            color,
            opacity,
        } => {
            let scale = text_scale_for(*size, t);
            let (ax, ay) = pt(t, *anchor);
            if ay < 0.0 || !ay.is_finite() {
                return;
            }
            let left = ax - text_width(text, scale) as f32 / 2.0;
            let Some((x, visible)) = clip_label_left(text, left, scale) else {
                return;
            };
            let color = with_alpha(*color, alpha(*opacity));
            gfx.draw_text_scaled(x, ay as u32, visible, color, scale);
        }
    }
}

/// Drops the leading glyphs that would start left of the frame, so a label sliding off the
/// left edge keeps its visible tail.
fn clip_label_left(text: &str, x: f32, scale: u32) -> Option<(u32, &str)> {
    if !x.is_finite() {
        return None;
    }
    if x >= 0.0 {
        return Some((x as u32, text));
    }
    let advance = glyph_advance_x(scale) as f32;
    let skip = (-x / advance).ceil() as usize;
    let (start, _) = text.char_indices().nth(skip)?;
    Some(((x + skip as f32 * advance).max(0.0) as u32, &text[start..]))
}

fn draw_overlay(gfx: &mut dyn Renderer2d, item: &Overlay) {
    match item {
        Overlay::Panel { rect, fill, border } => {
            gfx.blend_rect(*rect, *fill, 242);
            gfx.rect_outline(*rect, *border);
        }
        Overlay::Text {
            x,
            y,
            text,
            color,
            scale,
        } => gfx.draw_text_scaled(*x, *y, text, *color, *scale),
        Overlay::Button {
            rect,
            label,
            fill,
            border,
            text,
            pressed,
            ..
        } => {
            gfx.fill_rect(*rect, if *pressed { *border } else { *fill });
            gfx.rect_outline(*rect, *border);
            let scale = 2;
            let tw = text_width(label, scale);
            let th = line_advance_y(scale) - scale;
            let x = rect.x + rect.w.saturating_sub(tw) / 2;
            let y = rect.y + rect.h.saturating_sub(th) / 2;
            gfx.draw_text_scaled(x, y, label, *text, scale);
        }
    }
}
