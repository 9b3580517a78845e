//! SVG backend: one `<g transform>` for layout space, overlay drawn on top in pixels.

use std::path::Path;

use engine::graphics::{Color, line_advance_y};
use svg::Document;
use svg::node::Text as SvgText;
use svg::node::element::{Circle, Group, Line, Path as SvgPath, Rectangle, Text};

use crate::scene::{Overlay, Primitive, Scene};
use crate::viewport::ViewportTransform;

const FONT_FAMILY: &str = "system-ui, sans-serif";

pub fn save_scene(path: impl AsRef<Path>, scene: &Scene) -> std::io::Result<()> {
    svg::save(path, &scene_to_document(scene))
}

pub fn group_transform(t: &ViewportTransform) -> String {
    format!("translate({} {}) scale({})", t.offset_x(), t.offset_y(), t.scale())
}

pub fn scene_to_document(scene: &Scene) -> Document {
    let (w, h) = (scene.size.x.max(1.0), scene.size.y.max(1.0));
    let mut document = Document::new()
        .set("viewBox", format!("0 0 {w} {h}"))
        .set("width", w)
        .set("height", h)
        .set("xmlns", "http://www.w3.org/2000/svg");

    document = document.add(
        Rectangle::new()
            .set("width", w)
            .set("height", h)
            .set("fill", color_hex(scene.background)),
    );

    if !scene.world.is_empty() {
        let mut group = Group::new()
            .set("class", "skill-tree")
            .set("transform", group_transform(&scene.transform));
        for primitive in &scene.world {
            group = add_primitive(group, primitive);
        }
        document = document.add(group);
    }

    for item in &scene.overlay {
        document = add_overlay(document, item);
    }
    document
}

fn add_primitive(group: Group, primitive: &Primitive) -> Group {
    match primitive {
        Primitive::Backdrop { size, color } => group.add(
            Rectangle::new()
                .set("width", size.x)
                .set("height", size.y)
                .set("rx", 12)
                .set("fill", color_hex(*color)),
        ),
        Primitive::GridLine { from, to, color } => group.add(
            Line::new()
                .set("x1", from.x)
                .set("y1", from.y)
                .set("x2", to.x)
                .set("y2", to.y)
                .set("stroke", color_hex(*color))
                .set("stroke-width", 1),
        ),
        Primitive::Connector {
            path,
            style,
            reveal,
        } => group.add(
            SvgPath::new()
                .set("d", path.to_svg_d())
                .set("fill", "none")
                .set("stroke", color_hex(style.color))
                .set("stroke-opacity", style.opacity * reveal)
                .set("stroke-width", style.width)
                .set("stroke-linecap", "round"),
        ),
        Primitive::Glow {
            center,
            radius,
            color,
            opacity,
        } => group.add(
            Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", radius.max(0.0))
                .set("fill", color_hex(*color))
                .set("fill-opacity", *opacity),
        ),
        Primitive::Node {
            id,
            center,
            radius,
            fill,
            outline,
            hovered,
            opacity,
        } => group.add(
            Circle::new()
                .set("data-node-id", id.as_str())
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", radius.max(0.0))
                .set("fill", color_hex(*fill))
                .set("stroke", color_hex(*outline))
                .set("stroke-width", if *hovered { 3 } else { 2 })
                .set("opacity", *opacity),
        ),
        Primitive::ProgressRing {
            center,
            radius,
            width,
            fraction,
            track,
            fill,
            opacity,
        } => {
            let circumference = std::f32::consts::TAU * radius;
            let track_circle = Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *radius)
                .set("fill", "none")
                .set("stroke", color_hex(*track))
                .set("stroke-width", *width)
                .set("opacity", *opacity);
            let arc = Circle::new()
                .set("cx", center.x)
                .set("cy", center.y)
                .set("r", *radius)
                .set("fill", "none")
                .set("stroke", color_hex(*fill))
                .set("stroke-width", *width)
                .set(
                    "stroke-dasharray",
                    format!("{} {}", circumference * fraction, circumference),
                )
                // Start at 12 o'clock like the raster ring.
                .set("transform", format!("rotate(-90 {} {})", center.x, center.y))
                .set("opacity", *opacity);
            group.add(track_circle).add(arc)
        }
        Primitive::Label {
            anchor,
            text,
            size,
            color,
            opacity,
        } => group.add(
            Text::new("")
                .set("x", anchor.x)
                .set("y", anchor.y)
                .set("font-size", *size)
                .set("font-family", FONT_FAMILY)
                .set("fill", color_hex(*color))
                .set("fill-opacity", *opacity)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "hanging")
                .add(SvgText::new(text.clone())),
        ),
    }
}

fn add_overlay(document: Document, item: &Overlay) -> Document {
    match item {
        Overlay::Panel { rect, fill, border } => document.add(
            Rectangle::new()
                .set("x", rect.x)
                .set("y", rect.y)
                .set("width", rect.w)
                .set("height", rect.h)
                .set("rx", 6)
                .set("fill", color_hex(*fill))
                .set("fill-opacity", 0.95)
                .set("stroke", color_hex(*border)),
        ),
        Overlay::Text {
            x,
            y,
            text,
            color,
            scale,
        } => document.add(
            Text::new("")
                .set("x", *x)
                .set("y", *y)
                .set("font-size", line_advance_y(*scale))
                .set("font-family", FONT_FAMILY)
                .set("fill", color_hex(*color))
                .set("dominant-baseline", "hanging")
                .add(SvgText::new(text.clone())),
        ),
        Overlay::Button {
            control,
            rect,
            label,
            fill,
            border,
            text,
            pressed,
        } => {
            let button = Group::new()
                .set("class", "zoom-control")
                .set("data-control", format!("{control:?}"))
                .add(
                    Rectangle::new()
                        .set("x", rect.x)
                        .set("y", rect.y)
                        .set("width", rect.w)
                        .set("height", rect.h)
                        .set("rx", 6)
                        .set("fill", color_hex(if *pressed { *border } else { *fill }))
                        .set("stroke", color_hex(*border)),
                )
                .add(
                    Text::new("")
                        .set("x", rect.x as f32 + rect.w as f32 / 2.0)
                        .set("y", rect.y as f32 + rect.h as f32 / 2.0)
                        .set("font-size", 14)
                        .set("font-family", FONT_FAMILY)
                        .set("fill", color_hex(*text))
                        .set("text-anchor", "middle")
                        .set("dominant-baseline", "middle")
                        .add(SvgText::new(*label)),
                );
            document.add(button)
        }
    }
}

fn color_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}
