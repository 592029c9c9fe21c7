//! Rendering: draws the full board scene to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a read-only view of the engine and produces pixels. It does
//! not mutate any application state. Connection geometry comes from
//! [`crate::overlay`], so what is painted is exactly what the overlay tests see.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::doc::{EvidenceObject, ObjectKind};
use crate::engine::EngineCore;
use crate::geometry::{Anchor, Rect};
use crate::overlay::{Overlay, StrokePath};

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 5.0;
/// Anchor circle radius in screen pixels.
const ANCHOR_DRAW_RADIUS_PX: f64 = 5.0;
/// Inner padding of card text in world units.
const CARD_PADDING: f64 = 10.0;

const ACCENT: &str = "#7c3aed";
const ANCHOR_IDLE: &str = "#4a9eff";
const ANCHOR_LINKING: &str = "#ff4a4a";

/// Draw the full scene: cards, selection UI, anchors, and the connection overlay.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore) -> Result<(), JsValue> {
    let camera = core.camera;

    // Layer 1: clear and set up transforms.
    ctx.set_transform(core.dpr, 0.0, 0.0, core.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, core.viewport_width, core.viewport_height);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: cards in document order.
    for obj in core.doc.objects() {
        draw_card(ctx, obj)?;
    }

    // Layer 3: selection UI.
    for obj in core.doc.objects().iter().filter(|o| core.ui.selected.contains(&o.id)) {
        draw_selection(ctx, obj, camera.zoom)?;
    }
    if let Some(m) = core.marquee() {
        draw_marquee(ctx, m, camera.zoom)?;
    }

    // Layer 4: anchors, tinted while a link is in progress.
    let linking = core.linking().is_some();
    for obj in core.doc.objects() {
        draw_anchors(ctx, obj, camera.zoom, linking)?;
    }

    // Layer 5: connections above the cards.
    draw_overlay(ctx, &core.overlay());

    Ok(())
}

// =============================================================
// Cards
// =============================================================

fn card_colors(kind: ObjectKind) -> (&'static str, &'static str) {
    match kind {
        ObjectKind::Image => ("#1f2430", "#3b4252"),
        ObjectKind::Text => ("#fff8c4", "#d8c96a"),
        ObjectKind::Person => ("#232838", "#4a9eff"),
        ObjectKind::Location => ("#241f33", "#8b49fd"),
    }
}

fn card_caption(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Image => "Image",
        ObjectKind::Text => "Note",
        ObjectKind::Person => "Person",
        ObjectKind::Location => "Location",
    }
}

fn draw_card(ctx: &CanvasRenderingContext2d, obj: &EvidenceObject) -> Result<(), JsValue> {
    if obj.width <= 0.0 || obj.height <= 0.0 {
        return Ok(());
    }
    let kind = obj.kind();
    let (fill, stroke) = card_colors(kind);

    ctx.save();
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(obj.position.x, obj.position.y, obj.width, obj.height);
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(obj.position.x, obj.position.y, obj.width, obj.height);

    let text_color = if kind == ObjectKind::Text { "#1F1A17" } else { "#e6e6e6" };
    let max_w = (obj.width - CARD_PADDING * 2.0).max(1.0);
    ctx.set_fill_style_str(text_color);
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");

    ctx.set_font("11px sans-serif");
    ctx.fill_text(card_caption(kind), obj.position.x + CARD_PADDING, obj.position.y + CARD_PADDING)?;

    ctx.set_font("14px sans-serif");
    let label = fit_text_with_ellipsis(ctx, obj.label(), max_w);
    ctx.fill_text(&label, obj.position.x + CARD_PADDING, obj.position.y + CARD_PADDING + 18.0)?;

    ctx.restore();
    Ok(())
}

fn fit_text_with_ellipsis(ctx: &CanvasRenderingContext2d, text: &str, max_w: f64) -> String {
    let trimmed = text.lines().next().unwrap_or_default().trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if measured_text_width(ctx, trimmed) <= max_w {
        return trimmed.to_owned();
    }

    let ellipsis = "...";
    let mut chars: Vec<char> = trimmed.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}{}", chars.iter().collect::<String>().trim_end(), ellipsis);
        if measured_text_width(ctx, &candidate) <= max_w {
            return candidate;
        }
    }
    ellipsis.to_owned()
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => f64::INFINITY,
    }
}

// =============================================================
// Selection UI
// =============================================================

fn set_dash(ctx: &CanvasRenderingContext2d, dash_world: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    if dash_world > 0.0 {
        dash_array.push(&dash_world.into());
        dash_array.push(&dash_world.into());
    }
    ctx.set_line_dash(&dash_array)
}

fn draw_selection(ctx: &CanvasRenderingContext2d, obj: &EvidenceObject, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    set_dash(ctx, SELECTION_DASH_PX / zoom)?;
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(3.0 / zoom);
    ctx.stroke_rect(obj.position.x, obj.position.y, obj.width, obj.height);
    set_dash(ctx, 0.0)?;
    ctx.restore();
    Ok(())
}

fn draw_marquee(ctx: &CanvasRenderingContext2d, marquee: Rect, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_fill_style_str("rgba(124, 58, 237, 0.1)");
    ctx.set_line_width(1.0 / zoom);
    ctx.fill_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.stroke_rect(marquee.x, marquee.y, marquee.width, marquee.height);
    ctx.restore();
    Ok(())
}

fn draw_anchors(ctx: &CanvasRenderingContext2d, obj: &EvidenceObject, zoom: f64, linking: bool) -> Result<(), JsValue> {
    let radius = ANCHOR_DRAW_RADIUS_PX / zoom;
    ctx.save();
    ctx.set_fill_style_str(if linking { ANCHOR_LINKING } else { ANCHOR_IDLE });
    ctx.set_stroke_style_str("#fff");
    ctx.set_line_width(1.0 / zoom);
    for anchor in Anchor::EDGES {
        let pt = obj.position.add(anchor.offset(obj.width, obj.height));
        ctx.begin_path();
        ctx.arc(pt.x, pt.y, radius, 0.0, 2.0 * PI)?;
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Connections
// =============================================================

fn draw_overlay(ctx: &CanvasRenderingContext2d, overlay: &Overlay) {
    ctx.save();
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    for stroke in &overlay.strokes {
        ctx.set_stroke_style_str(stroke.color);
        ctx.set_line_width(stroke.width);
        ctx.begin_path();
        match stroke.path {
            StrokePath::Quadratic { from, ctrl, to } => {
                ctx.move_to(from.x, from.y);
                ctx.quadratic_curve_to(ctrl.x, ctrl.y, to.x, to.y);
            }
            StrokePath::Segment { from, to } => {
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
            }
        }
        ctx.stroke();
    }
    ctx.restore();
}
