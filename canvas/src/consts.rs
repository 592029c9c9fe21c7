//! Shared numeric constants for the canvas crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.25;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Multiplicative zoom change per wheel notch.
pub const ZOOM_STEP: f64 = 1.05;

// ── Connection curves ───────────────────────────────────────────

/// Fraction of the anchor-to-anchor distance used as the curve bulge.
pub const CURVE_BULGE_RATIO: f64 = 0.25;

/// Upper bound on the curve bulge, in world units.
pub const CURVE_BULGE_MAX: f64 = 40.0;

/// Connection stroke width at zoom 1.0, before the inverse-zoom scaling.
pub const CONNECTION_BASE_WIDTH: f64 = 4.0;

/// Floor for the committed connection stroke width.
pub const CONNECTION_MIN_WIDTH: f64 = 2.5;

/// Extra width of the glow pass beneath a committed connection.
pub const CONNECTION_GLOW_EXTRA: f64 = 6.0;

/// Floor for the link preview stroke width.
pub const PREVIEW_MIN_WIDTH: f64 = 2.0;

/// Extra width of the glow pass beneath the link preview.
pub const PREVIEW_GLOW_EXTRA: f64 = 4.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space radius in pixels within which an anchor circle is hit.
pub const ANCHOR_RADIUS_PX: f64 = 8.0;

/// Pointer travel in screen pixels below which a press/release counts as a click.
pub const CLICK_SLOP_PX: f64 = 3.0;

/// Content measurements within this many world units of the current size are ignored.
pub const RESIZE_EPSILON: f64 = 1.0;
