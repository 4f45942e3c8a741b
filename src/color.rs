use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const TREND_LINE: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
pub const SCATTER_POINTS: Color32 = Color32::from_rgb(0xd6, 0x27, 0x28);
pub const FIT_LINE: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
pub const NOT_COMPUTABLE: Color32 = Color32::from_rgb(0x60, 0x60, 0x60);

// ---------------------------------------------------------------------------
// Diverging scale for correlation coefficients
// ---------------------------------------------------------------------------

const NEGATIVE: (u8, u8, u8) = (0x21, 0x66, 0xac);
const NEUTRAL: (u8, u8, u8) = (0xf7, 0xf7, 0xf7);
const POSITIVE: (u8, u8, u8) = (0xb2, 0x18, 0x2b);

fn linear(rgb: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(rgb.0, rgb.1, rgb.2)
        .into_format::<f32>()
        .into_linear()
}

/// Map a coefficient in [-1, 1] to blue (negative) → white → red (positive).
/// Mixing happens in linear RGB so the midpoint stays neutral.
pub fn correlation_color(r: Option<f64>) -> Color32 {
    let Some(r) = r.filter(|r| r.is_finite()) else {
        return NOT_COMPUTABLE;
    };
    let t = r.clamp(-1.0, 1.0) as f32;
    let end = if t < 0.0 { NEGATIVE } else { POSITIVE };
    let mixed = linear(NEUTRAL).mix(linear(end), t.abs());
    let rgb: Srgb<u8> = Srgb::from_linear(mixed);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `fill`.
pub fn text_color_on(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 150.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
