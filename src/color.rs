use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use rbi_dashboard::data::model::Impact;

/// Hue of the dashboard's sky-blue theme.
const THEME_HUE: f32 = 199.0;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` distinguishable shades of the theme blue, dark to light.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            // Nudge the hue as well so neighbouring lines don't blend.
            let hue = THEME_HUE - 10.0 + 20.0 * t;
            let hsl = Hsl::new(hue, 0.9, 0.30 + 0.40 * t);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: field name → Color32
// ---------------------------------------------------------------------------

/// Stable colour per field for one chart.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    pub fn new(fields: &[&str]) -> Self {
        let palette = generate_palette(fields.len());
        let mapping = fields
            .iter()
            .zip(palette)
            .map(|(f, c)| (f.to_string(), c))
            .collect();
        SeriesColors {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, field: &str) -> Color32 {
        self.mapping
            .get(field)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Card background of an announcement in the policy feed.
pub fn impact_color(impact: Impact) -> Color32 {
    match impact {
        Impact::Increase => Color32::from_rgb(0x02, 0x88, 0xd1),
        Impact::Decrease => Color32::from_rgb(0x4d, 0xd0, 0xe1),
        Impact::Positive | Impact::Neutral => Color32::from_rgb(0x81, 0xd4, 0xfa),
    }
}

/// Sequential blue scale for heatmap cells; `t` is clamped to `[0, 1]`.
pub fn heat_color(t: f64) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
    let light: Srgb = Hsl::new(THEME_HUE, 0.8, 0.93).into_color();
    let dark: Srgb = Hsl::new(THEME_HUE + 10.0, 0.9, 0.30).into_color();
    let lerp = |a: f32, b: f32| a + (b - a) * t;
    to_color32(Srgb::new(
        lerp(light.red, dark.red),
        lerp(light.green, dark.green),
        lerp(light.blue, dark.blue),
    ))
}
