use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ResultType;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// Sequential colour for a heatmap cell, pale for 0 and saturated at `max`.
pub fn heat_color(value: usize, max: usize) -> Color32 {
    let t = if max == 0 {
        0.0
    } else {
        (value as f32 / max as f32).clamp(0.0, 1.0)
    };
    hsl_to_color32(18.0, 0.85, 0.95 - 0.55 * t)
}

/// Fixed colours for the four result types, shared by the scatter and pie charts.
pub fn result_type_color(result_type: ResultType) -> Color32 {
    let palette = generate_palette(ResultType::ALL.len());
    ResultType::ALL
        .iter()
        .position(|r| *r == result_type)
        .map_or(Color32::GRAY, |i| palette[i])
}

// ---------------------------------------------------------------------------
// Color mapping: team name → Color32
// ---------------------------------------------------------------------------

/// Maps team names to distinct colours, stable for the lifetime of a table.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the (sorted) team list.
    pub fn new(labels: &[String]) -> Self {
        let mapping = labels
            .iter()
            .cloned()
            .zip(generate_palette(labels.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    /// Look up the colour for a given team.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
