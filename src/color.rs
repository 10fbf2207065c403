use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::OccurrenceTable;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct CSS hex colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            format!(
                "#{:02x}{:02x}{:02x}",
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: column value → hex colour
// ---------------------------------------------------------------------------

/// Maps the distinct values of one table column to distinct colours,
/// so markers from the same state share a colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, String>,
    default_color: String,
}

impl ColorMap {
    /// Build a colour map over the distinct rendered values of `column`.
    pub fn from_column(table: &OccurrenceTable, column: &str) -> ColorMap {
        let values: BTreeSet<String> = table
            .rows
            .iter()
            .map(|row| row.cell(column).to_string())
            .collect();
        let palette = generate_palette(values.len());
        let mapping = values.into_iter().zip(palette).collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: "#808080".to_string(),
        }
    }

    /// Look up the colour for a rendered value.
    pub fn color_for(&self, value: &str) -> &str {
        self.mapping
            .get(value)
            .unwrap_or(&self.default_color)
            .as_str()
    }

    /// Legend entries (value label → colour), sorted by label.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.as_str(), c.as_str()))
    }
}
