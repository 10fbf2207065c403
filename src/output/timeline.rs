use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use tracing::{debug, info, warn};

use crate::data::dates::extract_year;
use crate::data::model::OccurrenceTable;

// ---------------------------------------------------------------------------
// Discovery timeline (year histogram, PNG)
// ---------------------------------------------------------------------------

const WIDTH: u32 = 1500;
const HEIGHT: u32 = 600;

const MARGIN_LEFT: u32 = 70;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 50;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const BAR: Rgb<u8> = Rgb([139, 0, 0]); // dark red
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);

/// Count matched records per extracted collection year.
pub fn year_counts(table: &OccurrenceTable) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for row in &table.rows {
        if let Some(year) = extract_year(row.cell("collection_dates")) {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    counts
}

/// Render the discoveries-per-year bar chart. Returns `false` (and
/// writes nothing) when no row yields an extractable year.
pub fn render_timeline(table: &OccurrenceTable, path: &Path) -> Result<bool> {
    debug!("creating discovery timeline");
    let counts = year_counts(table);
    debug!(
        valid_years = counts.values().sum::<usize>(),
        "extracted years from collection dates"
    );

    if counts.is_empty() {
        warn!("no valid years found for timeline plot");
        return Ok(false);
    }

    let chart = draw_chart(&counts);
    chart
        .save(path)
        .with_context(|| format!("writing timeline to {}", path.display()))?;

    info!("timeline plot saved to {}", path.display());
    Ok(true)
}

// ---------------------------------------------------------------------------
// Chart drawing
// ---------------------------------------------------------------------------

fn draw_chart(counts: &BTreeMap<i32, usize>) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    // counts is non-empty here; min/max/peak all exist.
    let min_year = counts.keys().min().copied().unwrap_or(0);
    let max_year = counts.keys().max().copied().unwrap_or(0);
    let peak = counts.values().max().copied().unwrap_or(1).max(1);

    let plot_w = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) as f64;
    let plot_h = (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) as f64;
    let base_y = HEIGHT - MARGIN_BOTTOM;
    let span = (max_year - min_year + 1) as f64;
    let slot_w = plot_w / span;

    // Horizontal gridlines with count labels on the y axis.
    let step = (peak as f64 / 5.0).ceil().max(1.0) as usize;
    let mut level = step;
    while level <= peak {
        let y = base_y - (level as f64 / peak as f64 * plot_h) as u32;
        hline(&mut img, MARGIN_LEFT, WIDTH - MARGIN_RIGHT, y, GRID);
        let label_w = number_width(level as i64);
        draw_number(
            &mut img,
            MARGIN_LEFT.saturating_sub(label_w + 8),
            y.saturating_sub(GLYPH_HEIGHT / 2),
            level as i64,
            AXIS,
        );
        level += step;
    }

    // One slot per calendar year so gaps in the record stay visible.
    for (year, count) in counts {
        let i = (year - min_year) as f64;
        let x0 = MARGIN_LEFT as f64 + i * slot_w + slot_w * 0.1;
        let bar_w = (slot_w * 0.8).max(1.0);
        let bar_h = (*count as f64 / peak as f64 * plot_h) as u32;
        fill_rect(
            &mut img,
            x0 as u32,
            base_y - bar_h,
            bar_w as u32,
            bar_h,
            BAR,
        );
    }

    // Axes on top of the gridlines.
    hline(&mut img, MARGIN_LEFT, WIDTH - MARGIN_RIGHT, base_y, AXIS);
    vline(&mut img, MARGIN_LEFT, MARGIN_TOP, base_y, AXIS);

    // Year labels, thinned so four-digit numbers never collide.
    let year_label_w = number_width(max_year as i64).max(number_width(min_year as i64));
    let label_every = ((year_label_w + 12) as f64 / slot_w).ceil().max(1.0) as i32;
    for year in (min_year..=max_year).step_by(label_every as usize) {
        let i = (year - min_year) as f64;
        let center = MARGIN_LEFT as f64 + i * slot_w + slot_w / 2.0;
        let x = (center as u32).saturating_sub(number_width(year as i64) / 2);
        draw_number(&mut img, x, base_y + 8, year as i64, AXIS);
    }

    img
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for yy in y..y.saturating_add(h).min(img.height()) {
        for xx in x..x.saturating_add(w).min(img.width()) {
            img.put_pixel(xx, yy, color);
        }
    }
}

fn hline(img: &mut RgbImage, x0: u32, x1: u32, y: u32, color: Rgb<u8>) {
    if y < img.height() {
        for x in x0..x1.min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

fn vline(img: &mut RgbImage, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    if x < img.width() {
        for y in y0..y1.min(img.height()) {
            img.put_pixel(x, y, color);
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric labels – a small 5x7 digit face, scaled 2x
// ---------------------------------------------------------------------------

const GLYPH_SCALE: u32 = 2;
const GLYPH_WIDTH: u32 = 5 * GLYPH_SCALE;
const GLYPH_HEIGHT: u32 = 7 * GLYPH_SCALE;
const GLYPH_SPACING: u32 = GLYPH_SCALE;

/// Row bitmaps for '0'..'9', bit 4 = leftmost column.
const DIGITS: [[u8; 7]; 10] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
];

/// Pixel width of `value` rendered by [`draw_number`].
fn number_width(value: i64) -> u32 {
    let digits = value.abs().to_string().len() as u32;
    digits * GLYPH_WIDTH + digits.saturating_sub(1) * GLYPH_SPACING
}

/// Stamp a non-negative decimal number with its top-left corner at (x, y).
fn draw_number(img: &mut RgbImage, x: u32, y: u32, value: i64, color: Rgb<u8>) {
    let mut cursor = x;
    for ch in value.abs().to_string().bytes() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (1 << (4 - col)) != 0 {
                    fill_rect(
                        img,
                        cursor + col * GLYPH_SCALE,
                        y + row as u32 * GLYPH_SCALE,
                        GLYPH_SCALE,
                        GLYPH_SCALE,
                        color,
                    );
                }
            }
        }
        cursor += GLYPH_WIDTH + GLYPH_SPACING;
    }
}
