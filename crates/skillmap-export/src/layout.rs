//! Page geometry of the PDF report.
//!
//! All lengths are millimetres with the origin at the bottom-left corner of a
//! landscape A4 page. Font sizes and label nudges are given in points.

use serde::Deserialize;

pub const COLUMNS: usize = 4;
pub const ROWS: usize = 2;
pub const WORKERS_PER_PAGE: usize = COLUMNS * ROWS;

/// Landscape A4
pub const PAGE_WIDTH_MM: f64 = 297.0;
pub const PAGE_HEIGHT_MM: f64 = 210.0;

pub const MM_PER_INCH: f64 = 25.4;
pub const MM_PER_PT: f64 = MM_PER_INCH / 72.0;

/// Tunable layout values; unset sizes are derived from the page and margin
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PdfLayoutConfig {
    pub margin_in: f64,
    pub frame_width_mm: Option<f64>,
    pub frame_height_mm: Option<f64>,
    pub chart_radius_mm: Option<f64>,
}

impl Default for PdfLayoutConfig {
    fn default() -> Self {
        Self {
            margin_in: 0.5,
            frame_width_mm: None,
            frame_height_mm: None,
            chart_radius_mm: None,
        }
    }
}

/// Resolved page geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub frame_width: f64,
    pub frame_height: f64,
    pub chart_radius: f64,
}

/// One worker's frame on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Zero-based page number
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageLayout {
    pub fn from_config(config: &PdfLayoutConfig) -> Self {
        let margin = config.margin_in * MM_PER_INCH;
        let frame_width = config
            .frame_width_mm
            .unwrap_or((PAGE_WIDTH_MM - 2.5 * margin) / COLUMNS as f64);
        let frame_height = config
            .frame_height_mm
            .unwrap_or((PAGE_HEIGHT_MM - 3.0 * margin) / ROWS as f64);
        let chart_radius = config.chart_radius_mm.unwrap_or(frame_height * 0.25);

        Self {
            page_width: PAGE_WIDTH_MM,
            page_height: PAGE_HEIGHT_MM,
            margin,
            frame_width,
            frame_height,
            chart_radius,
        }
    }

    /// Pages needed for `workers` frames; an empty report still has one page
    pub fn page_count(workers: usize) -> usize {
        workers.div_ceil(WORKERS_PER_PAGE).max(1)
    }

    /// Frame of the `index`-th worker, filling each page row by row
    pub fn cell(&self, index: usize) -> Cell {
        let slot = index % WORKERS_PER_PAGE;
        let column = slot % COLUMNS;
        let row = slot / COLUMNS;

        let x = 0.8 * self.margin + column as f64 * self.frame_width;
        let y = self.page_height - (row + 1) as f64 * (self.margin + self.frame_height);

        Cell {
            page: index / WORKERS_PER_PAGE,
            x,
            y,
            width: self.frame_width,
            height: self.frame_height,
        }
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::from_config(&PdfLayoutConfig::default())
    }
}

impl Cell {
    /// Centre of the radar chart, raised above the frame's midpoint
    pub fn chart_center(&self, radius: f64) -> (f64, f64) {
        (
            self.x + self.width / 2.0,
            self.y + self.height / 2.0 + radius * 0.5,
        )
    }

    /// Height of the line separating chart and name
    pub fn separator_y(&self) -> f64 {
        self.y + self.height * 0.25
    }

    /// Closed outline of the frame
    pub fn outline(&self) -> [(f64, f64); 4] {
        [
            (self.x, self.y),
            (self.x + self.width, self.y),
            (self.x + self.width, self.y + self.height),
            (self.x, self.y + self.height),
        ]
    }
}

/// Convert a chart axis angle (clockwise from up, radians) to degrees
/// counter-clockwise from the +x axis, in `[0, 360)`
pub fn standard_degrees(axis_angle: f64) -> f64 {
    (90.0 - axis_angle.to_degrees()).rem_euclid(360.0)
}

/// Label nudge `(dx, dy)` in points for a label at `degrees` (standard angle).
/// Pushes labels away from the polygon so neighbours do not overlap.
pub fn label_offset(degrees: f64) -> (f64, f64) {
    let degrees = degrees.rem_euclid(360.0);
    match degrees {
        d if !(25.0..335.0).contains(&d) => (5.0, -5.0),
        d if d < 65.0 => (3.0, 3.0),
        d if d < 115.0 => (0.0, 5.0),
        d if d < 155.0 => (-3.0, 3.0),
        d if d < 205.0 => (-5.0, -5.0),
        d if d < 245.0 => (-3.0, -5.0),
        d if d < 295.0 => (0.0, -10.0),
        _ => (3.0, -5.0),
    }
}

/// Labels longer than this wrap onto two lines at a space
const WRAP_AT: usize = 10;

pub fn wrap_label(label: &str) -> Vec<String> {
    let length = label.chars().count();
    if length <= WRAP_AT {
        return vec![label.to_string()];
    }

    let middle = label.len() / 2;
    let split = label
        .match_indices(' ')
        .map(|(index, _)| index)
        .min_by_key(|index| index.abs_diff(middle));

    match split {
        Some(index) => vec![label[..index].to_string(), label[index + 1..].to_string()],
        None => vec![label.to_string()],
    }
}

/// Rough rendered width in mm, for centring text without font metrics.
/// Wide (non-ASCII) glyphs count as a full em.
pub fn estimate_text_width(text: &str, size_pt: f64) -> f64 {
    let ems: f64 = text
        .chars()
        .map(|c| if c.is_ascii() { 0.55 } else { 1.0 })
        .sum();
    ems * size_pt * MM_PER_PT
}
