//! Paginated radar-chart report.
//!
//! Workers are laid out four across and two down per landscape page, in the
//! order given. Each frame holds a radar chart of the worker's levels with
//! category labels, a separator, and the worker's name.

use crate::canvas::{Ink, PdfCanvas, ReportCanvas};
use crate::error::Result;
use crate::layout::{
    estimate_text_width, label_offset, standard_degrees, wrap_label, Cell, PageLayout, MM_PER_PT,
};
use serde::Serialize;
use skillmap_analysis::{axis_angle, gridline_radii, radar_points};
use skillmap_types::ReportEntry;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const NAME_SIZE_PT: f64 = 8.0;
const LABEL_SIZE_PT: f64 = 6.0;
const LABEL_LINE_PT: f64 = 10.0;
const LABEL_RADIUS: f64 = 1.15;
const CIRCLE_SEGMENTS: usize = 72;

/// A worker left out of the report, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedWorker {
    pub name: String,
    pub reason: String,
}

/// What a render pass produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub pages: usize,
    pub drawn: Vec<String>,
    pub skipped: Vec<SkippedWorker>,
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfReport {
    pub path: PathBuf,
    pub summary: RenderSummary,
}

pub struct PdfExporter {
    layout: PageLayout,
    font_path: Option<PathBuf>,
}

impl PdfExporter {
    pub fn new(layout: PageLayout, font_path: Option<PathBuf>) -> Self {
        Self { layout, font_path }
    }

    /// Render `entries` and write the document to `output_path`.
    ///
    /// Malformed entries are skipped and listed in the summary; only document
    /// or file errors fail the export.
    pub fn export(&self, entries: &[ReportEntry], output_path: &Path) -> Result<PdfReport> {
        let mut canvas = PdfCanvas::new(
            "Skill Report",
            self.layout.page_width,
            self.layout.page_height,
            self.font_path.as_deref(),
        )?;

        let summary = self.render(entries, &mut canvas);
        canvas.save(output_path)?;

        info!(
            "Exported PDF report {} ({} pages, {} drawn, {} skipped)",
            output_path.display(),
            summary.pages,
            summary.drawn.len(),
            summary.skipped.len()
        );
        Ok(PdfReport {
            path: output_path.to_path_buf(),
            summary,
        })
    }

    /// Draw every entry onto `canvas`, adding pages as needed
    pub fn render<C: ReportCanvas>(&self, entries: &[ReportEntry], canvas: &mut C) -> RenderSummary {
        let mut summary = RenderSummary {
            pages: PageLayout::page_count(entries.len()),
            ..RenderSummary::default()
        };
        let mut current_page = 0;

        for (index, entry) in entries.iter().enumerate() {
            let cell = self.layout.cell(index);
            while current_page < cell.page {
                canvas.new_page();
                current_page += 1;
            }

            canvas.set_stroke(Ink::BLACK, 1.0);
            canvas.polyline(&cell.outline(), true);

            if let Some(reason) = malformed_reason(entry) {
                warn!("Skipping chart for {}: {}", entry.name, reason);
                summary.skipped.push(SkippedWorker {
                    name: entry.name.clone(),
                    reason,
                });
                continue;
            }

            debug!("Drawing chart for worker: {}", entry.name);
            self.draw_worker(canvas, &cell, entry);
            summary.drawn.push(entry.name.clone());
        }

        summary
    }

    fn draw_worker<C: ReportCanvas>(&self, canvas: &mut C, cell: &Cell, entry: &ReportEntry) {
        let radius = self.layout.chart_radius;
        let center = cell.chart_center(radius);

        draw_scale(canvas, center, radius, entry.categories.len());

        let polygon: Vec<(f64, f64)> =
            radar_points(&entry.skill_levels, entry.categories.len(), radius)
                .into_iter()
                .map(|(x, y)| (center.0 + x, center.1 + y))
                .collect();
        canvas.set_stroke(Ink::BLUE, 2.0);
        canvas.polyline(&polygon, true);

        draw_category_labels(canvas, center, radius, &entry.categories);

        let line_y = cell.separator_y();
        canvas.set_stroke(Ink::BLACK, 1.0);
        canvas.polyline(&[(cell.x, line_y), (cell.x + cell.width, line_y)], false);

        let name_width = estimate_text_width(&entry.name, NAME_SIZE_PT);
        let name_height = NAME_SIZE_PT * MM_PER_PT;
        canvas.text(
            &entry.name,
            NAME_SIZE_PT,
            center.0 - name_width / 2.0,
            line_y - name_height * 1.5,
        );
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(PageLayout::default(), None)
    }
}

fn malformed_reason(entry: &ReportEntry) -> Option<String> {
    if entry.is_well_formed() {
        None
    } else if entry.categories.is_empty() || entry.skill_levels.is_empty() {
        Some("missing categories or skill levels".to_string())
    } else {
        Some(format!(
            "mismatched lengths (skills: {}, categories: {})",
            entry.skill_levels.len(),
            entry.categories.len()
        ))
    }
}

fn circle(center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = axis_angle(i, CIRCLE_SEGMENTS);
            (center.0 + radius * angle.sin(), center.1 + radius * angle.cos())
        })
        .collect()
}

/// Gridline rings and one spoke per category
fn draw_scale<C: ReportCanvas>(canvas: &mut C, center: (f64, f64), radius: f64, axes: usize) {
    canvas.set_stroke(Ink::BLACK, 0.5);
    for ring in gridline_radii(radius) {
        canvas.polyline(&circle(center, ring), true);
    }
    for index in 0..axes {
        let angle = axis_angle(index, axes);
        let tip = (center.0 + radius * angle.sin(), center.1 + radius * angle.cos());
        canvas.polyline(&[center, tip], false);
    }
}

fn draw_category_labels<C: ReportCanvas>(
    canvas: &mut C,
    center: (f64, f64),
    radius: f64,
    categories: &[String],
) {
    let label_radius = radius * LABEL_RADIUS;

    for (index, category) in categories.iter().enumerate() {
        let angle = axis_angle(index, categories.len());
        let (sin, cos) = angle.sin_cos();
        let vertex = (center.0 + radius * sin, center.1 + radius * cos);
        let anchor = (center.0 + label_radius * sin, center.1 + label_radius * cos);

        canvas.set_stroke(Ink::GREY, 0.3);
        canvas.polyline(&[vertex, anchor], false);

        let (dx, dy) = label_offset(standard_degrees(angle));
        let lines = wrap_label(category);
        let last = lines.len() - 1;

        canvas.set_stroke(Ink::BLACK, 0.3);
        for (row, line) in lines.iter().enumerate() {
            let width = estimate_text_width(line, LABEL_SIZE_PT);
            let x = anchor.0 - width / 2.0 + dx * MM_PER_PT;
            let y = anchor.1 + ((last - row) as f64 * LABEL_LINE_PT - 2.5 + dy) * MM_PER_PT;
            canvas.text(line, LABEL_SIZE_PT, x, y);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Canvas that records calls instead of drawing
    #[derive(Default)]
    struct RecordingCanvas {
        pages: usize,
        polylines: Vec<Vec<(f64, f64)>>,
        texts: Vec<(usize, String)>,
    }

    impl RecordingCanvas {
        fn new() -> Self {
            Self {
                pages: 1,
                ..Self::default()
            }
        }

        fn texts_on_page(&self, page: usize) -> Vec<&str> {
            self.texts
                .iter()
                .filter(|(p, _)| *p == page)
                .map(|(_, t)| t.as_str())
                .collect()
        }
    }

    impl ReportCanvas for RecordingCanvas {
        fn new_page(&mut self) {
            self.pages += 1;
        }

        fn set_stroke(&mut self, _ink: Ink, _width_pt: f64) {}

        fn polyline(&mut self, points: &[(f64, f64)], _closed: bool) {
            self.polylines.push(points.to_vec());
        }

        fn text(&mut self, text: &str, _size_pt: f64, _x: f64, _y: f64) {
            self.texts.push((self.pages, text.to_string()));
        }
    }

    fn categories() -> Vec<String> {
        ["Pick", "Stow", "Pack", "Water Spider", "Buffer"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn workers(count: usize) -> Vec<ReportEntry> {
        (0..count)
            .map(|i| ReportEntry::new(format!("worker-{}", i), categories(), vec![3, 4, 5, 2, 1]))
            .collect()
    }

    #[test]
    fn test_nine_workers_make_two_pages() {
        let mut canvas = RecordingCanvas::new();
        let summary = PdfExporter::default().render(&workers(9), &mut canvas);

        assert_eq!(summary.pages, 2);
        assert_eq!(canvas.pages, 2);
        assert_eq!(summary.drawn.len(), 9);
        assert!(canvas.texts_on_page(2).contains(&"worker-8"));
        assert!(!canvas.texts_on_page(1).contains(&"worker-8"));
    }

    #[test]
    fn test_malformed_worker_is_skipped_not_fatal() {
        let mut entries = workers(9);
        entries[4].skill_levels.pop();

        let mut canvas = RecordingCanvas::new();
        let summary = PdfExporter::default().render(&entries, &mut canvas);

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.drawn.len(), 8);
        assert!(!summary.drawn.contains(&"worker-4".to_string()));
        assert_eq!(
            summary.skipped,
            vec![SkippedWorker {
                name: "worker-4".to_string(),
                reason: "mismatched lengths (skills: 4, categories: 5)".to_string(),
            }]
        );
        // The skipped worker still takes its slot
        assert!(canvas.texts_on_page(2).contains(&"worker-8"));
    }

    #[test]
    fn test_empty_entry_is_skipped() {
        let entries = vec![ReportEntry::new("empty", vec![], vec![])];
        let mut canvas = RecordingCanvas::new();
        let summary = PdfExporter::default().render(&entries, &mut canvas);

        assert_eq!(summary.skipped[0].reason, "missing categories or skill levels");
        assert!(summary.drawn.is_empty());
        // Frame only
        assert_eq!(canvas.polylines.len(), 1);
    }

    #[test]
    fn test_malformed_reasons() {
        let well_formed = ReportEntry::new("ok", vec!["a".into()], vec![2]);
        assert_eq!(malformed_reason(&well_formed), None);

        let no_levels = ReportEntry::new("x", vec!["a".into()], vec![]);
        assert_eq!(
            malformed_reason(&no_levels).as_deref(),
            Some("missing categories or skill levels")
        );

        let mismatched = ReportEntry::new("y", vec!["a".into(), "b".into()], vec![1]);
        assert_eq!(
            malformed_reason(&mismatched).as_deref(),
            Some("mismatched lengths (skills: 1, categories: 2)")
        );
    }

    #[test]
    fn test_worker_cell_contents() {
        let mut canvas = RecordingCanvas::new();
        PdfExporter::default().render(&workers(1), &mut canvas);

        // frame + 4 rings + 5 spokes + polygon + 5 label guides + separator
        assert_eq!(canvas.polylines.len(), 1 + 4 + 5 + 1 + 5 + 1);
        let texts = canvas.texts_on_page(1);
        assert!(texts.contains(&"worker-0"));
        assert!(texts.contains(&"Water"));
        assert!(texts.contains(&"Spider"));
    }

    #[test]
    fn test_chart_polygon_is_closed_around_center() {
        let exporter = PdfExporter::default();
        let mut canvas = RecordingCanvas::new();
        exporter.render(&workers(1), &mut canvas);

        let polygon = &canvas.polylines[1 + 4 + 5];
        assert_eq!(polygon.len(), 6);
        assert_eq!(polygon.first(), polygon.last());

        let layout = PageLayout::default();
        let center = layout.cell(0).chart_center(layout.chart_radius);
        for &(x, y) in polygon {
            let distance = ((x - center.0).powi(2) + (y - center.1).powi(2)).sqrt();
            assert!(distance <= layout.chart_radius + 1e-9);
        }
    }

    #[test]
    fn test_export_writes_pdf_with_fallback_font() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.pdf");
        let exporter = PdfExporter::new(
            PageLayout::default(),
            Some(dir.path().join("missing-font.ttf")),
        );

        let report = exporter.export(&workers(9), &path).unwrap();
        assert_eq!(report.path, path);
        assert_eq!(report.summary.pages, 2);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_to_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        assert!(PdfExporter::default().export(&workers(1), &path).is_err());
    }
}
