//! Drawing surface used by the PDF report

use crate::error::{ExportError, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{info, warn};

/// Stroke colour, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ink {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Ink {
    pub const BLACK: Ink = Ink { r: 0.0, g: 0.0, b: 0.0 };
    pub const BLUE: Ink = Ink { r: 0.0, g: 0.0, b: 1.0 };
    pub const GREY: Ink = Ink { r: 0.5, g: 0.5, b: 0.5 };
}

/// Minimal vector drawing API (millimetres, origin bottom-left).
///
/// The surface starts with one open page.
pub trait ReportCanvas {
    /// Start a new page; later drawing goes there
    fn new_page(&mut self);

    /// Colour and width (points) for subsequent strokes and text
    fn set_stroke(&mut self, ink: Ink, width_pt: f64);

    fn polyline(&mut self, points: &[(f64, f64)], closed: bool);

    /// Draw `text` with its baseline starting at `(x, y)`
    fn text(&mut self, text: &str, size_pt: f64, x: f64, y: f64);
}

/// `ReportCanvas` backed by a printpdf document
pub struct PdfCanvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    width: Mm,
    height: Mm,
}

impl PdfCanvas {
    /// Create a document with one page of `width` x `height` mm.
    ///
    /// Embeds the TrueType font at `font_path` when it loads; otherwise falls
    /// back to built-in Helvetica, which cannot render non-Latin names.
    pub fn new(title: &str, width: f64, height: f64, font_path: Option<&Path>) -> Result<Self> {
        let width = Mm(width as f32);
        let height = Mm(height as f32);
        let (doc, page, layer) = PdfDocument::new(title, width, height, "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = load_font(&doc, font_path)?;

        Ok(Self {
            doc,
            layer,
            font,
            width,
            height,
        })
    }

    pub fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| ExportError::Pdf(format!("{:?}", e)))
    }
}

fn load_font(doc: &PdfDocumentReference, font_path: Option<&Path>) -> Result<IndirectFontRef> {
    if let Some(path) = font_path {
        let embedded = File::open(path)
            .map_err(|e| e.to_string())
            .and_then(|file| doc.add_external_font(file).map_err(|e| format!("{:?}", e)));

        match embedded {
            Ok(font) => {
                info!("Registered report font {}", path.display());
                return Ok(font);
            }
            Err(e) => warn!(
                "Font registration failed for {}: {}, using Helvetica",
                path.display(),
                e
            ),
        }
    }

    doc.add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}

fn point(x: f64, y: f64) -> (Point, bool) {
    (Point::new(Mm(x as f32), Mm(y as f32)), false)
}

impl ReportCanvas for PdfCanvas {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(self.width, self.height, "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
    }

    fn set_stroke(&mut self, ink: Ink, width_pt: f64) {
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(ink.r, ink.g, ink.b, None)));
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(ink.r, ink.g, ink.b, None)));
        self.layer.set_outline_thickness(width_pt as f32);
    }

    fn polyline(&mut self, points: &[(f64, f64)], closed: bool) {
        if points.len() < 2 {
            return;
        }
        self.layer.add_line(Line {
            points: points.iter().map(|&(x, y)| point(x, y)).collect(),
            is_closed: closed,
        });
    }

    fn text(&mut self, text: &str, size_pt: f64, x: f64, y: f64) {
        self.layer
            .use_text(text, size_pt as f32, Mm(x as f32), Mm(y as f32), &self.font);
    }
}
