//! skillmap report exporters
//!
//! - `spreadsheet`: worker × category matrix as `.xlsx`, cells coloured by level
//! - `pdf`: radar chart per worker, eight to a landscape page
//!
//! Exporters are synchronous and write the whole file before returning.

#![deny(unsafe_code, unused_imports)]

pub mod canvas;
pub mod error;
pub mod layout;
pub mod naming;
pub mod pdf;
pub mod spreadsheet;

pub use canvas::{Ink, PdfCanvas, ReportCanvas};
pub use error::ExportError;
pub use layout::{PageLayout, PdfLayoutConfig};
pub use naming::{timestamped_file_name, timestamped_path, unused_timestamped_path};
pub use pdf::{PdfExporter, PdfReport, RenderSummary, SkippedWorker};
pub use spreadsheet::{build_matrix, SkillMatrix, SpreadsheetExporter, DEFAULT_SHEET_NAME};
