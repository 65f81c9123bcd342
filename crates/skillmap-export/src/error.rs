//! Error types for report exports

use thiserror::Error;

/// Report export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Output file could not be created or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Workbook construction or save failed
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// PDF document construction or save failed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// More rows or columns than the output format can hold
    #[error("Report too large: {0}")]
    TooLarge(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, ExportError>;
