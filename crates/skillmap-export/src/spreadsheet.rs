//! Worker × category skill matrix as an `.xlsx` workbook

use crate::error::{ExportError, Result};
use rust_xlsxwriter::{Color, Format, Workbook};
use skillmap_types::{ReportEntry, SkillLevel};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sheet name used when none is configured
pub const DEFAULT_SHEET_NAME: &str = "Skill Matrix";

/// Header of the first column
pub const NAME_HEADER: &str = "name";

/// The matrix before it is written: header plus one row per worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillMatrix {
    pub header: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub name: String,
    /// One cell per category column; `None` where the worker lacks the category
    pub cells: Vec<Option<SkillLevel>>,
}

/// Lay out entries as a matrix over the union of their categories.
///
/// Columns follow the order in which categories are first seen.
pub fn build_matrix(entries: &[ReportEntry]) -> SkillMatrix {
    let mut categories: Vec<&str> = Vec::new();
    for entry in entries {
        for category in &entry.categories {
            if !categories.contains(&category.as_str()) {
                categories.push(category);
            }
        }
    }

    let rows = entries
        .iter()
        .map(|entry| MatrixRow {
            name: entry.name.clone(),
            cells: categories
                .iter()
                .map(|category| entry.level_of(category))
                .collect(),
        })
        .collect();

    let header = std::iter::once(NAME_HEADER)
        .chain(categories.iter().copied())
        .map(String::from)
        .collect();

    SkillMatrix { header, rows }
}

/// Background fill for a level cell (RGB)
pub fn level_fill(level: SkillLevel) -> u32 {
    match level {
        5 => 0x00FF00, // green
        4 => 0xFFFF00, // yellow
        3 => 0xFFA500, // orange
        2 => 0xFFC0CB, // pink
        _ => 0xFFFFFF,
    }
}

/// Writes the skill matrix workbook
pub struct SpreadsheetExporter {
    sheet_name: String,
}

impl SpreadsheetExporter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// Write `entries` to `output_path` and return the path written
    pub fn export(&self, entries: &[ReportEntry], output_path: &Path) -> Result<PathBuf> {
        let matrix = build_matrix(entries);
        debug!(
            "Spreadsheet matrix: {} workers x {} columns",
            matrix.rows.len(),
            matrix.header.len()
        );

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.as_str())?;

        for (col, title) in matrix.header.iter().enumerate() {
            worksheet.write_string(0, column(col)?, title)?;
        }

        for (index, row) in matrix.rows.iter().enumerate() {
            let row_number = data_row(index)?;
            worksheet.write_string(row_number, 0, &row.name)?;

            for (offset, cell) in row.cells.iter().enumerate() {
                if let Some(level) = cell {
                    let fill = Format::new().set_background_color(Color::RGB(level_fill(*level)));
                    worksheet.write_number_with_format(
                        row_number,
                        column(offset + 1)?,
                        f64::from(*level),
                        &fill,
                    )?;
                }
            }
        }

        workbook.save(output_path)?;
        info!(
            "Exported {} workers to spreadsheet {}",
            matrix.rows.len(),
            output_path.display()
        );
        Ok(output_path.to_path_buf())
    }
}

impl Default for SpreadsheetExporter {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

fn column(index: usize) -> Result<u16> {
    u16::try_from(index)
        .map_err(|_| ExportError::TooLarge(format!("{} category columns", index)))
}

/// Data rows start below the header
fn data_row(index: usize) -> Result<u32> {
    u32::try_from(index + 1).map_err(|_| ExportError::TooLarge(format!("{} worker rows", index)))
}
