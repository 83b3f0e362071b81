// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{parse_to_excel_date, parse_to_excel_duration};
use crate::models::log_record::{LOG_HEADERS, LogRecord};
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::fs;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthStr;

const DATE_COLUMNS: [usize; 3] = [0, 4, 6];
const DURATION_COLUMN: usize = 7;

/// Write the whole tracker log (header row + one row per record) to `path`.
///
/// The header is always written, so an empty slice produces a valid log
/// with no data rows.
pub fn write_log_workbook(records: &[LogRecord], path: &Path) -> AppResult<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Tracker Log").map_err(to_xlsx_error)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in LOG_HEADERS.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_xlsx_error)?;
    }

    worksheet.set_freeze_panes(1, 0).map_err(to_xlsx_error)?;

    let mut col_widths: Vec<usize> = LOG_HEADERS.iter().map(|h| h.width()).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, rec) in records.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in rec.to_row().iter().enumerate() {
            write_log_cell(worksheet, row, col, value, band_color)?;
            col_widths[col] = col_widths[col].max(value.width());
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_xlsx_error)?;
    }

    workbook.save(path).map_err(to_xlsx_error)?;
    Ok(())
}

/// A log workbook rendered beside its target and not yet visible there.
///
/// `publish` renames it over the target; dropping it unpublished removes
/// the partial file and leaves the target untouched.
pub struct StagedWorkbook {
    partial: PathBuf,
    target: PathBuf,
    published: bool,
}

impl StagedWorkbook {
    pub fn partial_path(&self) -> &Path {
        &self.partial
    }

    pub fn publish(mut self) -> AppResult<()> {
        fs::rename(&self.partial, &self.target).map_err(|e| {
            AppError::Persistence(format!("cannot replace {}: {e}", self.target.display()))
        })?;
        self.published = true;
        Ok(())
    }
}

impl Drop for StagedWorkbook {
    fn drop(&mut self) {
        if !self.published {
            let _ = fs::remove_file(&self.partial);
        }
    }
}

/// Render the log to `<target>.partial`; see `StagedWorkbook`.
pub fn stage_log_workbook(records: &[LogRecord], target: &Path) -> AppResult<StagedWorkbook> {
    if target.is_dir() {
        return Err(AppError::Persistence(format!(
            "log path is a directory: {}",
            target.display()
        )));
    }

    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");

    let staged = StagedWorkbook {
        partial: target.with_file_name(name),
        target: target.to_path_buf(),
        published: false,
    };
    write_log_workbook(records, &staged.partial)?;
    Ok(staged)
}

/// Dates, timestamps and the total go in as Excel numbers; everything else
/// (names, ids, the joined break list) stays text.
fn write_log_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: usize,
    s: &str,
    bg: Color,
) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    let numeric = if DATE_COLUMNS.contains(&col) {
        parse_to_excel_date(s)
    } else if col == DURATION_COLUMN {
        parse_to_excel_duration(s)
    } else {
        None
    };

    match numeric {
        Some((num_format, serial)) => {
            let fmt = base.set_num_format(num_format);
            worksheet
                .write_with_format(row, col as u16, serial, &fmt)
                .map_err(to_xlsx_error)?;
        }
        None => {
            worksheet
                .write_with_format(row, col as u16, s, &base)
                .map_err(to_xlsx_error)?;
        }
    }

    Ok(())
}

fn to_xlsx_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Persistence(format!("spreadsheet write failed: {e}"))
}
