// src/export/logic.rs

use crate::db::log::ttlog_soft;
use crate::db::pool::DbPool;
use crate::db::queries::load_log_records;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::range::parse_range;
use crate::export::xlsx::write_log_workbook;
use crate::export::{ExportFormat, notify_export_success};
use crate::ui::messages::{info, warning};
use chrono::NaiveDate;
use std::path::Path;

/// High-level export of the tracker log.
pub struct ExportLogic;

impl ExportLogic {
    /// Export tracker log rows.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or an expression accepted by `parse_range`
    ///
    /// Returns the number of exported rows.
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let bounds = resolve_bounds(range)?;
        let records = load_log_records(&pool.conn, bounds)?;

        if records.is_empty() {
            warning("No log rows found for the selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&records, path)?,
            ExportFormat::Json => export_json(&records, path)?,
            ExportFormat::Xlsx => {
                info(format!("Exporting to XLSX: {}", path.display()));
                write_log_workbook(&records, path)?;
                notify_export_success("XLSX", path);
            }
        }

        ttlog_soft(
            &pool.conn,
            "export",
            format.as_str(),
            &format!("{} rows exported to {}", records.len(), path.display()),
        );

        Ok(records.len())
    }
}

/// `None` and `"all"` mean "no filter".
pub fn resolve_bounds(range: Option<&str>) -> AppResult<Option<(NaiveDate, NaiveDate)>> {
    match range {
        None => Ok(None),
        Some(r) if r.eq_ignore_ascii_case("all") => Ok(None),
        Some(r) => Ok(Some(parse_range(r)?)),
    }
}
