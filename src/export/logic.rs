// src/export/logic.rs

use crate::core::report::load_report;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::Skipped;
use crate::db::queries::bookings::bookings_between;
use crate::db::queries::exclusive::exclusive_between;
use crate::db::queries::flexi::{accounts_sold_between, logs_between};
use crate::db::queries::pantry::transactions_between;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{
    BookingExport, ExclusiveExport, FlexiExport, FlexiLogExport, PantryExport, ReportRowExport,
};
use crate::export::range::parse_range;
use crate::export::{ExportDataset, ExportFormat};
use crate::ui::messages::{skipped_rows, warning};
use crate::utils::date::month_bounds;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

fn write_rows<T: Serialize>(
    format: ExportFormat,
    label: &str,
    rows: &[T],
    path: &Path,
) -> AppResult<usize> {
    if rows.is_empty() {
        warning(format!("No {label} found for the selected range."));
        return Ok(0);
    }

    match format {
        ExportFormat::Csv => export_csv(label, rows, path)?,
        ExportFormat::Json => export_json(label, rows, path)?,
    }
    Ok(rows.len())
}

impl ExportLogic {
    /// Export one dataset.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or one of the `parse_range` shapes. The
    ///   report dataset needs bounds and defaults to the month of `now`.
    ///
    /// Returns the number of rows written.
    #[allow(clippy::too_many_arguments)]
    pub fn export(
        pool: &DbPool,
        dataset: ExportDataset,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
        now: NaiveDateTime,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let label = dataset.label();
        let conn = &pool.conn;
        let mut skipped = Skipped::default();

        let written = match dataset {
            ExportDataset::Bookings => {
                let rows: Vec<BookingExport> = bookings_between(conn, bounds)?
                    .into_rows("booking", &mut skipped)
                    .iter()
                    .map(BookingExport::from)
                    .collect();
                write_rows(format, label, &rows, path)?
            }
            ExportDataset::Exclusive => {
                let rows: Vec<ExclusiveExport> = exclusive_between(conn, bounds)?
                    .into_rows("exclusive booking", &mut skipped)
                    .iter()
                    .map(ExclusiveExport::from)
                    .collect();
                write_rows(format, label, &rows, path)?
            }
            ExportDataset::Flexi => {
                let rows: Vec<FlexiExport> = accounts_sold_between(conn, bounds)?
                    .into_rows("flexi membership", &mut skipped)
                    .iter()
                    .map(FlexiExport::from)
                    .collect();
                write_rows(format, label, &rows, path)?
            }
            ExportDataset::FlexiLogs => {
                let rows: Vec<FlexiLogExport> = logs_between(conn, bounds)?
                    .into_rows("flexi visit", &mut skipped)
                    .iter()
                    .map(FlexiLogExport::from)
                    .collect();
                write_rows(format, label, &rows, path)?
            }
            ExportDataset::Pantry => {
                let rows: Vec<PantryExport> = transactions_between(conn, bounds)?
                    .into_rows("pantry sale", &mut skipped)
                    .iter()
                    .map(PantryExport::from)
                    .collect();
                write_rows(format, label, &rows, path)?
            }
            ExportDataset::Report => {
                let (from, to) = bounds.unwrap_or_else(|| month_bounds(now.date()));
                let (report, lost) = load_report(pool, from, to)?;
                skipped = lost;
                let rows: Vec<ReportRowExport> =
                    report.days.iter().map(ReportRowExport::from).collect();
                write_rows(format, label, &rows, path)?
            }
        };

        skipped_rows(skipped.counts());

        if written > 0 {
            ttlog(
                &pool.conn,
                "export",
                &path.to_string_lossy(),
                &format!(
                    "Exported {written} {label} rows as {}, {} unreadable skipped",
                    format.as_str(),
                    skipped.total()
                ),
            )?;
        }

        Ok(written)
    }
}
