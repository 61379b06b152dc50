// src/export/mod.rs

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
pub mod range;

pub use logic::ExportLogic;
pub use range::parse_range;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for every export.
pub(crate) fn notify_export_success(label: &str, rows: usize, path: &Path) {
    success(format!(
        "{label} export completed ({rows} rows): {}",
        path.display()
    ));
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Which records an export writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportDataset {
    Bookings,
    Exclusive,
    Flexi,
    FlexiLogs,
    Pantry,
    Report,
}

impl ExportDataset {
    pub fn label(&self) -> &'static str {
        match self {
            ExportDataset::Bookings => "bookings",
            ExportDataset::Exclusive => "exclusive",
            ExportDataset::Flexi => "flexi",
            ExportDataset::FlexiLogs => "flexi-logs",
            ExportDataset::Pantry => "pantry",
            ExportDataset::Report => "report",
        }
    }
}
