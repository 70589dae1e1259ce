//! # CSV Export
//!
//! Renders report rows to semicolon-delimited CSV files.
//!
//! ## Boundary
//! ```text
//! Reports (typed rows) ──► format via AppConfig ──► CSV file on disk
//!                          (currency, dates)        (";" delimiter,
//!                                                    optional UTF-8 BOM)
//! ```
//!
//! All display formatting happens here, driven by [`AppConfig`]; the
//! rows themselves stay numeric. Spreadsheet and PDF renderers are
//! external collaborators and consume the same (headers, rows) shape.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use caja_core::Money;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::reports::{InvoiceReportRow, LowStockRow};

/// Field delimiter used in export files, matching the legacy report
/// format spreadsheet users already rely on.
const DELIMITER: u8 = b';';

/// UTF-8 byte-order mark.
const BOM: &[u8] = b"\xef\xbb\xbf";

// =============================================================================
// Generic Writer
// =============================================================================

/// Writes a header row plus data rows as CSV at `path`.
///
/// Creates parent directories on demand. With `include_bom` the file
/// starts with a UTF-8 BOM.
pub fn write_csv(
    path: &Path,
    headers: &[&str],
    rows: &[Vec<String>],
    include_bom: bool,
) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    if include_bom {
        file.write_all(BOM)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(file);

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "CSV written");

    Ok(())
}

/// `<prefix>_<YYYYMMDD>_<HHMMSS>.csv` under the configured export dir.
fn timestamped_path(config: &AppConfig, prefix: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    config
        .reports
        .export_dir
        .join(format!("{prefix}_{stamp}.csv"))
}

// =============================================================================
// Report Exports
// =============================================================================

/// Exports an invoice report. Returns the path written.
pub fn export_invoice_report(
    config: &AppConfig,
    rows: &[InvoiceReportRow],
) -> AppResult<PathBuf> {
    let headers = [
        "Number", "Date", "Customer", "Employee", "Subtotal", "Tax", "Total", "Status", "Notes",
    ];

    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.number.clone(),
                config.format_date(row.date),
                row.customer.clone().unwrap_or_else(|| "N/A".to_string()),
                row.employee.clone().unwrap_or_else(|| "N/A".to_string()),
                config.format_currency(Money::from_cents(row.subtotal_cents)),
                config.format_currency(Money::from_cents(row.tax_cents)),
                config.format_currency(Money::from_cents(row.total_cents)),
                row.status.label().to_string(),
                row.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let path = timestamped_path(config, "invoice_report");
    write_csv(&path, &headers, &data, config.reports.utf8_bom)?;

    Ok(path)
}

/// Exports a low-stock report. Returns the path written.
pub fn export_low_stock(config: &AppConfig, rows: &[LowStockRow]) -> AppResult<PathBuf> {
    let headers = ["Product", "Category", "Stock"];

    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.name.clone(),
                row.category.clone().unwrap_or_else(|| "N/A".to_string()),
                row.stock.to_string(),
            ]
        })
        .collect();

    let path = timestamped_path(config, "low_stock");
    write_csv(&path, &headers, &data, config.reports.utf8_bom)?;

    Ok(path)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::InvoiceStatus;
    use chrono::NaiveDate;

    fn test_config(dir_name: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.reports.export_dir = std::env::temp_dir().join(dir_name);
        config
    }

    fn sample_row() -> InvoiceReportRow {
        InvoiceReportRow {
            id: 1,
            number: "FAC-000001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
            subtotal_cents: 10_000,
            tax_cents: 1_800,
            total_cents: 11_800,
            status: InvoiceStatus::Pending,
            notes: None,
            customer: Some("Juan Perez".to_string()),
            employee: None,
            sale_id: Some(4),
        }
    }

    #[test]
    fn test_export_invoice_report() {
        let config = test_config("caja_export_invoice_test");

        let path = export_invoice_report(&config, &[sample_row()]).unwrap();
        let bytes = std::fs::read(&path).unwrap();

        // BOM, then semicolon-delimited content
        assert!(bytes.starts_with(BOM));
        let text = String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Number;Date;Customer;Employee;Subtotal;Tax;Total;Status;Notes"
        );
        assert_eq!(
            lines.next().unwrap(),
            "FAC-000001;07/08/2026;Juan Perez;N/A;S/ 100.00;S/ 18.00;S/ 118.00;Pending;"
        );

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_without_bom() {
        let mut config = test_config("caja_export_no_bom_test");
        config.reports.utf8_bom = false;

        let path = export_low_stock(
            &config,
            &[LowStockRow {
                id: 1,
                name: "Stapler".to_string(),
                stock: 2,
                category: None,
            }],
        )
        .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(!bytes.starts_with(BOM));

        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Product;Category;Stock"));
        assert!(text.contains("Stapler;N/A;2"));

        std::fs::remove_file(&path).ok();
    }
}
