//! # Application Configuration
//!
//! Typed configuration loaded from a TOML file.
//!
//! ## Configuration Sources
//! 1. `caja.toml` (or any caller-chosen path)
//! 2. Defaults (this file) when the file or individual keys are absent
//!
//! Configuration drives RENDERING only: currency symbol and separators,
//! report date format, export directory, stock alert level. The
//! sale/invoice arithmetic in caja-core is independent of all of it.
//!
//! ## Example File
//! ```toml
//! [currency]
//! symbol = "S/"
//! code = "PEN"
//! decimal_places = 2
//!
//! [reports]
//! export_dir = "exports"
//! utf8_bom = true
//! date_format = "%d/%m/%Y"
//!
//! [stock]
//! alert_level = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use caja_core::Money;

use crate::error::{AppError, AppResult};

// =============================================================================
// Sections
// =============================================================================

/// Currency display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    /// Symbol prefixed to formatted amounts.
    pub symbol: String,

    /// ISO 4217 code.
    pub code: String,

    /// Digits after the decimal separator (clamped to cents precision).
    pub decimal_places: u8,

    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        CurrencyConfig {
            symbol: "S/".to_string(),
            code: "PEN".to_string(),
            decimal_places: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Report and export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Directory export files are written into (created on demand).
    pub export_dir: PathBuf,

    /// Prefix CSV files with a UTF-8 byte-order mark so spreadsheet
    /// applications pick the right encoding.
    pub utf8_bom: bool,

    /// chrono format string for dates in reports.
    pub date_format: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        ReportsConfig {
            export_dir: PathBuf::from("exports"),
            utf8_bom: true,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

/// Stock monitoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// Stock level at or below which a product appears in the low-stock
    /// report.
    pub alert_level: i64,
}

impl Default for StockConfig {
    fn default() -> Self {
        StockConfig { alert_level: 10 }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub currency: CurrencyConfig,
    pub reports: ReportsConfig,
    pub stock: StockConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Loads configuration, falling back to defaults when the file does
    /// not exist. Parse errors are still reported.
    pub fn load_or_default(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        AppConfig::load(path)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("failed to serialize config: {e}")))?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    /// Formats a monetary amount with the configured symbol and
    /// separators, e.g. `S/ 12,345.67`.
    pub fn format_currency(&self, amount: Money) -> String {
        let c = &self.currency;
        let sign = if amount.is_negative() { "-" } else { "" };

        let units = group_thousands(amount.major().abs(), &c.thousands_separator);

        // Cents precision caps at two decimals
        let dp = c.decimal_places.min(2) as u32;
        let body = if dp == 0 {
            units
        } else {
            let minor = amount.minor() / 10_i64.pow(2 - dp);
            format!(
                "{units}{}{minor:0width$}",
                c.decimal_separator,
                width = dp as usize
            )
        };

        format!("{} {sign}{body}", c.symbol)
    }

    /// Formats a date with the configured pattern.
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.reports.date_format).to_string()
    }
}

/// Inserts a separator every three digits from the right.
fn group_thousands(value: i64, separator: &str) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.currency.symbol, "S/");
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.stock.alert_level, 10);
        assert!(config.reports.utf8_bom);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [currency]
            symbol = "$"

            [stock]
            alert_level = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.currency.code, "PEN"); // default preserved
        assert_eq!(config.stock.alert_level, 5);
        assert_eq!(config.reports.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut config = AppConfig::default();
        config.currency.symbol = "€".to_string();
        config.stock.alert_level = 3;

        let path = std::env::temp_dir().join("caja_config_round_trip.toml");
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.currency.symbol, "€");
        assert_eq!(loaded.stock.alert_level, 3);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default("/nonexistent/caja.toml").unwrap();
        assert_eq!(config.currency.symbol, "S/");
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();

        assert_eq!(config.format_currency(Money::from_cents(1_234_567)), "S/ 12,345.67");
        assert_eq!(config.format_currency(Money::from_cents(500)), "S/ 5.00");
        assert_eq!(config.format_currency(Money::from_cents(0)), "S/ 0.00");
        assert_eq!(config.format_currency(Money::from_cents(-550)), "S/ -5.50");
    }

    #[test]
    fn test_format_currency_european_style() {
        let mut config = AppConfig::default();
        config.currency.symbol = "€".to_string();
        config.currency.thousands_separator = ".".to_string();
        config.currency.decimal_separator = ",".to_string();

        assert_eq!(config.format_currency(Money::from_cents(1_234_567)), "€ 12.345,67");
    }

    #[test]
    fn test_format_currency_zero_decimals() {
        let mut config = AppConfig::default();
        config.currency.decimal_places = 0;

        assert_eq!(config.format_currency(Money::from_cents(1_234_567)), "S/ 12,345");
    }

    #[test]
    fn test_format_date() {
        let config = AppConfig::default();
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(config.format_date(date), "07/08/2026");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0, ","), "0");
        assert_eq!(group_thousands(999, ","), "999");
        assert_eq!(group_thousands(1_000, ","), "1,000");
        assert_eq!(group_thousands(1_234_567, ","), "1,234,567");
    }
}
