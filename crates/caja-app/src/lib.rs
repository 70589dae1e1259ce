//! # caja-app: Application Services for Caja POS
//!
//! The orchestration layer of Caja POS. Everything here composes
//! caja-core logic with caja-db repositories:
//!
//! - [`services::SaleService`] - atomic sale assembly from a cart
//! - [`services::InvoiceService`] - invoice numbering, derivation from a
//!   sale, line management with totals recalculation, status transitions
//! - [`reports`] - joined view DTOs for listings and statistics
//! - [`export`] - CSV export of report rows
//! - [`config`] - typed TOML configuration (display formatting, export
//!   paths, stock alert level)
//! - [`error`] - the unified [`AppError`] surfaced to callers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caja_app::services::{InvoiceService, SaleService};
//! use caja_core::TaxRate;
//! use caja_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/caja.db")).await?;
//!
//! let sales = SaleService::new(db.clone());
//! let sale_id = sales.create_sale(Some(customer_id), Some(employee_id), &cart).await?;
//!
//! let invoices = InvoiceService::new(db.clone());
//! let invoice_id = invoices
//!     .create_from_sale(sale_id, TaxRate::from_percentage(18.0))
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod reports;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::{InvoiceService, SaleService};
