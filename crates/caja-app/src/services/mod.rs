//! # Application Services
//!
//! Multi-entity workflows over the repositories.
//!
//! - [`SaleService`] - assembles a sale from a cart in one transaction
//! - [`InvoiceService`] - invoice numbering, derivation, recalculation,
//!   and status transitions
//!
//! Services validate inputs before touching the store, run
//! multi-statement sequences in transactions (or with compensating
//! cleanup where the workflow is defined that way), and report every
//! failure as a typed [`crate::AppError`].

pub mod invoices;
pub mod sales;

pub use invoices::{InvoiceItem, InvoiceService};
pub use sales::SaleService;
