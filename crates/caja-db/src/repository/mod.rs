//! # Repository Module
//!
//! One repository per entity family, each a thin typed wrapper over the
//! shared pool.
//!
//! ```text
//! caja-app service
//!      │  db.invoices().get_by_id(7)
//!      ▼
//! InvoiceRepository ── SQL ──► SQLite
//! ```
//!
//! Repositories own single-entity SQL. Multi-entity transactional
//! workflows (sale assembly, invoice recalculation) are composed in
//! caja-app from these plus explicit transactions on the pool.

pub mod category;
pub mod customer;
pub mod employee;
pub mod invoice;
pub mod product;
pub mod sale;
