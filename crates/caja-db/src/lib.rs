//! # caja-db: Database Layer for Caja POS
//!
//! SQLite persistence for the Caja POS system, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Caja POS Data Flow                            │
//! │                                                                     │
//! │  caja-app service (e.g. InvoiceService::add_line)                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   caja-db (THIS CRATE)                      │   │
//! │  │                                                             │   │
//! │  │  ┌─────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │  │  Database   │   │  Repositories  │   │  Migrations  │   │   │
//! │  │  │  (pool.rs)  │◄──│  category      │   │  (embedded)  │   │   │
//! │  │  │  SqlitePool │   │  product       │   │  001_init    │   │   │
//! │  │  │  WAL, FKs   │   │  customer      │   │  .sql        │   │   │
//! │  │  └─────────────┘   │  employee      │   └──────────────┘   │   │
//! │  │                    │  sale, invoice │                      │   │
//! │  │                    └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite file (single-user desktop store)                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caja_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("data/caja.db")).await?;
//! let products = db.products().list().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::customer::CustomerRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
