//! # caja-core: Pure Business Logic for Caja POS
//!
//! This crate is the heart of Caja POS. It contains all business logic as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Caja POS Architecture                         │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   caja-app (services)                       │   │
//! │  │   sale assembly, invoice derivation, reports, CSV export    │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │  │  types  │ │  money  │ │  cart  │ │numbering │ │ valid │ │   │
//! │  │  │ Product │ │  Money  │ │  Cart  │ │FAC-NNNNNN│ │ rules │ │   │
//! │  │  │ Invoice │ │ TaxRate │ │  Line  │ │ fallback │ │checks │ │   │
//! │  │  └─────────┘ └─────────┘ └────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                             │   │
//! │  │  NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                  caja-db (Database Layer)                   │   │
//! │  │           SQLite queries, migrations, repositories          │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Invoice, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - In-memory cart with price-snapshot lines
//! - [`numbering`] - Invoice number formatting and parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::money::Money;
//! use caja_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(10_000); // 100.00
//!
//! // Derive the tax amount at 18%
//! let tax = subtotal.calculate_tax(TaxRate::from_percentage(18.0));
//! assert_eq!(tax.cents(), 1_800);
//! assert_eq!((subtotal + tax).cents(), 11_800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod numbering;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against fat-finger entries (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
