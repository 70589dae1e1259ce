//! # Domain Types
//!
//! Core domain types used throughout Caja POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  Category ──┐                                                       │
//! │             ├──► Product ──┬──► SaleLine ────► Sale                 │
//! │             │              └──► InvoiceLine ─► Invoice              │
//! │                                                                     │
//! │  Customer ──┬──► Sale                                               │
//! │  Employee ──┘    │                                                  │
//! │                  └───────────► Invoice (optional back-reference)    │
//! │                                                                     │
//! │  TaxRate (bps) ───► Invoice tax derivation                          │
//! │  InvoiceStatus ───► Pending | Paid | Cancelled | Overdue            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity carries a surrogate `i64` id assigned by the store on
//! first insert and never reused after deletion. Line records snapshot the
//! product's unit price at the time they are written; they never follow
//! the live product price.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%).
///
/// 1800 bps = 18%. Integer basis points keep tax math exact where a float
/// percentage would not be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (18.0 == 18%).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if the tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Display name shown in listings and on documents.
    pub name: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Current stock level. Never negative; only confirmed sale lines
    /// decrement it.
    pub stock: i64,

    /// Owning category, if any.
    pub category_id: Option<i64>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Customer / Employee
// =============================================================================

/// A customer a sale or invoice can be billed to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

/// An employee who records sales and issues invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed point-of-sale transaction.
///
/// The total is derived: it always equals the sum of the line subtotals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub date: NaiveDate,
    pub total_cents: i64,
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a sale.
///
/// `unit_price_cents` is a snapshot taken at sale time;
/// `subtotal_cents == quantity * unit_price_cents` always holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl SaleLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// The status of an invoice.
///
/// Any status may transition to any other; only the label set itself is
/// validated. New invoices default to Pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued, awaiting payment.
    Pending,
    /// Paid in full.
    Paid,
    /// Cancelled before payment.
    Cancelled,
    /// Past its due date without payment.
    Overdue,
}

impl InvoiceStatus {
    /// All recognized statuses, in display order.
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Cancelled,
        InvoiceStatus::Overdue,
    ];

    /// Returns the human-facing label ("Pending", "Paid", ...).
    pub const fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
            InvoiceStatus::Overdue => "Overdue",
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ();

    /// Parses a status label, case-insensitively. Anything outside the
    /// four recognized labels is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A billing document, optionally derived from a Sale.
///
/// Totals are derived, never hand-edited while lines exist:
/// `subtotal == Σ line subtotals`, `total == subtotal + tax`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,

    /// Unique document number, normally `FAC-NNNNNN`.
    pub number: String,

    pub date: NaiveDate,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,

    /// The sale this invoice was derived from, if any. Values were copied
    /// at derivation time; the link is informational.
    pub sale_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
}

impl Invoice {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in an invoice. Same snapshot semantics as [`SaleLine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceLine {
    pub id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

impl InvoiceLine {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Invoice Totals Derivation
// =============================================================================

/// The derived subtotal/tax/total triple of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl InvoiceTotals {
    /// Derives invoice totals from a subtotal and a tax rate.
    ///
    /// `tax = subtotal × rate`, `total = subtotal + tax`. This is the
    /// single place the derivation lives; both invoice-from-sale and
    /// recompute-from-lines go through it, which is what makes recompute
    /// idempotent.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    /// use caja_core::types::{InvoiceTotals, TaxRate};
    ///
    /// let t = InvoiceTotals::derive(Money::from_cents(10_000), TaxRate::from_percentage(18.0));
    /// assert_eq!(t.subtotal.cents(), 10_000);
    /// assert_eq!(t.tax.cents(), 1_800);
    /// assert_eq!(t.total.cents(), 11_800);
    /// ```
    pub fn derive(subtotal: Money, rate: TaxRate) -> Self {
        let tax = subtotal.calculate_tax(rate);
        InvoiceTotals {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(18.0).bps(), 1800);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
        assert!(TaxRate::from_percentage(0.0).is_zero());
    }

    #[test]
    fn test_invoice_status_default_is_pending() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Pending);
    }

    #[test]
    fn test_invoice_status_parse() {
        assert_eq!("Paid".parse(), Ok(InvoiceStatus::Paid));
        assert_eq!("pending".parse(), Ok(InvoiceStatus::Pending));
        assert_eq!("  Overdue ".parse(), Ok(InvoiceStatus::Overdue));
        assert_eq!("CANCELLED".parse(), Ok(InvoiceStatus::Cancelled));
        assert!("Archived".parse::<InvoiceStatus>().is_err());
        assert!("".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_invoice_status_labels_round_trip() {
        for status in InvoiceStatus::ALL {
            assert_eq!(status.label().parse(), Ok(status));
        }
    }

    #[test]
    fn test_invoice_totals_derive() {
        let t = InvoiceTotals::derive(Money::from_cents(10_000), TaxRate::from_percentage(18.0));
        assert_eq!(t.subtotal.cents(), 10_000);
        assert_eq!(t.tax.cents(), 1_800);
        assert_eq!(t.total.cents(), 11_800);
    }

    #[test]
    fn test_invoice_totals_zero_rate() {
        let t = InvoiceTotals::derive(Money::from_cents(3_500), TaxRate::zero());
        assert_eq!(t.tax.cents(), 0);
        assert_eq!(t.total.cents(), 3_500);
    }

    #[test]
    fn test_invoice_totals_empty_subtotal() {
        let t = InvoiceTotals::derive(Money::zero(), TaxRate::from_percentage(18.0));
        assert_eq!(t.subtotal.cents(), 0);
        assert_eq!(t.tax.cents(), 0);
        assert_eq!(t.total.cents(), 0);
    }

    #[test]
    fn test_product_can_sell() {
        let product = Product {
            id: 1,
            name: "Notebook".to_string(),
            price_cents: 450,
            stock: 10,
            category_id: None,
        };
        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
    }
}
