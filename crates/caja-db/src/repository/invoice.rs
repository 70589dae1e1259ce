//! # Invoice Repository
//!
//! Database operations for invoices and their line items.
//!
//! ## Derived Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  invoice_lines                      invoices                        │
//! │  ┌──────────────────────┐           ┌──────────────────────────┐    │
//! │  │ qty │ unit │ subtotal│  SUM ───► │ subtotal_cents           │    │
//! │  │  2  │ 1000 │  2000   │           │ tax_cents   = sub × rate │    │
//! │  │  3  │  500 │  1500   │           │ total_cents = sub + tax  │    │
//! │  └──────────────────────┘           └──────────────────────────┘    │
//! │                                                                     │
//! │  update_totals() only ever writes values derived from the lines     │
//! │  (InvoiceService::recompute). The stored triple is a cache of the   │
//! │  line sum, not an independent editable value.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use caja_core::numbering;
use caja_core::{Invoice, InvoiceLine, InvoiceStatus};

/// Field set for creating an invoice row.
///
/// Totals start at zero unless the caller derives them up front
/// (invoice-from-sale); otherwise a recompute follows once lines exist.
#[derive(Debug, Clone)]
pub struct NewInvoice<'a> {
    pub number: &'a str,
    pub date: NaiveDate,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: InvoiceStatus,
    pub notes: Option<&'a str>,
    pub sale_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
}

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Inserts a new invoice row and returns its assigned id.
    ///
    /// Fails with `UniqueViolation` if the number is already taken.
    pub async fn insert(&self, new: &NewInvoice<'_>) -> DbResult<i64> {
        debug!(number = %new.number, "Inserting invoice");

        let result = sqlx::query(
            r#"
            INSERT INTO invoices (
                number, date, subtotal_cents, tax_cents, total_cents,
                status, notes, sale_id, customer_id, employee_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(new.number)
        .bind(new.date)
        .bind(new.subtotal_cents)
        .bind(new.tax_cents)
        .bind(new.total_cents)
        .bind(new.status)
        .bind(new.notes)
        .bind(new.sale_id)
        .bind(new.customer_id)
        .bind(new.employee_id)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Writes the derived subtotal/tax/total triple onto an invoice.
    pub async fn update_totals(
        &self,
        id: i64,
        subtotal_cents: i64,
        tax_cents: i64,
        total_cents: i64,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                subtotal_cents = ?2,
                tax_cents = ?3,
                total_cents = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(subtotal_cents)
        .bind(tax_cents)
        .bind(total_cents)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Sets the status of an invoice. Label validation happens upstream
    /// in `InvoiceService::change_status`.
    pub async fn update_status(&self, id: i64, status: InvoiceStatus) -> DbResult<()> {
        debug!(id, status = %status, "Updating invoice status");

        let result = sqlx::query("UPDATE invoices SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Updates the free-text notes of an invoice.
    pub async fn update_notes(&self, id: i64, notes: Option<&str>) -> DbResult<()> {
        let result = sqlx::query("UPDATE invoices SET notes = ?2 WHERE id = ?1")
            .bind(id)
            .bind(notes)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Deletes an invoice; its lines go with it (FK CASCADE).
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Gets an invoice by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, date, subtotal_cents, tax_cents, total_cents,
                   status, notes, sale_id, customer_id, employee_id
            FROM invoices
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets an invoice by its document number.
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, date, subtotal_cents, tax_cents, total_cents,
                   status, notes, sale_id, customer_id, employee_id
            FROM invoices
            WHERE number = ?1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Lists all invoices, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, date, subtotal_cents, tax_cents, total_cents,
                   status, notes, sale_id, customer_id, employee_id
            FROM invoices
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lists a customer's invoices, most recent first.
    pub async fn list_by_customer(&self, customer_id: i64) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, date, subtotal_cents, tax_cents, total_cents,
                   status, notes, sale_id, customer_id, employee_id
            FROM invoices
            WHERE customer_id = ?1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lists invoices in a given status, most recent first.
    pub async fn list_by_status(&self, status: InvoiceStatus) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, number, date, subtotal_cents, tax_cents, total_cents,
                   status, notes, sale_id, customer_id, employee_id
            FROM invoices
            WHERE status = ?1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Returns the highest numeric suffix among sequential invoice
    /// numbers, or `None` when no sequential number exists yet.
    ///
    /// Only strict `FAC-` + 6-digit numbers count; timestamp fallback
    /// numbers are skipped so they never advance the sequence.
    pub async fn sequential_suffix_max(&self) -> DbResult<Option<u32>> {
        let numbers: Vec<String> = sqlx::query_scalar(
            "SELECT number FROM invoices WHERE number LIKE 'FAC-%'",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(numbers
            .iter()
            .filter_map(|n| numbering::parse_invoice_suffix(n))
            .max())
    }

    // =========================================================================
    // Lines
    // =========================================================================

    /// Inserts an invoice line and returns its assigned id.
    pub async fn insert_line(
        &self,
        invoice_id: i64,
        product_id: i64,
        quantity: i64,
        unit_price_cents: i64,
        subtotal_cents: i64,
    ) -> DbResult<i64> {
        debug!(invoice_id, product_id, quantity, "Inserting invoice line");

        let result = sqlx::query(
            r#"
            INSERT INTO invoice_lines (
                invoice_id, product_id, quantity, unit_price_cents, subtotal_cents
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(invoice_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price_cents)
        .bind(subtotal_cents)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Gets a single invoice line.
    pub async fn get_line(&self, line_id: i64) -> DbResult<Option<InvoiceLine>> {
        let line = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM invoice_lines
            WHERE id = ?1
            "#,
        )
        .bind(line_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(line)
    }

    /// Gets all lines of an invoice, in insertion order.
    pub async fn get_lines(&self, invoice_id: i64) -> DbResult<Vec<InvoiceLine>> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM invoice_lines
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Deletes an invoice line.
    pub async fn delete_line(&self, line_id: i64) -> DbResult<()> {
        debug!(line_id, "Deleting invoice line");

        let result = sqlx::query("DELETE FROM invoice_lines WHERE id = ?1")
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InvoiceLine", line_id));
        }

        Ok(())
    }

    /// Sums the line subtotals of an invoice (zero when it has no lines).
    pub async fn sum_line_subtotals(&self, invoice_id: i64) -> DbResult<i64> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(subtotal_cents), 0) FROM invoice_lines WHERE invoice_id = ?1",
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
