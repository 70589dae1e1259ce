//! # Sale Service
//!
//! Atomic sale assembly from a cart.
//!
//! ## Assembly Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create_sale(customer, employee, cart)                              │
//! │                                                                     │
//! │  1. Validate: cart non-empty, every quantity > 0  (no mutation)     │
//! │  2. BEGIN                                                           │
//! │  3. For each line: product exists? stock >= quantity?               │
//! │  4. INSERT sale          (total = Σ qty × frozen unit price)        │
//! │  5. For each line: INSERT sale_line, stock -= quantity              │
//! │  6. COMMIT                                                          │
//! │                                                                     │
//! │  Any failure between BEGIN and COMMIT rolls the whole sale back:    │
//! │  no sale row, no lines, no stock change.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stock decrement carries its own `stock >= quantity` guard in the
//! UPDATE, so a quantity that became unavailable between check and write
//! still cannot oversell.

use chrono::Local;
use tracing::{debug, info};

use caja_core::validation::validate_quantity;
use caja_core::{Cart, CoreError, ValidationError};
use caja_db::{Database, DbError};

use crate::error::AppResult;

/// Service for sale assembly and deletion.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    /// Creates a new SaleService.
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Creates a sale plus its lines from a cart, atomically, and
    /// decrements product stock per line. Returns the new sale's id.
    ///
    /// The cart's frozen unit prices are what get persisted - a product
    /// price edit between cart and confirmation does not reprice the
    /// sale.
    pub async fn create_sale(
        &self,
        customer_id: Option<i64>,
        employee_id: Option<i64>,
        cart: &Cart,
    ) -> AppResult<i64> {
        if cart.is_empty() {
            return Err(ValidationError::Required {
                field: "cart".to_string(),
            }
            .into());
        }
        for line in &cart.lines {
            validate_quantity(line.quantity)?;
        }

        let total = cart.total();
        let date = Local::now().date_naive();

        debug!(lines = cart.len(), total = %total, "Assembling sale");

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        // Existence and stock preconditions, inside the transaction so the
        // read and the later decrement see the same state.
        for line in &cart.lines {
            let stock: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(DbError::from)?;

            let available = stock.ok_or(CoreError::ProductNotFound(line.product_id))?;
            if available < line.quantity {
                return Err(CoreError::InsufficientStock {
                    product_id: line.product_id,
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        let result = sqlx::query(
            "INSERT INTO sales (date, total_cents, customer_id, employee_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(date)
        .bind(total.cents())
        .bind(customer_id)
        .bind(employee_id)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let sale_id = result.last_insert_rowid();

        for line in &cart.lines {
            let subtotal = line.subtotal();

            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    sale_id, product_id, quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(subtotal.cents())
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            let updated = sqlx::query(
                "UPDATE products SET stock = stock - ?2 WHERE id = ?1 AND stock >= ?2",
            )
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if updated.rows_affected() == 0 {
                return Err(CoreError::InsufficientStock {
                    product_id: line.product_id,
                    available: 0,
                    requested: line.quantity,
                }
                .into());
            }
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(sale_id, total = %total, lines = cart.len(), "Sale created");

        Ok(sale_id)
    }

    /// Deletes a sale and its lines.
    ///
    /// Refused while an invoice still references the sale - invoices keep
    /// their copied values, but the link must not dangle silently.
    pub async fn delete_sale(&self, sale_id: i64) -> AppResult<()> {
        let sales = self.db.sales();

        if sales.get_by_id(sale_id).await?.is_none() {
            return Err(CoreError::SaleNotFound(sale_id).into());
        }

        let invoice_count = sales.count_referencing_invoices(sale_id).await?;
        if invoice_count > 0 {
            return Err(ValidationError::StillReferenced {
                entity: "Sale",
                id: sale_id,
                referenced_by: format!("{invoice_count} invoice(s)"),
            }
            .into());
        }

        sales.delete(sale_id).await?;
        info!(sale_id, "Sale deleted");

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
