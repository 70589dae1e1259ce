//! # Invoice Service
//!
//! Invoice numbering, derivation from a sale, line management with
//! totals recalculation, and status transitions.
//!
//! ## The Two Ways an Invoice Is Built
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  From a sale (snapshot):                                            │
//! │    create_from_sale(sale_id, rate)                                  │
//! │      subtotal = sale.total                                          │
//! │      tax      = subtotal × rate                                     │
//! │      total    = subtotal + tax                                      │
//! │    The sale and its lines are never touched.                        │
//! │                                                                     │
//! │  Line by line (recompute after each change):                        │
//! │    create_with_products(number, items, rate, ...)                   │
//! │      INSERT invoice with zero totals                                │
//! │      add_line() per item        ── any failure?                     │
//! │      recompute(rate)                 │                              │
//! │                                      ▼                              │
//! │                            DELETE the invoice (create-then-unwind)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is NOT decremented here. Invoices reference inventory effects
//! already applied by their sale; a standalone invoice has none.

use chrono::Local;
use tracing::{debug, info, warn};

use caja_core::numbering;
use caja_core::validation::validate_quantity;
use caja_core::{CoreError, InvoiceStatus, InvoiceTotals, Money, TaxRate};
use caja_db::repository::invoice::NewInvoice;
use caja_db::Database;

use crate::error::AppResult;

/// A (product, quantity) entry for [`InvoiceService::create_with_products`].
///
/// Unlike a cart line there is no frozen price: invoice lines snapshot
/// the product's price at the moment the line is added.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// Service for invoice workflows.
#[derive(Debug, Clone)]
pub struct InvoiceService {
    db: Database,
}

impl InvoiceService {
    /// Creates a new InvoiceService.
    pub fn new(db: Database) -> Self {
        InvoiceService { db }
    }

    // =========================================================================
    // Numbering
    // =========================================================================

    /// Produces the next sequential invoice number (`FAC-NNNNNN`).
    ///
    /// Never blocks the user: if the MAX-suffix query fails, falls back
    /// to a timestamp number (`FAC-YYYYMMDDHHMMSS`). The fallback is
    /// unique but not sequential, and it never advances the sequence -
    /// see [`caja_core::numbering`].
    pub async fn next_invoice_number(&self) -> String {
        match self.db.invoices().sequential_suffix_max().await {
            Ok(max) => numbering::format_invoice_number(numbering::next_suffix(max)),
            Err(e) => {
                warn!(error = %e, "Invoice number query failed, using timestamp fallback");
                numbering::fallback_invoice_number(Local::now().naive_local())
            }
        }
    }

    // =========================================================================
    // Derivation From a Sale
    // =========================================================================

    /// Creates an invoice from an existing sale.
    ///
    /// Copies the sale's total as the subtotal, derives tax and total at
    /// the given rate, and references the sale, its customer, and its
    /// employee. The sale itself is never mutated.
    pub async fn create_from_sale(&self, sale_id: i64, rate: TaxRate) -> AppResult<i64> {
        let sale = self
            .db
            .sales()
            .get_by_id(sale_id)
            .await?
            .ok_or(CoreError::SaleNotFound(sale_id))?;

        let totals = InvoiceTotals::derive(sale.total(), rate);
        let number = self.next_invoice_number().await;

        let invoice_id = self
            .db
            .invoices()
            .insert(&NewInvoice {
                number: &number,
                date: Local::now().date_naive(),
                subtotal_cents: totals.subtotal.cents(),
                tax_cents: totals.tax.cents(),
                total_cents: totals.total.cents(),
                status: InvoiceStatus::Pending,
                notes: None,
                sale_id: Some(sale_id),
                customer_id: sale.customer_id,
                employee_id: sale.employee_id,
            })
            .await?;

        info!(invoice_id, number = %number, sale_id, total = %totals.total, "Invoice created from sale");

        Ok(invoice_id)
    }

    // =========================================================================
    // Line Management & Recalculation
    // =========================================================================

    /// Adds a line to an invoice at the product's CURRENT price, then
    /// recomputes the invoice totals. Returns the new line's id.
    ///
    /// Recompute here runs at a zero rate, exactly like [`remove_line`];
    /// workflows that carry a tax percentage finish with an explicit
    /// [`recompute`] at that rate.
    ///
    /// [`remove_line`]: InvoiceService::remove_line
    /// [`recompute`]: InvoiceService::recompute
    pub async fn add_line(
        &self,
        invoice_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> AppResult<i64> {
        validate_quantity(quantity)?;

        let invoices = self.db.invoices();
        if invoices.get_by_id(invoice_id).await?.is_none() {
            return Err(CoreError::InvoiceNotFound(invoice_id).into());
        }

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or(CoreError::ProductNotFound(product_id))?;

        let subtotal = product.price().multiply_quantity(quantity);

        let line_id = invoices
            .insert_line(
                invoice_id,
                product_id,
                quantity,
                product.price_cents,
                subtotal.cents(),
            )
            .await?;

        self.recompute(invoice_id, TaxRate::zero()).await?;

        debug!(invoice_id, line_id, product_id, quantity, "Invoice line added");

        Ok(line_id)
    }

    /// Removes a line and recomputes its (former) invoice.
    pub async fn remove_line(&self, line_id: i64) -> AppResult<()> {
        let invoices = self.db.invoices();

        let line = invoices
            .get_line(line_id)
            .await?
            .ok_or(CoreError::InvoiceLineNotFound(line_id))?;

        invoices.delete_line(line_id).await?;
        self.recompute(line.invoice_id, TaxRate::zero()).await?;

        debug!(invoice_id = line.invoice_id, line_id, "Invoice line removed");

        Ok(())
    }

    /// Re-derives an invoice's subtotal/tax/total from its current lines
    /// and persists the result.
    ///
    /// `subtotal = Σ line subtotals` (zero when no lines),
    /// `tax = subtotal × rate`, `total = subtotal + tax`. Idempotent:
    /// identical lines and rate always produce identical stored values.
    pub async fn recompute(
        &self,
        invoice_id: i64,
        rate: TaxRate,
    ) -> AppResult<InvoiceTotals> {
        let invoices = self.db.invoices();

        if invoices.get_by_id(invoice_id).await?.is_none() {
            return Err(CoreError::InvoiceNotFound(invoice_id).into());
        }

        let subtotal = Money::from_cents(invoices.sum_line_subtotals(invoice_id).await?);
        let totals = InvoiceTotals::derive(subtotal, rate);

        invoices
            .update_totals(
                invoice_id,
                totals.subtotal.cents(),
                totals.tax.cents(),
                totals.total.cents(),
            )
            .await?;

        Ok(totals)
    }

    /// Creates an invoice and populates it line by line.
    ///
    /// Create-then-unwind: the invoice row is inserted first with zero
    /// totals, then lines are added one at a time; if any line fails, the
    /// whole invoice is deleted (compensating rollback) and the failure
    /// is reported. A final recompute applies the tax rate.
    pub async fn create_with_products(
        &self,
        number: &str,
        items: &[InvoiceItem],
        rate: TaxRate,
        status: InvoiceStatus,
        notes: Option<&str>,
        customer_id: Option<i64>,
        employee_id: Option<i64>,
    ) -> AppResult<i64> {
        let invoice_id = self
            .db
            .invoices()
            .insert(&NewInvoice {
                number,
                date: Local::now().date_naive(),
                subtotal_cents: 0,
                tax_cents: 0,
                total_cents: 0,
                status,
                notes,
                sale_id: None,
                customer_id,
                employee_id,
            })
            .await?;

        for item in items {
            if let Err(e) = self
                .add_line(invoice_id, item.product_id, item.quantity)
                .await
            {
                warn!(invoice_id, product_id = item.product_id, error = %e, "Line failed, unwinding invoice");
                self.db.invoices().delete(invoice_id).await?;
                return Err(e);
            }
        }

        let totals = self.recompute(invoice_id, rate).await?;

        info!(invoice_id, number = %number, total = %totals.total, lines = items.len(), "Invoice created with products");

        Ok(invoice_id)
    }

    // =========================================================================
    // Status Transitions
    // =========================================================================

    /// Sets an invoice's status from a label.
    ///
    /// Fails with `InvalidStatus` unless the label is one of the four
    /// recognized statuses. Any recognized status may follow any other -
    /// no stricter lifecycle is enforced.
    pub async fn change_status(&self, invoice_id: i64, label: &str) -> AppResult<()> {
        let status: InvoiceStatus = label
            .parse()
            .map_err(|_| CoreError::InvalidStatus(label.to_string()))?;

        self.db.invoices().update_status(invoice_id, status).await?;

        info!(invoice_id, status = %status, "Invoice status changed");

        Ok(())
    }

    /// Deletes an invoice; its lines are deleted with it.
    pub async fn delete_invoice(&self, invoice_id: i64) -> AppResult<()> {
        self.db.invoices().delete(invoice_id).await?;
        info!(invoice_id, "Invoice deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::{Cart, Product};
    use caja_db::{DbConfig, DbError};

    use crate::services::sales::SaleService;
    use crate::AppError;

    async fn fixture() -> (Database, Product, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let p1 = db.products().insert("Pen", 1000, 50, None).await.unwrap();
        let p2 = db.products().insert("Pad", 500, 50, None).await.unwrap();
        db.customers()
            .insert("Maria Garcia", None, None, None)
            .await
            .unwrap();
        db.employees()
            .insert("Pedro Sanchez", None, None, None)
            .await
            .unwrap();

        (db, p1, p2)
    }

    /// A sale with total 100.00 for the invoice-from-sale tests.
    async fn hundred_sale(db: &Database, product: &Product) -> i64 {
        let mut cart = Cart::new();
        cart.add_line(product, 10).unwrap(); // 10 × 10.00
        SaleService::new(db.clone())
            .create_sale(Some(1), Some(1), &cart)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_invoice_from_sale_law() {
        let (db, p1, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let sale_id = hundred_sale(&db, &p1).await;
        let invoice_id = service
            .create_from_sale(sale_id, TaxRate::from_percentage(18.0))
            .await
            .unwrap();

        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.subtotal_cents, 10_000);
        assert_eq!(invoice.tax_cents, 1_800);
        assert_eq!(invoice.total_cents, 11_800);
        assert_eq!(invoice.status, InvoiceStatus::Pending);
        assert_eq!(invoice.sale_id, Some(sale_id));
        assert_eq!(invoice.customer_id, Some(1));
    }

    #[tokio::test]
    async fn test_invoice_from_sale_copies_without_mutating() {
        let (db, p1, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let sale_id = hundred_sale(&db, &p1).await;
        let before = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        let lines_before = db.sales().get_lines(sale_id).await.unwrap();

        let invoice_id = service
            .create_from_sale(sale_id, TaxRate::from_percentage(18.0))
            .await
            .unwrap();

        let after = db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(after.total_cents, before.total_cents);
        assert_eq!(
            db.sales().get_lines(sale_id).await.unwrap().len(),
            lines_before.len()
        );

        // the invoice owns no copy of the sale's lines
        assert!(db.invoices().get_lines(invoice_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_from_missing_sale() {
        let (db, _, _) = fixture().await;
        let service = InvoiceService::new(db);

        let err = service
            .create_from_sale(777, TaxRate::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::SaleNotFound(777))));
    }

    #[tokio::test]
    async fn test_numbering_monotonicity() {
        let (db, p1, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        // no invoices yet
        assert_eq!(service.next_invoice_number().await, "FAC-000001");

        let sale_id = hundred_sale(&db, &p1).await;
        service.create_from_sale(sale_id, TaxRate::zero()).await.unwrap();
        service.create_from_sale(sale_id, TaxRate::zero()).await.unwrap();

        // FAC-000001 and FAC-000002 exist now
        assert_eq!(service.next_invoice_number().await, "FAC-000003");
    }

    #[tokio::test]
    async fn test_add_line_snapshots_current_price_and_recomputes() {
        let (db, p1, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let invoice_id = service
            .create_with_products("FAC-000001", &[], TaxRate::zero(), InvoiceStatus::Pending, None, None, None)
            .await
            .unwrap();

        service.add_line(invoice_id, p1.id, 3).await.unwrap();

        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.subtotal_cents, 3000);
        assert_eq!(invoice.total_cents, 3000);

        // price edits after the fact do not reprice the line
        let mut updated = p1.clone();
        updated.price_cents = 9999;
        db.products().update(&updated).await.unwrap();

        let lines = db.invoices().get_lines(invoice_id).await.unwrap();
        assert_eq!(lines[0].unit_price_cents, 1000);
    }

    #[tokio::test]
    async fn test_add_line_unknown_product() {
        let (db, _, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let invoice_id = service
            .create_with_products("FAC-000001", &[], TaxRate::zero(), InvoiceStatus::Pending, None, None, None)
            .await
            .unwrap();

        let err = service.add_line(invoice_id, 4242, 1).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::ProductNotFound(4242))
        ));
    }

    #[tokio::test]
    async fn test_remove_line_recomputes() {
        let (db, p1, p2) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let invoice_id = service
            .create_with_products(
                "FAC-000001",
                &[
                    InvoiceItem { product_id: p1.id, quantity: 2 }, // 20.00
                    InvoiceItem { product_id: p2.id, quantity: 3 }, // 15.00
                ],
                TaxRate::zero(),
                InvoiceStatus::Pending,
                None,
                None,
                None,
            )
            .await
            .unwrap();

        let lines = db.invoices().get_lines(invoice_id).await.unwrap();
        assert_eq!(lines.len(), 2);

        service.remove_line(lines[0].id).await.unwrap();

        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.subtotal_cents, 1500);
        assert_eq!(invoice.total_cents, 1500);
    }

    #[tokio::test]
    async fn test_recompute_idempotence() {
        let (db, p1, p2) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let invoice_id = service
            .create_with_products(
                "FAC-000001",
                &[
                    InvoiceItem { product_id: p1.id, quantity: 2 },
                    InvoiceItem { product_id: p2.id, quantity: 3 },
                ],
                TaxRate::from_percentage(18.0),
                InvoiceStatus::Pending,
                None,
                None,
                None,
            )
            .await
            .unwrap();

        let first = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();

        service
            .recompute(invoice_id, TaxRate::from_percentage(18.0))
            .await
            .unwrap();

        let second = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(second.subtotal_cents, first.subtotal_cents);
        assert_eq!(second.tax_cents, first.tax_cents);
        assert_eq!(second.total_cents, first.total_cents);

        // and the derivation itself holds
        assert_eq!(second.subtotal_cents, 3500);
        assert_eq!(second.tax_cents, 630);
        assert_eq!(second.total_cents, 4130);
    }

    #[tokio::test]
    async fn test_recompute_with_no_lines_is_zero() {
        let (db, _, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let invoice_id = service
            .create_with_products("FAC-000001", &[], TaxRate::from_percentage(18.0), InvoiceStatus::Pending, None, None, None)
            .await
            .unwrap();

        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.subtotal_cents, 0);
        assert_eq!(invoice.tax_cents, 0);
        assert_eq!(invoice.total_cents, 0);
    }

    #[tokio::test]
    async fn test_compensating_rollback() {
        let (db, p1, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let err = service
            .create_with_products(
                "FAC-000001",
                &[
                    InvoiceItem { product_id: p1.id, quantity: 1 },
                    InvoiceItem { product_id: 4242, quantity: 1 }, // does not exist
                ],
                TaxRate::zero(),
                InvoiceStatus::Pending,
                None,
                None,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::ProductNotFound(4242))
        ));

        // the unwound invoice and its lines are gone
        assert!(db.invoices().list().await.unwrap().is_empty());
        let orphan_lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphan_lines, 0);

        // the number was unwound with it and can be reused
        assert_eq!(service.next_invoice_number().await, "FAC-000001");
    }

    #[tokio::test]
    async fn test_change_status() {
        let (db, p1, _) = fixture().await;
        let service = InvoiceService::new(db.clone());

        let invoice_id = service
            .create_with_products(
                "FAC-000001",
                &[InvoiceItem { product_id: p1.id, quantity: 1 }],
                TaxRate::zero(),
                InvoiceStatus::Pending,
                None,
                None,
                None,
            )
            .await
            .unwrap();

        // unknown label is refused without touching the row
        let err = service.change_status(invoice_id, "Archived").await.unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::InvalidStatus(_))));
        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Pending);

        // a recognized label sticks
        service.change_status(invoice_id, "Paid").await.unwrap();
        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Paid);

        // any -> any is permitted, including back to Pending
        service.change_status(invoice_id, "Pending").await.unwrap();
        let invoice = db.invoices().get_by_id(invoice_id).await.unwrap().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }

    #[tokio::test]
    async fn test_change_status_missing_invoice() {
        let (db, _, _) = fixture().await;
        let service = InvoiceService::new(db);

        let err = service.change_status(777, "Paid").await.unwrap_err();
        assert!(matches!(err, AppError::Db(DbError::NotFound { .. })));
    }
}
