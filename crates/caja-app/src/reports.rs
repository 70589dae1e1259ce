//! # Reports
//!
//! Joined view DTOs for listings, filtered reports, and statistics.
//!
//! These types are deliberately distinct from the entity records in
//! caja-core: a report row carries display names resolved by LEFT JOIN,
//! not foreign keys the caller would have to chase. Entities never grow
//! bolted-on display fields.
//!
//! ```text
//! invoices ──LEFT JOIN── customers ──┐
//!     │                              ├──► InvoiceReportRow
//!     └────LEFT JOIN── employees ────┘    (number, date, totals,
//!                                          status, display names)
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

use caja_core::InvoiceStatus;
use caja_db::{Database, DbError};

use crate::error::AppResult;

// =============================================================================
// Row Types
// =============================================================================

/// A sale listing row with customer/employee display names.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SaleOverviewRow {
    pub id: i64,
    pub date: NaiveDate,
    pub total_cents: i64,
    pub customer: Option<String>,
    pub employee: Option<String>,
}

/// An invoice report row with display names and the originating sale.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceReportRow {
    pub id: i64,
    pub number: String,
    pub date: NaiveDate,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub customer: Option<String>,
    pub employee: Option<String>,
    pub sale_id: Option<i64>,
}

/// A low-stock listing row with the category display name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LowStockRow {
    pub id: i64,
    pub name: String,
    pub stock: i64,
    pub category: Option<String>,
}

/// Aggregate invoice statistics.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvoiceStats {
    pub total_invoices: i64,
    pub pending: i64,
    pub paid: i64,
    pub cancelled: i64,
    pub overdue: i64,
    pub total_amount_cents: i64,
    pub average_amount_cents: f64,
}

// =============================================================================
// Reports
// =============================================================================

/// Read-only report queries over the store.
#[derive(Debug, Clone)]
pub struct Reports {
    db: Database,
}

impl Reports {
    /// Creates a new Reports handle.
    pub fn new(db: Database) -> Self {
        Reports { db }
    }

    /// All sales with display names, most recent first.
    pub async fn sales_overview(&self) -> AppResult<Vec<SaleOverviewRow>> {
        let rows = sqlx::query_as::<_, SaleOverviewRow>(
            r#"
            SELECT s.id, s.date, s.total_cents,
                   c.name AS customer, e.name AS employee
            FROM sales s
            LEFT JOIN customers c ON s.customer_id = c.id
            LEFT JOIN employees e ON s.employee_id = e.id
            ORDER BY s.date DESC, s.id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(DbError::from)?;

        Ok(rows)
    }

    /// Invoice report, optionally filtered by an inclusive date range
    /// and/or a status. Most recent first.
    pub async fn invoice_report(
        &self,
        date_range: Option<(NaiveDate, NaiveDate)>,
        status: Option<InvoiceStatus>,
    ) -> AppResult<Vec<InvoiceReportRow>> {
        let mut sql = String::from(
            r#"
            SELECT i.id, i.number, i.date, i.subtotal_cents, i.tax_cents,
                   i.total_cents, i.status, i.notes,
                   c.name AS customer, e.name AS employee, i.sale_id
            FROM invoices i
            LEFT JOIN customers c ON i.customer_id = c.id
            LEFT JOIN employees e ON i.employee_id = e.id
            "#,
        );

        let mut conditions: Vec<&str> = Vec::new();
        if date_range.is_some() {
            conditions.push("i.date BETWEEN ? AND ?");
        }
        if status.is_some() {
            conditions.push("i.status = ?");
        }
        if !conditions.is_empty() {
            sql.push_str("WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY i.date DESC, i.id DESC");

        let mut query = sqlx::query_as::<_, InvoiceReportRow>(&sql);
        if let Some((from, to)) = date_range {
            query = query.bind(from).bind(to);
        }
        if let Some(status) = status {
            query = query.bind(status);
        }

        let rows = query
            .fetch_all(self.db.pool())
            .await
            .map_err(DbError::from)?;

        Ok(rows)
    }

    /// Counts and amounts across all invoices.
    pub async fn invoice_stats(&self) -> AppResult<InvoiceStats> {
        let stats = sqlx::query_as::<_, InvoiceStats>(
            r#"
            SELECT
                COUNT(*) AS total_invoices,
                COALESCE(SUM(CASE WHEN status = 'pending'   THEN 1 ELSE 0 END), 0) AS pending,
                COALESCE(SUM(CASE WHEN status = 'paid'      THEN 1 ELSE 0 END), 0) AS paid,
                COALESCE(SUM(CASE WHEN status = 'cancelled' THEN 1 ELSE 0 END), 0) AS cancelled,
                COALESCE(SUM(CASE WHEN status = 'overdue'   THEN 1 ELSE 0 END), 0) AS overdue,
                COALESCE(SUM(total_cents), 0) AS total_amount_cents,
                COALESCE(AVG(total_cents), 0.0) AS average_amount_cents
            FROM invoices
            "#,
        )
        .fetch_one(self.db.pool())
        .await
        .map_err(DbError::from)?;

        Ok(stats)
    }

    /// Products at or below the stock alert threshold, with category
    /// names, lowest stock first.
    pub async fn low_stock(&self, alert_level: i64) -> AppResult<Vec<LowStockRow>> {
        let rows = sqlx::query_as::<_, LowStockRow>(
            r#"
            SELECT p.id, p.name, p.stock, c.name AS category
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE p.stock <= ?1
            ORDER BY p.stock, p.name
            "#,
        )
        .bind(alert_level)
        .fetch_all(self.db.pool())
        .await
        .map_err(DbError::from)?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use caja_core::{Cart, TaxRate};
    use caja_db::DbConfig;

    use crate::services::{InvoiceService, SaleService};

    async fn fixture() -> (Database, Reports) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let reports = Reports::new(db.clone());

        let office = db.categories().insert("Office", None).await.unwrap();
        db.products()
            .insert("Pen", 1000, 50, Some(office.id))
            .await
            .unwrap();
        db.products()
            .insert("Stapler", 1200, 2, Some(office.id))
            .await
            .unwrap();
        db.customers()
            .insert("Juan Perez", None, None, None)
            .await
            .unwrap();
        db.employees()
            .insert("Ana Martinez", None, None, None)
            .await
            .unwrap();

        (db, reports)
    }

    async fn invoiced_sale(db: &Database) -> i64 {
        let product = db.products().get_by_id(1).await.unwrap().unwrap();
        let mut cart = Cart::new();
        cart.add_line(&product, 10).unwrap();

        let sale_id = SaleService::new(db.clone())
            .create_sale(Some(1), Some(1), &cart)
            .await
            .unwrap();

        InvoiceService::new(db.clone())
            .create_from_sale(sale_id, TaxRate::from_percentage(18.0))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sales_overview_resolves_names() {
        let (db, reports) = fixture().await;
        invoiced_sale(&db).await;

        let rows = reports.sales_overview().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_cents, 10_000);
        assert_eq!(rows[0].customer.as_deref(), Some("Juan Perez"));
        assert_eq!(rows[0].employee.as_deref(), Some("Ana Martinez"));
    }

    #[tokio::test]
    async fn test_invoice_report_filters_by_status() {
        let (db, reports) = fixture().await;
        let invoice_id = invoiced_sale(&db).await;
        invoiced_sale(&db).await;

        InvoiceService::new(db.clone())
            .change_status(invoice_id, "Paid")
            .await
            .unwrap();

        let all = reports.invoice_report(None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].customer.as_deref(), Some("Juan Perez"));

        let paid = reports
            .invoice_report(None, Some(InvoiceStatus::Paid))
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, invoice_id);
    }

    #[tokio::test]
    async fn test_invoice_report_filters_by_date() {
        let (db, reports) = fixture().await;
        invoiced_sale(&db).await;

        let today = chrono::Local::now().date_naive();
        let in_range = reports
            .invoice_report(Some((today, today)), None)
            .await
            .unwrap();
        assert_eq!(in_range.len(), 1);

        let last_year = today - chrono::Duration::days(365);
        let out_of_range = reports
            .invoice_report(Some((last_year, last_year)), None)
            .await
            .unwrap();
        assert!(out_of_range.is_empty());
    }

    #[tokio::test]
    async fn test_invoice_stats() {
        let (db, reports) = fixture().await;

        // empty store: all zero
        let stats = reports.invoice_stats().await.unwrap();
        assert_eq!(stats.total_invoices, 0);
        assert_eq!(stats.total_amount_cents, 0);

        let invoice_id = invoiced_sale(&db).await;
        invoiced_sale(&db).await;
        InvoiceService::new(db.clone())
            .change_status(invoice_id, "Paid")
            .await
            .unwrap();

        let stats = reports.invoice_stats().await.unwrap();
        assert_eq!(stats.total_invoices, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.cancelled, 0);
        assert_eq!(stats.total_amount_cents, 23_600);
        assert!((stats.average_amount_cents - 11_800.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_low_stock() {
        let (_db, reports) = fixture().await;

        let rows = reports.low_stock(10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Stapler");
        assert_eq!(rows[0].stock, 2);
        assert_eq!(rows[0].category.as_deref(), Some("Office"));
    }
}
