//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Where Sale Creation Lives
//! A sale and its lines are created together, atomically, with the stock
//! decrements; that whole sequence is one transaction owned by
//! `SaleService` in caja-app. This repository covers everything after
//! creation: lookups, listings, and deletion.
//!
//! Sale lines snapshot the unit price at sale time; reading them back
//! never consults the live product price.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use caja_core::{Sale, SaleLine};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, date, total_cents, customer_id, employee_id FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists all sales, most recent first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, date, total_cents, customer_id, employee_id
            FROM sales
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists a customer's sales, most recent first.
    pub async fn list_by_customer(&self, customer_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, date, total_cents, customer_id, employee_id
            FROM sales
            WHERE customer_id = ?1
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists sales in an inclusive date range, most recent first.
    pub async fn list_by_date_range(
        &self,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, date, total_cents, customer_id, employee_id
            FROM sales
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets all lines of a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts invoices that reference a sale.
    ///
    /// Used by `SaleService::delete_sale` to refuse deleting a sale that
    /// is still invoiced; the FK RESTRICT on `invoices.sale_id` backs
    /// this at the schema level.
    pub async fn count_referencing_invoices(&self, sale_id: i64) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Deletes a sale; its lines go with it (FK CASCADE).
    ///
    /// Callers are expected to have checked for referencing invoices
    /// first; if one exists the FK RESTRICT turns this into a
    /// `ForeignKeyViolation`.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;

    async fn insert_sale(db: &Database, date: &str, customer_id: Option<i64>) -> i64 {
        sqlx::query("INSERT INTO sales (date, total_cents, customer_id) VALUES (?1, ?2, ?3)")
            .bind(date)
            .bind(1000_i64)
            .bind(customer_id)
            .execute(db.pool())
            .await
            .unwrap()
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        insert_sale(&db, "2026-08-01", None).await;
        let newest = insert_sale(&db, "2026-08-07", None).await;

        let sales = db.sales().list().await.unwrap();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].id, newest);
    }

    #[tokio::test]
    async fn test_list_by_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = db.customers().insert("Juan", None, None, None).await.unwrap();

        insert_sale(&db, "2026-08-01", Some(customer.id)).await;
        insert_sale(&db, "2026-08-02", None).await;

        let sales = db.sales().list_by_customer(customer.id).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].customer_id, Some(customer.id));
    }

    #[tokio::test]
    async fn test_list_by_date_range_is_inclusive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        insert_sale(&db, "2026-07-31", None).await;
        insert_sale(&db, "2026-08-01", None).await;
        insert_sale(&db, "2026-08-15", None).await;

        let from = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();
        let sales = db.sales().list_by_date_range(from, to).await.unwrap();
        assert_eq!(sales.len(), 2);
    }
}
