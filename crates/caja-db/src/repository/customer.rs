//! # Customer Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use caja_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer and returns it with its assigned id.
    pub async fn insert(
        &self,
        name: &str,
        phone: Option<&str>,
        tax_id: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<Customer> {
        debug!(name = %name, "Inserting customer");

        let result = sqlx::query(
            "INSERT INTO customers (name, phone, tax_id, address) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(name)
        .bind(phone)
        .bind(tax_id)
        .bind(address)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            phone: phone.map(str::to_string),
            tax_id: tax_id.map(str::to_string),
            address: address.map(str::to_string),
        })
    }

    /// Updates an existing customer.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET name = ?2, phone = ?3, tax_id = ?4, address = ?5 WHERE id = ?1",
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.tax_id)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", customer.id));
        }

        Ok(())
    }

    /// Deletes a customer.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Gets a customer by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, tax_id, address FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Lists all customers ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, tax_id, address FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_crud_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let mut customer = repo
            .insert("Juan Perez", Some("555-1234"), Some("12345678A"), None)
            .await
            .unwrap();

        customer.phone = Some("555-0000".to_string());
        repo.update(&customer).await.unwrap();

        let fetched = repo.get_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(fetched.phone.as_deref(), Some("555-0000"));
        assert_eq!(fetched.tax_id.as_deref(), Some("12345678A"));

        repo.delete(customer.id).await.unwrap();
        assert!(repo.get_by_id(customer.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
