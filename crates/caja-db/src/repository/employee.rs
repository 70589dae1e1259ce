//! # Employee Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use caja_core::Employee;

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Inserts a new employee and returns it with its assigned id.
    pub async fn insert(
        &self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<Employee> {
        debug!(name = %name, "Inserting employee");

        let result = sqlx::query(
            "INSERT INTO employees (name, email, phone, address) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .execute(&self.pool)
        .await?;

        Ok(Employee {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            address: address.map(str::to_string),
        })
    }

    /// Updates an existing employee.
    pub async fn update(&self, employee: &Employee) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE employees SET name = ?2, email = ?3, phone = ?4, address = ?5 WHERE id = ?1",
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.phone)
        .bind(&employee.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", employee.id));
        }

        Ok(())
    }

    /// Deletes an employee.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }

        Ok(())
    }

    /// Gets an employee by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, phone, address FROM employees WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Lists all employees ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, phone, address FROM employees ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}
