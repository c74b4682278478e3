use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::employee::Employee;

/// Designation given to employees provisioned automatically at signup.
pub const DEFAULT_DESIGNATION: &str = "Staff";

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub designation: String,
    pub is_active: bool,
    pub user_id: i64,
}

#[derive(Clone)]
pub struct EmployeeService {
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Direct-insert primitive. Not exposed over HTTP; signup provisioning
    /// goes through `insert_with` inside the user-creation transaction.
    pub async fn create(&self, new_employee: NewEmployee) -> Result<Employee> {
        Self::insert_with(&self.pool, new_employee).await
    }

    /// Inserts an employee row on any executor, so it can run inside a
    /// caller-owned transaction. Constraint violations (e.g. a missing
    /// owning user) roll the surrounding transaction back.
    pub async fn insert_with<'c, E>(conn: E, new_employee: NewEmployee) -> Result<Employee>
    where
        E: sqlx::Executor<'c, Database = sqlx::Postgres>,
    {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (name, designation, is_active, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, designation, is_active, user_id, created_at
            "#,
        )
        .bind(&new_employee.name)
        .bind(&new_employee.designation)
        .bind(new_employee.is_active)
        .bind(new_employee.user_id)
        .fetch_one(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) => {
                tracing::error!(error = ?db, "Employee insert violated a constraint");
                Error::Provisioning("Something went wrong".to_string())
            }
            other => Error::from(other),
        })?;

        Ok(employee)
    }

    pub async fn get_for_user(&self, user_id: i64) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, designation, is_active, user_id, created_at
            FROM employees
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn list(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, name, designation, is_active, user_id, created_at
            FROM employees
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }
}
