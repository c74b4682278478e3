use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::models::user::{User, UserType};
use crate::services::employee_service::{EmployeeService, NewEmployee, DEFAULT_DESIGNATION};

const USER_COLUMNS: &str =
    "id, email, hashed_password, name, type, is_active, profile_image, created_at, updated_at";

/// Signup input. The password arrives already hashed; raw passwords never
/// cross the service boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    pub user_type: UserType,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a user together with its employee record in one transaction.
    /// If the employee insert fails for any reason the user insert is rolled
    /// back with it; a rejected signup leaves no rows behind.
    pub async fn signup(&self, new_user: NewUser) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password, name, type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, hashed_password, name, type, is_active, profile_image, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(&new_user.name)
        .bind(new_user.user_type)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Error::DuplicateEmail,
            _ => Error::from(e),
        })?;

        EmployeeService::insert_with(
            &mut *tx,
            NewEmployee {
                name: user.name.clone(),
                designation: DEFAULT_DESIGNATION.to_string(),
                is_active: false,
                user_id: user.id,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = user.id,
            user_type = user.user_type.as_str(),
            "Registered user {}",
            user.email
        );
        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at DESC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Persists the hosted image URL for a user. Runs as its own short
    /// write, after the remote upload has already completed.
    pub async fn set_profile_image(&self, id: i64, url: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET profile_image = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, email, hashed_password, name, type, is_active, profile_image, created_at, updated_at
            "#,
        )
        .bind(url)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => Error::NotFound("User not found".to_string()),
            other => Error::from(other),
        })?;

        Ok(user)
    }
}
