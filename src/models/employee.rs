use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Provisioning record attached to every account. One row per user,
/// inserted in the same transaction as the user itself.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub designation: String,
    pub is_active: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
