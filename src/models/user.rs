use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};

/// Role tag for an account. Closed set, validated at the request boundary
/// before it ever reaches persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_type", rename_all = "lowercase")]
pub enum UserType {
    Admin,
    User,
}

impl UserType {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw {
            "admin" => Ok(UserType::Admin),
            "user" => Ok(UserType::User),
            other => Err(Error::InvalidUserType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "admin",
            UserType::User => "user",
        }
    }
}

impl Default for UserType {
    fn default() -> Self {
        UserType::User
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub user_type: UserType,
    pub is_active: bool,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_types() {
        assert_eq!(UserType::parse("admin").unwrap(), UserType::Admin);
        assert_eq!(UserType::parse("user").unwrap(), UserType::User);
    }

    #[test]
    fn parse_rejects_unknown_type() {
        let err = UserType::parse("superuser").unwrap_err();
        assert!(matches!(err, Error::InvalidUserType(raw) if raw == "superuser"));
    }
}
