use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin entity - a moderator allowed into the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub const ROLE_ADMIN: &'static str = "admin";
    pub const ROLE_SUPER_ADMIN: &'static str = "super_admin";

    /// Create a new active admin with generated ID and timestamps.
    pub fn new(email: String, full_name: String, password_hash: String, is_super_admin: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            password_hash,
            is_super_admin,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Roles carried in the session token.
    pub fn roles(&self) -> Vec<String> {
        let mut roles = vec![Self::ROLE_ADMIN.to_string()];
        if self.is_super_admin {
            roles.push(Self::ROLE_SUPER_ADMIN.to_string());
        }
        roles
    }
}
