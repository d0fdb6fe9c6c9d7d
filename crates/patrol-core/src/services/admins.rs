//! Admin accounts - login checks and account creation.

use std::sync::Arc;

use crate::domain::Admin;
use crate::error::DomainError;
use crate::ports::{AdminRepository, PasswordService};

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AdminService {
    pub fn new(admins: Arc<dyn AdminRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { admins, passwords }
    }

    /// Check credentials. Unknown, inactive and wrong-password all look the same to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Admin, DomainError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(admin) = self.admins.find_by_email(&email).await? else {
            tracing::info!("Login attempt for unknown admin");
            return Err(DomainError::Unauthorized);
        };

        if !admin.is_active {
            tracing::info!(admin_id = %admin.id, "Login attempt for disabled admin");
            return Err(DomainError::Unauthorized);
        }

        let valid = self
            .passwords
            .verify(password, &admin.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::info!(admin_id = %admin.id, "Login attempt with wrong password");
            return Err(DomainError::Unauthorized);
        }

        Ok(admin)
    }

    pub async fn get(&self, id: uuid::Uuid) -> Result<Admin, DomainError> {
        self.admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Admin", id))
    }

    pub async fn create(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
        is_super_admin: bool,
    ) -> Result<Admin, DomainError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self.admins.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let full_name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(email.as_str())
            .to_string();

        let admin = self
            .admins
            .insert(Admin::new(email, full_name, password_hash, is_super_admin))
            .await?;
        tracing::info!(admin_id = %admin.id, "Admin account created");
        Ok(admin)
    }
}
