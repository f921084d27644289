//! User management service — application-layer orchestration
//!
//! HTTP handlers stay thin and delegate here. The service owns the one
//! rule that must hold on every write path: plaintext passwords are
//! hashed before anything reaches the repository.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface,
};
use crate::infrastructure::crypto::password::hash_password;

/// User service — orchestrates the user CRUD use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    bcrypt_cost: u32,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list_users().await
    }

    pub async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.repo.get_user_by_id(id).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Create a user. The submitted plaintext password is hashed here;
    /// the repository only ever sees the hash.
    pub async fn create_user(
        &self,
        id: Option<Uuid>,
        name: &str,
        login: &str,
        password: &str,
        role: &str,
    ) -> DomainResult<User> {
        let password_hash = self.hash(password)?;

        let user = self
            .repo
            .insert_user(CreateUserDto {
                id,
                name: name.to_string(),
                login: login.to_string(),
                password_hash,
                role: role.to_string(),
            })
            .await?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Update a user. `name`, `login` and `role` are overwritten
    /// unconditionally; the password is re-hashed and overwritten only
    /// when a non-blank value was submitted.
    pub async fn update_user(
        &self,
        id: Uuid,
        name: &str,
        login: &str,
        password: Option<&str>,
        role: &str,
    ) -> DomainResult<User> {
        if !self.repo.user_exists(id).await? {
            return Err(DomainError::user_not_found(id));
        }

        let password_hash = match password {
            Some(p) if !p.trim().is_empty() => Some(self.hash(p)?),
            _ => None,
        };

        let user = self
            .repo
            .update_user(
                id,
                UpdateUserDto {
                    name: name.to_string(),
                    login: login.to_string(),
                    password_hash,
                    role: role.to_string(),
                },
            )
            .await?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        self.repo.delete_user(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))
    }
}

// ── Tests ──────────────────────────────────────────────────────
