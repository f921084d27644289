use async_trait::async_trait;
use uuid::Uuid;

use super::{CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Every stored record, in store order.
    async fn list_users(&self) -> DomainResult<Vec<User>>;

    async fn get_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    async fn user_exists(&self, id: Uuid) -> DomainResult<bool>;

    /// Insert a record and return it as stored.
    async fn insert_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    /// Replace the mutable fields of the row matching `id`.
    ///
    /// Fails with `NotFound` when the row is absent and with
    /// `ConcurrencyConflict` when it disappeared between read and write.
    async fn update_user(&self, id: Uuid, dto: UpdateUserDto) -> DomainResult<User>;

    /// Remove the row; fails with `NotFound` when absent.
    async fn delete_user(&self, id: Uuid) -> DomainResult<()>;
}
