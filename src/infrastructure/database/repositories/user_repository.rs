use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface,
};
use crate::infrastructure::database::entities::user;

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        login: model.login,
        password_hash: model.password_hash,
        role: model.role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find().all(&self.db).await.map_err(db_err)?;

        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn get_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn user_exists(&self, id: Uuid) -> DomainResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        Ok(count > 0)
    }

    async fn insert_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let id = dto.id.unwrap_or_else(Uuid::new_v4);

        let new_user = user::ActiveModel {
            id: Set(id),
            name: Set(dto.name),
            login: Set(dto.login),
            password_hash: Set(dto.password_hash),
            role: Set(dto.role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = new_user.insert(&self.db).await.map_err(db_err)?;

        Ok(user_model_to_domain(inserted))
    }

    async fn update_user(&self, id: Uuid, dto: UpdateUserDto) -> DomainResult<User> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::user_not_found(id));
        };

        let mut active: user::ActiveModel = existing.into();

        active.name = Set(dto.name);
        active.login = Set(dto.login);
        active.role = Set(dto.role);
        if let Some(hash) = dto.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(|e| match e {
            // The row vanished between the read above and this write.
            DbErr::RecordNotUpdated => {
                warn!(user_id = %id, "user row changed during update");
                DomainError::ConcurrencyConflict {
                    entity: "User",
                    id: id.to_string(),
                }
            }
            e => db_err(e),
        })?;

        Ok(user_model_to_domain(updated))
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
