//! SeaORM implementation of the user store (Postgres).

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use time::OffsetDateTime;

use crate::auth::claims::{Provider, UserId};
use crate::entities::users;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::infra::db_errors::map_db_err;
use crate::repos::{UserRecord, UserStore};

/// Holds the pool behind an `Arc` so the store and `AppState` can share it.
#[derive(Debug, Clone)]
pub struct SeaUserStore {
    db: Arc<DatabaseConnection>,
}

impl SeaUserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn record_from_model(model: users::Model) -> Result<UserRecord, DomainError> {
    let corrupt = |what: &str| {
        DomainError::infra(
            InfraErrorKind::Other("Corrupt row".into()),
            format!("users row has an invalid {what}"),
        )
    };
    Ok(UserRecord {
        user_id: UserId::parse(&model.id).ok_or_else(|| corrupt("id"))?,
        provider: model.provider.parse().map_err(|_| corrupt("provider"))?,
        email: model.email,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[async_trait]
impl UserStore for SeaUserStore {
    async fn find_or_create_user(
        &self,
        user_id: &UserId,
        provider: Provider,
        email: &str,
    ) -> Result<UserRecord, DomainError> {
        let now = OffsetDateTime::now_utc();
        let row = users::ActiveModel {
            id: Set(user_id.as_str().to_string()),
            provider: Set(provider.as_str().to_string()),
            email: Set(email.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // Concurrent first sign-ins for the same id collapse onto one row.
        users::Entity::insert(row)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([users::Column::Email, users::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        let model = users::Entity::find_by_id(user_id.as_str().to_string())
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::Other("Upsert".into()),
                    "user row missing after upsert",
                )
            })?;
        record_from_model(model)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<UserRecord, DomainError> {
        let model = users::Entity::find_by_id(user_id.as_str().to_string())
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::User, format!("user {user_id}")))?;
        record_from_model(model)
    }
}
