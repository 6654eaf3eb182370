use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entity::users::{self, Role};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub city: String,
    pub role: Role,
}

/// Profile changes; `None` leaves the column as it is.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub city: Option<String>,
    pub password_hash: Option<String>,
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, user: NewUser) -> Result<users::Model, DbErr> {
        let model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            email: ActiveValue::Set(user.email),
            username: ActiveValue::Set(user.username),
            password_hash: ActiveValue::Set(user.password_hash),
            city: ActiveValue::Set(user.city),
            role: ActiveValue::Set(user.role),
            created_at: ActiveValue::Set(Utc::now()),
        };

        model.insert(self.db).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username.trim()))
            .one(self.db)
            .await
    }

    /// Login alias lookup: the identifier may be either an email or a username.
    ///
    /// An email match wins over a username match.
    pub async fn get_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<users::Model>, DbErr> {
        if let Some(user) = self.get_by_email(identifier).await? {
            return Ok(Some(user));
        }

        self.get_by_username(identifier).await
    }

    pub async fn get_all(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(self.db)
            .await
    }

    /// Returns `Ok(None)` when the user does not exist.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<Option<users::Model>, DbErr> {
        let Some(existing) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let mut active = existing.into_active_model();
        if let Some(email) = update.email {
            active.email = ActiveValue::Set(email.trim().to_lowercase());
        }
        if let Some(username) = update.username {
            active.username = ActiveValue::Set(username.trim().to_string());
        }
        if let Some(city) = update.city {
            active.city = ActiveValue::Set(city);
        }
        if let Some(password_hash) = update.password_hash {
            active.password_hash = ActiveValue::Set(password_hash);
        }

        active.update(self.db).await.map(Some)
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        users::Entity::delete_by_id(id).exec(self.db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;

    fn alice() -> NewUser {
        NewUser {
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            city: "Budapest".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn finds_by_either_identifier() {
        let db = test_db().await;
        let repo = UserRepository::new(&db);

        let created = repo.create(alice()).await.unwrap();

        let by_email = repo.get_by_email_or_username("Alice@Example.com").await.unwrap();
        let by_username = repo.get_by_email_or_username("alice").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.id));
        assert_eq!(by_username.map(|u| u.id), Some(created.id));
        assert!(repo.get_by_email_or_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_match_wins_over_username_match() {
        let db = test_db().await;
        let repo = UserRepository::new(&db);

        let owner = repo.create(alice()).await.unwrap();
        repo.create(NewUser {
            email: "mallory@example.com".to_string(),
            username: "alice@example.com".to_string(),
            ..alice()
        })
        .await
        .unwrap();

        let found = repo
            .get_by_email_or_username("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, owner.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = test_db().await;
        let repo = UserRepository::new(&db);

        repo.create(alice()).await.unwrap();
        let result = repo
            .create(NewUser {
                username: "alice2".to_string(),
                ..alice()
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_profile_changes_only_given_fields() {
        let db = test_db().await;
        let repo = UserRepository::new(&db);
        let created = repo.create(alice()).await.unwrap();

        let updated = repo
            .update_profile(
                created.id,
                UserUpdate {
                    city: Some("Szeged".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.city, "Szeged");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.password_hash, created.password_hash);
        assert!(repo
            .update_profile(Uuid::new_v4(), UserUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let db = test_db().await;
        let repo = UserRepository::new(&db);
        let created = repo.create(alice()).await.unwrap();

        assert_eq!(repo.delete(created.id).await.unwrap().rows_affected, 1);
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
