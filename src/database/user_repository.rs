// ==================== USER RECORD ACCESS ====================
// Customer records live in MongoDB; handlers only see the trait so tests can
// run against the in-memory implementation.

use crate::{
    database::{MongoDB, CUSTOMER_USERS},
    models::UserRecord,
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use std::collections::HashMap;
use std::sync::RwLock;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// At most one record per phone number.
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<UserRecord>, AppError>;

    async fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
        updated_at: BsonDateTime,
    ) -> Result<(), AppError>;
}

pub struct MongoUserRepository {
    db: MongoDB,
}

impl MongoUserRepository {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<UserRecord>, AppError> {
        let collection = self.db.collection::<UserRecord>(CUSTOMER_USERS);

        let user = collection
            .find_one(doc! { "phone_number": phone_number })
            .await?;

        Ok(user)
    }

    async fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
        updated_at: BsonDateTime,
    ) -> Result<(), AppError> {
        let collection = self.db.collection::<UserRecord>(CUSTOMER_USERS);

        let result = collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "password": password_hash, "updated_at": updated_at } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::Persistence(format!("user {} vanished before update", id.to_hex())));
        }

        Ok(())
    }
}

/// Process-local repository, used by tests and local runs without MongoDB.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<ObjectId, UserRecord>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserRecord) -> Result<(), AppError> {
        let mut users = self.users.write().map_err(|e| AppError::Persistence(e.to_string()))?;
        users.insert(user.id, user);
        Ok(())
    }

    pub fn get(&self, id: &ObjectId) -> Option<UserRecord> {
        self.users.read().ok()?.get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_phone(&self, phone_number: &str) -> Result<Option<UserRecord>, AppError> {
        let users = self.users.read().map_err(|e| AppError::Persistence(e.to_string()))?;
        Ok(users
            .values()
            .find(|u| u.phone_number == phone_number)
            .cloned())
    }

    async fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
        updated_at: BsonDateTime,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().map_err(|e| AppError::Persistence(e.to_string()))?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| AppError::Persistence(format!("user {} vanished before update", id.to_hex())))?;
        user.password = Some(password_hash.to_string());
        user.updated_at = Some(updated_at);
        Ok(())
    }
}
