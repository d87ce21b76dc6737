use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use foodrecords_inventory::{FoodInfo, FoodTypeInfo};

/// Storage operation error.
///
/// These are **infrastructure errors**, as opposed to domain errors
/// (validation, parsing). The store never retries; callers decide.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with the same `uuid` is already stored.
    #[error("record already exists: {0}")]
    Conflict(String),

    /// The backend failed to insert, query or remove.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

/// Row store for food records and food type labels.
///
/// ## Food records
///
/// - `insert_food` rejects a duplicate `uuid` with [`StoreError::Conflict`].
/// - `all_foods` returns records in insertion order.
/// - `remove_food` matches by `uuid` only; removing an absent record is a
///   no-op, not an error.
///
/// ## Food type labels
///
/// Labels are unkeyed. Inserting the same text twice stores it twice;
/// `remove_food_type` deletes every equal label and is a no-op when none
/// exists.
#[async_trait]
pub trait FoodStore: Send + Sync {
    async fn insert_food(&self, food: FoodInfo) -> Result<(), StoreError>;

    async fn all_foods(&self) -> Result<Vec<FoodInfo>, StoreError>;

    async fn remove_food(&self, food: &FoodInfo) -> Result<(), StoreError>;

    async fn insert_food_type(&self, food_type: FoodTypeInfo) -> Result<(), StoreError>;

    async fn all_food_types(&self) -> Result<Vec<FoodTypeInfo>, StoreError>;

    async fn remove_food_type(&self, food_type: &FoodTypeInfo) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> FoodStore for Arc<S>
where
    S: FoodStore + ?Sized,
{
    async fn insert_food(&self, food: FoodInfo) -> Result<(), StoreError> {
        (**self).insert_food(food).await
    }

    async fn all_foods(&self) -> Result<Vec<FoodInfo>, StoreError> {
        (**self).all_foods().await
    }

    async fn remove_food(&self, food: &FoodInfo) -> Result<(), StoreError> {
        (**self).remove_food(food).await
    }

    async fn insert_food_type(&self, food_type: FoodTypeInfo) -> Result<(), StoreError> {
        (**self).insert_food_type(food_type).await
    }

    async fn all_food_types(&self) -> Result<Vec<FoodTypeInfo>, StoreError> {
        (**self).all_food_types().await
    }

    async fn remove_food_type(&self, food_type: &FoodTypeInfo) -> Result<(), StoreError> {
        (**self).remove_food_type(food_type).await
    }
}
