use std::sync::RwLock;

use async_trait::async_trait;

use foodrecords_core::Entity;
use foodrecords_inventory::{FoodInfo, FoodTypeInfo};

use super::r#trait::{FoodStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    foods: Vec<FoodInfo>,
    food_types: Vec<FoodTypeInfo>,
}

/// In-memory row store.
///
/// Intended for tests/dev. Records live in insertion order; lookups are linear.
#[derive(Debug, Default)]
pub struct InMemoryFoodStore {
    tables: RwLock<Tables>,
}

impl InMemoryFoodStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::backend("lock poisoned")
    }
}

#[async_trait]
impl FoodStore for InMemoryFoodStore {
    async fn insert_food(&self, food: FoodInfo) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        if tables.foods.iter().any(|f| f.same_identity(&food)) {
            return Err(StoreError::Conflict(format!("food {}", food.id())));
        }
        tables.foods.push(food);
        Ok(())
    }

    async fn all_foods(&self) -> Result<Vec<FoodInfo>, StoreError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables.foods.clone())
    }

    async fn remove_food(&self, food: &FoodInfo) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        tables.foods.retain(|f| !f.same_identity(food));
        Ok(())
    }

    async fn insert_food_type(&self, food_type: FoodTypeInfo) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        tables.food_types.push(food_type);
        Ok(())
    }

    async fn all_food_types(&self) -> Result<Vec<FoodTypeInfo>, StoreError> {
        let tables = self.tables.read().map_err(|_| Self::poisoned())?;
        Ok(tables.food_types.clone())
    }

    async fn remove_food_type(&self, food_type: &FoodTypeInfo) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| Self::poisoned())?;
        tables.food_types.retain(|t| t != food_type);
        Ok(())
    }
}
