//! The observable food list.
//!
//! `FoodInventory` owns the list the presentation layer renders. The list is
//! an immutable snapshot. Writers (foreground or background) serialize on a
//! single async gate, do their IO, then swap in the next snapshot wholesale
//! and publish it on the bus. Readers only clone the current snapshot; they
//! never wait for a writer and never see a half-applied change.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use foodrecords_core::{Clock, DomainError, DomainResult, Entity, FoodId};
use foodrecords_events::{EventBus, InMemoryEventBus, Snapshot, Subscription};
use foodrecords_inventory::{FoodCard, FoodInfo, FoodTypeInfo, NewFood};

use crate::config::AppConfig;
use crate::photos::{FsPhotoStore, PhotoState, PhotoStore};
use crate::store::{FoodStore, SqliteFoodStore, StoreError};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// View-model over a [`FoodStore`] and a [`PhotoStore`].
///
/// Cheap to clone; clones share the same list, gate and bus.
#[derive(Clone)]
pub struct FoodInventory {
    store: Arc<dyn FoodStore>,
    photos: Arc<dyn PhotoStore>,
    bus: Arc<InMemoryEventBus<Snapshot<FoodInfo>>>,
    /// Held by writers for the whole mutation, IO included.
    gate: Arc<Mutex<()>>,
    /// Only ever locked to clone or swap the snapshot.
    current: Arc<RwLock<Snapshot<FoodInfo>>>,
}

impl FoodInventory {
    pub fn new(store: Arc<dyn FoodStore>, photos: Arc<dyn PhotoStore>) -> Self {
        Self {
            store,
            photos,
            bus: Arc::new(InMemoryEventBus::new()),
            gate: Arc::new(Mutex::new(())),
            current: Arc::new(RwLock::new(Snapshot::empty())),
        }
    }

    /// SQLite + filesystem photos as configured, with the list loaded.
    pub async fn open(config: &AppConfig) -> anyhow::Result<Self> {
        config.ensure_dirs()?;

        let store = SqliteFoodStore::connect_with(config.database.connect_options()?).await?;
        let photos = FsPhotoStore::new(&config.photo_dir);
        let inventory = Self::new(Arc::new(store), Arc::new(photos));
        inventory.reload().await?;

        tracing::info!(
            database = %config.database,
            photo_dir = %config.photo_dir.display(),
            "food inventory opened"
        );
        Ok(inventory)
    }

    /// Follow every snapshot published after this call.
    pub fn subscribe(&self) -> Subscription<Snapshot<FoodInfo>> {
        self.bus.subscribe()
    }

    /// The latest published list. Never waits for an in-flight write.
    pub fn snapshot(&self) -> Snapshot<FoodInfo> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the list with whatever the store holds.
    pub async fn reload(&self) -> Result<Snapshot<FoodInfo>, InventoryError> {
        let _gate = self.gate.lock().await;
        let foods = self.store.all_foods().await?;
        tracing::debug!(count = foods.len(), "food list reloaded");
        Ok(self.replace(foods))
    }

    /// Persist `food` and append it to the list.
    ///
    /// A duplicate id is rejected by the store and leaves the list untouched.
    pub async fn add(&self, food: FoodInfo) -> Result<Snapshot<FoodInfo>, InventoryError> {
        let _gate = self.gate.lock().await;
        self.store.insert_food(food.clone()).await?;
        tracing::info!(food_id = %food.uuid, name = %food.food_name, "food added");

        let mut foods = self.snapshot().items().to_vec();
        foods.push(food);
        Ok(self.replace(foods))
    }

    /// Insertion flow: build the record (fresh id, pre-computed expiration)
    /// and add it.
    pub async fn create(&self, new_food: NewFood) -> Result<FoodInfo, InventoryError> {
        let food = new_food.into_food_info()?;
        self.add(food.clone()).await?;
        Ok(food)
    }

    /// Delete the record's photo if it has one, then drop the record from the
    /// store and the list.
    ///
    /// Returns `false` when the record was already gone; nothing is published
    /// in that case.
    pub async fn remove(&self, food: &FoodInfo) -> Result<bool, InventoryError> {
        let _gate = self.gate.lock().await;

        let photo = self.photos.path_for(food.id());
        if self.photos.exists(&photo).await
            && let Err(e) = self.photos.delete(&photo).await
        {
            tracing::warn!(food_id = %food.uuid, error = %e, "failed to delete photo");
        }

        self.store.remove_food(food).await?;

        let current = self.snapshot();
        if !current.iter().any(|f| f.same_identity(food)) {
            tracing::debug!(food_id = %food.uuid, "food already removed");
            return Ok(false);
        }

        let foods = current
            .iter()
            .filter(|f| !f.same_identity(food))
            .cloned()
            .collect();
        self.replace(foods);
        tracing::info!(food_id = %food.uuid, "food removed");
        Ok(true)
    }

    /// Fire-and-forget removal on the runtime.
    ///
    /// The result is applied under the same gate as foreground writes.
    pub fn spawn_remove(&self, food: FoodInfo) -> JoinHandle<Result<bool, InventoryError>> {
        let inventory = self.clone();
        tokio::spawn(async move { inventory.remove(&food).await })
    }

    /// Decode the record's photo in the background.
    pub fn spawn_load_photo(&self, id: FoodId) -> JoinHandle<PhotoState> {
        let photos = Arc::clone(&self.photos);
        tokio::spawn(async move {
            let path = photos.path_for(&id);
            PhotoState::from(photos.decode(&path).await)
        })
    }

    /// One card per record in the current snapshot, in list order.
    ///
    /// A record with malformed dates yields its own parse error without
    /// hiding the others.
    pub fn cards(&self, clock: &dyn Clock) -> Vec<DomainResult<FoodCard>> {
        self.snapshot()
            .iter()
            .map(|food| FoodCard::new(food, clock))
            .collect()
    }

    pub async fn add_food_type(&self, food_type: FoodTypeInfo) -> Result<(), InventoryError> {
        self.store.insert_food_type(food_type).await?;
        Ok(())
    }

    pub async fn food_types(&self) -> Result<Vec<FoodTypeInfo>, InventoryError> {
        Ok(self.store.all_food_types().await?)
    }

    pub async fn remove_food_type(&self, food_type: &FoodTypeInfo) -> Result<(), InventoryError> {
        self.store.remove_food_type(food_type).await?;
        Ok(())
    }

    /// Swap in the next snapshot and publish it. Caller holds the gate.
    fn replace(&self, foods: Vec<FoodInfo>) -> Snapshot<FoodInfo> {
        let next = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            let next = current.succeed(foods);
            *current = next.clone();
            next
        };

        if let Err(e) = self.bus.publish(next.clone()) {
            tracing::warn!(error = %e, version = next.version(), "failed to publish food list");
        }
        next
    }
}

impl core::fmt::Debug for FoodInventory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FoodInventory")
            .field("subscribers", &self.bus.subscriber_count())
            .finish_non_exhaustive()
    }
}
