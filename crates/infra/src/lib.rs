//! Infrastructure layer: storage backends, photo files, config, and the
//! observable inventory list the presentation layer renders.

pub mod config;
pub mod inventory;
pub mod photos;
pub mod store;

mod integration_tests;

pub use config::{AppConfig, DatabaseTarget};
pub use inventory::{FoodInventory, InventoryError};
pub use photos::{FsPhotoStore, Photo, PhotoError, PhotoFormat, PhotoState, PhotoStore};
pub use store::{FoodStore, InMemoryFoodStore, SqliteFoodStore, StoreError};
