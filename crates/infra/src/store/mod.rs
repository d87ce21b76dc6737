//! Persistence backend boundary.
//!
//! The rest of the crate depends only on the narrow [`FoodStore`] contract,
//! never on a particular storage engine.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryFoodStore;
pub use r#trait::{FoodStore, StoreError};
pub use sqlite::SqliteFoodStore;
