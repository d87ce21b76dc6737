//! Change notification mechanics.
//!
//! Writers publish immutable [`Snapshot`]s of a collection after each
//! mutation; readers subscribe and always see a whole collection, never a
//! half-applied change.

pub mod bus;
pub mod in_memory_bus;
pub mod snapshot;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use snapshot::Snapshot;
