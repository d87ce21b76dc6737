//! Food inventory domain module.
//!
//! This crate contains business rules for food records, implemented purely as
//! deterministic domain logic (no IO, no storage). The current date always
//! comes from an injected [`foodrecords_core::Clock`].

pub mod card;
pub mod dates;
pub mod expiration;
pub mod food;

pub use card::FoodCard;
pub use dates::{DATE_FORMAT, ShelfLife, format_date, parse_date};
pub use expiration::{
    CAPPED_DISPLAY, DISPLAY_CAP, ExpirationWindow, Freshness, display_days, remaining_days,
};
pub use food::{FoodInfo, FoodTypeInfo, NewFood};
