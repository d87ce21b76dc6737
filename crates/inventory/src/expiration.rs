//! Expiration window computation.
//!
//! Remaining days are always `expiration - today`, using the stored expiration
//! date as the authority. Production date and shelf life are parsed too, but
//! only to report whether the three fields agree; they never override the
//! stored expiration date.
//!
//! Boundary: a record is `Valid` while `remaining_days > 0`. On its expiration
//! day (`remaining_days == 0`) it is already `Expired`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use foodrecords_core::{Clock, DomainResult};

use crate::dates::{ShelfLife, parse_date};
use crate::food::FoodInfo;

/// Largest magnitude shown as a number.
pub const DISPLAY_CAP: u64 = 99;

/// Text shown instead of any magnitude above [`DISPLAY_CAP`].
pub const CAPPED_DISPLAY: &str = "99+";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    Valid,
    Expired,
}

impl Freshness {
    pub fn classify(remaining_days: i64) -> Self {
        if remaining_days > 0 {
            Freshness::Valid
        } else {
            Freshness::Expired
        }
    }
}

/// Signed day count from `today` to `expiration`.
pub fn remaining_days(today: NaiveDate, expiration: NaiveDate) -> i64 {
    expiration.signed_duration_since(today).num_days()
}

/// Unsigned, capped text for a remaining-day count.
pub fn display_days(remaining_days: i64) -> String {
    let magnitude = remaining_days.unsigned_abs();
    if magnitude > DISPLAY_CAP {
        CAPPED_DISPLAY.to_string()
    } else {
        magnitude.to_string()
    }
}

/// Everything a list card needs to render the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationWindow {
    pub remaining_days: i64,
    pub freshness: Freshness,
    pub display: String,
    /// `production + shelf_life == expiration`.
    pub consistent: bool,
}

impl ExpirationWindow {
    pub fn from_remaining(remaining_days: i64, consistent: bool) -> Self {
        Self {
            remaining_days,
            freshness: Freshness::classify(remaining_days),
            display: display_days(remaining_days),
            consistent,
        }
    }

    /// Evaluate the three stored strings against `clock`.
    ///
    /// Any malformed field is a `DomainError::Parse`.
    pub fn evaluate(
        production_date: &str,
        shelf_life: &str,
        expiration_date: &str,
        clock: &dyn Clock,
    ) -> DomainResult<Self> {
        let production = parse_date(production_date)?;
        let shelf_life: ShelfLife = shelf_life.parse()?;
        let expiration = parse_date(expiration_date)?;

        let consistent = shelf_life
            .expiration_from(production)
            .is_ok_and(|derived| derived == expiration);

        Ok(Self::from_remaining(
            remaining_days(clock.today(), expiration),
            consistent,
        ))
    }

    pub fn for_food(food: &FoodInfo, clock: &dyn Clock) -> DomainResult<Self> {
        Self::evaluate(
            &food.production_date,
            &food.shelf_life,
            &food.expiration_date,
            clock,
        )
    }

    pub fn is_expired(&self) -> bool {
        self.freshness == Freshness::Expired
    }
}
