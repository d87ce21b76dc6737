//! List-card projection of a record.

use serde::Serialize;

use foodrecords_core::{Clock, DomainResult, FoodId};

use crate::expiration::ExpirationWindow;
use crate::food::FoodInfo;

/// What one list entry shows: name, type, expiration date, tips and countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodCard {
    pub id: FoodId,
    pub food_name: String,
    pub food_type: String,
    pub expiration_date: String,
    /// `None` when the record has no tips, so no tips toggle is offered.
    pub tips: Option<String>,
    pub window: ExpirationWindow,
}

impl FoodCard {
    pub fn new(food: &FoodInfo, clock: &dyn Clock) -> DomainResult<Self> {
        let window = ExpirationWindow::for_food(food, clock)?;
        Ok(Self {
            id: food.uuid,
            food_name: food.food_name.clone(),
            food_type: food.food_type.clone(),
            expiration_date: food.expiration_date.clone(),
            tips: food.has_tips().then(|| food.tips.clone()),
            window,
        })
    }

    pub fn has_tips(&self) -> bool {
        self.tips.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiration::Freshness;
    use foodrecords_core::FixedClock;

    fn food(tips: &str) -> FoodInfo {
        FoodInfo {
            food_name: "Milk".to_string(),
            production_date: "2024-06-10".to_string(),
            shelf_life: "7 days".to_string(),
            expiration_date: "2024-06-17".to_string(),
            uuid: FoodId::new(),
            tips: tips.to_string(),
            food_type: "Dairy".to_string(),
        }
    }

    #[test]
    fn card_carries_countdown_and_labels() {
        let clock = FixedClock::ymd(2024, 6, 15).unwrap();
        let record = food("");
        let card = FoodCard::new(&record, &clock).unwrap();

        assert_eq!(card.id, record.uuid);
        assert_eq!(card.food_name, "Milk");
        assert_eq!(card.food_type, "Dairy");
        assert_eq!(card.expiration_date, "2024-06-17");
        assert_eq!(card.window.remaining_days, 2);
        assert_eq!(card.window.freshness, Freshness::Valid);
        assert!(!card.has_tips());
    }

    #[test]
    fn whitespace_tips_are_not_offered() {
        let clock = FixedClock::ymd(2024, 6, 15).unwrap();
        assert!(!FoodCard::new(&food("  "), &clock).unwrap().has_tips());

        let card = FoodCard::new(&food("open within 3 days"), &clock).unwrap();
        assert_eq!(card.tips.as_deref(), Some("open within 3 days"));
    }

    #[test]
    fn card_surfaces_parse_errors() {
        let clock = FixedClock::ymd(2024, 6, 15).unwrap();
        let mut record = food("");
        record.expiration_date = "June 17".to_string();
        assert!(FoodCard::new(&record, &clock).unwrap_err().is_parse());
    }
}
