use serde::{Deserialize, Serialize};

use foodrecords_core::{DomainError, DomainResult, Entity, FoodId, ValueObject};

use crate::dates::{ShelfLife, format_date, parse_date};

/// A single food-inventory record.
///
/// Field names follow the persisted row schema (`foodName`, `productionDate`,
/// ...). Dates are `YYYY-MM-DD` strings and `shelf_life` is a duration string;
/// the three are expected, but not enforced, to agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodInfo {
    pub food_name: String,
    pub production_date: String,
    pub shelf_life: String,
    pub expiration_date: String,
    pub uuid: FoodId,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub food_type: String,
}

impl FoodInfo {
    pub fn has_tips(&self) -> bool {
        !self.tips.trim().is_empty()
    }
}

impl Entity for FoodInfo {
    type Id = FoodId;

    fn id(&self) -> &Self::Id {
        &self.uuid
    }
}

/// User-defined category label.
///
/// Not keyed: two labels with the same text are the same label. Nothing ties a
/// label to `FoodInfo::food_type`, so a record may name a type that does not
/// exist here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodTypeInfo {
    pub type_name: String,
}

impl FoodTypeInfo {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl ValueObject for FoodTypeInfo {}

/// Input of the insertion flow, before an id and expiration date exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFood {
    pub food_name: String,
    pub production_date: String,
    pub shelf_life: String,
    #[serde(default)]
    pub tips: String,
    #[serde(default)]
    pub food_type: String,
}

impl NewFood {
    /// Build a record with a fresh id.
    pub fn into_food_info(self) -> DomainResult<FoodInfo> {
        self.into_food_info_with_id(FoodId::new())
    }

    /// Build a record, pre-computing `expiration_date = production_date + shelf_life`.
    ///
    /// Dates and shelf life are stored in their canonical spelling.
    pub fn into_food_info_with_id(self, uuid: FoodId) -> DomainResult<FoodInfo> {
        let food_name = self.food_name.trim().to_string();
        if food_name.is_empty() {
            return Err(DomainError::validation("food name cannot be empty"));
        }

        let production = parse_date(&self.production_date)?;
        let shelf_life: ShelfLife = self.shelf_life.parse()?;
        let expiration = shelf_life.expiration_from(production)?;

        Ok(FoodInfo {
            food_name,
            production_date: format_date(production),
            shelf_life: shelf_life.to_string(),
            expiration_date: format_date(expiration),
            uuid,
            tips: self.tips.trim().to_string(),
            food_type: self.food_type.trim().to_string(),
        })
    }
}
