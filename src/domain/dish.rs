use serde::{Deserialize, Serialize};

use super::{DishId, RestaurantId};

/// Prices are whole currency units.
pub type Price = i64;

/// One selectable value of a [`DishOption`], e.g. "Large" for "Size".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishChoice {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Price>,
}

/// An option on a dish. Either carries a flat `extra` or a list of choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<DishChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Price>,
}

impl DishOption {
    pub fn flat(name: impl Into<String>, extra: Price) -> Self {
        Self {
            name: name.into(),
            choices: Vec::new(),
            extra: Some(extra),
        }
    }

    pub fn with_choices(name: impl Into<String>, choices: Vec<DishChoice>) -> Self {
        Self {
            name: name.into(),
            choices,
            extra: None,
        }
    }
}

impl DishChoice {
    pub fn new(name: impl Into<String>, extra: Option<Price>) -> Self {
        Self {
            name: name.into(),
            extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: DishId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub photo: Option<String>,
    pub options: Vec<DishOption>,
}

/// Payload for creating a new dish on a restaurant's menu.
#[derive(Debug, Clone)]
pub struct DishCreate {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub photo: Option<String>,
    pub options: Vec<DishOption>,
}
