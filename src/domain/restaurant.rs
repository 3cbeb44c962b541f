use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RestaurantId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub category_name: Option<String>,
    pub cover_image: Option<String>,
    pub owner_id: UserId,
    pub is_promoted: bool,
    pub promoted_until: Option<DateTime<Utc>>,
}

/// Payload for creating a new restaurant.
#[derive(Debug, Clone)]
pub struct RestaurantCreate {
    pub owner_id: UserId,
    pub name: String,
    pub address: String,
    pub category_name: Option<String>,
    pub cover_image: Option<String>,
}

/// Payload for editing a restaurant. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub category_name: Option<String>,
    pub cover_image: Option<String>,
}
