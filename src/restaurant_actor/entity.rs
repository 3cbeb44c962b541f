use super::actions::RestaurantAction;
use crate::actor_framework::Entity;
use crate::domain::{normalize_category, Restaurant, RestaurantCreate, RestaurantId, RestaurantPatch};

impl Entity for Restaurant {
    type Id = RestaurantId;
    type CreateParams = RestaurantCreate;
    type UpdateParams = RestaurantPatch;
    type Action = RestaurantAction;
    type ActionResult = Restaurant;

    fn id(&self) -> &RestaurantId {
        &self.id
    }

    fn from_create_params(id: RestaurantId, params: RestaurantCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            name: params.name,
            address: params.address,
            category_name: params.category_name.as_deref().and_then(normalize_category),
            cover_image: params.cover_image,
            owner_id: params.owner_id,
            is_promoted: false,
            promoted_until: None,
        })
    }

    /// Applies the fields present in the patch. Ownership never changes and a
    /// blank category name removes the category.
    fn on_update(&mut self, patch: RestaurantPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(category_name) = patch.category_name {
            self.category_name = normalize_category(&category_name);
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = Some(cover_image);
        }
        Ok(())
    }

    fn handle_action(&mut self, action: RestaurantAction) -> Result<Restaurant, String> {
        match action {
            RestaurantAction::Promote { until } => {
                self.is_promoted = true;
                self.promoted_until = Some(until);
            }
        }
        Ok(self.clone())
    }
}
