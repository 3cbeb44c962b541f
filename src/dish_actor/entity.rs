use crate::actor_framework::Entity;
use crate::domain::{Dish, DishCreate, DishId};

impl Entity for Dish {
    type Id = DishId;
    type CreateParams = DishCreate;
    type UpdateParams = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &DishId {
        &self.id
    }

    /// # Errors
    /// A negative base price or surcharge is rejected.
    fn from_create_params(id: DishId, params: DishCreate) -> Result<Self, String> {
        if params.price < 0 {
            return Err(format!("negative price {}", params.price));
        }
        let negative_extra = params.options.iter().any(|option| {
            option.extra.is_some_and(|e| e < 0)
                || option.choices.iter().any(|c| c.extra.is_some_and(|e| e < 0))
        });
        if negative_extra {
            return Err("negative option extra".to_string());
        }

        Ok(Self {
            id,
            restaurant_id: params.restaurant_id,
            name: params.name,
            price: params.price,
            description: params.description,
            photo: params.photo,
            options: params.options,
        })
    }

    fn on_update(&mut self, _update: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
