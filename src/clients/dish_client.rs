use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::RestaurantClient;
use crate::domain::{Dish, DishCreate, RestaurantId, UserId};
use crate::restaurant_actor::RestaurantError;

/// Client for interacting with the Dish actor. Menu rules live with restaurants,
/// so dish failures are reported as [`RestaurantError`].
#[derive(Clone)]
pub struct DishClient {
    inner: ResourceClient<Dish>,
    restaurants: RestaurantClient,
}

impl_client_methods!(DishClient, Dish, RestaurantError, dish);

impl DishClient {
    pub fn new(inner: ResourceClient<Dish>, restaurants: RestaurantClient) -> Self {
        Self { inner, restaurants }
    }

    /// Adds a dish to a restaurant the caller owns.
    #[instrument(skip(self, params), fields(restaurant_id = %params.restaurant_id))]
    pub async fn create_dish(&self, owner: UserId, params: DishCreate) -> Result<Dish, RestaurantError> {
        let restaurant = self
            .restaurants
            .get_restaurant(params.restaurant_id)
            .await?
            .ok_or(RestaurantError::NotFound)?;
        if restaurant.owner_id != owner {
            warn!("Dish creation refused, caller does not own the restaurant");
            return Err(RestaurantError::NotAllowed);
        }

        debug!("Sending request");
        let dish = self.inner.create(params).await.map_err(|e| match e {
            FrameworkError::Rejected(reason) => RestaurantError::InvalidDish(reason),
            e => RestaurantError::internal("create dish", e),
        })?;
        info!(dish_id = %dish.id, "Dish created");
        Ok(dish)
    }

    #[instrument(skip(self))]
    pub async fn menu(&self, restaurant_id: RestaurantId) -> Result<Vec<Dish>, RestaurantError> {
        debug!("Sending request");
        let mut dishes = self
            .inner
            .list(move |d: &Dish| d.restaurant_id == restaurant_id)
            .await
            .map_err(|e| RestaurantError::internal("load menu", e))?;
        dishes.sort_by_key(|d| d.id);
        Ok(dishes)
    }

    /// Deletes every dish of a restaurant that no longer exists.
    #[instrument(skip(self))]
    pub async fn remove_menu(&self, restaurant_id: RestaurantId) -> Result<usize, RestaurantError> {
        let dishes = self.menu(restaurant_id).await?;
        let mut removed = 0;
        for dish in dishes {
            match self.inner.delete(dish.id).await {
                Ok(_) => removed += 1,
                Err(FrameworkError::NotFound(_)) => {}
                Err(e) => return Err(RestaurantError::internal("delete menu", e)),
            }
        }
        info!(removed, "Menu removed");
        Ok(removed)
    }
}
