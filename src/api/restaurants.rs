use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::guard;
use crate::auth::AccessDenied;
use crate::clients::{DishClient, RestaurantClient};
use crate::domain::{
    Category, Dish, DishCreate, DishId, DishOption, Price, Restaurant, RestaurantCreate, RestaurantId,
    RestaurantPatch, User,
};
use crate::envelope::Envelope;
use crate::policy::OWNER_ONLY;
use crate::restaurant_actor::RestaurantError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantInput {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantOutput {
    pub restaurant_id: RestaurantId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRestaurantInput {
    pub restaurant_id: RestaurantId,
    #[serde(flatten)]
    pub patch: RestaurantPatch,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInput {
    pub restaurant_id: RestaurantId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantOutput {
    pub restaurant: Restaurant,
    pub menu: Vec<Dish>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantsOutput {
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRestaurantInput {
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllCategoriesOutput {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOutput {
    pub category: Category,
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishInput {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub price: Price,
    pub description: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub options: Vec<DishOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishOutput {
    pub dish_id: DishId,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishInput {
    pub dish_id: DishId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishOutput {
    pub dish: Dish,
}

/// Restaurant and menu operations. Reads are public.
#[derive(Clone)]
pub struct RestaurantResolver {
    restaurants: RestaurantClient,
    dishes: DishClient,
}

impl RestaurantResolver {
    pub fn new(restaurants: RestaurantClient, dishes: DishClient) -> Self {
        Self { restaurants, dishes }
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn create_restaurant(
        &self,
        caller: &User,
        input: CreateRestaurantInput,
    ) -> Result<Envelope<CreateRestaurantOutput>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let params = RestaurantCreate {
            owner_id: caller.id,
            name: input.name,
            address: input.address,
            category_name: input.category_name,
            cover_image: input.cover_image,
        };
        let result = self.restaurants.create_restaurant(params).await;
        Ok(result.map(|r| CreateRestaurantOutput { restaurant_id: r.id }).into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn edit_restaurant(&self, caller: &User, input: EditRestaurantInput) -> Result<Envelope<()>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let result = self
            .restaurants
            .edit_restaurant(caller.id, input.restaurant_id, input.patch)
            .await;
        Ok(result.map(|_| ()).into())
    }

    /// Deletes the restaurant together with its menu.
    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn delete_restaurant(&self, caller: &User, input: RestaurantInput) -> Result<Envelope<()>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let delete = async {
            let restaurant = self.restaurants.delete_restaurant(caller.id, input.restaurant_id).await?;
            self.dishes.remove_menu(restaurant.id).await?;
            Ok::<_, RestaurantError>(())
        };
        Ok(delete.await.into())
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn my_restaurants(&self, caller: &User) -> Result<Envelope<RestaurantsOutput>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let result = self.restaurants.owned_by(caller.id).await;
        Ok(result.map(|restaurants| RestaurantsOutput { restaurants }).into())
    }

    #[instrument(skip(self))]
    pub async fn restaurant(&self, input: RestaurantInput) -> Envelope<RestaurantOutput> {
        let load = async {
            let restaurant = self
                .restaurants
                .get_restaurant(input.restaurant_id)
                .await?
                .ok_or(RestaurantError::NotFound)?;
            let menu = self.dishes.menu(restaurant.id).await?;
            Ok::<_, RestaurantError>(RestaurantOutput { restaurant, menu })
        };
        load.await.into()
    }

    #[instrument(skip(self))]
    pub async fn all_restaurants(&self) -> Envelope<RestaurantsOutput> {
        let result = self.restaurants.all_restaurants().await;
        result.map(|restaurants| RestaurantsOutput { restaurants }).into()
    }

    #[instrument(skip(self))]
    pub async fn search_restaurant(&self, input: SearchRestaurantInput) -> Envelope<RestaurantsOutput> {
        let result = self.restaurants.search_restaurants(&input.query).await;
        result.map(|restaurants| RestaurantsOutput { restaurants }).into()
    }

    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> Envelope<AllCategoriesOutput> {
        let result = self.restaurants.all_categories().await;
        result.map(|categories| AllCategoriesOutput { categories }).into()
    }

    #[instrument(skip(self))]
    pub async fn category(&self, input: CategoryInput) -> Envelope<CategoryOutput> {
        let result = self.restaurants.category(&input.slug).await;
        result
            .map(|(category, restaurants)| CategoryOutput { category, restaurants })
            .into()
    }

    #[instrument(skip(self, caller), fields(caller = %caller.id))]
    pub async fn create_dish(
        &self,
        caller: &User,
        input: CreateDishInput,
    ) -> Result<Envelope<CreateDishOutput>, AccessDenied> {
        guard(OWNER_ONLY, caller)?;
        let params = DishCreate {
            restaurant_id: input.restaurant_id,
            name: input.name,
            price: input.price,
            description: input.description,
            photo: input.photo,
            options: input.options,
        };
        let result = self.dishes.create_dish(caller.id, params).await;
        Ok(result.map(|dish| CreateDishOutput { dish_id: dish.id }).into())
    }

    #[instrument(skip(self))]
    pub async fn dish(&self, input: DishInput) -> Envelope<DishOutput> {
        let result = self.dishes.get_dish(input.dish_id).await;
        result
            .and_then(|dish| dish.ok_or(RestaurantError::DishNotFound))
            .map(|dish| DishOutput { dish })
            .into()
    }
}
