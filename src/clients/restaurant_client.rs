use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{category_slug, Category, Restaurant, RestaurantCreate, RestaurantId, RestaurantPatch, UserId};
use crate::restaurant_actor::{RestaurantAction, RestaurantError};

/// Client for interacting with the Restaurant actor.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl_basic_client!(RestaurantClient, Restaurant, RestaurantError, restaurant);

impl RestaurantClient {
    #[instrument(skip(self), fields(owner_id = %params.owner_id))]
    pub async fn create_restaurant(&self, params: RestaurantCreate) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        let restaurant = self
            .inner
            .create(params)
            .await
            .map_err(|e| RestaurantError::internal("create restaurant", e))?;
        info!(restaurant_id = %restaurant.id, "Restaurant created");
        Ok(restaurant)
    }

    /// Applies `patch` when `owner` owns the restaurant.
    #[instrument(skip(self, patch))]
    pub async fn edit_restaurant(
        &self,
        owner: UserId,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<Restaurant, RestaurantError> {
        let restaurant = self.get_restaurant(id).await?.ok_or(RestaurantError::NotFound)?;
        if restaurant.owner_id != owner {
            warn!(actual_owner = %restaurant.owner_id, "Edit refused");
            return Err(RestaurantError::NotOwner);
        }

        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| match e {
            FrameworkError::NotFound(_) => RestaurantError::NotFound,
            e => RestaurantError::internal("edit restaurant", e),
        })
    }

    /// Removes a restaurant `owner` owns and returns it.
    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, owner: UserId, id: RestaurantId) -> Result<Restaurant, RestaurantError> {
        let restaurant = self.get_restaurant(id).await?.ok_or(RestaurantError::NotFound)?;
        if restaurant.owner_id != owner {
            warn!(actual_owner = %restaurant.owner_id, "Delete refused");
            return Err(RestaurantError::CannotDelete);
        }

        debug!("Sending request");
        let removed = self.inner.delete(id).await.map_err(|e| match e {
            FrameworkError::NotFound(_) => RestaurantError::NotFound,
            e => RestaurantError::internal("delete restaurant", e),
        })?;
        info!("Restaurant deleted");
        Ok(removed)
    }

    /// Restaurants whose name contains `query`, ignoring case, by id.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, query: &str) -> Result<Vec<Restaurant>, RestaurantError> {
        let needle = query.trim().to_lowercase();
        debug!("Sending request");
        let mut restaurants = self
            .inner
            .list(move |r: &Restaurant| r.name.to_lowercase().contains(&needle))
            .await
            .map_err(|e| RestaurantError::internal("search restaurants", e))?;
        restaurants.sort_by_key(|r| r.id);
        Ok(restaurants)
    }

    /// Every category in use, by name, with how many restaurants it holds.
    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> Result<Vec<Category>, RestaurantError> {
        debug!("Sending request");
        let restaurants = self
            .inner
            .list(|r: &Restaurant| r.category_name.is_some())
            .await
            .map_err(|e| RestaurantError::internal("load categories", e))?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for name in restaurants.into_iter().filter_map(|r| r.category_name) {
            *counts.entry(name).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, restaurant_count)| Category {
                slug: category_slug(&name),
                name,
                restaurant_count,
            })
            .collect())
    }

    /// The category behind `slug` and its restaurants, promoted ones first.
    #[instrument(skip(self))]
    pub async fn category(&self, slug: &str) -> Result<(Category, Vec<Restaurant>), RestaurantError> {
        let wanted = slug.to_string();
        let in_category = move |r: &Restaurant| r.category_name.as_deref().is_some_and(|name| category_slug(name) == wanted);

        debug!("Sending request");
        let mut restaurants = self
            .inner
            .list(in_category)
            .await
            .map_err(|e| RestaurantError::internal("load category", e))?;

        let Some(name) = restaurants.first().and_then(|r| r.category_name.clone()) else {
            warn!("Unknown category");
            return Err(RestaurantError::CategoryNotFound);
        };
        restaurants.sort_by_key(|r| (!r.is_promoted, r.id));
        let category = Category {
            slug: category_slug(&name),
            name,
            restaurant_count: restaurants.len(),
        };
        Ok((category, restaurants))
    }

    /// All restaurants, promoted ones first.
    #[instrument(skip(self))]
    pub async fn all_restaurants(&self) -> Result<Vec<Restaurant>, RestaurantError> {
        debug!("Sending request");
        let mut restaurants = self
            .inner
            .list(|_| true)
            .await
            .map_err(|e| RestaurantError::internal("load restaurants", e))?;
        restaurants.sort_by_key(|r| (!r.is_promoted, r.id));
        Ok(restaurants)
    }

    #[instrument(skip(self))]
    pub async fn owned_by(&self, owner: UserId) -> Result<Vec<Restaurant>, RestaurantError> {
        debug!("Sending request");
        let mut restaurants = self
            .inner
            .list(move |r: &Restaurant| r.owner_id == owner)
            .await
            .map_err(|e| RestaurantError::internal("load restaurants", e))?;
        restaurants.sort_by_key(|r| r.id);
        Ok(restaurants)
    }

    #[instrument(skip(self))]
    pub async fn promote(&self, id: RestaurantId, until: DateTime<Utc>) -> Result<Restaurant, RestaurantError> {
        debug!("Sending request");
        let restaurant = self
            .inner
            .perform_action(id, RestaurantAction::Promote { until })
            .await
            .map_err(|e| match e {
                FrameworkError::NotFound(_) => RestaurantError::NotFound,
                e => RestaurantError::internal("promote restaurant", e),
            })?;
        info!(%until, "Restaurant promoted");
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn start() -> RestaurantClient {
        let counter = AtomicU64::new(1);
        let (actor, inner) =
            ResourceActor::new(8, move || RestaurantId(counter.fetch_add(1, Ordering::SeqCst)));
        tokio::spawn(actor.run());
        RestaurantClient::new(inner)
    }

    fn params(owner: u64, name: &str) -> RestaurantCreate {
        RestaurantCreate {
            owner_id: UserId(owner),
            name: name.to_string(),
            address: "1 Main St".to_string(),
            category_name: None,
            cover_image: None,
        }
    }

    fn in_category(owner: u64, name: &str, category: &str) -> RestaurantCreate {
        RestaurantCreate {
            category_name: Some(category.to_string()),
            ..params(owner, name)
        }
    }

    fn names(restaurants: Vec<Restaurant>) -> Vec<String> {
        restaurants.into_iter().map(|r| r.name).collect()
    }

    #[tokio::test]
    async fn test_only_owner_can_edit() {
        let client = start();
        let restaurant = client.create_restaurant(params(1, "Grill")).await.unwrap();
        let patch = || RestaurantPatch { name: Some("Grill House".into()), ..Default::default() };

        let refused = client.edit_restaurant(UserId(2), restaurant.id, patch()).await;
        assert_eq!(refused, Err(RestaurantError::NotOwner));

        let edited = client.edit_restaurant(UserId(1), restaurant.id, patch()).await.unwrap();
        assert_eq!(edited.name, "Grill House");
        assert_eq!(edited.address, "1 Main St");

        let missing = client.edit_restaurant(UserId(1), RestaurantId(99), patch()).await;
        assert_eq!(missing, Err(RestaurantError::NotFound));
    }

    #[tokio::test]
    async fn test_listing_orders_and_scoping() {
        let client = start();
        client.create_restaurant(params(1, "A")).await.unwrap();
        let b = client.create_restaurant(params(2, "B")).await.unwrap();
        client.create_restaurant(params(1, "C")).await.unwrap();

        client.promote(b.id, Utc::now()).await.unwrap();

        let names: Vec<_> = client.all_restaurants().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["B", "A", "C"]);

        let owned: Vec<_> = client.owned_by(UserId(1)).await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(owned, ["A", "C"]);
    }

    #[tokio::test]
    async fn test_only_owner_can_delete() {
        let client = start();
        let restaurant = client.create_restaurant(params(1, "Grill")).await.unwrap();

        let refused = client.delete_restaurant(UserId(2), restaurant.id).await;
        assert_eq!(refused, Err(RestaurantError::CannotDelete));
        assert_eq!(refused.unwrap_err().to_string(), "You can't delete a restaurant that you don't own");
        assert!(client.get_restaurant(restaurant.id).await.unwrap().is_some());

        assert_eq!(client.delete_restaurant(UserId(1), restaurant.id).await, Ok(restaurant.clone()));
        assert_eq!(client.get_restaurant(restaurant.id).await.unwrap(), None);
        assert_eq!(
            client.delete_restaurant(UserId(1), restaurant.id).await,
            Err(RestaurantError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_search_matches_name_ignoring_case() {
        let client = start();
        client.create_restaurant(params(1, "Burger Barn")).await.unwrap();
        client.create_restaurant(params(2, "Pizza Place")).await.unwrap();
        client.create_restaurant(params(1, "BURGER KING")).await.unwrap();

        assert_eq!(
            names(client.search_restaurants("burger").await.unwrap()),
            ["Burger Barn", "BURGER KING"]
        );
        assert_eq!(names(client.search_restaurants(" place ").await.unwrap()), ["Pizza Place"]);
        assert!(client.search_restaurants("sushi").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories_count_their_restaurants() {
        let client = start();
        client.create_restaurant(in_category(1, "A", "Korean BBQ")).await.unwrap();
        client.create_restaurant(in_category(2, "B", "pizza")).await.unwrap();
        let c = client.create_restaurant(in_category(1, "C", "korean bbq ")).await.unwrap();
        client.create_restaurant(params(1, "D")).await.unwrap();
        client.promote(c.id, Utc::now()).await.unwrap();

        let categories = client.all_categories().await.unwrap();
        assert_eq!(
            categories,
            [
                Category { name: "korean bbq".into(), slug: "korean-bbq".into(), restaurant_count: 2 },
                Category { name: "pizza".into(), slug: "pizza".into(), restaurant_count: 1 },
            ]
        );

        let (category, restaurants) = client.category("korean-bbq").await.unwrap();
        assert_eq!(category, categories[0]);
        assert_eq!(names(restaurants), ["C", "A"]);

        assert_eq!(client.category("sushi").await, Err(RestaurantError::CategoryNotFound));
    }
}
