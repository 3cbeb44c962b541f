use std::sync::Arc;

use futures_util::StreamExt;
use tracing::{info, Instrument};

use delivery_orders::api::{CreateDishInput, CreateOrderInput, CreateOrderItemInput, CreateRestaurantInput, EditOrderInput, OrderInput};
use delivery_orders::app_system::{setup_tracing, DeliverySystem};
use delivery_orders::auth::IssuedTokens;
use delivery_orders::config::AppConfig;
use delivery_orders::domain::{DishChoice, DishOption, OrderItemOption, OrderStatus, User, UserCreate, UserRole};
use delivery_orders::mailer::LogMailer;

async fn sign_in(system: &DeliverySystem, tokens: &IssuedTokens, email: &str, role: UserRole) -> Result<User, String> {
    let user = system
        .user_client
        .create_account(UserCreate { email: email.to_string(), role })
        .await
        .map_err(|e| e.to_string())?;
    let token = tokens.issue(user.id).await;
    system.authenticate(&token).await.map_err(|e| e.to_string())
}

fn render<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    setup_tracing(&config);

    info!("Starting delivery system");
    let tokens = IssuedTokens::new();
    let system = DeliverySystem::new(&config, Arc::new(LogMailer), Arc::new(tokens.clone()));

    let owner = sign_in(&system, &tokens, "owner@example.com", UserRole::Owner).await?;
    let client = sign_in(&system, &tokens, "client@example.com", UserRole::Client).await?;
    let driver = sign_in(&system, &tokens, "driver@example.com", UserRole::Delivery).await?;

    let span = tracing::info_span!("catalog_setup", owner_id = %owner.id);
    let (restaurant_id, dish_id) = async {
        let restaurant = system
            .restaurants
            .create_restaurant(
                &owner,
                CreateRestaurantInput {
                    name: "Grill".to_string(),
                    address: "1 Main St".to_string(),
                    category_name: Some("Burgers".to_string()),
                    cover_image: None,
                },
            )
            .await
            .map_err(|e| e.to_string())?
            .data
            .ok_or("restaurant was not created")?;

        let options = vec![DishOption::with_choices(
            "Size",
            vec![DishChoice::new("Small", None), DishChoice::new("Large", Some(2))],
        )];
        let dish = system
            .restaurants
            .create_dish(
                &owner,
                CreateDishInput {
                    restaurant_id: restaurant.restaurant_id,
                    name: "Burger".to_string(),
                    price: 10,
                    description: "Beef patty".to_string(),
                    photo: None,
                    options,
                },
            )
            .await
            .map_err(|e| e.to_string())?
            .data
            .ok_or("dish was not created")?;
        Ok::<_, String>((restaurant.restaurant_id, dish.dish_id))
    }
    .instrument(span)
    .await?;

    let categories = system.restaurants.all_categories().await;
    info!(envelope = %render(&categories), "allCategories");

    let mut pending = system.orders.pending_orders(&owner).map_err(|e| e.to_string())?;
    let mut cooked = system.orders.cooked_orders(&driver).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("order_processing", customer_id = %client.id);
    async {
        let input = CreateOrderInput {
            restaurant_id,
            items: vec![CreateOrderItemInput {
                dish_id,
                options: vec![OrderItemOption::new("Size", Some("Large"))],
            }],
        };
        let created = system.orders.create_order(&client, input).await.map_err(|e| e.to_string())?;
        info!(envelope = %render(&created), "createOrder");
        let order_id = created.data.ok_or("order was not created")?.order_id;

        if let Some(order) = pending.next().await {
            info!(order = %render(&order), "Owner notified of pending order");
        }

        for status in [OrderStatus::Cooking, OrderStatus::Cooked] {
            let edited = system
                .orders
                .edit_order(&owner, EditOrderInput { id: order_id, status })
                .await
                .map_err(|e| e.to_string())?;
            info!(%status, envelope = %render(&edited), "editOrder");
        }

        if let Some(order) = cooked.next().await {
            info!(order_id = %order.id, "Drivers notified of cooked order");
        }

        let taken = system
            .orders
            .take_order(&driver, OrderInput { id: order_id })
            .await
            .map_err(|e| e.to_string())?;
        info!(envelope = %render(&taken), "takeOrder");

        let delivered = system
            .orders
            .edit_order(&driver, EditOrderInput { id: order_id, status: OrderStatus::Delivered })
            .await
            .map_err(|e| e.to_string())?;
        info!(envelope = %render(&delivered), "editOrder");

        let refused = system
            .orders
            .edit_order(&client, EditOrderInput { id: order_id, status: OrderStatus::Cooking })
            .await
            .map_err(|e| e.to_string())?;
        info!(envelope = %render(&refused), "editOrder by client");

        let seen = system
            .orders
            .get_order(&client, OrderInput { id: order_id })
            .await
            .map_err(|e| e.to_string())?;
        info!(envelope = %render(&seen), "getOrder");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
