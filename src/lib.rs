//! Order lifecycle core of a food-delivery marketplace.
//!
//! Every entity lives in its own [`actor_framework::ResourceActor`]; typed
//! clients in [`clients`] hold the domain rules, [`api`] exposes them as
//! role-guarded, envelope-returning operations and [`events`] pushes order
//! changes to owners, drivers and customers.
//!
//! [`app_system::DeliverySystem`] wires everything together.

pub mod actor_framework;
pub mod api;
pub mod app_system;
pub mod auth;
pub mod clients;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod events;
pub mod mailer;
pub mod policy;
pub mod pricing;

pub mod dish_actor;
pub mod order_actor;
pub mod payment_actor;
pub mod restaurant_actor;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;
