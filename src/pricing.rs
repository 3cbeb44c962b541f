//! Order pricing.
//!
//! An item costs the dish's base price plus the surcharges matched by the
//! selected options. A catalog option with a non-zero flat `extra` always
//! adds that extra; otherwise the selected choice is looked up by name and
//! its `extra`, if any, is added. Options or choices missing from the
//! catalog add nothing.
//!
//! Sums are checked: a price that does not fit a [`Price`] is an error,
//! never a wrapped or saturated amount.

use thiserror::Error;
use tracing::debug;

use crate::domain::{Dish, DishOption, OrderItemOption, Price};

#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("Price out of range")]
pub struct PriceOverflow;

/// Final price of one order item.
pub fn item_price(dish: &Dish, selected: &[OrderItemOption]) -> Result<Price, PriceOverflow> {
    selected
        .iter()
        .try_fold(dish.price, |price, option| price.checked_add(surcharge(dish, option)).ok_or(PriceOverflow))
}

/// Sum of already priced items.
pub fn order_total(item_prices: impl IntoIterator<Item = Price>) -> Result<Price, PriceOverflow> {
    item_prices
        .into_iter()
        .try_fold(0, |total: Price, price| total.checked_add(price).ok_or(PriceOverflow))
}

fn surcharge(dish: &Dish, selected: &OrderItemOption) -> Price {
    let Some(option) = dish.options.iter().find(|o| o.name == selected.name) else {
        debug!(dish_id = %dish.id, option = %selected.name, "Unknown option ignored");
        return 0;
    };

    match option.extra {
        Some(extra) if extra != 0 => extra,
        _ => choice_extra(option, selected.choice.as_deref()),
    }
}

fn choice_extra(option: &DishOption, choice: Option<&str>) -> Price {
    let Some(choice) = choice else {
        return 0;
    };
    match option.choices.iter().find(|c| c.name == choice) {
        Some(found) => found.extra.unwrap_or(0),
        None => {
            debug!(option = %option.name, choice, "Unknown choice ignored");
            0
        }
    }
}
