use std::str::FromStr;

use orders::{CartIntent, CartItem, CartOwner, models::ItemId, utils::format_amount};
use tracing::info;

/// Cart owner for the terminal. Stepping an item down to zero removes it.
pub struct LocalCart {
    items: Vec<CartItem>,
    open: bool,
}

impl LocalCart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items, open: true }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl CartOwner for LocalCart {
    fn close(&mut self) {
        self.open = false;
    }

    fn remove_from_cart(&mut self, id: ItemId) {
        self.items.retain(|item| item.id != id);
    }

    fn update_quantity(&mut self, id: ItemId, quantity: i64) {
        match u32::try_from(quantity) {
            Ok(quantity) if quantity > 0 => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.quantity = quantity;
                }
            }
            _ => self.remove_from_cart(id),
        }
    }

    fn checkout(&mut self, total: f64) {
        info!("Checkout for Rs.{} is not available yet", format_amount(total));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action(CartIntent);

impl From<Action> for CartIntent {
    fn from(action: Action) -> Self {
        action.0
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let intent = match s.split_once(':') {
            None if s == "checkout" => CartIntent::Checkout,
            None if s == "close" => CartIntent::Close,
            Some((verb, id)) => {
                let id: ItemId = id.parse().map_err(|e| format!("Invalid item id {id:?}: {e}"))?;

                match verb {
                    "inc" => CartIntent::Increment(id),
                    "dec" => CartIntent::Decrement(id),
                    "rm" => CartIntent::Remove(id),
                    _ => return Err(format!("Unknown action {verb:?}")),
                }
            }
            None => return Err(format!("Unknown action {s:?}")),
        };

        Ok(Action(intent))
    }
}
