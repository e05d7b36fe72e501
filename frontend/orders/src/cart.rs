//! # Cart
//!
//! Overlay listing what the user picked. The cart itself lives with the
//! owner, this view only reads it and forwards what the user asked for.
//!
//! ## Stepper
//!
//! - `-` and `+` send `quantity - 1` and `quantity + 1` to the owner
//! - No clamping: going below 1 is the owner's call
use std::fmt;

use tracing::debug;

use crate::{
    models::{CartItem, ItemId},
    utils::format_amount,
};

pub trait CartOwner {
    fn close(&mut self);

    fn remove_from_cart(&mut self, id: ItemId);

    fn update_quantity(&mut self, id: ItemId, quantity: i64);

    /// Checkout is not wired to anything yet.
    fn checkout(&mut self, _total: f64) {
        debug!("Checkout requested, nothing to do");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartIntent {
    Close,
    Remove(ItemId),
    Decrement(ItemId),
    Increment(ItemId),
    Checkout,
}

pub struct CartView<'a> {
    cart: &'a [CartItem],
}

impl<'a> CartView<'a> {
    pub fn new(cart: &'a [CartItem]) -> Self {
        Self { cart }
    }

    pub fn total(&self) -> f64 {
        self.cart.iter().map(CartItem::subtotal).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn render(&self) -> CartRender {
        if self.cart.is_empty() {
            return CartRender::Empty;
        }

        CartRender::Items {
            lines: self
                .cart
                .iter()
                .map(|item| CartLine {
                    id: item.id,
                    name: item.name.clone(),
                    unit_price: format_amount(item.price),
                    quantity: item.quantity,
                    subtotal: format_amount(item.subtotal()),
                })
                .collect(),
            total: format_amount(self.total()),
        }
    }

    /// Forwards a user action to the owner. Stepping an id that is not in the
    /// cart does nothing.
    pub fn dispatch<O: CartOwner + ?Sized>(&self, intent: CartIntent, owner: &mut O) {
        debug!("Cart intent: {intent:?}");

        match intent {
            CartIntent::Close => owner.close(),
            CartIntent::Remove(id) => owner.remove_from_cart(id),
            CartIntent::Decrement(id) => {
                if let Some(item) = self.find(id) {
                    owner.update_quantity(id, i64::from(item.quantity) - 1);
                }
            }
            CartIntent::Increment(id) => {
                if let Some(item) = self.find(id) {
                    owner.update_quantity(id, i64::from(item.quantity) + 1);
                }
            }
            CartIntent::Checkout => owner.checkout(self.total()),
        }
    }

    fn find(&self, id: ItemId) -> Option<&CartItem> {
        self.cart.iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartRender {
    Empty,
    Items { lines: Vec<CartLine>, total: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: ItemId,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl fmt::Display for CartRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your Selected Items\n")?;

        let (lines, total) = match self {
            CartRender::Empty => return writeln!(f, "Your cart is empty"),
            CartRender::Items { lines, total } => (lines, total),
        };

        for line in lines {
            writeln!(f, "#{} {}", line.id, line.name)?;
            writeln!(f, "  Rs.{} each", line.unit_price)?;
            writeln!(f, "  [-] {} [+]  Rs.{}", line.quantity, line.subtotal)?;
        }

        writeln!(f, "\nTotal: Rs.{total}")?;
        writeln!(f, "[Proceed to Checkout]")
    }
}
