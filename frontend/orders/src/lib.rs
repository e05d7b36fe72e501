//! # Orders
//!
//! Client side of the food ordering site: the signed-in user's order history
//! and the cart overlay.
//!
//! ## Order History
//!
//! - Identity resolves, one `POST /myorders/fetch` with `{ "userPhone": ... }` goes out
//! - Response replaces the fetched list, failures keep the old one
//! - Tabs filter by outlet (`all`, `kathi`, `southern`, `quench`), newest first
//!
//! ## Cart
//!
//! - The cart belongs to whoever renders the overlay
//! - The overlay reports removals and quantity changes back to it
//!
//! ## Environment
//!
//! - `ORDERS_API_URL`: base URL of the orders backend, `http://localhost:8080` by default
//! - `ORDERS_TIMEOUT_MS`: request timeout, `5000` by default
pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod history;
pub mod identity;
pub mod models;
pub mod projection;
pub mod utils;

pub use cart::{CartIntent, CartOwner, CartRender, CartView};
pub use client::OrdersClient;
pub use config::Config;
pub use error::AppError;
pub use fetcher::{FetchState, FetchStatus, OrderFetcher};
pub use history::{HistoryView, OrderHistory};
pub use identity::Identity;
pub use models::{CartItem, Order, OrderLineItem, OrderStatus, Outlet, OutletFilter};
pub use projection::project;
