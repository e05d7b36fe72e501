//! # Order Fetcher
//!
//! Loads the signed-in user's past orders, once per phone number.
//!
//! ## Trigger
//!
//! - Nothing happens while the identity provider is still loading or the user has no phone
//! - The first time a phone number is seen, one `POST /myorders/fetch` goes out
//! - Observing the same number again does nothing, a different number fires again
//!
//! ## Late Responses
//!
//! - Every trigger bumps a generation counter stored next to the orders
//! - A response is only applied if its generation is still current
//! - The check and the write happen under the same channel lock
//! - Dropping the fetcher aborts whatever is in flight
//! - Signing out mid-flight drops back to `Idle`, or `Loaded` when earlier orders are kept
//!
//! ## Failures
//!
//! - Network, status and decode errors are logged and keep the previous orders
//! - Status moves to `Failed` so the view can offer a retry
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{client::OrdersClient, identity::Identity, models::Order};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed { reason: String, retryable: bool },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchState {
    pub orders: Vec<Order>,
    pub status: FetchStatus,
    pub(crate) generation: u64,
}

pub struct OrderFetcher {
    client: OrdersClient,
    state: watch::Sender<FetchState>,
    last_phone: Option<String>,
    in_flight: Option<JoinHandle<()>>,
}

impl OrderFetcher {
    pub fn new(client: OrdersClient) -> Self {
        let (state, _) = watch::channel(FetchState::default());

        Self {
            client,
            state,
            last_phone: None,
            in_flight: None,
        }
    }

    /// Reacts to the latest identity snapshot. Must be called from inside a
    /// Tokio runtime. Returns whether a request was started.
    pub fn observe(&mut self, identity: &Identity) -> bool {
        let phone = identity.user_phone();

        if phone == self.last_phone {
            return false;
        }

        self.last_phone = phone.clone();

        match phone {
            Some(phone) => {
                self.start(phone);
                true
            }
            None => {
                debug!("Phone no longer known, invalidating in-flight fetch");
                self.invalidate(|state| {
                    if state.status == FetchStatus::Loading {
                        state.status = if state.orders.is_empty() {
                            FetchStatus::Idle
                        } else {
                            FetchStatus::Loaded
                        };
                    }
                });
                false
            }
        }
    }

    /// Re-issues the request for the current phone, if any.
    pub fn retry(&mut self) -> bool {
        match self.last_phone.clone() {
            Some(phone) => {
                info!("Retrying order fetch");
                self.start(phone);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn user_phone(&self) -> Option<&str> {
        self.last_phone.as_deref()
    }

    /// Waits for the in-flight request, if any, to finish.
    pub async fn settle(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if let Err(e) = handle.await {
                debug!("Order fetch task ended early: {e}");
            }
        }
    }

    /// Aborts the in-flight request and moves to a new generation, applying
    /// `update` under the same lock.
    fn invalidate(&mut self, update: impl FnOnce(&mut FetchState)) -> u64 {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            update(state);
        });

        generation
    }

    fn start(&mut self, phone: String) {
        let ticket = self.invalidate(|state| state.status = FetchStatus::Loading);

        let client = self.client.clone();
        let state = self.state.clone();

        info!("Fetching orders from {}", client.endpoint());

        self.in_flight = Some(tokio::spawn(async move {
            let result = client.fetch_orders(&phone).await;

            state.send_if_modified(|current| {
                if current.generation != ticket {
                    debug!("Discarding stale order response");
                    return false;
                }

                match result {
                    Ok(orders) => {
                        info!("Fetched {} orders", orders.len());

                        #[cfg(feature = "verbose")]
                        info!("Fetched orders: {:?}", orders);

                        for order in orders.iter().filter(|o| !o.total_matches_items()) {
                            warn!(
                                "Order {} total {} differs from its items {}",
                                order.id,
                                order.total_price,
                                order.items_total()
                            );
                        }

                        current.orders = orders;
                        current.status = FetchStatus::Loaded;
                    }
                    Err(e) => {
                        warn!("Error fetching orders: {e}");

                        current.status = FetchStatus::Failed {
                            reason: e.to_string(),
                            retryable: e.is_transient(),
                        };
                    }
                }

                true
            });
        }));
    }
}

impl Drop for OrderFetcher {
    fn drop(&mut self) {
        self.invalidate(|_| {});
    }
}
