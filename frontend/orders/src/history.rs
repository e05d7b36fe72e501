//! # Order History
//!
//! The "Your Orders" page: outlet tabs over the fetched orders.
//!
//! ## Rendering
//!
//! - `Loading...` only while the identity provider has not resolved
//! - Orders in flight are not a loading state, the page just shows what it has
//! - Empty projections render `No orders found.`
//! - A failed fetch adds a notice above the list
//!
//! ## Expected Time
//!
//! Each card carries a 15 to 19 minute estimate drawn fresh on every render.
//! It is decoration, not a promise from the kitchen. Pass a seeded rng for
//! repeatable output.
use std::{fmt, ops::RangeInclusive};

use rand::Rng;

use crate::{
    client::OrdersClient,
    fetcher::{FetchState, FetchStatus, OrderFetcher},
    identity::Identity,
    models::{Order, OutletFilter, StatusTone},
    projection::project,
    utils::{capitalize, format_amount, format_local},
};

pub const ESTIMATE_MINUTES: RangeInclusive<u32> = 15..=19;

pub fn expected_minutes<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(ESTIMATE_MINUTES)
}

pub struct OrderHistory {
    fetcher: OrderFetcher,
    selected: OutletFilter,
}

impl OrderHistory {
    pub fn new(client: OrdersClient) -> Self {
        Self {
            fetcher: OrderFetcher::new(client),
            selected: OutletFilter::All,
        }
    }

    pub fn sync(&mut self, identity: &Identity) -> bool {
        self.fetcher.observe(identity)
    }

    pub fn select(&mut self, filter: OutletFilter) {
        self.selected = filter;
    }

    pub fn selected(&self) -> OutletFilter {
        self.selected
    }

    pub fn retry(&mut self) -> bool {
        self.fetcher.retry()
    }

    pub fn fetcher(&self) -> &OrderFetcher {
        &self.fetcher
    }

    pub async fn settle(&mut self) {
        self.fetcher.settle().await;
    }

    pub fn render<R: Rng>(&self, identity: &Identity, rng: &mut R) -> HistoryView {
        render_history(identity, &self.fetcher.state(), self.selected, rng)
    }
}

pub fn render_history<R: Rng>(
    identity: &Identity,
    state: &FetchState,
    selected: OutletFilter,
    rng: &mut R,
) -> HistoryView {
    if !identity.loaded {
        return HistoryView::Loading;
    }

    let tabs = OutletFilter::tabs()
        .map(|filter| Tab {
            filter,
            label: capitalize(filter.as_str()),
            selected: filter == selected,
        })
        .collect();

    let cards = project(&state.orders, selected)
        .into_iter()
        .map(|order| OrderCard::new(order, expected_minutes(rng)))
        .collect();

    let notice = match &state.status {
        FetchStatus::Failed { reason, retryable } => Some(FetchNotice {
            reason: reason.clone(),
            retryable: *retryable,
        }),
        _ => None,
    };

    HistoryView::Ready {
        tabs,
        cards,
        notice,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Loading,
    Ready {
        tabs: Vec<Tab>,
        cards: Vec<OrderCard>,
        notice: Option<FetchNotice>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub filter: OutletFilter,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchNotice {
    pub reason: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderCard {
    pub id: String,
    pub heading: String,
    pub placed_on: String,
    pub expected_minutes: u32,
    pub status_label: String,
    pub tone: StatusTone,
    pub lines: Vec<LineCard>,
    pub total: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineCard {
    pub food: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl OrderCard {
    fn new(order: &Order, expected_minutes: u32) -> Self {
        Self {
            id: order.id.clone(),
            heading: order.outlet.to_uppercase(),
            placed_on: format_local(&order.time),
            expected_minutes,
            status_label: order.status.label(),
            tone: order.status.tone(),
            lines: order
                .orders
                .iter()
                .map(|item| LineCard {
                    food: item.food.clone(),
                    unit_price: format_amount(item.price),
                    quantity: item.quantity,
                    subtotal: format_amount(item.subtotal()),
                })
                .collect(),
            total: format_amount(order.total_price),
        }
    }
}

impl HistoryView {
    pub fn cards(&self) -> &[OrderCard] {
        match self {
            HistoryView::Loading => &[],
            HistoryView::Ready { cards, .. } => cards,
        }
    }
}

impl fmt::Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tabs, cards, notice) = match self {
            HistoryView::Loading => return writeln!(f, "Loading..."),
            HistoryView::Ready {
                tabs,
                cards,
                notice,
            } => (tabs, cards, notice),
        };

        writeln!(f, "Your Orders\n")?;

        let tab_line: Vec<String> = tabs
            .iter()
            .map(|tab| {
                if tab.selected {
                    format!("[{}]", tab.label)
                } else {
                    format!(" {} ", tab.label)
                }
            })
            .collect();
        writeln!(f, "{}\n", tab_line.join(" "))?;

        if let Some(notice) = notice {
            let prompt = if notice.retryable { ". Retry?" } else { "" };
            writeln!(f, "Could not load orders: {}{prompt}\n", notice.reason)?;
        }

        if cards.is_empty() {
            return writeln!(f, "No orders found.");
        }

        for card in cards {
            write!(f, "{card}")?;
        }

        Ok(())
    }
}

impl fmt::Display for OrderCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Outlet: {}  [{}]", self.heading, self.status_label)?;
        writeln!(f, "Placed on: {}", self.placed_on)?;
        writeln!(f, "Expected Time : In {} Minutes", self.expected_minutes)?;

        for line in &self.lines {
            writeln!(
                f,
                "  {}  ₹{} per unit  x{}  ₹{}",
                line.food, line.unit_price, line.quantity, line.subtotal
            )?;
        }

        writeln!(f, "Total Amount  ₹{}\n", self.total)
    }
}
