use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ItemId = u64;

pub const OUTLETS: [Outlet; 3] = [Outlet::Kathi, Outlet::Southern, Outlet::Quench];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest<'a> {
    pub user_phone: &'a str,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    pub outlet: String,
    pub time: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_price: f64,
    pub orders: Vec<OrderLineItem>,
}

impl Order {
    /// Sum of line-item subtotals. Expected to match `total_price`, which is
    /// what the backend charged and what gets displayed.
    pub fn items_total(&self) -> f64 {
        self.orders.iter().map(OrderLineItem::subtotal).sum()
    }

    pub fn total_matches_items(&self) -> bool {
        (self.items_total() - self.total_price).abs() < 0.005
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderLineItem {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub food: String,
    pub price: f64,
    pub quantity: u32,
}

impl OrderLineItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Completed,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Settled,
    InProgress,
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        crate::utils::capitalize(self.as_str())
    }

    /// Only completed orders read as settled; every other status, known or
    /// not, is shown as still in progress.
    pub fn tone(&self) -> StatusTone {
        match self {
            OrderStatus::Completed => StatusTone::Settled,
            _ => StatusTone::InProgress,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => OrderStatus::Pending,
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outlet {
    Kathi,
    Southern,
    Quench,
}

impl Outlet {
    pub fn as_str(self) -> &'static str {
        match self {
            Outlet::Kathi => "kathi",
            Outlet::Southern => "southern",
            Outlet::Quench => "quench",
        }
    }

    pub fn matches(self, outlet: &str) -> bool {
        outlet.eq_ignore_ascii_case(self.as_str())
    }
}

/// The selected order-history tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutletFilter {
    #[default]
    All,
    Only(Outlet),
}

impl OutletFilter {
    pub fn tabs() -> impl Iterator<Item = OutletFilter> {
        std::iter::once(OutletFilter::All).chain(OUTLETS.into_iter().map(OutletFilter::Only))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutletFilter::All => "all",
            OutletFilter::Only(outlet) => outlet.as_str(),
        }
    }

    pub fn keeps(self, order: &Order) -> bool {
        match self {
            OutletFilter::All => true,
            OutletFilter::Only(outlet) => outlet.matches(&order.outlet),
        }
    }
}

impl fmt::Display for OutletFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOutlet(pub String);

impl fmt::Display for UnknownOutlet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown outlet {:?}, expected one of all, kathi, southern, quench", self.0)
    }
}

impl std::error::Error for UnknownOutlet {}

impl FromStr for OutletFilter {
    type Err = UnknownOutlet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("all") {
            return Ok(OutletFilter::All);
        }

        OUTLETS
            .into_iter()
            .find(|outlet| outlet.matches(s))
            .map(OutletFilter::Only)
            .ok_or_else(|| UnknownOutlet(s.to_string()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
