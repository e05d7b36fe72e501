use std::cmp::Reverse;

use crate::models::{Order, OutletFilter};

/// Orders kept by `filter`, most recent first. Orders placed at the same
/// instant keep their fetched order. The raw list is never reordered.
pub fn project<'a>(orders: &'a [Order], filter: OutletFilter) -> Vec<&'a Order> {
    let mut projected: Vec<&Order> = orders.iter().filter(|order| filter.keeps(order)).collect();

    projected.sort_by_key(|order| Reverse(order.time));

    projected
}
