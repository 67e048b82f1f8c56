// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Serialize;

use super::{Budget, div_round, parse_price};

/// Secondary statistics about a computed budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    /// Events with a non-zero final price
    pub paid_count: usize,

    /// Events with a zero final price
    pub free_count: usize,

    /// Mean final price of paid events, rounded; 0 when nothing is paid
    pub average_price: u64,

    /// Amount the active ticket category saves over full price
    pub savings: u64,

    /// Events whose listed price is free, before any discount
    pub available_free_events: usize,

    /// Total before discount
    pub full_price_total: u64,
}

pub fn compute_analytics(budget: &Budget) -> Analytics {
    let (paid, free): (Vec<_>, Vec<_>) = budget.events.iter().partition(|e| e.final_price > 0);

    let paid_total = paid
        .iter()
        .map(|e| e.final_price)
        .fold(0, u64::saturating_add);
    let average_price = if paid.is_empty() {
        0
    } else {
        div_round(u128::from(paid_total), paid.len() as u128) as u64
    };

    let full_price_total = budget
        .events
        .iter()
        .map(|e| e.price_value)
        .fold(0, u64::saturating_add);

    // Coefficients never exceed 1, so the discounted total is never above full price.
    let savings = full_price_total.saturating_sub(budget.total);

    let available_free_events = budget
        .events
        .iter()
        .filter(|e| parse_price(&e.event.price) == 0)
        .count();

    Analytics {
        paid_count: paid.len(),
        free_count: free.len(),
        average_price,
        savings,
        available_free_events,
        full_price_total,
    }
}
