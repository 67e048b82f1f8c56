// SPDX-License-Identifier: GPL-3.0-or-later

//! Budget reports in multiple output formats.

use crate::budget::{BudgetProgress, CURRENCY_SIGN, PricedEvent};
use crate::catalog::Event;

pub mod html;
pub mod json;
pub mod terminal;
pub mod text;

/// Format an amount with the currency sign, e.g. `"350 ₽"`.
pub fn money(amount: u64) -> String {
    format!("{amount} {CURRENCY_SIGN}")
}

/// The event type for display; unlike the budget breakdown, a missing type
/// is shown as such rather than bucketed.
pub fn type_or_unspecified(event: &Event) -> &str {
    match event.kind.as_deref().map(str::trim) {
        Some(kind) if !kind.is_empty() => kind,
        _ => "Not specified",
    }
}

/// Price cell for an event: the listed price struck through by the final
/// price when a discount changed it.
pub fn price_display(event: &PricedEvent) -> String {
    if event.final_price != event.price_value {
        format!("{} → {}", event.event.price, money(event.final_price))
    } else {
        money(event.final_price)
    }
}

/// A fixed-width text bar for the progress band, e.g. `[#######---] 70%`.
pub fn progress_bar(progress: &BudgetProgress, width: usize) -> String {
    let filled = (progress.percent as usize * width).div_ceil(100).min(width);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress.percent
    )
}
