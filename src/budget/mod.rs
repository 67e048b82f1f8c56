// SPDX-License-Identifier: GPL-3.0-or-later

//! Budget calculation for the user's favorite events.
//!
//! Given the selected events and the active ticket category, this module
//! prices every event, totals the selection, and breaks the total down by
//! event type. [`evaluate`] runs the whole pipeline (budget, analytics,
//! progress, recommendations and tips) from a [`BudgetContext`].
//!
//! Everything here is a pure function of its arguments. Nothing is cached:
//! callers recompute from current inputs whenever they need fresh numbers.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::catalog::Event;

pub mod analytics;
pub mod category;
pub mod price;
pub mod progress;
pub mod recommend;

pub use analytics::{Analytics, compute_analytics};
pub use category::{TicketCategory, coefficient_for};
pub use price::parse_price;
pub use progress::{BudgetProgress, ProgressLevel, progress};
pub use recommend::{Recommendation, RecommendationKind, Tip, generate_recommendations, generate_tips};

/// Currency sign used in listing prices and messages.
pub const CURRENCY_SIGN: &str = "₽";

/// Bucket label for events without a type.
pub const OTHER_TYPE: &str = "Other";

/// An event with its parsed and discounted price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedEvent {
    #[serde(flatten)]
    pub event: Event,

    /// Base price parsed from the listing
    pub price_value: u64,

    /// Price after the ticket category discount
    pub final_price: u64,
}

/// Count and summed final price of one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub count: usize,
    pub total: u64,
}

/// Per-type totals in order of first appearance.
///
/// Serializes as a JSON object keyed by type label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeBreakdown {
    entries: Vec<(String, TypeTotals)>,
}

impl TypeBreakdown {
    fn add(&mut self, label: &str, final_price: u64) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, totals)) => {
                totals.count += 1;
                totals.total = totals.total.saturating_add(final_price);
            }
            None => self.entries.push((
                label.to_string(),
                TypeTotals {
                    count: 1,
                    total: final_price,
                },
            )),
        }
    }

    pub fn get(&self, label: &str) -> Option<&TypeTotals> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, totals)| totals)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeTotals)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TypeBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, totals) in &self.entries {
            map.serialize_entry(label, totals)?;
        }
        map.end()
    }
}

/// A priced selection of events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// Priced events, in selection order
    pub events: Vec<PricedEvent>,

    /// Sum of every `final_price`
    pub total: u64,

    /// Multiplier of the category the budget was computed for
    pub coefficient: f64,

    pub category: TicketCategory,

    pub by_type: TypeBreakdown,
}

/// Label an event is grouped under in the per-type breakdown.
pub fn type_label(event: &Event) -> &str {
    match event.kind.as_deref().map(str::trim) {
        Some(kind) if !kind.is_empty() => kind,
        _ => OTHER_TYPE,
    }
}

/// Price the selected events for a ticket category.
pub fn compute_budget(events: &[Event], category: TicketCategory) -> Budget {
    let mut priced = Vec::with_capacity(events.len());
    let mut by_type = TypeBreakdown::default();
    let mut total = 0;

    for event in events {
        let price_value = parse_price(&event.price);
        let final_price = category.apply(price_value);

        total = u64::saturating_add(total, final_price);
        by_type.add(type_label(event), final_price);
        priced.push(PricedEvent {
            event: event.clone(),
            price_value,
            final_price,
        });
    }

    Budget {
        events: priced,
        total,
        coefficient: category.coefficient(),
        category,
        by_type,
    }
}

/// Everything the pipeline needs besides the selected events.
///
/// The caller owns the single instance and passes it in on every evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetContext {
    pub category: TicketCategory,

    /// Spending ceiling; 0 means no plan has been set
    pub planned_budget: u64,
}

/// Output of one full evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub analytics: Analytics,
    pub progress: Option<BudgetProgress>,
    pub recommendations: Vec<Recommendation>,
    pub tips: Vec<Tip>,
}

/// Run the whole calculation for a selection of events.
pub fn evaluate(events: &[Event], context: &BudgetContext) -> BudgetSummary {
    let budget = compute_budget(events, context.category);
    let analytics = compute_analytics(&budget);
    let progress = progress(budget.total, context.planned_budget);
    let recommendations = generate_recommendations(&budget, &analytics, context.planned_budget);
    let tips = generate_tips(context.category);

    BudgetSummary {
        budget,
        analytics,
        progress,
        recommendations,
        tips,
    }
}

/// Integer division rounding half away from zero.
pub(crate) fn div_round(numerator: u128, denominator: u128) -> u128 {
    (numerator * 2 + denominator) / (denominator * 2)
}
