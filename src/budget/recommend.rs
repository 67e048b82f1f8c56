// SPDX-License-Identifier: GPL-3.0-or-later

//! Advice derived from a budget and its analytics.
//!
//! The budget status message (only when a plan is set) always comes first,
//! followed by the informational messages whose conditions hold.

use serde::Serialize;

use super::{Analytics, Budget, CURRENCY_SIGN, TicketCategory, div_round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Success,
    Warning,
    Error,
    Info,
}

impl RecommendationKind {
    pub fn icon(self) -> &'static str {
        match self {
            RecommendationKind::Success => "✓",
            RecommendationKind::Warning => "⚠",
            RecommendationKind::Error => "✗",
            RecommendationKind::Info => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub text: String,
}

impl Recommendation {
    fn new(kind: RecommendationKind, text: String) -> Self {
        Self { kind, text }
    }
}

/// A static piece of advice about ticket categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tip {
    pub text: String,
}

pub fn generate_recommendations(
    budget: &Budget,
    analytics: &Analytics,
    planned_budget: u64,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if planned_budget > 0 {
        recommendations.push(budget_status(budget.total, planned_budget, analytics));
    }

    if analytics.paid_count > 0 && analytics.free_count > 0 {
        recommendations.push(Recommendation::new(
            RecommendationKind::Info,
            format!(
                "You have {} paid and {} free events",
                analytics.paid_count, analytics.free_count
            ),
        ));
    }

    if analytics.average_price > 0 {
        recommendations.push(Recommendation::new(
            RecommendationKind::Info,
            format!(
                "Average ticket price: {} {CURRENCY_SIGN}",
                analytics.average_price
            ),
        ));
    }

    if analytics.savings > 0 {
        recommendations.push(Recommendation::new(
            RecommendationKind::Success,
            format!(
                "With a {} ticket you save {} {CURRENCY_SIGN}",
                budget.category.label().to_lowercase(),
                analytics.savings
            ),
        ));
    }

    if analytics.available_free_events > 0 {
        recommendations.push(Recommendation::new(
            RecommendationKind::Info,
            format!(
                "Free events in your selection: {}",
                analytics.available_free_events
            ),
        ));
    }

    recommendations
}

/// How the total compares with a non-zero plan.
fn budget_status(total: u64, planned: u64, analytics: &Analytics) -> Recommendation {
    if total > planned {
        let over = total - planned;
        let mut text = format!("Over budget by {over} {CURRENCY_SIGN}.");

        // Without a paid average there is no sensible number of events to swap.
        if analytics.paid_count > 0 && analytics.average_price > 0 {
            let replace = over.div_ceil(analytics.average_price);
            if replace == 1 {
                text.push_str(" Replace 1 paid event with a free one.");
            } else {
                text.push_str(&format!(
                    " Replace {replace} paid events with free ones."
                ));
            }
        }

        return Recommendation::new(RecommendationKind::Error, text);
    }

    let remaining = planned - total;
    if u128::from(total) * 10 >= u128::from(planned) * 7 {
        let used = div_round(u128::from(total) * 100, u128::from(planned));
        Recommendation::new(
            RecommendationKind::Warning,
            format!("Used {used}% of budget. {remaining} {CURRENCY_SIGN} left."),
        )
    } else {
        let left = div_round(u128::from(remaining) * 100, u128::from(planned));
        Recommendation::new(
            RecommendationKind::Success,
            format!("Budget remaining: {remaining} {CURRENCY_SIGN} ({left}%)"),
        )
    }
}

/// Category-switching advice, independent of the selection.
pub fn generate_tips(active: TicketCategory) -> Vec<Tip> {
    let mut tips = Vec::new();

    if active != TicketCategory::Student {
        tips.push(Tip {
            text: "Use a student ticket for a 30% discount".to_string(),
        });
    }

    tips.push(Tip {
        text: "First Sunday of the month: free entry to the Museum of Contemporary Art"
            .to_string(),
    });
    tips.push(Tip {
        text: "Discount tickets give 50% off for pensioners and people with disabilities"
            .to_string(),
    });

    tips
}
