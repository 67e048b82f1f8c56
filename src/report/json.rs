// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::budget::{
    Analytics, Budget, BudgetContext, BudgetProgress, BudgetSummary, Recommendation,
    TicketCategory, Tip,
};

/// A JSON-serializable budget report.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub category: TicketCategory,
    pub category_label: &'static str,
    pub coefficient: f64,
    pub planned_budget: u64,
    pub budget: &'a Budget,
    pub analytics: &'a Analytics,
    pub progress: Option<&'a BudgetProgress>,
    pub recommendations: &'a [Recommendation],
    pub tips: &'a [Tip],
}

impl<'a> JsonReport<'a> {
    pub fn new(
        summary: &'a BudgetSummary,
        context: &BudgetContext,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            generated_at,
            category: context.category,
            category_label: context.category.label(),
            coefficient: summary.budget.coefficient,
            planned_budget: context.planned_budget,
            budget: &summary.budget,
            analytics: &summary.analytics,
            progress: summary.progress.as_ref(),
            recommendations: &summary.recommendations,
            tips: &summary.tips,
        }
    }
}

pub fn render_json(
    summary: &BudgetSummary,
    context: &BudgetContext,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let report = JsonReport::new(summary, context, generated_at);
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Generate a JSON report and print it to stdout.
pub fn print_json(
    summary: &BudgetSummary,
    context: &BudgetContext,
    generated_at: DateTime<Utc>,
) -> Result<()> {
    println!("{}", render_json(summary, context, generated_at)?);
    Ok(())
}
