// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{DateTime, Utc};

use crate::budget::{BudgetContext, BudgetSummary};
use crate::report::{money, type_or_unspecified};

const RULE: &str = "================";

/// Plain-text list of the selected events, suitable for pasting elsewhere.
pub fn render_text(
    summary: &BudgetSummary,
    context: &BudgetContext,
    generated_at: DateTime<Utc>,
) -> String {
    let budget = &summary.budget;
    let mut text = String::new();

    text.push_str("CULTURAL EVENTS BUDGET\n");
    text.push_str(&format!("Created: {}\n", generated_at.format("%Y-%m-%d")));
    text.push_str(&format!("Ticket category: {}\n", budget.category.label()));
    text.push_str(&format!(
        "Planned budget: {}\n\n",
        money(context.planned_budget)
    ));
    text.push_str("EVENTS:\n");
    text.push_str(&format!("{RULE}\n\n"));

    for (index, priced) in budget.events.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", index + 1, priced.event.title));
        text.push_str(&format!("   Date: {}\n", priced.event.date));
        text.push_str(&format!(
            "   Type: {}\n",
            type_or_unspecified(&priced.event)
        ));
        text.push_str(&format!("   Price: {}\n\n", money(priced.final_price)));
    }

    text.push_str(&format!("{RULE}\n"));
    text.push_str(&format!("Total: {}\n", money(budget.total)));

    text
}

/// Print the plain-text export to stdout.
pub fn print_text(summary: &BudgetSummary, context: &BudgetContext, generated_at: DateTime<Utc>) {
    print!("{}", render_text(summary, context, generated_at));
}
