// SPDX-License-Identifier: GPL-3.0-or-later

use comfy_table::{ContentArrangement, Table};

use crate::budget::{BudgetContext, BudgetSummary, TicketCategory};
use crate::catalog::Event;
use crate::report::{money, price_display, progress_bar, type_or_unspecified};

const PROGRESS_WIDTH: usize = 30;

/// Message shown instead of a report when nothing is selected.
pub const EMPTY_SELECTION: &str =
    "You have no favorite events to budget. Add some with `afisha favorites add <id>`.";

/// Render the budget as tables and advice for the terminal.
pub fn render_summary(summary: &BudgetSummary, context: &BudgetContext) -> String {
    let budget = &summary.budget;
    let mut out = String::new();

    if budget.events.is_empty() {
        out.push_str(&format!("{EMPTY_SELECTION}\n"));
        render_plan(&mut out, summary, context);
        render_tips(&mut out, summary);
        return out;
    }

    let mut events_table = Table::new();
    events_table.set_content_arrangement(ContentArrangement::Dynamic);
    events_table.set_header(vec!["ID", "Date", "Title", "Type", "Price"]);
    for priced in &budget.events {
        events_table.add_row(vec![
            priced.event.id.to_string(),
            priced.event.date.clone(),
            priced.event.title.clone(),
            type_or_unspecified(&priced.event).to_string(),
            price_display(priced),
        ]);
    }

    out.push_str(&format!("\n{events_table}\n"));
    out.push_str(&format!(
        "\nCategory: {} (coefficient {})\n",
        budget.category.label(),
        budget.coefficient
    ));
    out.push_str(&format!("Total: {}\n", money(budget.total)));

    let mut type_table = Table::new();
    type_table.set_content_arrangement(ContentArrangement::Dynamic);
    type_table.set_header(vec!["Type", "Events", "Total"]);
    for (label, totals) in budget.by_type.iter() {
        type_table.add_row(vec![
            label.to_string(),
            totals.count.to_string(),
            money(totals.total),
        ]);
    }
    out.push_str(&format!("\n{type_table}\n"));

    render_plan(&mut out, summary, context);

    if !summary.recommendations.is_empty() {
        out.push_str("\nRecommendations\n");
        for rec in &summary.recommendations {
            out.push_str(&format!("  {} {}\n", rec.kind.icon(), rec.text));
        }
    }

    render_tips(&mut out, summary);
    out
}

fn render_plan(out: &mut String, summary: &BudgetSummary, context: &BudgetContext) {
    match &summary.progress {
        Some(progress) => {
            out.push_str(&format!(
                "\nPlanned budget: {}  used {}  left {}\n",
                money(context.planned_budget),
                money(progress.used),
                money(progress.remaining)
            ));
            out.push_str(&format!("{}\n", progress_bar(progress, PROGRESS_WIDTH)));
        }
        None => out.push_str(
            "\nNo planned budget set. Use `afisha budget set <amount>` to track spending.\n",
        ),
    }
}

fn render_tips(out: &mut String, summary: &BudgetSummary) {
    if summary.tips.is_empty() {
        return;
    }
    out.push_str("\nTips\n");
    for tip in &summary.tips {
        out.push_str(&format!("  * {}\n", tip.text));
    }
}

/// Print the budget summary to the terminal.
pub fn print_summary(summary: &BudgetSummary, context: &BudgetContext) {
    print!("{}", render_summary(summary, context));
}

/// Render the event catalog, marking favorites with a star.
pub fn render_events(events: &[&Event], favorites: &[u32]) -> String {
    if events.is_empty() {
        return "No events found.\n".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "ID", "Date", "Title", "Type", "Price"]);
    for event in events {
        let star = if favorites.contains(&event.id) { "★" } else { "" };
        table.add_row(vec![
            star.to_string(),
            event.id.to_string(),
            event.date.clone(),
            event.title.clone(),
            type_or_unspecified(event).to_string(),
            event.price.clone(),
        ]);
    }
    format!("{table}\n")
}

/// Render the available ticket categories, marking the active one.
pub fn render_categories(active: TicketCategory) -> String {
    let mut out = String::new();
    for category in TicketCategory::ALL {
        let marker = if category == active { "*" } else { " " };
        out.push_str(&format!(
            "{marker} {:<9} {:<11} x{}\n",
            category.key(),
            category.label(),
            category.coefficient()
        ));
    }
    out
}
