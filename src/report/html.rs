// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{DateTime, Utc};

use crate::budget::{BudgetContext, BudgetSummary};
use crate::report::{money, type_or_unspecified};

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build a printable HTML page of the selected events.
pub fn render_html(
    summary: &BudgetSummary,
    context: &BudgetContext,
    generated_at: DateTime<Utc>,
) -> String {
    let budget = &summary.budget;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Cultural events budget</title>\n");
    html.push_str("<style>\n");
    html.push_str("body { font-family: Arial, sans-serif; padding: 20px; }\n");
    html.push_str("h1 { color: #333; }\n");
    html.push_str("table { width: 100%; border-collapse: collapse; margin-top: 20px; }\n");
    html.push_str("th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n");
    html.push_str("th { background-color: #f2f2f2; }\n");
    html.push_str(".total { font-weight: bold; font-size: 18px; margin-top: 20px; }\n");
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<h1>Cultural events budget</h1>\n");
    html.push_str(&format!(
        "<p><strong>Ticket category:</strong> {}</p>\n",
        escape_html(budget.category.label())
    ));
    html.push_str(&format!(
        "<p><strong>Planned budget:</strong> {}</p>\n",
        escape_html(&money(context.planned_budget))
    ));
    html.push_str(&format!(
        "<p><strong>Created:</strong> {}</p>\n",
        generated_at.format("%Y-%m-%d")
    ));

    html.push_str("<table>\n<thead>\n");
    html.push_str("<tr><th>Date</th><th>Title</th><th>Type</th><th>Price</th></tr>\n");
    html.push_str("</thead>\n<tbody>\n");
    for priced in &budget.events {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&priced.event.date),
            escape_html(&priced.event.title),
            escape_html(type_or_unspecified(&priced.event)),
            escape_html(&money(priced.final_price)),
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    html.push_str(&format!(
        "<div class=\"total\">Total: {}</div>\n",
        escape_html(&money(budget.total))
    ));
    html.push_str("</body>\n</html>\n");

    html
}

/// Generate an HTML report and print it to stdout.
pub fn print_html(summary: &BudgetSummary, context: &BudgetContext, generated_at: DateTime<Utc>) {
    print!("{}", render_html(summary, context, generated_at));
}
