// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Serialize;

use super::div_round;

/// Color band of the budget progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLevel {
    Green,
    Yellow,
    Red,
}

/// How much of the planned budget the selection uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetProgress {
    pub used: u64,

    /// Left to spend; 0 once over budget
    pub remaining: u64,

    /// Share of the plan used, rounded and capped at 100
    pub percent: u64,

    pub level: ProgressLevel,
}

/// Progress against the plan, or `None` when no plan is set.
pub fn progress(total: u64, planned: u64) -> Option<BudgetProgress> {
    if planned == 0 {
        return None;
    }

    let level = if total >= planned {
        ProgressLevel::Red
    } else if u128::from(total) * 10 >= u128::from(planned) * 7 {
        ProgressLevel::Yellow
    } else {
        ProgressLevel::Green
    };

    let percent = div_round(u128::from(total) * 100, u128::from(planned)).min(100) as u64;

    Some(BudgetProgress {
        used: total,
        remaining: planned.saturating_sub(total),
        percent,
        level,
    })
}
