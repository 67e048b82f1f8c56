// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// Ticket category chosen by the user, deciding the discount applied to every
/// selected event.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketCategory {
    #[default]
    Full,
    Student,
    Discount,
}

impl TicketCategory {
    pub const ALL: [TicketCategory; 3] = [
        TicketCategory::Full,
        TicketCategory::Student,
        TicketCategory::Discount,
    ];

    /// Resolve a stored category key. Anything unrecognised, including the
    /// empty string, is a full-price ticket.
    pub fn from_key(key: &str) -> Self {
        match key {
            "student" => TicketCategory::Student,
            "discount" => TicketCategory::Discount,
            _ => TicketCategory::Full,
        }
    }

    /// Stable key used in storage and JSON.
    pub fn key(self) -> &'static str {
        match self {
            TicketCategory::Full => "full",
            TicketCategory::Student => "student",
            TicketCategory::Discount => "discount",
        }
    }

    /// Share of the base price paid, in percent.
    pub fn percent(self) -> u64 {
        match self {
            TicketCategory::Full => 100,
            TicketCategory::Student => 70,
            TicketCategory::Discount => 50,
        }
    }

    /// Price multiplier in `(0, 1]`.
    pub fn coefficient(self) -> f64 {
        self.percent() as f64 / 100.0
    }

    pub fn label(self) -> &'static str {
        match self {
            TicketCategory::Full => "Full price",
            TicketCategory::Student => "Student",
            TicketCategory::Discount => "Discount",
        }
    }

    /// Apply the discount to a base price, rounding half away from zero.
    ///
    /// Computed in integer percent so that ties such as `5 × 0.7 = 3.5`
    /// round the same way regardless of floating point representation.
    pub fn apply(self, price: u64) -> u64 {
        super::div_round(u128::from(price) * u128::from(self.percent()), 100) as u64
    }
}

impl std::fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Multiplier for a raw category key; unknown keys get the full-price
/// multiplier.
pub fn coefficient_for(category: &str) -> f64 {
    TicketCategory::from_key(category).coefficient()
}
