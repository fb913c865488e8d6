//! # Defaults
//!
//! Data loaded into an empty deployment so the dashboard has something to show.
//!
//! - Membership types are only loaded when none exist
//! - The demo user and its perks are only created when no user named [`DEMO_USERNAME`] exists
use chrono::{Months, NaiveDate};

pub const MEMBERSHIP_TYPES: [&str; 10] = [
    "Air Miles",
    "PC Optimum",
    "CAA",
    "Visa",
    "Mastercard",
    "American Express",
    "Scene+",
    "Aeroplan",
    "Costco",
    "Amazon Prime",
];

pub const DEMO_USERNAME: &str = "demo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPerk {
    pub title: &'static str,
    pub description: &'static str,
    pub region: &'static str,
    pub membership_type: &'static str,
    pub expiry_date: NaiveDate,
}

pub fn demo_perks(today: NaiveDate) -> Vec<DemoPerk> {
    let after = |months: u32| {
        today
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX)
    };

    vec![
        DemoPerk {
            title: "10% off Movie Tickets",
            description: "Get 10% discount on movie tickets at Cineplex theatres",
            region: "Canada",
            membership_type: "Scene+",
            expiry_date: after(3),
        },
        DemoPerk {
            title: "Free Domestic Flight",
            description: "Redeem 25,000 points for a free domestic flight within Canada",
            region: "Canada",
            membership_type: "Aeroplan",
            expiry_date: after(12),
        },
        DemoPerk {
            title: "20,000 Bonus Points",
            description: "Earn 20,000 bonus points on first purchase",
            region: "North America",
            membership_type: "PC Optimum",
            expiry_date: after(2),
        },
        DemoPerk {
            title: "Gas Discount",
            description: "Save 5 cents per litre on gas at participating stations",
            region: "Canada",
            membership_type: "CAA",
            expiry_date: after(6),
        },
    ]
}
