//! # Search
//!
//! Filtering and ordering of the perk list.
//!
//! ## Filters
//! - membership type: exact name, case insensitive
//! - keyword: substring of title or description, case insensitive
//!
//! Both are optional and blank values are ignored.
//!
//! ## Sorting
//! - `votes` (default): highest score first
//! - `expiry`: soonest expiry first
//! - anything else: id order
//!
//! Ties keep id order.
use catalog::payloads::{PerkView, SearchQuery, SortBy};

pub fn search(perks: Vec<PerkView>, query: &SearchQuery) -> Vec<PerkView> {
    let membership = query.membership_type();
    let keyword = query.keyword();

    let mut perks: Vec<PerkView> = perks
        .into_iter()
        .filter(|view| membership.is_none_or(|name| view.perk.matches_membership(name)))
        .filter(|view| keyword.is_none_or(|keyword| view.perk.matches_keyword(keyword)))
        .collect();

    if let Some(sort) = query.sort() {
        sort_perks(&mut perks, sort);
    }

    perks
}

pub fn sort_perks(perks: &mut [PerkView], sort: SortBy) {
    match sort {
        SortBy::Votes => perks.sort_by(|a, b| b.votes.cmp(&a.votes)),
        SortBy::Expiry => perks.sort_by_key(|view| view.perk.expiry_date),
    }
}
