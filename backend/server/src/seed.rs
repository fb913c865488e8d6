use catalog::{
    defaults::{DEMO_USERNAME, MEMBERSHIP_TYPES, demo_perks},
    payloads::{NewPerk, RegisterUser},
};
use chrono::NaiveDate;
use tracing::info;

use crate::{error::AppResult, members::register_user, perks::create_perk, state::State};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub membership_types: usize,
    pub perks: usize,
}

/// Loads the default membership types and the demo user's perks, skipping whatever exists.
pub async fn load_defaults(state: &State, today: NaiveDate) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();

    if state.repository.membership_types().await?.is_empty() {
        for name in MEMBERSHIP_TYPES {
            state.repository.insert_membership_type(name).await?;
            report.membership_types += 1;
        }

        info!("Pre-loaded {} membership types", report.membership_types);
    }

    if state.repository.user_by_name(DEMO_USERNAME).await?.is_some() {
        return Ok(report);
    }

    let demo = register_user(
        state,
        RegisterUser {
            username: DEMO_USERNAME.to_string(),
        },
    )
    .await?;

    for perk in demo_perks(today) {
        create_perk(
            state,
            NewPerk {
                title: perk.title.to_string(),
                description: perk.description.to_string(),
                region: perk.region.to_string(),
                membership_type: perk.membership_type.to_string(),
                user_id: demo.id,
                expiry_date: perk.expiry_date,
            },
        )
        .await?;
        report.perks += 1;
    }

    info!("Created demo user '{DEMO_USERNAME}' with {} perks", report.perks);

    Ok(report)
}
