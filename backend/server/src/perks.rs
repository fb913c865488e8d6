use catalog::{
    payloads::{NewPerk, PerkView, SearchQuery},
    perks::{Perk, PerkId},
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    search::search,
    session::SessionId,
    state::State,
};

pub async fn create_perk(state: &State, new_perk: NewPerk) -> AppResult<Perk> {
    let new_perk = new_perk.validate()?;

    let membership_type = state
        .repository
        .membership_types()
        .await?
        .into_iter()
        .find(|membership| membership.name.eq_ignore_ascii_case(&new_perk.membership_type))
        .ok_or(AppError::NotFound("Membership type"))?;

    let created_by = state
        .repository
        .user(new_perk.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let perk = Perk {
        id: state.repository.next_perk_id().await?,
        title: new_perk.title,
        description: new_perk.description,
        region: new_perk.region,
        expiry_date: new_perk.expiry_date,
        membership_type,
        created_by,
    };

    state.repository.save_perk(&perk).await?;
    if let Err(e) = state.ledger.register(perk.id).await {
        state.repository.delete_perk(perk.id).await?;
        return Err(e);
    }

    info!("Perk {} created by {}", perk.id, perk.created_by.username);

    Ok(perk)
}

pub async fn get_perk(state: &State, session: SessionId, perk_id: PerkId) -> AppResult<PerkView> {
    let perk = state
        .repository
        .perk(perk_id)
        .await?
        .ok_or(AppError::NotFound("Perk"))?;

    Ok(PerkView {
        votes: state.ledger.get(perk_id).await?.unwrap_or_default(),
        my_vote: state.sessions.get(session, perk_id).await?,
        perk,
    })
}

pub async fn search_perks(
    state: &State,
    session: SessionId,
    query: &SearchQuery,
) -> AppResult<Vec<PerkView>> {
    let perks = state.repository.perks().await?;
    let scores = state.ledger.scores().await?;
    let my_votes = state.sessions.all(session).await?;

    let views = perks
        .into_iter()
        .map(|perk| PerkView {
            votes: scores.get(&perk.id).copied().unwrap_or_default(),
            my_vote: my_votes.get(&perk.id).copied().unwrap_or_default(),
            perk,
        })
        .collect();

    Ok(search(views, query))
}

/// Unknown ids are ignored.
pub async fn delete_perk(state: &State, perk_id: PerkId) -> AppResult<()> {
    if state.repository.delete_perk(perk_id).await? {
        info!("Perk {perk_id} deleted");
    }

    state.ledger.remove(perk_id).await
}
