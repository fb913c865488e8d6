use catalog::{
    payloads::VoteResponse,
    perks::PerkId,
    votes::{Direction, apply_vote},
};
use tracing::{debug, warn};

use crate::{error::AppResult, session::SessionId, state::State};

/// Casts `direction` for `session`, returning the perk's new score.
///
/// Votes on perks the ledger does not know are dropped: `None`, and neither the ledger nor the
/// session is touched. A vote whose session write fails is taken back out of the ledger.
pub async fn cast_vote(
    state: &State,
    session: SessionId,
    perk_id: PerkId,
    direction: Direction,
) -> AppResult<Option<VoteResponse>> {
    let current = state.sessions.get(session, perk_id).await?;
    let transition = apply_vote(direction, current);

    let Some(votes) = state.ledger.apply_delta(perk_id, transition.delta).await? else {
        debug!("Vote on unknown perk {perk_id} dropped");
        return Ok(None);
    };

    if let Err(e) = state.sessions.set(session, perk_id, transition.state).await {
        warn!("Session write failed for perk {perk_id}, reverting vote: {e}");
        state.ledger.apply_delta(perk_id, -transition.delta).await?;
        return Err(e);
    }

    #[cfg(feature = "verbose")]
    tracing::info!("Perk {perk_id}: {current} -> {} ({votes})", transition.state);

    Ok(Some(VoteResponse {
        perk_id,
        votes,
        state: transition.state,
    }))
}
