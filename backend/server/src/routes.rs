use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use catalog::{
    payloads::{
        AssignMembership, NewMembership, NewPerk, RegisterUser, SearchQuery, SessionVotes,
        VoteQuery,
    },
    perks::{MembershipTypeId, PerkId, UserId},
    votes::Direction,
};
use serde_json::json;
use tracing::debug;

use crate::{
    error::AppResult, members, perks, session, state::State as AppState, votes::cast_vote,
};

type Shared = State<Arc<AppState>>;

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn search_handler(
    State(state): Shared,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    let (jar, session) = session::resolve(jar);
    let perks = perks::search_perks(&state, session, &query).await?;

    Ok((jar, Json(perks)))
}

pub async fn perk_handler(
    State(state): Shared,
    jar: CookieJar,
    Path(perk_id): Path<PerkId>,
) -> AppResult<impl IntoResponse> {
    let (jar, session) = session::resolve(jar);
    let perk = perks::get_perk(&state, session, perk_id).await?;

    Ok((jar, Json(perk)))
}

pub async fn create_perk_handler(
    State(state): Shared,
    Json(payload): Json<NewPerk>,
) -> AppResult<impl IntoResponse> {
    let perk = perks::create_perk(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(perk)))
}

pub async fn delete_perk_handler(
    State(state): Shared,
    Path(perk_id): Path<PerkId>,
) -> AppResult<impl IntoResponse> {
    perks::delete_perk(&state, perk_id).await?;

    Ok(Json(json!({ "success": true })))
}

async fn vote(
    state: &AppState,
    jar: CookieJar,
    perk_id: PerkId,
    direction: Direction,
) -> AppResult<Response> {
    let (jar, session) = session::resolve(jar);

    let response = match cast_vote(state, session, perk_id, direction).await? {
        Some(outcome) => (jar, Json(outcome)).into_response(),
        None => (jar, StatusCode::NO_CONTENT).into_response(),
    };

    Ok(response)
}

pub async fn upvote_handler(
    State(state): Shared,
    jar: CookieJar,
    Path(perk_id): Path<PerkId>,
) -> AppResult<Response> {
    vote(&state, jar, perk_id, Direction::Up).await
}

pub async fn downvote_handler(
    State(state): Shared,
    jar: CookieJar,
    Path(perk_id): Path<PerkId>,
) -> AppResult<Response> {
    vote(&state, jar, perk_id, Direction::Down).await
}

pub async fn vote_handler(
    State(state): Shared,
    jar: CookieJar,
    Path(perk_id): Path<PerkId>,
    Query(query): Query<VoteQuery>,
) -> AppResult<Response> {
    vote(&state, jar, perk_id, Direction::from_upvote(query.upvote)).await
}

pub async fn memberships_handler(State(state): Shared) -> AppResult<impl IntoResponse> {
    Ok(Json(state.repository.membership_types().await?))
}

pub async fn create_membership_handler(
    State(state): Shared,
    Json(payload): Json<NewMembership>,
) -> AppResult<impl IntoResponse> {
    let membership = members::create_membership(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn register_handler(
    State(state): Shared,
    Json(payload): Json<RegisterUser>,
) -> AppResult<impl IntoResponse> {
    let user = members::register_user(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn user_handler(
    State(state): Shared,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(members::get_user(&state, user_id).await?))
}

pub async fn assign_membership_handler(
    State(state): Shared,
    Path(user_id): Path<UserId>,
    Json(payload): Json<AssignMembership>,
) -> AppResult<impl IntoResponse> {
    let membership =
        members::assign_membership(&state, user_id, payload.membership_type_id).await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn remove_membership_handler(
    State(state): Shared,
    Path((user_id, membership_type_id)): Path<(UserId, MembershipTypeId)>,
) -> AppResult<impl IntoResponse> {
    members::remove_membership(&state, user_id, membership_type_id).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn available_memberships_handler(
    State(state): Shared,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(members::available_memberships(&state, user_id).await?))
}

pub async fn session_votes_handler(
    State(state): Shared,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let (jar, session) = session::resolve(jar);
    let votes = state.sessions.all(session).await?.into_iter().collect();

    Ok((jar, Json(SessionVotes { votes })))
}

pub async fn end_session_handler(
    State(state): Shared,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    if let Some(session) = session::existing(&jar) {
        state.sessions.clear(session).await?;
        debug!("Session {} ended", session.0);
    }

    Ok((session::expire(jar), StatusCode::NO_CONTENT))
}
