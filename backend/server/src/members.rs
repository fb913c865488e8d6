//! Users and the membership types they hold.
use catalog::{
    payloads::{NewMembership, RegisterUser, UserView},
    perks::{MembershipType, MembershipTypeId, User, UserId},
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    state::State,
};

pub async fn register_user(state: &State, request: RegisterUser) -> AppResult<User> {
    let request = request.validate()?;

    let user = state
        .repository
        .insert_user(&request.username)
        .await?
        .ok_or_else(|| AppError::Conflict("Username already exists".to_string()))?;

    info!("Registered user {} ({})", user.username, user.id);

    Ok(user)
}

async fn require_user(state: &State, user_id: UserId) -> AppResult<User> {
    state
        .repository
        .user(user_id)
        .await?
        .ok_or(AppError::NotFound("User"))
}

pub async fn get_user(state: &State, user_id: UserId) -> AppResult<UserView> {
    let user = require_user(state, user_id).await?;

    Ok(UserView {
        memberships: memberships_for_user(state, user.id).await?,
        id: user.id,
        username: user.username,
    })
}

pub async fn memberships_for_user(
    state: &State,
    user_id: UserId,
) -> AppResult<Vec<MembershipType>> {
    let held = state.repository.user_membership_ids(user_id).await?;

    Ok(state
        .repository
        .membership_types()
        .await?
        .into_iter()
        .filter(|membership| held.contains(&membership.id))
        .collect())
}

pub async fn available_memberships(
    state: &State,
    user_id: UserId,
) -> AppResult<Vec<MembershipType>> {
    let user = require_user(state, user_id).await?;
    let held = state.repository.user_membership_ids(user.id).await?;

    Ok(state
        .repository
        .membership_types()
        .await?
        .into_iter()
        .filter(|membership| !held.contains(&membership.id))
        .collect())
}

pub async fn assign_membership(
    state: &State,
    user_id: UserId,
    membership_type_id: MembershipTypeId,
) -> AppResult<MembershipType> {
    let user = require_user(state, user_id).await?;
    let membership = state
        .repository
        .membership_type(membership_type_id)
        .await?
        .ok_or(AppError::NotFound("Membership type"))?;

    state
        .repository
        .add_user_membership(user.id, membership.id)
        .await?;

    Ok(membership)
}

/// Nothing happens for unknown users or memberships that are not held.
pub async fn remove_membership(
    state: &State,
    user_id: UserId,
    membership_type_id: MembershipTypeId,
) -> AppResult<()> {
    if state.repository.user(user_id).await?.is_none() {
        return Ok(());
    }

    state
        .repository
        .remove_user_membership(user_id, membership_type_id)
        .await
}

pub async fn create_membership(state: &State, request: NewMembership) -> AppResult<MembershipType> {
    let request = request.validate()?;

    let exists = state
        .repository
        .membership_types()
        .await?
        .iter()
        .any(|membership| membership.name.eq_ignore_ascii_case(&request.name));
    if exists {
        return Err(AppError::Conflict(format!(
            "Membership type {} already exists",
            request.name
        )));
    }

    state.repository.insert_membership_type(&request.name).await
}
