//! # Redis
//!
//! RAM database.
//!
//! Holds every record of the platform. The vote ledger relies on Redis executing scripts
//! atomically, so concurrent votes on the same perk never lose an update.
//!
//! ## Layout
//!
//! - `next_ids` hash: `perk` / `membership_type` / `user` to the last issued id, bumped with `HINCRBY`
//! - `perks` hash: perk id to JSON record
//! - `perk_votes` hash: perk id to signed score, the vote ledger
//! - `membership_types` hash: id to name
//! - `users` hash: id to username
//! - `usernames` hash: username to id, written with `HSETNX` so registration is first come first served
//! - `user:{id}:memberships` set: membership type ids held by the user
//! - `session:{uuid}:votes` hash: perk id to `up`/`down`, expires with the session
//!
//! ## Notes
//!
//! A perk missing from `perk_votes` does not exist as far as voting is concerned. `HINCRBY` alone
//! would silently create it, hence the script in [`crate::ledger`].
use std::time::Duration;

use redis::{
    Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use catalog::perks::UserId;
use uuid::Uuid;

pub const NEXT_IDS: &str = "next_ids";
pub const PERKS: &str = "perks";
pub const PERK_VOTES: &str = "perk_votes";
pub const MEMBERSHIP_TYPES: &str = "membership_types";
pub const USERS: &str = "users";
pub const USERNAMES: &str = "usernames";

pub const PERK_ID: &str = "perk";
pub const MEMBERSHIP_TYPE_ID: &str = "membership_type";
pub const USER_ID: &str = "user";

pub fn user_memberships_key(user_id: UserId) -> String {
    format!("user:{user_id}:memberships")
}

pub fn session_votes_key(session: Uuid) -> String {
    format!("session:{session}:votes")
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}

/// Connection for the tests that need a live server, `REDIS_URL` or the local default.
#[cfg(test)]
pub async fn test_connection() -> ConnectionManager {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    init_redis(&url).await.expect("Redis not reachable")
}
