//! # Session Vote Tracker
//!
//! Remembers, per browser session, the last vote cast on each perk. It is what lets a second
//! click on the same arrow take the vote back.
//!
//! ## Verification
//! Cookies
//! - session_id: UUID v4 string, issued on the first request that needs it
//!
//! The tracker only ever stores `up` and `down`; a perk without an entry is `none`. Redis entries
//! slide forward by the configured session lifetime on every vote and disappear when the session
//! ends.
use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use catalog::{perks::PerkId, votes::VoteState};
use dashmap::DashMap;
use redis::{AsyncCommands, aio::ConnectionManager};
use uuid::Uuid;

use crate::{database::session_votes_key, error::AppResult};

pub const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Reads the session cookie, issuing a fresh one when it is missing or garbled.
pub fn resolve(jar: CookieJar) -> (CookieJar, SessionId) {
    if let Some(session) = existing(&jar) {
        return (jar, session);
    }

    let session = SessionId::generate();
    let cookie = Cookie::build((SESSION_COOKIE, session.0.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), session)
}

/// Session from the cookie, if the client already has a valid one.
pub fn existing(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
        .map(SessionId)
}

pub fn expire(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[async_trait]
pub trait SessionVoteTracker: Send + Sync {
    async fn get(&self, session: SessionId, perk_id: PerkId) -> AppResult<VoteState>;

    async fn set(&self, session: SessionId, perk_id: PerkId, state: VoteState) -> AppResult<()>;

    async fn all(&self, session: SessionId) -> AppResult<HashMap<PerkId, VoteState>>;

    async fn clear(&self, session: SessionId) -> AppResult<()>;
}

pub type DynSessionVoteTracker = Arc<dyn SessionVoteTracker>;

pub struct RedisTracker {
    connection: ConnectionManager,
    ttl: Duration,
}

impl RedisTracker {
    pub fn new(connection: ConnectionManager, ttl: Duration) -> Self {
        Self { connection, ttl }
    }
}

#[async_trait]
impl SessionVoteTracker for RedisTracker {
    async fn get(&self, session: SessionId, perk_id: PerkId) -> AppResult<VoteState> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection
            .hget(session_votes_key(session.0), perk_id)
            .await?;

        match raw {
            Some(raw) => Ok(raw.parse()?),
            None => Ok(VoteState::NoVote),
        }
    }

    async fn set(&self, session: SessionId, perk_id: PerkId, state: VoteState) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let key = session_votes_key(session.0);

        if state == VoteState::NoVote {
            let _: () = connection.hdel(&key, perk_id).await?;
        } else {
            let _: () = connection.hset(&key, perk_id, state.as_str()).await?;
        }

        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let _: () = connection.expire(&key, ttl).await?;

        Ok(())
    }

    async fn all(&self, session: SessionId) -> AppResult<HashMap<PerkId, VoteState>> {
        let mut connection = self.connection.clone();
        let raw: HashMap<PerkId, String> =
            connection.hgetall(session_votes_key(session.0)).await?;

        let mut votes: HashMap<PerkId, VoteState> = HashMap::with_capacity(raw.len());
        for (perk_id, state) in raw {
            votes.insert(perk_id, state.parse()?);
        }

        Ok(votes)
    }

    async fn clear(&self, session: SessionId) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(session_votes_key(session.0)).await?;

        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTracker {
    sessions: DashMap<SessionId, HashMap<PerkId, VoteState>>,
}

#[async_trait]
impl SessionVoteTracker for MemoryTracker {
    async fn get(&self, session: SessionId, perk_id: PerkId) -> AppResult<VoteState> {
        Ok(self
            .sessions
            .get(&session)
            .and_then(|votes| votes.get(&perk_id).copied())
            .unwrap_or_default())
    }

    async fn set(&self, session: SessionId, perk_id: PerkId, state: VoteState) -> AppResult<()> {
        if state == VoteState::NoVote {
            if let Some(mut votes) = self.sessions.get_mut(&session) {
                votes.remove(&perk_id);
            }
            return Ok(());
        }

        self.sessions.entry(session).or_default().insert(perk_id, state);

        Ok(())
    }

    async fn all(&self, session: SessionId) -> AppResult<HashMap<PerkId, VoteState>> {
        Ok(self
            .sessions
            .get(&session)
            .map(|votes| votes.clone())
            .unwrap_or_default())
    }

    async fn clear(&self, session: SessionId) -> AppResult<()> {
        self.sessions.remove(&session);

        Ok(())
    }
}
