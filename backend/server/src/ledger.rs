//! # Vote Ledger
//!
//! Running score per perk. Only votes move a score; a perk starts at 0 when registered and loses
//! its entry when deleted.
//!
//! Unknown perks are reported as `None`, never as an error, and are never created as a side
//! effect of applying a delta.
use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use catalog::perks::PerkId;
use dashmap::DashMap;
use redis::{AsyncCommands, Script, aio::ConnectionManager};

use crate::{database::PERK_VOTES, error::AppResult};

const APPLY_DELTA: &str = r#"
if redis.call('HEXISTS', KEYS[1], ARGV[1]) == 1 then
    return redis.call('HINCRBY', KEYS[1], ARGV[1], ARGV[2])
end
return false
"#;

#[async_trait]
pub trait VoteLedger: Send + Sync {
    async fn register(&self, perk_id: PerkId) -> AppResult<()>;

    async fn get(&self, perk_id: PerkId) -> AppResult<Option<i64>>;

    async fn scores(&self) -> AppResult<HashMap<PerkId, i64>>;

    /// Atomic read-modify-write. Returns the updated score.
    async fn apply_delta(&self, perk_id: PerkId, delta: i64) -> AppResult<Option<i64>>;

    async fn remove(&self, perk_id: PerkId) -> AppResult<()>;
}

pub type DynVoteLedger = Arc<dyn VoteLedger>;

pub struct RedisLedger {
    connection: ConnectionManager,
    apply: Script,
}

impl RedisLedger {
    pub fn new(connection: ConnectionManager) -> Self {
        Self {
            connection,
            apply: Script::new(APPLY_DELTA),
        }
    }
}

#[async_trait]
impl VoteLedger for RedisLedger {
    async fn register(&self, perk_id: PerkId) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let _: bool = connection.hset_nx(PERK_VOTES, perk_id, 0).await?;

        Ok(())
    }

    async fn get(&self, perk_id: PerkId) -> AppResult<Option<i64>> {
        let mut connection = self.connection.clone();
        let votes: Option<i64> = connection.hget(PERK_VOTES, perk_id).await?;

        Ok(votes)
    }

    async fn scores(&self) -> AppResult<HashMap<PerkId, i64>> {
        let mut connection = self.connection.clone();
        let scores: HashMap<PerkId, i64> = connection.hgetall(PERK_VOTES).await?;

        Ok(scores)
    }

    async fn apply_delta(&self, perk_id: PerkId, delta: i64) -> AppResult<Option<i64>> {
        let mut connection = self.connection.clone();

        let votes: Option<i64> = self
            .apply
            .key(PERK_VOTES)
            .arg(perk_id)
            .arg(delta)
            .invoke_async(&mut connection)
            .await?;

        Ok(votes)
    }

    async fn remove(&self, perk_id: PerkId) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.hdel(PERK_VOTES, perk_id).await?;

        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLedger {
    scores: DashMap<PerkId, i64>,
}

#[async_trait]
impl VoteLedger for MemoryLedger {
    async fn register(&self, perk_id: PerkId) -> AppResult<()> {
        self.scores.entry(perk_id).or_insert(0);

        Ok(())
    }

    async fn get(&self, perk_id: PerkId) -> AppResult<Option<i64>> {
        Ok(self.scores.get(&perk_id).map(|score| *score))
    }

    async fn scores(&self) -> AppResult<HashMap<PerkId, i64>> {
        Ok(self
            .scores
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect())
    }

    async fn apply_delta(&self, perk_id: PerkId, delta: i64) -> AppResult<Option<i64>> {
        // the shard stays write locked until the guard drops
        Ok(self.scores.get_mut(&perk_id).map(|mut score| {
            *score += delta;
            *score
        }))
    }

    async fn remove(&self, perk_id: PerkId) -> AppResult<()> {
        self.scores.remove(&perk_id);

        Ok(())
    }
}
