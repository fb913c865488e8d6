use std::sync::Arc;

use redis::RedisError;

use super::{
    config::Config,
    database::init_redis,
    ledger::{DynVoteLedger, MemoryLedger, RedisLedger},
    repository::{DynRepository, MemoryRepository, RedisRepository},
    session::{DynSessionVoteTracker, MemoryTracker, RedisTracker},
};

pub struct State {
    pub config: Config,
    pub ledger: DynVoteLedger,
    pub sessions: DynSessionVoteTracker,
    pub repository: DynRepository,
}

impl State {
    pub async fn new() -> Result<Arc<Self>, RedisError> {
        Self::connect(Config::load()).await
    }

    pub async fn connect(config: Config) -> Result<Arc<Self>, RedisError> {
        let connection = init_redis(&config.redis_url).await?;

        Ok(Arc::new(Self {
            ledger: Arc::new(RedisLedger::new(connection.clone())),
            sessions: Arc::new(RedisTracker::new(connection.clone(), config.session_ttl)),
            repository: Arc::new(RedisRepository::new(connection)),
            config,
        }))
    }

    /// Nothing survives a restart. Used by tests and local runs without Redis.
    pub fn in_memory(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            ledger: Arc::new(MemoryLedger::default()),
            sessions: Arc::new(MemoryTracker::default()),
            repository: Arc::new(MemoryRepository::default()),
        })
    }
}
