//! # Repository
//!
//! Records of perks, membership types and users. Scores are not stored here, see
//! [`crate::ledger`].
use std::{
    collections::{BTreeSet, HashMap},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use catalog::perks::{MembershipType, MembershipTypeId, Perk, PerkId, User, UserId};
use dashmap::{DashMap, mapref::entry::Entry};
use redis::{AsyncCommands, aio::ConnectionManager};

use crate::{
    database::{
        MEMBERSHIP_TYPE_ID, MEMBERSHIP_TYPES, NEXT_IDS, PERK_ID, PERKS, USER_ID, USERNAMES, USERS,
        user_memberships_key,
    },
    error::AppResult,
};

#[async_trait]
pub trait Repository: Send + Sync {
    async fn next_perk_id(&self) -> AppResult<PerkId>;

    async fn save_perk(&self, perk: &Perk) -> AppResult<()>;

    async fn perk(&self, perk_id: PerkId) -> AppResult<Option<Perk>>;

    /// Ordered by id.
    async fn perks(&self) -> AppResult<Vec<Perk>>;

    async fn delete_perk(&self, perk_id: PerkId) -> AppResult<bool>;

    /// Ordered by id.
    async fn membership_types(&self) -> AppResult<Vec<MembershipType>>;

    async fn membership_type(&self, id: MembershipTypeId) -> AppResult<Option<MembershipType>>;

    async fn insert_membership_type(&self, name: &str) -> AppResult<MembershipType>;

    /// `None` when the username is already taken.
    async fn insert_user(&self, username: &str) -> AppResult<Option<User>>;

    async fn user(&self, user_id: UserId) -> AppResult<Option<User>>;

    async fn user_by_name(&self, username: &str) -> AppResult<Option<User>>;

    async fn add_user_membership(&self, user_id: UserId, id: MembershipTypeId) -> AppResult<()>;

    async fn remove_user_membership(&self, user_id: UserId, id: MembershipTypeId)
    -> AppResult<()>;

    /// Ordered by id.
    async fn user_membership_ids(&self, user_id: UserId) -> AppResult<Vec<MembershipTypeId>>;
}

pub type DynRepository = Arc<dyn Repository>;

pub struct RedisRepository {
    connection: ConnectionManager,
}

impl RedisRepository {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    async fn next_id(&self, kind: &str) -> AppResult<u64> {
        let mut connection = self.connection.clone();
        let id: u64 = connection.hincr(NEXT_IDS, kind, 1).await?;

        Ok(id)
    }
}

#[async_trait]
impl Repository for RedisRepository {
    async fn next_perk_id(&self) -> AppResult<PerkId> {
        self.next_id(PERK_ID).await
    }

    async fn save_perk(&self, perk: &Perk) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let json = serde_json::to_string(perk)?;
        let _: () = connection.hset(PERKS, perk.id, json).await?;

        Ok(())
    }

    async fn perk(&self, perk_id: PerkId) -> AppResult<Option<Perk>> {
        let mut connection = self.connection.clone();
        let json: Option<String> = connection.hget(PERKS, perk_id).await?;

        Ok(json.map(|json| serde_json::from_str::<Perk>(&json)).transpose()?)
    }

    async fn perks(&self) -> AppResult<Vec<Perk>> {
        let mut connection = self.connection.clone();
        let records: Vec<String> = connection.hvals(PERKS).await?;

        let mut perks = records
            .iter()
            .map(|json| serde_json::from_str(json))
            .collect::<Result<Vec<Perk>, _>>()?;
        perks.sort_by_key(|perk| perk.id);

        Ok(perks)
    }

    async fn delete_perk(&self, perk_id: PerkId) -> AppResult<bool> {
        let mut connection = self.connection.clone();
        let removed: u64 = connection.hdel(PERKS, perk_id).await?;

        Ok(removed > 0)
    }

    async fn membership_types(&self) -> AppResult<Vec<MembershipType>> {
        let mut connection = self.connection.clone();
        let names: HashMap<MembershipTypeId, String> =
            connection.hgetall(MEMBERSHIP_TYPES).await?;

        let mut types: Vec<MembershipType> = names
            .into_iter()
            .map(|(id, name)| MembershipType { id, name })
            .collect();
        types.sort_by_key(|membership| membership.id);

        Ok(types)
    }

    async fn membership_type(&self, id: MembershipTypeId) -> AppResult<Option<MembershipType>> {
        let mut connection = self.connection.clone();
        let name: Option<String> = connection.hget(MEMBERSHIP_TYPES, id).await?;

        Ok(name.map(|name| MembershipType { id, name }))
    }

    async fn insert_membership_type(&self, name: &str) -> AppResult<MembershipType> {
        let id = self.next_id(MEMBERSHIP_TYPE_ID).await?;

        let mut connection = self.connection.clone();
        let _: () = connection.hset(MEMBERSHIP_TYPES, id, name).await?;

        Ok(MembershipType {
            id,
            name: name.to_string(),
        })
    }

    async fn insert_user(&self, username: &str) -> AppResult<Option<User>> {
        let id = self.next_id(USER_ID).await?;

        let mut connection = self.connection.clone();
        let claimed: bool = connection.hset_nx(USERNAMES, username, id).await?;
        if !claimed {
            return Ok(None);
        }

        let _: () = connection.hset(USERS, id, username).await?;

        Ok(Some(User {
            id,
            username: username.to_string(),
        }))
    }

    async fn user(&self, user_id: UserId) -> AppResult<Option<User>> {
        let mut connection = self.connection.clone();
        let username: Option<String> = connection.hget(USERS, user_id).await?;

        Ok(username.map(|username| User {
            id: user_id,
            username,
        }))
    }

    async fn user_by_name(&self, username: &str) -> AppResult<Option<User>> {
        let mut connection = self.connection.clone();
        let id: Option<UserId> = connection.hget(USERNAMES, username).await?;

        Ok(id.map(|id| User {
            id,
            username: username.to_string(),
        }))
    }

    async fn add_user_membership(&self, user_id: UserId, id: MembershipTypeId) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.sadd(user_memberships_key(user_id), id).await?;

        Ok(())
    }

    async fn remove_user_membership(
        &self,
        user_id: UserId,
        id: MembershipTypeId,
    ) -> AppResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.srem(user_memberships_key(user_id), id).await?;

        Ok(())
    }

    async fn user_membership_ids(&self, user_id: UserId) -> AppResult<Vec<MembershipTypeId>> {
        let mut connection = self.connection.clone();
        let mut ids: Vec<MembershipTypeId> =
            connection.smembers(user_memberships_key(user_id)).await?;
        ids.sort_unstable();

        Ok(ids)
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    perk_ids: AtomicU64,
    membership_type_ids: AtomicU64,
    user_ids: AtomicU64,
    perks: DashMap<PerkId, Perk>,
    membership_types: DashMap<MembershipTypeId, String>,
    users: DashMap<UserId, String>,
    usernames: DashMap<String, UserId>,
    user_memberships: DashMap<UserId, BTreeSet<MembershipTypeId>>,
}

fn next(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, Ordering::Relaxed) + 1
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn next_perk_id(&self) -> AppResult<PerkId> {
        Ok(next(&self.perk_ids))
    }

    async fn save_perk(&self, perk: &Perk) -> AppResult<()> {
        self.perks.insert(perk.id, perk.clone());

        Ok(())
    }

    async fn perk(&self, perk_id: PerkId) -> AppResult<Option<Perk>> {
        Ok(self.perks.get(&perk_id).map(|perk| perk.clone()))
    }

    async fn perks(&self) -> AppResult<Vec<Perk>> {
        let mut perks: Vec<Perk> = self.perks.iter().map(|perk| perk.clone()).collect();
        perks.sort_by_key(|perk| perk.id);

        Ok(perks)
    }

    async fn delete_perk(&self, perk_id: PerkId) -> AppResult<bool> {
        Ok(self.perks.remove(&perk_id).is_some())
    }

    async fn membership_types(&self) -> AppResult<Vec<MembershipType>> {
        let mut types: Vec<MembershipType> = self
            .membership_types
            .iter()
            .map(|entry| MembershipType {
                id: *entry.key(),
                name: entry.value().clone(),
            })
            .collect();
        types.sort_by_key(|membership| membership.id);

        Ok(types)
    }

    async fn membership_type(&self, id: MembershipTypeId) -> AppResult<Option<MembershipType>> {
        Ok(self.membership_types.get(&id).map(|name| MembershipType {
            id,
            name: name.clone(),
        }))
    }

    async fn insert_membership_type(&self, name: &str) -> AppResult<MembershipType> {
        let id = next(&self.membership_type_ids);
        self.membership_types.insert(id, name.to_string());

        Ok(MembershipType {
            id,
            name: name.to_string(),
        })
    }

    async fn insert_user(&self, username: &str) -> AppResult<Option<User>> {
        match self.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(entry) => {
                let id = next(&self.user_ids);
                entry.insert(id);
                self.users.insert(id, username.to_string());

                Ok(Some(User {
                    id,
                    username: username.to_string(),
                }))
            }
        }
    }

    async fn user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&user_id).map(|username| User {
            id: user_id,
            username: username.clone(),
        }))
    }

    async fn user_by_name(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.usernames.get(username).map(|id| User {
            id: *id,
            username: username.to_string(),
        }))
    }

    async fn add_user_membership(&self, user_id: UserId, id: MembershipTypeId) -> AppResult<()> {
        self.user_memberships.entry(user_id).or_default().insert(id);

        Ok(())
    }

    async fn remove_user_membership(
        &self,
        user_id: UserId,
        id: MembershipTypeId,
    ) -> AppResult<()> {
        if let Some(mut held) = self.user_memberships.get_mut(&user_id) {
            held.remove(&id);
        }

        Ok(())
    }

    async fn user_membership_ids(&self, user_id: UserId) -> AppResult<Vec<MembershipTypeId>> {
        Ok(self
            .user_memberships
            .get(&user_id)
            .map(|held| held.iter().copied().collect())
            .unwrap_or_default())
    }
}
