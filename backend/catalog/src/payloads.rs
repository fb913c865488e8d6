//! # Payloads
//!
//! JSON bodies and query strings between the frontend and the backend. Field names are camelCase
//! on the wire.
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    perks::{MembershipType, MembershipTypeId, Perk, PerkId, UserId},
    utils::{required, username},
    votes::VoteState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerk {
    pub title: String,
    pub description: String,
    pub region: String,
    pub membership_type: String,
    pub user_id: UserId,
    pub expiry_date: NaiveDate,
}

impl NewPerk {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("title", &self.title)?,
            description: required("description", &self.description)?,
            region: required("region", &self.region)?,
            membership_type: required("membershipType", &self.membership_type)?,
            ..self
        })
    }
}

/// A perk as one session sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkView {
    #[serde(flatten)]
    pub perk: Perk,
    pub votes: i64,
    pub my_vote: VoteState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Votes,
    Expiry,
}

impl SortBy {
    /// Unrecognised values leave results unsorted.
    pub fn from_param(param: &str) -> Option<Self> {
        if param.eq_ignore_ascii_case("votes") {
            Some(SortBy::Votes)
        } else if param.eq_ignore_ascii_case("expiry") {
            Some(SortBy::Expiry)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub membership_type: Option<String>,
    pub keyword: Option<String>,
    pub sort_by: Option<String>,
}

impl SearchQuery {
    pub fn membership_type(&self) -> Option<&str> {
        non_blank(&self.membership_type)
    }

    pub fn keyword(&self) -> Option<&str> {
        non_blank(&self.keyword)
    }

    pub fn sort(&self) -> Option<SortBy> {
        match &self.sort_by {
            Some(param) => SortBy::from_param(param),
            None => Some(SortBy::Votes),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteQuery {
    pub upvote: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub perk_id: PerkId,
    pub votes: i64,
    pub state: VoteState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVotes {
    pub votes: BTreeMap<PerkId, VoteState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUser {
    pub username: String,
}

impl RegisterUser {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            username: username(&self.username)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub memberships: Vec<MembershipType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMembership {
    pub name: String,
}

impl NewMembership {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", &self.name)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignMembership {
    pub membership_type_id: MembershipTypeId,
}
