use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type PerkId = u64;
pub type MembershipTypeId = u64;
pub type UserId = u64;

/// A loyalty or payment program, e.g. "CAA" or "Scene+".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipType {
    pub id: MembershipTypeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Stored perk record. The score is not part of it, the vote ledger owns that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perk {
    pub id: PerkId,
    pub title: String,
    pub description: String,
    pub region: String,
    pub expiry_date: NaiveDate,
    pub membership_type: MembershipType,
    pub created_by: User,
}

impl Perk {
    pub fn matches_membership(&self, name: &str) -> bool {
        self.membership_type.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();

        self.title.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
    }
}
