//! Groups and memberships (read-only projections of the service's data).

use std::collections::HashSet;

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Role of a user inside a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Member => "MEMBER",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "MEMBER" => Ok(Self::Member),
            other => Err(EngineError::InvalidRole(format!(
                "invalid membership role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    members: Vec<Membership>,
}

impl Group {
    /// Builds a group, rejecting a member list that references the same user
    /// twice.
    pub fn new(id: Uuid, name: String, members: Vec<Membership>) -> ResultEngine<Self> {
        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member.user_id) {
                return Err(EngineError::InvalidGroup(format!(
                    "user {} is a member more than once",
                    member.user_id
                )));
            }
        }
        Ok(Self { id, name, members })
    }

    /// Members in the order the service returned them.
    #[must_use]
    pub fn members(&self) -> &[Membership] {
        &self.members
    }

    #[must_use]
    pub fn membership_of(&self, user_id: Uuid) -> Option<&Membership> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// User ids in member order; the default selection for a new bill.
    #[must_use]
    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.user_id).collect()
    }
}
