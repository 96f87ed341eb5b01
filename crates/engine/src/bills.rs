//! Bill primitives.
//!
//! A [`Bill`] is an expense paid by one user and split among group members
//! through its [`Share`]s. Bills are owned by the accounting service; the
//! engine only reads them and validates the share set before trusting it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Largest difference between Σ shares and the bill total that still counts
/// as balanced (0.01 currency unit).
pub const SHARE_TOLERANCE: Money = Money::UNIT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitType {
    #[default]
    Equal,
    Exact,
    /// Accepted on the wire, never produced by the allocator.
    Percentage,
}

impl SplitType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "EQUAL",
            Self::Exact => "EXACT",
            Self::Percentage => "PERCENTAGE",
        }
    }
}

impl TryFrom<&str> for SplitType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EQUAL" => Ok(Self::Equal),
            "EXACT" => Ok(Self::Exact),
            "PERCENTAGE" => Ok(Self::Percentage),
            other => Err(EngineError::UnknownSplitType(other.to_string())),
        }
    }
}

/// One participant's portion of a bill.
///
/// `id` is `None` for shares computed locally and not yet persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub id: Option<Uuid>,
    pub user_id: Uuid,
    pub amount: Money,
    pub paid: bool,
}

impl Share {
    #[must_use]
    pub fn new(user_id: Uuid, amount: Money) -> Self {
        Self {
            id: None,
            user_id,
            amount,
            paid: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bill {
    pub id: Uuid,
    pub group_id: Uuid,
    pub description: String,
    pub total: Money,
    pub paid_by: Uuid,
    pub split_type: SplitType,
    pub created_at: DateTime<Utc>,
    pub shares: Vec<Share>,
}

impl Bill {
    /// The share owned by `user_id`, if any.
    #[must_use]
    pub fn share_of(&self, user_id: Uuid) -> Option<&Share> {
        self.shares.iter().find(|share| share.user_id == user_id)
    }

    /// Σ of every share amount, `None` if it overflows.
    #[must_use]
    pub fn shares_total(&self) -> Option<Money> {
        Money::checked_sum(self.shares.iter().map(|share| share.amount))
    }

    /// Checks the share-set invariants: positive total, non-negative shares,
    /// one share per user, Σ shares == total within [`SHARE_TOLERANCE`].
    pub fn validate_shares(&self) -> ResultEngine<()> {
        let malformed = |reason: String| EngineError::MalformedShareSet {
            bill_id: self.id,
            reason,
        };

        if !self.total.is_positive() {
            return Err(malformed(format!("total {} must be > 0", self.total)));
        }

        let mut seen = HashSet::with_capacity(self.shares.len());
        for share in &self.shares {
            if share.amount.is_negative() {
                return Err(malformed(format!(
                    "share of {} is negative ({})",
                    share.user_id, share.amount
                )));
            }
            if !seen.insert(share.user_id) {
                return Err(malformed(format!("duplicate share for {}", share.user_id)));
            }
        }

        let sum = self
            .shares_total()
            .ok_or_else(|| malformed("share amounts overflow".to_string()))?;
        if !sum.within(self.total, SHARE_TOLERANCE) {
            return Err(malformed(format!(
                "shares sum to {sum}, total is {}",
                self.total
            )));
        }

        Ok(())
    }
}
