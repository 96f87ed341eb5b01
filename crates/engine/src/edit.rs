//! Planning a bill edit before submitting it.
//!
//! Applies the same rules the accounting service uses when a bill is updated,
//! so the form can show the resulting shares (and reject impossible edits)
//! without a round trip:
//!
//! - explicit shares are recomputed with the target split/total/payer
//! - otherwise a change of total, split type or payer recomputes an EQUAL
//!   split from the existing participants, in their existing order
//! - an EXACT bill whose total changes needs new shares unless the current
//!   ones still add up to it
//!
//! Every recomputed share is marked paid only for the payer.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    Bill, EngineError, Money, ResultEngine, SHARE_TOLERANCE, Share, SplitRequest, SplitType,
    split::{allocate_equal, split, to_shares},
};

/// Fields the user changed. `None` keeps the bill's current value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BillEdit {
    pub description: Option<String>,
    pub total: Option<Money>,
    pub paid_by: Option<Uuid>,
    /// Target split type when no explicit `split` is given.
    pub split_type: Option<SplitType>,
    /// New participant selection (and EXACT amounts).
    pub split: Option<SplitRequest>,
}

impl BillEdit {
    fn touches_split(&self) -> bool {
        self.total.is_some() || self.split_type.is_some() || self.paid_by.is_some()
    }
}

/// How the share rows change, keyed by user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareChanges {
    /// Existing shares whose user is no longer part of the split.
    pub removed: Vec<Share>,
    /// Existing shares (ids kept) whose amount or paid flag changes.
    pub updated: Vec<Share>,
    /// Shares for users that had none.
    pub added: Vec<Share>,
}

impl ShareChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty() && self.added.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditPlan {
    pub description: String,
    pub total: Money,
    pub paid_by: Uuid,
    pub split_type: SplitType,
    /// Full replacement share set, or `None` when shares stay as they are.
    pub shares: Option<Vec<Share>>,
    pub changes: ShareChanges,
}

/// Computes the bill that `edit` would produce.
pub fn plan_edit(bill: &Bill, edit: &BillEdit) -> ResultEngine<EditPlan> {
    let total = edit.total.unwrap_or(bill.total);
    let paid_by = edit.paid_by.unwrap_or(bill.paid_by);
    let split_type = edit
        .split
        .as_ref()
        .map(|request| request.split_type)
        .or(edit.split_type)
        .unwrap_or(bill.split_type);

    let recomputed = if let Some(request) = &edit.split {
        Some(split(total, request)?)
    } else if edit.touches_split() {
        match split_type {
            SplitType::Equal => {
                let participants: Vec<Uuid> = bill.shares.iter().map(|s| s.user_id).collect();
                let allocation = allocate_equal(total, &participants)?;
                Some(to_shares(&allocation, &participants))
            }
            SplitType::Exact => {
                let still_matches = bill
                    .shares_total()
                    .is_some_and(|current| current.within(total, SHARE_TOLERANCE));
                if edit.total.is_some() && !still_matches {
                    return Err(EngineError::SharesRequired(
                        "updating the total of an EXACT split requires new shares".to_string(),
                    ));
                }
                None
            }
            SplitType::Percentage => {
                return Err(EngineError::UnknownSplitType(
                    SplitType::Percentage.as_str().to_string(),
                ));
            }
        }
    } else {
        None
    };

    let shares = recomputed.map(|shares| {
        shares
            .into_iter()
            .map(|share| Share {
                paid: share.user_id == paid_by,
                ..share
            })
            .collect::<Vec<_>>()
    });

    let changes = shares
        .as_deref()
        .map(|next| diff_shares(&bill.shares, next))
        .unwrap_or_default();

    Ok(EditPlan {
        description: edit
            .description
            .clone()
            .unwrap_or_else(|| bill.description.clone()),
        total,
        paid_by,
        split_type,
        shares,
        changes,
    })
}

/// Diffs two share sets by user.
#[must_use]
pub fn diff_shares(current: &[Share], next: &[Share]) -> ShareChanges {
    let by_user: HashMap<Uuid, &Share> = current.iter().map(|s| (s.user_id, s)).collect();
    let next_users: HashMap<Uuid, &Share> = next.iter().map(|s| (s.user_id, s)).collect();

    let removed = current
        .iter()
        .filter(|share| !next_users.contains_key(&share.user_id))
        .cloned()
        .collect();

    let mut updated = Vec::new();
    let mut added = Vec::new();
    for share in next {
        match by_user.get(&share.user_id) {
            Some(existing) => {
                if existing.amount != share.amount || existing.paid != share.paid {
                    updated.push(Share {
                        id: existing.id,
                        ..share.clone()
                    });
                }
            }
            None => added.push(share.clone()),
        }
    }

    ShareChanges {
        removed,
        updated,
        added,
    }
}
