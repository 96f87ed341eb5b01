//! Balance derivation from bills and shares, seen from one viewer.
//!
//! Three entry points, one per granularity:
//! - [`bill_balance`]: the position on a single bill (lent/spent/owe/not involved)
//! - [`group_balance`]: totals restricted to one group
//! - [`global_balance`]: totals over every bill given
//!
//! "Owed" (others owe the viewer) and "owe" (the viewer owes others) are kept
//! as separate running sums. The net figure is computed on demand by
//! [`BalanceSummary::net`] and never stored.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{Bill, EngineError, Money};

/// The viewer's position on one bill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillPosition {
    /// Viewer paid and fronted this much for the others.
    Lent(Money),
    /// Viewer paid but the whole bill was their own share.
    Spent(Money),
    /// Viewer did not pay and owes their share.
    Owe(Money),
    /// Viewer did not pay and has no (or a zero) share.
    NotInvolved,
}

impl BillPosition {
    #[must_use]
    pub fn is_involved(self) -> bool {
        !matches!(self, Self::NotInvolved)
    }

    /// Amount counted into "owed"; zero unless [`BillPosition::Lent`].
    #[must_use]
    pub fn lent(self) -> Money {
        match self {
            Self::Lent(amount) => amount,
            _ => Money::ZERO,
        }
    }

    /// Amount counted into "owe"; zero unless [`BillPosition::Owe`].
    #[must_use]
    pub fn owe(self) -> Money {
        match self {
            Self::Owe(amount) => amount,
            _ => Money::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementStatus {
    Settled,
    Pending,
}

impl SettlementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settled => "Settled",
            Self::Pending => "Pending",
        }
    }

    /// Role-dependent wording: a pending bill reads "To Pay" for the debtor.
    pub fn label(self, is_payer: bool) -> &'static str {
        match (self, is_payer) {
            (Self::Pending, false) => "To Pay",
            _ => self.as_str(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillBalance {
    pub bill_id: Uuid,
    pub is_payer: bool,
    pub position: BillPosition,
    /// `None` when the viewer is not involved.
    pub status: Option<SettlementStatus>,
}

/// Derives the viewer's position and settlement status on `bill`.
///
/// Does not validate the share set; aggregation does that before counting.
#[must_use]
pub fn bill_balance(bill: &Bill, viewer: Uuid) -> BillBalance {
    let is_payer = bill.paid_by == viewer;
    let my_share = bill.share_of(viewer);

    let position = if is_payer {
        let own = my_share.map_or(Money::ZERO, |share| share.amount);
        let lent = bill.total.saturating_sub(own);
        if lent.is_positive() {
            BillPosition::Lent(lent)
        } else {
            BillPosition::Spent(own)
        }
    } else {
        match my_share {
            Some(share) if share.amount.is_positive() => BillPosition::Owe(share.amount),
            _ => BillPosition::NotInvolved,
        }
    };

    let status = match position {
        BillPosition::NotInvolved => None,
        _ if is_payer => {
            let others_paid = bill
                .shares
                .iter()
                .filter(|share| share.user_id != viewer)
                .all(|share| share.paid);
            Some(if others_paid {
                SettlementStatus::Settled
            } else {
                SettlementStatus::Pending
            })
        }
        _ => Some(if my_share.is_some_and(|share| share.paid) {
            SettlementStatus::Settled
        } else {
            SettlementStatus::Pending
        }),
    };

    BillBalance {
        bill_id: bill.id,
        is_payer,
        position,
        status,
    }
}

/// A bill left out of the totals, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedBill {
    pub bill_id: Uuid,
    pub reason: EngineError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Σ lent over bills the viewer paid.
    pub owed: Money,
    /// Σ own share over bills others paid.
    pub owe: Money,
    /// Σ of the others' *unpaid* shares on bills the viewer paid.
    pub outstanding_owed: Money,
    /// Σ of the viewer's *unpaid* shares on bills others paid.
    pub outstanding_owe: Money,
    /// Bills the viewer is involved in that were counted.
    pub bills_counted: usize,
    pub skipped: Vec<SkippedBill>,
}

impl BalanceSummary {
    /// `owed - owe`, for display.
    #[must_use]
    pub fn net(&self) -> Money {
        self.owed - self.owe
    }
}

/// Running owed/owe sums for one viewer.
///
/// Malformed bills are skipped with a warning and listed in
/// [`BalanceSummary::skipped`]; the same bill id is only counted once.
#[derive(Debug)]
pub struct BalanceAggregator {
    viewer: Uuid,
    seen: HashSet<Uuid>,
    summary: BalanceSummary,
}

impl BalanceAggregator {
    #[must_use]
    pub fn new(viewer: Uuid) -> Self {
        Self {
            viewer,
            seen: HashSet::new(),
            summary: BalanceSummary::default(),
        }
    }

    pub fn add(&mut self, bill: &Bill) {
        if let Err(reason) = bill.validate_shares() {
            self.skip(bill, reason);
            return;
        }
        if !self.seen.insert(bill.id) {
            tracing::debug!("bill {} already counted", bill.id);
            return;
        }

        // Deltas for owed, outstanding owed, owe and outstanding owe. Subsets of
        // a validated share set cannot overflow, but the running totals can.
        let (lent, unpaid_lent, owe, unpaid_owe) = match bill_balance(bill, self.viewer).position {
            BillPosition::NotInvolved => return,
            BillPosition::Spent(_) => (Money::ZERO, Money::ZERO, Money::ZERO, Money::ZERO),
            BillPosition::Lent(amount) => {
                let unpaid = bill
                    .shares
                    .iter()
                    .filter(|share| share.user_id != self.viewer && !share.paid)
                    .map(|share| share.amount)
                    .sum::<Money>();
                (amount, unpaid, Money::ZERO, Money::ZERO)
            }
            BillPosition::Owe(amount) => {
                let unpaid = if bill.share_of(self.viewer).is_some_and(|share| !share.paid) {
                    amount
                } else {
                    Money::ZERO
                };
                (Money::ZERO, Money::ZERO, amount, unpaid)
            }
        };

        let summary = &self.summary;
        let totals = (|| {
            Some((
                summary.owed.checked_add(lent)?,
                summary.outstanding_owed.checked_add(unpaid_lent)?,
                summary.owe.checked_add(owe)?,
                summary.outstanding_owe.checked_add(unpaid_owe)?,
            ))
        })();
        let Some((owed, outstanding_owed, owe, outstanding_owe)) = totals else {
            self.seen.remove(&bill.id);
            self.skip(
                bill,
                EngineError::MalformedShareSet {
                    bill_id: bill.id,
                    reason: "balance totals overflow".to_string(),
                },
            );
            return;
        };
        self.summary.owed = owed;
        self.summary.outstanding_owed = outstanding_owed;
        self.summary.owe = owe;
        self.summary.outstanding_owe = outstanding_owe;
        self.summary.bills_counted += 1;
    }

    fn skip(&mut self, bill: &Bill, reason: EngineError) {
        tracing::warn!("skipping bill {} in balance totals: {reason}", bill.id);
        self.summary.skipped.push(SkippedBill {
            bill_id: bill.id,
            reason,
        });
    }

    #[must_use]
    pub fn summary(&self) -> &BalanceSummary {
        &self.summary
    }

    #[must_use]
    pub fn finish(self) -> BalanceSummary {
        self.summary
    }
}

/// Totals over bills belonging to `group_id`; other bills are ignored.
#[must_use]
pub fn group_balance<'a>(
    bills: impl IntoIterator<Item = &'a Bill>,
    group_id: Uuid,
    viewer: Uuid,
) -> BalanceSummary {
    let mut aggregator = BalanceAggregator::new(viewer);
    for bill in bills.into_iter().filter(|bill| bill.group_id == group_id) {
        aggregator.add(bill);
    }
    aggregator.finish()
}

/// Totals over every bill given.
#[must_use]
pub fn global_balance<'a>(bills: impl IntoIterator<Item = &'a Bill>, viewer: Uuid) -> BalanceSummary {
    let mut aggregator = BalanceAggregator::new(viewer);
    for bill in bills {
        aggregator.add(bill);
    }
    aggregator.finish()
}
