//! Split allocation.
//!
//! Turns a bill total and the selected participants into per-person amounts,
//! or rejects the input before it reaches the service.
//!
//! EQUAL splits never drift: the total is divided in minor units and the
//! remainder goes one unit at a time to the *first* participants in
//! selection order. Keep the selection order stable between creating a bill
//! and editing it, otherwise a different participant absorbs the remainder.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine, SHARE_TOLERANCE, Share, SplitType};

/// Per-participant amounts in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    entries: Vec<(Uuid, Money)>,
}

impl Allocation {
    #[must_use]
    pub fn entries(&self) -> &[(Uuid, Money)] {
        &self.entries
    }

    #[must_use]
    pub fn amount_of(&self, user_id: Uuid) -> Option<Money> {
        self.entries
            .iter()
            .find_map(|(user, amount)| (*user == user_id).then_some(*amount))
    }

    #[must_use]
    pub fn total(&self) -> Money {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Live state of an EXACT split while amounts are being typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExactProgress {
    /// Σ of the entered amounts.
    pub matched: Money,
    /// `total - matched`; negative when the entries overshoot.
    pub remaining: Money,
}

impl ExactProgress {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.remaining.within(Money::ZERO, SHARE_TOLERANCE)
    }
}

/// Everything the bill form knows about how to split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitRequest {
    pub split_type: SplitType,
    /// Selected participants, in selection order.
    pub participants: Vec<Uuid>,
    /// Amounts typed per participant (EXACT only). Missing entries count as 0.
    pub exact_amounts: HashMap<Uuid, Money>,
}

impl SplitRequest {
    #[must_use]
    pub fn equal(participants: Vec<Uuid>) -> Self {
        Self {
            split_type: SplitType::Equal,
            participants,
            exact_amounts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn exact(entries: Vec<(Uuid, Money)>) -> Self {
        Self {
            split_type: SplitType::Exact,
            participants: entries.iter().map(|(user, _)| *user).collect(),
            exact_amounts: entries.into_iter().collect(),
        }
    }
}

fn ensure_total(total: Money) -> ResultEngine<()> {
    if !total.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "total_amount must be > 0, got {total}"
        )));
    }
    Ok(())
}

fn ensure_participants<'a>(participants: impl IntoIterator<Item = &'a Uuid>) -> ResultEngine<()> {
    let mut seen = HashSet::new();
    for user in participants {
        if !seen.insert(*user) {
            return Err(EngineError::DuplicateParticipant(user.to_string()));
        }
    }
    if seen.is_empty() {
        return Err(EngineError::EmptyParticipants);
    }
    Ok(())
}

/// Splits `total` evenly across `participants`.
///
/// The base share is `total / n` rounded down to the minor unit; the first
/// `total % n` participants get one extra unit, so the shares always sum to
/// `total` exactly.
pub fn allocate_equal(total: Money, participants: &[Uuid]) -> ResultEngine<Allocation> {
    ensure_total(total)?;
    ensure_participants(participants)?;

    let count = participants.len() as i64;
    let base = total.minor() / count;
    let remainder = total.minor() % count;

    let entries = participants
        .iter()
        .enumerate()
        .map(|(idx, user)| {
            let extra = i64::from((idx as i64) < remainder);
            (*user, Money::new(base + extra))
        })
        .collect();

    Ok(Allocation { entries })
}

/// Matched vs. remaining for the amounts entered so far.
#[must_use]
pub fn exact_progress(total: Money, entered: &[(Uuid, Money)]) -> ExactProgress {
    let matched = entered
        .iter()
        .fold(Money::ZERO, |acc, (_, amount)| acc.saturating_add(*amount));
    ExactProgress {
        matched,
        remaining: total.saturating_sub(matched),
    }
}

/// Accepts the entered amounts only if they add up to `total` within 0.01.
///
/// Nothing is adjusted: a mismatch is returned as
/// [`EngineError::AmountMismatch`] carrying the matched sum and the remaining
/// delta so the form can show both.
pub fn validate_exact(total: Money, entered: &[(Uuid, Money)]) -> ResultEngine<Allocation> {
    ensure_total(total)?;
    ensure_participants(entered.iter().map(|(user, _)| user))?;

    if let Some((user, amount)) = entered.iter().find(|(_, amount)| amount.is_negative()) {
        return Err(EngineError::InvalidAmount(format!(
            "share of {user} must be >= 0, got {amount}"
        )));
    }

    if Money::checked_sum(entered.iter().map(|(_, amount)| *amount)).is_none() {
        return Err(EngineError::InvalidAmount(
            "entered amounts are too large".to_string(),
        ));
    }

    let progress = exact_progress(total, entered);
    if !progress.is_balanced() {
        return Err(EngineError::AmountMismatch {
            matched: progress.matched,
            total,
            remaining: progress.remaining,
        });
    }

    Ok(Allocation {
        entries: entered.to_vec(),
    })
}

/// Maps an allocation onto share records, one per participant in the given
/// order. Participants with a zero (or missing) amount keep an empty share so
/// the bill still records that they were part of the split.
#[must_use]
pub fn to_shares(allocation: &Allocation, participants: &[Uuid]) -> Vec<Share> {
    participants
        .iter()
        .map(|user| Share::new(*user, allocation.amount_of(*user).unwrap_or(Money::ZERO)))
        .collect()
}

/// Runs the allocator selected by `request.split_type` and returns the
/// resulting shares.
pub fn split(total: Money, request: &SplitRequest) -> ResultEngine<Vec<Share>> {
    let allocation = match request.split_type {
        SplitType::Equal => allocate_equal(total, &request.participants)?,
        SplitType::Exact => {
            let entered: Vec<(Uuid, Money)> = request
                .participants
                .iter()
                .map(|user| {
                    let amount = request
                        .exact_amounts
                        .get(user)
                        .copied()
                        .unwrap_or(Money::ZERO);
                    (*user, amount)
                })
                .collect();
            validate_exact(total, &entered)?
        }
        SplitType::Percentage => {
            return Err(EngineError::UnknownSplitType(
                SplitType::Percentage.as_str().to_string(),
            ));
        }
    };
    Ok(to_shares(&allocation, &request.participants))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(n: u128) -> Vec<Uuid> {
        (1..=n).map(Uuid::from_u128).collect()
    }

    fn amounts(allocation: &Allocation) -> Vec<i64> {
        allocation.entries().iter().map(|(_, m)| m.minor()).collect()
    }

    #[test]
    fn equal_split_puts_remainder_on_first_participants() {
        let allocation = allocate_equal(Money::new(10_000), &users(3)).unwrap();
        assert_eq!(amounts(&allocation), vec![3334, 3333, 3333]);
        assert_eq!(allocation.total(), Money::new(10_000));

        let allocation = allocate_equal(Money::new(1001), &users(4)).unwrap();
        assert_eq!(amounts(&allocation), vec![251, 250, 250, 250]);
    }

    #[test]
    fn equal_split_never_drifts() {
        for total in [1, 7, 99, 100, 1_001, 99_999, 123_457] {
            for n in 1..=13 {
                let allocation = allocate_equal(Money::new(total), &users(n)).unwrap();
                assert_eq!(allocation.len(), n as usize);
                assert_eq!(allocation.total(), Money::new(total), "total={total} n={n}");

                let min = allocation.entries().iter().map(|(_, m)| m.minor()).min().unwrap();
                let max = allocation.entries().iter().map(|(_, m)| m.minor()).max().unwrap();
                assert!(max - min <= 1);
            }
        }
    }

    #[test]
    fn equal_split_follows_selection_order() {
        let mut order = users(3);
        order.reverse();
        let allocation = allocate_equal(Money::new(10_000), &order).unwrap();
        assert_eq!(allocation.amount_of(Uuid::from_u128(3)), Some(Money::new(3334)));
        assert_eq!(allocation.amount_of(Uuid::from_u128(1)), Some(Money::new(3333)));
    }

    #[test]
    fn equal_split_rejects_bad_input() {
        assert_eq!(
            allocate_equal(Money::new(100), &[]),
            Err(EngineError::EmptyParticipants)
        );
        assert!(matches!(
            allocate_equal(Money::ZERO, &users(2)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            allocate_equal(Money::new(-5), &users(2)),
            Err(EngineError::InvalidAmount(_))
        ));
        let dup = [Uuid::from_u128(1), Uuid::from_u128(1)];
        assert!(matches!(
            allocate_equal(Money::new(100), &dup),
            Err(EngineError::DuplicateParticipant(_))
        ));
    }

    #[test]
    fn exact_reports_remaining_delta() {
        let entered = [
            (Uuid::from_u128(1), Money::new(2000)),
            (Uuid::from_u128(2), Money::new(2000)),
        ];
        assert_eq!(
            validate_exact(Money::new(5000), &entered),
            Err(EngineError::AmountMismatch {
                matched: Money::new(4000),
                total: Money::new(5000),
                remaining: Money::new(1000),
            })
        );
    }

    #[test]
    fn exact_tolerates_one_unit() {
        let total = Money::new(5000);
        let within = [
            (Uuid::from_u128(1), Money::new(2500)),
            (Uuid::from_u128(2), Money::new(2501)),
        ];
        assert!(validate_exact(total, &within).is_ok());

        let below = [
            (Uuid::from_u128(1), Money::new(2500)),
            (Uuid::from_u128(2), Money::new(2499)),
        ];
        assert!(validate_exact(total, &below).is_ok());

        let off_by_two = [
            (Uuid::from_u128(1), Money::new(2500)),
            (Uuid::from_u128(2), Money::new(2502)),
        ];
        assert_eq!(
            validate_exact(total, &off_by_two),
            Err(EngineError::AmountMismatch {
                matched: Money::new(5002),
                total,
                remaining: Money::new(-2),
            })
        );
    }

    #[test]
    fn exact_rejects_negative_entries() {
        let entered = [
            (Uuid::from_u128(1), Money::new(6000)),
            (Uuid::from_u128(2), Money::new(-1000)),
        ];
        assert!(matches!(
            validate_exact(Money::new(5000), &entered),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn exact_rejects_amounts_that_overflow() {
        let huge = Money::new(i64::MAX / 2 + 1);
        let entered = [(Uuid::from_u128(1), huge), (Uuid::from_u128(2), huge)];
        assert!(matches!(
            validate_exact(Money::new(5000), &entered),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(!exact_progress(Money::new(5000), &entered).is_balanced());
    }

    #[test]
    fn progress_tracks_matched_and_remaining() {
        let progress = exact_progress(
            Money::new(5000),
            &[(Uuid::from_u128(1), Money::new(1250))],
        );
        assert_eq!(progress.matched, Money::new(1250));
        assert_eq!(progress.remaining, Money::new(3750));
        assert!(!progress.is_balanced());
    }

    #[test]
    fn to_shares_keeps_zero_participants() {
        let participants = users(3);
        let allocation = validate_exact(
            Money::new(3000),
            &[
                (participants[0], Money::new(3000)),
                (participants[1], Money::ZERO),
            ],
        )
        .unwrap();

        let shares = to_shares(&allocation, &participants);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[1].amount, Money::ZERO);
        assert_eq!(shares[2].amount, Money::ZERO);
        assert!(shares.iter().all(|s| s.id.is_none() && !s.paid));
    }

    #[test]
    fn split_dispatches_on_policy() {
        let participants = users(2);
        let shares = split(Money::new(901), &SplitRequest::equal(participants.clone())).unwrap();
        assert_eq!(shares[0].amount, Money::new(451));
        assert_eq!(shares[1].amount, Money::new(450));

        let mut request = SplitRequest::equal(participants.clone());
        request.split_type = SplitType::Exact;
        request.exact_amounts.insert(participants[0], Money::new(901));
        let shares = split(Money::new(901), &request).unwrap();
        assert_eq!(shares[1].amount, Money::ZERO);

        request.split_type = SplitType::Percentage;
        assert!(matches!(
            split(Money::new(901), &request),
            Err(EngineError::UnknownSplitType(_))
        ));
    }
}
