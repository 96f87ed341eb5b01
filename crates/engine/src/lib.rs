//! Client-side core of the shared-expense tracker.
//!
//! Everything here is pure and synchronous: money arithmetic in minor units,
//! the split allocator, balance derivation and the advisory membership rules.
//! The accounting service stays the source of truth for every value; these
//! functions only prepare requests and derive display figures.

pub use access::{can_remove, removable_members};
pub use balances::{
    BalanceAggregator, BalanceSummary, BillBalance, BillPosition, SettlementStatus, SkippedBill,
    bill_balance, global_balance, group_balance,
};
pub use bills::{Bill, SHARE_TOLERANCE, Share, SplitType};
pub use currency::Currency;
pub use edit::{BillEdit, EditPlan, ShareChanges, diff_shares, plan_edit};
pub use error::EngineError;
pub use groups::{Group, Membership, Role};
pub use money::Money;
pub use split::{
    Allocation, ExactProgress, SplitRequest, allocate_equal, exact_progress, split, to_shares,
    validate_exact,
};

mod access;
mod balances;
mod bills;
mod currency;
mod edit;
mod error;
mod groups;
mod money;
mod split;

pub type ResultEngine<T> = Result<T, EngineError>;
