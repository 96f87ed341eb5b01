//! The module contains the errors the engine can return.
//!
//! Split errors ([`InvalidAmount`], [`EmptyParticipants`],
//! [`AmountMismatch`], [`DuplicateParticipant`]) are recoverable locally and
//! are meant to be shown before a bill is submitted. [`MalformedShareSet`] is
//! produced while aggregating balances and only ever recorded, never
//! propagated.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`EmptyParticipants`]: EngineError::EmptyParticipants
//!  [`AmountMismatch`]: EngineError::AmountMismatch
//!  [`DuplicateParticipant`]: EngineError::DuplicateParticipant
//!  [`MalformedShareSet`]: EngineError::MalformedShareSet
use thiserror::Error;
use uuid::Uuid;

use crate::Money;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("At least one person must be involved in the split")]
    EmptyParticipants,
    #[error("\"{0}\" appears more than once in the split")]
    DuplicateParticipant(String),
    #[error("The total of all shares ({matched}) must equal the bill amount ({total}), remaining {remaining}")]
    AmountMismatch {
        matched: Money,
        total: Money,
        remaining: Money,
    },
    #[error("Malformed share set on bill {bill_id}: {reason}")]
    MalformedShareSet { bill_id: Uuid, reason: String },
    #[error("Shares required: {0}")]
    SharesRequired(String),
    #[error("Unsupported split type: {0}")]
    UnknownSplitType(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid group: {0}")]
    InvalidGroup(String),
}
