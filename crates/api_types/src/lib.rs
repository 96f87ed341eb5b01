//! Wire types of the accounting service's REST API.
//!
//! Amounts travel as decimal numbers in major units (`f64`); conversion to
//! integer minor units happens in the client before any arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod page {
    use super::*;

    /// One batch of a paginated list.
    ///
    /// `has_more` is authoritative: a full page with `has_more = false` is the
    /// last one.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Page<T> {
        pub items: Vec<T>,
        pub total: u64,
        pub has_more: bool,
        #[serde(default)]
        pub skip: Option<u64>,
        #[serde(default)]
        pub limit: Option<u64>,
    }

    /// Query string of a paginated request.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PageQuery {
        pub skip: u64,
        pub limit: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search: Option<String>,
    }
}

pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: Option<String>,
        pub email: Option<String>,
    }
}

pub mod group {
    use super::*;

    use crate::user::UserView;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GroupMinimal {
        pub id: Uuid,
        pub name: String,
    }

    /// A membership row (`id` is the membership id, not the user id).
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MemberView {
        pub id: Uuid,
        pub user: UserView,
        /// `ADMIN` or `MEMBER`.
        pub role: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct GroupDetail {
        pub id: Uuid,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub members: Vec<MemberView>,
    }
}

pub mod bill {
    use super::*;

    use crate::{group::GroupMinimal, user::UserView};

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ShareView {
        pub id: Option<Uuid>,
        pub user_id: Uuid,
        pub amount: f64,
        #[serde(default)]
        pub paid: bool,
        #[serde(default)]
        pub user: Option<UserView>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BillView {
        pub id: Uuid,
        pub group_id: Uuid,
        pub description: String,
        pub total_amount: f64,
        pub paid_by: Uuid,
        /// `EQUAL`, `EXACT` or `PERCENTAGE`.
        #[serde(default = "default_split_type")]
        pub split_type: String,
        pub created_at: DateTime<Utc>,
        #[serde(default)]
        pub shares: Vec<ShareView>,
        #[serde(default)]
        pub payer: Option<UserView>,
        #[serde(default)]
        pub group: Option<GroupMinimal>,
    }

    fn default_split_type() -> String {
        "EQUAL".to_string()
    }

    /// A share in a create/update request. `amount` is omitted for EQUAL
    /// splits and required for EXACT ones.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ShareRequest {
        pub user_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<f64>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BillNew {
        pub group_id: Uuid,
        pub description: String,
        pub total_amount: f64,
        pub paid_by: Uuid,
        pub split_type: String,
        pub shares: Vec<ShareRequest>,
    }

    /// Full replacement of a bill's editable fields.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct BillUpdate {
        pub description: String,
        pub total_amount: f64,
        pub paid_by: Uuid,
        pub split_type: String,
        pub shares: Vec<ShareRequest>,
    }
}

pub mod summary {
    use super::*;

    use crate::user::UserView;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct SummaryResponse {
        pub total_owed: f64,
        pub total_owe: f64,
        pub group_count: u64,
        #[serde(default)]
        pub friends: Vec<UserView>,
    }
}

/// Error body returned by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
