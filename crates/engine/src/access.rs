//! Advisory access rules for group membership changes.
//!
//! These predicates mirror what the accounting service enforces and only
//! decide whether the client offers an action. The service remains the final
//! authority: a removal allowed here may still be rejected by the server, and
//! callers must surface that rejection.

use uuid::Uuid;

use crate::{Group, Membership, Role};

/// Whether `acting` may remove `target` from their group.
///
/// - only admins remove members
/// - admins never remove other admins
/// - nobody removes themselves through this path (leaving is separate)
#[must_use]
pub fn can_remove(acting: &Membership, target: &Membership) -> bool {
    acting.role == Role::Admin && target.role != Role::Admin && acting.user_id != target.user_id
}

/// Members of `group` that `viewer` may remove. Empty when the viewer is not
/// a member.
#[must_use]
pub fn removable_members(group: &Group, viewer: Uuid) -> Vec<&Membership> {
    let Some(acting) = group.membership_of(viewer) else {
        return Vec::new();
    };
    group
        .members()
        .iter()
        .filter(|target| can_remove(acting, target))
        .collect()
}
