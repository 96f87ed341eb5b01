//! Conversions between wire types and the engine model.
//!
//! Wire amounts are decimals in major units; they become [`Money`] here and
//! nowhere else.

use api_types::{
    bill::{BillNew, BillUpdate, BillView, ShareRequest, ShareView},
    group::GroupDetail,
};
use engine::{
    Bill, EditPlan, Group, Membership, Money, ResultEngine, Role, Share, SplitType,
};
use uuid::Uuid;

pub fn share_from_view(view: &ShareView) -> ResultEngine<Share> {
    Ok(Share {
        id: view.id,
        user_id: view.user_id,
        amount: Money::from_major(view.amount)?,
        paid: view.paid,
    })
}

/// Builds an engine bill. Shares are taken as-is; validating them is the
/// aggregator's job.
pub fn bill_from_view(view: &BillView) -> ResultEngine<Bill> {
    Ok(Bill {
        id: view.id,
        group_id: view.group_id,
        description: view.description.clone(),
        total: Money::from_major(view.total_amount)?,
        paid_by: view.paid_by,
        split_type: SplitType::try_from(view.split_type.as_str())?,
        created_at: view.created_at,
        shares: view
            .shares
            .iter()
            .map(share_from_view)
            .collect::<ResultEngine<_>>()?,
    })
}

pub fn group_from_view(view: &GroupDetail) -> ResultEngine<Group> {
    let members = view
        .members
        .iter()
        .map(|member| {
            Ok(Membership {
                id: member.id,
                user_id: member.user.id,
                role: Role::try_from(member.role.as_str())?,
            })
        })
        .collect::<ResultEngine<Vec<_>>>()?;
    Group::new(view.id, view.name.clone(), members)
}

/// Share lines of a create/update request. EQUAL splits send only the
/// participants; the service recomputes the amounts.
pub fn share_requests(split_type: SplitType, shares: &[Share]) -> Vec<ShareRequest> {
    shares
        .iter()
        .map(|share| ShareRequest {
            user_id: share.user_id,
            amount: match split_type {
                SplitType::Equal => None,
                SplitType::Exact | SplitType::Percentage => Some(share.amount.to_major()),
            },
        })
        .collect()
}

pub fn bill_new(
    group_id: Uuid,
    description: impl Into<String>,
    total: Money,
    paid_by: Uuid,
    split_type: SplitType,
    shares: &[Share],
) -> BillNew {
    BillNew {
        group_id,
        description: description.into(),
        total_amount: total.to_major(),
        paid_by,
        split_type: split_type.as_str().to_string(),
        shares: share_requests(split_type, shares),
    }
}

/// Update request for a planned edit. When the plan keeps the current shares
/// they are resent unchanged.
pub fn bill_update(bill: &Bill, plan: &EditPlan) -> BillUpdate {
    let shares = plan.shares.as_deref().unwrap_or(&bill.shares);
    BillUpdate {
        description: plan.description.clone(),
        total_amount: plan.total.to_major(),
        paid_by: plan.paid_by,
        split_type: plan.split_type.as_str().to_string(),
        shares: share_requests(plan.split_type, shares),
    }
}

#[cfg(test)]
mod tests {
    use api_types::{group::MemberView, user::UserView};
    use chrono::Utc;
    use engine::{BillEdit, EngineError, SplitRequest, plan_edit, split};

    use super::*;

    fn user(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn view(total: f64, shares: &[(u128, f64, bool)]) -> BillView {
        BillView {
            id: Uuid::from_u128(10),
            group_id: Uuid::from_u128(100),
            description: "Dinner".to_string(),
            total_amount: total,
            paid_by: user(1),
            split_type: "EXACT".to_string(),
            created_at: Utc::now(),
            shares: shares
                .iter()
                .map(|(id, amount, paid)| ShareView {
                    id: None,
                    user_id: user(*id),
                    amount: *amount,
                    paid: *paid,
                    user: None,
                })
                .collect(),
            payer: None,
            group: None,
        }
    }

    #[test]
    fn wire_amounts_become_minor_units() {
        let bill = bill_from_view(&view(90.0, &[(1, 30.0, true), (2, 60.0, false)])).unwrap();
        assert_eq!(bill.total, Money::new(9_000));
        assert_eq!(bill.split_type, SplitType::Exact);
        assert_eq!(bill.share_of(user(2)).unwrap().amount, Money::new(6_000));
        assert!(bill.validate_shares().is_ok());
    }

    #[test]
    fn non_finite_amount_is_rejected() {
        let err = bill_from_view(&view(f64::NAN, &[])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn group_roles_are_parsed() {
        let detail = GroupDetail {
            id: Uuid::from_u128(100),
            name: "Trip".to_string(),
            description: None,
            members: vec![
                MemberView {
                    id: Uuid::from_u128(500),
                    user: UserView {
                        id: user(1),
                        name: Some("Asha".to_string()),
                        email: None,
                    },
                    role: "ADMIN".to_string(),
                },
                MemberView {
                    id: Uuid::from_u128(501),
                    user: UserView {
                        id: user(2),
                        name: None,
                        email: None,
                    },
                    role: "MEMBER".to_string(),
                },
            ],
        };
        let group = group_from_view(&detail).unwrap();
        assert_eq!(group.membership_of(user(1)).unwrap().role, Role::Admin);
        assert_eq!(group.membership_of(user(2)).unwrap().id, Uuid::from_u128(501));
    }

    #[test]
    fn group_with_repeated_user_is_rejected() {
        let member = |id: u128| MemberView {
            id: Uuid::from_u128(id),
            user: UserView {
                id: user(1),
                name: None,
                email: None,
            },
            role: "MEMBER".to_string(),
        };
        let detail = GroupDetail {
            id: Uuid::from_u128(100),
            name: "Trip".to_string(),
            description: None,
            members: vec![member(500), member(501)],
        };
        assert!(matches!(
            group_from_view(&detail),
            Err(EngineError::InvalidGroup(_))
        ));
    }

    #[test]
    fn equal_requests_omit_amounts() {
        let shares = split(Money::new(10_000), &SplitRequest::equal(vec![user(1), user(2)])).unwrap();
        let request = bill_new(user(100), "Cab", Money::new(10_000), user(1), SplitType::Equal, &shares);
        assert_eq!(request.split_type, "EQUAL");
        assert_eq!(request.total_amount, 100.0);
        assert!(request.shares.iter().all(|share| share.amount.is_none()));

        let exact = split(
            Money::new(5_000),
            &SplitRequest::exact(vec![(user(1), Money::new(2_000)), (user(2), Money::new(3_000))]),
        )
        .unwrap();
        let request = bill_new(user(100), "Cab", Money::new(5_000), user(1), SplitType::Exact, &exact);
        assert_eq!(request.shares[1].amount, Some(30.0));
    }

    #[test]
    fn update_resends_current_shares_when_untouched() {
        let bill = bill_from_view(&view(90.0, &[(1, 30.0, true), (2, 60.0, false)])).unwrap();
        let edit = BillEdit {
            description: Some("Late dinner".to_string()),
            ..BillEdit::default()
        };
        let plan = plan_edit(&bill, &edit).unwrap();
        let update = bill_update(&bill, &plan);
        assert_eq!(update.description, "Late dinner");
        assert_eq!(update.shares.len(), 2);
        assert_eq!(update.shares[1].amount, Some(60.0));
    }
}
