use chrono::Utc;
use uuid::Uuid;

use engine::{
    Bill, BillPosition, EngineError, Money, SettlementStatus, SplitRequest, SplitType,
    bill_balance, global_balance, group_balance, split,
};

fn user(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn bill_from_split(id: u128, group: Uuid, total: Money, payer: Uuid, request: &SplitRequest) -> Bill {
    let mut shares = split(total, request).unwrap();
    for share in &mut shares {
        share.id = Some(Uuid::new_v4());
        share.paid = share.user_id == payer;
    }
    Bill {
        id: Uuid::from_u128(id),
        group_id: group,
        description: format!("bill {id}"),
        total,
        paid_by: payer,
        split_type: request.split_type,
        created_at: Utc::now(),
        shares,
    }
}

#[test]
fn equal_split_round_trips_into_payer_balance() {
    let group = user(100);
    for (total, participants) in [(10_000, 3), (9_000, 3), (1_001, 4), (7, 5), (123_457, 7)] {
        let members: Vec<Uuid> = (1..=participants).map(user).collect();
        let payer = members[participants as usize - 1];
        let bill = bill_from_split(
            1,
            group,
            Money::new(total),
            payer,
            &SplitRequest::equal(members.clone()),
        );

        let payer_share = bill.share_of(payer).unwrap().amount;
        let balance = bill_balance(&bill, payer);
        assert_eq!(
            balance.position.lent(),
            Money::new(total) - payer_share,
            "total={total} participants={participants}"
        );
        assert_eq!(global_balance([&bill], payer).owed, Money::new(total) - payer_share);
    }
}

#[test]
fn every_debtor_owes_their_allocated_share() {
    let group = user(100);
    let members: Vec<Uuid> = (1..=3).map(user).collect();
    let bill = bill_from_split(
        1,
        group,
        Money::new(10_000),
        members[0],
        &SplitRequest::equal(members.clone()),
    );

    assert_eq!(bill_balance(&bill, members[0]).position, BillPosition::Lent(Money::new(6666)));
    for debtor in &members[1..] {
        let balance = bill_balance(&bill, *debtor);
        assert_eq!(balance.position, BillPosition::Owe(Money::new(3333)));
        assert_eq!(balance.status, Some(SettlementStatus::Pending));
    }

    let owed_by_others: Money = members[1..]
        .iter()
        .map(|debtor| global_balance([&bill], *debtor).owe)
        .sum();
    assert_eq!(owed_by_others, global_balance([&bill], members[0]).owed);
}

#[test]
fn exact_split_flows_into_group_totals() {
    let trip = user(100);
    let flat = user(200);
    let viewer = user(1);

    let dinner = bill_from_split(
        1,
        trip,
        Money::new(9_000),
        viewer,
        &SplitRequest::exact(vec![
            (viewer, Money::new(3_000)),
            (user(2), Money::new(3_000)),
            (user(3), Money::new(3_000)),
        ]),
    );
    let rent = bill_from_split(
        2,
        flat,
        Money::new(50_000),
        user(2),
        &SplitRequest::exact(vec![(user(2), Money::new(25_000)), (viewer, Money::new(25_000))]),
    );
    let bills = vec![dinner, rent];

    let trip_summary = group_balance(&bills, trip, viewer);
    assert_eq!(trip_summary.owed, Money::new(6_000));
    assert_eq!(trip_summary.owe, Money::ZERO);

    let everything = global_balance(&bills, viewer);
    assert_eq!(everything.owed, Money::new(6_000));
    assert_eq!(everything.owe, Money::new(25_000));
    assert_eq!(everything.net(), Money::new(-19_000));
}

#[test]
fn form_rejections_never_reach_a_bill() {
    let members = vec![user(1), user(2)];
    assert_eq!(
        split(Money::new(5_000), &SplitRequest::equal(Vec::new())),
        Err(EngineError::EmptyParticipants)
    );

    let mut request = SplitRequest::equal(members);
    request.split_type = SplitType::Exact;
    request.exact_amounts.insert(user(1), Money::new(2_000));
    request.exact_amounts.insert(user(2), Money::new(2_000));
    assert_eq!(
        split(Money::new(5_000), &request),
        Err(EngineError::AmountMismatch {
            matched: Money::new(4_000),
            total: Money::new(5_000),
            remaining: Money::new(1_000),
        })
    );

    assert!(matches!(
        "abc".parse::<Money>(),
        Err(EngineError::InvalidAmount(_))
    ));
}
