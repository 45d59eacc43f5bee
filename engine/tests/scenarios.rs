mod common;

use common::*;
use fast_engine::msgs::*;
use fast_engine::{FastError, FastEvent, Msg};
use fast_types::{Amount, PubKey};

#[test]
fn register_add_and_top_up() {
    let mut h = Harness::with_client();
    h.add_user("alice", 0);
    h.top_up("alice", 100);

    let client = h.client();
    assert_eq!(client.balance, Amount::new(100));
    assert_eq!(client.used_credits, Amount::ZERO);
    assert_eq!(h.user_credits("alice"), Amount::new(100));
    assert_eq!(h.bank.escrow_balance(), Amount::new(100));
}

#[test]
fn usage_without_proxies() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);
    h.add_user("bob", 100);

    h.exec(submit(vec![
        user_report("alice", 50, vec![]),
        user_report("bob", 30, vec![]),
    ]))
    .unwrap();

    let client = h.client();
    assert_eq!(client.used_credits, Amount::new(80));
    assert_eq!(client.balance, Amount::new(200));
    assert_eq!(h.user_credits("alice"), Amount::new(50));
    assert_eq!(h.user_credits("bob"), Amount::new(70));
}

#[test]
fn registered_proxy_is_paid() {
    let mut h = Harness::with_client();
    h.add_user("alice", 1_000);
    let payout = addr(0x50);
    h.proxies
        .register(PubKey::new(vec![0x03; 33]), payout.to_string(), Amount::new(10));

    let executed = h
        .exec(submit(vec![user_report(
            "alice",
            1_000,
            vec![proxy_report(&[0x03; 33], 5, 10)],
        )]))
        .unwrap();

    assert_eq!(h.account_balance(payout), Amount::new(50));
    let client = h.client();
    assert_eq!(client.balance, Amount::new(950));
    assert_eq!(client.used_credits, Amount::new(950));
    assert_eq!(h.user_credits("alice"), Amount::ZERO);
    assert_eq!(h.bank.escrow_balance(), Amount::new(950));
    assert!(executed.events.iter().any(|e| matches!(
        e,
        FastEvent::DataProxyPayout { amount, payout_address, .. }
            if *amount == Amount::new(50) && *payout_address == payout
    )));
}

#[test]
fn unregistered_proxy_is_skipped() {
    let mut h = Harness::with_client();
    h.add_user("alice", 1_000);

    let executed = h
        .exec(submit(vec![user_report(
            "alice",
            1_000,
            vec![proxy_report(&[0x03; 33], 5, 10)],
        )]))
        .unwrap();

    let client = h.client();
    assert_eq!(client.balance, Amount::new(1_000));
    assert_eq!(client.used_credits, Amount::new(1_000));
    assert_eq!(h.bank.escrow_balance(), Amount::new(1_000));
    assert!(executed
        .events
        .iter()
        .any(|e| matches!(e, FastEvent::UnregisteredDataProxy { .. })));
    assert!(!executed
        .events
        .iter()
        .any(|e| matches!(e, FastEvent::DataProxyPayout { .. })));
}

#[test]
fn settle_more_than_used_fails_cleanly() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);
    h.exec(submit(vec![user_report("alice", 40, vec![])])).unwrap();
    let before_client = h.client();
    let before_store = h.store.clone();

    let err = h.exec(settle(41, SettleType::Burn)).unwrap_err();
    assert!(matches!(err, FastError::InsufficientCredits(_)));
    assert_eq!(h.client(), before_client);
    assert_eq!(h.store, before_store);
    assert!(h.bank.burned(DENOM).is_zero());
}

#[test]
fn skipped_proxy_charges_may_exceed_usage() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);

    // Owed 50 to an unregistered proxy against only 10 credits used.
    let executed = h
        .exec(submit(vec![user_report("alice", 10, vec![proxy_report(&[0x09], 5, 10)])]))
        .unwrap();

    assert!(executed.events.iter().any(|e| matches!(
        e,
        FastEvent::UnregisteredDataProxy { data_proxy_pubkey } if data_proxy_pubkey.as_bytes() == [0x09]
    )));
    let client = h.client();
    assert_eq!(client.balance, Amount::new(100));
    assert_eq!(client.used_credits, Amount::new(10));
    assert_eq!(h.user_credits("alice"), Amount::new(90));
}

#[test]
fn paid_charges_are_bounded_by_batch_usage() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);
    h.add_user("bob", 100);
    h.proxies
        .register(PubKey::new(vec![0x07]), addr(0x62).to_string(), Amount::new(1));

    // Alice's charges exceed her own usage but the batch total covers them.
    h.exec(submit(vec![
        user_report("alice", 10, vec![proxy_report(&[0x07], 3, 10)]),
        user_report("bob", 40, vec![]),
    ]))
    .unwrap();
    let client = h.client();
    assert_eq!(client.balance, Amount::new(170));
    assert_eq!(client.used_credits, Amount::new(20));
    assert_eq!(h.account_balance(addr(0x62)), Amount::new(30));

    let before = h.store.clone();
    let err = h
        .exec(submit(vec![user_report("alice", 10, vec![proxy_report(&[0x07], 2, 6)])]))
        .unwrap_err();
    assert!(matches!(err, FastError::InvalidRequest(_)));
    assert_eq!(h.store, before);
    assert_eq!(h.account_balance(addr(0x62)), Amount::new(30));
}

#[test]
fn invalid_payout_address_is_skipped() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);
    h.proxies
        .register(PubKey::new(vec![7]), "not-an-address", Amount::new(1));

    let executed = h
        .exec(submit(vec![user_report("alice", 60, vec![proxy_report(&[7], 4, 5)])]))
        .unwrap();

    assert!(executed.events.iter().any(|e| matches!(
        e,
        FastEvent::InvalidDataProxyPayoutAddress { payout_address, amount, .. }
            if payout_address == "not-an-address" && *amount == Amount::new(20)
    )));
    assert_eq!(h.client().used_credits, Amount::new(60));
    assert_eq!(h.client().balance, Amount::new(100));
}

#[test]
fn proxies_paid_in_raw_key_order_across_users() {
    let mut h = Harness::with_client();
    h.add_user("alice", 500);
    h.add_user("bob", 500);
    let keys: [&[u8]; 3] = [&[0x03], &[0x02, 0x01], &[0x02]];
    for (i, key) in keys.iter().enumerate() {
        h.proxies
            .register(PubKey::new(key.to_vec()), addr(0x60 + i as u8).to_string(), Amount::new(1));
    }

    let executed = h
        .exec(submit(vec![
            user_report("bob", 100, vec![proxy_report(&[0x03], 1, 10), proxy_report(&[0x02], 1, 1)]),
            user_report("alice", 100, vec![proxy_report(&[0x02, 0x01], 2, 3), proxy_report(&[0x03], 1, 10)]),
        ]))
        .unwrap();

    let payouts: Vec<(Vec<u8>, Amount)> = executed
        .events
        .iter()
        .filter_map(|e| match e {
            FastEvent::DataProxyPayout { data_proxy_pubkey, amount, .. } => {
                Some((data_proxy_pubkey.as_bytes().to_vec(), *amount))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        payouts,
        vec![
            (vec![0x02], Amount::new(1)),
            (vec![0x02, 0x01], Amount::new(6)),
            (vec![0x03], Amount::new(20)),
        ]
    );
    let client = h.client();
    assert_eq!(client.balance, Amount::new(1_000 - 27));
    assert_eq!(client.used_credits, Amount::new(200 - 27));
}

#[test]
fn submit_reports_event_sequence() {
    let mut h = Harness::with_client();
    h.add_user("alice", 10);
    let executed = h.exec(submit(vec![user_report("alice", 10, vec![])])).unwrap();
    let kinds: Vec<&str> = executed.events.iter().map(FastEvent::kind).collect();
    assert_eq!(
        kinds,
        vec!["use_user_credits", "fast_user", "submit_reports", "fast_client"]
    );
}

#[test]
fn submit_reports_rejections() {
    let mut h = Harness::with_client();
    h.add_user("alice", 10);

    let mut msg = submit(vec![user_report("alice", 5, vec![])]);
    if let Msg::SubmitReports(m) = &mut msg {
        m.address = admin();
    }
    assert!(matches!(h.exec(msg), Err(FastError::Unauthorized(_))));

    let mut msg = submit(vec![user_report("alice", 5, vec![])]);
    if let Msg::SubmitReports(m) = &mut msg {
        m.fast_client_public_key = PubKey::new(vec![0x09]);
    }
    assert!(matches!(h.exec(msg), Err(FastError::NotFound(_))));

    assert!(matches!(
        h.exec(submit(vec![user_report("ghost", 1, vec![])])),
        Err(FastError::NotFound(_))
    ));
    assert!(matches!(
        h.exec(submit(vec![user_report("alice", 11, vec![])])),
        Err(FastError::InsufficientCredits(_))
    ));
    h.proxies
        .register(PubKey::new(vec![1]), addr(0x61).to_string(), Amount::new(3));
    assert!(matches!(
        h.exec(submit(vec![user_report("alice", 5, vec![proxy_report(&[1], 2, 3)])])),
        Err(FastError::InvalidRequest(_))
    ));
    assert!(h.account_balance(addr(0x61)).is_zero());
    assert!(matches!(
        h.exec(submit(vec![user_report("alice", 1, vec![]), user_report("alice", 1, vec![])])),
        Err(FastError::InvalidRequest(_))
    ));
    assert_eq!(h.user_credits("alice"), Amount::new(10));
}

#[test]
fn submit_reports_respects_batch_limit() {
    let mut h = Harness::with_client();
    h.add_user("a", 10);
    h.add_user("b", 10);
    h.exec(Msg::UpdateParams(MsgUpdateParams {
        authority: authority(),
        params: fast_types::Params {
            max_reports_per_submission: 1,
            ..Default::default()
        },
    }))
    .unwrap();

    let err = h
        .exec(submit(vec![user_report("a", 1, vec![]), user_report("b", 1, vec![])]))
        .unwrap_err();
    assert!(matches!(err, FastError::InvalidRequest(_)));
    h.exec(submit(vec![user_report("a", 1, vec![])])).unwrap();
}

#[test]
fn failure_midway_reverts_earlier_user_deductions() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);
    h.add_user("bob", 5);
    let before = h.store.clone();

    let err = h
        .exec(submit(vec![
            user_report("alice", 50, vec![]),
            user_report("bob", 6, vec![]),
        ]))
        .unwrap_err();
    assert!(matches!(err, FastError::InsufficientCredits(_)));
    assert_eq!(h.store, before);
    assert_eq!(h.user_credits("alice"), Amount::new(100));
}

#[test]
fn settle_burn_and_withdraw() {
    let mut h = Harness::with_client();
    h.add_user("alice", 100);
    h.exec(submit(vec![user_report("alice", 80, vec![])])).unwrap();
    let admin_before = h.account_balance(admin());

    h.exec(settle(30, SettleType::Burn)).unwrap();
    assert_eq!(h.bank.burned(DENOM), Amount::new(30));
    h.exec(settle(50, SettleType::Withdraw)).unwrap();
    assert_eq!(h.account_balance(admin()), admin_before.checked_add(Amount::new(50)).unwrap());

    let client = h.client();
    assert_eq!(client.used_credits, Amount::ZERO);
    assert_eq!(client.balance, Amount::new(20));
    assert_eq!(h.bank.escrow_balance(), Amount::new(20));
}

#[test]
fn settle_requires_admin() {
    let mut h = Harness::with_client();
    let mut msg = settle(0, SettleType::Burn);
    if let Msg::SettleCredits(m) = &mut msg {
        m.admin_address = owner();
    }
    assert!(matches!(h.exec(msg), Err(FastError::Unauthorized(_))));
}

#[test]
fn failed_calls_emit_no_events_and_move_no_tokens() {
    let mut h = Harness::with_client();
    let poor = addr(0x77);
    let escrow_before = h.bank.escrow_balance();
    let result = h.exec(Msg::AddUser(MsgAddUser {
        admin_address: admin(),
        fast_client_public_key: client_key(),
        user_id: "alice".into(),
        initial_credits: Amount::new(10_000_000),
    }));
    assert!(matches!(result, Err(FastError::Bank(_))));
    assert_eq!(h.bank.escrow_balance(), escrow_before);
    assert!(h
        .keeper
        .query_fast_client_user(&h.store, &client_key(), "alice")
        .is_err());

    h.add_user("alice", 0);
    let result = h.exec(Msg::TopUpUser(MsgTopUpUser {
        sender: poor,
        fast_client_public_key: client_key(),
        user_id: "alice".into(),
        amount: Amount::new(1),
    }));
    assert!(matches!(result, Err(FastError::Bank(_))));
    assert_eq!(h.user_credits("alice"), Amount::ZERO);
    assert_eq!(h.client().balance, Amount::ZERO);
}
