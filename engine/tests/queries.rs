mod common;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::*;
use fast_engine::query::{eligibility_hash, PageRequest};
use fast_engine::FastError;
use fast_types::{Amount, PubKey};
use k256::ecdsa::SigningKey;

fn signing_key() -> SigningKey {
    SigningKey::from_slice(&[0x17; 32]).unwrap()
}

fn compressed(key: &SigningKey) -> PubKey {
    PubKey::new(key.verifying_key().to_encoded_point(true).as_bytes().to_vec())
}

fn payload(key: &SigningKey, height: u64, user_id: &str, chain_id: &str, v_offset: u8) -> String {
    let hash = eligibility_hash(height, user_id, chain_id);
    let (sig, recid) = key.sign_prehash_recoverable(&hash).unwrap();
    let mut bytes = sig.to_bytes().to_vec();
    bytes.push(recid.to_byte() + v_offset);
    BASE64.encode(format!("{height}:{user_id}:{}", hex::encode(bytes)))
}

fn harness_with_signing_client() -> (Harness, SigningKey) {
    let key = signing_key();
    let mut h = Harness::new();
    h.exec(register_msg(compressed(&key))).unwrap();
    (h, key)
}

#[test]
fn eligibility_for_registered_user() {
    let (mut h, key) = harness_with_signing_client();
    h.exec(fast_engine::Msg::AddUser(fast_engine::msgs::MsgAddUser {
        admin_address: admin(),
        fast_client_public_key: compressed(&key),
        user_id: "alice".into(),
        initial_credits: Amount::new(42),
    }))
    .unwrap();

    let response = h
        .keeper
        .query_fast_client_eligibility(&h.store, &payload(&key, 7, "alice", CHAIN_ID, 0), 99)
        .unwrap();
    assert!(response.eligible);
    assert_eq!(response.user_credits, Amount::new(42));
    assert_eq!(response.block_height, 99);

    // Legacy 27/28 recovery bytes are not accepted.
    assert!(matches!(
        h.keeper
            .query_fast_client_eligibility(&h.store, &payload(&key, 7, "alice", CHAIN_ID, 27), 99),
        Err(FastError::InvalidRequest(_))
    ));
}

#[test]
fn eligibility_unknown_user_or_client() {
    let (h, key) = harness_with_signing_client();
    assert!(matches!(
        h.keeper
            .query_fast_client_eligibility(&h.store, &payload(&key, 1, "nobody", CHAIN_ID, 0), 1),
        Err(FastError::NotFound(_))
    ));

    let stranger = SigningKey::from_slice(&[0x18; 32]).unwrap();
    assert!(matches!(
        h.keeper
            .query_fast_client_eligibility(&h.store, &payload(&stranger, 1, "alice", CHAIN_ID, 0), 1),
        Err(FastError::NotFound(_))
    ));
}

#[test]
fn eligibility_wrong_chain_recovers_a_different_key() {
    let (mut h, key) = harness_with_signing_client();
    h.exec(fast_engine::Msg::AddUser(fast_engine::msgs::MsgAddUser {
        admin_address: admin(),
        fast_client_public_key: compressed(&key),
        user_id: "alice".into(),
        initial_credits: Amount::ZERO,
    }))
    .unwrap();
    let result = h.keeper.query_fast_client_eligibility(
        &h.store,
        &payload(&key, 1, "alice", "other-chain", 0),
        1,
    );
    assert!(result.is_err());
}

#[test]
fn eligibility_malformed_payloads() {
    let (h, _) = harness_with_signing_client();
    let bad = [
        "%%%".to_string(),
        BASE64.encode("1:alice"),
        BASE64.encode("x:alice:00"),
        BASE64.encode("1:alice:zz"),
        BASE64.encode(format!("1:alice:{}", "00".repeat(64))),
        BASE64.encode("1:a:l:ice:00"),
    ];
    for payload in bad {
        assert!(
            matches!(
                h.keeper.query_fast_client_eligibility(&h.store, &payload, 1),
                Err(FastError::InvalidRequest(_))
            ),
            "payload {payload} should be rejected"
        );
    }
}

#[test]
fn users_paginate_in_id_order() {
    let mut h = Harness::with_client();
    for user in ["dave", "alice", "carol", "bob", "erin"] {
        h.add_user(user, 1);
    }
    h.exec(register_msg(PubKey::new(vec![0x09]))).unwrap();

    let first = h
        .keeper
        .query_fast_client_users(
            &h.store,
            &client_key(),
            &PageRequest {
                key: None,
                limit: 2,
                count_total: true,
            },
        )
        .unwrap();
    let ids: Vec<&str> = first.users.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, vec!["alice", "bob"]);
    assert_eq!(first.pagination.total, Some(5));
    assert_eq!(first.pagination.next_key.as_deref(), Some("bob"));

    let second = h
        .keeper
        .query_fast_client_users(
            &h.store,
            &client_key(),
            &PageRequest {
                key: first.pagination.next_key.clone(),
                limit: 3,
                count_total: false,
            },
        )
        .unwrap();
    let ids: Vec<&str> = second.users.iter().map(|u| u.user_id.as_str()).collect();
    assert_eq!(ids, vec!["carol", "dave", "erin"]);
    assert_eq!(second.pagination.next_key, None);
    assert_eq!(second.pagination.total, None);

    let other = h
        .keeper
        .query_fast_client_users(&h.store, &PubKey::new(vec![0x09]), &PageRequest::default())
        .unwrap();
    assert!(other.users.is_empty());
}

#[test]
fn single_lookups() {
    let h = Harness::with_client();
    assert_eq!(h.client().id, 0);
    assert!(matches!(
        h.keeper.query_fast_client(&h.store, &PubKey::new(vec![1])),
        Err(FastError::NotFound(_))
    ));
    assert!(matches!(
        h.keeper.query_fast_client_user(&h.store, &client_key(), "nobody"),
        Err(FastError::NotFound(_))
    ));
    assert!(matches!(
        h.keeper.query_fast_client_transfer(&h.store, &client_key()),
        Err(FastError::NotFound(_))
    ));
}
