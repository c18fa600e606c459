//! End-to-end scenarios S1-S6 from the policy specification, built directly
//! against the store APIs (no document parsing involved here; see
//! `policy-loader`'s integration tests for the document-driven versions).

use policy_core::connection::{ConnectionPolicy, Gid, Uid};
use policy_core::ownership::OwnershipPolicy;
use policy_core::priority::{encode, Context};
use policy_core::transmission::{MessageType, TransmissionPolicy, TransmissionRequest};
use policy_core::Decision;

#[test]
fn s1_and_s2_user_allow_overrides_default_deny() {
    let mut p = OwnershipPolicy::new();
    p.set_wildcard(true, encode(Context::Default, 0));
    p.add_name("com.x", false, encode(Context::User, 0));

    assert_eq!(p.check_allowed("com.x"), Decision::Allowed);
    assert_eq!(p.check_allowed("com.y"), Decision::Denied);
}

#[test]
fn s3_mandatory_deny_overrides_default_allow() {
    let mut p = TransmissionPolicy::new();
    p.add_entry(None, None, None, None, None, MessageType::Any, false, encode(Context::Default, 0));
    p.add_entry(None, Some("org.secret".into()), None, None, None, MessageType::Any, true, encode(Context::Mandatory, 0));

    let req = TransmissionRequest { interface: Some("org.secret"), member: Some("X"), ..Default::default() };
    assert_eq!(p.check_allowed(std::iter::empty(), req), Decision::Denied);
}

#[test]
fn s4_prefix_matches_children_only() {
    let mut p = OwnershipPolicy::new();
    p.add_prefix("com.x", true, encode(Context::Default, 0));

    assert_eq!(p.check_allowed("com.x.y"), Decision::Denied);
    assert_eq!(p.check_allowed("com.xy"), Decision::Allowed);
}

#[test]
fn s5_mandatory_deny_overrides_user_allow_wildcard() {
    let mut p = ConnectionPolicy::new();
    p.add_uid(Uid(1000), false, encode(Context::User, 0));
    p.set_uid_wildcard(true, encode(Context::Mandatory, 0));

    assert_eq!(p.check_allowed(Uid(1000), &[]), Decision::Denied);
}

#[test]
fn s6_same_priority_last_declared_wins() {
    let mut p = ConnectionPolicy::new();
    let pri = encode(Context::Default, 0);
    p.set_uid_wildcard(false, pri);
    p.set_uid_wildcard(true, pri);

    assert_eq!(p.check_allowed(Uid(1), &[]), Decision::Denied);
}

#[test]
fn context_precedence_holds_for_every_user() {
    for uid in [0u32, 1, 1000, 65534] {
        let mut p = ConnectionPolicy::new();
        p.set_uid_wildcard(false, encode(Context::Default, 0));
        p.add_uid(Uid(uid), false, encode(Context::User, 0));
        p.set_gid_wildcard(true, encode(Context::Mandatory, 0));

        assert_eq!(p.check_allowed(Uid(uid), &[]), Decision::Denied);
    }
}
