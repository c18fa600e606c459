//! Scenarios S1-S6 from the policy specification, driven through real XML
//! documents this time (compare `policy-core`'s `tests/scenarios.rs`, which
//! exercises the same scenarios directly against the store APIs).

use policy_core::connection::Uid;
use policy_core::Decision;
use policy_loader::load_str;
use policy_core::PolicySetHandle;

#[test]
fn s1_and_s2_user_allow_overrides_default_deny() {
    let handle = PolicySetHandle::new();
    let doc = r#"
        <busconfig>
            <policy context="default"><deny own="*"/></policy>
            <policy user="1000"><allow own="com.x"/></policy>
        </busconfig>
    "#;
    load_str(&handle, "s1.conf", doc).unwrap();
    let set = handle.current();
    assert_eq!(set.ownership_check("com.x"), Decision::Allowed);
    assert_eq!(set.ownership_check("com.y"), Decision::Denied);
}

#[test]
fn s3_mandatory_deny_overrides_default_allow() {
    use policy_core::transmission::{MessageType, TransmissionRequest, Direction};
    let handle = PolicySetHandle::new();
    let doc = r#"
        <busconfig>
            <policy context="default"><allow send_interface="*"/></policy>
            <policy context="mandatory"><deny send_interface="org.secret"/></policy>
        </busconfig>
    "#;
    load_str(&handle, "s3.conf", doc).unwrap();
    let set = handle.current();
    let req = TransmissionRequest { interface: Some("org.secret"), member: Some("X"), msg_type: MessageType::MethodCall, ..Default::default() };
    assert_eq!(set.transmission_check(None, req, Direction::Send), Decision::Denied);
}

#[test]
fn s4_prefix_matches_children_only() {
    let handle = PolicySetHandle::new();
    let doc = r#"<busconfig><policy context="default"><deny own_prefix="com.x"/></policy></busconfig>"#;
    load_str(&handle, "s4.conf", doc).unwrap();
    let set = handle.current();
    assert_eq!(set.ownership_check("com.x.y"), Decision::Denied);
    assert_eq!(set.ownership_check("com.xy"), Decision::Allowed);
}

#[test]
fn s5_mandatory_deny_overrides_user_allow_wildcard() {
    let handle = PolicySetHandle::new();
    let doc = r#"
        <busconfig>
            <policy user="1000"><allow/></policy>
            <policy context="mandatory"><deny/></policy>
        </busconfig>
    "#;
    load_str(&handle, "s5.conf", doc).unwrap();
    assert_eq!(handle.current().connection_check(Uid(1000), &[]), Decision::Denied);
}

#[test]
fn s6_same_priority_last_declared_wins() {
    let handle = PolicySetHandle::new();
    let doc = r#"
        <busconfig>
            <policy context="default"><allow own="*"/><deny own="*"/></policy>
        </busconfig>
    "#;
    load_str(&handle, "s6.conf", doc).unwrap();
    assert_eq!(handle.current().ownership_check("com.anything"), Decision::Denied);
}

#[test]
fn group_rule_is_merged_alongside_uid_rule() {
    use policy_core::connection::Gid;
    let handle = PolicySetHandle::new();
    let doc = r#"
        <busconfig>
            <policy context="default"><allow/></policy>
            <policy group="200"><deny/></policy>
        </busconfig>
    "#;
    load_str(&handle, "group.conf", doc).unwrap();
    let set = handle.current();
    assert_eq!(set.connection_check(Uid(1), &[Gid(200)]), Decision::Denied);
    assert_eq!(set.connection_check(Uid(1), &[Gid(999)]), Decision::Allowed);
}
