//! Turns a decoded [`RawDocument`] into store mutations on a fresh
//! [`PolicySet`], assigning priorities along the way.

use policy_core::priority::{encode, Context};
use policy_core::transmission::MessageType;
use policy_core::{connection::Gid, connection::Uid, PolicySet};

use crate::raw::{RawContext, RawDocument, RawPolicy, RawRule, RawRuleAttributes};

/// A numeric id, or a name this crate declines to resolve (spec.md §1 scopes
/// credential acquisition out; resolving a `user="alice"`-style name to a
/// uid would need NSS lookups this crate has no grounds to perform).
enum Principal {
    Id(u32),
    Wildcard,
    UnresolvedName,
}

fn parse_principal(raw: &str) -> Principal {
    if raw == "*" {
        Principal::Wildcard
    } else if let Ok(id) = raw.parse::<u32>() {
        Principal::Id(id)
    } else {
        Principal::UnresolvedName
    }
}

fn parse_message_type(raw: &str) -> MessageType {
    match raw {
        "method_call" => MessageType::MethodCall,
        "method_return" => MessageType::MethodReturn,
        "signal" => MessageType::Signal,
        "error" => MessageType::Error,
        _ => MessageType::Any,
    }
}

/// The policy context a `<policy>` block resolves to, or `None` for a block
/// this crate can't place (ambiguous attribute combination, or a name it
/// can't resolve) — such a block is skipped with a `tracing::warn!`, never
/// silently half-applied.
enum ResolvedContext {
    Default,
    Mandatory,
    User(Uid),
    Group(Gid),
    /// `at_console`/`no_console`: recognized, parsed, intentionally inert —
    /// see DESIGN.md's Open Question resolutions for why there is no query
    /// hook to act on this.
    Console,
}

fn resolve_policy_context(filename: &str, policy: &RawPolicy) -> Option<ResolvedContext> {
    let present = [policy.context.is_some(), policy.user.is_some(), policy.group.is_some(), policy.at_console.is_some()]
        .iter()
        .filter(|p| **p)
        .count();

    if present != 1 {
        tracing::warn!(file = filename, present, "<policy> block must carry exactly one of context/user/group/at_console; skipped");
        return None;
    }

    if let Some(ctx) = policy.context {
        return Some(match ctx {
            RawContext::Default => ResolvedContext::Default,
            RawContext::Mandatory => ResolvedContext::Mandatory,
        });
    }
    if let Some(at_console) = policy.at_console {
        tracing::debug!(file = filename, at_console, "at_console policy parsed but inert: no query-time hook for console state");
        return Some(ResolvedContext::Console);
    }
    if let Some(user) = &policy.user {
        return match parse_principal(user) {
            Principal::Id(uid) => Some(ResolvedContext::User(Uid(uid))),
            Principal::Wildcard => Some(ResolvedContext::Default),
            Principal::UnresolvedName => {
                tracing::warn!(file = filename, user = %user, "policy user= names are not resolved; block skipped");
                None
            }
        };
    }
    if let Some(group) = &policy.group {
        return match parse_principal(group) {
            Principal::Id(gid) => Some(ResolvedContext::Group(Gid(gid))),
            Principal::Wildcard => Some(ResolvedContext::Default),
            Principal::UnresolvedName => {
                tracing::warn!(file = filename, group = %group, "policy group= names are not resolved; block skipped");
                None
            }
        };
    }
    unreachable!("exactly one of the four fields was confirmed present above")
}

/// Apply every `<policy>` block in `doc` to `set`, in document order, using
/// a single monotonically increasing counter across the whole document so
/// that within one context, later-declared rules win (spec.md §3).
pub(crate) fn apply_document(filename: &str, doc: &RawDocument, set: &mut PolicySet, counter: &mut u32) {
    for policy in &doc.policy {
        let Some(resolved) = resolve_policy_context(filename, policy) else { continue };
        let base_context = match resolved {
            ResolvedContext::Default => Context::Default,
            ResolvedContext::Mandatory => Context::Mandatory,
            ResolvedContext::User(_) => Context::User,
            ResolvedContext::Group(_) => Context::Group,
            ResolvedContext::Console => continue,
        };

        for rule in &policy.rules {
            let (deny, attrs) = match rule {
                RawRule::Allow(attrs) => (false, attrs),
                RawRule::Deny(attrs) => (true, attrs),
            };
            let priority = encode(base_context, *counter);
            *counter += 1;
            apply_rule(filename, &resolved, attrs, deny, priority, set);
        }
    }
}

fn apply_rule(filename: &str, ctx: &ResolvedContext, attrs: &RawRuleAttributes, deny: bool, priority: u64, set: &mut PolicySet) {
    let has_own = attrs.own.is_some() || attrs.own_prefix.is_some();
    let has_send = attrs.send_destination.is_some()
        || attrs.send_interface.is_some()
        || attrs.send_member.is_some()
        || attrs.send_error.is_some()
        || attrs.send_path.is_some()
        || attrs.send_type.is_some();
    let has_receive = attrs.receive_sender.is_some()
        || attrs.receive_interface.is_some()
        || attrs.receive_member.is_some()
        || attrs.receive_error.is_some()
        || attrs.receive_path.is_some()
        || attrs.receive_type.is_some();
    let has_connect = attrs.user.is_some() || attrs.group.is_some();

    if has_own {
        apply_own(attrs, deny, priority, set);
    }
    if has_send {
        apply_transmission(attrs, deny, priority, &mut set.transmission_send, true);
    }
    if has_receive {
        apply_transmission(attrs, deny, priority, &mut set.transmission_receive, false);
    }
    if has_connect {
        apply_connect(filename, attrs, deny, priority, set);
    }
    if !has_own && !has_send && !has_receive && !has_connect {
        apply_wildcard_rule(ctx, deny, priority, set);
    }
}

fn apply_own(attrs: &RawRuleAttributes, deny: bool, priority: u64, set: &mut PolicySet) {
    if let Some(name) = &attrs.own {
        if name == "*" {
            set.ownership.set_wildcard(deny, priority);
        } else {
            set.ownership.add_name(name, deny, priority);
        }
    }
    if let Some(prefix) = &attrs.own_prefix {
        set.ownership.add_prefix(prefix, deny, priority);
    }
}

fn apply_connect(filename: &str, attrs: &RawRuleAttributes, deny: bool, priority: u64, set: &mut PolicySet) {
    if let Some(user) = &attrs.user {
        match parse_principal(user) {
            Principal::Id(uid) => set.connection.add_uid(Uid(uid), deny, priority),
            Principal::Wildcard => set.connection.set_uid_wildcard(deny, priority),
            Principal::UnresolvedName => {
                tracing::warn!(file = filename, user = %user, "rule user= names are not resolved; rule skipped");
            }
        }
    }
    if let Some(group) = &attrs.group {
        match parse_principal(group) {
            Principal::Id(gid) => set.connection.add_gid(Gid(gid), deny, priority),
            Principal::Wildcard => set.connection.set_gid_wildcard(deny, priority),
            Principal::UnresolvedName => {
                tracing::warn!(file = filename, group = %group, "rule group= names are not resolved; rule skipped");
            }
        }
    }
}

fn apply_transmission(
    attrs: &RawRuleAttributes,
    deny: bool,
    priority: u64,
    policy: &mut policy_core::transmission::TransmissionPolicy,
    send: bool,
) {
    let (name, interface, member, error, path, msg_type) = if send {
        (&attrs.send_destination, &attrs.send_interface, &attrs.send_member, &attrs.send_error, &attrs.send_path, &attrs.send_type)
    } else {
        (
            &attrs.receive_sender,
            &attrs.receive_interface,
            &attrs.receive_member,
            &attrs.receive_error,
            &attrs.receive_path,
            &attrs.receive_type,
        )
    };
    let msg_type = msg_type.as_deref().map_or(MessageType::Any, parse_message_type);
    policy.add_entry(name.as_deref(), interface.clone(), member.clone(), error.clone(), path.clone(), msg_type, deny, priority);
}

/// An attribute-less `<allow/>`/`<deny/>` is a blanket statement scoped to
/// whatever the enclosing `<policy>` block targets: a specific uid/gid gets
/// a connection-store entry, while `default`/`mandatory` (which target every
/// peer) set the wildcard across every store — connection, ownership, and
/// both transmission directions — since there's no narrower dimension for a
/// context-wide blanket rule to apply to.
fn apply_wildcard_rule(ctx: &ResolvedContext, deny: bool, priority: u64, set: &mut PolicySet) {
    match ctx {
        ResolvedContext::User(uid) => set.connection.add_uid(*uid, deny, priority),
        ResolvedContext::Group(gid) => set.connection.add_gid(*gid, deny, priority),
        ResolvedContext::Default | ResolvedContext::Mandatory => {
            set.connection.set_uid_wildcard(deny, priority);
            set.connection.set_gid_wildcard(deny, priority);
            set.ownership.set_wildcard(deny, priority);
            set.transmission_send.add_entry(None, None, None, None, None, MessageType::Any, deny, priority);
            set.transmission_receive.add_entry(None, None, None, None, None, MessageType::Any, deny, priority);
        }
        ResolvedContext::Console => {}
    }
}
