//! C4: transmission policy — may a given message flow between two peers?

use std::collections::BTreeMap;

use crate::decision::{Decision, PolicyDecision};

/// Message-type enumeration for transmission rules. `Any` (0) matches any
/// message type, including on the request side: a request with type `Any`
/// never fails an entry's type filter (an entry that names a specific type
/// still filters it out, since type matching is entry-driven, not
/// request-driven — see [`TransmissionPolicyEntry::matches`]).
///
/// Discriminant values resolve spec.md §9 Open Question #2 and follow the
/// conventional D-Bus wire message-type ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    /// Matches any message type. Never appears on an incoming request; only
    /// meaningful as a rule's declared type, where it means "no filter".
    #[default]
    Any = 0,
    /// A method call.
    MethodCall = 1,
    /// A method return.
    MethodReturn = 2,
    /// A signal.
    Signal = 3,
    /// An error reply.
    Error = 4,
}

/// Which side of a message this policy governs: the broker maintains one
/// [`TransmissionPolicy`] per direction, compiled from `send_*` and
/// `receive_*` rule attributes respectively (spec.md §9 Open Question #3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Rules compiled from `send_*` attributes; governs messages the peer
    /// sends.
    Send,
    /// Rules compiled from `receive_*` attributes; governs messages the
    /// peer receives.
    Receive,
}

/// A single transmission rule: optional match fields plus a decision.
/// Absent fields act as wildcards.
#[derive(Debug, Clone)]
pub struct TransmissionPolicyEntry {
    interface: Option<String>,
    member: Option<String>,
    error: Option<String>,
    path: Option<String>,
    msg_type: MessageType,
    decision: PolicyDecision,
}

/// A request to check against the transmission policy. All match fields are
/// optional on the request side as well: an absent field on the request can
/// still satisfy an entry whose corresponding field is also absent, but can
/// never satisfy an entry that names a specific value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransmissionRequest<'a> {
    /// Interface name of the message, if any.
    pub interface: Option<&'a str>,
    /// Member (method/signal) name of the message, if any.
    pub member: Option<&'a str>,
    /// Error name of the message, if any.
    pub error: Option<&'a str>,
    /// Object path of the message, if any.
    pub path: Option<&'a str>,
    /// Message type.
    pub msg_type: MessageType,
}

impl TransmissionPolicyEntry {
    fn matches(&self, req: &TransmissionRequest<'_>) -> bool {
        if let Some(iface) = &self.interface {
            if req.interface != Some(iface.as_str()) {
                return false;
            }
        }
        if let Some(member) = &self.member {
            if req.member != Some(member.as_str()) {
                return false;
            }
        }
        if let Some(error) = &self.error {
            if req.error != Some(error.as_str()) {
                return false;
            }
        }
        if let Some(path) = &self.path {
            if req.path != Some(path.as_str()) {
                return false;
            }
        }
        if !matches!(self.msg_type, MessageType::Any) && self.msg_type != req.msg_type {
            return false;
        }
        true
    }
}

/// Ordered, append-only list of entries keyed by owner name, plus a
/// wildcard list applying regardless of peer name. Governs one direction
/// (send or receive) of message transmission.
#[derive(Debug, Clone, Default)]
pub struct TransmissionPolicy {
    policy_by_name: BTreeMap<String, Vec<TransmissionPolicyEntry>>,
    wildcard_entries: Vec<TransmissionPolicyEntry>,
}

/// The synthetic bus name used for the driver (the broker itself) as the
/// subject of a transmission check when no peer subject is given.
pub const DRIVER_NAME: &str = "org.freedesktop.DBus";

impl TransmissionPolicy {
    /// Construct an empty, fully-allowing policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. If `name` is present, the entry is scoped to that
    /// owner name; otherwise it is appended to the wildcard list that
    /// applies regardless of peer name.
    #[allow(clippy::too_many_arguments)]
    pub fn add_entry(
        &mut self,
        name: Option<&str>,
        interface: Option<String>,
        member: Option<String>,
        error: Option<String>,
        path: Option<String>,
        msg_type: MessageType,
        deny: bool,
        priority: u64,
    ) {
        let entry = TransmissionPolicyEntry {
            interface,
            member,
            error,
            path,
            msg_type,
            decision: PolicyDecision::new(deny, priority),
        };
        match name {
            Some(name) => self.policy_by_name.entry(name.to_string()).or_default().push(entry),
            None => self.wildcard_entries.push(entry),
        }
    }

    fn merge_list(list: &[TransmissionPolicyEntry], req: &TransmissionRequest<'_>, decision: &mut PolicyDecision) {
        for entry in list {
            if entry.decision.priority < decision.priority {
                continue;
            }
            if entry.matches(req) {
                decision.merge(entry.decision);
            }
        }
    }

    /// Compute the decision for a message matching `req`, where `names` is
    /// the set of bus names relevant to the opposite peer: for a send
    /// check, the intended receiver's primary-owned names (or
    /// [`DRIVER_NAME`] if the receiver is the broker itself); for a receive
    /// check, the sender's.
    ///
    /// Algorithm (spec.md §4.4): start neutral, merge in every matching
    /// entry for each relevant name key, then merge in every matching
    /// wildcard entry. Entries whose priority is already below the running
    /// decision are skipped before the (more expensive) field match is even
    /// attempted.
    #[must_use]
    pub fn check_allowed<'a>(&self, names: impl IntoIterator<Item = &'a str>, req: TransmissionRequest<'_>) -> Decision {
        let mut decision = PolicyDecision::NEUTRAL;
        for name in names {
            if let Some(list) = self.policy_by_name.get(name) {
                Self::merge_list(list, &req, &mut decision);
            }
        }
        Self::merge_list(&self.wildcard_entries, &req, &mut decision);

        let outcome = decision.outcome();
        tracing::trace!(priority = decision.priority, denied = outcome.is_denied(), "transmission_check");
        outcome
    }
}
