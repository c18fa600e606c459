//! C2: connection policy — may a given peer (uid + gids) connect to the bus?

use std::collections::BTreeMap;

use crate::decision::{Decision, PolicyDecision};

/// A numeric user id, as seen by the broker's credential layer. An opaque
/// newtype rather than a bare `u32` so that uid/gid cannot be confused at
/// call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub u32);

/// A numeric group id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gid(pub u32);

/// Maps uid/gid (plus wildcards) to a decision. Answers "may this peer
/// connect?". An empty, freshly constructed policy allows every peer.
#[derive(Debug, Clone, Default)]
pub struct ConnectionPolicy {
    uids: BTreeMap<Uid, PolicyDecision>,
    gids: BTreeMap<Gid, PolicyDecision>,
    uid_wildcard: PolicyDecision,
    gid_wildcard: PolicyDecision,
}

impl ConnectionPolicy {
    /// Construct an empty policy. Empty means fully-allowing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the entry for `uid`. If an entry already exists,
    /// the higher-priority decision is retained; ties keep the newer one.
    pub fn add_uid(&mut self, uid: Uid, deny: bool, priority: u64) {
        self.uids.entry(uid).or_insert(PolicyDecision::NEUTRAL).merge(PolicyDecision::new(deny, priority));
    }

    /// Insert or update the entry for `gid`, same duplicate-handling rule
    /// as [`Self::add_uid`].
    pub fn add_gid(&mut self, gid: Gid, deny: bool, priority: u64) {
        self.gids.entry(gid).or_insert(PolicyDecision::NEUTRAL).merge(PolicyDecision::new(deny, priority));
    }

    /// Set the decision that applies to every uid, subject to the same
    /// priority rule as specific entries.
    pub fn set_uid_wildcard(&mut self, deny: bool, priority: u64) {
        self.uid_wildcard.merge(PolicyDecision::new(deny, priority));
    }

    /// Set the decision that applies to every gid.
    pub fn set_gid_wildcard(&mut self, deny: bool, priority: u64) {
        self.gid_wildcard.merge(PolicyDecision::new(deny, priority));
    }

    /// Compute the decision for a peer identified by `uid` and its
    /// supplementary group list `gids`.
    ///
    /// Algorithm (spec.md §4.2): start from the higher-priority of the two
    /// wildcards, merge in the uid-specific entry if present, then merge in
    /// every gid-specific entry for the peer's supplementary groups. This
    /// fixes the upstream C source's `// XXX: check the groups too` gap —
    /// the original only ever consulted the uid tree and the wildcards.
    #[must_use]
    pub fn check_allowed(&self, uid: Uid, gids: &[Gid]) -> Decision {
        let mut decision = PolicyDecision::NEUTRAL;
        decision.merge(self.uid_wildcard);
        decision.merge(self.gid_wildcard);
        decision.merge_opt(self.uids.get(&uid).copied());
        for gid in gids {
            decision.merge_opt(self.gids.get(gid).copied());
        }
        let outcome = decision.outcome();
        tracing::trace!(uid = uid.0, n_gids = gids.len(), priority = decision.priority, denied = outcome.is_denied(), "connection_check");
        outcome
    }
}
