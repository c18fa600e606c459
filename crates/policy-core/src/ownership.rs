//! C3: ownership policy — may a given peer acquire a given bus name?

use std::collections::BTreeMap;

use crate::decision::{Decision, PolicyDecision};

/// Maps bus names (exact and dotted-prefix, plus a wildcard) to a decision.
/// Answers "may this peer own this name?". An empty policy allows every
/// name.
#[derive(Debug, Clone, Default)]
pub struct OwnershipPolicy {
    names: BTreeMap<String, PolicyDecision>,
    prefixes: BTreeMap<String, PolicyDecision>,
    wildcard: PolicyDecision,
}

impl OwnershipPolicy {
    /// Construct an empty, fully-allowing policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update the entry for the exact name `name`. Duplicate
    /// insertion keeps the higher-priority decision; ties keep the newer.
    pub fn add_name(&mut self, name: impl Into<String>, deny: bool, priority: u64) {
        self.names
            .entry(name.into())
            .or_insert(PolicyDecision::NEUTRAL)
            .merge(PolicyDecision::new(deny, priority));
    }

    /// Insert or update the entry for the dotted prefix `prefix`. A prefix
    /// `a.b` matches names `a.b`, `a.b.c`, `a.b.c.d`, but never `a.bc`.
    pub fn add_prefix(&mut self, prefix: impl Into<String>, deny: bool, priority: u64) {
        self.prefixes
            .entry(prefix.into())
            .or_insert(PolicyDecision::NEUTRAL)
            .merge(PolicyDecision::new(deny, priority));
    }

    /// Set the decision that applies to every name.
    pub fn set_wildcard(&mut self, deny: bool, priority: u64) {
        self.wildcard.merge(PolicyDecision::new(deny, priority));
    }

    /// Compute the decision for acquiring ownership of `name`.
    ///
    /// Algorithm (spec.md §4.3): start from the wildcard, merge in the exact
    /// match, then merge in every dotted prefix of `name` (including `name`
    /// itself as its own prefix), enumerated left to right at each `.`
    /// boundary. Lookups use borrowed slices of `name`, never allocating a
    /// substring.
    #[must_use]
    pub fn check_allowed(&self, name: &str) -> Decision {
        let mut decision = self.wildcard;
        decision.merge_opt(self.names.get(name).copied());

        if !self.prefixes.is_empty() {
            for candidate in prefixes_of(name) {
                decision.merge_opt(self.prefixes.get(candidate).copied());
            }
        }

        let outcome = decision.outcome();
        tracing::trace!(name, priority = decision.priority, denied = outcome.is_denied(), "ownership_check");
        outcome
    }
}

/// Yield every dotted prefix of `name`, including `name` itself, left to
/// right: for `"a.b.c"` this yields `"a"`, `"a.b"`, `"a.b.c"`. At most
/// `D + 1` items are yielded, where `D` is the number of dots in `name`.
fn prefixes_of(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('.').map(|(i, _)| &name[..i]).chain(std::iter::once(name))
}
