//! Proptest-driven checks of the quantified invariants from spec.md §8.

use policy_core::connection::{ConnectionPolicy, Gid, Uid};
use policy_core::ownership::OwnershipPolicy;
use policy_core::transmission::{MessageType, TransmissionPolicy, TransmissionRequest};
use policy_core::{Decision, PolicyDecision};
use proptest::prelude::*;

fn decision_strategy() -> impl Strategy<Value = (bool, u64)> {
    (any::<bool>(), 0u64..1000)
}

proptest! {
    /// Invariant 1: priority monotonicity. Merging decisions in any order
    /// yields the decision with the maximum priority, tie-broken by the
    /// decision merged in last.
    #[test]
    fn priority_monotonicity(candidates in prop::collection::vec(decision_strategy(), 0..20)) {
        let mut running = PolicyDecision::NEUTRAL;
        let mut best = PolicyDecision::NEUTRAL;
        for (deny, priority) in &candidates {
            let candidate = PolicyDecision::new(*deny, *priority);
            running.merge(candidate);
            if candidate.priority >= best.priority {
                best = candidate;
            }
        }
        prop_assert_eq!(running.deny, best.deny);
        prop_assert_eq!(running.priority, best.priority);
    }

    /// Invariant 2: an empty store of any kind allows.
    #[test]
    fn empty_connection_policy_allows(uid in any::<u32>(), gids in prop::collection::vec(any::<u32>(), 0..5)) {
        let p = ConnectionPolicy::new();
        let gids: Vec<Gid> = gids.into_iter().map(Gid).collect();
        prop_assert_eq!(p.check_allowed(Uid(uid), &gids), Decision::Allowed);
    }

    #[test]
    fn empty_ownership_policy_allows(name in "[a-z]{1,5}(\\.[a-z]{1,5}){0,4}") {
        let p = OwnershipPolicy::new();
        prop_assert_eq!(p.check_allowed(&name), Decision::Allowed);
    }

    #[test]
    fn empty_transmission_policy_allows(iface in "[a-z.]{0,10}") {
        let p = TransmissionPolicy::new();
        let req = TransmissionRequest { interface: Some(&iface), ..Default::default() };
        prop_assert_eq!(p.check_allowed(std::iter::empty(), req), Decision::Allowed);
    }

    /// Invariant 3: prefix correctness.
    #[test]
    fn prefix_correctness(prefix in "[a-z]{1,4}(\\.[a-z]{1,4}){0,3}", suffix in "[a-z]{0,4}") {
        let mut p = OwnershipPolicy::new();
        p.add_prefix(&prefix, true, 1);

        let exact = prefix.clone();
        prop_assert_eq!(p.check_allowed(&exact), Decision::Denied);

        let child = format!("{prefix}.{suffix}");
        prop_assert_eq!(p.check_allowed(&child), Decision::Denied);

        if !suffix.is_empty() {
            let not_a_child = format!("{prefix}{suffix}");
            prop_assert_eq!(p.check_allowed(&not_a_child), Decision::Allowed);
        }
    }

    /// Invariant 4: wildcard field neutrality. An entry with field `f`
    /// absent matches any request value in `f`.
    #[test]
    fn wildcard_field_neutrality(a in "[a-z]{1,6}", b in "[a-z]{1,6}") {
        let mut p = TransmissionPolicy::new();
        p.add_entry(None, None, None, None, None, MessageType::Any, true, 1);

        let ra = TransmissionRequest { interface: Some(&a), ..Default::default() };
        let rb = TransmissionRequest { interface: Some(&b), ..Default::default() };
        prop_assert_eq!(p.check_allowed(std::iter::empty(), ra), p.check_allowed(std::iter::empty(), rb));
    }

    /// Invariant 6: determinism. The same policy and query yield the same
    /// decision every time.
    #[test]
    fn determinism(uid in any::<u32>(), gids in prop::collection::vec(any::<u32>(), 0..5)) {
        let mut p = ConnectionPolicy::new();
        p.set_uid_wildcard(true, 1);
        p.add_uid(Uid(uid), false, 2);
        let gids: Vec<Gid> = gids.into_iter().map(Gid).collect();

        let first = p.check_allowed(Uid(uid), &gids);
        for _ in 0..10 {
            prop_assert_eq!(p.check_allowed(Uid(uid), &gids), first);
        }
    }
}
