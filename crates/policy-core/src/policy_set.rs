//! The frozen, per-bus bundle of policy stores, and the swap-on-reload
//! handle the broker holds onto across queries.

use std::sync::{Arc, RwLock};

use crate::connection::{ConnectionPolicy, Gid, Uid};
use crate::decision::Decision;
use crate::ownership::OwnershipPolicy;
use crate::transmission::{Direction, TransmissionPolicy, TransmissionRequest, DRIVER_NAME};

/// Read-only view onto the name registry: for a given peer, an iterator
/// over the bus names it currently *primary*-owns. Secondary (queued)
/// ownerships do not contribute to transmission checks (spec.md §6).
///
/// The broker implements this against its live name registry; tests and
/// simple callers can use the blanket impl for `[String]`/`Vec<String>`.
pub trait PrimaryOwnedNames {
    /// Bus names this peer currently holds as primary owner.
    fn primary_owned_names(&self) -> Box<dyn Iterator<Item = &str> + '_>;
}

impl PrimaryOwnedNames for Vec<String> {
    fn primary_owned_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(String::as_str))
    }
}

impl PrimaryOwnedNames for [String] {
    fn primary_owned_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.iter().map(String::as_str))
    }
}

/// A frozen snapshot of every policy store for one bus: connection,
/// ownership, and the two transmission directions. Built once by the
/// loader, then queried from any number of threads without synchronization
/// (spec.md §5 — queries are pure functions of the frozen set and the
/// request).
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    /// Connection admission policy.
    pub connection: ConnectionPolicy,
    /// Name ownership policy.
    pub ownership: OwnershipPolicy,
    /// Transmission policy for messages the peer sends.
    pub transmission_send: TransmissionPolicy,
    /// Transmission policy for messages the peer receives.
    pub transmission_receive: TransmissionPolicy,
}

impl PolicySet {
    /// Construct an empty, fully-allowing policy set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// May a peer identified by `uid`/`gids` connect to the bus?
    #[must_use]
    pub fn connection_check(&self, uid: Uid, gids: &[Gid]) -> Decision {
        self.connection.check_allowed(uid, gids)
    }

    /// May a peer acquire ownership of `name`?
    #[must_use]
    pub fn ownership_check(&self, name: &str) -> Decision {
        self.ownership.check_allowed(name)
    }

    /// May a message matching `req` flow, in `direction`, with `subject` as
    /// the peer opposite the one whose authorization is being decided (for
    /// a send check, the intended receiver; for a receive check, the
    /// sender)? `subject = None` denotes the broker itself, matched against
    /// the synthetic name [`DRIVER_NAME`].
    #[must_use]
    pub fn transmission_check(
        &self,
        subject: Option<&dyn PrimaryOwnedNames>,
        req: TransmissionRequest<'_>,
        direction: Direction,
    ) -> Decision {
        let policy = match direction {
            Direction::Send => &self.transmission_send,
            Direction::Receive => &self.transmission_receive,
        };
        match subject {
            Some(peer) => policy.check_allowed(peer.primary_owned_names(), req),
            None => policy.check_allowed(std::iter::once(DRIVER_NAME), req),
        }
    }
}

/// A shared, swappable handle to the currently-published [`PolicySet`] for
/// one bus. Reloads construct a fresh `PolicySet` and atomically swap the
/// `Arc` under a lock; readers that already hold a clone of the old `Arc`
/// keep using it until they drop it (spec.md §5: "epoch or reference-counted
/// handoff").
#[derive(Debug, Clone)]
pub struct PolicySetHandle {
    inner: Arc<RwLock<Arc<PolicySet>>>,
}

impl PolicySetHandle {
    /// Construct a handle wrapping an empty, fully-allowing policy set.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(Arc::new(PolicySet::new()))) }
    }

    /// Atomically publish `set` as the current policy set. Existing readers
    /// holding an `Arc` from [`Self::current`] are unaffected.
    pub fn publish(&self, set: PolicySet) {
        let mut guard = self.inner.write().expect("policy set lock poisoned");
        *guard = Arc::new(set);
    }

    /// Take a snapshot of the currently-published policy set.
    #[must_use]
    pub fn current(&self) -> Arc<PolicySet> {
        Arc::clone(&self.inner.read().expect("policy set lock poisoned"))
    }
}

impl Default for PolicySetHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_handle_allows_everything() {
        let h = PolicySetHandle::new();
        let snap = h.current();
        assert_eq!(snap.connection_check(Uid(1), &[]), Decision::Allowed);
        assert_eq!(snap.ownership_check("com.x"), Decision::Allowed);
        assert_eq!(
            snap.transmission_check(None, TransmissionRequest::default(), Direction::Send),
            Decision::Allowed
        );
    }

    #[test]
    fn publish_swaps_without_disturbing_prior_snapshot() {
        let h = PolicySetHandle::new();
        let old = h.current();

        let mut fresh = PolicySet::new();
        fresh.ownership.set_wildcard(true, 1);
        h.publish(fresh);

        assert_eq!(old.ownership_check("com.x"), Decision::Allowed);
        assert_eq!(h.current().ownership_check("com.x"), Decision::Denied);
    }

    #[test]
    fn driver_subject_uses_synthetic_name() {
        let mut set = PolicySet::new();
        set.transmission_receive.add_entry(Some(DRIVER_NAME), None, None, None, None, crate::transmission::MessageType::Any, true, 1);
        assert_eq!(
            set.transmission_check(None, TransmissionRequest::default(), Direction::Receive),
            Decision::Denied
        );
    }
}
