//! D-Bus-style policy decision core.
//!
//! This crate answers the three authorization questions a message-bus
//! broker asks at runtime:
//!
//! 1. May a connecting client (uid + gids) be admitted to the bus?
//!    See [`connection`].
//! 2. May a client acquire ownership of a bus name? See [`ownership`].
//! 3. May a message flow from a sender to a receiver? See [`transmission`].
//!
//! Decision taxonomy:
//! - [`Decision::Allowed`] — proceed.
//! - [`Decision::Denied`] — block.
//!
//! Precedence is governed entirely by [`PolicyDecision::merge`]: a decision
//! declared at a higher [`priority::Context`] always supersedes one at a
//! lower context, and within a context the last-declared rule wins. Every
//! query entry point on [`PolicySet`] is a pure function of the frozen
//! policy set and the request — no I/O, no allocation, no failure mode
//! other than returning [`Decision::Denied`].
//!
//! This crate does not parse policy documents; see the sibling
//! `policy-loader` crate for that. It does not do IPC transport, name
//! registry bookkeeping, or credential acquisition — those are the
//! surrounding broker's job.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod connection;
pub mod decision;
pub mod error;
pub mod ownership;
pub mod policy_set;
pub mod priority;
pub mod transmission;

pub use connection::{ConnectionPolicy, Gid, Uid};
pub use decision::{Decision, PolicyDecision};
pub use error::PolicyError;
pub use ownership::OwnershipPolicy;
pub use policy_set::{PolicySet, PolicySetHandle, PrimaryOwnedNames};
pub use priority::Context;
pub use transmission::{Direction, MessageType, TransmissionPolicy, TransmissionPolicyEntry, TransmissionRequest, DRIVER_NAME};
