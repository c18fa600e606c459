//! Parses dbus-daemon-style policy documents (nested `<policy>` contexts of
//! `<allow>`/`<deny>` rules) into a [`policy_core::PolicySet`], and publishes
//! the result through a [`policy_core::PolicySetHandle`].
//!
//! This crate owns document parsing and priority assignment; it has no
//! opinion on what a request looks like or how a decision is reached once
//! the stores are built — that is entirely `policy-core`'s job, and this
//! crate depends on it rather than the other way around (so `load_file`
//! lives here, as a free function taking a handle, rather than on the
//! handle type itself).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod raw;
mod resolve;

use std::path::{Path, PathBuf};
use std::time::Instant;

use policy_core::{PolicyError, PolicySet, PolicySetHandle};

/// Conventional D-Bus system-bus policy search roots. Exposed as plain data
/// — this crate never reads the filesystem on its own initiative; callers
/// decide which of these (if any) to pass to [`load_file`].
#[derive(Debug, Clone)]
pub struct Defaults;

impl Defaults {
    /// The conventional system-bus configuration directory.
    #[must_use]
    pub fn system_config_dir() -> PathBuf {
        PathBuf::from("/etc/dbus-1/system.d")
    }

    /// The conventional session-bus configuration directory.
    #[must_use]
    pub fn session_config_dir() -> PathBuf {
        PathBuf::from("/etc/dbus-1/session.d")
    }
}

/// Parse `document` and publish the resulting policy set to `handle`.
///
/// `filename` is used only for diagnostics (error messages, log events); it
/// need not correspond to a real path. On a parse failure, `handle` is left
/// unmodified — the previously published set (if any) stays live (spec.md
/// §7: a failed reload discards partial state rather than publishing it).
pub fn load_str(handle: &PolicySetHandle, filename: &str, document: &str) -> Result<(), PolicyError> {
    let start = Instant::now();
    let (set, rule_count) = build_policy_set(filename, document)?;
    handle.publish(set);
    tracing::debug!(file = filename, rule_count, elapsed_us = start.elapsed().as_micros() as u64, "policy document loaded");
    Ok(())
}

/// Read and parse the file at `path`, then publish it to `handle`. A
/// missing file is not an error — it is treated as an empty (fully
/// allowing) document, per spec.md §4.5 point 5, and `handle` is still
/// published with an empty [`PolicySet`] in that case.
pub fn load_file(handle: &PolicySetHandle, path: impl AsRef<Path>) -> Result<(), PolicyError> {
    let path = path.as_ref();
    let filename = path.to_string_lossy().into_owned();
    match std::fs::read_to_string(path) {
        Ok(document) => load_str(handle, &filename, &document),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(file = %filename, "policy file missing, treating as empty document");
            handle.publish(PolicySet::new());
            Ok(())
        }
        Err(err) => Err(PolicyError::IoError(err)),
    }
}

fn build_policy_set(filename: &str, document: &str) -> Result<(PolicySet, u32), PolicyError> {
    audit::validate_structure(filename, document)?;

    let raw: raw::RawDocument = quick_xml::de::from_str(document)
        .map_err(|_| PolicyError::InvalidDocument { file: filename.to_string(), line: 0 })?;

    let mut set = PolicySet::new();
    let mut counter = 0u32;
    resolve::apply_document(filename, &raw, &mut set, &mut counter);
    Ok((set, counter))
}
