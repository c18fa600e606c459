//! Intermediate `serde` shapes mirroring the policy document's XML grammar.
//! These are deliberately structure-preserving and almost-lossless; the
//! actual rule-attribute dispatch and validation lives in [`crate::resolve`].

use serde::Deserialize;

/// The root `<busconfig>` element, reduced to the one child this crate
/// understands: `<policy>`. Any other `busconfig` children (`<listen>`,
/// `<user>`, `<limit>`, ...) belong to the surrounding broker's own
/// configuration surface, not to policy decisions, and are rejected by
/// [`crate::audit::validate_structure`] rather than silently accepted here.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(rename = "policy", default)]
    pub(crate) policy: Vec<RawPolicy>,
}

/// One `<policy>` block: a context selector plus a flat, ordered list of
/// `<allow>`/`<deny>` rules.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPolicy {
    #[serde(rename = "@context")]
    pub(crate) context: Option<RawContext>,
    #[serde(rename = "@user")]
    pub(crate) user: Option<String>,
    #[serde(rename = "@group")]
    pub(crate) group: Option<String>,
    #[serde(rename = "@at_console")]
    pub(crate) at_console: Option<bool>,
    #[serde(rename = "$value", default)]
    pub(crate) rules: Vec<RawRule>,
}

/// `context="default"` / `context="mandatory"`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RawContext {
    Default,
    Mandatory,
}

/// An `<allow>` or `<deny>` element, tagged by its element name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RawRule {
    Allow(RawRuleAttributes),
    Deny(RawRuleAttributes),
}

/// Every rule attribute this crate recognizes. A rule carries a subset of
/// these; which subset determines which policy store it targets (spec.md
/// §4.5's attribute-to-store table). Attributes present in a document but
/// absent here are silently dropped by `serde` (no `deny_unknown_fields`) —
/// [`crate::audit::validate_structure`] performs a separate pass purely to
/// log them, so "forgiving" doesn't mean "silent".
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRuleAttributes {
    #[serde(rename = "@own")]
    pub(crate) own: Option<String>,
    #[serde(rename = "@own_prefix")]
    pub(crate) own_prefix: Option<String>,
    #[serde(rename = "@user")]
    pub(crate) user: Option<String>,
    #[serde(rename = "@group")]
    pub(crate) group: Option<String>,
    #[serde(rename = "@send_destination")]
    pub(crate) send_destination: Option<String>,
    #[serde(rename = "@send_interface")]
    pub(crate) send_interface: Option<String>,
    #[serde(rename = "@send_member")]
    pub(crate) send_member: Option<String>,
    #[serde(rename = "@send_error")]
    pub(crate) send_error: Option<String>,
    #[serde(rename = "@send_path")]
    pub(crate) send_path: Option<String>,
    #[serde(rename = "@send_type")]
    pub(crate) send_type: Option<String>,
    #[serde(rename = "@receive_sender")]
    pub(crate) receive_sender: Option<String>,
    #[serde(rename = "@receive_interface")]
    pub(crate) receive_interface: Option<String>,
    #[serde(rename = "@receive_member")]
    pub(crate) receive_member: Option<String>,
    #[serde(rename = "@receive_error")]
    pub(crate) receive_error: Option<String>,
    #[serde(rename = "@receive_path")]
    pub(crate) receive_path: Option<String>,
    #[serde(rename = "@receive_type")]
    pub(crate) receive_type: Option<String>,
}

/// Attribute names this crate recognizes on an `<allow>`/`<deny>` element,
/// used only by the auditing pass to flag the rest as unrecognized.
pub(crate) const KNOWN_RULE_ATTRIBUTES: &[&str] = &[
    "own",
    "own_prefix",
    "user",
    "group",
    "send_destination",
    "send_interface",
    "send_member",
    "send_error",
    "send_path",
    "send_type",
    "receive_sender",
    "receive_interface",
    "receive_member",
    "receive_error",
    "receive_path",
    "receive_type",
];
