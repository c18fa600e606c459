//! A second, lightweight pass over the raw document that the `serde`-based
//! structural decode in [`crate::raw`] can't do on its own: rejecting
//! documents with unrecognized top-level elements, and logging (without
//! failing) rule attributes the crate doesn't understand. `serde`'s default
//! behavior is to silently ignore fields it doesn't know about, which is
//! exactly the forgiving half of spec.md §4.5 point 4 — but the strict half
//! needs an explicit check, and the "log what you ignored" half needs a
//! look at the actual attribute names as written, not just the ones our
//! struct happened to declare.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::raw::KNOWN_RULE_ATTRIBUTES;
use policy_core::PolicyError;

fn line_at(document: &str, byte_pos: usize) -> u64 {
    document.as_bytes()[..byte_pos.min(document.len())].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

fn local_name(e: &quick_xml::events::BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Walk the document as a flat stream of XML events, checking:
///
/// - the root element is `busconfig`;
/// - every direct child of `busconfig` is a `policy` element (anything else
///   is rejected — spec.md §4.5 point 4, "strict on unknown top-level
///   elements");
/// - every direct child of a `policy` element is `allow` or `deny` (logged
///   and skipped if not — these aren't "top-level" in the strict sense, but
///   they also aren't rule attributes, so neither handling rule applies
///   cleanly; tolerating them keeps the loader from breaking on documents
///   that embed forward-looking elements `policy-loader` doesn't know yet);
/// - every attribute on an `allow`/`deny` element is one this crate
///   recognizes (logged, never rejected — the permissive half of the same
///   spec point).
pub(crate) fn validate_structure(filename: &str, document: &str) -> Result<(), PolicyError> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().trim_text(true);

    let mut depth: u32 = 0;

    loop {
        let pos = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Eof) => return Ok(()),
            Ok(Event::Start(e)) => {
                depth += 1;
                check_open(filename, document, pos, depth, &e)?;
            }
            Ok(Event::Empty(e)) => {
                depth += 1;
                check_open(filename, document, pos, depth, &e)?;
                depth -= 1;
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
            }
            Ok(_) => {}
            Err(_) => {
                return Err(PolicyError::InvalidDocument { file: filename.to_string(), line: line_at(document, pos) });
            }
        }
    }
}

fn check_open(
    filename: &str,
    document: &str,
    pos: usize,
    depth: u32,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<(), PolicyError> {
    let name = local_name(e);
    match depth {
        1 => {
            if name != "busconfig" {
                return Err(PolicyError::InvalidDocument { file: filename.to_string(), line: line_at(document, pos) });
            }
        }
        2 => {
            if name != "policy" {
                return Err(PolicyError::InvalidDocument { file: filename.to_string(), line: line_at(document, pos) });
            }
        }
        3 => {
            if name == "allow" || name == "deny" {
                for attr in e.attributes().flatten() {
                    let attr_name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                    if !KNOWN_RULE_ATTRIBUTES.contains(&attr_name.as_str()) {
                        tracing::warn!(file = filename, line = line_at(document, pos), attribute = %attr_name, "unrecognized rule attribute ignored");
                    }
                }
            } else {
                tracing::warn!(file = filename, line = line_at(document, pos), element = %name, "unrecognized element inside <policy> ignored");
            }
        }
        _ => {}
    }
    Ok(())
}
