//! The release tag grammar.
//!
//! Tags have the shape `{version}-{env}-{order}`: three fields joined by
//! `-`, each field one or more word characters or dots (e.g.
//! `1.2.0-prod-4`). Parsing comes in two flavors:
//!
//! - [`parse`] is strict and rejects anything that doesn't match.
//! - [`parse_lenient`] never fails: an empty input means "no previous
//!   tag" and yields empty parts silently; a malformed input (perhaps a
//!   tag created by another tool) yields empty parts with a warning.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The three parsed fields of a release tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagParts {
    /// The `{version}` field (e.g., `"1.2.0"`).
    pub version: String,
    /// The `{env}` field (e.g., `"prod"`).
    pub env: String,
    /// The `{order}` field (e.g., `"4"`).
    pub order: String,
}

/// Parse a tag name strictly.
///
/// Returns `None` unless splitting on `-` yields exactly three
/// non-empty fields, each matching `[\w.]+`.
pub fn parse(tag_name: &str) -> Option<TagParts> {
    let mut fields = tag_name.split('-');
    let version = fields.next()?;
    let env = fields.next()?;
    let order = fields.next()?;
    if fields.next().is_some() {
        return None;
    }
    if ![version, env, order].iter().all(|f| is_field(f)) {
        return None;
    }
    Some(TagParts {
        version: version.to_string(),
        env: env.to_string(),
        order: order.to_string(),
    })
}

/// Parse a tag name, degrading to empty fields instead of failing.
///
/// An empty input represents "no previous tag" and parses silently.
/// A non-empty input that fails the grammar logs a warning — previous
/// tags may predate this tool or follow another convention — and also
/// yields empty fields so the run can continue.
pub fn parse_lenient(tag_name: &str) -> TagParts {
    if tag_name.is_empty() {
        return TagParts::default();
    }
    parse(tag_name).unwrap_or_else(|| {
        warn!(
            tag = %tag_name,
            "tag does not match the {{version}}-{{env}}-{{order}} format; treating as unparseable"
        );
        TagParts::default()
    })
}

/// Join three fields into a tag name.
///
/// No validation happens here; callers that need a well-formed tag
/// re-parse the result with [`parse`].
pub fn format(version: &str, env: &str, order: &str) -> String {
    format!("{version}-{env}-{order}")
}

/// A tag field is one or more ASCII word characters or dots.
fn is_field(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
