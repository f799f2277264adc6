//! The per-run context record.
//!
//! A [`Context`] is assembled once per run and is read-only afterwards:
//! repository facts first (branch, user, previous tag), then the fields
//! derived for the new tag. Every derivation rule reads from it and the
//! later side-effecting steps only consume it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rules::TagRules;
use crate::tag;

/// Errors from tag derivation.
#[derive(Error, Debug)]
pub enum DeriveError {
    /// A derived tag name failed the grammar. Refusing to push a
    /// malformed tag keeps the repository parseable for the next run.
    #[error("derived tag name {0:?} does not match the {{version}}-{{env}}-{{order}} format")]
    InvalidTagName(String),
}

/// Result alias for derivation.
pub type DeriveResult<T> = Result<T, DeriveError>;

/// The immutable record of repository facts and derived fields.
///
/// All fields are plain strings; absent values are empty strings, which
/// keeps the record trivially serializable for the debug preview dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Current git branch.
    pub branch: String,
    /// Current git user name (`"unknown"` when git has none).
    pub username: String,
    /// The previous tag name, empty when the repository has no tags.
    pub previous_tag: String,
    /// `{version}` field of the previous tag.
    pub previous_version: String,
    /// `{env}` field of the previous tag.
    pub previous_env: String,
    /// `{order}` field of the previous tag.
    pub previous_order: String,
    /// The newly derived `{version}` field.
    pub version: String,
    /// The newly derived `{env}` field.
    pub env: String,
    /// The newly derived `{order}` field.
    pub order: String,
    /// The newly derived tag name.
    pub tag: String,
}

impl Context {
    /// Build the base context from repository facts.
    ///
    /// All derived fields start empty.
    pub fn base(branch: String, username: String, previous_tag: String) -> Self {
        Self {
            branch,
            username,
            previous_tag,
            ..Self::default()
        }
    }
}

/// Derive the context for a repository with no previous tag.
///
/// `first_tag` is the name produced by the configured first-tag rule;
/// it must satisfy the grammar so its fields can be parsed back.
pub fn derive_first(first_tag: &str, base: Context) -> DeriveResult<Context> {
    debug!(tag = %first_tag, "first tag");
    let parts = tag::parse(first_tag)
        .ok_or_else(|| DeriveError::InvalidTagName(first_tag.to_string()))?;
    Ok(Context {
        version: parts.version,
        env: parts.env,
        order: parts.order,
        tag: first_tag.to_string(),
        ..base
    })
}

/// Derive the context for a repository that already has a tag.
///
/// The previous tag is parsed leniently into the `previous_*` fields
/// first. An explicit tag-name rule then wins over piecewise
/// derivation; otherwise the version, env, and order rules each run
/// against the same input context and the results are joined. Either
/// way the composed name must satisfy the grammar.
pub fn derive_next(rules: &TagRules, base: Context) -> DeriveResult<Context> {
    let parts = tag::parse_lenient(&base.previous_tag);
    let ctx = Context {
        previous_version: parts.version,
        previous_env: parts.env,
        previous_order: parts.order,
        ..base
    };

    if let Some(name) = rules.tag_name(&ctx) {
        debug!(tag = %name, "tag name from override rule");
        let parts = tag::parse(&name).ok_or(DeriveError::InvalidTagName(name.clone()))?;
        return Ok(Context {
            version: parts.version,
            env: parts.env,
            order: parts.order,
            tag: name,
            ..ctx
        });
    }

    let version = rules.version(&ctx);
    let env = rules.env(&ctx);
    let order = rules.order(&ctx);
    let name = tag::format(&version, &env, &order);
    debug!(%version, %env, %order, tag = %name, "tag name from piecewise rules");
    if tag::parse(&name).is_none() {
        return Err(DeriveError::InvalidTagName(name));
    }
    Ok(Context {
        version,
        env,
        order,
        tag: name,
        ..ctx
    })
}
