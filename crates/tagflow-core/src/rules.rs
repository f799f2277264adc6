//! Derivation rules resolved from configuration.
//!
//! The config file expresses each derivable field as a `{var}` template
//! string. Resolution happens once, right after the config merge:
//! [`TagRules::from_config`] and [`NotifyRules::from_config`] capture
//! the user's templates and supply the built-in fallback for every leaf
//! the user omitted. The orchestrator only ever talks to the resolved
//! rules, one method per field.
//!
//! # Variables
//!
//! Templates support `{var}` interpolation for:
//! `{branch}`, `{username}`, `{version}`, `{env}`, `{order}`, `{tag}`,
//! `{prev_version}`, `{prev_env}`, `{prev_order}`, `{prev_tag}`.
//!
//! Derivation templates (`version`, `env`, `order`, `tag_name`,
//! `first_tag`) run before the new fields exist, so only the branch,
//! username, and `prev_*` variables carry values there. The message,
//! version-file, and notify templates run against the fully populated
//! context.

use crate::config::{NotifyConfig, TagConfig, VersionFileName};
use crate::context::Context;

/// Default commit and tag message template.
const DEFAULT_MESSAGE: &str = "chore: release {tag}";

/// Default version-marker file name.
const DEFAULT_VERSION_FILE: &str = "VERSION";

/// Replace `{var}` placeholders with values from the context.
///
/// Unknown placeholders pass through untouched.
pub fn interpolate(template: &str, ctx: &Context) -> String {
    template
        .replace("{branch}", &ctx.branch)
        .replace("{username}", &ctx.username)
        .replace("{version}", &ctx.version)
        .replace("{env}", &ctx.env)
        .replace("{order}", &ctx.order)
        .replace("{tag}", &ctx.tag)
        .replace("{prev_version}", &ctx.previous_version)
        .replace("{prev_env}", &ctx.previous_env)
        .replace("{prev_order}", &ctx.previous_order)
        .replace("{prev_tag}", &ctx.previous_tag)
}

/// Resolved tag derivation rules: user templates with per-leaf defaults.
#[derive(Debug, Clone, Default)]
pub struct TagRules {
    version: Option<String>,
    env: Option<String>,
    order: Option<String>,
    tag_name: Option<String>,
    message: Option<String>,
    version_file: Option<VersionFileName>,
    first_tag: Option<String>,
    allow_branches: Option<Vec<String>>,
}

impl TagRules {
    /// Resolve rules from the merged `[tag]` section.
    pub fn from_config(cfg: &TagConfig) -> Self {
        Self {
            version: cfg.version.clone(),
            env: cfg.env.clone(),
            order: cfg.order.clone(),
            tag_name: cfg.tag_name.clone(),
            message: cfg.message.clone(),
            version_file: cfg.version_file.clone(),
            first_tag: cfg.first_tag.clone(),
            allow_branches: cfg.allow_branches.clone(),
        }
    }

    /// The new `{version}` field. Default: the previous version, unchanged.
    pub fn version(&self, ctx: &Context) -> String {
        self.version.as_deref().map_or_else(
            || ctx.previous_version.clone(),
            |template| interpolate(template, ctx),
        )
    }

    /// The new `{env}` field. Default: the previous env, unchanged.
    pub fn env(&self, ctx: &Context) -> String {
        self.env.as_deref().map_or_else(
            || ctx.previous_env.clone(),
            |template| interpolate(template, ctx),
        )
    }

    /// The new `{order}` field.
    ///
    /// Default: the previous order parsed as an integer, plus one. An
    /// empty or non-numeric previous order counts as zero so the first
    /// derived order after a degraded parse is still deterministic.
    pub fn order(&self, ctx: &Context) -> String {
        self.order.as_deref().map_or_else(
            || {
                let previous = ctx.previous_order.parse::<i64>().unwrap_or(0);
                (previous + 1).to_string()
            },
            |template| interpolate(template, ctx),
        )
    }

    /// The full tag name override, when configured.
    pub fn tag_name(&self, ctx: &Context) -> Option<String> {
        self.tag_name
            .as_deref()
            .map(|template| interpolate(template, ctx))
    }

    /// The commit and tag message.
    pub fn message(&self, ctx: &Context) -> String {
        let template = self.message.as_deref().unwrap_or(DEFAULT_MESSAGE);
        interpolate(template, ctx)
    }

    /// The version-marker file name, or `None` when the update is disabled.
    pub fn version_file(&self, ctx: &Context) -> Option<String> {
        match &self.version_file {
            Some(VersionFileName::Enabled(false)) => None,
            Some(VersionFileName::Name(template)) => Some(interpolate(template, ctx)),
            Some(VersionFileName::Enabled(true)) | None => Some(DEFAULT_VERSION_FILE.to_string()),
        }
    }

    /// The first tag name, when a first-tag rule is configured.
    pub fn first_tag(&self, ctx: &Context) -> Option<String> {
        self.first_tag
            .as_deref()
            .map(|template| interpolate(template, ctx))
    }

    /// Whether the given branch may run the tag workflow.
    ///
    /// No allow-list means every branch is allowed.
    pub fn branch_allowed(&self, branch: &str) -> bool {
        self.allow_branches
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|b| b == branch))
    }
}

/// Resolved notification rules.
#[derive(Debug, Clone, Default)]
pub struct NotifyRules {
    webhook_url: Option<String>,
    content: Option<String>,
    allow_branches: Option<Vec<String>>,
}

impl NotifyRules {
    /// Resolve rules from the merged `[notify]` section.
    pub fn from_config(cfg: &NotifyConfig) -> Self {
        Self {
            webhook_url: cfg.webhook_url.clone(),
            content: cfg.content.clone(),
            allow_branches: cfg.allow_branches.clone(),
        }
    }

    /// The webhook URL, when configured.
    pub fn webhook_url(&self, ctx: &Context) -> Option<String> {
        self.webhook_url
            .as_deref()
            .map(|template| interpolate(template, ctx))
    }

    /// The markdown message body, when configured.
    pub fn content(&self, ctx: &Context) -> Option<String> {
        self.content
            .as_deref()
            .map(|template| interpolate(template, ctx))
    }

    /// Whether the given branch may trigger the notification.
    pub fn branch_allowed(&self, branch: &str) -> bool {
        self.allow_branches
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|b| b == branch))
    }
}
