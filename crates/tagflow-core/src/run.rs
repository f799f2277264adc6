//! Run orchestrator — the full tag workflow.
//!
//! Wires branch gating, tag derivation, the version-file update, tag
//! creation/push, and webhook notification into a single linear
//! pipeline. Every step is attempted exactly once, in order, and each
//! early state is a possible exit:
//!
//! 1. No `[tag]` section → no-op.
//! 2. Branch outside `tag.allow_branches` → no-op.
//! 3. Build the context (first-tag or subsequent-tag derivation).
//! 4. Debug mode → log every derived value and stop. This is the single
//!    authoritative short-circuit: no git mutation, file write, or
//!    network call happens past this point in debug mode.
//! 5. Version-file update + commit + push (non-fatal on failure: the
//!    tag is still worth pushing even when the marker commit failed).
//! 6. Tag creation and push (fatal on failure: a half-pushed tag must
//!    be visible to the operator).
//! 7. Notification (best-effort, gated by `notify.allow_branches` and
//!    the `--silence` flag).

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::context::{self, Context, DeriveError};
use crate::git::{GitError, Repository};
use crate::notify::{self, Notifier, NotifyStatus};
use crate::rules::{NotifyRules, TagRules};
use crate::version_file::VersionStore;

/// Errors that end a run with a failing exit.
#[derive(Error, Debug)]
pub enum RunError {
    /// Tag derivation produced an invalid name.
    #[error(transparent)]
    Derive(#[from] DeriveError),

    /// A git operation the run cannot proceed without failed.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Result alias for the run orchestrator.
pub type RunResult<T> = Result<T, RunError>;

/// Process-wide run options, set once at start and read-only afterward.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip the notification step.
    pub silence: bool,
    /// Compute and log every derived value without performing any side effect.
    pub debug: bool,
}

/// Why a run ended early without deriving or pushing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    /// The merged configuration has no `[tag]` section.
    TagConfigMissing,
    /// The current branch is not in `tag.allow_branches`.
    BranchNotAllowed {
        /// The current branch.
        branch: String,
    },
    /// The repository has no tags and no `first_tag` rule is configured.
    FirstTagRuleMissing,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TagConfigMissing => {
                write!(f, "no [tag] section configured; nothing to do")
            }
            Self::BranchNotAllowed { branch } => {
                write!(f, "branch {branch} is not in the tag allow-list; nothing to do")
            }
            Self::FirstTagRuleMissing => {
                write!(f, "repository has no tags and no first_tag rule is configured; nothing to do")
            }
        }
    }
}

/// Outcome of the version-file step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum VersionFileStatus {
    /// The step was disabled by `version_file = false`.
    Skipped {
        /// Why the step was skipped.
        reason: String,
    },
    /// The file was written and the change committed and pushed.
    Updated {
        /// The resolved file path.
        path: String,
    },
    /// The write or the commit/push failed (non-fatal).
    Failed {
        /// Error details.
        message: String,
    },
}

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RunOutcome {
    /// The run ended before deriving a tag.
    Skipped {
        /// Why nothing happened.
        reason: SkipReason,
    },
    /// Debug mode: every derived value computed, zero side effects.
    DebugPreview {
        /// The fully populated context.
        context: Context,
        /// The resolved version-file name (None when disabled).
        version_file: Option<String>,
        /// The resolved commit/tag message.
        message: String,
    },
    /// A tag was created and pushed.
    Tagged {
        /// The fully populated context.
        context: Context,
        /// What happened to the version file.
        version_file: VersionFileStatus,
        /// What happened to the notification.
        notify: NotifyStatus,
    },
}

/// The tag workflow, parameterized over its side-effect collaborators.
pub struct Workflow<'a> {
    repo: &'a dyn Repository,
    store: &'a dyn VersionStore,
    notifier: &'a dyn Notifier,
}

impl<'a> Workflow<'a> {
    /// Create a workflow over the given collaborators.
    pub const fn new(
        repo: &'a dyn Repository,
        store: &'a dyn VersionStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            repo,
            store,
            notifier,
        }
    }

    /// Execute one run.
    #[instrument(skip_all, fields(debug = options.debug, silence = options.silence))]
    pub fn run(&self, config: &Config, options: &RunOptions) -> RunResult<RunOutcome> {
        let Some(tag_cfg) = &config.tag else {
            warn!("no [tag] section configured; nothing to do");
            return Ok(RunOutcome::Skipped {
                reason: SkipReason::TagConfigMissing,
            });
        };
        let rules = TagRules::from_config(tag_cfg);

        let branch = self.repo.current_branch()?.trim().to_string();
        if !rules.branch_allowed(&branch) {
            warn!(%branch, "branch not in tag allow-list; nothing to do");
            return Ok(RunOutcome::Skipped {
                reason: SkipReason::BranchNotAllowed { branch },
            });
        }

        // The user name is cosmetic (notification text); failure to
        // read it must not fail the run.
        let username = self
            .repo
            .current_user()
            .map(|u| u.trim().to_string())
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        let previous_tag = self.repo.latest_tag()?.trim().to_string();

        let base = Context::base(branch, username, previous_tag);
        let ctx = if base.previous_tag.is_empty() {
            let Some(first) = rules.first_tag(&base) else {
                warn!("repository has no tags and no first_tag rule; nothing to do");
                return Ok(RunOutcome::Skipped {
                    reason: SkipReason::FirstTagRuleMissing,
                });
            };
            context::derive_first(&first, base)?
        } else {
            context::derive_next(&rules, base)?
        };

        let version_file = rules.version_file(&ctx);
        let message = rules.message(&ctx);
        info!(
            tag = %ctx.tag,
            version = %ctx.version,
            env = %ctx.env,
            order = %ctx.order,
            "derived tag"
        );

        if options.debug {
            info!(
                version_file = version_file.as_deref().unwrap_or("(disabled)"),
                %message,
                context = %serde_json::to_string(&ctx).unwrap_or_default(),
                "debug mode: stopping before side effects"
            );
            return Ok(RunOutcome::DebugPreview {
                context: ctx,
                version_file,
                message,
            });
        }

        let version_file_status = match version_file {
            None => {
                debug!("version-file update disabled");
                VersionFileStatus::Skipped {
                    reason: "disabled by version_file = false".to_string(),
                }
            }
            Some(name) => self.update_version_file(&name, &ctx, &message),
        };

        // Refresh remote state before tagging (non-fatal if it fails).
        if let Err(e) = self.repo.pull_all() {
            warn!(error = %e, "pull before tagging failed; continuing");
        }
        self.repo.create_tag(&ctx.tag, &message)?;
        self.repo.push_tag(&ctx.tag)?;
        info!(tag = %ctx.tag, "tag pushed");

        let notify_status = match (&config.notify, options.silence) {
            (Some(notify_cfg), false) => {
                notify::send(&NotifyRules::from_config(notify_cfg), &ctx, self.notifier)
            }
            (Some(_), true) => {
                debug!("notification silenced");
                NotifyStatus::Skipped {
                    reason: "silenced".to_string(),
                }
            }
            (None, _) => NotifyStatus::Skipped {
                reason: "notify not configured".to_string(),
            },
        };

        Ok(RunOutcome::Tagged {
            context: ctx,
            version_file: version_file_status,
            notify: notify_status,
        })
    }

    /// Write the version file and commit and push the change.
    ///
    /// Failures here are reported but never abort the run: the tag is
    /// still pushed so the release point exists even when the marker
    /// commit did not land.
    fn update_version_file(&self, name: &str, ctx: &Context, message: &str) -> VersionFileStatus {
        let path = self.store.resolve_path(name);
        debug!(%path, "updating version file");

        if let Err(e) = self.store.write(&path, &ctx.tag) {
            error!(%path, error = %e, "failed to write version file");
            return VersionFileStatus::Failed {
                message: format!("write {path}: {e}"),
            };
        }

        let pushed = self
            .repo
            .stage_all()
            .and_then(|()| self.repo.commit(message))
            .and_then(|()| self.repo.push_branch(&ctx.branch));
        match pushed {
            Ok(()) => VersionFileStatus::Updated {
                path: path.to_string(),
            },
            Err(e) => {
                error!(error = %e, "failed to push version file change");
                VersionFileStatus::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}
