//! Git operations for the tag workflow.
//!
//! Shells out to `git` for all operations. This ensures we inherit the
//! user's SSH keys, GPG signing, hooks, and other configuration.
//!
//! The orchestrator talks to git through the [`Repository`] trait so
//! tests can substitute a recording fake; [`SystemGit`] is the
//! production implementation.

use std::process::Command;

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "push").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// Not inside a git repository.
    #[error("not a git repository (or any parent up to mount point)")]
    NotARepo,
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Repository facts and mutations the orchestrator depends on.
///
/// Fact methods never mutate; every mutation method maps to a single
/// external command that either succeeds or raises.
pub trait Repository {
    /// The current branch name.
    fn current_branch(&self) -> GitResult<String>;

    /// The configured git user name.
    fn current_user(&self) -> GitResult<String>;

    /// The most recent tag name, or an empty string when the
    /// repository has no tags yet.
    fn latest_tag(&self) -> GitResult<String>;

    /// Stage all changes in the working tree.
    fn stage_all(&self) -> GitResult<()>;

    /// Commit staged changes with the given message.
    fn commit(&self, message: &str) -> GitResult<()>;

    /// Push the named branch to the remote.
    fn push_branch(&self, branch: &str) -> GitResult<()>;

    /// Pull the latest remote state.
    fn pull_all(&self) -> GitResult<()>;

    /// Create an annotated tag with the given message.
    fn create_tag(&self, name: &str, message: &str) -> GitResult<()>;

    /// Push the named tag to the remote.
    fn push_tag(&self, name: &str) -> GitResult<()>;
}

/// [`Repository`] backed by the system `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl Repository for SystemGit {
    #[instrument(skip(self))]
    fn current_branch(&self) -> GitResult<String> {
        let output = git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = output.trim().to_string();
        debug!(%branch, "current branch");
        Ok(branch)
    }

    #[instrument(skip(self))]
    fn current_user(&self) -> GitResult<String> {
        let output = git(&["config", "user.name"])?;
        let user = output.trim().to_string();
        debug!(%user, "current user");
        Ok(user)
    }

    #[instrument(skip(self))]
    fn latest_tag(&self) -> GitResult<String> {
        // `describe` fails when the repository has no tags — that is a
        // normal first-run state, not an error.
        let result = git(&["describe", "--tags", "--abbrev=0"]);
        match result {
            Ok(output) => {
                let tag = output.trim().to_string();
                debug!(%tag, "latest tag");
                Ok(tag)
            }
            Err(GitError::Command { .. }) => {
                debug!("no tags found");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    fn stage_all(&self) -> GitResult<()> {
        git(&["add", "."]).map(drop)
    }

    #[instrument(skip(self))]
    fn commit(&self, message: &str) -> GitResult<()> {
        git(&["commit", "-m", message]).map(drop)
    }

    #[instrument(skip(self))]
    fn push_branch(&self, branch: &str) -> GitResult<()> {
        git(&["push", "origin", branch]).map(drop)
    }

    #[instrument(skip(self))]
    fn pull_all(&self) -> GitResult<()> {
        git(&["pull", "--all"]).map(drop)
    }

    #[instrument(skip(self))]
    fn create_tag(&self, name: &str, message: &str) -> GitResult<()> {
        git(&["tag", "-a", name, "-m", message]).map(drop)
    }

    #[instrument(skip(self))]
    fn push_tag(&self, name: &str) -> GitResult<()> {
        git(&["push", "origin", name]).map(drop)
    }
}

/// Check if we're inside a git repository.
#[instrument]
pub fn is_inside_repo() -> GitResult<bool> {
    let result = git(&["rev-parse", "--is-inside-work-tree"]);
    match result {
        Ok(output) => Ok(output.trim() == "true"),
        Err(GitError::Command { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Run a git command and return its stdout.
fn git(args: &[&str]) -> GitResult<String> {
    let output = Command::new("git").args(args).output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // Detect "not a git repo" specifically
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepo);
        }

        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            stderr,
        })
    }
}
