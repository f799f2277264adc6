//! Webhook notification with branch gating.
//!
//! Notification is best-effort by design: a release is not failed
//! because a chat message could not be delivered, so [`send`] reports
//! whether anything went out but surfaces delivery problems only as
//! logged errors.

use std::process::Command;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use crate::context::Context;
use crate::rules::NotifyRules;

/// Errors from webhook delivery.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Failed to execute the HTTP client command.
    #[error("failed to run curl: {0}")]
    Exec(#[from] std::io::Error),

    /// The HTTP client reported a failure.
    #[error("webhook POST failed: {stderr}")]
    Post {
        /// Captured stderr.
        stderr: String,
    },
}

/// Result alias for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Webhook delivery, behind a seam for tests.
pub trait Notifier {
    /// POST a markdown message to the webhook URL.
    fn post_markdown(&self, url: &str, content: &str) -> NotifyResult<()>;
}

/// [`Notifier`] that shells out to `curl`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlNotifier;

impl Notifier for CurlNotifier {
    #[instrument(skip(self, content))]
    fn post_markdown(&self, url: &str, content: &str) -> NotifyResult<()> {
        let body = markdown_payload(content);

        let output = Command::new("curl")
            .args(["-sS", "-X", "POST", "-H", "Content-Type: application/json", "-d"])
            .arg(body.to_string())
            .arg(url)
            .output()?;

        if output.status.success() {
            debug!("webhook delivered");
            Ok(())
        } else {
            Err(NotifyError::Post {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Build the markdown webhook payload.
fn markdown_payload(content: &str) -> serde_json::Value {
    json!({
        "msgtype": "markdown",
        "markdown": { "content": content },
    })
}

/// Whether the current branch may trigger a notification.
pub fn should_notify(rules: &NotifyRules, branch: &str) -> bool {
    rules.branch_allowed(branch)
}

/// Outcome of the notification step, recorded in the run outcome.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum NotifyStatus {
    /// The webhook was invoked successfully.
    Sent,
    /// Nothing was sent, with the reason.
    Skipped {
        /// Why the notification was skipped.
        reason: String,
    },
    /// Delivery was attempted and failed (non-fatal).
    Failed {
        /// Error details.
        message: String,
    },
}

/// Send the notification if the gate allows it.
///
/// Requires the branch to pass the allow-list and both the webhook URL
/// and content to resolve non-empty; anything else skips with a
/// warning. Delivery failure is logged and reported in the status, not
/// raised.
pub fn send(rules: &NotifyRules, ctx: &Context, notifier: &dyn Notifier) -> NotifyStatus {
    if !should_notify(rules, &ctx.branch) {
        debug!(branch = %ctx.branch, "branch not in notify allow-list");
        return NotifyStatus::Skipped {
            reason: format!("branch {} not in notify allow-list", ctx.branch),
        };
    }

    let url = rules.webhook_url(ctx).unwrap_or_default();
    let content = rules.content(ctx).unwrap_or_default();
    if url.is_empty() || content.is_empty() {
        warn!("notify section lacks webhook_url or content; skipping notification");
        return NotifyStatus::Skipped {
            reason: "webhook_url or content not configured".to_string(),
        };
    }

    match notifier.post_markdown(&url, &content) {
        Ok(()) => NotifyStatus::Sent,
        Err(e) => {
            error!(error = %e, "webhook notification failed");
            NotifyStatus::Failed {
                message: e.to_string(),
            }
        }
    }
}
