//! Terminal and JSON rendering of run outcomes.

use owo_colors::OwoColorize;

use tagflow_core::notify::NotifyStatus;
use tagflow_core::run::{RunOutcome, VersionFileStatus};

/// Render a run outcome to stdout.
pub fn render(outcome: &RunOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match outcome {
        RunOutcome::Skipped { reason } => {
            println!("{} {reason}", "–".yellow());
        }
        RunOutcome::DebugPreview {
            context,
            version_file,
            message,
        } => {
            println!(
                "\n{}",
                "DEBUG — no changes will be made".yellow().bold()
            );
            let previous = if context.previous_tag.is_empty() {
                "none (first tag)".to_string()
            } else {
                context.previous_tag.clone()
            };
            println!(
                "\n{}: {} → {}",
                "Tag".bold(),
                previous.dimmed(),
                context.tag.green().bold(),
            );
            println!(
                "{}: {} | {}: {} | {}: {}",
                "Version".dimmed(),
                context.version,
                "Env".dimmed(),
                context.env,
                "Order".dimmed(),
                context.order,
            );
            println!("{}: {}", "Branch".dimmed(), context.branch);
            println!(
                "{}: {}",
                "Version file".dimmed(),
                version_file.as_deref().unwrap_or("(disabled)"),
            );
            println!("{}: {message}", "Message".dimmed());
            println!();
        }
        RunOutcome::Tagged {
            context,
            version_file,
            notify,
        } => {
            match version_file {
                VersionFileStatus::Updated { path } => {
                    println!("  {} version file {}", "✓".green(), path.bold());
                }
                VersionFileStatus::Skipped { reason } => {
                    println!(
                        "  {} version file {}",
                        "–".yellow(),
                        format!("skipped: {reason}").dimmed()
                    );
                }
                VersionFileStatus::Failed { message } => {
                    println!("  {} version file: {message}", "✗".red());
                }
            }
            println!("  {} tag {} pushed", "✓".green(), context.tag.bold());
            match notify {
                NotifyStatus::Sent => {
                    println!("  {} notification sent", "✓".green());
                }
                NotifyStatus::Skipped { reason } => {
                    println!(
                        "  {} notification {}",
                        "–".yellow(),
                        format!("skipped: {reason}").dimmed()
                    );
                }
                NotifyStatus::Failed { message } => {
                    println!("  {} notification: {message}", "✗".red());
                }
            }
            println!(
                "\n{} Released {}",
                "✓".green().bold(),
                context.tag.green().bold()
            );
        }
    }

    Ok(())
}
