//! tagflow CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tagflow::{Cli, report};
use tagflow_core::config::ConfigLoader;
use tagflow_core::git::SystemGit;
use tagflow_core::notify::CurlNotifier;
use tagflow_core::run::{RunOptions, Workflow};
use tagflow_core::version_file::FsVersionStore;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    // A run without a config file has nothing to derive from, so
    // discovery failure is fatal here.
    let config = loader
        .load_or_error()
        .context("failed to load configuration")?;

    let log_dir = config
        .log_dir
        .as_ref()
        .map(|dir| dir.as_std_path().to_path_buf());
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(log_dir, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        debug_mode = cli.debug,
        silence = cli.silence,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let options = RunOptions {
        silence: cli.silence,
        debug: cli.debug,
    };
    let store = FsVersionStore::new(cwd);
    let workflow = Workflow::new(&SystemGit, &store, &CurlNotifier);

    let result = workflow
        .run(&config, &options)
        .map_err(anyhow::Error::from)
        .and_then(|outcome| report::render(&outcome, cli.json));
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
