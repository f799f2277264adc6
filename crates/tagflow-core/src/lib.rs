//! Core library for tagflow.
//!
//! This crate provides the foundational types and functionality used by the
//! `tagflow` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading and management
//! - [`context`] - Tag derivation context
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git operations for the tag workflow
//! - [`notify`] - Webhook notification
//! - [`rules`] - Derivation rules and template interpolation
//! - [`run`] - The run orchestrator
//! - [`tag`] - Tag name grammar
//! - [`version_file`] - Version-marker file handling
//!
//! # Quick Start
//!
//! ```no_run
//! use tagflow_core::{ConfigLoader, RunOptions, Workflow};
//! use tagflow_core::git::SystemGit;
//! use tagflow_core::notify::CurlNotifier;
//! use tagflow_core::version_file::FsVersionStore;
//!
//! let config = ConfigLoader::new()
//!     .with_user_config(true)
//!     .load_or_error()
//!     .expect("Failed to load configuration");
//!
//! let store = FsVersionStore::new("".into());
//! let workflow = Workflow::new(&SystemGit, &store, &CurlNotifier);
//! let outcome = workflow.run(&config, &RunOptions::default());
//! println!("{outcome:?}");
//! ```
#![deny(unsafe_code)]

pub mod config;

pub mod context;

pub mod error;

pub mod git;

pub mod notify;

pub mod rules;

pub mod run;

pub mod tag;

pub mod version_file;

pub use config::{Config, ConfigLoader, LogLevel};

pub use context::Context;

pub use error::{ConfigError, ConfigResult};

pub use run::{RunError, RunOptions, RunOutcome, RunResult, SkipReason, Workflow};

pub use tag::TagParts;
