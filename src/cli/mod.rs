//
//  bitbucket-build-status
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod completion;
mod set;
mod token;

pub use completion::CompletionCommand;
pub use set::SetCommand;
pub use token::TokenCommand;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::StatusReporter;
use crate::config::Config;
use crate::output::Diagnostics;

/// bb-status - Report CI build status to Bitbucket
#[derive(Parser, Debug)]
#[command(
    name = "bb-status",
    version,
    about = "Report CI build status to Bitbucket",
    long_about = "bb-status posts build results to Bitbucket Cloud or Server/Data Center\n\
                  so that commits are annotated with their pass/fail state.",
    propagate_version = true,
    after_help = "Use 'bb-status <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Write raw Bitbucket responses to stderr
    #[arg(long, short = 'd', global = true, env = "BB_STATUS_DEBUG")]
    pub debug: bool,

    /// Path to a config file instead of the default location
    #[arg(long, global = true, env = "BB_STATUS_CONFIG")]
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Loads the config file selected by `--config`, or the default one.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_optional(self.config.as_deref())
    }

    /// Debugging is on if either the flag or the config file asks for it.
    pub fn debug_enabled(&self, config: &Config) -> bool {
        self.debug || config.debug
    }

    /// Builds a reporter writing debug notes to stderr when
    /// [`debug_enabled`](Self::debug_enabled).
    pub fn reporter(&self, config: &Config) -> Result<StatusReporter> {
        let diagnostics = Diagnostics::stderr(self.debug_enabled(config));
        Ok(StatusReporter::new(diagnostics)?.with_endpoints(config.endpoints()))
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Post a build status for a commit
    #[command(visible_alias = "status")]
    Set(SetCommand),

    /// Exchange OAuth client credentials for a Bitbucket Cloud access token
    Token(TokenCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print version information
    Version,
}
