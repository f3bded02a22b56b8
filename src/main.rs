//
//  bitbucket-build-status
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_build_status::api::ApiError;
use bitbucket_build_status::cli::{Cli, Commands};
use bitbucket_build_status::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; a broken config file is reported by the command
    let debug = cli
        .global
        .load_config()
        .map(|config| cli.global.debug_enabled(&config))
        .unwrap_or(cli.global.debug);
    init_logging(debug);

    // Execute command
    let result = run(cli).await;

    // Handle result and exit
    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").red().bold());
            std::process::exit(exit_code_for(&e));
        }
    }
}

/// Initialize logging based on environment
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("BB_STATUS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Maps typed reporter errors to their exit codes
fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ApiError>()
        .map(ApiError::exit_code)
        .unwrap_or(exit_codes::ERROR)
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Set(cmd) => cmd.run(&cli.global).await,
        Commands::Token(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bb-status version {}", bitbucket_build_status::VERSION);
            Ok(())
        }
    }
}
