//
//  bitbucket-build-status
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Build Status Library
//!
//! Posts CI build results to Bitbucket so that a commit is annotated with
//! its pass/fail state.
//!
//! ## Overview
//!
//! The library provides the core of the `bb-status` CLI tool: a
//! [`StatusReporter`] that talks to either Bitbucket Cloud or a self-hosted
//! Bitbucket Server/Data Center instance.
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: The status reporter, request types and error taxonomy
//! - [`auth`]: Credential model and the OAuth client-credentials exchange
//! - [`config`]: Configuration file management
//! - [`output`]: Diagnostics sink and JSON message formatting
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_build_status::api::{BuildStatusRequest, StatusReporter, Target};
//! use bitbucket_build_status::output::Diagnostics;
//!
//! # async fn example() -> Result<(), bitbucket_build_status::api::ApiError> {
//! let reporter = StatusReporter::new(Diagnostics::disabled())?;
//!
//! let request = BuildStatusRequest::new("myorg/myrepo", "abc123", "SUCCESSFUL", "ci-build")
//!     .with_url("https://ci.example.com/builds/1");
//! reporter.set_build_status(&Target::cloud("token"), &request).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Platform Differences
//!
//! | Feature | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | Auth | OAuth bearer | HTTP Basic |
//! | Success codes | 200, 201 | 204 |
//! | Repo in URL | Yes | No |

/// Command-line interface definitions.
///
/// Contains the `bb-status` commands and arguments defined using the clap derive API.
pub mod cli;

/// The build status reporter for Bitbucket platforms.
///
/// Builds the platform-specific URL, attaches credentials, posts the status
/// and classifies the response.
pub mod api;

/// Authentication and credential handling.
///
/// - Bearer tokens (Bitbucket Cloud)
/// - HTTP Basic (Bitbucket Server/DC)
/// - OAuth 2.0 client-credentials exchange
pub mod auth;

/// Configuration file management.
///
/// Reads defaults from platform-specific locations:
/// - Linux: `~/.config/bb-status/config.toml`
/// - macOS: `~/Library/Application Support/bb-status/config.toml`
/// - Windows: `%APPDATA%\bb-status\config.toml`
pub mod config;

/// Diagnostics and message formatting.
pub mod output;

pub use api::{ApiError, BuildStatusRequest, Driver, StatusReporter, Target};
pub use cli::Cli;
pub use config::Config;

/// Application name constant.
///
/// The name of the CLI binary, used for display purposes and configuration paths.
pub const APP_NAME: &str = "bb-status";

/// Application version constant, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Standardized exit codes following Unix conventions, allowing CI scripts
/// to tell a rejected status apart from a misconfigured invocation.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error.
    ///
    /// An unspecified error occurred during execution.
    /// Check stderr for details.
    pub const ERROR: i32 = 1;

    /// Invalid usage, arguments or configuration.
    ///
    /// Includes an unrecognized driver. No request has been sent when this
    /// code is returned.
    pub const USAGE: i32 = 2;

    /// Authentication failed.
    ///
    /// The OAuth token exchange was rejected by Bitbucket.
    pub const AUTH_ERROR: i32 = 4;

    /// Resource not found.
    ///
    /// Bitbucket answered 404, usually because the repository or commit
    /// does not exist.
    pub const NOT_FOUND: i32 = 8;
}
