//
//  bitbucket-build-status
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! Posts build statuses to Bitbucket's REST APIs.
//!
//! ## Supported Platforms
//!
//! - **Bitbucket Cloud**: API v2.0 at `api.bitbucket.org`
//! - **Bitbucket Server/Data Center**: build-status API 1.0 at your custom host
//!
//! ## Architecture
//!
//! - [`client`]: The [`StatusReporter`], its [`Target`] and [`Endpoints`]
//! - [`cloud`]: Cloud URL layout and repository validation
//! - [`server`]: Server URL layout
//! - [`common`]: Driver, request body, error taxonomy and message table
//!
//! ## Error Handling
//!
//! Rejections are returned as [`ApiError`] variants:
//!
//! - `Auth`: token exchange answered anything but 200
//! - `StatusPost`: status post answered outside the driver's success set
//! - `InvalidDriver`, `MissingField`, `InvalidEndpoint`, `InvalidRepo`:
//!   misconfiguration, raised before any request

/// Build status reporter.
pub mod client;

/// Bitbucket Cloud API v2.0 build status endpoint.
pub mod cloud;

/// Bitbucket Server/Data Center build status endpoint.
pub mod server;

/// Types shared between Cloud and Server.
pub mod common;

pub use client::{Endpoints, StatusReporter, Target};
pub use common::{ApiError, BuildStatusRequest, Driver};
