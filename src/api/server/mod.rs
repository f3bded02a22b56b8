//
//  bitbucket-build-status
//  api/server/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Server/Data Center build status endpoint
//!
//! Server keeps build statuses in a dedicated REST plugin that addresses
//! statuses by commit only; the repository is not part of the URL:
//!
//! ```text
//! POST {endpoint}/rest/build-status/1.0/commits/{sha}
//! ```
//!
//! A successful post answers 204 No Content.

use crate::config::normalize_endpoint;

/// Builds the Server build status URL.
///
/// Trailing slashes on `endpoint` are dropped first.
///
/// # Example
///
/// ```rust
/// use bitbucket_build_status::api::server::build_status_url;
///
/// assert_eq!(
///     build_status_url("https://git.example.com/", "abc123"),
///     "https://git.example.com/rest/build-status/1.0/commits/abc123"
/// );
/// ```
pub fn build_status_url(endpoint: &str, commit_sha: &str) -> String {
    format!(
        "{}/rest/build-status/1.0/commits/{}",
        normalize_endpoint(endpoint),
        commit_sha
    )
}
