//
//  bitbucket-build-status
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Host Configuration Module
//!
//! Well-known Bitbucket Cloud URLs and helpers for Server endpoints.
//!
//! ## Bitbucket Cloud vs Server/Data Center
//!
//! | Feature | Cloud | Server/DC |
//! |---------|-------|-----------|
//! | API Base | `https://api.bitbucket.org/2.0` | `<endpoint>/rest` |
//! | Build status API | `repositories/{repo}/commit/{sha}/statuses/build` | `build-status/1.0/commits/{sha}` |
//! | Auth | OAuth bearer | HTTP Basic |
//!
//! ## Usage
//!
//! ```rust
//! use bitbucket_build_status::config::{normalize_endpoint, BITBUCKET_CLOUD_API};
//!
//! assert_eq!(normalize_endpoint("https://git.example.com/"), "https://git.example.com");
//! assert_eq!(BITBUCKET_CLOUD_API, "https://api.bitbucket.org/2.0");
//! ```

use url::Url;

use crate::api::ApiError;

/// Base URL of the Bitbucket Cloud REST API v2.0.
///
/// Build status posts go to
/// `{BITBUCKET_CLOUD_API}/repositories/{repo}/commit/{sha}/statuses/build`.
pub const BITBUCKET_CLOUD_API: &str = "https://api.bitbucket.org/2.0";

/// OAuth 2.0 token endpoint of Bitbucket Cloud.
///
/// Used for the client-credentials grant; the web host, not the API host.
pub const BITBUCKET_TOKEN_URL: &str = "https://bitbucket.org/site/oauth2/access_token";

/// Strips trailing slashes so paths can be appended without doubling them.
///
/// # Examples
///
/// ```rust
/// use bitbucket_build_status::config::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("https://bb.example.com"), "https://bb.example.com");
/// assert_eq!(normalize_endpoint("https://bb.example.com//"), "https://bb.example.com");
/// assert_eq!(normalize_endpoint("https://bb.example.com/git/"), "https://bb.example.com/git");
/// ```
pub fn normalize_endpoint(endpoint: &str) -> &str {
    endpoint.trim_end_matches('/')
}

/// Checks that a Server endpoint is an absolute http(s) URL.
///
/// Context paths such as `https://example.com/bitbucket` are allowed.
pub fn validate_server_endpoint(endpoint: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(normalize_endpoint(endpoint)).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }

    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_server_endpoint() {
        assert!(validate_server_endpoint("https://git.example.com/").is_ok());
        assert!(validate_server_endpoint("http://localhost:7990/bitbucket").is_ok());
        assert!(validate_server_endpoint("git.example.com").is_err());
        assert!(validate_server_endpoint("ftp://git.example.com").is_err());
    }
}
