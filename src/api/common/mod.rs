//
//  bitbucket-build-status
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for Bitbucket Cloud and Server
//!
//! Types shared by both platform variants: the [`Driver`] that selects a
//! variant, the [`BuildStatusRequest`] posted to either one, the
//! [`ApiError`] taxonomy, and the status-code message table.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_build_status::api::common::{error_message, Driver};
//! use reqwest::StatusCode;
//!
//! let driver: Driver = "Bitbucket Cloud".parse().unwrap();
//! assert!(driver.is_success(StatusCode::CREATED));
//!
//! assert_eq!(
//!     error_message(StatusCode::NOT_FOUND, ""),
//!     "HTTP 404 Not Found - Does the repo supplied exist?"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::exit_codes;
use crate::output::pretty_sorted_json_str;

/// Canned messages for common rejection codes.
///
/// Shared by the token exchange and the status post. The 400 entry reads
/// "HTTP 401" and a real 401 has no entry; both are kept as they are.
pub const STATUS_MESSAGES: [(u16, &str); 3] = [
    (
        403,
        "HTTP 403 Forbidden - Does your bitbucket user have rights to the repo?",
    ),
    (404, "HTTP 404 Not Found - Does the repo supplied exist?"),
    (
        400,
        "HTTP 401 Unauthorized - Are your bitbucket credentials correct?",
    ),
];

/// Looks up the canned message for `status`, if there is one.
pub fn canned_message(status: u16) -> Option<&'static str> {
    STATUS_MESSAGES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| *message)
}

/// Builds the human-readable message for a rejected request.
///
/// The canned table wins. Otherwise the body is rendered with
/// [`pretty_sorted_json`](crate::output::pretty_sorted_json); a body that
/// is not JSON is reported raw as `HTTP <code>: <body>`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Some(message) = canned_message(status.as_u16()) {
        return message.to_string();
    }

    match pretty_sorted_json_str(body) {
        Ok(rendered) => rendered,
        Err(_) => format!("HTTP {}: {}", status.as_u16(), body.trim()),
    }
}

/// Unified error type for build status operations.
///
/// | Variant | Kind | When |
/// |---------|------|------|
/// | `InvalidDriver` | configuration | driver is not one of the two names |
/// | `MissingField` | configuration | a value the driver needs was not given |
/// | `InvalidEndpoint` | configuration | Server endpoint is not an http(s) URL |
/// | `InvalidRepo` | configuration | Cloud repo is not `owner/slug` |
/// | `Auth` | remote | token exchange rejected |
/// | `StatusPost` | remote | status post rejected |
/// | `MalformedTokenResponse` | remote | 200 without an `access_token` |
/// | `Network` | transport | reqwest failed before a status arrived |
///
/// Configuration errors are always raised before any request is sent.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The driver name is not recognized.
    #[error("Invalid driver '{0}', must be: Bitbucket Server or Bitbucket Cloud")]
    InvalidDriver(String),

    /// A value required by the selected driver is missing.
    #[error("Missing required value: {0}")]
    MissingField(String),

    /// The Server endpoint could not be parsed as an http(s) URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// The endpoint as supplied
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },

    /// The Cloud repository identifier is not in `owner/repo-slug` form.
    #[error("Invalid repository '{0}', expected OWNER/REPO-SLUG")]
    InvalidRepo(String),

    /// The token exchange was rejected.
    #[error("{message}")]
    Auth {
        /// HTTP status returned by the token endpoint
        status: StatusCode,
        /// Canned or rendered message
        message: String,
    },

    /// The status post was rejected.
    #[error("{message}")]
    StatusPost {
        /// HTTP status returned by the status endpoint
        status: StatusCode,
        /// Canned or rendered message
        message: String,
    },

    /// The token endpoint answered 200 without a usable token.
    #[error("Token response did not contain an access token: {0}")]
    MalformedTokenResponse(String),

    /// A transport-level failure from the HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Whether this error is a misconfiguration detected before any request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidDriver(_)
                | Self::MissingField(_)
                | Self::InvalidEndpoint { .. }
                | Self::InvalidRepo(_)
        )
    }

    /// Process exit code the CLI uses for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_configuration() {
            return exit_codes::USAGE;
        }

        match self {
            Self::Auth { .. } => exit_codes::AUTH_ERROR,
            Self::StatusPost { status, .. } if *status == StatusCode::NOT_FOUND => {
                exit_codes::NOT_FOUND
            }
            _ => exit_codes::ERROR,
        }
    }
}

/// Which Bitbucket REST variant a status is posted to.
///
/// The textual forms are exactly `"Bitbucket Server"` and
/// `"Bitbucket Cloud"`; anything else fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    /// Self-hosted Bitbucket Server/Data Center, HTTP Basic auth
    BitbucketServer,
    /// Bitbucket Cloud at bitbucket.org, OAuth bearer auth
    BitbucketCloud,
}

impl Driver {
    /// The canonical driver name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BitbucketServer => "Bitbucket Server",
            Self::BitbucketCloud => "Bitbucket Cloud",
        }
    }

    /// Status codes that count as a successful status post.
    ///
    /// Cloud answers 201 for the first post of a key and 200 for updates.
    pub const fn success_codes(&self) -> &'static [u16] {
        match self {
            Self::BitbucketServer => &[204],
            Self::BitbucketCloud => &[200, 201],
        }
    }

    /// Whether `status` counts as success for this driver.
    pub fn is_success(&self, status: StatusCode) -> bool {
        self.success_codes().contains(&status.as_u16())
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bitbucket Server" => Ok(Self::BitbucketServer),
            "Bitbucket Cloud" => Ok(Self::BitbucketCloud),
            other => Err(ApiError::InvalidDriver(other.to_string())),
        }
    }
}

/// A build status to attach to one commit.
///
/// `state` is passed through as given; Bitbucket defines the vocabulary
/// (`SUCCESSFUL`, `FAILED`, `INPROGRESS`, `STOPPED`).
///
/// # Example
///
/// ```rust
/// use bitbucket_build_status::api::BuildStatusRequest;
///
/// let request = BuildStatusRequest::new("myorg/myrepo", "abc123", "SUCCESSFUL", "ci")
///     .with_name("CI build #42")
///     .with_url("https://ci.example.com/builds/42");
///
/// let body = serde_json::to_value(request.body()).unwrap();
/// assert_eq!(body["state"], "SUCCESSFUL");
/// assert!(body.get("repo").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStatusRequest {
    /// `owner/repo-slug` for Cloud; unused by Server
    pub repo: String,
    /// The commit the status belongs to
    pub commit_sha: String,
    /// Build outcome, e.g. `SUCCESSFUL`
    pub state: String,
    /// Identifies the build; a second post with the same key updates it
    pub key: String,
    /// Display name of the build
    pub name: String,
    /// Link to the build results
    pub url: String,
    /// Free-form description
    pub description: String,
}

impl BuildStatusRequest {
    /// Creates a request with empty name, url and description.
    pub fn new(
        repo: impl Into<String>,
        commit_sha: impl Into<String>,
        state: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            commit_sha: commit_sha.into(),
            state: state.into(),
            key: key.into(),
            name: String::new(),
            url: String::new(),
            description: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The JSON body sent to either variant.
    pub fn body(&self) -> BuildStatusBody<'_> {
        BuildStatusBody {
            state: &self.state,
            key: &self.key,
            name: &self.name,
            url: &self.url,
            description: &self.description,
        }
    }
}

/// Wire body of a status post: exactly these five fields.
#[derive(Debug, Serialize)]
pub struct BuildStatusBody<'a> {
    pub state: &'a str,
    pub key: &'a str,
    pub name: &'a str,
    pub url: &'a str,
    pub description: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parse() {
        assert_eq!("Bitbucket Server".parse::<Driver>().unwrap(), Driver::BitbucketServer);
        assert_eq!("Bitbucket Cloud".parse::<Driver>().unwrap(), Driver::BitbucketCloud);
        for bad in ["bitbucket cloud", "Cloud", "GitHub", ""] {
            assert!(matches!(bad.parse::<Driver>(), Err(ApiError::InvalidDriver(_))));
        }
    }

    #[test]
    fn test_success_codes() {
        for code in [200u16, 201, 204, 400, 500] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(Driver::BitbucketCloud.is_success(status), code == 200 || code == 201);
            assert_eq!(Driver::BitbucketServer.is_success(status), code == 204);
        }
    }

    #[test]
    fn test_canned_messages_win_over_body() {
        let body = r#"{"error": {"message": "ignored"}}"#;
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, body),
            "HTTP 403 Forbidden - Does your bitbucket user have rights to the repo?"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, body),
            "HTTP 404 Not Found - Does the repo supplied exist?"
        );
        // 400 carries the 401 wording
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "HTTP 401 Unauthorized - Are your bitbucket credentials correct?"
        );
    }

    #[test]
    fn test_unauthorized_falls_back_to_body() {
        let body = r#"{"type": "error", "error": {"message": "Token expired"}}"#;
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, body),
            "{\n    \"error\":{\n        \"message\":\"Token expired\"\n    },\n    \"type\":\"error\"\n}\n"
        );
    }

    #[test]
    fn test_non_json_body() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>\n"),
            "HTTP 502: <html>Bad Gateway</html>"
        );
    }

    #[test]
    fn test_body_has_exactly_five_fields() {
        let request = BuildStatusRequest::new("o/r", "sha", "FAILED", "k")
            .with_name("n")
            .with_url("u")
            .with_description("d");
        let body = serde_json::to_value(request.body()).unwrap();
        let object = body.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["description", "key", "name", "state", "url"]);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ApiError::InvalidDriver("x".into()).exit_code(), exit_codes::USAGE);
        let not_found = ApiError::StatusPost {
            status: StatusCode::NOT_FOUND,
            message: String::new(),
        };
        assert_eq!(not_found.exit_code(), exit_codes::NOT_FOUND);
        let auth = ApiError::Auth {
            status: StatusCode::FORBIDDEN,
            message: String::new(),
        };
        assert_eq!(auth.exit_code(), exit_codes::AUTH_ERROR);
    }
}
