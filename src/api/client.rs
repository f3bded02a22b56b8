//
//  bitbucket-build-status
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Build Status Reporter
//!
//! The [`StatusReporter`] posts one build status per call to either
//! Bitbucket Cloud or Bitbucket Server/DC.
//!
//! ## Flow
//!
//! 1. The [`Target`] picks the driver, the URL template and the credential
//! 2. The body `{state, key, name, url, description}` is posted as JSON
//! 3. The status code is checked against the driver's success set
//! 4. A rejection becomes [`ApiError::StatusPost`] with a canned or rendered message
//!
//! There are no retries and no timeouts; each call is a single exchange.

use reqwest::Client;
use tracing::{debug, warn};

use super::common::{error_message, ApiError, BuildStatusRequest, Driver};
use super::{cloud, server};
use crate::auth::{request_client_credentials_token, AuthCredential};
use crate::config::{validate_server_endpoint, BITBUCKET_CLOUD_API, BITBUCKET_TOKEN_URL};
use crate::output::Diagnostics;

/// Cloud URLs used by the reporter.
///
/// The defaults point at bitbucket.org; overrides exist for proxies and
/// test servers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base of the Cloud REST API v2.0
    pub cloud_api: String,
    /// OAuth token endpoint
    pub token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cloud_api: BITBUCKET_CLOUD_API.to_string(),
            token_url: BITBUCKET_TOKEN_URL.to_string(),
        }
    }
}

/// Where a status is posted and how the request is authenticated.
///
/// # Example
///
/// ```rust
/// use bitbucket_build_status::api::{Driver, Target};
///
/// let target = Target::server("https://git.example.com/", "ci", "secret", false)?;
/// assert_eq!(target.driver(), Driver::BitbucketServer);
/// assert!(!target.verify_ssl());
/// # Ok::<(), bitbucket_build_status::api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub enum Target {
    /// Bitbucket Cloud with an OAuth access token.
    Cloud {
        /// Bearer token from the client-credentials exchange
        access_token: String,
    },
    /// Bitbucket Server/DC with HTTP Basic auth.
    Server {
        /// Base URL of the instance
        endpoint: String,
        /// User for Basic auth
        username: String,
        /// Password for Basic auth
        password: String,
        /// Validate TLS certificates
        verify_ssl: bool,
    },
}

impl Target {
    /// Creates a Cloud target.
    pub fn cloud(access_token: impl Into<String>) -> Self {
        Self::Cloud {
            access_token: access_token.into(),
        }
    }

    /// Creates a Server target after checking the endpoint is an http(s) URL.
    pub fn server(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        verify_ssl: bool,
    ) -> Result<Self, ApiError> {
        let endpoint = endpoint.into();
        validate_server_endpoint(&endpoint)?;
        Ok(Self::Server {
            endpoint,
            username: username.into(),
            password: password.into(),
            verify_ssl,
        })
    }

    /// Builds a target from loosely-typed parts, as a CLI would have them.
    ///
    /// Cloud needs `access_token`; Server needs `endpoint`, `username` and
    /// `password`. Values the driver does not use are ignored.
    pub fn from_parts(
        driver: Driver,
        access_token: Option<String>,
        endpoint: Option<String>,
        username: Option<String>,
        password: Option<String>,
        verify_ssl: bool,
    ) -> Result<Self, ApiError> {
        let require = |value: Option<String>, what: &str| {
            value.ok_or_else(|| ApiError::MissingField(format!("{} (required for {})", what, driver)))
        };

        match driver {
            Driver::BitbucketCloud => Ok(Self::cloud(require(access_token, "access token")?)),
            Driver::BitbucketServer => Self::server(
                require(endpoint, "endpoint")?,
                require(username, "username")?,
                require(password, "password")?,
                verify_ssl,
            ),
        }
    }

    /// The driver this target belongs to.
    pub fn driver(&self) -> Driver {
        match self {
            Self::Cloud { .. } => Driver::BitbucketCloud,
            Self::Server { .. } => Driver::BitbucketServer,
        }
    }

    /// Whether TLS certificates are validated. Always true for Cloud.
    pub fn verify_ssl(&self) -> bool {
        match self {
            Self::Cloud { .. } => true,
            Self::Server { verify_ssl, .. } => *verify_ssl,
        }
    }

    /// The credential attached to every request for this target.
    pub fn credential(&self) -> AuthCredential {
        match self {
            Self::Cloud { access_token } => AuthCredential::bearer(access_token.clone()),
            Self::Server {
                username, password, ..
            } => AuthCredential::basic(username.clone(), password.clone()),
        }
    }
}

/// Posts build statuses to Bitbucket.
///
/// # Creating a Reporter
///
/// ```rust,no_run
/// use bitbucket_build_status::api::{BuildStatusRequest, StatusReporter, Target};
/// use bitbucket_build_status::output::Diagnostics;
///
/// # async fn example() -> Result<(), bitbucket_build_status::api::ApiError> {
/// let reporter = StatusReporter::new(Diagnostics::stderr(true))?;
///
/// let token = reporter.request_access_token("client-id", "secret").await?;
/// let request = BuildStatusRequest::new("myorg/myrepo", "abc123", "INPROGRESS", "ci")
///     .with_url("https://ci.example.com/builds/7");
///
/// reporter.set_build_status(&Target::cloud(token), &request).await?;
/// # Ok(())
/// # }
/// ```
pub struct StatusReporter {
    /// HTTP client that validates certificates
    http: Client,
    /// Cloud API and token URLs
    endpoints: Endpoints,
    /// Debug switch and error stream
    diagnostics: Diagnostics,
}

impl StatusReporter {
    /// Creates a reporter targeting bitbucket.org for Cloud calls.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(diagnostics: Diagnostics) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http_client(true)?,
            endpoints: Endpoints::default(),
            diagnostics,
        })
    }

    /// Replaces the Cloud endpoints.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Exchanges OAuth client credentials for a Cloud access token.
    ///
    /// Returns the `access_token` field of a 200 response exactly as sent.
    ///
    /// # Errors
    ///
    /// [`ApiError::Auth`] for any other status; see
    /// [`request_client_credentials_token`].
    pub async fn request_access_token(
        &self,
        client_id: &str,
        secret: &str,
    ) -> Result<String, ApiError> {
        request_client_credentials_token(
            &self.http,
            &self.endpoints.token_url,
            client_id,
            secret,
            &self.diagnostics,
        )
        .await
    }

    /// The URL a status for `request` is posted to.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidRepo`] when a Cloud repo is not `owner/slug`.
    pub fn status_url(
        &self,
        target: &Target,
        request: &BuildStatusRequest,
    ) -> Result<String, ApiError> {
        match target {
            Target::Cloud { .. } => {
                cloud::validate_repo(&request.repo)?;
                Ok(cloud::build_status_url(
                    &self.endpoints.cloud_api,
                    &request.repo,
                    &request.commit_sha,
                ))
            }
            Target::Server { endpoint, .. } => {
                Ok(server::build_status_url(endpoint, &request.commit_sha))
            }
        }
    }

    /// Posts a build status.
    ///
    /// Succeeds on 200/201 for Cloud and on 204 for Server; every other
    /// status is an [`ApiError::StatusPost`].
    ///
    /// With debugging on, `Request result: <status>` is written to the
    /// diagnostics stream, and `SSL warnings disabled` too when a Server
    /// target skips certificate validation.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidRepo`] before sending, for a malformed Cloud repo
    /// - [`ApiError::StatusPost`] when Bitbucket rejects the status
    /// - [`ApiError::Network`] when the request cannot be sent or the body cannot be read
    pub async fn set_build_status(
        &self,
        target: &Target,
        request: &BuildStatusRequest,
    ) -> Result<(), ApiError> {
        let driver = target.driver();
        let url = self.status_url(target, request)?;

        let insecure;
        let http = if target.verify_ssl() {
            &self.http
        } else {
            self.diagnostics.note("SSL warnings disabled");
            insecure = build_http_client(false)?;
            &insecure
        };

        debug!(%driver, %url, state = %request.state, key = %request.key, "Posting build status");

        let response = target
            .credential()
            .apply_to_request(http.post(&url).json(&request.body()))
            .send()
            .await?;

        let status = response.status();
        self.diagnostics
            .note(format_args!("Request result: {} {}", status, response.url()));

        if driver.is_success(status) {
            debug!(status = status.as_u16(), "Build status accepted");
            return Ok(());
        }

        let body = response.text().await?;
        warn!(%driver, status = status.as_u16(), "Build status rejected");

        Err(ApiError::StatusPost {
            status,
            message: error_message(status, &body),
        })
    }
}

/// Builds the underlying HTTP client.
///
/// With `verify_ssl` off, invalid and self-signed certificates are
/// accepted silently.
fn build_http_client(verify_ssl: bool) -> Result<Client, ApiError> {
    Ok(Client::builder()
        .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
        .danger_accept_invalid_certs(!verify_ssl)
        .build()?)
}
