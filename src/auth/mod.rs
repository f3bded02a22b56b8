//
//  bitbucket-build-status
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! The two credential kinds the reporter can attach to a request, and the
//! OAuth client-credentials exchange that produces a Cloud token.
//!
//! ## Supported Authentication Methods
//!
//! - **OAuth bearer token**: Bitbucket Cloud. The token comes from
//!   [`request_client_credentials_token`] or from the caller.
//! - **Basic Authentication**: Bitbucket Server/DC, username and password
//!   on every request.
//!
//! Tokens are neither cached nor refreshed; the caller owns their lifetime.
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_build_status::auth::AuthCredential;
//!
//! let credential = AuthCredential::bearer("access-token");
//! assert!(credential.is_bearer());
//! ```

mod oauth;

pub use oauth::*;

use reqwest::RequestBuilder;

/// Credentials attached to an outgoing request.
///
/// Exactly one variant is used per call; the driver decides which.
#[derive(Clone)]
pub enum AuthCredential {
    /// OAuth 2.0 access token, sent as `Authorization: Bearer <token>`.
    OAuthBearer {
        /// The access token
        token: String,
    },
    /// HTTP Basic authentication.
    Basic {
        /// The username for authentication
        username: String,
        /// The password for authentication
        password: String,
    },
}

impl AuthCredential {
    /// Creates a bearer credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::OAuthBearer {
            token: token.into(),
        }
    }

    /// Creates a Basic credential.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether this is a bearer credential.
    pub fn is_bearer(&self) -> bool {
        matches!(self, Self::OAuthBearer { .. })
    }

    /// Applies the credential to an HTTP request.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use bitbucket_build_status::auth::AuthCredential;
    /// use reqwest::Client;
    ///
    /// async fn post(credential: &AuthCredential) {
    ///     let client = Client::new();
    ///     let request = client.post("https://api.bitbucket.org/2.0/repositories/o/r/commit/a/statuses/build");
    ///     let _ = credential.apply_to_request(request).send().await;
    /// }
    /// ```
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::OAuthBearer { token } => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

impl std::fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuthBearer { .. } => f
                .debug_struct("OAuthBearer")
                .field("token", &"<redacted>")
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
