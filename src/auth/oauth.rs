//
//  bitbucket-build-status
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Client Credentials
//!
//! Bitbucket Cloud build status posts need a bearer token. A CI job owns an
//! OAuth consumer (key + secret) and trades it for a token with the
//! client-credentials grant:
//!
//! ```text
//! POST https://bitbucket.org/site/oauth2/access_token
//! Authorization: Basic base64(client_id:secret)
//! Content-Type: application/x-www-form-urlencoded
//!
//! grant_type=client_credentials
//! ```
//!
//! A 200 response carries the token in `access_token`. Any other status is
//! an [`ApiError::Auth`] whose message comes from the same table the status
//! post uses, so a 403 here still reads "does your user have rights to the
//! repo" even though no repository is involved yet.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::AuthCredential;
use crate::api::common::error_message;
use crate::api::ApiError;
use crate::output::Diagnostics;

#[derive(Deserialize)]
struct TokenResponseRaw {
    access_token: Option<String>,
}

/// Exchanges OAuth client credentials for an access token.
///
/// # Parameters
///
/// * `http` - Client used for the exchange
/// * `token_url` - Token endpoint, normally [`BITBUCKET_TOKEN_URL`](crate::config::BITBUCKET_TOKEN_URL)
/// * `client_id` - OAuth consumer key
/// * `secret` - OAuth consumer secret
/// * `diagnostics` - Receives `Access token result: <status><body>`
///
/// # Errors
///
/// - [`ApiError::Auth`] for any status other than 200
/// - [`ApiError::MalformedTokenResponse`] for a 200 without `access_token`
/// - [`ApiError::Network`] when the request cannot be sent or the body cannot be read
pub async fn request_client_credentials_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    secret: &str,
    diagnostics: &Diagnostics,
) -> Result<String, ApiError> {
    debug!(token_url, "Requesting access token");

    let request = http
        .post(token_url)
        .form(&[("grant_type", "client_credentials")]);
    let response = AuthCredential::basic(client_id, secret)
        .apply_to_request(request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    diagnostics.note(format_args!("Access token result: {}{}", status, body));

    if status != StatusCode::OK {
        warn!(status = status.as_u16(), "Access token request rejected");
        return Err(ApiError::Auth {
            status,
            message: error_message(status, &body),
        });
    }

    let raw: TokenResponseRaw = serde_json::from_str(&body)
        .map_err(|e| ApiError::MalformedTokenResponse(e.to_string()))?;

    raw.access_token
        .ok_or_else(|| ApiError::MalformedTokenResponse("missing access_token".to_string()))
}
