//
//  bitbucket-build-status
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 build status endpoint.
//!
//! Statuses are addressed by repository and commit:
//!
//! ```text
//! POST {api}/repositories/{owner}/{repo_slug}/commit/{sha}/statuses/build
//! ```
//!
//! A first post for a key answers 201, an update answers 200.

use crate::api::ApiError;
use crate::config::normalize_endpoint;

/// Checks that `repo` has the `owner/repo-slug` shape.
///
/// # Example
///
/// ```rust
/// use bitbucket_build_status::api::cloud::validate_repo;
///
/// assert!(validate_repo("myorg/myrepo").is_ok());
/// assert!(validate_repo("myrepo").is_err());
/// assert!(validate_repo("a/b/c").is_err());
/// ```
pub fn validate_repo(repo: &str) -> Result<(), ApiError> {
    match repo.split_once('/') {
        Some((owner, slug)) if !owner.is_empty() && !slug.is_empty() && !slug.contains('/') => {
            Ok(())
        }
        _ => Err(ApiError::InvalidRepo(repo.to_string())),
    }
}

/// Builds the Cloud build status URL.
pub fn build_status_url(api_base: &str, repo: &str, commit_sha: &str) -> String {
    format!(
        "{}/repositories/{}/commit/{}/statuses/build",
        normalize_endpoint(api_base),
        repo,
        commit_sha
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BITBUCKET_CLOUD_API;

    #[test]
    fn test_build_status_url() {
        assert_eq!(
            build_status_url(BITBUCKET_CLOUD_API, "myorg/myrepo", "abc123"),
            "https://api.bitbucket.org/2.0/repositories/myorg/myrepo/commit/abc123/statuses/build"
        );
    }

    #[test]
    fn test_validate_repo_rejects_empty_parts() {
        assert!(validate_repo("/repo").is_err());
        assert!(validate_repo("owner/").is_err());
        assert!(validate_repo("").is_err());
    }
}
