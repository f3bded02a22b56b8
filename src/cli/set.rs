//
//  bitbucket-build-status
//  cli/set.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Build status command.
//!
//! ## Examples
//!
//! ```bash
//! # Bitbucket Cloud, token obtained on the fly
//! bb-status set --driver "Bitbucket Cloud" --repo myorg/myrepo \
//!     --commit "$GIT_COMMIT" --state SUCCESSFUL --key ci --url "$BUILD_URL" \
//!     --client-id "$KEY" --client-secret "$SECRET"
//!
//! # Bitbucket Server with a self-signed certificate
//! bb-status set --driver "Bitbucket Server" --endpoint https://git.example.com \
//!     --username ci --password "$PASS" --no-verify-ssl \
//!     --commit "$GIT_COMMIT" --state FAILED --key ci --url "$BUILD_URL"
//! ```
//!
//! The driver and every value it needs are checked before the first
//! request, so a misconfigured job fails without touching the network.

use anyhow::Result;
use clap::Args;
use console::style;

use crate::api::{ApiError, BuildStatusRequest, Driver, StatusReporter, Target};
use crate::config::Config;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct SetCommand {
    /// "Bitbucket Server" or "Bitbucket Cloud"
    #[arg(long, env = "BB_STATUS_DRIVER")]
    pub driver: Option<String>,

    /// Repository as OWNER/REPO-SLUG (Cloud only)
    #[arg(long, short = 'R', env = "BB_STATUS_REPO")]
    pub repo: Option<String>,

    /// Commit SHA the status belongs to
    #[arg(long, short = 'c', env = "BB_STATUS_COMMIT")]
    pub commit: String,

    /// Build state, e.g. SUCCESSFUL, FAILED, INPROGRESS, STOPPED
    #[arg(long, short = 's')]
    pub state: String,

    /// Key identifying the build; reposting a key updates its status
    #[arg(long, short = 'k')]
    pub key: Option<String>,

    /// Display name of the build (defaults to the key)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Link to the build results
    #[arg(long, short = 'u', env = "BB_STATUS_BUILD_URL")]
    pub url: String,

    /// Description shown next to the status
    #[arg(long, default_value = "")]
    pub description: String,

    /// OAuth access token (Cloud)
    #[arg(long, env = "BB_STATUS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// OAuth consumer key, used when no access token is given (Cloud)
    #[arg(long, env = "BB_STATUS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth consumer secret, used when no access token is given (Cloud)
    #[arg(long, env = "BB_STATUS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Base URL of the instance (Server)
    #[arg(long, env = "BB_STATUS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Username for Basic auth (Server)
    #[arg(long, env = "BB_STATUS_USERNAME")]
    pub username: Option<String>,

    /// Password for Basic auth (Server)
    #[arg(long, env = "BB_STATUS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate validation (Server)
    #[arg(long)]
    pub no_verify_ssl: bool,
}

impl SetCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let driver = self.driver(&config)?;
        let request = self.build_request(driver, &config)?;

        // Server fields are validated before any request; Cloud may need a
        // token exchange first.
        let server_target = match driver {
            Driver::BitbucketServer => Some(self.server_target(&config)?),
            Driver::BitbucketCloud => None,
        };

        let reporter = global.reporter(&config)?;
        let target = match server_target {
            Some(target) => target,
            None => Target::cloud(self.access_token(&reporter, &config).await?),
        };

        reporter.set_build_status(&target, &request).await?;

        println!(
            "{} {} status '{}' posted for {}",
            style("✓").green(),
            request.state,
            request.key,
            short_sha(&request.commit_sha)
        );
        Ok(())
    }

    fn driver(&self, config: &Config) -> Result<Driver, ApiError> {
        self.driver
            .as_deref()
            .or(config.driver.as_deref())
            .ok_or_else(|| ApiError::MissingField("--driver".to_string()))?
            .parse()
    }

    fn build_request(&self, driver: Driver, config: &Config) -> Result<BuildStatusRequest, ApiError> {
        let key = self
            .key
            .clone()
            .or_else(|| config.status.key.clone())
            .ok_or_else(|| ApiError::MissingField("--key".to_string()))?;
        let name = self
            .name
            .clone()
            .or_else(|| config.status.name.clone())
            .unwrap_or_else(|| key.clone());

        let repo = match driver {
            Driver::BitbucketCloud => {
                let repo = self.repo.clone().ok_or_else(|| {
                    ApiError::MissingField(format!("--repo (required for {})", driver))
                })?;
                crate::api::cloud::validate_repo(&repo)?;
                repo
            }
            Driver::BitbucketServer => self.repo.clone().unwrap_or_default(),
        };

        Ok(BuildStatusRequest::new(repo, &self.commit, &self.state, key)
            .with_name(name)
            .with_url(&self.url)
            .with_description(&self.description))
    }

    fn server_target(&self, config: &Config) -> Result<Target, ApiError> {
        let verify_ssl = !self.no_verify_ssl && config.server.verify_ssl;
        Target::from_parts(
            Driver::BitbucketServer,
            None,
            self.endpoint.clone().or_else(|| config.server.endpoint.clone()),
            self.username.clone().or_else(|| config.server.username.clone()),
            self.password.clone(),
            verify_ssl,
        )
    }

    async fn access_token(
        &self,
        reporter: &StatusReporter,
        config: &Config,
    ) -> Result<String, ApiError> {
        if let Some(token) = &self.access_token {
            return Ok(token.clone());
        }

        let client_id = self.client_id.clone().or_else(|| config.cloud.client_id.clone());
        match (client_id, self.client_secret.as_deref()) {
            (Some(client_id), Some(secret)) => {
                reporter.request_access_token(&client_id, secret).await
            }
            _ => Err(ApiError::MissingField(
                "--access-token, or --client-id and --client-secret (required for Bitbucket Cloud)"
                    .to_string(),
            )),
        }
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Command, CommandFactory, FromArgMatches};

    use crate::cli::{Cli, Commands};

    /// Drops every `env` fallback so the caller's environment cannot leak in.
    fn without_env(cmd: Command) -> Command {
        let ids: Vec<_> = cmd.get_arguments().map(|arg| arg.get_id().clone()).collect();
        ids.into_iter()
            .fold(cmd, |cmd, id| cmd.mut_arg(id, |arg| arg.env(None::<&'static str>)))
    }

    fn parse(args: &[&str]) -> SetCommand {
        let mut argv = vec!["bb-status", "set"];
        argv.extend_from_slice(args);
        let cmd = without_env(Cli::command()).mut_subcommand("set", without_env);
        let matches = cmd.try_get_matches_from(argv).unwrap();
        match Cli::from_arg_matches(&matches).unwrap().command {
            Commands::Set(cmd) => cmd,
            other => panic!("unexpected command {:?}", other),
        }
    }

    const BASE: [&str; 8] = [
        "--commit", "abc123", "--state", "SUCCESSFUL", "--key", "ci", "--url", "https://ci/1",
    ];

    #[test]
    fn test_driver_from_config() {
        let cmd = parse(&BASE);
        let config = Config {
            driver: Some("Bitbucket Server".to_string()),
            ..Default::default()
        };
        assert_eq!(cmd.driver(&config).unwrap(), Driver::BitbucketServer);
    }

    #[test]
    fn test_invalid_driver() {
        let mut args = BASE.to_vec();
        args.extend(["--driver", "GitHub"]);
        let cmd = parse(&args);
        assert!(matches!(
            cmd.driver(&Config::default()),
            Err(ApiError::InvalidDriver(d)) if d == "GitHub"
        ));
    }

    #[test]
    fn test_cloud_request_needs_repo() {
        let cmd = parse(&BASE);
        let err = cmd
            .build_request(Driver::BitbucketCloud, &Config::default())
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_name_defaults_to_key() {
        let mut args = BASE.to_vec();
        args.extend(["--repo", "myorg/myrepo"]);
        let request = parse(&args)
            .build_request(Driver::BitbucketCloud, &Config::default())
            .unwrap();
        assert_eq!(request.name, "ci");
        assert_eq!(request.description, "");
        assert_eq!(request.repo, "myorg/myrepo");
    }

    #[test]
    fn test_no_verify_ssl_flag() {
        let mut args = BASE.to_vec();
        args.extend([
            "--endpoint",
            "https://git.example.com",
            "--username",
            "ci",
            "--password",
            "pw",
            "--no-verify-ssl",
        ]);
        let target = parse(&args).server_target(&Config::default()).unwrap();
        assert!(!target.verify_ssl());
    }

    #[test]
    fn test_parse_helper_ignores_environment() {
        let mut cmd = without_env(Cli::command()).mut_subcommand("set", without_env);
        cmd.build();
        let set = cmd.find_subcommand("set").unwrap();
        assert!(set.get_arguments().any(|arg| arg.get_id() == "repo"));
        assert!(set.get_arguments().all(|arg| arg.get_env().is_none()));
        assert!(Cli::command()
            .find_subcommand("set")
            .unwrap()
            .get_arguments()
            .any(|arg| arg.get_env().is_some()));
    }

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_sha("abc"), "abc");
    }
}
