//
//  bitbucket-build-status
//  cli/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Access token command.
//!
//! Prints a Bitbucket Cloud access token to stdout so that scripts can
//! capture it once and reuse it for several `set` calls:
//!
//! ```bash
//! export BB_STATUS_ACCESS_TOKEN=$(bb-status token --client-id "$KEY" --client-secret "$SECRET")
//! ```

use anyhow::Result;
use clap::Args;

use crate::api::ApiError;

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct TokenCommand {
    /// OAuth consumer key
    #[arg(long, env = "BB_STATUS_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth consumer secret
    #[arg(long, env = "BB_STATUS_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
}

impl TokenCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;

        let client_id = self
            .client_id
            .clone()
            .or_else(|| config.cloud.client_id.clone())
            .ok_or_else(|| ApiError::MissingField("--client-id".to_string()))?;
        let client_secret = self
            .client_secret
            .clone()
            .ok_or_else(|| ApiError::MissingField("--client-secret".to_string()))?;

        let reporter = global.reporter(&config)?;
        let token = reporter
            .request_access_token(&client_id, &client_secret)
            .await?;

        println!("{}", token);
        Ok(())
    }
}
