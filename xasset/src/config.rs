// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use serde::Deserialize;
use xasset_core::utils::Redact;
use xasset_core::{Context, Error, Result};

use crate::constants::*;

/// Config carries everything needed to build a [`crate::Client`].
///
/// The value is handed to the client once. Build a new client to change it.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `XASSET_ENDPOINT`
    /// - default to `http://120.48.16.137:8360`
    #[serde(alias = "api_domain")]
    pub endpoint: Option<String>,
    /// `app_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `XASSET_APP_ID`
    pub app_id: Option<String>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `XASSET_ACCESS_KEY_ID`
    #[serde(alias = "ak")]
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `XASSET_SECRET_ACCESS_KEY`
    #[serde(alias = "sk")]
    pub secret_access_key: Option<String>,
    /// `user_agent` defaults to `xasset-sdk-rust`.
    pub user_agent: Option<String>,
    /// Connect timeout in milliseconds, non-positive values mean 1000.
    pub connect_timeout_ms: Option<i64>,
    /// Total timeout of one attempt in milliseconds, non-positive values mean 3000.
    pub read_timeout_ms: Option<i64>,
    /// Skip TLS certificate and hostname verification.
    ///
    /// Only meant for reaching deployments without a valid certificate.
    pub danger_accept_invalid_certs: bool,
    /// `cli_path` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: `XASSET_CLI_PATH`
    /// - default to the platform binary name, see
    ///   [`crate::CliKeyMaterialProvider::binary_for`]
    pub cli_path: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("app_id", &self.app_id)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("user_agent", &self.user_agent)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .field(
                "danger_accept_invalid_certs",
                &self.danger_accept_invalid_certs,
            )
            .field("cli_path", &self.cli_path)
            .finish()
    }
}

impl Config {
    /// Set the service endpoint, like `http://120.48.16.137:8360`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the application id.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the access key pair.
    pub fn with_credential(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the connect timeout in milliseconds.
    pub fn with_connect_timeout_ms(mut self, ms: i64) -> Self {
        self.connect_timeout_ms = Some(ms);
        self
    }

    /// Set the total timeout of one attempt in milliseconds.
    pub fn with_read_timeout_ms(mut self, ms: i64) -> Self {
        self.read_timeout_ms = Some(ms);
        self
    }

    /// Accept invalid TLS certificates.
    pub fn with_danger_accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.danger_accept_invalid_certs = enabled;
        self
    }

    /// Set the path of the xasset CLI binary.
    pub fn with_cli_path(mut self, path: impl Into<String>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(XASSET_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(XASSET_APP_ID) {
            self.app_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(XASSET_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(XASSET_SECRET_ACCESS_KEY) {
            self.secret_access_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(XASSET_CLI_PATH) {
            self.cli_path.get_or_insert(v);
        }

        self
    }

    /// Parse config from a TOML document.
    ///
    /// `api_domain`, `ak` and `sk` are accepted as aliases of `endpoint`,
    /// `access_key_id` and `secret_access_key`.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::config_invalid("failed to parse xasset config").with_source(e))
    }

    /// Load config from a TOML file, `~` is expanded to the home dir.
    pub async fn from_file(ctx: &Context, path: &str) -> Result<Self> {
        let path = ctx.expand_home_dir(path).ok_or_else(|| {
            Error::config_invalid(format!("failed to expand home dir of {path}"))
        })?;
        let content = ctx.file_read_as_string(&path).await?;

        Self::from_toml(&content)
    }

    /// Endpoint of the service, without trailing `/`.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Connect timeout of the transport.
    pub fn connect_timeout(&self) -> Duration {
        timeout_or(self.connect_timeout_ms, DEFAULT_CONNECT_TIMEOUT_MS)
    }

    /// Total timeout of one attempt.
    pub fn read_timeout(&self) -> Duration {
        timeout_or(self.read_timeout_ms, DEFAULT_READ_TIMEOUT_MS)
    }
}

fn timeout_or(ms: Option<i64>, default: u64) -> Duration {
    match ms {
        Some(v) if v > 0 => Duration::from_millis(v as u64),
        _ => Duration::from_millis(default),
    }
}
