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

use async_trait::async_trait;
use log::debug;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;
use p256::SecretKey;
use std::fmt::Debug;
use xasset_core::hash::hex_hmac_sha256;
use xasset_core::{CommandOutput, Context, Error, Result};

use crate::Account;

/// KeyMaterialProvider creates accounts and signs messages with their private keys.
///
/// Implementations must not touch the request signing path: they only
/// produce the `sign` field of account signed requests.
#[async_trait]
pub trait KeyMaterialProvider: Debug + Send + Sync + 'static {
    /// Create a new account.
    async fn create_account(&self, ctx: &Context) -> Result<Account>;

    /// Sign `message` with `private_key`, returning a hex encoded ECDSA signature.
    async fn sign(&self, ctx: &Context, private_key: &str, message: &str) -> Result<String>;
}

/// CliKeyMaterialProvider runs the xasset CLI through the context's command executor.
#[derive(Debug, Clone)]
pub struct CliKeyMaterialProvider {
    binary: String,
}

impl Default for CliKeyMaterialProvider {
    fn default() -> Self {
        Self::new(Self::binary_for(std::env::consts::OS))
    }
}

impl CliKeyMaterialProvider {
    /// Create a provider running the CLI binary at `binary`.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Name of the CLI binary shipped for the given `std::env::consts::OS` value.
    pub fn binary_for(os: &str) -> &'static str {
        match os {
            "windows" => "xasset-cli-win",
            "macos" => "xasset-cli-mac",
            _ => "xasset-cli-linux",
        }
    }

    /// Path of the CLI binary.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn run(&self, ctx: &Context, args: &[&str]) -> Result<String> {
        debug!("running xasset cli {} {}", self.binary, args[0]);

        let output = ctx.command_execute(&self.binary, args).await?;
        if !output.success() {
            return Err(Error::key_material(format!(
                "xasset cli exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        last_line(&output)
            .ok_or_else(|| Error::key_material("xasset cli returned empty output"))
    }
}

/// The CLI may print progress first, the result is on the last line.
fn last_line(output: &CommandOutput) -> Option<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
}

#[async_trait]
impl KeyMaterialProvider for CliKeyMaterialProvider {
    async fn create_account(&self, ctx: &Context) -> Result<Account> {
        let line = self
            .run(ctx, &["account", "create", "-l", "1", "-s", "1", "-f", "std"])
            .await?;

        let account: Account = serde_json::from_str(&line).map_err(|e| {
            Error::key_material("xasset cli returned an invalid account").with_source(e)
        })?;
        if !account.is_valid() {
            return Err(Error::key_material("xasset cli returned an incomplete account"));
        }

        Ok(account)
    }

    async fn sign(&self, ctx: &Context, private_key: &str, message: &str) -> Result<String> {
        self.run(
            ctx,
            &["sign", "ecdsa", "-k", private_key, "-m", message, "-f", "std"],
        )
        .await
    }
}

/// StaticKeyMaterialProvider hands out a fixed account and signs deterministically.
///
/// The signature is the hex HMAC-SHA256 of the message keyed by the private
/// key. It is not accepted by the service and only fits tests and dry runs.
#[derive(Debug, Clone)]
pub struct StaticKeyMaterialProvider {
    account: Account,
}

impl StaticKeyMaterialProvider {
    /// Create a provider returning `account`.
    pub fn new(account: Account) -> Self {
        Self { account }
    }
}

#[async_trait]
impl KeyMaterialProvider for StaticKeyMaterialProvider {
    async fn create_account(&self, _: &Context) -> Result<Account> {
        Ok(self.account.clone())
    }

    async fn sign(&self, _: &Context, private_key: &str, message: &str) -> Result<String> {
        if private_key.is_empty() {
            return Err(Error::key_material("private key is empty"));
        }

        Ok(hex_hmac_sha256(private_key.as_bytes(), message.as_bytes()))
    }
}

/// PemKeyMaterialProvider signs in process with a P-256 private key in PEM.
///
/// Both PKCS#8 (`BEGIN PRIVATE KEY`) and SEC1 (`BEGIN EC PRIVATE KEY`) are
/// accepted. The signature is ECDSA over SHA-256, DER encoded then hex
/// encoded. Accounts can't be created this way.
#[derive(Debug, Clone, Copy, Default)]
pub struct PemKeyMaterialProvider;

impl PemKeyMaterialProvider {
    /// Create a new provider.
    pub fn new() -> Self {
        Self
    }

    fn signing_key(pem: &str) -> Result<SigningKey> {
        let secret = SecretKey::from_pkcs8_pem(pem)
            .or_else(|_| SecretKey::from_sec1_pem(pem))
            .map_err(|e| Error::key_material("invalid PEM private key").with_source(e))?;

        Ok(SigningKey::from(secret))
    }
}

#[async_trait]
impl KeyMaterialProvider for PemKeyMaterialProvider {
    async fn create_account(&self, _: &Context) -> Result<Account> {
        Err(Error::key_material(
            "creating accounts needs the xasset cli, PEM keys can only sign",
        ))
    }

    async fn sign(&self, _: &Context, private_key: &str, message: &str) -> Result<String> {
        let key = Self::signing_key(private_key)?;
        let signature: Signature = key.sign(message.as_bytes());

        Ok(hex::encode(signature.to_der().as_bytes()))
    }
}
