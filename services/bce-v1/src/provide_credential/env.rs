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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use log::debug;
use xasset_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the access key pair from environment variables.
///
/// This provider looks for `XASSET_ACCESS_KEY_ID` and `XASSET_SECRET_ACCESS_KEY`,
/// falling back to the short `XASSET_AK` and `XASSET_SK` names. Both halves
/// must be present and non-empty.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let lookup = |long: &str, short: &str| {
            ctx.env_var(long)
                .filter(|v| !v.is_empty())
                .or_else(|| ctx.env_var(short).filter(|v| !v.is_empty()))
        };

        match (
            lookup(XASSET_ACCESS_KEY_ID, XASSET_AK),
            lookup(XASSET_SECRET_ACCESS_KEY, XASSET_SK),
        ) {
            (Some(ak), Some(sk)) => Ok(Some(Credential::new(ak, sk))),
            _ => {
                debug!("no xasset access key pair found in env");
                Ok(None)
            }
        }
    }
}
