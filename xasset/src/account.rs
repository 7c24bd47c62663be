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

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use xasset_core::utils::Redact;

/// Account is a blockchain key pair together with its address.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Address derived from the public key.
    pub address: String,
    /// Public key, sent as `pkey` with signed requests.
    pub public_key: String,
    /// Private key, never leaves the client.
    pub private_key: String,
}

impl Account {
    /// Create an account from its parts.
    pub fn new(
        address: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// An account is usable only when every part is present.
    pub fn is_valid(&self) -> bool {
        !self.address.is_empty() && !self.public_key.is_empty() && !self.private_key.is_empty()
    }
}

impl Debug for Account {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("private_key", &Redact::from(&self.private_key))
            .finish()
    }
}
