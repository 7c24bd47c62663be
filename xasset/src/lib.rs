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

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]

pub use xasset_core::*;

/// Request signing of the BCE authorization protocol.
pub mod bce {
    pub use xasset_bce_v1::*;
}

#[allow(missing_docs)]
pub mod constants;

mod account;
pub use account::Account;

mod config;
pub use config::Config;

mod nonce;
pub use nonce::gen_nonce;

mod key_material;
pub use key_material::{
    CliKeyMaterialProvider, KeyMaterialProvider, PemKeyMaterialProvider, StaticKeyMaterialProvider,
};

mod response;
pub use response::{Response, XASSET_ERRNO_SUCCESS};

mod request;
pub use request::{Form, RequestExecutor};

mod client;
pub use client::Client;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::default_context;
