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

//! Core components for the xasset client SDK.
//!
//! This crate provides the foundational types and traits shared by the xasset
//! signer and client crates.
//!
//! ## Overview
//!
//! The crate is built around a few key concepts:
//!
//! - **Context**: A container that holds implementations for file reading, HTTP sending,
//!   command execution and environment access
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`) and
//!   credential validation (`SigningCredential`)
//! - **Error**: A single error type whose [`ErrorKind`] tells callers whether a failure
//!   came from their parameters, the transport, or the service response
//!
//! ## Example
//!
//! ```no_run
//! use xasset_core::{Context, ProvideCredential, SigningCredential, Result};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyLoader;
//!
//! #[async_trait]
//! impl ProvideCredential for MyLoader {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let cred = MyLoader.provide_credential(&ctx).await?;
//! assert!(cred.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Traits
//!
//! - [`FileRead`]: For asynchronous file reading
//! - [`HttpSend`]: For sending HTTP requests
//! - [`CommandExecute`]: For running external programs
//! - [`Env`]: For environment variable access
//! - [`ProvideCredential`]: For loading credentials from various sources
//! - [`SigningCredential`]: For validating credentials
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC helpers
//! - [`time`]: Time formatting helpers
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::CommandExecute;
pub use context::CommandOutput;
pub use context::Context;
pub use context::Env;
pub use context::FileRead;
pub use context::HttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SigningCredential};

mod error;
pub use error::{Error, ErrorKind, Result};
pub use error::{
    CLIENT_ERRNO_CURL_ERR, CLIENT_ERRNO_INTERNAL_ERR, CLIENT_ERRNO_PARAM_ERR,
    CLIENT_ERRNO_RESP_ERR,
};
