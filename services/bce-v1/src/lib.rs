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

//! Signer of the BCE v1 authorization protocol used by the xasset service.
//!
//! ## Overview
//!
//! Every xasset request carries an `Authorization` header of the form
//! `bce-auth-v1/{ak}/{timestamp}/{expiration}/{signedHeaders}/{signature}`.
//! The signature is an HMAC-SHA256 over a canonical form of the request,
//! keyed by a per-request signing key derived from the secret access key.
//!
//! ## Quick Start
//!
//! ```
//! use http::{HeaderMap, HeaderValue, Method};
//! use xasset_bce_v1::{Credential, SignOptions, Signer};
//!
//! # fn main() -> xasset_core::Result<()> {
//! let signer = Signer::new(Credential::new("my-ak", "my-sk"));
//!
//! let mut headers = HeaderMap::new();
//! headers.insert("host", HeaderValue::from_static("120.48.16.137"));
//!
//! let auth = signer.sign(
//!     &Method::POST,
//!     "/xasset/horae/v1/query",
//!     &headers,
//!     &[],
//!     &SignOptions::new().with_headers_to_sign(["host"]),
//! )?;
//! assert!(auth.starts_with("bce-auth-v1/my-ak/"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Credential Sources
//!
//! - [`StaticCredentialProvider`]: a fixed access key pair
//! - [`EnvCredentialProvider`]: `XASSET_ACCESS_KEY_ID` and `XASSET_SECRET_ACCESS_KEY`
//! - [`DefaultCredentialProvider`]: a chain over the providers above

#![warn(missing_docs)]

mod constants;
pub use constants::DEFAULT_EXPIRATION_IN_SECONDS;

pub mod canonical;

mod credential;
pub use credential::Credential;

mod sign;
pub use sign::SignOptions;
pub use sign::Signer;

mod provide_credential;
pub use provide_credential::*;
