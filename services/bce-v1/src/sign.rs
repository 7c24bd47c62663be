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

use std::collections::HashSet;

use http::HeaderMap;
use http::Method;
use log::debug;
use once_cell::sync::Lazy;
use xasset_core::hash::hex_hmac_sha256;
use xasset_core::time::{format_iso8601, now, DateTime};
use xasset_core::{Error, Result, SigningCredential};

use crate::canonical::{canonical_headers, canonical_query_string, canonical_uri_path};
use crate::constants::*;
use crate::Credential;

/// Headers signed when no explicit allowlist is given, on top of every
/// `x-bce-` prefixed header.
static DEFAULT_HEADERS_TO_SIGN: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from(["host", "content-length", "content-type", "content-md5"])
});

/// Options of a single signing operation.
#[derive(Debug, Clone, Default)]
pub struct SignOptions {
    expiration_in_seconds: Option<u64>,
    timestamp: Option<DateTime>,
    headers_to_sign: Option<Vec<String>>,
}

impl SignOptions {
    /// Create options with every field left to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validity window, 1800 seconds if not set.
    pub fn with_expiration_in_seconds(mut self, expiration: u64) -> Self {
        self.expiration_in_seconds = Some(expiration);
        self
    }

    /// Sign with a fixed time instead of the current one.
    pub fn with_timestamp(mut self, timestamp: DateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Only sign the headers named here, compared case-insensitively.
    ///
    /// The names also get listed in the authorization string.
    pub fn with_headers_to_sign<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.headers_to_sign = Some(
            headers
                .into_iter()
                .map(|h| h.as_ref().trim().to_lowercase())
                .collect(),
        );
        self
    }

    /// Validity window used for signing.
    pub fn expiration_in_seconds(&self) -> u64 {
        self.expiration_in_seconds
            .unwrap_or(DEFAULT_EXPIRATION_IN_SECONDS)
    }

    /// Explicit allowlist of headers, if any.
    pub fn headers_to_sign(&self) -> Option<&[String]> {
        self.headers_to_sign.as_deref()
    }
}

/// Signer computes BCE v1 authorization strings.
#[derive(Debug, Clone)]
pub struct Signer {
    credential: Credential,
}

impl Signer {
    /// Create a signer with the given credential.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Credential used by this signer.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Compute the authorization string of a request.
    ///
    /// The output looks like
    /// `bce-auth-v1/{ak}/{timestamp}/{expiration}/{signedHeaders}/{signature}`.
    /// `signedHeaders` stays empty unless an explicit allowlist is set in
    /// `options`, even though the default header set is still signed.
    pub fn sign(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
        params: &[(String, Option<String>)],
        options: &SignOptions,
    ) -> Result<String> {
        if !self.credential.is_valid() {
            return Err(Error::credential_invalid(
                "access_key_id and secret_access_key must not be empty",
            ));
        }

        let timestamp = options.timestamp.unwrap_or_else(now);
        let auth_string_prefix = format!(
            "{}/{}/{}/{}",
            BCE_AUTH_VERSION,
            self.credential.access_key_id,
            format_iso8601(timestamp),
            options.expiration_in_seconds()
        );
        let signing_key = hex_hmac_sha256(
            self.credential.secret_access_key.as_bytes(),
            auth_string_prefix.as_bytes(),
        );

        let selected = select_headers(headers, options.headers_to_sign());
        let canonical_request = format!(
            "{}\n{}\n{}\n{}",
            method.as_str(),
            canonical_uri_path(path),
            canonical_query_string(params, true),
            canonical_headers(&selected)
        );
        debug!("calculated canonical request: {canonical_request:?}");

        let signature = hex_hmac_sha256(signing_key.as_bytes(), canonical_request.as_bytes());

        let signed_headers = if options.headers_to_sign().is_some() {
            let mut names = selected
                .iter()
                .map(|(k, _)| k.to_lowercase())
                .collect::<Vec<_>>();
            names.sort_unstable();
            names.dedup();
            names.join(";")
        } else {
            String::new()
        };

        Ok(format!("{auth_string_prefix}/{signed_headers}/{signature}"))
    }
}

/// Pick the headers that take part in the signature.
///
/// Headers whose trimmed value is empty never take part.
fn select_headers<'a>(
    headers: &'a HeaderMap,
    headers_to_sign: Option<&[String]>,
) -> Vec<(&'a str, &'a [u8])> {
    headers
        .iter()
        .filter(|(k, _)| match headers_to_sign {
            Some(allow) => allow.iter().any(|h| h == k.as_str()),
            None => {
                DEFAULT_HEADERS_TO_SIGN.contains(k.as_str()) || k.as_str().starts_with(BCE_PREFIX)
            }
        })
        .filter(|(_, v)| !v.as_bytes().trim_ascii().is_empty())
        .map(|(k, v)| (k.as_str(), v.as_bytes()))
        .collect()
}
