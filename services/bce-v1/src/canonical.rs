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

//! Canonicalization helpers of the BCE signing protocol.
//!
//! All encoders work on raw bytes: a multi-byte character is encoded byte by
//! byte with uppercase hex digits, which is what the verifying service
//! recomputes.

use percent_encoding::percent_decode_str;
use percent_encoding::percent_encode;

use crate::constants::{AUTHORIZATION, BCE_PATH_ENCODE_SET, BCE_URI_ENCODE_SET};

/// Percent-encode every byte except the unreserved characters `A-Za-z0-9-._~`.
///
/// ```
/// use xasset_bce_v1::canonical::url_encode;
///
/// assert_eq!(url_encode("a b/c"), "a%20b%2Fc");
/// ```
pub fn url_encode(value: impl AsRef<[u8]>) -> String {
    percent_encode(value.as_ref(), &BCE_URI_ENCODE_SET).to_string()
}

/// Same as [`url_encode`], but `/` is kept literal.
///
/// Equivalent to encoding everything and turning `%2F` back into `/`. A
/// pre-existing `//` is kept as is and not escaped into `/%2F`.
pub fn url_encode_except_slash(path: impl AsRef<[u8]>) -> String {
    percent_encode(path.as_ref(), &BCE_PATH_ENCODE_SET).to_string()
}

/// Build the canonical URI of a request path.
///
/// An empty path becomes `/`, and a path without a leading `/` gets one.
pub fn canonical_uri_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        url_encode_except_slash(path)
    } else {
        format!("/{}", url_encode_except_slash(path))
    }
}

/// Build the canonical query string.
///
/// Keys and values are encoded independently and joined as `key=value`.
/// Parameters without value are written as `key` or, when
/// `for_signature` is set, as `key=`. The encoded pairs are sorted
/// lexicographically and joined with `&`. When `for_signature` is set a
/// parameter named `Authorization` (in any case) is skipped.
pub fn canonical_query_string(params: &[(String, Option<String>)], for_signature: bool) -> String {
    let mut pairs = params
        .iter()
        .filter(|(k, _)| !(for_signature && k.eq_ignore_ascii_case(AUTHORIZATION)))
        .map(|(k, v)| match v {
            Some(v) => format!("{}={}", url_encode(k), url_encode(v)),
            None if for_signature => format!("{}=", url_encode(k)),
            None => url_encode(k),
        })
        .collect::<Vec<_>>();
    pairs.sort_unstable();

    pairs.join("&")
}

/// Parse a query string built by [`canonical_query_string`] back into pairs.
///
/// `key` yields `(key, None)` while `key=` yields `(key, Some(""))`.
pub fn parse_query_string(query: &str) -> Vec<(String, Option<String>)> {
    if query.is_empty() {
        return Vec::new();
    }

    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (percent_decode(k), Some(percent_decode(v))),
            None => (percent_decode(pair), None),
        })
        .collect()
}

fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Build the canonical header block.
///
/// Each header is written as `url_encode(lowercase(trim(name))):url_encode(trim(value))`,
/// lines are sorted and joined with `\n`. An empty input yields an empty string.
pub fn canonical_headers(headers: &[(&str, &[u8])]) -> String {
    let mut lines = headers
        .iter()
        .map(|(k, v)| {
            format!(
                "{}:{}",
                url_encode(k.trim().to_lowercase()),
                url_encode(v.trim_ascii())
            )
        })
        .collect::<Vec<_>>();
    lines.sort_unstable();

    lines.join("\n")
}
