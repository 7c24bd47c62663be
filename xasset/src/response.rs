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

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use xasset_core::{Error, Result, CLIENT_ERRNO_RESP_ERR};

/// Errno returned by the service on success.
pub const XASSET_ERRNO_SUCCESS: i64 = 0;

/// Response is the envelope of every successful exchange with the service.
///
/// A non-zero `errno` is a business level result and still comes back as a
/// `Response`; check [`Response::is_success`] before using the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Full url of the request, query included.
    pub url: String,
    /// Decoded JSON body, always an object carrying `errno`.
    pub response: Value,
    /// Failed attempts before this response arrived.
    pub req_times: usize,
}

impl Response {
    /// Errno of the service.
    ///
    /// Numeric strings are accepted. Anything else yields `3005`.
    pub fn errno(&self) -> i64 {
        match &self.response["errno"] {
            Value::Number(n) => n.as_i64().unwrap_or(CLIENT_ERRNO_RESP_ERR),
            Value::String(s) => s.parse().unwrap_or(CLIENT_ERRNO_RESP_ERR),
            _ => CLIENT_ERRNO_RESP_ERR,
        }
    }

    /// Error message of the service, empty if not present.
    pub fn errmsg(&self) -> &str {
        self.response["errmsg"].as_str().unwrap_or_default()
    }

    /// Check if the service reported success.
    pub fn is_success(&self) -> bool {
        self.errno() == XASSET_ERRNO_SUCCESS
    }

    /// Request id assigned by the service.
    pub fn request_id(&self) -> Option<&str> {
        self.response["request_id"].as_str()
    }

    /// Decode the JSON body into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.response.clone()).map_err(|e| {
            Error::response_format(format!("failed to decode response of {}", self.url))
                .with_source(e)
        })
    }
}
