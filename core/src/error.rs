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

use std::fmt;
use thiserror::Error;

/// The error type for xasset operations
#[derive(Error, Debug)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied arguments failed a precondition, no I/O happened
    ParamInvalid,

    /// Credentials are missing or malformed
    CredentialInvalid,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Connection, DNS, timeout or non-2xx failure of a single attempt
    Transport,

    /// Every attempt of a retried request failed at the transport level
    RetryExhausted,

    /// The service answered, but the body is not a JSON envelope with `errno`
    ResponseFormat,

    /// The key material collaborator failed to create an account or sign
    KeyMaterial,

    /// Unexpected errors (I/O, encoding, etc.)
    Unexpected,
}

/// Client error number for invalid parameters.
pub const CLIENT_ERRNO_PARAM_ERR: i64 = 40001;
/// Client error number for transport failures.
pub const CLIENT_ERRNO_CURL_ERR: i64 = 3004;
/// Client error number for malformed responses.
pub const CLIENT_ERRNO_RESP_ERR: i64 = 3005;
/// Client error number for every other client side failure.
pub const CLIENT_ERRNO_INTERNAL_ERR: i64 = 3000;

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Numeric client error code, compatible with the other xasset SDKs.
    pub fn code(&self) -> i64 {
        match self.kind {
            ErrorKind::ParamInvalid => CLIENT_ERRNO_PARAM_ERR,
            ErrorKind::Transport | ErrorKind::RetryExhausted => CLIENT_ERRNO_CURL_ERR,
            ErrorKind::ResponseFormat => CLIENT_ERRNO_RESP_ERR,
            _ => CLIENT_ERRNO_INTERNAL_ERR,
        }
    }

    /// Check if another attempt of the same request may succeed.
    ///
    /// Only transport failures qualify. A response that arrived but can't be
    /// understood is never retried.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Transport
    }
}

// Convenience constructors
impl Error {
    /// Create a param invalid error
    pub fn param_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParamInvalid, message)
    }

    /// Create a credential invalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialInvalid, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create a retry exhausted error
    pub fn retry_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RetryExhausted, message)
    }

    /// Create a response format error
    pub fn response_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResponseFormat, message)
    }

    /// Create a key material error
    pub fn key_material(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeyMaterial, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ParamInvalid => write!(f, "invalid parameter"),
            ErrorKind::CredentialInvalid => write!(f, "invalid credentials"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Transport => write!(f, "transport failure"),
            ErrorKind::RetryExhausted => write!(f, "retries exhausted"),
            ErrorKind::ResponseFormat => write!(f, "malformed response"),
            ErrorKind::KeyMaterial => write!(f, "key material failure"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::param_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
