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

//! Reqwest-based HTTP transport for xasset.
//!
//! `ReqwestHttpSend` implements the `HttpSend` trait from `xasset_core`. It
//! performs exactly one exchange per call and reports connect, DNS and timeout
//! failures as transport errors so the request executor can retry them.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::warn;
use reqwest::{Client, Request};
use std::time::Duration;
use xasset_core::{Error, HttpSend, Result};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default, Clone)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client with the given connect and total timeouts.
    ///
    /// `danger_accept_invalid_certs` turns off certificate and hostname
    /// verification for HTTPS endpoints. Only use it to reach deployments that
    /// can't present a valid certificate.
    pub fn with_timeouts(
        connect_timeout: Duration,
        timeout: Duration,
        danger_accept_invalid_certs: bool,
    ) -> Result<Self> {
        if danger_accept_invalid_certs {
            warn!("TLS certificate verification is disabled for this client");
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .danger_accept_invalid_certs(danger_accept_invalid_certs)
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::unexpected("failed to convert http request").with_source(e))?;
        let url = req.url().to_string();

        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport(format!("failed to send request to {url}: {e}")).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport(format!("failed to read response from {url}: {e}")).with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xasset_core::ErrorKind;

    #[tokio::test]
    async fn test_http_send() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xasset/horae/v1/query"))
            .and(header("host", "127.0.0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"errno":0}"#))
            .mount(&server)
            .await;

        let req = http::Request::post(format!("{}/xasset/horae/v1/query", server.uri()))
            .header("Host", "127.0.0.1")
            .body(Bytes::from("asset_id=1"))
            .unwrap();
        let resp = ReqwestHttpSend::default().http_send(req).await.unwrap();

        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body().as_ref(), br#"{"errno":0}"#);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let send = ReqwestHttpSend::with_timeouts(
            Duration::from_millis(100),
            Duration::from_millis(100),
            false,
        )
        .unwrap();
        let req = http::Request::get(server.uri()).body(Bytes::new()).unwrap();
        let err = send.http_send(req).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_connect_failure_is_transport_error() {
        let send = ReqwestHttpSend::with_timeouts(
            Duration::from_millis(200),
            Duration::from_millis(200),
            false,
        )
        .unwrap();
        // Port 9 (discard) is closed on test hosts.
        let req = http::Request::get("http://127.0.0.1:9/")
            .body(Bytes::new())
            .unwrap();
        let err = send.http_send(req).await.unwrap_err();

        assert!(err.is_retryable());
    }
}
