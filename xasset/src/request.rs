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

//! Signed request pipeline: one attempt in [`RequestExecutor::request`],
//! bounded back-to-back retries in [`RequestExecutor::request_with_retry`].

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use log::{debug, warn};
use serde_json::Value;
use xasset_bce_v1::canonical::url_encode;
use xasset_bce_v1::{Credential, SignOptions, Signer};
use xasset_core::time::now;
use xasset_core::{Context, Error, ProvideCredential, Result, SigningCredential};

use crate::constants::*;
use crate::Response;

/// Form holds ordered `key=value` pairs for a query string or a request body.
///
/// Encoding keeps insertion order and percent-encodes keys and values with
/// the same unreserved set the signer uses, so spaces become `%20`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Form(Vec<(String, String)>);

impl Form {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a field if `value` is set.
    pub fn push_opt(self, key: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// Check if the form has no field.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// RequestExecutor signs and sends requests to the xasset service.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    ctx: Context,
    endpoint: String,
    host: String,
    user_agent: String,
    loader: Arc<dyn ProvideCredential<Credential = Credential>>,
    credential: Arc<Mutex<Option<Credential>>>,
}

impl RequestExecutor {
    /// Create an executor sending requests to `endpoint` through `ctx`.
    ///
    /// `endpoint` must be an absolute url like `http://120.48.16.137:8360`.
    pub fn new(
        ctx: Context,
        endpoint: &str,
        loader: impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let uri: Uri = endpoint.parse()?;
        let host = uri
            .host()
            .ok_or_else(|| Error::config_invalid(format!("endpoint {endpoint} has no host")))?
            .to_string();

        Ok(Self {
            ctx,
            endpoint,
            host,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            loader: Arc::new(loader),
            credential: Arc::new(Mutex::new(None)),
        })
    }

    /// Set the user agent sent with every request.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn load_credential(&self) -> Result<Credential> {
        let cached = self.credential.lock().expect("lock poisoned").clone();
        if let Some(cred) = cached.filter(|c| c.is_valid()) {
            return Ok(cred);
        }

        let cred = self
            .loader
            .provide_credential(&self.ctx)
            .await?
            .filter(|c| c.is_valid())
            .ok_or_else(|| Error::credential_invalid("no valid xasset credential found"))?;
        *self.credential.lock().expect("lock poisoned") = Some(cred.clone());

        Ok(cred)
    }

    /// Send one signed request.
    ///
    /// The method is `GET` for an empty body and `POST` otherwise. A JSON
    /// object carrying `errno` is returned whatever the status. Transport
    /// failures, empty bodies and non-2xx statuses without such a body are
    /// `Transport` errors. A 2xx body that is not a JSON object carrying
    /// `errno` is a `ResponseFormat` error.
    pub async fn request(&self, path: &str, params: &Form, body: &Form) -> Result<Response> {
        let method = if body.is_empty() {
            Method::GET
        } else {
            Method::POST
        };
        let time = now();

        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_str(&self.host)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
        headers.insert(
            HeaderName::from_static(TIMESTAMP),
            HeaderValue::from_str(&time.timestamp().to_string())?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);

        // Query params are signed in their encoded form.
        let signed_params = params
            .pairs()
            .iter()
            .map(|(k, v)| (url_encode(k), Some(url_encode(v))))
            .collect::<Vec<_>>();
        let authorization = Signer::new(self.load_credential().await?).sign(
            &method,
            path,
            &headers,
            &signed_params,
            &SignOptions::new()
                .with_timestamp(time)
                .with_headers_to_sign(["host"]),
        )?;
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);

        let mut url = format!("{}{}", self.endpoint, path);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.encode());
        }
        let payload = if method == Method::POST {
            Bytes::from(body.encode())
        } else {
            Bytes::new()
        };

        let mut req = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .body(payload)?;
        *req.headers_mut() = headers;

        debug!("sending {} {url}", req.method());
        let resp = self.ctx.http_send(req).await?;

        let status = resp.status();
        let body = resp.into_body();
        if body.is_empty() {
            return Err(Error::transport(format!(
                "empty response from {url} with status {status}"
            )));
        }

        // An envelope carrying errno is the service's answer whatever the status.
        let response = match serde_json::from_slice::<Value>(&body) {
            Ok(v) if v.get("errno").is_some_and(|e| !e.is_null()) => v,
            _ if !status.is_success() => {
                return Err(Error::transport(format!(
                    "unexpected status {status} from {url}: {}",
                    excerpt(&body)
                )))
            }
            Ok(_) => {
                return Err(Error::response_format(format!(
                    "response of {url} has no errno: {}",
                    excerpt(&body)
                )))
            }
            Err(e) => {
                return Err(Error::response_format(format!(
                    "response of {url} is not json: {}",
                    excerpt(&body)
                ))
                .with_source(e))
            }
        };

        Ok(Response {
            url,
            response,
            req_times: 0,
        })
    }

    /// Send a signed request, retrying transport failures up to 3 attempts.
    ///
    /// Attempts fire back to back. Errors other than `Transport` are returned
    /// at once. `req_times` of the result counts the failed attempts.
    pub async fn request_with_retry(
        &self,
        path: &str,
        params: &Form,
        body: &Form,
    ) -> Result<Response> {
        let mut last_err = None;

        for attempt in 0..REQUEST_RETRY_TIMES {
            match self.request(path, params, body).await {
                Ok(mut resp) => {
                    resp.req_times = attempt;
                    return Ok(resp);
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        "attempt {} of {REQUEST_RETRY_TIMES} to {path} failed: {e}",
                        attempt + 1
                    );
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        let err = Error::retry_exhausted(format!(
            "request to {path} failed after {REQUEST_RETRY_TIMES} attempts"
        ));
        Err(match last_err {
            Some(e) => err.with_source(e),
            None => err,
        })
    }
}

fn excerpt(body: &[u8]) -> String {
    let s = String::from_utf8_lossy(body);
    match s.char_indices().nth(256) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::error::Error as _;
    use xasset_bce_v1::StaticCredentialProvider;
    use xasset_core::{ErrorKind, HttpSend};

    type Reply = Result<(u16, &'static str)>;

    /// Replays scripted replies and records every request.
    #[derive(Debug, Default)]
    struct Stub {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<http::Request<Bytes>>>,
    }

    #[derive(Debug, Clone)]
    struct StubHttpSend(Arc<Stub>);

    #[async_trait]
    impl HttpSend for StubHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.0.requests.lock().unwrap().push(req);
            let (status, body) = self
                .0
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::transport("connection timed out")))?;
            Ok(http::Response::builder()
                .status(status)
                .body(Bytes::from_static(body.as_bytes()))
                .unwrap())
        }
    }

    fn executor(replies: Vec<Reply>) -> (RequestExecutor, Arc<Stub>) {
        let stub = Arc::new(Stub {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        });
        let ctx = Context::new().with_http_send(StubHttpSend(stub.clone()));
        let executor = RequestExecutor::new(
            ctx,
            "http://120.48.16.137:8360",
            StaticCredentialProvider::new("AK", "SK"),
        )
        .unwrap();

        (executor, stub)
    }

    fn body() -> Form {
        Form::new().push("asset_id", 123)
    }

    #[tokio::test]
    async fn test_retry_succeeds_after_two_failures() {
        let (executor, stub) = executor(vec![
            Err(Error::transport("connection refused")),
            Ok((502, "bad gateway")),
            Ok((200, r#"{"errno":0,"request_id":"r1"}"#)),
        ]);

        let resp = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap();

        assert_eq!(resp.req_times, 2);
        assert_eq!(resp.request_id(), Some("r1"));
        assert_eq!(
            resp.url,
            "http://120.48.16.137:8360/xasset/horae/v1/query"
        );
        assert_eq!(stub.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausted_after_three_attempts() {
        let (executor, stub) = executor(vec![]);

        let err = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RetryExhausted);
        assert_eq!(err.code(), 3004);
        assert_eq!(
            err.source().map(|e| e.to_string()).as_deref(),
            Some("connection timed out")
        );
        assert_eq!(stub.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_not_json_is_not_retried() {
        let (executor, stub) = executor(vec![
            Ok((200, "not json")),
            Ok((200, r#"{"errno":0}"#)),
        ]);

        let err = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResponseFormat);
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_errno_is_response_format() {
        for reply in [r#"{"errmsg":"succ"}"#, r#"{"errno":null}"#, "[1,2]", "null"] {
            let (executor, stub) = executor(vec![Ok((200, reply))]);

            let err = executor
                .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::ResponseFormat, "failed on {reply}");
            assert_eq!(stub.requests.lock().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_retried() {
        let (executor, _) = executor(vec![Ok((200, "")), Ok((200, r#"{"errno":0}"#))]);

        let resp = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap();
        assert_eq!(resp.req_times, 1);
    }

    #[tokio::test]
    async fn test_errno_is_passed_through() {
        let (executor, stub) = executor(vec![Ok((
            200,
            r#"{"errno":10006,"errmsg":"asset not exist"}"#,
        ))]);

        let resp = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap();

        assert_eq!(resp.errno(), 10006);
        assert_eq!(resp.errmsg(), "asset not exist");
        assert_eq!(resp.req_times, 0);
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_errno_on_error_status_is_not_retried() {
        let (executor, stub) = executor(vec![
            Ok((500, r#"{"errno":10001,"errmsg":"internal error"}"#)),
            Ok((200, r#"{"errno":0}"#)),
        ]);

        let resp = executor
            .request_with_retry(XASSET_API_HORAE_CREATE, &Form::new(), &body())
            .await
            .unwrap();

        assert_eq!(resp.errno(), 10001);
        assert_eq!(resp.errmsg(), "internal error");
        assert_eq!(resp.req_times, 0);
        assert_eq!(stub.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_without_envelope_is_retried() {
        let (executor, stub) = executor(vec![
            Ok((503, "")),
            Ok((500, r#"{"message":"oops"}"#)),
            Ok((200, r#"{"errno":0}"#)),
        ]);

        let resp = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap();

        assert!(resp.is_success());
        assert_eq!(resp.req_times, 2);
        assert_eq!(stub.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_post_request_shape() {
        let (executor, stub) = executor(vec![Ok((200, r#"{"errno":0}"#))]);

        executor
            .request(
                XASSET_API_HORAE_CREATE,
                &Form::new(),
                &Form::new()
                    .push("asset_info", r#"{"title":"a b"}"#)
                    .push("asset_id", 1),
            )
            .await
            .unwrap();

        let requests = stub.requests.lock().unwrap();
        let req = &requests[0];
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "http://120.48.16.137:8360/xasset/horae/v1/create"
        );
        assert_eq!(req.headers()["host"], "120.48.16.137");
        assert_eq!(
            req.headers()["content-type"],
            "application/x-www-form-urlencoded;charset=utf-8"
        );
        assert_eq!(req.headers()["user-agent"], "xasset-sdk-rust");
        assert!(req.headers()["timestamp"]
            .to_str()
            .unwrap()
            .parse::<i64>()
            .is_ok());
        let auth = req.headers()["authorization"].to_str().unwrap();
        assert!(auth.starts_with("bce-auth-v1/AK/"));
        assert_eq!(auth.split('/').nth(4), Some("host"));
        assert_eq!(
            req.body().as_ref(),
            b"asset_info=%7B%22title%22%3A%22a%20b%22%7D&asset_id=1"
        );
    }

    #[tokio::test]
    async fn test_get_request_with_query() {
        let (executor, stub) = executor(vec![Ok((200, r#"{"errno":0}"#))]);

        let resp = executor
            .request(
                XASSET_API_HORAE_QUERY,
                &Form::new().push("asset_id", 1).push("q", "a b"),
                &Form::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            resp.url,
            "http://120.48.16.137:8360/xasset/horae/v1/query?asset_id=1&q=a%20b"
        );
        let requests = stub.requests.lock().unwrap();
        assert_eq!(requests[0].method(), Method::GET);
        assert!(requests[0].body().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential() {
        #[derive(Debug)]
        struct NoCredential;

        #[async_trait]
        impl ProvideCredential for NoCredential {
            type Credential = Credential;

            async fn provide_credential(&self, _: &Context) -> Result<Option<Credential>> {
                Ok(None)
            }
        }

        let executor =
            RequestExecutor::new(Context::new(), "http://127.0.0.1:8360", NoCredential).unwrap();
        let err = executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = RequestExecutor::new(
            Context::new(),
            "/no/host",
            StaticCredentialProvider::new("AK", "SK"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_form_encode() {
        let form = Form::new()
            .push("b", 2)
            .push("a", "x y+z")
            .push_opt("c", None::<i64>)
            .push_opt("d", Some(-1));

        assert_eq!(form.encode(), "b=2&a=x%20y%2Bz&d=-1");
        assert_eq!(Form::new().encode(), "");
    }
}
