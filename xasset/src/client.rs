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

use std::sync::Arc;

use xasset_bce_v1::{DefaultCredentialProvider, StaticCredentialProvider};
use xasset_core::{Context, Error, Result};

use crate::constants::*;
use crate::{
    gen_nonce, Account, CliKeyMaterialProvider, Config, Form, KeyMaterialProvider,
    RequestExecutor, Response,
};

/// Client of the xasset service.
///
/// Every method validates its arguments before any I/O and returns the
/// service envelope as is: a non-zero `errno` is not an `Err`.
///
/// ```no_run
/// use xasset::{Client, Config};
///
/// # async fn example() -> xasset::Result<()> {
/// let config = Config::default().with_credential("my_ak", "my_sk");
/// let client = Client::from_config(&config)?;
///
/// let resp = client.query_asset(12345).await?;
/// if resp.is_success() {
///     println!("{}", resp.response["meta"]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    executor: RequestExecutor,
    key_material: Arc<dyn KeyMaterialProvider>,
}

impl Client {
    /// Create a client on top of the given context.
    ///
    /// Credentials set in `config` are tried before the environment.
    pub fn new(ctx: Context, config: &Config) -> Result<Self> {
        let mut loader = DefaultCredentialProvider::new();
        if let (Some(ak), Some(sk)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.push_front(StaticCredentialProvider::new(ak, sk));
        }

        let executor = RequestExecutor::new(ctx.clone(), config.endpoint(), loader)?
            .with_user_agent(config.user_agent());
        let key_material = match &config.cli_path {
            Some(path) => CliKeyMaterialProvider::new(path),
            None => CliKeyMaterialProvider::default(),
        };

        Ok(Self {
            ctx,
            executor,
            key_material: Arc::new(key_material),
        })
    }

    /// Create a client with the reqwest and tokio backed context.
    #[cfg(feature = "default-context")]
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(crate::default_context(config)?, config)
    }

    /// Replace the key material provider.
    pub fn with_key_material(mut self, provider: impl KeyMaterialProvider) -> Self {
        self.key_material = Arc::new(provider);
        self
    }

    /// Executor used to send requests.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Create a new blockchain account.
    pub async fn create_account(&self) -> Result<Account> {
        self.key_material.create_account(&self.ctx).await
    }

    /// Sign `message` with `private_key`.
    pub async fn sign_message(&self, private_key: &str, message: &str) -> Result<String> {
        self.key_material.sign(&self.ctx, private_key, message).await
    }

    async fn sign_with(&self, account: &Account, message: &str) -> Result<String> {
        self.sign_message(&account.private_key, message).await
    }

    /// Get an stoken to upload files.
    pub async fn get_stoken(&self, account: &Account) -> Result<Response> {
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &nonce.to_string()).await?;
        let body = Form::new()
            .push("addr", &account.address)
            .push("pkey", &account.public_key)
            .push("sign", sign)
            .push("nonce", nonce);

        self.executor
            .request_with_retry(XASSET_API_FILE_GET_STOKEN, &Form::new(), &body)
            .await
    }

    /// Create an asset.
    ///
    /// `price` is sent when not negative, `user_id` when positive.
    pub async fn create_asset(
        &self,
        account: &Account,
        asset_id: i64,
        amount: i64,
        asset_info: &str,
        price: Option<i64>,
        user_id: Option<i64>,
    ) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(amount >= 1, "amount")?;
        ensure(!asset_info.is_empty(), "asset_info")?;
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &format!("{asset_id}{nonce}")).await?;
        let body = Form::new()
            .push("asset_id", asset_id)
            .push("amount", amount)
            .push("asset_info", asset_info)
            .push("addr", &account.address)
            .push("sign", sign)
            .push("pkey", &account.public_key)
            .push("nonce", nonce)
            .push_opt("price", price.filter(|v| *v >= 0))
            .push_opt("user_id", user_id.filter(|v| *v > 0));

        self.executor
            .request_with_retry(XASSET_API_HORAE_CREATE, &Form::new(), &body)
            .await
    }

    /// Alter an asset that is not published yet.
    ///
    /// `amount` and `price` are sent when not negative.
    pub async fn alter_asset(
        &self,
        account: &Account,
        asset_id: i64,
        amount: Option<i64>,
        asset_info: &str,
        price: Option<i64>,
    ) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(!asset_info.is_empty(), "asset_info")?;
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &format!("{asset_id}{nonce}")).await?;
        let body = Form::new()
            .push("asset_id", asset_id)
            .push("addr", &account.address)
            .push("sign", sign)
            .push("pkey", &account.public_key)
            .push("nonce", nonce)
            .push_opt("amount", amount.filter(|v| *v >= 0))
            .push("asset_info", asset_info)
            .push_opt("price", price.filter(|v| *v >= 0));

        self.executor
            .request_with_retry(XASSET_API_HORAE_ALTER, &Form::new(), &body)
            .await
    }

    /// Publish an asset.
    pub async fn publish_asset(&self, account: &Account, asset_id: i64) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &format!("{asset_id}{nonce}")).await?;
        let body = Form::new()
            .push("asset_id", asset_id)
            .push("addr", &account.address)
            .push("sign", sign)
            .push("pkey", &account.public_key)
            .push("nonce", nonce);

        self.executor
            .request_with_retry(XASSET_API_HORAE_PUBLISH, &Form::new(), &body)
            .await
    }

    /// Query an asset.
    pub async fn query_asset(&self, asset_id: i64) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;

        let body = Form::new().push("asset_id", asset_id);
        self.executor
            .request_with_retry(XASSET_API_HORAE_QUERY, &Form::new(), &body)
            .await
    }

    /// List the assets of `account` with the given status.
    ///
    /// `limit` is sent when positive.
    pub async fn list_by_status(
        &self,
        account: &Account,
        status: i64,
        page: i64,
        limit: Option<i64>,
    ) -> Result<Response> {
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &nonce.to_string()).await?;
        let body = Form::new()
            .push("status", status)
            .push("nonce", nonce)
            .push("addr", &account.address)
            .push("sign", sign)
            .push("pkey", &account.public_key)
            .push("page", page)
            .push_opt("limit", limit.filter(|v| *v > 0));

        self.executor
            .request_with_retry(XASSET_API_HORAE_LIST_BY_STATUS, &Form::new(), &body)
            .await
    }

    /// Grant a shard of an asset to `to_addr`.
    ///
    /// `to_user_id` is always sent, `price` when not negative.
    pub async fn grant_shard(
        &self,
        account: &Account,
        asset_id: i64,
        shard_id: i64,
        to_addr: &str,
        price: Option<i64>,
        to_user_id: i64,
    ) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(shard_id >= 1, "shard_id")?;
        ensure(!to_addr.is_empty(), "to_addr")?;
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &format!("{asset_id}{nonce}")).await?;
        let body = Form::new()
            .push("asset_id", asset_id)
            .push("shard_id", shard_id)
            .push("addr", &account.address)
            .push("sign", sign)
            .push("pkey", &account.public_key)
            .push("nonce", nonce)
            .push("to_addr", to_addr)
            .push("to_userid", to_user_id)
            .push_opt("price", price.filter(|v| *v >= 0));

        self.executor
            .request_with_retry(XASSET_API_HORAE_GRANT, &Form::new(), &body)
            .await
    }

    /// Transfer a shard owned by `account` to `to_addr`.
    ///
    /// `price` is sent when not negative, `to_user_id` when positive.
    pub async fn transfer_shard(
        &self,
        account: &Account,
        asset_id: i64,
        shard_id: i64,
        to_addr: &str,
        price: Option<i64>,
        to_user_id: Option<i64>,
    ) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(shard_id >= 1, "shard_id")?;
        ensure(!to_addr.is_empty(), "to_addr")?;
        ensure(account.is_valid(), "account")?;

        let nonce = gen_nonce();
        let sign = self.sign_with(account, &format!("{asset_id}{nonce}")).await?;
        let body = Form::new()
            .push("asset_id", asset_id)
            .push("shard_id", shard_id)
            .push("addr", &account.address)
            .push("sign", sign)
            .push("pkey", &account.public_key)
            .push("nonce", nonce)
            .push("to_addr", to_addr)
            .push_opt("price", price.filter(|v| *v >= 0))
            .push_opt("to_userid", to_user_id.filter(|v| *v > 0));

        self.executor
            .request_with_retry(XASSET_API_DAMOCLES_TRANSFER, &Form::new(), &body)
            .await
    }

    /// List the assets owned by `addr`.
    pub async fn list_assets_by_addr(
        &self,
        addr: &str,
        status: i64,
        page: i64,
        limit: i64,
    ) -> Result<Response> {
        ensure(!addr.is_empty(), "addr")?;
        ensure(page >= 1, "page")?;
        ensure(limit >= 1, "limit")?;

        let body = Form::new()
            .push("addr", addr)
            .push("status", status)
            .push("page", page)
            .push("limit", limit);
        self.executor
            .request_with_retry(XASSET_API_HORAE_LIST_AST_BY_ADDR, &Form::new(), &body)
            .await
    }

    /// Query a shard.
    pub async fn query_shard(&self, asset_id: i64, shard_id: i64) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(shard_id >= 1, "shard_id")?;

        let body = Form::new()
            .push("asset_id", asset_id)
            .push("shard_id", shard_id);
        self.executor
            .request_with_retry(XASSET_API_HORAE_QUERY_SHARD, &Form::new(), &body)
            .await
    }

    /// List the shards owned by `addr`.
    pub async fn list_shards_by_addr(&self, addr: &str, page: i64, limit: i64) -> Result<Response> {
        ensure(!addr.is_empty(), "addr")?;
        ensure(page >= 1, "page")?;
        ensure(limit >= 1, "limit")?;

        let body = Form::new()
            .push("addr", addr)
            .push("page", page)
            .push("limit", limit);
        self.executor
            .request_with_retry(XASSET_API_HORAE_LIST_SDS_BY_ADDR, &Form::new(), &body)
            .await
    }

    /// List the shards of an asset, starting after `cursor`.
    pub async fn list_shards_by_asset(
        &self,
        asset_id: i64,
        cursor: &str,
        limit: i64,
    ) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(limit >= 1, "limit")?;

        let body = Form::new()
            .push("asset_id", asset_id)
            .push("cursor", cursor)
            .push("limit", limit);
        self.executor
            .request_with_retry(XASSET_API_HORAE_LIST_SDS_BY_AST, &Form::new(), &body)
            .await
    }

    /// List the history of an asset.
    pub async fn list_asset_history(&self, asset_id: i64, page: i64, limit: i64) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;
        ensure(page >= 1, "page")?;
        ensure(limit >= 1, "limit")?;

        let body = Form::new()
            .push("asset_id", asset_id)
            .push("page", page)
            .push("limit", limit);
        self.executor
            .request_with_retry(XASSET_API_HORAE_HISTORY, &Form::new(), &body)
            .await
    }

    /// Get the on-chain evidence of an asset.
    pub async fn get_evidence_info(&self, asset_id: i64) -> Result<Response> {
        ensure(asset_id >= 1, "asset_id")?;

        let body = Form::new().push("asset_id", asset_id);
        self.executor
            .request_with_retry(XASSET_API_HORAE_GET_EVIDENCE_INFO, &Form::new(), &body)
            .await
    }
}

fn ensure(ok: bool, field: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::param_invalid(format!("param error: invalid {field}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticKeyMaterialProvider;
    use async_trait::async_trait;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use xasset_bce_v1::canonical::parse_query_string;
    use xasset_core::hash::hex_hmac_sha256;
    use xasset_core::{ErrorKind, HttpSend};

    #[derive(Debug, Clone, Default)]
    struct RecordHttpSend(Arc<Mutex<Vec<http::Request<Bytes>>>>);

    #[async_trait]
    impl HttpSend for RecordHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.0.lock().unwrap().push(req);
            Ok(http::Response::new(Bytes::from_static(
                br#"{"errno":0,"errmsg":"succ"}"#,
            )))
        }
    }

    fn account() -> Account {
        Account::new("TeyyPLpp9L7QAcxHangtcHTu7HUZ6iydY", "public-key", "private-key")
    }

    fn client() -> (Client, RecordHttpSend) {
        let send = RecordHttpSend::default();
        let ctx = Context::new().with_http_send(send.clone());
        let config = Config::default()
            .with_endpoint("http://127.0.0.1:8360")
            .with_credential("AK", "SK");
        let client = Client::new(ctx, &config)
            .unwrap()
            .with_key_material(StaticKeyMaterialProvider::new(account()));

        (client, send)
    }

    /// Path and decoded form fields of the single recorded request.
    fn recorded(send: &RecordHttpSend) -> (String, Vec<(String, String)>) {
        let requests = send.0.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];

        let body = String::from_utf8(req.body().to_vec()).unwrap();
        let fields = parse_query_string(&body)
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_default()))
            .collect();
        (req.uri().path().to_string(), fields)
    }

    fn field<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn keys(fields: &[(String, String)]) -> Vec<&str> {
        fields.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_asset() {
        let (client, send) = client();

        let resp = client
            .create_asset(&account(), 123, 10, r#"{"title":"数字藏品"}"#, Some(0), None)
            .await
            .unwrap();
        assert!(resp.is_success());

        let (path, fields) = recorded(&send);
        assert_eq!(path, "/xasset/horae/v1/create");
        assert_eq!(
            keys(&fields),
            ["asset_id", "amount", "asset_info", "addr", "sign", "pkey", "nonce", "price"]
        );
        assert_eq!(field(&fields, "asset_info"), Some(r#"{"title":"数字藏品"}"#));
        assert_eq!(field(&fields, "pkey"), Some("public-key"));

        let nonce = field(&fields, "nonce").unwrap();
        assert_eq!(
            field(&fields, "sign"),
            Some(hex_hmac_sha256(b"private-key", format!("123{nonce}").as_bytes()).as_str())
        );
    }

    #[tokio::test]
    async fn test_create_asset_optional_fields() {
        let (client, send) = client();

        client
            .create_asset(&account(), 123, 10, "info", Some(-1), Some(42))
            .await
            .unwrap();

        let (_, fields) = recorded(&send);
        assert_eq!(field(&fields, "price"), None);
        assert_eq!(field(&fields, "user_id"), Some("42"));
    }

    #[tokio::test]
    async fn test_param_errors_skip_io() {
        let (client, send) = client();
        let invalid = Account::new("addr", "", "priv");

        let errs = vec![
            client.query_asset(0).await.unwrap_err(),
            client
                .create_asset(&account(), 1, 0, "info", None, None)
                .await
                .unwrap_err(),
            client
                .create_asset(&account(), 1, 1, "", None, None)
                .await
                .unwrap_err(),
            client
                .create_asset(&invalid, 1, 1, "info", None, None)
                .await
                .unwrap_err(),
            client.get_stoken(&invalid).await.unwrap_err(),
            client
                .grant_shard(&account(), 1, 1, "", None, 0)
                .await
                .unwrap_err(),
            client
                .transfer_shard(&account(), 1, 0, "to", None, None)
                .await
                .unwrap_err(),
            client.list_assets_by_addr("addr", 0, 0, 10).await.unwrap_err(),
            client.list_shards_by_addr("", 1, 10).await.unwrap_err(),
            client.list_shards_by_asset(1, "", 0).await.unwrap_err(),
            client.list_asset_history(1, 1, 0).await.unwrap_err(),
            client.query_shard(1, 0).await.unwrap_err(),
            client.get_evidence_info(-1).await.unwrap_err(),
            client.publish_asset(&account(), 0).await.unwrap_err(),
            client
                .alter_asset(&account(), 1, None, "", None)
                .await
                .unwrap_err(),
            client.list_by_status(&invalid, 1, 1, None).await.unwrap_err(),
        ];

        for err in errs {
            assert_eq!(err.kind(), ErrorKind::ParamInvalid, "{err}");
            assert_eq!(err.code(), 40001);
        }
        assert!(send.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_grant_shard_always_sends_to_userid() {
        let (client, send) = client();

        client
            .grant_shard(&account(), 123, 456, "to_addr", None, 0)
            .await
            .unwrap();

        let (path, fields) = recorded(&send);
        assert_eq!(path, "/xasset/horae/v1/grant");
        assert_eq!(
            keys(&fields),
            ["asset_id", "shard_id", "addr", "sign", "pkey", "nonce", "to_addr", "to_userid"]
        );
        assert_eq!(field(&fields, "to_userid"), Some("0"));
    }

    #[tokio::test]
    async fn test_transfer_shard() {
        let (client, send) = client();

        client
            .transfer_shard(&account(), 123, 456, "to_addr", Some(100), None)
            .await
            .unwrap();

        let (path, fields) = recorded(&send);
        assert_eq!(path, "/xasset/damocles/v1/transfer");
        assert_eq!(field(&fields, "price"), Some("100"));
        assert_eq!(field(&fields, "to_userid"), None);
    }

    #[tokio::test]
    async fn test_alter_asset() {
        let (client, send) = client();

        client
            .alter_asset(&account(), 123, Some(5), "info", None)
            .await
            .unwrap();

        let (path, fields) = recorded(&send);
        assert_eq!(path, "/xasset/horae/v1/alter");
        assert_eq!(
            keys(&fields),
            ["asset_id", "addr", "sign", "pkey", "nonce", "amount", "asset_info"]
        );
    }

    #[tokio::test]
    async fn test_get_stoken_signs_nonce() {
        let (client, send) = client();

        client.get_stoken(&account()).await.unwrap();

        let (path, fields) = recorded(&send);
        assert_eq!(path, "/xasset/file/v1/getstoken");
        assert_eq!(keys(&fields), ["addr", "pkey", "sign", "nonce"]);
        let nonce = field(&fields, "nonce").unwrap();
        assert_eq!(
            field(&fields, "sign"),
            Some(hex_hmac_sha256(b"private-key", nonce.as_bytes()).as_str())
        );
    }

    #[tokio::test]
    async fn test_list_by_status() {
        let (client, send) = client();

        client
            .list_by_status(&account(), 1, 2, Some(20))
            .await
            .unwrap();

        let (path, fields) = recorded(&send);
        assert_eq!(path, "/xasset/horae/v1/listbystatus");
        assert_eq!(
            keys(&fields),
            ["status", "nonce", "addr", "sign", "pkey", "page", "limit"]
        );
    }

    #[tokio::test]
    async fn test_read_only_endpoints() {
        let cases: Vec<(&str, Vec<&str>)> = vec![
            ("/xasset/horae/v1/query", vec!["asset_id"]),
            ("/xasset/horae/v1/querysds", vec!["asset_id", "shard_id"]),
            (
                "/xasset/horae/v1/listastbyaddr",
                vec!["addr", "status", "page", "limit"],
            ),
            ("/xasset/horae/v1/listsdsbyaddr", vec!["addr", "page", "limit"]),
            ("/xasset/horae/v1/listsdsbyast", vec!["asset_id", "cursor", "limit"]),
            ("/xasset/horae/v1/history", vec!["asset_id", "page", "limit"]),
            ("/xasset/horae/v1/getevidenceinfo", vec!["asset_id"]),
        ];

        for (idx, (expected_path, expected_keys)) in cases.into_iter().enumerate() {
            let (client, send) = client();
            let resp = match idx {
                0 => client.query_asset(1).await,
                1 => client.query_shard(1, 2).await,
                2 => client.list_assets_by_addr("addr", 0, 1, 10).await,
                3 => client.list_shards_by_addr("addr", 1, 10).await,
                4 => client.list_shards_by_asset(1, "", 10).await,
                5 => client.list_asset_history(1, 1, 10).await,
                _ => client.get_evidence_info(1).await,
            };
            assert!(resp.unwrap().is_success());

            let (path, fields) = recorded(&send);
            assert_eq!(path, expected_path);
            assert_eq!(keys(&fields), expected_keys);
        }
    }

    #[tokio::test]
    async fn test_key_material_passthrough() {
        let (client, _) = client();

        assert_eq!(client.create_account().await.unwrap(), account());
        assert_eq!(
            client.sign_message("private-key", "msg").await.unwrap(),
            hex_hmac_sha256(b"private-key", b"msg")
        );
    }
}
