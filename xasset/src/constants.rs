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

// Routes of the xasset service.
pub const XASSET_API_HORAE_CREATE: &str = "/xasset/horae/v1/create";
pub const XASSET_API_HORAE_ALTER: &str = "/xasset/horae/v1/alter";
pub const XASSET_API_HORAE_PUBLISH: &str = "/xasset/horae/v1/publish";
pub const XASSET_API_HORAE_QUERY: &str = "/xasset/horae/v1/query";
pub const XASSET_API_HORAE_LIST_BY_STATUS: &str = "/xasset/horae/v1/listbystatus";
pub const XASSET_API_HORAE_GRANT: &str = "/xasset/horae/v1/grant";
pub const XASSET_API_DAMOCLES_TRANSFER: &str = "/xasset/damocles/v1/transfer";
pub const XASSET_API_HORAE_LIST_AST_BY_ADDR: &str = "/xasset/horae/v1/listastbyaddr";
pub const XASSET_API_HORAE_QUERY_SHARD: &str = "/xasset/horae/v1/querysds";
pub const XASSET_API_HORAE_LIST_SDS_BY_ADDR: &str = "/xasset/horae/v1/listsdsbyaddr";
pub const XASSET_API_HORAE_LIST_SDS_BY_AST: &str = "/xasset/horae/v1/listsdsbyast";
pub const XASSET_API_HORAE_HISTORY: &str = "/xasset/horae/v1/history";
pub const XASSET_API_HORAE_GET_EVIDENCE_INFO: &str = "/xasset/horae/v1/getevidenceinfo";
pub const XASSET_API_FILE_GET_STOKEN: &str = "/xasset/file/v1/getstoken";

/// Attempts made by `request_with_retry` before giving up.
pub const REQUEST_RETRY_TIMES: usize = 3;

pub const DEFAULT_ENDPOINT: &str = "http://120.48.16.137:8360";
pub const DEFAULT_USER_AGENT: &str = "xasset-sdk-rust";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 3000;

pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded;charset=utf-8";
/// Non-standard header carrying the request time in epoch seconds.
pub const TIMESTAMP: &str = "timestamp";

// Env values used to build a config.
pub const XASSET_ENDPOINT: &str = "XASSET_ENDPOINT";
pub const XASSET_APP_ID: &str = "XASSET_APP_ID";
pub const XASSET_ACCESS_KEY_ID: &str = "XASSET_ACCESS_KEY_ID";
pub const XASSET_SECRET_ACCESS_KEY: &str = "XASSET_SECRET_ACCESS_KEY";
pub const XASSET_CLI_PATH: &str = "XASSET_CLI_PATH";
