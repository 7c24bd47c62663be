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

use xasset_command_execute_tokio::TokioCommandExecute;
use xasset_core::{Context, OsEnv, Result};
use xasset_file_read_tokio::TokioFileRead;
use xasset_http_send_reqwest::ReqwestHttpSend;

use crate::Config;

/// Build a context backed by reqwest, tokio and the process env.
///
/// The transport honors the timeouts and TLS setting of `config`.
pub fn default_context(config: &Config) -> Result<Context> {
    let http = ReqwestHttpSend::with_timeouts(
        config.connect_timeout(),
        config.read_timeout(),
        config.danger_accept_invalid_certs,
    )?;

    Ok(Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(http)
        .with_command_execute(TokioCommandExecute)
        .with_env(OsEnv))
}
