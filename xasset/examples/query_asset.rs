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

use anyhow::Result;
use xasset::{Client, Config, Context, OsEnv};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Load endpoint and credential from XASSET_* env values
    let config = Config::default().from_env(&Context::new().with_env(OsEnv));
    let client = Client::from_config(&config)?;

    let asset_id: i64 = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "1".to_string())
        .parse()?;

    let resp = client.query_asset(asset_id).await?;
    if resp.is_success() {
        println!("{:#}", resp.response["meta"]);
    } else {
        println!("errno {}: {}", resp.errno(), resp.errmsg());
    }

    Ok(())
}
