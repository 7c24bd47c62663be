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

//! Tokio-based command execution implementation for xasset.
//!
//! This crate provides `TokioCommandExecute`, an async command executor that implements
//! the `CommandExecute` trait from `xasset_core` using Tokio's process operations.
//!
//! ## Overview
//!
//! The xasset CLI generates accounts and produces ECDSA signatures. The client
//! reaches it through `Context::command_execute`, and this crate is the
//! production backend for that call. Arguments are passed as argv, never
//! through a shell.
//!
//! ## Example
//!
//! ```no_run
//! use xasset_core::Context;
//! use xasset_command_execute_tokio::TokioCommandExecute;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ctx = Context::new().with_command_execute(TokioCommandExecute);
//!
//!     match ctx
//!         .command_execute("./xasset-cli-linux", &["account", "create", "-l", "1", "-s", "1", "-f", "std"])
//!         .await
//!     {
//!         Ok(output) if output.success() => {
//!             println!("Account: {}", String::from_utf8_lossy(&output.stdout));
//!         }
//!         Ok(output) => eprintln!("xasset-cli exited with {}", output.status),
//!         Err(e) => eprintln!("Failed to execute command: {}", e),
//!     }
//! }
//! ```

use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use tokio::process::Command;
use xasset_core::{CommandExecute, CommandOutput, Error, Result};

/// Tokio-based implementation of the `CommandExecute` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandExecute;

#[async_trait]
impl CommandExecute for TokioCommandExecute {
    async fn command_execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!("executing command: {program} with {} args", args.len());

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                Error::key_material(format!("failed to execute command '{program}'")).with_source(e)
            })?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
