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

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Context holds everything the SDK uses to reach outside the process.
///
/// The request executor sends through [`HttpSend`], the CLI key material
/// provider runs through [`CommandExecute`], and config loading goes through
/// [`FileRead`] and [`Env`]. A fresh context has none of them: every call
/// fails with an `Unexpected` error (or finds no env value) until the matching
/// `with_*` setter is used.
///
/// ```
/// use xasset_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// let endpoint = ctx.env_var("XASSET_ENDPOINT");
/// # let _ = endpoint;
/// ```
#[derive(Clone)]
pub struct Context {
    fs: Arc<dyn FileRead>,
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
    cmd: Arc<dyn CommandExecute>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("fs", &self.fs)
            .field("http", &self.http)
            .field("env", &self.env)
            .field("cmd", &self.cmd)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a context with nothing configured.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(Unconfigured),
            http: Arc::new(Unconfigured),
            env: Arc::new(Unconfigured),
            cmd: Arc::new(Unconfigured),
        }
    }

    /// Use `fs` to read config files.
    pub fn with_file_read(mut self, fs: impl FileRead) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    /// Use `http` as the transport.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Use `env` for env values and the home dir.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Use `cmd` to run the xasset CLI.
    pub fn with_command_execute(mut self, cmd: impl CommandExecute) -> Self {
        self.cmd = Arc::new(cmd);
        self
    }

    /// Read a whole file.
    #[inline]
    pub async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        self.fs.file_read(path).await
    }

    /// Read a whole file as text, invalid utf-8 is replaced.
    pub async fn file_read_as_string(&self, path: &str) -> Result<String> {
        let bytes = self.file_read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Perform one HTTP exchange.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Home dir of the current user, if known.
    #[inline]
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.env.home_dir()
    }

    /// Replace a leading `~` of `path` with the home dir.
    ///
    /// Paths without `~/` or `~\\` come back unchanged. `None` means the path
    /// needs a home dir and none is known.
    pub fn expand_home_dir(&self, path: &str) -> Option<String> {
        if !path.starts_with("~/") && !path.starts_with("~\\") {
            Some(path.to_string())
        } else {
            self.home_dir()
                .map(|home| path.replacen('~', &home.to_string_lossy(), 1))
        }
    }

    /// Env value of `key`, `None` if unset or not utf-8.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Run `program` with `args` and wait for it to exit.
    pub async fn command_execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        self.cmd.command_execute(program, args).await
    }
}

/// FileRead loads config files.
#[async_trait::async_trait]
pub trait FileRead: Debug + Send + Sync + 'static {
    /// Read the whole file at `path`.
    async fn file_read(&self, path: &str) -> Result<Vec<u8>>;
}

/// HttpSend is the transport primitive of the SDK.
///
/// Implementations perform exactly one HTTP exchange and must not retry on
/// their own: retrying is owned by the request executor. Any failure to
/// obtain a response (connect, DNS, timeout) is returned as `Err`.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send `req` and return the response whatever its status.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Env gives access to `XASSET_*` values and the home dir.
pub trait Env: Debug + Send + Sync + 'static {
    /// Value of `key`, `None` if unset or not utf-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Home dir of the current user.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// OsEnv reads the env of the current process.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    #[cfg(any(unix, target_os = "redox"))]
    fn home_dir(&self) -> Option<PathBuf> {
        #[allow(deprecated)]
        std::env::home_dir()
    }

    #[cfg(windows)]
    fn home_dir(&self) -> Option<PathBuf> {
        std::env::var_os("USERPROFILE")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    #[cfg(target_arch = "wasm32")]
    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// StaticEnv serves a fixed set of values, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// Home dir to report.
    pub home_dir: Option<PathBuf>,
    /// Env values to serve.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.clone()
    }
}

/// Exit status and captured output of a finished program.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code, `0` on success.
    pub status: i32,
    /// Captured stdout.
    pub stdout: Vec<u8>,
    /// Captured stderr.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Check if the program exited with `0`.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// CommandExecute runs external programs such as the xasset CLI.
///
/// Arguments are handed over as they are, without going through a shell.
#[async_trait::async_trait]
pub trait CommandExecute: Debug + Send + Sync + 'static {
    /// Run `program` with `args` and capture its output.
    async fn command_execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Stands in for every collaborator a context was not given.
#[derive(Debug, Clone, Copy, Default)]
struct Unconfigured;

#[async_trait::async_trait]
impl FileRead for Unconfigured {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        Err(Error::unexpected(format!(
            "can't read {path}: no file reader configured"
        )))
    }
}

#[async_trait::async_trait]
impl HttpSend for Unconfigured {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(format!(
            "can't send {} {}: no http client configured",
            req.method(),
            req.uri()
        )))
    }
}

impl Env for Unconfigured {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}

#[async_trait::async_trait]
impl CommandExecute for Unconfigured {
    async fn command_execute(&self, program: &str, _: &[&str]) -> Result<CommandOutput> {
        Err(Error::unexpected(format!(
            "can't run {program}: no command executor configured"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_unconfigured_context() {
        let ctx = Context::new();

        let err = ctx.file_read("/tmp/xasset.toml").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(err.to_string().contains("file reader"));

        let req = http::Request::get("http://127.0.0.1/").body(Bytes::new()).unwrap();
        let err = ctx.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);

        let err = ctx.command_execute("xasset-cli", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);

        assert_eq!(ctx.env_var("HOME"), None);
    }

    #[test]
    fn test_expand_home_dir() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: Some(PathBuf::from("/home/xasset")),
            envs: HashMap::new(),
        });

        assert_eq!(
            ctx.expand_home_dir("~/.xasset/config.toml"),
            Some("/home/xasset/.xasset/config.toml".to_string())
        );
        assert_eq!(
            ctx.expand_home_dir("/etc/xasset.toml"),
            Some("/etc/xasset.toml".to_string())
        );
        assert_eq!(
            Context::new().expand_home_dir("~/.xasset/config.toml"),
            None
        );
    }

    #[test]
    fn test_static_env() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([("XASSET_APP_ID".to_string(), "110380".to_string())]),
        });

        assert_eq!(ctx.env_var("XASSET_APP_ID").as_deref(), Some("110380"));
        assert_eq!(ctx.env_var("XASSET_CLI_PATH"), None);
    }
}
