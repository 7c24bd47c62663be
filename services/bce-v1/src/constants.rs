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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// Version tag leading every authorization string.
pub const BCE_AUTH_VERSION: &str = "bce-auth-v1";

/// Headers with this prefix are signed by default.
pub const BCE_PREFIX: &str = "x-bce-";

/// Query parameter never included in the canonical query for signing.
pub const AUTHORIZATION: &str = "Authorization";

/// Default validity window of an authorization string.
pub const DEFAULT_EXPIRATION_IN_SECONDS: u64 = 1800;

// Env values used by the credential providers.
pub const XASSET_ACCESS_KEY_ID: &str = "XASSET_ACCESS_KEY_ID";
pub const XASSET_SECRET_ACCESS_KEY: &str = "XASSET_SECRET_ACCESS_KEY";
pub const XASSET_AK: &str = "XASSET_AK";
pub const XASSET_SK: &str = "XASSET_SK";

/// AsciiSet for BCE UriEncode.
///
/// - URI encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - Bytes above 0x7F are never in an `AsciiSet` and always get encoded.
pub static BCE_URI_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for BCE UriEncode.
///
/// But used in path, where `/` stays literal.
pub static BCE_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
