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

use rand::Rng;
use xasset_core::time::now;

/// Generate a nonce for account signed requests.
///
/// The value is the current Unix time in microseconds times 100 plus a
/// random number below 100, so it grows with time and rarely collides.
pub fn gen_nonce() -> i64 {
    now().timestamp_micros() * 100 + rand::thread_rng().gen_range(0..100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_nonce() {
        let before = now().timestamp_micros() * 100;
        let nonce = gen_nonce();
        let after = now().timestamp_micros() * 100 + 100;

        assert!(nonce > 0);
        assert!(nonce >= before && nonce < after);
    }
}
