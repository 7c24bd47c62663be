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

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use http::{HeaderMap, HeaderValue, Method};
use xasset_bce_v1::canonical::{canonical_query_string, url_encode};
use xasset_bce_v1::{Credential, SignOptions, Signer};

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("bce_v1");

    group.bench_function("sign", |b| {
        let signer = Signer::new(Credential::new("access_key_id", "secret_access_key"));
        let mut headers = HeaderMap::new();
        headers.insert("host", HeaderValue::from_static("120.48.16.137"));
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/x-www-form-urlencoded;charset=utf-8"),
        );
        let opts = SignOptions::new().with_headers_to_sign(["host"]);

        b.iter(|| {
            signer
                .sign(
                    &Method::POST,
                    "/xasset/horae/v1/create",
                    &headers,
                    &[],
                    &opts,
                )
                .expect("must success")
        })
    });

    group.bench_function("canonical_query", |b| {
        let params = (0..16)
            .map(|i| (format!("key_{i}"), Some(format!("value {i}/资产"))))
            .collect::<Vec<_>>();

        b.iter(|| canonical_query_string(&params, true))
    });

    group.bench_function("url_encode", |b| {
        let input = r#"{"title":"数字藏品","asset_url":["http://example.com/a.jpg"]}"#;

        b.iter(|| url_encode(input))
    });

    group.finish();
}
