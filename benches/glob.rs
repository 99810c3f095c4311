// Copyright 2024, The Tremor Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simd_json::OwnedValue as Value;
use tremor_glob::{Glob, GlobOptions};
use value_trait::{Builder, Mutable};

/// `props` top-level branches, each carrying a `value` leaf and a chain of
/// `nested0` .. `nested{depth - 1}` objects with a `value{j}` leaf at every
/// level.
fn large_tree(props: usize, depth: usize) -> Value {
    let mut root = Value::object();
    for i in 0..props {
        let last = depth - 1;
        let mut chain = Value::object();
        chain
            .insert(format!("value{last}"), last)
            .expect("insert failed");
        for j in (0..last).rev() {
            let mut outer = Value::object();
            outer.insert(format!("value{j}"), j).expect("insert failed");
            outer
                .insert(format!("nested{}", j + 1), chain)
                .expect("insert failed");
            chain = outer;
        }
        let mut prop = Value::object();
        prop.insert("value", i).expect("insert failed");
        prop.insert("nested0", chain).expect("insert failed");
        root.insert(format!("prop{i}"), prop).expect("insert failed");
    }
    root
}

pub fn glob_benchmark(c: &mut Criterion) {
    let tree = large_tree(1000, 100);
    let options = GlobOptions::default();

    c.bench_function("compile", |b| {
        b.iter(|| black_box(Glob::compile(black_box("prop*.nested0.value?"))))
    });

    let exact = Glob::compile("prop0.nested0.value0").expect("compile failed");
    c.bench_function("exact-path", |b| {
        b.iter(|| black_box(exact.values(black_box(&tree), options)))
    });

    let wildcard = Glob::compile("prop*.value").expect("compile failed");
    c.bench_function("wildcard", |b| {
        b.iter(|| black_box(wildcard.paths(black_box(&tree), options)))
    });

    let globstar = Glob::compile("**.value1").expect("compile failed");
    c.bench_function("globstar", |b| {
        b.iter(|| black_box(globstar.paths(black_box(&tree), options)))
    });
}

criterion_group!(benches, glob_benchmark);
criterion_main!(benches);
