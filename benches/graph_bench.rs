//! Declaration Pipeline Benchmark
//!
//! Measures scanning, corpus indexing, dependency graph building and
//! reduction on a synthetic declaration file shaped like `lib.dom.d.ts`.

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rayon::prelude::*;
use std::sync::Arc;
use tsbind::graph::DependencyMapBuilder;
use tsbind::scanner::scan;
use tsbind::{DependencyCache, TypeDeclarationParser, TypeDeclarationReader};

/// Generate a chain of interfaces where each one refers to the next, plus a
/// callback and an options bag per link.
fn generate_corpus(interface_count: usize) -> String {
    let mut source = String::with_capacity(interface_count * 400);
    source.push_str("// Generated declaration file for benchmarking\n\n");

    for i in 0..interface_count {
        let next = (i + 1) % interface_count;
        source.push_str(&format!(
            r#"
/** Node {i} of the generated chain. */
interface Node{i} {{
    readonly id: number;
    label: string | null;
    next: Node{next};
    /**
     * Loads the node.
     * @param callback Called once loaded.
     */
    load(callback: Node{i}Callback, options?: Node{i}Options): Promise<void>;
    onchange: ((ev: Event) => any) | null;
}}

interface Node{i}Callback {{
    (node: Node{i}): void;
}}

interface Node{i}Options {{
    timeout?: number;
    retries?: number;
}}

type Node{i}Kind = "leaf" | "branch" | "root";
"#
        ));
    }

    source
}

fn bench_scan(c: &mut Criterion) {
    let source = generate_corpus(200);

    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("scan_200_interfaces", |b| {
        b.iter(|| black_box(scan(&source).count()))
    });
    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let source: Arc<str> = generate_corpus(200).into();

    let mut group = c.benchmark_group("reader");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("index_200_interfaces", |b| {
        b.iter(|| {
            black_box(TypeDeclarationReader::from_source(
                "bench.d.ts",
                Arc::clone(&source),
            ))
        })
    });
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let source = generate_corpus(200);
    let reader = TypeDeclarationReader::from_source("bench.d.ts", source);

    let mut group = c.benchmark_group("graph");
    group.sample_size(20);
    group.bench_function("build_cold_cache", |b| {
        b.iter(|| {
            let cache = DependencyCache::new();
            black_box(DependencyMapBuilder::new(&reader, &cache).build("Node0"))
        })
    });

    let cache = DependencyCache::new();
    DependencyMapBuilder::new(&reader, &cache).build("Node0");
    group.bench_function("build_warm_cache", |b| {
        b.iter(|| black_box(DependencyMapBuilder::new(&reader, &cache).build("Node0")))
    });
    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let source = generate_corpus(200);
    let parser =
        TypeDeclarationParser::new(TypeDeclarationReader::from_source("bench.d.ts", source));
    let roots: Vec<String> = (0..16).map(|i| format!("Node{i}")).collect();

    let mut group = c.benchmark_group("reduce");
    group.sample_size(20);
    group.bench_function("parse_target_type", |b| {
        b.iter(|| black_box(parser.parse_target_type("Node0")))
    });
    group.bench_function("parse_16_roots_parallel", |b| {
        b.iter(|| {
            let results: Vec<_> = roots
                .par_iter()
                .map(|root| parser.parse_target_type(root))
                .collect();
            black_box(results)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_index, bench_build, bench_reduce);
criterion_main!(benches);
