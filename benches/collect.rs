//! Benchmarks for module collection.
//!
//! These benchmarks measure a full collection over in-memory projects of
//! various shapes: a wide project importing many themes directly, and a deep
//! chain where each theme imports the next.

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use site_modules::collector::{Client, ClientOptions};
use site_modules::config::{Import, ModuleConfig};
use site_modules::decoder::DefaultDecoder;
use site_modules::filesystem::MemoryFS;
use site_modules::toolchain::NoPackageManager;

/// Add a theme with a couple of component folders and an optional import.
fn add_theme(fs: &mut MemoryFS, name: &str, import: Option<&str>) {
    let dir = format!("/site/themes/{}", name);
    fs.add_file_string(format!("{}/layouts/index.html", dir), "<html></html>")
        .unwrap();
    fs.add_file_string(format!("{}/static/style.css", dir), "body {}")
        .unwrap();
    if let Some(import) = import {
        fs.add_file_string(
            format!("{}/config.toml", dir),
            &format!("[params]\ncolor = \"red\"\n\n[[module.imports]]\npath = \"{}\"\n", import),
        )
        .unwrap();
    }
}

fn client(fs: MemoryFS, imports: Vec<Import>) -> Client {
    let options = ClientOptions::new(PathBuf::from("/site")).with_project_config(ModuleConfig {
        imports,
        ..Default::default()
    });
    Client::with_operations(
        options,
        Box::new(fs),
        Box::new(DefaultDecoder),
        Box::new(NoPackageManager),
    )
}

/// Project importing `count` independent themes.
fn wide_project(count: usize) -> Client {
    let mut fs = MemoryFS::new();
    let mut imports = Vec::with_capacity(count);
    for i in 0..count {
        let name = format!("theme{}", i);
        add_theme(&mut fs, &name, None);
        imports.push(Import::new(&name));
    }
    client(fs, imports)
}

/// Project importing a chain of `depth` themes.
fn deep_project(depth: usize) -> Client {
    let mut fs = MemoryFS::new();
    for i in 0..depth {
        let next = format!("theme{}", i + 1);
        let import = (i + 1 < depth).then_some(next.as_str());
        add_theme(&mut fs, &format!("theme{}", i), import);
    }
    client(fs, vec![Import::new("theme0")])
}

fn bench_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_wide");

    for count in [10, 50, 200] {
        let client = wide_project(count);
        group.bench_with_input(BenchmarkId::new("themes", count), &client, |b, client| {
            b.iter(|| black_box(client.collect().unwrap()))
        });
    }

    group.finish();
}

fn bench_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_deep");

    for depth in [10, 50, 200] {
        let client = deep_project(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &client, |b, client| {
            b.iter(|| black_box(client.collect().unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_wide, bench_deep);
criterion_main!(benches);
