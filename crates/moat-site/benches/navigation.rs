//! Benchmarks for navigation building and rendering.

use std::fs;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use moat_site::{Document, Metadata, MetadataPolicy, Site, build_navigation, render_navigation};

/// Generate `sections` directories holding `pages` documents each.
fn generate_documents(sections: usize, pages: usize) -> Vec<Document> {
    let mut docs = vec![Document::new("index.md", Metadata::default(), "# Home")];
    for s in 0..sections {
        for p in 0..pages {
            docs.push(Document::new(
                format!("{s:02}-section-{s}/{p:02}-page-{p}.md"),
                Metadata::default(),
                "# Page",
            ));
        }
    }
    docs
}

fn create_source_tree(root: &Path, sections: usize, pages: usize) {
    for doc in generate_documents(sections, pages) {
        let path = root.join(doc.rel_path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("---\ntitle: {}\n---\n{}", doc.title(), doc.body())).unwrap();
    }
}

fn bench_build_navigation(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_navigation");

    for (sections, pages) in [(5, 5), (20, 20), (50, 40)] {
        let docs = generate_documents(sections, pages);
        group.bench_with_input(
            BenchmarkId::from_parameter(docs.len()),
            &docs,
            |b, docs| b.iter(|| build_navigation(docs)),
        );
    }

    group.finish();
}

fn bench_render_navigation(c: &mut Criterion) {
    let nav = build_navigation(&generate_documents(20, 20));

    c.bench_function("render_navigation_400_pages", |b| {
        b.iter(|| render_navigation(&nav, "/docs/section-10/page-10/", "/docs"));
    });
}

fn bench_site_load(c: &mut Criterion) {
    let temp_dir = tempfile::tempdir().unwrap();
    create_source_tree(temp_dir.path(), 10, 10);

    c.bench_function("site_load_100_pages", |b| {
        b.iter(|| Site::load(temp_dir.path(), MetadataPolicy::Lenient).unwrap());
    });
}

criterion_group!(
    benches,
    bench_build_navigation,
    bench_render_navigation,
    bench_site_load
);
criterion_main!(benches);
