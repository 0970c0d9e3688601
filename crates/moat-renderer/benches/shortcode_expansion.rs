//! Benchmarks for shortcode expansion.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use std::convert::Infallible;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use moat_renderer::shortcode::{ShortcodeCall, ShortcodeEngine, ShortcodeRegistry};

struct Callout;

impl ShortcodeRegistry for Callout {
    type Context = ();
    type Error = Infallible;

    fn contains(&self, name: &str) -> bool {
        matches!(name, "note" | "badge")
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn render(&self, call: &ShortcodeCall<'_>, _ctx: &()) -> Result<String, Infallible> {
        Ok(format!(
            "<div class=\"{}\">{}</div>",
            call.name,
            call.inner.or(call.args.get("text")).unwrap_or_default()
        ))
    }
}

/// Generate markdown with `sections` sections, each holding one block and one
/// self-closing shortcode.
fn generate_markdown(sections: usize) -> String {
    let mut md = String::from("# Document\n\n");
    for i in 0..sections {
        md.push_str(&format!("## Section {i}\n\nSome text with **markup**.\n\n"));
        md.push_str(&format!(
            "{{{{< note type=\"info\" >}}}}\nNote {i} with a [link](/p/{i}/).\n{{{{< /note >}}}}\n\n"
        ));
        md.push_str(&format!("Status: {{{{< badge text=\"v{i}\" />}}}}\n\n"));
    }
    md
}

fn bench_plain_text(c: &mut Criterion) {
    let markdown = "# Title\n\nNo shortcodes here, only prose.\n".repeat(50);
    let engine = ShortcodeEngine::new(&Callout);

    c.bench_function("expand_without_shortcodes", |b| {
        b.iter(|| engine.expand(&markdown, &()));
    });
}

fn bench_varying_sizes(c: &mut Criterion) {
    let engine = ShortcodeEngine::new(&Callout);
    let mut group = c.benchmark_group("expand_sections");

    for sections in [5, 25, 100] {
        let markdown = generate_markdown(sections);
        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &markdown,
            |b, md| b.iter(|| engine.expand(md, &())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_plain_text, bench_varying_sizes);
criterion_main!(benches);
