//! Crunch and format benchmarks.
//!
//! Measures the parse-and-render pipeline across input sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jscrunch_core::ScriptVersion;
use jscrunch_scripting::{crunch_script, format_script, Cruncher};

/// Generate N small functions with comments and control flow
fn generate_n_functions(n: usize) -> String {
    (0..n)
        .map(|i| {
            format!(
                "// helper {i}\nfunction f{i}(a, b) {{\n    var t = a * {i} + b;\n    if (t > 10) {{\n        return t - 1;\n    }}\n    for (var k = 0; k < t; k++) t += k;\n    return t;\n}}\n"
            )
        })
        .collect()
}

fn bench_crunch(c: &mut Criterion) {
    let mut group = c.benchmark_group("crunch");
    for size in &[10, 100, 1000] {
        let source = generate_n_functions(*size);
        group.bench_with_input(BenchmarkId::new("functions", size), &source, |b, src| {
            b.iter(|| black_box(crunch_script(src, None, ScriptVersion::Default).unwrap()));
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    for size in &[10, 100, 1000] {
        let source = generate_n_functions(*size);
        group.bench_with_input(BenchmarkId::new("functions", size), &source, |b, src| {
            b.iter(|| black_box(format_script(src, ScriptVersion::Default).unwrap()));
        });
    }
    group.finish();
}

fn bench_strip(c: &mut Criterion) {
    let cruncher = Cruncher::default();
    let source = generate_n_functions(100);
    c.bench_function("strip/lexical", |b| {
        b.iter(|| black_box(cruncher.remove_comments_with(&source, false).unwrap()));
    });
}

criterion_group!(benches, bench_crunch, bench_format, bench_strip);
criterion_main!(benches);
