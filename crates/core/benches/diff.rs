use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rendergap_core::{
    ExtractOptions, TokenMode, analyze_content_difference, diff_tokens, extract_visible_text, lcs_length, tokenize,
};

/// Repeat the rendered fixture's text until it reaches roughly `words` words.
fn corpus(words: usize) -> String {
    let html = std::fs::read_to_string("../../tests/fixtures/spa/rendered.html").unwrap();
    let text = extract_visible_text(&html, &ExtractOptions::default()).unwrap();
    let per_copy = text.split_whitespace().count().max(1);
    vec![text.as_str(); words.div_ceil(per_copy)].join("\n")
}

fn bench_tokenize(c: &mut Criterion) {
    let text = corpus(5_000);
    let mut group = c.benchmark_group("tokenize");

    group.bench_with_input(BenchmarkId::new("word", "5K"), &text, |b, text| {
        b.iter(|| tokenize(black_box(text), TokenMode::Word))
    });

    group.bench_with_input(BenchmarkId::new("line", "5K"), &text, |b, text| {
        b.iter(|| tokenize(black_box(text), TokenMode::Line))
    });

    group.finish();
}

fn bench_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff");

    for size in [500, 2_000, 5_000] {
        let rendered = corpus(size);
        let initial = rendered.lines().step_by(3).collect::<Vec<_>>().join("\n");

        group.bench_with_input(BenchmarkId::new("diff_tokens", size), &(initial.as_str(), rendered.as_str()), |b, (i, r)| {
            b.iter(|| diff_tokens(black_box(i), black_box(r), TokenMode::Word))
        });

        let initial_tokens = tokenize(&initial, TokenMode::Word);
        let rendered_tokens = tokenize(&rendered, TokenMode::Word);
        group.bench_with_input(
            BenchmarkId::new("lcs_length", size),
            &(initial_tokens, rendered_tokens),
            |b, (i, r)| b.iter(|| lcs_length(black_box(i), black_box(r))),
        );
    }

    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let initial_html = std::fs::read_to_string("../../tests/fixtures/spa/initial.html").unwrap();
    let rendered_html = std::fs::read_to_string("../../tests/fixtures/spa/rendered.html").unwrap();
    let options = ExtractOptions::default();

    c.bench_function("extract_and_analyze", |b| {
        b.iter(|| {
            let initial = extract_visible_text(black_box(&initial_html), &options).unwrap();
            let rendered = extract_visible_text(black_box(&rendered_html), &options).unwrap();
            analyze_content_difference(&initial, &rendered)
        })
    });
}

criterion_group!(benches, bench_tokenize, bench_diff, bench_full_analysis);
criterion_main!(benches);
