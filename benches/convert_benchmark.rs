//! Benchmarks for md2txt conversion performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks test conversion throughput at various document
//! sizes and across renderer dialects.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use md2txt::Converter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WORDS: &[&str] = &[
    "conversion", "terminal", "margin", "banner", "gutter", "column", "nested", "quote",
    "paragraph", "heading", "wrap", "plain", "text", "retro", "display", "document",
];

/// Creates a synthetic Markdown document with the given number of
/// paragraphs, mixing in headings, lists, emphasis, and code.
fn create_test_document(paragraph_count: usize) -> String {
    let mut rng = StdRng::seed_from_u64(0x6d64);
    let mut doc = String::from("---\nparagraph_spacing: 1\nheader_spacing: 2\n---\n");

    for index in 0..paragraph_count {
        if index % 10 == 0 {
            doc.push_str(&format!("## Section {}\n\n", index / 10 + 1));
        }
        if index % 7 == 3 {
            doc.push_str("```\nlet value = compute();\nassert!(value > 0);\n```\n\n");
            continue;
        }
        if index % 5 == 2 {
            doc.push_str("- first item in a list\n- second item in a list\n\n");
            continue;
        }
        let mut sentence = Vec::with_capacity(24);
        for position in 0..24 {
            let word = WORDS[rng.gen_range(0..WORDS.len())];
            if position == 5 {
                sentence.push(format!("**{word}**"));
            } else if position == 11 {
                sentence.push(format!("`{word}`"));
            } else {
                sentence.push(word.to_string());
            }
        }
        doc.push_str(&sentence.join(" "));
        doc.push_str("\n\n");
    }
    doc
}

/// Benchmark full conversion at various sizes.
fn bench_text_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_conversion");

    for para_count in [10, 100, 500].iter() {
        let doc = create_test_document(*para_count);
        let size = doc.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("paragraphs", para_count), &doc, |b, doc| {
            let converter = Converter::new();
            b.iter(|| {
                let _ = converter.convert_str(black_box(doc), ".");
            });
        });
    }

    group.finish();
}

/// Benchmark the renderer dialects on the same document.
fn bench_renderer_dialects(c: &mut Criterion) {
    let mut group = c.benchmark_group("renderer_dialects");
    let doc = create_test_document(100);

    for renderer in ["text", "micron", "gemini"].iter() {
        group.bench_with_input(BenchmarkId::new("renderer", renderer), &doc, |b, doc| {
            let converter = Converter::new().with_renderer(*renderer);
            b.iter(|| {
                let _ = converter.convert_str(black_box(doc), ".");
            });
        });
    }

    group.finish();
}

/// Benchmark hyphenated wrapping against plain wrapping.
fn bench_hyphenation(c: &mut Criterion) {
    let plain = create_test_document(100);
    let hyphenated = plain.replacen(
        "---\n",
        "---\nhyphenate: true\nhyphen_lang: en_US\n",
        1,
    );

    c.bench_function("wrap_plain", |b| {
        let converter = Converter::new().with_width(40);
        b.iter(|| {
            let _ = converter.convert_str(black_box(&plain), ".");
        });
    });

    c.bench_function("wrap_hyphenated", |b| {
        let converter = Converter::new().with_width(40);
        b.iter(|| {
            let _ = converter.convert_str(black_box(&hyphenated), ".");
        });
    });
}

criterion_group!(
    benches,
    bench_text_conversion,
    bench_renderer_dialects,
    bench_hyphenation,
);
criterion_main!(benches);
