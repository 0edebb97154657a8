use buzzdeck_core::parser::extract_question_pairs;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn fenced_payload(pairs: usize) -> String {
    let items: Vec<String> = (0..pairs)
        .map(|i| format!(r#"{{"question": "Question number {i} about a topic", "answer": "answer {i}"}}"#))
        .collect();
    format!(
        "Here are your questions:\n```json\n[{}]\n```\n",
        items.join(", ")
    )
}

fn bench_extract(c: &mut Criterion) {
    let payload = fenced_payload(15);
    c.bench_function("extract_question_pairs", |b| {
        b.iter(|| black_box(extract_question_pairs(black_box(&payload))))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
