use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tagcodec_core::{decode, encode, Value};

/// A catalog-report-shaped value with `n` products.
fn sample_report(n: usize) -> Value {
    let products = (0..n)
        .map(|i| {
            Value::map()
                .with("name", format!("Book #{i}, vol. {}", i % 7))
                .with("price_MDL", 50.0 + i as f64)
                .with("price_EUR", (50.0 + i as f64) / 19.5)
                .with("link", format!("https://example.com/books/{i}"))
                .with("author", if i % 3 == 0 { Value::Null } else { Value::from("Someone") })
        })
        .collect::<Value>();
    Value::map()
        .with("filtered_products", products)
        .with("total_price_EUR", 1234.5)
        .with("timestamp", "2025-06-01T08:30:00Z")
}

fn bench_codec(c: &mut Criterion) {
    for n in [10, 1_000] {
        let value = sample_report(n);
        let text = encode(&value);

        c.bench_function(&format!("encode_report_{n}"), |b| {
            b.iter(|| encode(black_box(&value)))
        });
        c.bench_function(&format!("decode_report_{n}"), |b| {
            b.iter(|| decode(black_box(&text)).unwrap())
        });
    }
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
