use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recto_core::data::Value;
use recto_core::query::{select_by_attrs_values, sort_by_attr};
use recto_core::record::{Record, Vlist};

fn fixture(count: usize) -> Vec<Record> {
    let template = Record::construct(
        "Part",
        &["name=str".into(), "size=num".into(), "grade=str".into()],
        Vlist::empty(),
        None,
    )
    .unwrap();

    (0..count)
        .map(|i| {
            Record::construct(
                "Part",
                &[],
                Vlist::pairs(vec![
                    ("name", Value::Str(format!("part-{}", i))),
                    ("size", Value::Num(((i * 7919) % 1000) as f64)),
                    ("grade", Value::Str((if i % 3 == 0 { "a" } else { "b" }).to_string())),
                ]),
                Some(&template),
            )
            .unwrap()
        })
        .collect()
}

fn bench_queries(c: &mut Criterion) {
    let records = fixture(1000);

    c.bench_function("sort_by_attr_1000", |b| {
        b.iter(|| sort_by_attr(black_box(&records), "size"))
    });

    let pairs = vec![
        ("grade".to_string(), Value::Str("a".to_string())),
        ("size".to_string(), Value::Num(0.0)),
    ];
    c.bench_function("select_by_attrs_values_1000", |b| {
        b.iter(|| select_by_attrs_values(black_box(&records), &pairs))
    });

    c.bench_function("construct_from_base", |b| {
        let base = &records[0];
        b.iter(|| {
            Record::construct(
                "Part",
                &[],
                Vlist::pairs(vec![("size", Value::Num(42.0))]),
                Some(black_box(base)),
            )
        })
    });
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
