use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use liteorm::{Filtered, Insert, Select, SqlBuilder, placeholder};

/// SELECT col0, col1, ... FROM t WHERE col0 = :col0 AND col1 = :col1 ...
fn select_with_columns(n: usize) -> Select {
    let names: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let condition = names
        .iter()
        .map(|name| format!("{name} = {}", placeholder(name)))
        .collect::<Vec<_>>()
        .join(" AND ");
    Select::new()
        .columns(names)
        .from_table("t")
        .where_(condition)
        .order_by("col0")
        .limit(10)
}

fn bench_select_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select_build");

    for n in [1, 5, 10, 50, 100] {
        let select = select_with_columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &select, |b, select| {
            b.iter(|| black_box(select.build()));
        });
    }

    group.finish();
}

fn bench_select_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/select_compose");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(select_with_columns(n).build()));
        });
    }

    group.finish();
}

fn bench_insert_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/insert_rows");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let insert = Insert::new("t")
                    .values("a", values.iter().copied())
                    .values("b", values.iter().map(|v| format!("row {v}")));
                black_box(insert.build())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_select_build,
    bench_select_compose,
    bench_insert_rows
);
criterion_main!(benches);
