#![forbid(unsafe_code)]

//! Benchmarks for dashkit view derivation and controls.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use dashkit::filter::{FilterView, SortDirective};
use dashkit::numeric::NumericControl;
use dashkit::paginator::{Paginator, Type as PaginatorType};
use serde_json::{Value, json};

const STATUSES: [&str; 3] = ["active", "inactive", "pending"];

fn build_listings(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Listing {i}"),
                "address": format!("{} Harbor Way", i * 7 % 900),
                "status": STATUSES[i % STATUSES.len()],
                "price": (i * 7919) % 1_000_000,
                "created_at": format!("2024-{:02}-{:02}T09:00:00Z", i % 12 + 1, i % 28 + 1),
            })
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashkit/filter");

    for count in [100_usize, 1_000, 10_000] {
        let mut view = FilterView::new(build_listings(count), ["name", "address"]);
        view.set_search_value("harbor");
        view.set_selected_status("active");
        view.set_sort_by(Some(SortDirective::desc("price")));

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("search_status_sort", count), &view, |b, view| {
            b.iter(|| black_box(view.filtered_data().len()));
        });
    }

    let mut view = FilterView::new(build_listings(1_000), ["name"]);
    view.set_start_date(Some("2024-03-01T00:00:00Z".parse().unwrap()));
    view.set_end_date(Some("2024-06-30T23:59:59Z".parse().unwrap()));
    group.bench_function("date_range_1000", |b| {
        b.iter(|| black_box(view.filtered_indices().len()));
    });

    group.finish();
}

fn bench_paginator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashkit/paginator");

    let data = build_listings(1_000);
    group.bench_function("paginate_1000", |b| {
        b.iter_batched(
            || Paginator::new().per_page(25),
            |mut paginator| {
                paginator.handle_page_change(17);
                black_box(paginator.paginate(&data).items.len());
            },
            BatchSize::SmallInput,
        );
    });

    let paginator = Paginator::new().per_page(10).total_items(1_000);
    group.bench_function("view_arabic", |b| b.iter(|| black_box(paginator.view())));

    let dots_paginator = Paginator::new()
        .display_type(PaginatorType::Dots)
        .per_page(10)
        .total_items(100);
    group.bench_function("view_dots", |b| b.iter(|| black_box(dots_paginator.view())));

    group.finish();
}

fn bench_numeric(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashkit/numeric");

    group.bench_function("stepper_100", |b| {
        b.iter_batched(
            || NumericControl::new(0.0, 250_000.0, |v| {
                black_box(v);
            }),
            |mut control| {
                for _ in 0..100 {
                    control.increment();
                }
                black_box(control.value());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_filter, bench_paginator, bench_numeric);
criterion_main!(benches);
