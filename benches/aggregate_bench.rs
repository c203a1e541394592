//! Benchmarks for credit aggregation and query building
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use permadash::credits::{aggregate, table_rows, CreditNotice, CreditSeries};
use permadash::delegation::{project_totals, DelegationPreference, DelegatorAccount};
use permadash::query::{build_query, QueryFields, QueryFilters, Tag};

fn create_test_notices(count: usize) -> Vec<CreditNotice> {
    // Reverse-ordered, with a mix of second and millisecond timestamps
    (0..count)
        .rev()
        .map(|i| {
            let ts = 1_700_000_000 + i as i64;
            CreditNotice {
                id: format!("notice-{}", i),
                recipient: "game".to_string(),
                quantity: format!("{}.5", i % 100),
                sender: "buyer".to_string(),
                from_process: "token".to_string(),
                ingested_at: if i % 2 == 0 { ts } else { ts * 1000 },
            }
        })
        .collect()
}

fn create_test_accounts(count: usize) -> Vec<DelegatorAccount> {
    (0..count)
        .map(|i| DelegatorAccount {
            wallet: format!("wallet-{:040}", i),
            balance: (i as f64 + 1.0) * 1e12,
            delegation_prefs: vec![
                DelegationPreference {
                    wallet_to: format!("project-{}", i % 25),
                    factor: 0.6,
                },
                DelegationPreference {
                    wallet_to: format!("project-{}", (i + 7) % 25),
                    factor: 0.4,
                },
            ],
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [100, 1000, 10000] {
        let notices = create_test_notices(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("aggregate_{}", size), |b| {
            b.iter(|| aggregate(black_box(&notices)))
        });

        let aggregated = aggregate(&notices);

        group.bench_function(format!("series_{}", size), |b| {
            b.iter(|| CreditSeries::from_notices(black_box(&aggregated)))
        });

        group.bench_function(format!("table_rows_{}", size), |b| {
            b.iter(|| table_rows(black_box(&aggregated)))
        });
    }

    group.finish();
}

fn bench_delegation(c: &mut Criterion) {
    let mut group = c.benchmark_group("delegation");

    for size in [100, 1000, 10000] {
        let accounts = create_test_accounts(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("project_totals_{}", size), |b| {
            b.iter(|| project_totals(black_box(&accounts)))
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    let filters = QueryFilters {
        id: String::new(),
        owner: "vh-NTHVvlKZqRxc8LyyTNok65yQ55a_PJ1zWLb9G2JI".to_string(),
        recipient: String::new(),
        tags: vec![
            Tag::new("App-Name", "aos"),
            Tag::new("Action", "Credit-Notice"),
        ],
    };
    let fields = QueryFields::default();

    group.bench_function("build_query", |b| {
        b.iter(|| build_query(black_box(&filters), black_box(&fields), 100))
    });

    let query = build_query(&filters, &fields, 100);

    group.bench_function("to_graphql", |b| b.iter(|| black_box(&query).to_graphql()));

    group.bench_function("to_pretty_json", |b| {
        b.iter(|| black_box(&query).to_pretty_json().unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_delegation, bench_query);
criterion_main!(benches);
