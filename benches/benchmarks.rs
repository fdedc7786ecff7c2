use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use garage_store::{MarketStore, Post, Store, StoreConfig};
use serde_json::json;

fn listing(len: usize) -> Vec<Post> {
    (0..len)
        .map(|i| {
            Post::new(json!({
                "_id": format!("post-{i}"),
                "title": format!("Item {i}"),
                "slug": format!("item-{i}"),
                "metadata": {"price": i}
            }))
        })
        .collect()
}

fn accessor_read_benchmark(c: &mut Criterion) {
    let store = MarketStore::with_http(StoreConfig::default());
    store.set_posts(listing(100));

    c.bench_function("accessor_is_data_ready", |b| {
        b.iter(|| {
            black_box(store.is_data_ready());
        });
    });

    c.bench_function("accessor_posts_100", |b| {
        b.iter(|| {
            black_box(store.posts());
        });
    });
}

fn mutation_benchmark(c: &mut Criterion) {
    let store = MarketStore::with_http(StoreConfig::default());

    c.bench_function("set_search_term", |b| {
        let mut i = 0;
        b.iter(|| {
            store.set_search_term(black_box(format!("term {i}")));
            i += 1;
        });
    });

    let mut group = c.benchmark_group("set_posts");
    for len in [10, 100, 1000].iter() {
        let posts = listing(*len);
        group.bench_with_input(BenchmarkId::from_parameter(len), len, |b, _| {
            b.iter(|| {
                store.set_posts(black_box(posts.clone()));
            });
        });
    }
    group.finish();
}

fn store_subscribe_benchmark(c: &mut Criterion) {
    #[derive(Clone)]
    struct State {
        value: usize,
    }

    let mut group = c.benchmark_group("store_subscribe");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::new(State { value: 0 });

        for _ in 0..*subscriber_count {
            store
                .subscribe(|_| {
                    // Empty subscriber
                })
                .detach();
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.update(|state| state.value = black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    accessor_read_benchmark,
    mutation_benchmark,
    store_subscribe_benchmark,
);
criterion_main!(benches);
