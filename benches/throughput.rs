use criterion::{black_box, criterion_group, criterion_main, Criterion};
use radixmux::{middleware, Context, Method, Router, RouterService};

/// Build a service with `count` GET routes spread over a realistic shape:
/// a shared `/api/v1` prefix, per-collection segments, and a few statics.
fn build_service(count: usize) -> RouterService {
    let mut router = Router::new("/api/v1");
    router.get("/health", vec![noop_handler()]);
    router.get("/metrics", vec![noop_handler()]);
    for i in 0..count {
        router.get(&format!("/api/v1/collection{i}/items"), vec![noop_handler()]);
        router.post(&format!("/api/v1/collection{i}/items"), vec![noop_handler()]);
    }
    router.into_service()
}

fn noop_handler() -> std::sync::Arc<dyn radixmux::Middleware> {
    middleware::from_fn(|ctx, next| next(ctx))
}

fn bench_lookup(c: &mut Criterion) {
    for size in [10usize, 100, 500] {
        let service = build_service(size);
        let hit = format!("/api/v1/collection{}/items", size / 2);

        c.bench_function(&format!("lookup_hit_{size}_routes"), |b| {
            b.iter(|| black_box(service.find(black_box(Method::Get), black_box(&hit))))
        });

        c.bench_function(&format!("lookup_miss_{size}_routes"), |b| {
            b.iter(|| {
                black_box(service.find(black_box(Method::Get), black_box("/api/v1/absent/items")))
            })
        });
    }
}

fn bench_full_dispatch(c: &mut Criterion) {
    use radixmux::Middleware;

    let service = build_service(100);
    c.bench_function("dispatch_100_routes", |b| {
        b.iter(|| {
            let mut ctx = Context::new(http::Method::GET, "/api/v1/collection50/items");
            black_box(service.handle(&mut ctx, &|_ctx| Ok(())))
        })
    });
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("build_table_500_routes", |b| {
        b.iter(|| black_box(build_service(500)))
    });
}

criterion_group!(
    benches,
    bench_lookup,
    bench_full_dispatch,
    bench_registration
);
criterion_main!(benches);
