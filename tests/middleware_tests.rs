use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use http::Method as HttpMethod;
use radixmux::middleware::{from_fn, MetricsMiddleware, TracingMiddleware};
use radixmux::{Context, Middleware, Response, Router};

use tracing_util::TestTracing;

type Log = Arc<Mutex<Vec<&'static str>>>;

/// A middleware that records its name, then continues.
fn tag(log: &Log, name: &'static str) -> Arc<dyn Middleware> {
    let log = Arc::clone(log);
    from_fn(move |ctx, next| {
        log.lock().unwrap().push(name);
        next(ctx)
    })
}

/// A middleware that records its name and fails without continuing.
fn fail(log: &Log, name: &'static str) -> Arc<dyn Middleware> {
    let log = Arc::clone(log);
    from_fn(move |_ctx, _next| {
        log.lock().unwrap().push(name);
        Err(anyhow!("{name} refused the request"))
    })
}

fn dispatch(router: Router, method: HttpMethod, path: &str) -> radixmux::HandlerResult {
    let service = router.into_service();
    let mut ctx = Context::new(method, path);
    service.handle(&mut ctx, &|_ctx| Ok(()))
}

#[test]
fn global_middleware_runs_before_route_handlers_in_order() {
    let log: Log = Arc::default();
    let mut router = Router::new("");
    router.add_middleware(tag(&log, "g1"));
    router.add_middleware(tag(&log, "g2"));
    router.get("/pets", vec![tag(&log, "h1"), tag(&log, "h2")]);

    dispatch(router, HttpMethod::GET, "/pets").unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["g1", "g2", "h1", "h2"]);
}

#[test]
fn global_error_prevents_route_handlers() {
    let log: Log = Arc::default();
    let mut router = Router::new("");
    router.add_middleware(fail(&log, "gate"));
    router.get("/pets", vec![tag(&log, "handler")]);

    let err = dispatch(router, HttpMethod::GET, "/pets").unwrap_err();
    assert!(err.to_string().contains("gate"));
    assert_eq!(*log.lock().unwrap(), vec!["gate"]);
}

#[test]
fn handler_error_skips_host_continuation() {
    let log: Log = Arc::default();
    let mut router = Router::new("");
    router.get("/pets", vec![fail(&log, "handler")]);
    let service = router.into_service();

    let reached_host = AtomicUsize::new(0);
    let mut ctx = Context::new(HttpMethod::GET, "/pets");
    let result = service.handle(&mut ctx, &|_ctx| {
        reached_host.fetch_add(1, Ordering::Relaxed);
        Ok(())
    });

    assert!(result.is_err());
    assert_eq!(reached_host.load(Ordering::Relaxed), 0);
}

#[test]
fn chains_snapshot_global_middleware_at_registration() {
    let log: Log = Arc::default();
    let mut router = Router::new("");
    router.get("/early", vec![tag(&log, "early")]);
    router.add_middleware(tag(&log, "late-global"));
    router.get("/late", vec![tag(&log, "late")]);
    let service = router.into_service();

    let mut ctx = Context::new(HttpMethod::GET, "/early");
    service.handle(&mut ctx, &|_ctx| Ok(())).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["early"]);

    log.lock().unwrap().clear();
    let mut ctx = Context::new(HttpMethod::GET, "/late");
    service.handle(&mut ctx, &|_ctx| Ok(())).unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["late-global", "late"]);
}

#[test]
fn route_with_no_handlers_still_runs_global_middleware() {
    let log: Log = Arc::default();
    let mut router = Router::new("");
    router.add_middleware(tag(&log, "global"));
    router.get("/ping", Vec::new());

    dispatch(router, HttpMethod::GET, "/ping").unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["global"]);
}

#[test]
fn middleware_can_observe_after_downstream_runs() {
    let seen_status = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&seen_status);
    let mut router = Router::new("");
    router.add_middleware(from_fn(move |ctx, next| {
        let result = next(ctx);
        if let Some(response) = ctx.response.as_ref() {
            seen.store(response.status as usize, Ordering::Relaxed);
        }
        result
    }));
    router.get(
        "/pets",
        vec![from_fn(|ctx, next| {
            ctx.reply(Response::json(201, serde_json::json!({})));
            next(ctx)
        })],
    );

    dispatch(router, HttpMethod::GET, "/pets").unwrap();
    assert_eq!(seen_status.load(Ordering::Relaxed), 201);
}

#[test]
fn metrics_middleware_counts_requests_and_errors() {
    let metrics = Arc::new(MetricsMiddleware::new());
    let log: Log = Arc::default();
    let mut router = Router::new("");
    router.add_middleware(Arc::clone(&metrics) as Arc<dyn Middleware>);
    router.get("/ok", vec![tag(&log, "ok")]);
    router.get("/bad", vec![fail(&log, "bad")]);
    let service = router.into_service();

    let mut ctx = Context::new(HttpMethod::GET, "/ok");
    service.handle(&mut ctx, &|_ctx| Ok(())).unwrap();
    let mut ctx = Context::new(HttpMethod::GET, "/bad");
    assert!(service.handle(&mut ctx, &|_ctx| Ok(())).is_err());

    assert_eq!(metrics.request_count(), 2);
    assert_eq!(metrics.error_count(), 1);
}

#[test]
fn tracing_middleware_is_transparent() {
    let _tracing = TestTracing::init();
    let mut router = Router::new("");
    router.add_middleware(Arc::new(TracingMiddleware));
    router.get(
        "/pets",
        vec![from_fn(|ctx, next| {
            ctx.reply(Response::json(200, serde_json::json!({})));
            next(ctx)
        })],
    );
    let service = router.into_service();

    let mut ctx = Context::new(HttpMethod::GET, "/pets");
    service.handle(&mut ctx, &|_ctx| Ok(())).unwrap();
    assert_eq!(ctx.response.map(|r| r.status), Some(200));
}

#[test]
fn middleware_can_gate_on_headers() {
    let mut router = Router::new("");
    router.add_middleware(from_fn(|ctx, next| {
        if ctx.get_header("x-api-key") != Some("test123") {
            ctx.reply(Response::error(401, "missing or invalid API key"));
            return Ok(());
        }
        next(ctx)
    }));
    router.get(
        "/pets",
        vec![from_fn(|ctx, next| {
            ctx.reply(Response::json(200, serde_json::json!({ "pets": [] })));
            next(ctx)
        })],
    );
    let service = router.into_service();

    let mut ctx = Context::new(HttpMethod::GET, "/pets");
    service.handle(&mut ctx, &|_ctx| Ok(())).unwrap();
    assert_eq!(ctx.response.as_ref().map(|r| r.status), Some(401));

    let mut ctx = Context::new(HttpMethod::GET, "/pets");
    ctx.set_header("X-API-Key", "test123".to_string());
    service.handle(&mut ctx, &|_ctx| Ok(())).unwrap();
    let response = ctx.response.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.get_header("content-type"), Some("application/json"));
}

#[test]
fn continuation_may_be_invoked_more_than_once() {
    let log: Log = Arc::default();
    let mut router = Router::new("");
    let retry_log = Arc::clone(&log);
    router.get(
        "/retry",
        vec![
            from_fn(move |ctx, next| {
                retry_log.lock().unwrap().push("attempt");
                next(ctx)?;
                next(ctx)
            }),
            tag(&log, "downstream"),
        ],
    );

    dispatch(router, HttpMethod::GET, "/retry").unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["attempt", "downstream", "downstream"]
    );
}
