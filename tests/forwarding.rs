//! Forwarding tests: successful relays and upstream failures through the
//! live server, with the transport double capturing the outbound calls.

use cors_gateway::config::GatewayConfig;

mod common;

#[tokio::test]
async fn relays_upstream_response_with_sanitized_headers() {
    let transport = common::MockTransport::replying(
        200,
        &[("content-type", "text/plain"), ("connection", "keep-alive")],
        "hello",
    );
    let (addr, _shutdown) =
        common::spawn_gateway(GatewayConfig::default(), transport.clone()).await;

    let res = common::client()
        .get(format!("http://{addr}/proxy"))
        .query(&[("url", "http://example.com/greeting")])
        .header("origin", "https://a.test")
        .header("referer", "https://a.test/page")
        .header("cf-ray", "abc123")
        .header("x-forwarded-for", "203.0.113.9")
        .header("accept", "text/plain")
        .send()
        .await
        .expect("gateway unreachable");

    // Relay: status and payload verbatim, upstream content-type kept.
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers().get("content-type").unwrap(), "text/plain");
    // Hop-by-hop stripped, caching disabled, CORS echoed.
    assert!(res.headers().get("connection").is_none());
    assert_eq!(res.headers().get("cache-control").unwrap(), "no-store");
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "https://a.test"
    );
    assert_eq!(res.text().await.unwrap(), "hello");

    // The outbound call never carried identity or CDN headers.
    transport.with_recorded(|recorded| {
        let outbound = &recorded[0];
        assert_eq!(outbound.url, "http://example.com/greeting");
        assert!(outbound.headers.get("host").is_none());
        assert!(outbound.headers.get("origin").is_none());
        assert!(outbound.headers.get("referer").is_none());
        assert!(outbound.headers.get("cf-ray").is_none());
        assert!(outbound.headers.get("x-forwarded-for").is_none());
        assert_eq!(outbound.headers.get("accept").unwrap(), "text/plain");
    });
}

#[tokio::test]
async fn post_bodies_reach_the_upstream() {
    let transport = common::MockTransport::replying(201, &[], "created");
    let (addr, _shutdown) =
        common::spawn_gateway(GatewayConfig::default(), transport.clone()).await;

    let res = common::client()
        .post(format!("http://{addr}/proxy"))
        .query(&[("url", "http://example.com/submit")])
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    transport.with_recorded(|recorded| {
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].body.as_deref(), Some("payload".as_bytes()));
    });
}

#[tokio::test]
async fn get_bodies_are_never_forwarded() {
    let transport = common::MockTransport::replying(200, &[], "ok");
    let (addr, _shutdown) =
        common::spawn_gateway(GatewayConfig::default(), transport.clone()).await;

    let res = common::client()
        .get(format!("http://{addr}/proxy"))
        .query(&[("url", "http://example.com/data")])
        .body("should never leave")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    transport.with_recorded(|recorded| {
        assert!(recorded[0].body.is_none());
    });
}

#[tokio::test]
async fn shared_secret_header_never_reaches_the_upstream() {
    let mut config = GatewayConfig::default();
    config.auth.proxy_key = Some("s3cret".to_string());

    let transport = common::MockTransport::replying(200, &[], "ok");
    let (addr, _shutdown) = common::spawn_gateway(config, transport.clone()).await;

    let res = common::client()
        .get(format!("http://{addr}/proxy"))
        .query(&[("url", "http://example.com/data")])
        .header("x-proxy-key", "s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    transport.with_recorded(|recorded| {
        assert!(recorded[0].headers.get("x-proxy-key").is_none());
    });
}

#[tokio::test]
async fn duplicate_url_params_forward_the_last_value() {
    let transport = common::MockTransport::replying(200, &[], "ok");
    let (addr, _shutdown) =
        common::spawn_gateway(GatewayConfig::default(), transport.clone()).await;

    let res = common::client()
        .get(format!("http://{addr}/proxy"))
        .query(&[("url", "ftp://bad.example"), ("url", "http://example.com/ok")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    transport.with_recorded(|recorded| {
        assert_eq!(recorded[0].url, "http://example.com/ok");
    });
}

#[tokio::test]
async fn repeated_requests_are_dispatched_independently() {
    let transport = common::MockTransport::replying(200, &[], "fresh");
    let (addr, _shutdown) =
        common::spawn_gateway(GatewayConfig::default(), transport.clone()).await;

    for _ in 0..3 {
        let res = common::client()
            .get(format!("http://{addr}/proxy"))
            .query(&[("url", "http://example.com/data")])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers().get("cache-control").unwrap(), "no-store");
    }
    assert_eq!(transport.dispatch_count(), 3);
}

#[tokio::test]
async fn upstream_failure_is_502_with_the_cause_and_cors() {
    let transport = common::MockTransport::failing("connection refused");
    let (addr, _shutdown) = common::spawn_gateway(GatewayConfig::default(), transport).await;

    let res = common::client()
        .get(format!("http://{addr}/proxy"))
        .query(&[("url", "http://example.com/down")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let body = res.text().await.unwrap();
    assert!(body.contains("connection refused"), "body was: {body}");
    assert!(body.starts_with("Upstream fetch failed:"));
}

#[tokio::test]
async fn upstream_error_statuses_relay_verbatim() {
    let transport = common::MockTransport::replying(503, &[("retry-after", "30")], "down");
    let (addr, _shutdown) = common::spawn_gateway(GatewayConfig::default(), transport).await;

    let res = common::client()
        .get(format!("http://{addr}/proxy"))
        .query(&[("url", "http://example.com/busy")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.headers().get("retry-after").unwrap(), "30");
    assert_eq!(res.text().await.unwrap(), "down");
}
