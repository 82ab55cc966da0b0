//! End-to-end tests: requests through the proxy to a mock upstream.

use std::net::SocketAddr;

use header_guard::config::{parse_config, ProxyConfig};
use header_guard::security::FrameMode;

mod common;

const HTML: &[(&str, &str)] = &[
    ("Content-Type", "text/html; charset=utf-8"),
    ("Server", "Apache/2.4.1"),
    ("X-Powered-By", "PHP/8.2"),
    ("X-Varnish", "1234"),
];

fn config(proxy: SocketAddr, backend: SocketAddr, extra: &str) -> ProxyConfig {
    parse_config(&format!(
        r#"
        [listener]
        bind_address = "{proxy}"
        {extra}

        [[routes]]
        name = "site"
        path_prefix = "/"
        upstream = "{backend}"
        "#
    ))
    .unwrap()
}

#[tokio::test]
async fn https_listener_gets_full_header_set() {
    let backend: SocketAddr = "127.0.0.1:28301".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28302".parse().unwrap();
    common::start_mock_backend(backend, "200 OK", HTML, "<html></html>").await;

    let mut config = config(proxy, backend, "scheme = \"https\"");
    config.security_headers.enable = Some(true);
    config.security_headers.hsts_preload = Some(false);
    let _shutdown = common::start_proxy(config).await;

    let res = common::client()
        .get(format!("http://{proxy}/index.html"))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    let h = res.headers();
    assert_eq!(h["x-content-type-options"], "nosniff");
    assert_eq!(h["x-xss-protection"], "1; mode=block");
    assert_eq!(h["strict-transport-security"], "max-age=63072000; includeSubDomains");
    assert_eq!(h["x-frame-options"], "SAMEORIGIN");
    assert_eq!(h["referrer-policy"], "strict-origin-when-cross-origin");
    // Token hiding is off: upstream fingerprints pass through.
    assert_eq!(h["server"], "Apache/2.4.1");
    assert_eq!(h["x-powered-by"], "PHP/8.2");
    assert!(h.contains_key("x-request-id"));

    assert_eq!(res.text().await.unwrap(), "<html></html>");
}

#[tokio::test]
async fn hidden_tokens_without_security_headers() {
    let backend: SocketAddr = "127.0.0.1:28311".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28312".parse().unwrap();
    common::start_mock_backend(backend, "200 OK", HTML, "ok").await;

    let mut config = config(proxy, backend, "");
    config.routes[0].security_headers.hide_server_tokens = Some(true);
    config.routes[0].security_headers.enable = Some(false);
    let _shutdown = common::start_proxy(config).await;

    let res = common::client().get(format!("http://{proxy}/")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    let h = res.headers();
    assert!(!h.contains_key("server"));
    assert!(!h.contains_key("x-powered-by"));
    assert!(!h.contains_key("x-varnish"));
    assert!(!h.contains_key("x-frame-options"));
    assert!(!h.contains_key("x-content-type-options"));
}

#[tokio::test]
async fn not_modified_only_gets_hsts() {
    let backend: SocketAddr = "127.0.0.1:28321".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28322".parse().unwrap();
    common::start_mock_backend(backend, "304 Not Modified", &[("Content-Type", "text/html")], "").await;

    let mut config = config(proxy, backend, "trust_forwarded_proto = true");
    config.security_headers.enable = Some(true);
    let _shutdown = common::start_proxy(config).await;

    let res = common::client()
        .get(format!("http://{proxy}/"))
        .header("X-Forwarded-Proto", "https")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 304);
    let h = res.headers();
    assert_eq!(
        h["strict-transport-security"],
        "max-age=63072000; includeSubDomains; preload"
    );
    assert!(!h.contains_key("x-content-type-options"));
    assert!(!h.contains_key("x-xss-protection"));
    assert!(!h.contains_key("x-frame-options"));
    assert!(!h.contains_key("referrer-policy"));
}

#[tokio::test]
async fn plain_http_never_gets_hsts() {
    let backend: SocketAddr = "127.0.0.1:28331".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28332".parse().unwrap();
    common::start_mock_backend(backend, "200 OK", HTML, "ok").await;

    let mut config = config(proxy, backend, "");
    config.security_headers.enable = Some(true);
    let _shutdown = common::start_proxy(config).await;

    let res = common::client().get(format!("http://{proxy}/")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert!(!res.headers().contains_key("strict-transport-security"));
    assert_eq!(res.headers()["x-frame-options"], "SAMEORIGIN");
}

#[tokio::test]
async fn upstream_duplicate_headers_collapse() {
    let backend: SocketAddr = "127.0.0.1:28341".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28342".parse().unwrap();
    common::start_mock_backend(
        backend,
        "200 OK",
        &[
            ("Content-Type", "text/html"),
            ("X-Frame-Options", "ALLOWALL"),
            ("x-frame-options", "SAMEORIGIN"),
        ],
        "ok",
    )
    .await;

    let mut config = config(proxy, backend, "");
    config.security_headers.enable = Some(true);
    config.routes[0].security_headers.frame = Some(FrameMode::Deny);
    let _shutdown = common::start_proxy(config).await;

    let res = common::client().get(format!("http://{proxy}/")).send().await.unwrap();

    let values: Vec<_> = res.headers().get_all("x-frame-options").iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "DENY");
}

#[tokio::test]
async fn unmatched_request_uses_top_level_settings() {
    let backend: SocketAddr = "127.0.0.1:28351".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28352".parse().unwrap();

    let mut config = config(proxy, backend, "server_token = \"edge\"");
    config.routes[0].host = Some("only.example.com".into());
    config.security_headers.enable = Some(true);
    let _shutdown = common::start_proxy(config).await;

    let res = common::client().get(format!("http://{proxy}/missing")).send().await.unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.headers()["server"], "edge");
    assert_eq!(res.headers()["x-frame-options"], "SAMEORIGIN");
    assert!(!res.headers().contains_key("x-content-type-options"));
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let backend: SocketAddr = "127.0.0.1:28361".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28362".parse().unwrap();

    let mut config = config(proxy, backend, "");
    config.security_headers.hide_server_tokens = Some(true);
    let shutdown = common::start_proxy(config).await;

    let res = common::client().get(format!("http://{proxy}/")).send().await.unwrap();

    assert_eq!(res.status(), 502);
    assert!(!res.headers().contains_key("server"));

    shutdown.trigger();
}

#[tokio::test]
async fn stalled_upstream_times_out_through_pipeline() {
    let backend: SocketAddr = "127.0.0.1:28371".parse().unwrap();
    let proxy: SocketAddr = "127.0.0.1:28372".parse().unwrap();
    common::start_stalled_backend(backend).await;

    let mut config = config(proxy, backend, "server_token = \"edge\"");
    config.timeouts.request_secs = 1;
    config.security_headers.enable = Some(true);
    let shutdown = common::start_proxy(config).await;

    let res = common::client().get(format!("http://{proxy}/slow")).send().await.unwrap();

    assert_eq!(res.status(), 504);
    let h = res.headers();
    assert_eq!(h["x-frame-options"], "SAMEORIGIN");
    assert_eq!(h["referrer-policy"], "strict-origin-when-cross-origin");
    assert_eq!(h["server"], "edge");
    assert!(h.contains_key("x-request-id"));

    shutdown.trigger();
}
