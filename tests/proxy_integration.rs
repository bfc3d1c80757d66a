//! End-to-end tests for the alias proxy over real sockets.

use std::net::SocketAddr;
use std::time::Duration;

use alias_proxy::config::{AliasConfig, ProxyConfig, ResolverMode, StoreConfig};
use alias_proxy::http::HttpServer;
use alias_proxy::lifecycle::Shutdown;

mod common;

fn base_config(proxy_addr: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.rate_limit.enabled = false;
    config
}

async fn start_proxy(config: ProxyConfig) -> Shutdown {
    let proxy_addr = config.listener.bind_address.clone();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();

    let server = HttpServer::new(config);
    let listener = tokio::net::TcpListener::bind(&proxy_addr).await.unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    tokio::time::sleep(Duration::from_millis(300)).await;
    shutdown
}

#[tokio::test]
async fn test_round_robin_rotation_across_backends() {
    let b1: SocketAddr = "127.0.0.1:28811".parse().unwrap();
    let b2: SocketAddr = "127.0.0.1:28812".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28813".parse().unwrap();

    common::start_mock_backend(b1, "backend-one").await;
    common::start_mock_backend(b2, "backend-two").await;

    let mut config = base_config(proxy_addr);
    config.aliases.push(AliasConfig {
        name: "qwerty".into(),
        endpoints: vec![b1.to_string(), b2.to_string()],
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let mut bodies = Vec::new();
    for _ in 0..4 {
        let res = client
            .get(format!("http://{}/qwerty", proxy_addr))
            .send()
            .await
            .expect("Proxy unreachable");
        assert_eq!(res.status(), 200);
        bodies.push(res.text().await.unwrap());
    }

    assert_eq!(
        bodies,
        vec!["backend-one", "backend-two", "backend-one", "backend-two"]
    );
}

#[tokio::test]
async fn test_retry_skips_dead_backend() {
    // First endpoint is never bound, so the first forward of each request
    // fails and the recovery pick lands on the live backend.
    let dead: SocketAddr = "127.0.0.1:28821".parse().unwrap();
    let live: SocketAddr = "127.0.0.1:28822".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28823".parse().unwrap();

    common::start_mock_backend(live, "survivor").await;

    let mut config = base_config(proxy_addr);
    config.aliases.push(AliasConfig {
        name: "qwerty".into(),
        endpoints: vec![dead.to_string(), live.to_string()],
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/qwerty", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200, "Recovery attempt should succeed");
    assert_eq!(res.text().await.unwrap(), "survivor");
}

#[tokio::test]
async fn test_both_attempts_failing_returns_bad_gateway() {
    let dead1: SocketAddr = "127.0.0.1:28831".parse().unwrap();
    let dead2: SocketAddr = "127.0.0.1:28832".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28833".parse().unwrap();

    let mut config = base_config(proxy_addr);
    config.aliases.push(AliasConfig {
        name: "qwerty".into(),
        endpoints: vec![dead1.to_string(), dead2.to_string()],
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/qwerty", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 502);
}

#[tokio::test]
async fn test_unknown_alias_returns_not_found() {
    let proxy_addr: SocketAddr = "127.0.0.1:28841".parse().unwrap();

    let mut config = base_config(proxy_addr);
    config.aliases.push(AliasConfig {
        name: "qwerty".into(),
        endpoints: vec!["127.0.0.1:28842".into()],
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/zzz", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_backend_5xx_passes_through_without_retry() {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    let backend: SocketAddr = "127.0.0.1:28851".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28852".parse().unwrap();

    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    common::start_programmable_backend(backend, move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (503, "Service Unavailable".into())
        }
    })
    .await;

    let mut config = base_config(proxy_addr);
    config.aliases.push(AliasConfig {
        name: "qwerty".into(),
        endpoints: vec![backend.to_string()],
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/qwerty", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");

    // A backend-returned status is a successful forward, not a
    // forwarding error, so it is passed through and never retried.
    assert_eq!(res.status(), 503);
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rate_limiter_rejects_burst_overflow() {
    let backend: SocketAddr = "127.0.0.1:28861".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28862".parse().unwrap();

    common::start_mock_backend(backend, "ok").await;

    let mut config = base_config(proxy_addr);
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst = 2;
    config.aliases.push(AliasConfig {
        name: "qwerty".into(),
        endpoints: vec![backend.to_string()],
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let mut limited = 0;
    for _ in 0..5 {
        let res = client
            .get(format!("http://{}/qwerty", proxy_addr))
            .send()
            .await
            .expect("Proxy unreachable");
        if res.status() == 429 {
            limited += 1;
        }
    }

    assert!(limited >= 1, "Burst overflow should be rate limited");
}

#[tokio::test]
async fn test_store_resolver_end_to_end() {
    let backend: SocketAddr = "127.0.0.1:28871".parse().unwrap();
    let store_addr: SocketAddr = "127.0.0.1:28872".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:28873".parse().unwrap();

    common::start_mock_backend(backend, "from-store").await;
    common::start_mock_store(store_addr, vec![("qwerty", vec![backend.to_string()])]).await;

    let mut config = base_config(proxy_addr);
    config.resolver.mode = ResolverMode::Store;
    config.resolver.store = Some(StoreConfig {
        url: format!("http://{}", store_addr),
        timeout_secs: 2,
    });

    let _shutdown = start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}/qwerty", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "from-store");

    // An alias the store does not know resolves to not-found.
    let res = client
        .get(format!("http://{}/zzz", proxy_addr))
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(res.status(), 404);
}
