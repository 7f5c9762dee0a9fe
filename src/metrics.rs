use anyhow::{Context, Result};
use hyper::header::CONTENT_TYPE;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// 計數器介面 - 讓 Requester 不直接依賴全域狀態
pub trait MetricsSink: Send + Sync {
    /// 記錄一次成功造訪的 URL
    fn record_visit(&self, url: &str);

    /// 記錄回應狀態碼
    fn record_status(&self, status: u16);
}

/// Prometheus 實作
pub struct PrometheusMetrics {
    registry: Registry,
    total_requests: IntCounterVec,
    response_status: IntCounterVec,
}

impl PrometheusMetrics {
    /// 建立並註冊兩個計數器族
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let total_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Number of get requests."),
            &["path"],
        )
        .context("failed to create http_requests_total")?;

        let response_status = IntCounterVec::new(
            Opts::new("response_status", "Status of HTTP response"),
            &["status"],
        )
        .context("failed to create response_status")?;

        registry
            .register(Box::new(total_requests.clone()))
            .context("failed to register http_requests_total")?;
        registry
            .register(Box::new(response_status.clone()))
            .context("failed to register response_status")?;

        Ok(Self {
            registry,
            total_requests,
            response_status,
        })
    }

    /// 以 Prometheus 文字格式輸出
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("failed to encode metrics")?;

        String::from_utf8(buffer).context("metrics output is not UTF-8")
    }
}

#[cfg(test)]
impl PrometheusMetrics {
    pub fn visits(&self, url: &str) -> u64 {
        self.total_requests.with_label_values(&[url]).get()
    }

    pub fn status_count(&self, status: u16) -> u64 {
        self.response_status
            .with_label_values(&[status.to_string().as_str()])
            .get()
    }
}

impl MetricsSink for PrometheusMetrics {
    fn record_visit(&self, url: &str) {
        self.total_requests.with_label_values(&[url]).inc();
    }

    fn record_status(&self, status: u16) {
        self.response_status
            .with_label_values(&[status.to_string().as_str()])
            .inc();
    }
}

/// 啟動 /metrics 伺服器，回傳實際綁定的位址
/// 伺服器會在 shutdown 取消時結束
pub fn start_server(
    addr: SocketAddr,
    metrics: Arc<PrometheusMetrics>,
    shutdown: CancellationToken,
) -> Result<SocketAddr> {
    let make_svc = make_service_fn(move |_conn| {
        let metrics = Arc::clone(&metrics);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let metrics = Arc::clone(&metrics);
                async move { handle(req, &metrics) }
            }))
        }
    });

    let server = Server::try_bind(&addr)
        .with_context(|| format!("failed to bind metrics server on {}", addr))?
        .serve(make_svc);
    let local_addr = server.local_addr();

    let graceful = server.with_graceful_shutdown(async move { shutdown.cancelled().await });
    tokio::spawn(async move {
        if let Err(e) = graceful.await {
            error!("metrics server error: {}", e);
        }
    });

    info!("metrics available at http://{}/metrics", local_addr);
    Ok(local_addr)
}

fn handle(req: Request<Body>, metrics: &PrometheusMetrics) -> Result<Response<Body>, hyper::http::Error> {
    if req.method() != Method::GET || req.uri().path() != "/metrics" {
        return Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::empty());
    }

    match metrics.render() {
        Ok(text) => Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, TextEncoder::new().format_type())
            .body(Body::from(text)),
        Err(e) => {
            error!("{:#}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_visit("https://example.com");
        metrics.record_visit("https://example.com");
        metrics.record_status(200);
        metrics.record_status(404);

        assert_eq!(metrics.visits("https://example.com"), 2);
        assert_eq!(metrics.visits("https://example.org"), 0);
        assert_eq!(metrics.status_count(200), 1);
        assert_eq!(metrics.status_count(404), 1);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_visit("https://example.com");
        metrics.record_status(200);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"http_requests_total{path="https://example.com"} 1"#));
        assert!(text.contains(r#"response_status{status="200"} 1"#));
    }

    #[tokio::test]
    async fn test_concurrent_increments() {
        let metrics = Arc::new(PrometheusMetrics::new().unwrap());

        let mut tasks = vec![];
        for _ in 0..8 {
            let metrics = Arc::clone(&metrics);
            tasks.push(tokio::spawn(async move {
                for _ in 0..1000 {
                    metrics.record_status(200);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(metrics.status_count(200), 8000);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let metrics = Arc::new(PrometheusMetrics::new().unwrap());
        metrics.record_status(503);

        let shutdown = CancellationToken::new();
        let addr = start_server(
            ([127, 0, 0, 1], 0).into(),
            Arc::clone(&metrics),
            shutdown.clone(),
        )
        .unwrap();

        let client = reqwest::Client::new();
        let body = client
            .get(format!("http://{}/metrics", addr))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains(r#"response_status{status="503"} 1"#));

        let missing = client
            .get(format!("http://{}/other", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status().as_u16(), 404);

        shutdown.cancel();
    }
}
