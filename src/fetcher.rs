use crate::metrics::MetricsSink;
use anyhow::{Context, Result};
use reqwest::header::USER_AGENT;
use reqwest::{Client, Proxy};
use std::sync::Arc;
use std::time::Duration;

/// Requester trait - 單次 GET 請求的抽象介面
#[async_trait::async_trait]
pub trait Requester: Send + Sync {
    /// 發出請求，成功時回傳狀態行（例如 "200 OK"）
    async fn request(&self, url: &str, user_agent: &str) -> Result<String>;
}

/// 建立 HTTP 客戶端
/// timeout 為 0 代表不限時；proxy 為空字串視同未設定
pub fn build_client(proxy: Option<&str>, timeout: Duration) -> Result<Client> {
    let mut builder = Client::builder();

    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = Proxy::all(proxy).with_context(|| format!("invalid proxy URL {:?}", proxy))?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("failed to build HTTP client")
}

/// HTTP 實作，成功時更新計數器
pub struct HttpRequester {
    client: Client,
    metrics: Arc<dyn MetricsSink>,
}

impl HttpRequester {
    pub fn new(client: Client, metrics: Arc<dyn MetricsSink>) -> Self {
        Self { client, metrics }
    }
}

#[async_trait::async_trait]
impl Requester for HttpRequester {
    async fn request(&self, url: &str, user_agent: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        self.metrics.record_visit(url);
        self.metrics.record_status(status.as_u16());

        Ok(status.to_string())
    }
}
