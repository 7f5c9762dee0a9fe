use crate::fetcher::Requester;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;
use tracing::{info, warn};

/// 所有 worker 共用的設定
pub struct WorkerContext {
    pub requester: Arc<dyn Requester>,
    pub user_agent: String,
    pub verbose: bool,
    pub debug: bool,
}

/// 單次造訪：請求、等待、釋放名額
pub struct Worker {
    url: String,
    delay: Duration,
    context: Arc<WorkerContext>,
}

impl Worker {
    pub fn new(url: String, delay: Duration, context: Arc<WorkerContext>) -> Self {
        Self { url, delay, context }
    }

    /// permit 在延遲結束後才 drop，請求失敗或 panic 時同樣會釋放
    pub async fn run(self, permit: OwnedSemaphorePermit) {
        let _permit = permit;

        match self
            .context
            .requester
            .request(&self.url, &self.context.user_agent)
            .await
        {
            Ok(status) => {
                if self.context.verbose {
                    info!("{} - {}", self.url, status);
                }
            }
            Err(e) => {
                if self.context.debug {
                    warn!("while making a request: {:#}", e);
                }
            }
        }

        tokio::time::sleep(self.delay).await;
    }
}
