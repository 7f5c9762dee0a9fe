mod cli;
mod delay;
mod dispatcher;
mod fetcher;
mod metrics;
mod telemetry;
mod types;
mod url_loader;

use anyhow::{bail, Result};
use clap::Parser;
use cli::Args;
use dispatcher::Dispatcher;
use fetcher::HttpRequester;
use metrics::PrometheusMetrics;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use types::TargetList;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_tracing()?;

    let cancel = CancellationToken::new();

    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, stopping");
            shutdown.cancel();
        }
    });

    run(args, cancel).await
}

/// 啟動流程：檢查配置 → 載入網址 → 建立客戶端與計數器 → 派發
/// 任何一步失敗都在送出請求前結束
async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    let config = args.dispatch_config()?;

    let urls = url_loader::load_url_file(&args.urls)?;
    if urls.is_empty() {
        bail!("there is no valid URLs in the file {}", args.urls.display());
    }
    let targets = TargetList::new(urls)?;
    info!("loaded {} URLs from {}", targets.len(), args.urls.display());
    for url in targets.iter() {
        debug!("target: {}", url);
    }

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let client = fetcher::build_client(args.proxy.as_deref(), args.timeout)?;
    let requester = Arc::new(HttpRequester::new(client, metrics.clone()));

    // metrics 伺服器失敗不影響派發
    if let Err(e) = metrics::start_server(args.metrics_addr, metrics, cancel.clone()) {
        warn!("{:#}", e);
    }

    let stats = Dispatcher::new(targets, requester, config)?.run(cancel).await;
    info!("stopped after dispatching {} visits", stats.dispatched);

    Ok(())
}
