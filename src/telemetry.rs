use anyhow::{anyhow, Result};
use std::io::IsTerminal as _;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// 初始化日誌，等級由 `RUST_LOG` 控制，預設 INFO
///
/// `--verbose` 與 `--debug` 只決定 worker 是否輸出，不影響這裡的等級。
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing: {}", e))
}
