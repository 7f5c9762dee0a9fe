use crate::dispatcher::{types::DEFAULT_USER_AGENT, DispatchConfig};
use anyhow::{bail, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// 命令列參數
#[derive(Parser, Debug)]
#[command(name = "fakeme")]
#[command(
    about = "fakeme makes HTTP request constantly in order to generate random HTTP/DNS traffic noise."
)]
pub struct Args {
    /// user agent
    #[arg(short, long, default_value = DEFAULT_USER_AGENT)]
    pub agent: String,

    /// prints error messages
    #[arg(long)]
    pub debug: bool,

    /// delay between requests
    #[arg(short, long, default_value = "1s", value_parser = parse_duration)]
    pub delay: Duration,

    /// number of concurrent workers
    #[arg(
        short = 'g',
        long = "goroutines",
        visible_alias = "workers",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub workers: i64,

    /// proxy URL
    #[arg(short, long)]
    pub proxy: Option<String>,

    /// random delay between requests
    #[arg(short, long)]
    pub random: bool,

    /// max time to wait for a response before canceling the request
    #[arg(short, long, default_value = "3s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// simple .txt file with URL's to visit
    #[arg(long, default_value = "./urls.txt")]
    pub urls: PathBuf,

    /// enables verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// address of the Prometheus metrics endpoint
    #[arg(long, default_value = "0.0.0.0:2112")]
    pub metrics_addr: SocketAddr,
}

impl Args {
    /// 轉換為派發配置並檢查
    pub fn dispatch_config(&self) -> Result<DispatchConfig> {
        let workers = match usize::try_from(self.workers) {
            Ok(workers) if workers > 0 => workers,
            _ => bail!("number of workers cannot be less or equal to 0"),
        };

        let config = DispatchConfig::new()
            .with_workers(workers)
            .with_delay(self.delay, self.random)
            .with_user_agent(self.agent.clone())
            .with_verbose(self.verbose)
            .with_debug(self.debug);
        config.validate()?;

        Ok(config)
    }
}

/// 解析 "500ms"、"1s"、"1h 30m" 這類時間字串
fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s.trim())
}
