use crate::delay::DelayPolicy;
use anyhow::{bail, Result};
use std::time::Duration;

/// 預設 User-Agent
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:67.0) Gecko/20100101 Firefox/67.0";

/// 派發配置
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// 同時進行的 worker 上限
    pub workers: usize,
    /// 每次請求後的延遲
    pub delay: Duration,
    /// 延遲是否隨機化於 [0, delay)
    pub random_delay: bool,
    pub user_agent: String,
    /// 記錄成功的造訪
    pub verbose: bool,
    /// 記錄失敗的請求
    pub debug: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            delay: Duration::from_secs(1),
            random_delay: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            verbose: false,
            debug: false,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_delay(mut self, delay: Duration, random: bool) -> Self {
        self.delay = delay;
        self.random_delay = random;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 檢查配置並產生延遲策略
    pub fn delay_policy(&self) -> Result<DelayPolicy> {
        DelayPolicy::new(self.delay, self.random_delay)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("number of workers cannot be less or equal to 0");
        }
        self.delay_policy()?;

        Ok(())
    }
}
