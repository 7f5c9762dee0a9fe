use anyhow::{bail, Result};
use rand::Rng;
use std::time::Duration;

/// 每個 worker 請求完成後的等待策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    base: Duration,
    randomize: bool,
}

impl DelayPolicy {
    /// 隨機模式下 base 必須大於 0（[0, 0) 是空區間）
    pub fn new(base: Duration, randomize: bool) -> Result<Self> {
        if randomize && base.is_zero() {
            bail!("random delay requires a delay greater than 0");
        }

        Ok(Self { base, randomize })
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    pub fn is_random(&self) -> bool {
        self.randomize
    }

    /// 固定模式回傳 base，隨機模式回傳 [0, base) 的均勻值
    pub fn compute<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if !self.randomize {
            return self.base;
        }

        let upper = u64::try_from(self.base.as_nanos()).unwrap_or(u64::MAX);
        Duration::from_nanos(rng.random_range(0..upper))
    }
}
