use crate::delay::DelayPolicy;
use crate::fetcher::Requester;
use crate::types::{DispatchStats, TargetList};
use super::{types::DispatchConfig, worker::{Worker, WorkerContext}};
use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 派發迴圈：取得名額、隨機挑選目標、啟動 worker
///
/// 名額（semaphore）是唯一的節流點，迴圈本身不等待延遲。
/// 延遲由 worker 在請求完成後承擔，飽和時速率約為 workers / delay。
pub struct Dispatcher {
    targets: TargetList,
    context: Arc<WorkerContext>,
    delay: DelayPolicy,
    slots: Arc<Semaphore>,
    rng: StdRng,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        targets: TargetList,
        requester: Arc<dyn Requester>,
        config: DispatchConfig,
    ) -> Result<Self> {
        config.validate()?;
        let delay = config.delay_policy()?;

        let context = Arc::new(WorkerContext {
            requester,
            user_agent: config.user_agent.clone(),
            verbose: config.verbose,
            debug: config.debug,
        });

        Ok(Self {
            targets,
            context,
            delay,
            slots: Arc::new(Semaphore::new(config.workers)),
            rng: StdRng::seed_from_u64(time_seed()),
            config,
        })
    }

    /// 以固定種子取代時間種子
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// 持續派發直到 cancel 被觸發
    /// 已啟動的 worker 不會被等待
    pub async fn run(mut self, cancel: CancellationToken) -> DispatchStats {
        info!(
            "dispatching to {} targets with {} workers (delay {:?}, random: {})",
            self.targets.len(),
            self.config.workers,
            self.delay.base(),
            self.delay.is_random(),
        );

        let mut stats = DispatchStats::default();

        loop {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&self.slots).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let url = self.targets.pick(&mut self.rng).to_string();
            let delay = self.delay.compute(&mut self.rng);

            let worker = Worker::new(url, delay, Arc::clone(&self.context));
            tokio::spawn(worker.run(permit));
            stats.record_dispatch();
        }

        debug!("dispatcher stopped after {} visits", stats.dispatched);
        stats
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
