use crate::generator::scene::SyntheticSource;
use crate::workflow::config::WorkflowConfig;
use anyhow::{anyhow, Context};
use log::info;
use objectifycore::telemetry::MetricsSnapshot;
use objectifycore::{
    DetectionSource, RawDetection, StabilityConfig, StabilizationEngine, StableDetection,
    Timestamp,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::signal;
use tokio::time::{self, MissedTickBehavior};

/// Runner shared between the cadence loop and the HTTP bridge.
pub type SharedRunner = Arc<Mutex<Runner>>;

#[derive(Debug, Clone, Serialize)]
pub struct CycleResult {
    pub cycle: usize,
    pub timestamp: Timestamp,
    pub raw_count: usize,
    pub pruned: usize,
    pub detections: Vec<StableDetection>,
    pub metrics: MetricsSnapshot,
}

/// Pulls batches from a detection source and feeds them to the engine.
pub struct Runner {
    engine: StabilizationEngine,
    source: Box<dyn DetectionSource + Send>,
    cycle: usize,
}

impl Runner {
    pub fn new(
        stability: StabilityConfig,
        source: Box<dyn DetectionSource + Send>,
    ) -> anyhow::Result<Self> {
        let engine = StabilizationEngine::new(stability).context("building stabilization engine")?;
        Ok(Self {
            engine,
            source,
            cycle: 0,
        })
    }

    pub fn from_config(config: &WorkflowConfig) -> anyhow::Result<Self> {
        let source = SyntheticSource::new(config.scene.clone(), config.seed)
            .context("building synthetic detection source")?;
        Self::new(config.stability.clone(), Box::new(source))
    }

    pub fn engine(&self) -> &StabilizationEngine {
        &self.engine
    }

    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.engine.config().batch_cadence_ms)
    }

    /// One detection cycle: pull a batch from the source and stabilize it.
    pub fn step(&mut self, now: Timestamp) -> anyhow::Result<CycleResult> {
        let batch = self
            .source
            .next_batch()
            .context("pulling raw detections from source")?;
        Ok(self.ingest(&batch, now))
    }

    /// Stabilizes an externally supplied batch.
    pub fn ingest(&mut self, batch: &[RawDetection], now: Timestamp) -> CycleResult {
        let pruned = self.engine.prune_stale(now);
        let detections = self.engine.process_batch(batch, now);
        self.cycle += 1;

        CycleResult {
            cycle: self.cycle,
            timestamp: now,
            raw_count: batch.len(),
            pruned,
            detections,
            metrics: self.engine.metrics(),
        }
    }

    /// Runs `cycles` steps back to back on a logical clock spaced by the cadence.
    pub fn run_offline(&mut self, cycles: usize) -> anyhow::Result<Vec<CycleResult>> {
        let cadence_ms = self.engine.config().batch_cadence_ms;
        (0..cycles)
            .map(|idx| self.step(idx as u64 * cadence_ms))
            .collect()
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.cycle = 0;
    }
}

pub fn now_millis() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Steps the shared runner once per cadence tick until `cycles` have run or
/// Ctrl+C arrives.
pub async fn run_cadence<F>(
    runner: SharedRunner,
    cycles: Option<usize>,
    mut on_cycle: F,
) -> anyhow::Result<usize>
where
    F: FnMut(&CycleResult),
{
    let cadence = runner
        .lock()
        .map_err(|_| anyhow!("runner lock poisoned"))?
        .cadence();
    let mut ticker = time::interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut completed = 0;
    while cycles.map_or(true, |limit| completed < limit) {
        tokio::select! {
            _ = ticker.tick() => {}
            result = &mut ctrl_c => {
                result.context("awaiting Ctrl+C")?;
                info!("detection loop interrupted after {} cycles", completed);
                break;
            }
        }

        let result = runner
            .lock()
            .map_err(|_| anyhow!("runner lock poisoned"))?
            .step(now_millis())?;
        on_cycle(&result);
        completed += 1;
    }

    Ok(completed)
}
