use crate::core::shutdown::ShutdownSignal;
use crate::core::{LoadOutcome, Pipeline, Timer};
use crate::utils::error::Result;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub records: usize,
    pub notified: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub cycles: u64,
    pub notifications: u64,
}

/// Drives fetch → rank → notify cycles on a fixed interval until shutdown.
pub struct WatchEngine<P: Pipeline, T: Timer> {
    pipeline: P,
    timer: T,
    interval: Duration,
    shutdown: ShutdownSignal,
    state: WatchState,
    cycles: u64,
}

impl<P: Pipeline, T: Timer> WatchEngine<P, T> {
    pub fn new(pipeline: P, timer: T, interval: Duration, shutdown: ShutdownSignal) -> Self {
        Self {
            pipeline,
            timer,
            interval,
            shutdown,
            state: WatchState::Idle,
            cycles: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles
    }

    async fn cycle(&self) -> Result<(usize, LoadOutcome)> {
        let raw = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} records", raw.len());

        let ranked = self.pipeline.transform(raw).await?;
        let found = ranked.len();

        let outcome = self.pipeline.load(ranked).await?;
        Ok((found, outcome))
    }

    /// 執行一輪；各階段錯誤只記錄，不會讓迴圈停止
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.state = WatchState::Fetching;
        let cycle = self.cycles + 1;
        tracing::debug!("🔄 Cycle {} started", cycle);

        let report = match self.cycle().await {
            Ok((records, outcome)) => {
                let notified = match outcome {
                    LoadOutcome::Notified { count } => count,
                    LoadOutcome::Skipped => 0,
                };
                if records > 0 {
                    tracing::info!("✅ Cycle {}: {} matching sessions", cycle, records);
                } else {
                    tracing::info!("Cycle {}: no matching sessions", cycle);
                }
                CycleReport { cycle, records, notified }
            }
            Err(e) => {
                tracing::error!("❌ Cycle {} failed: {} (Category: {:?})", cycle, e, e.category());
                CycleReport { cycle, records: 0, notified: 0 }
            }
        };

        self.cycles = cycle;
        self.state = WatchState::Idle;
        report
    }

    /// Runs cycles back to back with `interval` between them. The first cycle
    /// starts immediately. Returns once the shutdown signal fires.
    pub async fn run(&mut self) -> RunSummary {
        let shutdown = self.shutdown.clone();
        let mut summary = RunSummary::default();

        loop {
            if shutdown.is_triggered() {
                break;
            }

            let report = tokio::select! {
                report = self.run_cycle() => Some(report),
                _ = shutdown.triggered() => None,
            };
            let Some(report) = report else {
                tracing::info!("🛑 Shutdown requested during cycle");
                self.state = WatchState::Idle;
                break;
            };

            summary.cycles += 1;
            if report.notified > 0 {
                summary.notifications += 1;
            }

            tracing::debug!("⏳ Waiting {:?} before next cycle", self.interval);
            let stopped = tokio::select! {
                _ = self.timer.sleep(self.interval) => false,
                _ = shutdown.triggered() => true,
            };
            if stopped {
                break;
            }
        }

        tracing::info!(
            "🛑 Stopped after {} cycles ({} notifications)",
            summary.cycles,
            summary.notifications
        );
        summary
    }
}
