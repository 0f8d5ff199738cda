//! Periodic sampling into a shared collector

use crate::collector::TelemetryCollector;
use crate::error::Result;
use crate::types::TelemetrySample;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Anything that can produce a point-in-time telemetry sample
pub trait TelemetrySource: Send + Sync {
    fn collect_sample(&self) -> Result<TelemetrySample>;
}

/// Replays a fixed template, stamped with the current time on every tick
#[derive(Debug, Clone)]
pub struct StaticTelemetrySource {
    template: TelemetrySample,
}

impl StaticTelemetrySource {
    pub fn new(template: TelemetrySample) -> Self {
        Self { template }
    }
}

impl TelemetrySource for StaticTelemetrySource {
    fn collect_sample(&self) -> Result<TelemetrySample> {
        Ok(TelemetrySample {
            timestamp: Utc::now(),
            ..self.template.clone()
        })
    }
}

/// Record one sample per `interval` until `cancel` fires.
///
/// Must be called from within a tokio runtime. Source and ordering failures
/// are logged and the loop keeps ticking.
pub fn spawn_sampler(
    collector: Arc<TelemetryCollector>,
    source: Arc<dyn TelemetrySource>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let recorded = source
                        .collect_sample()
                        .and_then(|sample| collector.record_sample(sample));
                    if let Err(err) = recorded {
                        tracing::warn!("telemetry sample dropped: {err}");
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("telemetry sampler shutting down");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TelemetryError;

    fn template() -> TelemetrySample {
        TelemetrySample {
            timestamp: Utc::now(),
            keystrokes_per_min: 90.0,
            mouse_moves_per_min: 120.0,
            window_focus_changes: 1,
            pager_events: 0,
            active_tasks: 2,
            idle_minutes: 4.0,
            queue_depth: 3,
            calendar_block_minutes: 0.0,
        }
    }

    struct FailingSource;

    impl TelemetrySource for FailingSource {
        fn collect_sample(&self) -> Result<TelemetrySample> {
            Err(TelemetryError::Source("sensor offline".to_string()))
        }
    }

    #[test]
    fn test_static_source_restamps() {
        let source = StaticTelemetrySource::new(template());
        let sample = source.collect_sample().unwrap();
        assert_eq!(sample.keystrokes_per_min, 90.0);
        assert_eq!(sample.queue_depth, 3);
    }

    #[tokio::test]
    async fn test_sampler_records_until_cancelled() {
        let collector = Arc::new(TelemetryCollector::default());
        let cancel = CancellationToken::new();
        let handle = spawn_sampler(
            Arc::clone(&collector),
            Arc::new(StaticTelemetrySource::new(template())),
            Duration::from_millis(10),
            cancel.clone(),
        );

        tokio::time::sleep(Duration::from_millis(60)).await;
        cancel.cancel();
        handle.await.unwrap();

        let recorded = collector.len();
        assert!(recorded >= 2, "expected several samples, got {}", recorded);
        assert_eq!(collector.summarize().active_tasks, 2.0);

        // Nothing lands after shutdown
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(collector.len(), recorded);
    }

    #[tokio::test]
    async fn test_sampler_survives_source_errors() {
        let collector = Arc::new(TelemetryCollector::default());
        let cancel = CancellationToken::new();
        let handle = spawn_sampler(
            Arc::clone(&collector),
            Arc::new(FailingSource),
            Duration::from_millis(5),
            cancel.clone(),
        );

        tokio::time::sleep(Duration::from_millis(25)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(collector.is_empty());
    }
}
