//! Rolling telemetry window

use crate::error::{Result, TelemetryError};
use crate::types::{TelemetrySample, TelemetrySummary};
use chrono::Duration;
use parking_lot::Mutex;
use std::collections::VecDeque;

const DEFAULT_WINDOW_MINUTES: i64 = 30;

/// Keeps every sample within `window` of the most recently inserted one.
///
/// A periodic producer calls [`record_sample`](Self::record_sample) while any
/// number of routers read [`summarize`](Self::summarize); the sample sequence
/// sits behind a mutex so the collector can be shared through an `Arc`.
#[derive(Debug)]
pub struct TelemetryCollector {
    window: Duration,
    samples: Mutex<VecDeque<TelemetrySample>>,
}

impl TelemetryCollector {
    /// A negative window is treated as zero: only samples sharing the latest
    /// timestamp are kept.
    pub fn new(window: Duration) -> Self {
        Self {
            window: window.max(Duration::zero()),
            samples: Mutex::new(VecDeque::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Append a sample and prune everything older than `latest - window`.
    ///
    /// Samples must arrive in non-decreasing timestamp order; an older sample
    /// is rejected and leaves the window untouched.
    pub fn record_sample(&self, sample: TelemetrySample) -> Result<()> {
        let mut samples = self.samples.lock();

        if let Some(last) = samples.back() {
            if sample.timestamp < last.timestamp {
                return Err(TelemetryError::OutOfOrder {
                    sample: sample.timestamp,
                    latest: last.timestamp,
                });
            }
        }

        // No cutoff when the window reaches past the representable range
        let cutoff = sample.timestamp.checked_sub_signed(self.window);
        samples.push_back(sample);

        if let Some(cutoff) = cutoff {
            while let Some(front) = samples.front() {
                if front.timestamp < cutoff {
                    samples.pop_front();
                } else {
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn summarize(&self) -> TelemetrySummary {
        let samples = self.samples.lock();

        let Some(latest) = samples.back() else {
            return TelemetrySummary::default();
        };

        let count = samples.len() as f64;
        let mean = |f: fn(&TelemetrySample) -> f64| samples.iter().map(f).sum::<f64>() / count;

        TelemetrySummary {
            avg_keystrokes: mean(|s| s.keystrokes_per_min),
            avg_mouse_moves: mean(|s| s.mouse_moves_per_min),
            window_changes: mean(|s| s.window_focus_changes as f64),
            pager_events: mean(|s| s.pager_events as f64),
            active_tasks: mean(|s| s.active_tasks as f64),
            idle_minutes: latest.idle_minutes,
            queue_depth: latest.queue_depth as f64,
            calendar_block_minutes: latest.calendar_block_minutes,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_WINDOW_MINUTES))
    }
}
