//! Routing pipeline: telemetry + context -> attention -> priority -> route

use crate::attention::{AttentionModel, CALENDAR_BLOCK_KEY, CONTEXT_SWITCHES_KEY, QUEUE_DEPTH_KEY};
use crate::context::{ContextProvider, ContextSnapshot};
use crate::error::{Result, RouterError};
use crate::policy::RoutingPolicy;
use crate::types::{RouteStrategy, TaskIntent, WorkItem};
use cogroute_telemetry::TelemetryCollector;
use std::collections::HashMap;
use std::sync::Arc;

/// Receives routed work items for one strategy
pub trait Sink: Send + Sync {
    fn handle(&self, item: &WorkItem) -> anyhow::Result<()>;
}

/// Closure-backed sink, built with [`sink_fn`]
pub struct FnSink<F>(F);

/// Adapt a closure into a [`Sink`]
pub fn sink_fn<F>(f: F) -> FnSink<F>
where
    F: Fn(&WorkItem) -> anyhow::Result<()> + Send + Sync,
{
    FnSink(f)
}

impl<F> Sink for FnSink<F>
where
    F: Fn(&WorkItem) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, item: &WorkItem) -> anyhow::Result<()> {
        (self.0)(item)
    }
}

/// Turns task intents into work items and hands them to registered sinks.
///
/// Registration happens during start-up through `&mut self`; routing itself
/// takes `&self`, so a configured service can be shared behind an `Arc`.
pub struct RouterService {
    telemetry: Arc<TelemetryCollector>,
    attention_model: AttentionModel,
    policy: RoutingPolicy,
    operator_context: ContextSnapshot,
    sinks: HashMap<RouteStrategy, Vec<Box<dyn Sink>>>,
    context_providers: Vec<Box<dyn ContextProvider>>,
}

impl RouterService {
    pub fn new(
        telemetry: Arc<TelemetryCollector>,
        attention_model: AttentionModel,
        policy: RoutingPolicy,
    ) -> Self {
        let mut operator_context = ContextSnapshot::new();
        operator_context.insert(CONTEXT_SWITCHES_KEY.to_string(), 0.0);

        Self {
            telemetry,
            attention_model,
            policy,
            operator_context,
            sinks: HashMap::new(),
            context_providers: Vec::new(),
        }
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    pub fn operator_context(&self) -> &ContextSnapshot {
        &self.operator_context
    }

    /// Merge values into the manually maintained context map
    pub fn update_operator_context<I, K>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        self.operator_context
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v)));
    }

    /// Register a sink by strategy name. Unknown names are rejected here,
    /// before any task is routed.
    pub fn register_sink<S>(&mut self, strategy: &str, sink: S) -> Result<()>
    where
        S: Sink + 'static,
    {
        let strategy: RouteStrategy = strategy.parse()?;
        self.sinks.entry(strategy).or_default().push(Box::new(sink));
        Ok(())
    }

    pub fn register_context_provider<P>(&mut self, provider: P)
    where
        P: ContextProvider + 'static,
    {
        self.context_providers.push(Box::new(provider));
    }

    pub fn sink_count(&self, strategy: RouteStrategy) -> usize {
        self.sinks.get(&strategy).map_or(0, Vec::len)
    }

    /// Route one task. Sinks for the chosen strategy run inline, in
    /// registration order, before this returns; the first sink error stops
    /// dispatch and is returned.
    pub fn handle_task(&self, task: &TaskIntent) -> Result<WorkItem> {
        let mut summary = self.telemetry.summarize();
        let context = self.build_context_snapshot()?;

        if let Some(&depth) = context.get(QUEUE_DEPTH_KEY) {
            summary.queue_depth = depth;
        }
        if let Some(&minutes) = context.get(CALENDAR_BLOCK_KEY) {
            summary.calendar_block_minutes = minutes;
        }

        let attention_load = self.attention_model.score(&summary, &context);
        let priority = self.policy.compute_priority(task, attention_load);
        let strategy = self.policy.route_strategy(task, priority);

        let item = WorkItem {
            task_id: task.task_id.clone(),
            route_strategy: strategy,
            priority,
            attention_load,
            task: task.clone(),
            rationale: build_rationale(task, priority, attention_load),
        };

        tracing::debug!(
            task_id = %item.task_id,
            strategy = %strategy,
            priority,
            attention_load,
            "task routed"
        );

        if let Some(sinks) = self.sinks.get(&strategy) {
            for sink in sinks {
                sink.handle(&item).map_err(|source| RouterError::Sink {
                    strategy: strategy.to_string(),
                    source,
                })?;
            }
        }

        Ok(item)
    }

    /// Manual map first, then each provider in registration order
    fn build_context_snapshot(&self) -> Result<ContextSnapshot> {
        let mut snapshot = self.operator_context.clone();
        for provider in &self.context_providers {
            snapshot.extend(provider.snapshot()?);
        }
        Ok(snapshot)
    }
}

fn build_rationale(task: &TaskIntent, priority: f64, attention_load: f64) -> String {
    format!(
        "priority={:.2} slo_risk={:.1}m confidence={:.2} attention_load={:.2}",
        priority, task.slo_risk_minutes, task.model_confidence, attention_load
    )
}
