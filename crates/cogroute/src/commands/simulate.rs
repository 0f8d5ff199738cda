use chrono::{DateTime, Duration, Utc};
use cogroute_core::{
    sink_fn, AttentionModel, CalendarLoadContextProvider, ContextSnapshot,
    QueueDepthContextProvider, RouteStrategy, RouterService, RoutingPolicy, StaticContextProvider,
    TaskIntent, WorkItem, CONTEXT_SWITCHES_KEY,
};
use cogroute_dispatch::{workflow_sink, EventBus, InMemoryEventBus, InMemoryWorkflowEngine};
use cogroute_telemetry::{TelemetryCollector, TelemetrySample};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub const TASK_TOPIC: &str = "tasks.intent";

const EXPLANATIONS: &[&str] = &[
    "SLO drift detected",
    "Policy compliance uncertainty",
    "Data ambiguity requires review",
    "User escalation waiting",
];
const SENSITIVITY_TAGS: &[&str] = &["standard", "pii", "security"];

pub fn run(tasks: usize, seed: u64) -> anyhow::Result<()> {
    for line in run_simulation(tasks, seed)? {
        println!("{}", line);
    }
    Ok(())
}

/// Seven samples, one every 5 minutes, ending at `now`
fn seed_telemetry(
    collector: &TelemetryCollector,
    rng: &mut StdRng,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    for minutes_ago in (0..=30).rev().step_by(5) {
        collector.record_sample(TelemetrySample {
            timestamp: now - Duration::minutes(minutes_ago),
            keystrokes_per_min: rng.gen_range(80.0..200.0),
            mouse_moves_per_min: rng.gen_range(120.0..350.0),
            window_focus_changes: rng.gen_range(1..=6),
            pager_events: rng.gen_range(0..=2),
            active_tasks: rng.gen_range(1..=4),
            idle_minutes: rng.gen_range(0.0..10.0),
            queue_depth: rng.gen_range(0..=10),
            calendar_block_minutes: rng.gen_range(0.0..25.0),
        })?;
    }
    Ok(())
}

fn random_task(idx: usize, rng: &mut StdRng) -> TaskIntent {
    let explanation = EXPLANATIONS[rng.gen_range(0..EXPLANATIONS.len())];
    let sensitivity = SENSITIVITY_TAGS[rng.gen_range(0..SENSITIVITY_TAGS.len())];

    TaskIntent::new(
        format!("task-{}", idx),
        rng.gen_range(1..=5),
        rng.gen_range(5.0..45.0),
        rng.gen_range(0.4..0.99),
        explanation,
    )
    .with_sensitivity(sensitivity)
    .with_source("simulation")
}

/// Route `tasks` random intents through an event bus into the router and
/// return one report line per routed task. Output depends only on `seed`.
pub fn run_simulation(tasks: usize, seed: u64) -> anyhow::Result<Vec<String>> {
    let rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));

    let telemetry = Arc::new(TelemetryCollector::default());
    seed_telemetry(&telemetry, &mut rng.lock(), Utc::now())?;

    let workflow = Arc::new(InMemoryWorkflowEngine::new());
    let mut router = RouterService::new(
        Arc::clone(&telemetry),
        AttentionModel::default(),
        RoutingPolicy::default(),
    );

    let queue = Arc::clone(&workflow);
    router.register_context_provider(QueueDepthContextProvider::new(move || queue.len()));
    let calendar_rng = Arc::clone(&rng);
    router.register_context_provider(CalendarLoadContextProvider::new(move || {
        calendar_rng.lock().gen_range(0.0..30.0)
    }));
    let switches = rng.lock().gen_range(1..=6) as f64;
    router.register_context_provider(StaticContextProvider::new(ContextSnapshot::from([(
        CONTEXT_SWITCHES_KEY.to_string(),
        switches,
    )])));

    for strategy in [RouteStrategy::Immediate, RouteStrategy::Batch] {
        router.register_sink(strategy.as_str(), workflow_sink(Arc::clone(&workflow)))?;
    }

    let outputs = Arc::new(Mutex::new(Vec::new()));
    for strategy in RouteStrategy::ALL {
        let outputs = Arc::clone(&outputs);
        let queue = Arc::clone(&workflow);
        router.register_sink(
            strategy.as_str(),
            sink_fn(move |item: &WorkItem| {
                outputs.lock().push(format!(
                    "[{}] {} -> {} queue={}",
                    strategy.as_str().to_uppercase(),
                    item.task.task_id,
                    item.rationale,
                    queue.len()
                ));
                Ok(())
            }),
        )?;
    }

    let router = Arc::new(router);
    let failures = Arc::new(Mutex::new(Vec::new()));
    let bus: InMemoryEventBus<TaskIntent> = InMemoryEventBus::new();
    {
        let router = Arc::clone(&router);
        let failures = Arc::clone(&failures);
        bus.subscribe(
            TASK_TOPIC,
            Arc::new(move |task: &TaskIntent| {
                if let Err(e) = router.handle_task(task) {
                    tracing::warn!(task_id = %task.task_id, error = %e, "routing failed");
                    failures.lock().push(format!("{}: {}", task.task_id, e));
                }
            }),
        )?;
    }

    for idx in 1..=tasks {
        let task = random_task(idx, &mut rng.lock());
        bus.publish(TASK_TOPIC, &task)?;
    }

    if let Some(failure) = failures.lock().first() {
        anyhow::bail!("routing failed for {}", failure);
    }

    tracing::info!(
        tasks,
        queued = workflow.len(),
        "simulation complete"
    );
    let lines = outputs.lock().clone();
    Ok(lines)
}
