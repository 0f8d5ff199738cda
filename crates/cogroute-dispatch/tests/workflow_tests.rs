use cogroute_core::{
    sink_fn, AttentionModel, RouteStrategy, RouterService, RoutingPolicy, TaskIntent, WorkItem,
};
use cogroute_dispatch::{
    workflow_sink, DispatchError, ExternalWorkflowEngine, InMemoryWorkflowEngine, WorkflowClient,
    WorkflowEngine, WorkflowStart,
};
use cogroute_telemetry::TelemetryCollector;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct FakeClient {
    calls: Mutex<Vec<WorkflowStart>>,
}

impl WorkflowClient for FakeClient {
    fn start_workflow(&self, start: WorkflowStart) -> anyhow::Result<()> {
        self.calls.lock().push(start);
        Ok(())
    }
}

struct RejectingClient;

impl WorkflowClient for RejectingClient {
    fn start_workflow(&self, _start: WorkflowStart) -> anyhow::Result<()> {
        anyhow::bail!("namespace not found")
    }
}

fn work_item() -> WorkItem {
    let task = TaskIntent::new("w1", 3, 15.0, 0.6, "Test");
    WorkItem {
        task_id: task.task_id.clone(),
        route_strategy: RouteStrategy::Immediate,
        priority: 0.8,
        attention_load: 0.5,
        task,
        rationale: "priority=0.80 slo_risk=15.0m confidence=0.60 attention_load=0.50".to_string(),
    }
}

#[test]
fn test_in_memory_workflow_stores_items() {
    let engine = InMemoryWorkflowEngine::new();
    let item = work_item();
    engine.enqueue(&item).unwrap();
    engine.enqueue(&item).unwrap();

    assert_eq!(engine.len(), 2);
    assert_eq!(engine.items(), vec![item.clone(), item]);
}

#[test]
fn test_external_engine_starts_workflow() {
    let engine = ExternalWorkflowEngine::new(FakeClient::default())
        .with_workflow("HumanLoop")
        .with_task_queue("human_queue");
    engine.enqueue(&work_item()).unwrap();

    let calls = engine.client().calls.lock();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.workflow, "HumanLoop");
    assert_eq!(call.task_queue, "human_queue");
    assert_eq!(call.input["task"]["task_id"], "w1");
    assert_eq!(call.input["route_strategy"], "immediate");
    assert_eq!(call.input["priority"], 0.8);
    assert!(call.input["rationale"]
        .as_str()
        .unwrap()
        .starts_with("priority=0.80"));
}

#[test]
fn test_external_engine_ids_unique_per_enqueue() {
    let engine = ExternalWorkflowEngine::new(FakeClient::default());
    let item = work_item();
    engine.enqueue(&item).unwrap();
    engine.enqueue(&item).unwrap();

    let calls = engine.client().calls.lock();
    assert_eq!(calls[0].workflow, "HumanReviewWorkflow");
    assert_eq!(calls[0].task_queue, "human_review");
    for call in calls.iter() {
        let suffix = call.id.strip_prefix("router-w1-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
    assert_ne!(calls[0].id, calls[1].id);
}

#[test]
fn test_external_engine_surfaces_client_failure() {
    let engine = ExternalWorkflowEngine::new(RejectingClient).with_id_prefix("ops");
    let err = engine.enqueue(&work_item()).unwrap_err();
    assert!(matches!(err, DispatchError::Workflow { ref task_id, .. } if task_id == "w1"));
}

#[test]
fn test_router_sinks_into_workflow() {
    let collector = Arc::new(TelemetryCollector::default());
    let mut router =
        RouterService::new(collector, AttentionModel::default(), RoutingPolicy::default());
    let engine = Arc::new(InMemoryWorkflowEngine::new());
    let parked = Arc::new(Mutex::new(0usize));

    router
        .register_sink("immediate", workflow_sink(Arc::clone(&engine)))
        .unwrap();
    let counter = Arc::clone(&parked);
    router
        .register_sink(
            "park",
            sink_fn(move |_| {
                *counter.lock() += 1;
                Ok(())
            }),
        )
        .unwrap();

    router
        .handle_task(&TaskIntent::new("sev5", 5, 40.0, 0.4, "Outage"))
        .unwrap();
    router
        .handle_task(&TaskIntent::new("low", 3, 0.0, 0.9, "Noise"))
        .unwrap();

    let items = engine.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].task_id, "sev5");
    assert_eq!(*parked.lock(), 1);
}
