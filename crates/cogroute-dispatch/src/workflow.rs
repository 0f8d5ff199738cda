//! Workflow engines that accept routed work items

use crate::error::{DispatchError, Result};
use cogroute_core::{RouteStrategy, Sink, TaskIntent, WorkItem};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

pub trait WorkflowEngine: Send + Sync {
    fn enqueue(&self, item: &WorkItem) -> Result<()>;
}

impl<W: WorkflowEngine + ?Sized> WorkflowEngine for Arc<W> {
    fn enqueue(&self, item: &WorkItem) -> Result<()> {
        (**self).enqueue(item)
    }
}

/// Ordered in-process queue, used by simulations and tests
#[derive(Debug, Default)]
pub struct InMemoryWorkflowEngine {
    items: Mutex<Vec<WorkItem>>,
}

impl InMemoryWorkflowEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything enqueued so far, oldest first
    pub fn items(&self) -> Vec<WorkItem> {
        self.items.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl WorkflowEngine for InMemoryWorkflowEngine {
    fn enqueue(&self, item: &WorkItem) -> Result<()> {
        self.items.lock().push(item.clone());
        Ok(())
    }
}

/// Request to start one workflow execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStart {
    pub workflow: String,
    pub id: String,
    pub task_queue: String,
    pub input: serde_json::Value,
}

/// Client of an external durable-workflow service
pub trait WorkflowClient: Send + Sync {
    fn start_workflow(&self, start: WorkflowStart) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct WorkflowInput<'a> {
    task: &'a TaskIntent,
    route_strategy: RouteStrategy,
    priority: f64,
    attention_load: f64,
    rationale: &'a str,
}

/// Starts one external workflow per work item
pub struct ExternalWorkflowEngine<C> {
    client: C,
    workflow: String,
    task_queue: String,
    id_prefix: String,
}

impl<C: WorkflowClient> ExternalWorkflowEngine<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            workflow: "HumanReviewWorkflow".to_string(),
            task_queue: "human_review".to_string(),
            id_prefix: "router".to_string(),
        }
    }

    pub fn with_workflow(mut self, workflow: impl Into<String>) -> Self {
        self.workflow = workflow.into();
        self
    }

    pub fn with_task_queue(mut self, task_queue: impl Into<String>) -> Self {
        self.task_queue = task_queue.into();
        self
    }

    pub fn with_id_prefix(mut self, id_prefix: impl Into<String>) -> Self {
        self.id_prefix = id_prefix.into();
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// `{prefix}-{task_id}-{8 hex chars}`; repeated task ids get fresh ids
    fn workflow_id(&self, task_id: &str) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}-{}", self.id_prefix, task_id, &suffix[..8])
    }
}

impl<C: WorkflowClient> WorkflowEngine for ExternalWorkflowEngine<C> {
    fn enqueue(&self, item: &WorkItem) -> Result<()> {
        let input = serde_json::to_value(WorkflowInput {
            task: &item.task,
            route_strategy: item.route_strategy,
            priority: item.priority,
            attention_load: item.attention_load,
            rationale: &item.rationale,
        })
        .map_err(|e| DispatchError::Encode(e.to_string()))?;

        let start = WorkflowStart {
            workflow: self.workflow.clone(),
            id: self.workflow_id(&item.task.task_id),
            task_queue: self.task_queue.clone(),
            input,
        };
        tracing::debug!(workflow = %start.workflow, id = %start.id, "starting workflow");

        self.client
            .start_workflow(start)
            .map_err(|source| DispatchError::Workflow {
                workflow: self.workflow.clone(),
                task_id: item.task_id.clone(),
                source,
            })
    }
}

/// Router sink that enqueues into a workflow engine
pub struct WorkflowSink<W>(W);

pub fn workflow_sink<W: WorkflowEngine>(engine: W) -> WorkflowSink<W> {
    WorkflowSink(engine)
}

impl<W: WorkflowEngine> Sink for WorkflowSink<W> {
    fn handle(&self, item: &WorkItem) -> anyhow::Result<()> {
        Ok(self.0.enqueue(item)?)
    }
}
