//! Delivery of tasks and routed work: event buses and workflow engines

pub mod bus;
pub mod error;
pub mod workflow;

pub use bus::{
    EventBus, EventCodec, Handler, InMemoryEventBus, JsonCodec, TransportConsumer,
    TransportEventBus, TransportMessage, TransportProducer,
};
pub use error::{DispatchError, Result};
pub use workflow::{
    workflow_sink, ExternalWorkflowEngine, InMemoryWorkflowEngine, WorkflowClient,
    WorkflowEngine, WorkflowSink, WorkflowStart,
};
