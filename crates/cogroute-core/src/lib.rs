//! Attention-aware routing of agent work: scoring, policy and the router service

mod attention;
mod config;
mod context;
mod error;
mod policy;
mod router;
mod types;

pub use attention::{AttentionModel, CALENDAR_BLOCK_KEY, CONTEXT_SWITCHES_KEY, QUEUE_DEPTH_KEY};
pub use config::AttentionConfig;
pub use context::{
    CalendarLoadContextProvider, CallableContextProvider, CompositeContextProvider,
    ContextProvider, ContextSnapshot, QueueDepthContextProvider, StaticContextProvider,
};
pub use error::{Result, RouterError};
pub use policy::{PolicyOverrides, RoutingPolicy};
pub use router::{sink_fn, FnSink, RouterService, Sink};
pub use types::{RouteStrategy, TaskIntent, WorkItem};
