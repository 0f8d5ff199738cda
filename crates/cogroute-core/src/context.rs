//! Pluggable operator-availability context sources

use crate::attention::{CALENDAR_BLOCK_KEY, QUEUE_DEPTH_KEY};
use crate::error::{Result, RouterError};
use std::collections::HashMap;

/// Ancillary availability signals keyed by name
pub type ContextSnapshot = HashMap<String, f64>;

/// A source of context values, queried on every routing call
pub trait ContextProvider: Send + Sync {
    /// Provider name used in error reports
    fn name(&self) -> &str;

    fn snapshot(&self) -> Result<ContextSnapshot>;
}

fn ensure_numeric(provider: &str, snapshot: &ContextSnapshot) -> Result<()> {
    if let Some((key, _)) = snapshot.iter().find(|(_, v)| !v.is_finite()) {
        return Err(RouterError::NonNumericContext {
            provider: provider.to_string(),
            key: key.clone(),
        });
    }
    Ok(())
}

/// Fixed set of values
#[derive(Debug, Clone)]
pub struct StaticContextProvider {
    data: ContextSnapshot,
}

impl StaticContextProvider {
    pub fn new(data: ContextSnapshot) -> Self {
        Self { data }
    }
}

impl ContextProvider for StaticContextProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn snapshot(&self) -> Result<ContextSnapshot> {
        Ok(self.data.clone())
    }
}

type Producer = Box<dyn Fn() -> anyhow::Result<ContextSnapshot> + Send + Sync>;

/// Wraps a fallible closure; failures and non-finite values surface as errors
pub struct CallableContextProvider {
    name: String,
    producer: Producer,
}

impl CallableContextProvider {
    pub fn new<F>(name: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> anyhow::Result<ContextSnapshot> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            producer: Box::new(producer),
        }
    }
}

impl ContextProvider for CallableContextProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn snapshot(&self) -> Result<ContextSnapshot> {
        let data = (self.producer)().map_err(|source| RouterError::Provider {
            provider: self.name.clone(),
            source,
        })?;
        ensure_numeric(&self.name, &data)?;
        Ok(data)
    }
}

/// Reports the current review-queue length as `queue_depth`
pub struct QueueDepthContextProvider {
    queue_length: Box<dyn Fn() -> usize + Send + Sync>,
}

impl QueueDepthContextProvider {
    pub fn new<F>(queue_length: F) -> Self
    where
        F: Fn() -> usize + Send + Sync + 'static,
    {
        Self {
            queue_length: Box::new(queue_length),
        }
    }
}

impl ContextProvider for QueueDepthContextProvider {
    fn name(&self) -> &str {
        "queue_depth"
    }

    fn snapshot(&self) -> Result<ContextSnapshot> {
        let depth = (self.queue_length)() as f64;
        Ok(ContextSnapshot::from([(QUEUE_DEPTH_KEY.to_string(), depth)]))
    }
}

/// Reports minutes blocked on the calendar in the next hour
pub struct CalendarLoadContextProvider {
    busy_minutes: Box<dyn Fn() -> f64 + Send + Sync>,
}

impl CalendarLoadContextProvider {
    pub fn new<F>(busy_minutes: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        Self {
            busy_minutes: Box::new(busy_minutes),
        }
    }
}

impl ContextProvider for CalendarLoadContextProvider {
    fn name(&self) -> &str {
        "calendar_load"
    }

    fn snapshot(&self) -> Result<ContextSnapshot> {
        let data = ContextSnapshot::from([(
            CALENDAR_BLOCK_KEY.to_string(),
            (self.busy_minutes)().max(0.0),
        )]);
        ensure_numeric(self.name(), &data)?;
        Ok(data)
    }
}

/// Merges child providers in insertion order; later children win on collisions
#[derive(Default)]
pub struct CompositeContextProvider {
    providers: Vec<Box<dyn ContextProvider>>,
}

impl CompositeContextProvider {
    pub fn new(providers: Vec<Box<dyn ContextProvider>>) -> Self {
        Self { providers }
    }

    pub fn add(&mut self, provider: Box<dyn ContextProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ContextProvider for CompositeContextProvider {
    fn name(&self) -> &str {
        "composite"
    }

    fn snapshot(&self) -> Result<ContextSnapshot> {
        let mut merged = ContextSnapshot::new();
        for provider in &self.providers {
            merged.extend(provider.snapshot()?);
        }
        Ok(merged)
    }
}
