//! Topic-based pub/sub: an in-process bus and a broker-backed bus

use crate::error::{DispatchError, Result};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Subscriber callback
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

pub trait EventBus<E>: Send + Sync {
    fn subscribe(&self, topic: &str, handler: Handler<E>) -> Result<()>;

    fn publish(&self, topic: &str, event: &E) -> Result<()>;
}

/// Synchronous fan-out within the process.
///
/// Handlers for a topic run in subscription order on the publishing thread.
/// The handler list is copied before dispatch, so a handler may subscribe
/// (or publish) without deadlocking; new subscribers see the next event.
pub struct InMemoryEventBus<E> {
    subscribers: RwLock<HashMap<String, Vec<Handler<E>>>>,
}

impl<E> InMemoryEventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.subscribers.read().get(topic).map_or(0, Vec::len)
    }
}

impl<E> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> for InMemoryEventBus<E> {
    fn subscribe(&self, topic: &str, handler: Handler<E>) -> Result<()> {
        self.subscribers
            .write()
            .entry(topic.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn publish(&self, topic: &str, event: &E) -> Result<()> {
        let handlers = self
            .subscribers
            .read()
            .get(topic)
            .cloned()
            .unwrap_or_default();

        tracing::trace!(topic, handlers = handlers.len(), "publishing event");
        for handler in &handlers {
            handler(event);
        }
        Ok(())
    }
}

/// A message delivered by a broker consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    /// Delivery error reported by the broker, if any
    pub error: Option<String>,
}

impl TransportMessage {
    pub fn new(topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            payload,
            error: None,
        }
    }
}

/// Producer half of a message broker client
pub trait TransportProducer: Send + Sync {
    fn produce(&self, topic: &str, payload: Vec<u8>) -> anyhow::Result<()>;

    /// Pump delivery queues, waiting at most `timeout`
    fn flush(&self, timeout: Duration) -> anyhow::Result<()>;
}

/// Consumer half of a message broker client
pub trait TransportConsumer: Send + Sync {
    /// Replace the consumer's subscription with `topics`
    fn subscribe(&self, topics: &[String]) -> anyhow::Result<()>;

    fn poll(&self, timeout: Duration) -> anyhow::Result<Option<TransportMessage>>;
}

/// Converts events to and from wire payloads
pub trait EventCodec<E>: Send + Sync {
    fn encode(&self, event: &E) -> Result<Vec<u8>>;

    fn decode(&self, topic: &str, payload: &[u8]) -> Result<E>;
}

/// UTF-8 JSON payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<E> EventCodec<E> for JsonCodec
where
    E: Serialize + DeserializeOwned,
{
    fn encode(&self, event: &E) -> Result<Vec<u8>> {
        serde_json::to_vec(event).map_err(|e| DispatchError::Encode(e.to_string()))
    }

    fn decode(&self, topic: &str, payload: &[u8]) -> Result<E> {
        serde_json::from_slice(payload).map_err(|e| DispatchError::Decode {
            topic: topic.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Bus over an external broker.
///
/// Publishing never waits for delivery. Consumption is driven by the caller
/// through [`TransportEventBus::poll`], one message per call.
pub struct TransportEventBus<E, P, C> {
    producer: P,
    consumer: C,
    codec: Box<dyn EventCodec<E>>,
    // Ordered so the consumer always sees the same topic list
    handlers: Mutex<BTreeMap<String, Vec<Handler<E>>>>,
}

impl<E, P, C> TransportEventBus<E, P, C>
where
    P: TransportProducer,
    C: TransportConsumer,
{
    pub fn new(producer: P, consumer: C) -> Self
    where
        E: Serialize + DeserializeOwned + 'static,
    {
        Self::with_codec(producer, consumer, JsonCodec)
    }

    pub fn with_codec<K>(producer: P, consumer: C, codec: K) -> Self
    where
        K: EventCodec<E> + 'static,
    {
        Self {
            producer,
            consumer,
            codec: Box::new(codec),
            handlers: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn topics(&self) -> Vec<String> {
        self.handlers.lock().keys().cloned().collect()
    }

    /// Handle at most one message and return how many handlers ran.
    ///
    /// Returns 0 when nothing arrived, when the broker flagged a delivery
    /// error, or when no handler is subscribed to the message's topic.
    pub fn poll(&self, timeout: Duration) -> Result<usize> {
        let message = self
            .consumer
            .poll(timeout)
            .map_err(|source| DispatchError::Transport {
                operation: "poll",
                source,
            })?;

        let Some(message) = message else {
            return Ok(0);
        };

        if let Some(error) = &message.error {
            tracing::warn!(topic = %message.topic, error = %error, "skipping failed delivery");
            return Ok(0);
        }

        let handlers = self
            .handlers
            .lock()
            .get(&message.topic)
            .cloned()
            .unwrap_or_default();
        if handlers.is_empty() {
            return Ok(0);
        }

        let event = self.codec.decode(&message.topic, &message.payload)?;
        for handler in &handlers {
            handler(&event);
        }
        Ok(handlers.len())
    }
}

impl<E, P, C> EventBus<E> for TransportEventBus<E, P, C>
where
    P: TransportProducer,
    C: TransportConsumer,
{
    fn subscribe(&self, topic: &str, handler: Handler<E>) -> Result<()> {
        let mut handlers = self.handlers.lock();

        // The handler is registered only once the consumer accepts the topic set
        let mut topics: Vec<String> = handlers.keys().cloned().collect();
        if !handlers.contains_key(topic) {
            topics.push(topic.to_string());
            topics.sort();
        }
        self.consumer
            .subscribe(&topics)
            .map_err(|source| DispatchError::Transport {
                operation: "subscribe",
                source,
            })?;

        handlers.entry(topic.to_string()).or_default().push(handler);
        Ok(())
    }

    fn publish(&self, topic: &str, event: &E) -> Result<()> {
        let payload = self.codec.encode(event)?;
        self.producer
            .produce(topic, payload)
            .map_err(|source| DispatchError::Transport {
                operation: "produce",
                source,
            })?;
        self.producer
            .flush(Duration::ZERO)
            .map_err(|source| DispatchError::Transport {
                operation: "flush",
                source,
            })
    }
}
