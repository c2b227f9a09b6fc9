use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::RwLock;

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Topic-keyed synchronous publish/subscribe.
///
/// Handlers for a topic run in registration order, inline with
/// [`publish`](EventBus::publish). Nothing is buffered: a payload published to
/// a topic without subscribers is dropped.
pub struct EventBus<T> {
    topics: RwLock<HashMap<String, Vec<(SubscriptionId, Handler<T>)>>>,
    next_id: AtomicU64,
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topics = self.topics.read();
        f.debug_struct("EventBus")
            .field("topic_count", &topics.len())
            .field(
                "subscriber_count",
                &topics.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn subscribe<F>(
        &self,
        topic: impl Into<String>,
        handler: F,
    ) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.topics
            .write()
            .entry(topic.into())
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscription. Unknown topics or ids are ignored; returns
    /// whether anything was removed.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) -> bool {
        let mut topics = self.topics.write();
        let Some(handlers) = topics.get_mut(topic) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        let removed = handlers.len() != before;

        if handlers.is_empty() {
            topics.remove(topic);
        }
        removed
    }

    /// Deliver `payload` to every current subscriber of `topic` and return how
    /// many handlers ran.
    ///
    /// The subscriber list is snapshotted before delivery, so handlers may
    /// subscribe or unsubscribe without deadlocking; such changes take effect
    /// from the next publish.
    pub fn publish(&self, topic: &str, payload: &T) -> usize {
        let handlers: Vec<Handler<T>> = match self.topics.read().get(topic) {
            Some(handlers) => {
                handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
            }
            None => return 0,
        };

        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().get(topic).map(Vec::len).unwrap_or(0)
    }
}

impl<T: 'static> EventBus<T> {
    /// Subscribe and get a guard that unsubscribes when dropped.
    pub fn subscribe_scoped<F>(
        self: &Arc<Self>,
        topic: impl Into<String>,
        handler: F,
    ) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let id = self.subscribe(topic.clone(), handler);
        Subscription {
            bus: Arc::clone(self),
            topic,
            id,
        }
    }
}

/// Drop guard for a subscription created by
/// [`EventBus::subscribe_scoped`].
pub struct Subscription<T: 'static> {
    bus: Arc<EventBus<T>>,
    topic: String,
    id: SubscriptionId,
}

impl<T: 'static> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl<T: 'static> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

impl<T: 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.topic, self.id);
    }
}
