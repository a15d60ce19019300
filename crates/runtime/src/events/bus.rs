//! Topic-based event bus implementation.

use tokio::sync::broadcast;

use super::types::{DiscoveryEvent, GameStateEvent, SynthesisEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Applied and rejected transitions
    GameState,
    /// Rules-service round trips and their results
    Discovery,
    /// Recipe processing progress
    Synthesis,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::GameState, Topic::Discovery, Topic::Synthesis];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    GameState(GameStateEvent),
    Discovery(DiscoveryEvent),
    Synthesis(SynthesisEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::GameState(_) => Topic::GameState,
            Event::Discovery(_) => Topic::Discovery,
            Event::Synthesis(_) => Topic::Synthesis,
        }
    }
}

/// Topic-based event bus
///
/// Every topic owns a broadcast channel created up front, so publishing and
/// subscribing never wait on a lock. Publishing is best-effort: an event
/// with no subscriber is dropped.
#[derive(Clone)]
pub struct EventBus {
    game_state: broadcast::Sender<Event>,
    discovery: broadcast::Sender<Event>,
    synthesis: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            game_state: broadcast::channel(capacity).0,
            discovery: broadcast::channel(capacity).0,
            synthesis: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::GameState => &self.game_state,
            Topic::Discovery => &self.discovery,
            Topic::Synthesis => &self.synthesis,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!(?topic, "no subscribers for topic");
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
