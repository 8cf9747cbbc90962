//! Topic-based event bus implementation.
use std::sync::Arc;

use tokio::sync::broadcast;

use super::types::{GameStateEvent, NarrationEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Narrated messages, in the order they were logged
    Narration,
    /// State machine progress and faults
    GameState,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Narration, Topic::GameState];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone)]
pub enum Event {
    Narration(NarrationEvent),
    GameState(GameStateEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Narration(_) => Topic::Narration,
            Event::GameState(_) => Topic::GameState,
        }
    }
}

struct Channels {
    narration: broadcast::Sender<Event>,
    game_state: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about. Publishing never
/// blocks; events sent while nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                narration: broadcast::channel(capacity).0,
                game_state: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Narration => &self.channels.narration,
            Topic::GameState => &self.channels.game_state,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!(target: "lumen::events", ?topic, "no subscribers");
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut narration = bus.subscribe(Topic::Narration);
        let mut game_state = bus.subscribe(Topic::GameState);

        bus.publish(Event::GameState(GameStateEvent::Closed { turn: 3 }));

        assert!(matches!(
            game_state.recv().await.unwrap(),
            Event::GameState(GameStateEvent::Closed { turn: 3 })
        ));
        assert!(narration.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(Event::GameState(GameStateEvent::Closed { turn: 1 }));
    }
}
