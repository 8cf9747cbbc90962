//! Narrated message log and structured game events.
use std::collections::VecDeque;
use std::fmt;

use crate::actor::Hit;
use crate::entity::EntityId;
use crate::geometry::Vector;

/// One narrated line, tagged with the turn it happened on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub turn: u64,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.turn, self.text)
    }
}

/// Bounded log of narrated messages, oldest first.
#[derive(Clone, Debug)]
pub struct MessageLog {
    capacity: usize,
    entries: VecDeque<Message>,
}

impl MessageLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, message: Message) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.back()
    }

    /// Messages oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.entries.iter()
    }

    /// The most recent `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &Message> {
        self.entries.iter().skip(self.entries.len().saturating_sub(count))
    }
}

/// Structured record of something that happened during a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Attacked(Hit),
    Died {
        id: EntityId,
        name: String,
        location: Vector,
    },
    PickedUp {
        mob: EntityId,
        items: Vec<EntityId>,
    },
    Dropped {
        mob: EntityId,
        items: Vec<EntityId>,
    },
    LevelChanged {
        from: usize,
        to: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(turn: u64, text: &str) -> Message {
        Message {
            turn,
            text: text.to_string(),
        }
    }

    #[test]
    fn log_evicts_oldest_past_capacity() {
        let mut log = MessageLog::with_capacity(2);
        log.push(message(1, "a"));
        log.push(message(2, "b"));
        log.push(message(3, "c"));
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
        assert_eq!(log.last().map(|m| m.turn), Some(3));
    }

    #[test]
    fn recent_returns_tail_in_order() {
        let mut log = MessageLog::with_capacity(8);
        for turn in 1..=5 {
            log.push(message(turn, "tick"));
        }
        let turns: Vec<u64> = log.recent(2).map(|m| m.turn).collect();
        assert_eq!(turns, vec![4, 5]);
        assert_eq!(log.recent(10).count(), 5);
    }

    #[test]
    fn message_display_includes_turn() {
        assert_eq!(message(7, "You wait.").to_string(), "[7] You wait.");
    }
}
