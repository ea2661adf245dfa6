//! Secondary fetches queued after a room change

use std::collections::VecDeque;
use std::fmt;

/// A fetch that refreshes the view of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    FetchMessages { room_id: String },
    FetchMembers { room_id: String },
}

impl FollowUp {
    pub fn room_id(&self) -> &str {
        match self {
            FollowUp::FetchMessages { room_id } | FollowUp::FetchMembers { room_id } => room_id,
        }
    }
}

impl fmt::Display for FollowUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowUp::FetchMessages { room_id } => write!(f, "fetch messages of {room_id}"),
            FollowUp::FetchMembers { room_id } => write!(f, "fetch members of {room_id}"),
        }
    }
}

/// FIFO of pending follow-ups
#[derive(Debug, Default)]
pub struct FollowUpQueue {
    pending: VecDeque<FollowUp>,
}

impl FollowUpQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the message fetch then the member fetch for `room_id`
    pub fn refresh_room(&mut self, room_id: &str) {
        self.pending.push_back(FollowUp::FetchMessages { room_id: room_id.to_string() });
        self.pending.push_back(FollowUp::FetchMembers { room_id: room_id.to_string() });
    }

    pub fn pop(&mut self) -> Option<FollowUp> {
        self.pending.pop_front()
    }

    pub fn drain(&mut self) -> Vec<FollowUp> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_room_queues_messages_before_members() {
        let mut queue = FollowUpQueue::new();
        queue.refresh_room("!a:x");
        queue.refresh_room("!b:x");

        assert_eq!(queue.len(), 4);
        assert_eq!(queue.pop(), Some(FollowUp::FetchMessages { room_id: "!a:x".to_string() }));
        assert_eq!(queue.pop(), Some(FollowUp::FetchMembers { room_id: "!a:x".to_string() }));

        let rest = queue.drain();
        assert_eq!(rest.iter().map(FollowUp::room_id).collect::<Vec<_>>(), vec!["!b:x", "!b:x"]);
        assert!(queue.is_empty());
    }
}
