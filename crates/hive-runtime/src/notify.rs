//! Notifier — the typed event channel out of the swarm.
//!
//! Events fan out over a bounded `tokio::sync::broadcast` channel. Slow
//! subscribers lag and skip rather than block the tick loop. A copy of the
//! most recent events is kept for callers that poll instead of subscribe.

use hive_core::event::SwarmEvent;
use std::collections::VecDeque;
use tokio::sync::broadcast;

#[derive(Debug)]
pub struct Notifier {
    tx: broadcast::Sender<SwarmEvent>,
    recent: VecDeque<SwarmEvent>,
    capacity: usize,
    emitted: u64,
}

impl Notifier {
    /// `capacity` bounds both the channel and the recent-event log.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            recent: VecDeque::with_capacity(capacity),
            capacity,
            emitted: 0,
        }
    }

    pub fn emit(&mut self, event: SwarmEvent) {
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(event.clone());
        self.emitted += 1;
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SwarmEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &SwarmEvent> {
        self.recent.iter()
    }

    /// Total events emitted since creation.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}
