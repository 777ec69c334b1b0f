//! Table event stream
//!
//! Coordinators can publish every state transition to an [`EventSink`]. Events
//! are sent while the lock that guards the transition is still held, so the
//! order in which they arrive on the channel is the order in which the
//! coordinator made its decisions:
//!
//! - monitor events are totally ordered (one lock for the whole table)
//! - fork events are ordered per fork (each fork has its own lock)
//!
//! The table uses the stream to count grants and starvation promotions; tests
//! replay it to check the exclusion and ordering invariants after the fact.

use crossbeam::channel::{self, Receiver, Sender};

/// A single coordinator decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// Philosopher asked the monitor for permission to eat
    Hungry { id: usize },
    /// Monitor granted permission (state is now Eating)
    Granted { id: usize },
    /// Philosopher handed permission back (state is now Thinking)
    Released { id: usize },
    /// Monitor promoted a passed-over philosopher to Starving
    Starving { id: usize },
    /// Philosopher now holds `fork`
    ForkAcquired { id: usize, fork: usize },
    /// Philosopher put `fork` back on the table
    ForkReleased { id: usize, fork: usize },
}

impl TableEvent {
    /// Philosopher the event belongs to
    pub fn philosopher(&self) -> usize {
        match *self {
            TableEvent::Hungry { id }
            | TableEvent::Granted { id }
            | TableEvent::Released { id }
            | TableEvent::Starving { id }
            | TableEvent::ForkAcquired { id, .. }
            | TableEvent::ForkReleased { id, .. } => id,
        }
    }
}

/// Sending half of the event stream
///
/// Cloned into each coordinator. A dropped receiver is not an error: the
/// coordinator keeps working and the events are discarded.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: Sender<TableEvent>,
}

impl EventSink {
    /// Wrap an existing crossbeam sender
    pub fn new(tx: Sender<TableEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink backed by an unbounded channel
    pub fn unbounded() -> (Self, Receiver<TableEvent>) {
        let (tx, rx) = channel::unbounded();
        (Self::new(tx), rx)
    }

    /// Create a sink backed by a channel holding at most `capacity` events
    ///
    /// Once the channel is full, `emit` blocks until the receiver catches up,
    /// so the receiver must be drained by a thread that takes no coordinator
    /// lock.
    pub fn bounded(capacity: usize) -> (Self, Receiver<TableEvent>) {
        let (tx, rx) = channel::bounded(capacity);
        (Self::new(tx), rx)
    }

    #[inline]
    pub(crate) fn emit(&self, event: TableEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (sink, rx) = EventSink::unbounded();
        drop(rx);
        // Must not panic
        sink.emit(TableEvent::Hungry { id: 0 });
    }

    #[test]
    fn test_bounded_sink_with_draining_receiver() {
        let (sink, rx) = EventSink::bounded(2);
        let drain = std::thread::spawn(move || rx.iter().count());

        for id in 0..1000 {
            sink.emit(TableEvent::Granted { id });
        }
        drop(sink);

        assert_eq!(drain.join().unwrap(), 1000);
    }

    #[test]
    fn test_bounded_emit_after_receiver_dropped() {
        let (sink, rx) = EventSink::bounded(1);
        drop(rx);
        // Neither call may block once the receiver is gone
        sink.emit(TableEvent::Hungry { id: 0 });
        sink.emit(TableEvent::Hungry { id: 0 });
    }

    #[test]
    fn test_events_arrive_in_send_order() {
        let (sink, rx) = EventSink::unbounded();
        sink.emit(TableEvent::Hungry { id: 2 });
        sink.emit(TableEvent::Granted { id: 2 });
        drop(sink);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            vec![TableEvent::Hungry { id: 2 }, TableEvent::Granted { id: 2 }]
        );
        assert_eq!(events[1].philosopher(), 2);
    }
}
