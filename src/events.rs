//! The event bus (§4.8): seven named channels with typed payloads,
//! dispatched synchronously in subscriber-registration order.
//!
//! Rust closures have no stable identity, so `un` cannot take "the same
//! function" back as the prose spec's `un(name, fn)` suggests; `on` returns
//! a `SubscriptionId` token instead, and `un` takes that token. This is the
//! smallest faithful adaptation of the spec's dynamic event bus design note
//! ("typed channels") to a language without reflective function equality.

use crate::ids::{EdgeId, FaceId, NodeId};

/// Payload for each of the seven event kinds.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    AddNode(NodeId),
    RemoveNode(NodeId),
    AddEdge(EdgeId),
    ModEdge(EdgeId),
    RemoveEdge(EdgeId),
    AddFace(FaceId),
    RemoveFace(FaceId),
}

/// Token returned by `EventBus::on`, used to unsubscribe with `un`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    callback: Box<dyn FnMut(&Event)>,
}

/// Synchronous, single-threaded dispatcher for topology mutation events.
/// Subscribers must not mutate the topology from inside a callback
/// (undefined behavior, per §4.8).
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `callback` to every event emitted. Returns a token usable
    /// with `un` to remove this subscription.
    pub fn on(&mut self, callback: impl FnMut(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, callback: Box::new(callback) });
        id
    }

    /// Remove a subscription previously returned by `on`. No-op if the
    /// subscription was already removed.
    pub fn un(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// Dispatch `event` to every subscriber, in registration order.
    pub fn emit(&mut self, event: Event) {
        for sub in &mut self.subscribers {
            (sub.callback)(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_calls_all_subscribers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let log1 = log.clone();
        bus.on(move |_| log1.borrow_mut().push(1));
        let log2 = log.clone();
        bus.on(move |_| log2.borrow_mut().push(2));
        bus.emit(Event::AddNode(NodeId(1)));
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn un_removes_subscription() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = count.clone();
        let id = bus.on(move |_| *c.borrow_mut() += 1);
        bus.emit(Event::AddNode(NodeId(1)));
        bus.un(id);
        bus.emit(Event::AddNode(NodeId(1)));
        assert_eq!(*count.borrow(), 1);
    }
}
