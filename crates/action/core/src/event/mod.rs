//! Typed publish/subscribe registry keyed by character and event tag.
//!
//! Two kinds of consumers hang off the registry:
//!
//! - **Subscribers**: closures registered by external observers (UI, audio,
//!   tests). They run immediately inside [`EventRegistry::publish`].
//! - **Module listeners**: modules that registered interest in a tag while
//!   equipped and enabled. They cannot be called from inside `publish`
//!   because their owning group is usually borrowed at that point, so the
//!   event is queued and the owning [`ItemAction`](crate::ItemAction) routes
//!   it after the mutation finishes.

mod types;

pub use types::{ActionEvent, EventTag};

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::ids::{EntityHandle, ModuleKey};

/// Handle returned by [`EventRegistry::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(EntityHandle, &ActionEvent)>;

struct Subscription {
    id: SubscriptionId,
    entity: EntityHandle,
    tag: EventTag,
    handler: Handler,
}

/// Event registry shared by every item action of one host loop.
#[derive(Default)]
pub struct EventRegistry {
    next_subscription: u64,
    subscriptions: Vec<Subscription>,
    listeners: BTreeMap<(EntityHandle, EventTag), Vec<ModuleKey>>,
    pending: VecDeque<(EntityHandle, ActionEvent)>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a closure for `(entity, tag)`.
    pub fn subscribe<F>(&mut self, entity: EntityHandle, tag: EventTag, handler: F) -> SubscriptionId
    where
        F: FnMut(EntityHandle, &ActionEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            entity,
            tag,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    /// Publishes an event for `entity`.
    ///
    /// Subscribers run immediately in registration order. If any module is
    /// listening for the tag, the event is also queued for routing.
    pub fn publish(&mut self, entity: EntityHandle, event: ActionEvent) {
        let tag = event.tag();
        tracing::trace!(%entity, %tag, "publish");

        for sub in self
            .subscriptions
            .iter_mut()
            .filter(|sub| sub.entity == entity && sub.tag == tag)
        {
            (sub.handler)(entity, &event);
        }

        if self
            .listeners
            .get(&(entity, tag))
            .is_some_and(|keys| !keys.is_empty())
        {
            self.pending.push_back((entity, event));
        }
    }

    /// Registers a module as a listener for `(entity, tag)`.
    pub fn listen(&mut self, entity: EntityHandle, tag: EventTag, key: ModuleKey) {
        let keys = self.listeners.entry((entity, tag)).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Drops a module listener for `(entity, tag)`.
    pub fn forget(&mut self, entity: EntityHandle, tag: EventTag, key: ModuleKey) {
        if let Some(keys) = self.listeners.get_mut(&(entity, tag)) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                self.listeners.remove(&(entity, tag));
            }
        }
    }

    /// Drops every listener entry registered for `key`.
    pub fn forget_module(&mut self, key: ModuleKey) {
        self.listeners.retain(|_, keys| {
            keys.retain(|k| *k != key);
            !keys.is_empty()
        });
    }

    /// Module listeners currently registered for `(entity, tag)`.
    pub fn listeners(&self, entity: EntityHandle, tag: EventTag) -> &[ModuleKey] {
        self.listeners
            .get(&(entity, tag))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns true if `key` listens for anything.
    pub fn is_listening(&self, key: ModuleKey) -> bool {
        self.listeners.values().any(|keys| keys.contains(&key))
    }

    /// Takes every queued event awaiting module routing.
    pub fn drain_pending(&mut self) -> Vec<(EntityHandle, ActionEvent)> {
        self.pending.drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("subscriptions", &self.subscriptions.len())
            .field("listeners", &self.listeners)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ActionId, GroupId, ModuleId};
    use std::cell::RefCell;
    use std::rc::Rc;

    const HERO: EntityHandle = EntityHandle(7);

    fn key(module: i32) -> ModuleKey {
        ModuleKey::new(ActionId(1), GroupId(0), ModuleId(module))
    }

    #[test]
    fn subscribers_only_see_their_entity_and_tag() {
        let mut registry = EventRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        registry.subscribe(HERO, EventTag::Equipped, move |_, event| {
            sink.borrow_mut().push(event.clone());
        });

        registry.publish(HERO, ActionEvent::Equipped { action: ActionId(1) });
        registry.publish(HERO, ActionEvent::Unequipped { action: ActionId(1) });
        registry.publish(EntityHandle(8), ActionEvent::Equipped { action: ActionId(2) });

        assert_eq!(
            *seen.borrow(),
            vec![ActionEvent::Equipped { action: ActionId(1) }]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut registry = EventRegistry::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = registry.subscribe(HERO, EventTag::Equipped, move |_, _| {
            *sink.borrow_mut() += 1;
        });

        registry.publish(HERO, ActionEvent::Equipped { action: ActionId(1) });
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.publish(HERO, ActionEvent::Equipped { action: ActionId(1) });

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn events_queue_only_when_a_module_listens() {
        let mut registry = EventRegistry::new();
        registry.publish(HERO, ActionEvent::ClipEmptied { key: key(0) });
        assert!(!registry.has_pending());

        registry.listen(HERO, EventTag::ClipEmptied, key(1));
        registry.listen(HERO, EventTag::ClipEmptied, key(1));
        assert_eq!(registry.listeners(HERO, EventTag::ClipEmptied), &[key(1)]);

        registry.publish(HERO, ActionEvent::ClipEmptied { key: key(0) });
        let pending = registry.drain_pending();
        assert_eq!(pending.len(), 1);
        assert!(!registry.has_pending());
    }

    #[test]
    fn forget_module_clears_every_tag() {
        let mut registry = EventRegistry::new();
        registry.listen(HERO, EventTag::ClipEmptied, key(1));
        registry.listen(HERO, EventTag::UseInput, key(1));
        registry.listen(HERO, EventTag::UseInput, key(2));

        registry.forget_module(key(1));

        assert!(!registry.is_listening(key(1)));
        assert_eq!(registry.listeners(HERO, EventTag::UseInput), &[key(2)]);
        assert!(registry.listeners(HERO, EventTag::ClipEmptied).is_empty());
    }
}
