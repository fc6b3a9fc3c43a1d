//! Change notifications
//!
//! Observers are plain closures called synchronously, in subscription
//! order, after an edit has been committed.

use void_sdl::Record;

use crate::index::TreeIndex;

/// Sent once per committed edit
#[derive(Debug, Clone, Copy)]
pub struct RecordMutated<'a> {
    /// The root record, after the edit
    pub record: &'a Record,
    /// The value cell that was edited
    pub handle: TreeIndex,
}

/// Subscription identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

type Observer = Box<dyn Fn(&RecordMutated<'_>) + Send + Sync>;

/// Ordered list of record-mutated observers
#[derive(Default)]
pub struct ChangeObservers {
    observers: Vec<(SubscriberId, Observer)>,
    next_id: u64,
}

impl ChangeObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to committed edits
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriberId
    where
        F: Fn(&RecordMutated<'_>) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a subscription. Returns false if it was not present.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub_id, _)| *sub_id != id);
        self.observers.len() != before
    }

    /// Deliver an event to every observer
    pub fn notify(&self, event: &RecordMutated<'_>) {
        for (_, observer) in &self.observers {
            observer(event);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl core::fmt::Debug for ChangeObservers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangeObservers")
            .field("subscribers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use void_sdl::{DescriptorRegistry, StateDescriptor};

    #[test]
    fn test_subscribe_notify_unsubscribe() {
        let registry = DescriptorRegistry::new();
        let record = Record::new(Arc::new(StateDescriptor::new("Empty", 1)), &registry).unwrap();

        let mut observers = ChangeObservers::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        let counter = first.clone();
        let id = observers.subscribe(move |event| {
            assert_eq!(event.record.name(), "Empty");
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = second.clone();
        observers.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let event = RecordMutated {
            record: &record,
            handle: TreeIndex::from_bits(0),
        };
        observers.notify(&event);
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&event);

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
        assert_eq!(observers.len(), 1);
    }
}
