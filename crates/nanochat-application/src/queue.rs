//! Input queue for submissions made while a turn is in flight.
//!
//! The queue never dispatches by itself; the [`ChatRuntime`](crate::runtime::ChatRuntime)
//! drains it strictly on the busy-to-idle edge. Items keep their identity
//! across reordering, and a forced-target marker lets `force_send` jump a
//! specific item to the front of the next drain.

use std::sync::Mutex;
use uuid::Uuid;

/// A buffered user submission awaiting dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedItem {
    /// Ephemeral identity, stable across reorders, process lifetime only.
    pub id: Uuid,
    /// The buffered input text.
    pub text: String,
}

/// FIFO queue of pending submissions with edit/delete/reorder support.
#[derive(Default)]
pub struct InputQueue {
    items: Mutex<Vec<QueuedItem>>,
    forced: Mutex<Option<Uuid>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new item; empty or whitespace-only text is rejected.
    pub fn enqueue(&self, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let item = QueuedItem {
            id: Uuid::new_v4(),
            text: text.to_string(),
        };
        let id = item.id;
        self.items.lock().unwrap().push(item);
        Some(id)
    }

    /// Removes the item and returns its text for re-population of the live
    /// input field. Unknown ids are a no-op.
    pub fn edit(&self, id: Uuid) -> Option<String> {
        self.remove(id).map(|item| item.text)
    }

    /// Removes the item. Unknown ids are a no-op.
    pub fn delete(&self, id: Uuid) {
        self.remove(id);
    }

    /// Removes and returns the item with the given id.
    pub fn remove(&self, id: Uuid) -> Option<QueuedItem> {
        let mut items = self.items.lock().unwrap();
        let index = items.iter().position(|q| q.id == id)?;
        Some(items.remove(index))
    }

    /// Moves the item at `from` to position `to`, shifting the others
    /// (move-splice semantics, not a swap). Out-of-range indices are ignored.
    pub fn reorder(&self, from: usize, to: usize) {
        let mut items = self.items.lock().unwrap();
        if from >= items.len() || from == to {
            return;
        }
        let item = items.remove(from);
        let to = to.min(items.len());
        items.insert(to, item);
    }

    /// Marks an item to be dispatched on the next drain, ahead of the head.
    pub fn set_forced(&self, id: Uuid) {
        *self.forced.lock().unwrap() = Some(id);
    }

    /// Dequeues the next item to dispatch: the forced target when one is
    /// marked and still present, otherwise the head. The forced marker is
    /// cleared either way.
    pub fn take_next(&self) -> Option<QueuedItem> {
        let forced = self.forced.lock().unwrap().take();
        let mut items = self.items.lock().unwrap();
        if let Some(id) = forced {
            if let Some(index) = items.iter().position(|q| q.id == id) {
                return Some(items.remove(index));
            }
        }
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }

    /// A snapshot of the queued items, in dispatch order.
    pub fn items(&self) -> Vec<QueuedItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}
