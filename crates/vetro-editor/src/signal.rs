//! Single-threaded signal/slot notification.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vetro_exec::Dispose;

type Slot<T> = Rc<RefCell<dyn FnMut(&T)>>;

/// A list of handlers invoked synchronously on [`Signal::emit`].
///
/// Handlers may disconnect (any subscription, including their own) during an
/// emit; a handler disconnected mid-emit may still observe that emit.
/// Disconnecting removes the slot entry, so churning subscriptions (one per
/// pick step, per viewport) do not accumulate.
pub struct Signal<T> {
    slots: Rc<RefCell<Vec<(u64, Slot<T>)>>>,
    next_id: Cell<u64>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Connect a handler. Disposing the returned subscription disconnects.
    pub fn connect(&self, f: impl FnMut(&T) + 'static) -> Dispose {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.slots
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(f))));
        let slots = Rc::downgrade(&self.slots);
        Dispose::new(move || {
            if let Some(slots) = slots.upgrade() {
                slots.borrow_mut().retain(|(slot_id, _)| *slot_id != id);
            }
        })
    }

    /// Invoke every connected handler with `value`.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Slot<T>> = self
            .slots
            .borrow()
            .iter()
            .map(|(_, slot)| slot.clone())
            .collect();
        for slot in snapshot {
            (slot.borrow_mut())(value);
        }
    }

    pub fn connection_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

/// Editor-wide notifications other UI reacts to without polling.
#[derive(Default)]
pub struct EditorSignals {
    /// Pinged after every pointer update and every accepted or abandoned
    /// pick, so dependent UI can refresh.
    pub point_picker_changed: Signal<()>,
    /// A factory recomputed its temporary preview.
    pub factory_updated: Signal<()>,
    /// A factory committed its result to the database.
    pub factory_committed: Signal<()>,
}
