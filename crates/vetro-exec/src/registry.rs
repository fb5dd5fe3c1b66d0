//! Uniform teardown of resources acquired during a command.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cancellable::Cancellable;

/// Collects every cancellable acquired during a larger operation so they can
/// be torn down together, exactly once.
///
/// At most one resource is designated "finally": it is the single commit
/// point of the whole operation. On [`Registry::finish`] the finally
/// resource is finished while everything else is cancelled, so only one
/// party ever commits.
#[derive(Default)]
pub struct Registry {
    resources: RefCell<Vec<Rc<dyn Cancellable>>>,
    final_resource: RefCell<Option<Rc<dyn Cancellable>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `x` for teardown and hand it back unchanged.
    pub fn resource<T: Cancellable + Clone + 'static>(&self, x: T) -> T {
        self.resources.borrow_mut().push(Rc::new(x.clone()));
        x
    }

    /// Designate `x` as the resource finished (rather than cancelled) when
    /// the registry finishes. Replaces any earlier designation.
    pub fn finally_<T: Cancellable + Clone + 'static>(&self, x: T) -> T {
        *self.final_resource.borrow_mut() = Some(Rc::new(x.clone()));
        x
    }

    /// Cancel the finally resource, then every registered resource in
    /// registration order. Already-settled resources ignore the call.
    pub fn cancel(&self) {
        if let Some(f) = self.final_resource.borrow_mut().take() {
            f.cancel();
        }
        for r in self.take_resources() {
            r.cancel();
        }
    }

    /// Finish the finally resource, then cancel every other registered
    /// resource in registration order.
    pub fn finish(&self) {
        if let Some(f) = self.final_resource.borrow_mut().take() {
            f.finish();
        }
        for r in self.take_resources() {
            r.cancel();
        }
    }

    // Snapshot before iterating: a resource settling mid-teardown may touch
    // the registry, and each resource must be torn down exactly once.
    fn take_resources(&self) -> Vec<Rc<dyn Cancellable>> {
        std::mem::take(&mut *self.resources.borrow_mut())
    }
}
