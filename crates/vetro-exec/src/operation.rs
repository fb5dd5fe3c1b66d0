//! Promise-like operations that can be cancelled or finished from outside.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::cancellable::{Cancellable, Interrupt, OpError, OpResult};
use crate::registry::Registry;

/// External entry points into a running operation, returned by its executor.
///
/// The closures own whatever cleanup the operation needs (event listeners,
/// overlay objects, control locks) and are responsible for settling the
/// operation through its [`Resolver`].
pub struct Teardown {
    pub cancel: Box<dyn FnMut()>,
    pub finish: Box<dyn FnMut()>,
}

type SettleCallback<T> = Box<dyn FnOnce(OpResult<T>)>;

struct Settle<T> {
    settled: bool,
    value: Option<OpResult<T>>,
    waker: Option<Waker>,
    then: Option<SettleCallback<T>>,
}

/// Settles an [`Operation`] from inside event handlers or teardown closures.
///
/// Only the first call has an effect; an operation settles exactly once.
pub struct Resolver<T> {
    settle: Rc<RefCell<Settle<T>>>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            settle: self.settle.clone(),
        }
    }
}

impl<T> Resolver<T> {
    pub fn resolve(&self, value: T) {
        self.settle(Ok(value));
    }

    pub fn reject(&self, err: impl Into<OpError>) {
        self.settle(Err(err.into()));
    }

    fn settle(&self, result: OpResult<T>) {
        let mut settle = self.settle.borrow_mut();
        if settle.settled {
            return;
        }
        settle.settled = true;
        let waker = settle.waker.take();
        match settle.then.take() {
            Some(callback) => {
                drop(settle);
                callback(result);
            }
            None => {
                settle.value = Some(result);
                drop(settle);
            }
        }
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// The registrable half of an [`Operation`]: shares its teardown closures so
/// a [`Registry`] can interrupt the operation without owning its future.
#[derive(Clone)]
pub struct OpHandle {
    teardown: Rc<RefCell<Option<Teardown>>>,
}

impl OpHandle {
    // Teardown is taken out before running so a re-entrant interrupt from
    // inside a teardown closure sees the operation as already settled.
    fn interrupt(&self, interrupt: Interrupt) {
        let teardown = self.teardown.borrow_mut().take();
        if let Some(mut teardown) = teardown {
            match interrupt {
                Interrupt::Cancel => (teardown.cancel)(),
                Interrupt::Finish => (teardown.finish)(),
            }
        }
    }
}

impl Cancellable for OpHandle {
    fn cancel(&self) {
        self.interrupt(Interrupt::Cancel);
    }

    fn finish(&self) {
        self.interrupt(Interrupt::Finish);
    }
}

/// An asynchronous value with external cancel and finish entry points.
///
/// The executor runs once, immediately at construction: it acquires the
/// operation's UI resources and returns the [`Teardown`] bound to them. The
/// operation then resolves through its [`Resolver`], through `cancel`, or
/// through `finish`, whichever comes first. Awaiting the operation (or
/// attaching [`Operation::then`]) observes the settled result.
pub struct Operation<T> {
    settle: Rc<RefCell<Settle<T>>>,
    handle: OpHandle,
}

impl<T> Operation<T> {
    pub fn new(executor: impl FnOnce(Resolver<T>) -> Teardown) -> Self {
        let settle = Rc::new(RefCell::new(Settle {
            settled: false,
            value: None,
            waker: None,
            then: None,
        }));
        let teardown = executor(Resolver {
            settle: settle.clone(),
        });
        Self {
            settle,
            handle: OpHandle {
                teardown: Rc::new(RefCell::new(Some(teardown))),
            },
        }
    }

    /// The registrable cancel/finish handle.
    pub fn handle(&self) -> OpHandle {
        self.handle.clone()
    }

    /// Register with `registry` and hand the operation back for awaiting.
    pub fn resource(self, registry: &Registry) -> Self {
        registry.resource(self.handle.clone());
        self
    }

    /// Designate as `registry`'s finally resource and hand the operation
    /// back for awaiting.
    pub fn finally_(self, registry: &Registry) -> Self {
        registry.finally_(self.handle.clone());
        self
    }

    /// Attach a continuation instead of awaiting. Runs immediately if the
    /// operation has already settled, otherwise synchronously at settle
    /// time.
    pub fn then(self, f: impl FnOnce(OpResult<T>) + 'static) {
        let mut settle = self.settle.borrow_mut();
        if let Some(value) = settle.value.take() {
            drop(settle);
            f(value);
        } else if !settle.settled {
            settle.then = Some(Box::new(f));
        }
    }
}

impl<T> Future for Operation<T> {
    type Output = OpResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut settle = self.settle.borrow_mut();
        match settle.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                settle.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<T> Cancellable for Operation<T> {
    fn cancel(&self) {
        self.handle.cancel();
    }

    fn finish(&self) {
        self.handle.finish();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn noop_teardown(resolver: &Resolver<i32>) -> Teardown {
        let cancel = {
            let r = resolver.clone();
            Box::new(move || r.reject(Interrupt::Cancel))
        };
        let finish = {
            let r = resolver.clone();
            Box::new(move || r.reject(Interrupt::Finish))
        };
        Teardown { cancel, finish }
    }

    #[test]
    fn test_executor_runs_at_construction() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        let _op = Operation::new(move |resolver: Resolver<i32>| {
            r.set(true);
            noop_teardown(&resolver)
        });
        assert!(ran.get());
    }

    #[test]
    fn test_resolve_settles_then_callback() {
        let out = Rc::new(RefCell::new(None));
        let resolver_slot = Rc::new(RefCell::new(None));
        let slot = resolver_slot.clone();
        let op = Operation::new(move |resolver: Resolver<i32>| {
            *slot.borrow_mut() = Some(resolver.clone());
            noop_teardown(&resolver)
        });

        let o = out.clone();
        op.then(move |result| *o.borrow_mut() = Some(result));
        assert!(out.borrow().is_none());

        if let Some(r) = resolver_slot.borrow().as_ref() {
            r.resolve(7);
        }
        assert_eq!(*out.borrow(), Some(Ok(7)));
    }

    #[test]
    fn test_first_settle_wins() {
        let resolver_slot = Rc::new(RefCell::new(None));
        let slot = resolver_slot.clone();
        let op = Operation::new(move |resolver: Resolver<i32>| {
            *slot.borrow_mut() = Some(resolver.clone());
            noop_teardown(&resolver)
        });

        if let Some(r) = resolver_slot.borrow().as_ref() {
            r.resolve(1);
            r.resolve(2);
            r.reject(Interrupt::Cancel);
        }
        let result = futures::executor::block_on(op);
        assert_eq!(result, Ok(1));
    }

    #[test]
    fn test_cancel_through_registry_rejects() {
        let reg = Registry::new();
        let op = Operation::new(|resolver: Resolver<i32>| noop_teardown(&resolver)).resource(&reg);
        reg.cancel();
        let result = futures::executor::block_on(op);
        assert_eq!(result, Err(OpError::Interrupted(Interrupt::Cancel)));
    }

    #[test]
    fn test_interrupt_after_self_resolve_is_noop() {
        let disposed = Rc::new(Cell::new(0));
        let resolver_slot = Rc::new(RefCell::new(None));
        let slot = resolver_slot.clone();
        let d = disposed.clone();
        let op = Operation::new(move |resolver: Resolver<i32>| {
            *slot.borrow_mut() = Some(resolver.clone());
            let r = resolver.clone();
            let d2 = d.clone();
            Teardown {
                cancel: Box::new(move || {
                    d2.set(d2.get() + 1);
                    r.reject(Interrupt::Cancel);
                }),
                finish: Box::new(|| {}),
            }
        });
        let handle = op.handle();

        if let Some(r) = resolver_slot.borrow().as_ref() {
            r.resolve(3);
        }
        // Late teardown still disposes resources but cannot unsettle.
        handle.cancel();
        handle.cancel();
        assert_eq!(disposed.get(), 1);
        assert_eq!(futures::executor::block_on(op), Ok(3));
    }
}
