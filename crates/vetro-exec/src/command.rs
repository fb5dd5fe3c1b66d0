//! Command lifecycle: registry, guaranteed cleanup, and the finished gate.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::future::LocalBoxFuture;

use crate::cancellable::{Cancellable, Interrupt, OpError, OpResult};
use crate::registry::Registry;

/// One logical user action, written as a straight-line async body over
/// registered sub-operations.
pub trait Command {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// The shared lifecycle core.
    fn base(&self) -> Rc<CommandBase>;

    /// The command body. Interruption of any awaited sub-operation unwinds
    /// out of here as an error.
    fn execute(self: Rc<Self>) -> LocalBoxFuture<'static, OpResult<()>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Finished,
    Cancelled,
}

struct Gate {
    value: Option<Result<(), Interrupt>>,
    wakers: Vec<Waker>,
}

/// Lifecycle core shared by every command: owns the resource registry, the
/// deferred cleanup list, and the terminal state.
///
/// `finish` and `cancel` are idempotent and mutually exclusive; whichever
/// runs first decides the command's outcome.
pub struct CommandBase {
    registry: Registry,
    ensures: RefCell<Vec<Box<dyn FnOnce()>>>,
    gate: Rc<RefCell<Gate>>,
    state: Cell<State>,
}

impl CommandBase {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            registry: Registry::new(),
            ensures: RefCell::new(Vec::new()),
            gate: Rc::new(RefCell::new(Gate {
                value: None,
                wakers: Vec::new(),
            })),
            state: Cell::new(State::Running),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a resource for teardown when the command ends.
    pub fn resource<T: Cancellable + Clone + 'static>(&self, x: T) -> T {
        self.registry.resource(x)
    }

    /// Defer cleanup that must run exactly once when the command ends, on
    /// either path (restore layer visibility, re-enable UI, ...).
    pub fn ensure(&self, f: impl FnOnce() + 'static) {
        self.ensures.borrow_mut().push(Box::new(f));
    }

    pub fn is_ended(&self) -> bool {
        self.state.get() != State::Running
    }

    /// A future that completes when the command reaches its terminal state:
    /// `Ok` on finish, the cancel interrupt otherwise.
    pub fn finished(&self) -> FinishedGate {
        FinishedGate {
            gate: self.gate.clone(),
        }
    }

    /// Commit path: finish the registry's finally resource, cancel the rest,
    /// run deferred cleanup, release the gate.
    pub fn finish(&self) {
        if self.is_ended() {
            return;
        }
        self.state.set(State::Finished);
        self.registry.finish();
        self.run_ensures();
        self.settle_gate(Ok(()));
    }

    /// Abort path: cancel everything, run deferred cleanup, release the
    /// gate with the cancel interrupt.
    pub fn cancel(&self) {
        if self.is_ended() {
            return;
        }
        self.state.set(State::Cancelled);
        self.registry.cancel();
        self.run_ensures();
        self.settle_gate(Err(Interrupt::Cancel));
    }

    fn run_ensures(&self) {
        for f in std::mem::take(&mut *self.ensures.borrow_mut()) {
            f();
        }
    }

    fn settle_gate(&self, value: Result<(), Interrupt>) {
        let wakers = {
            let mut gate = self.gate.borrow_mut();
            gate.value = Some(value);
            std::mem::take(&mut gate.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

/// Future half of [`CommandBase::finished`].
pub struct FinishedGate {
    gate: Rc<RefCell<Gate>>,
}

impl Future for FinishedGate {
    type Output = OpResult<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut gate = self.gate.borrow_mut();
        match gate.value {
            Some(Ok(())) => Poll::Ready(Ok(())),
            Some(Err(interrupt)) => Poll::Ready(Err(OpError::Interrupted(interrupt))),
            None => {
                gate.wakers.push(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
