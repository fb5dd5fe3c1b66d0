//! The cancel/finish contract and its leaf implementations.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// External interruption of an in-flight operation.
///
/// Both variants travel on the rejection channel so straight-line command
/// code unwinds past the interrupted await, but they mean different things:
/// `Cancel` aborts and undoes, `Finish` accepts the current state as final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Abort the work and undo its side effects.
    Cancel,
    /// Accept whatever state the work has reached as its final state.
    Finish,
}

/// Errors surfaced by interactive operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    /// The operation was interrupted from outside.
    #[error("operation interrupted")]
    Interrupted(Interrupt),

    /// Parameters were invalid at commit time.
    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<Interrupt> for OpError {
    fn from(interrupt: Interrupt) -> Self {
        OpError::Interrupted(interrupt)
    }
}

impl OpError {
    /// True for the cancel interrupt.
    pub fn is_cancel(&self) -> bool {
        matches!(self, OpError::Interrupted(Interrupt::Cancel))
    }

    /// True for the finish interrupt.
    pub fn is_finish(&self) -> bool {
        matches!(self, OpError::Interrupted(Interrupt::Finish))
    }
}

/// Result type for interactive operations
pub type OpResult<T> = Result<T, OpError>;

/// A unit of work with distinct abort and accept-as-final termination paths.
///
/// Implementations must tolerate repeated and mixed calls: once a value has
/// settled, further `cancel`/`finish` calls are no-ops.
pub trait Cancellable {
    /// Abort the work and undo its side effects.
    fn cancel(&self);

    /// Accept the current state as final.
    fn finish(&self);
}

/// Run-once cleanup closure.
///
/// Both termination paths dispose; there is no state to commit. Cloning
/// shares the underlying closure, so disposing any clone disposes all.
#[derive(Clone)]
pub struct Dispose {
    f: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self {
            f: Rc::new(RefCell::new(Some(Box::new(f)))),
        }
    }

    /// Run the cleanup. Later calls are no-ops.
    pub fn dispose(&self) {
        let f = self.f.borrow_mut().take();
        if let Some(f) = f {
            f();
        }
    }
}

impl Cancellable for Dispose {
    fn cancel(&self) {
        self.dispose();
    }

    fn finish(&self) {
        self.dispose();
    }
}
