//! Single-threaded pump driving command bodies between UI events.

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use crate::command::{Command, CommandBase};

/// Drives command futures on a local pool and tracks the active command.
///
/// All progress happens inside [`CommandRunner::pump`]: event handlers
/// settle operations synchronously, then the next pump resumes whichever
/// command bodies became ready. Call it from the outer event loop only,
/// never from inside a handler.
pub struct CommandRunner {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    active: RefCell<Option<Rc<CommandBase>>>,
}

impl CommandRunner {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            active: RefCell::new(None),
        }
    }

    /// Start a command, cancelling whichever command was active before.
    pub fn run(&self, command: Rc<dyn Command>) {
        self.cancel_active();

        let base = command.base();
        *self.active.borrow_mut() = Some(base.clone());

        let name = command.name();
        let body = command.execute();
        let task = async move {
            match body.await {
                Ok(()) => {
                    tracing::debug!(command = name, "command completed");
                    base.finish();
                }
                Err(e) if e.is_cancel() || e.is_finish() => {
                    tracing::debug!(command = name, "command interrupted");
                    base.cancel();
                }
                Err(e) => {
                    tracing::warn!(command = name, error = %e, "command failed");
                    base.cancel();
                }
            }
        };
        if let Err(e) = self.spawner.spawn_local(task) {
            tracing::error!(command = name, error = %e, "failed to spawn command");
        }
        self.pump();
    }

    /// Resume every spawned command until all are blocked on user input.
    pub fn pump(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Finish the active command (the Enter key path).
    pub fn finish_active(&self) {
        let active = self.active.borrow_mut().take();
        if let Some(base) = active {
            base.finish();
            self.pump();
        }
    }

    /// Cancel the active command (the Escape key path).
    pub fn cancel_active(&self) {
        let active = self.active.borrow_mut().take();
        if let Some(base) = active {
            base.cancel();
            self.pump();
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}
