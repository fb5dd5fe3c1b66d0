//! Command execution and cancellation framework.
//!
//! An interactive editor runs long-lived operations (drags, pick sequences,
//! dialogs) that hold UI resources while waiting on user input. Every such
//! operation has two external termination paths besides normal resolution:
//! *cancel* (abort and undo side effects) and *finish* (accept the current
//! state as final). This crate provides the building blocks:
//!
//! - [`Cancellable`]: the cancel/finish contract, with [`Dispose`] as the
//!   run-once leaf cleanup.
//! - [`Registry`]: uniform teardown of everything acquired during a command,
//!   with a single designated commit point ("finally" resource).
//! - [`Operation`]: a promise-like async value whose executor hands back the
//!   teardown closures bound to its UI resources.
//! - [`CommandBase`] and [`CommandRunner`]: straight-line async command
//!   bodies driven on a single-threaded pump.

pub mod cancellable;
pub mod command;
pub mod operation;
pub mod registry;
pub mod runner;

pub use cancellable::{Cancellable, Dispose, Interrupt, OpError, OpResult};
pub use command::{Command, CommandBase, FinishedGate};
pub use operation::{OpHandle, Operation, Resolver, Teardown};
pub use registry::Registry;
pub use runner::CommandRunner;
