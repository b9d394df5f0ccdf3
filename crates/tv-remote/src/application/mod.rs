//! Application layer use cases for the remote.
//!
//! # What use cases does the remote have?
//!
//! - **`dispatch`** – Sends one [`tv_remote_core::Command`] over an
//!   established session and then waits the pacing delay, so the TV never
//!   receives input faster than it can process it.  Batches continue after a
//!   failed command and report a result per command.
//!
//! - **`sequences`** – The canned command sequences the CLI can run: the OTT
//!   validation sequence, the default volume test, a free-form key list, and
//!   a single app launch.  A sequence is plain data (a list of [`sequences::Step`]s)
//!   until it is run through a dispatcher.
//!
//! - **`dry_run`** – Renders the OTT payloads as JSON without touching the
//!   network.

pub mod dispatch;
pub mod dry_run;
pub mod sequences;

pub use dispatch::{CommandDispatcher, DispatchError};
pub use sequences::Step;
