//! CommandDispatcher: transmits commands with a pause after each.
//!
//! The TV handles remote input as a serial stream.  Frames that arrive closer
//! together than a few hundred milliseconds get dropped or applied out of
//! order, so every successful send is followed by the [`Pacing`] delay for
//! its kind of command.  A failed send is not followed by a delay.

use thiserror::Error;
use tracing::{info, warn};
use tv_remote_core::Command;

use crate::domain::config::Pacing;
use crate::infrastructure::session::{RemoteSession, SessionError};

/// Error type for command dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The command could not be transmitted.
    ///
    /// No pacing delay was applied, so a caller that retries straight away
    /// sends its next frame unpaced.
    #[error("failed to send {command}: {reason}")]
    SendFailure {
        command: Command,
        #[source]
        reason: SessionError,
    },
}

/// Sends commands over a session, one at a time, in caller order.
#[derive(Debug, Clone, Copy)]
pub struct CommandDispatcher {
    pacing: Pacing,
}

impl CommandDispatcher {
    /// Creates a dispatcher with the given delays.
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing }
    }

    /// The delays in use.
    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Sends `command` and then waits the pacing delay for its kind.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::SendFailure`] if the session is not
    /// established or the frame cannot be written.  It returns at once,
    /// without the pacing delay.
    pub async fn dispatch(
        &self,
        session: &mut RemoteSession,
        command: &Command,
    ) -> Result<(), DispatchError> {
        if let Err(reason) = session.send_command(command).await {
            warn!("failed to send {command}: {reason}");
            return Err(DispatchError::SendFailure {
                command: command.clone(),
                reason,
            });
        }
        info!("sent {command}");

        let delay = if command.is_app_launch() {
            self.pacing.app_launch
        } else {
            self.pacing.key_press
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    /// Dispatches every command in order, continuing past failures.
    ///
    /// The returned vector has one entry per input command, in input order.
    pub async fn dispatch_all(
        &self,
        session: &mut RemoteSession,
        commands: &[Command],
    ) -> Vec<Result<(), DispatchError>> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            results.push(self.dispatch(session, command).await);
        }
        results
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
