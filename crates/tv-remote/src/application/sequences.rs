//! Canned command sequences.
//!
//! A sequence is a list of [`Step`]s: either a command to dispatch or an
//! extra pause.  The extra pauses come on top of the dispatcher's own
//! per-command pacing; they give the TV time to finish opening an app before
//! the next input arrives.
//!
//! Building a sequence does no I/O.  [`run_steps`] executes one.

use std::time::Duration;

use tracing::info;
use tv_remote_core::apps::{OTT_APP_IDS, OTT_KEYS};
use tv_remote_core::{normalize_key_name, resolve_app_id, Command};

use super::dispatch::{CommandDispatcher, DispatchError};
use crate::infrastructure::session::RemoteSession;

/// Extra pause after each raw OTT key in the validation sequence.
pub const OTT_KEY_GAP: Duration = Duration::from_millis(1200);
/// Extra pause after each OTT app launch in the validation sequence.
pub const OTT_LAUNCH_GAP: Duration = Duration::from_millis(1500);

/// One step of a command sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Dispatch a command (the dispatcher adds its pacing delay).
    Send(Command),
    /// Wait this long before the next step.
    Pause(Duration),
}

/// The OTT validation sequence.
///
/// 1. The raw app keys `KEY_NETFLIX`, `KEY_YOUTUBE`, `KEY_APP_LIST`, each
///    followed by [`OTT_KEY_GAP`].
/// 2. App launches for Netflix, YouTube and Spotify by id, each followed by
///    [`OTT_LAUNCH_GAP`].
pub fn ott_validation() -> Vec<Step> {
    let keys = OTT_KEYS
        .iter()
        .flat_map(|key| [Step::Send(Command::key(*key)), Step::Pause(OTT_KEY_GAP)]);
    let launches = OTT_APP_IDS
        .iter()
        .flat_map(|(_, id)| [Step::Send(Command::launch(*id)), Step::Pause(OTT_LAUNCH_GAP)]);
    keys.chain(launches).collect()
}

/// Default sequence when no command is given: volume up twice, then down twice.
pub fn volume_test() -> Vec<Step> {
    vec![
        Step::Pause(Duration::from_secs(1)),
        Step::Send(Command::key("KEY_VOLUP")),
        Step::Pause(Duration::from_millis(500)),
        Step::Send(Command::key("KEY_VOLUP")),
        Step::Pause(Duration::from_secs(1)),
        Step::Send(Command::key("KEY_VOLDOWN")),
        Step::Pause(Duration::from_millis(500)),
        Step::Send(Command::key("KEY_VOLDOWN")),
    ]
}

/// Free-form key names, normalised (`volup` → `KEY_VOLUP`), in order.
pub fn key_presses<S: AsRef<str>>(keys: &[S]) -> Vec<Step> {
    keys.iter()
        .map(|k| Step::Send(Command::key(normalize_key_name(k.as_ref()))))
        .collect()
}

/// Launches one app given a known name (`netflix`) or a raw app id.
pub fn launch(name_or_id: &str) -> Vec<Step> {
    vec![Step::Send(Command::launch(resolve_app_id(name_or_id)))]
}

/// Runs `steps` in order.
///
/// Returns one result per [`Step::Send`], in order.  A failed send does not
/// stop the sequence.
pub async fn run_steps(
    dispatcher: &CommandDispatcher,
    session: &mut RemoteSession,
    steps: &[Step],
) -> Vec<Result<(), DispatchError>> {
    let mut results = Vec::new();
    for step in steps {
        match step {
            Step::Send(command) => results.push(dispatcher.dispatch(session, command).await),
            Step::Pause(pause) => tokio::time::sleep(*pause).await,
        }
    }
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!("sequence finished: {} sent, {failed} failed", results.len() - failed);
    results
}

/// Commands of a sequence, without its pauses.
pub fn commands(steps: &[Step]) -> Vec<&Command> {
    steps
        .iter()
        .filter_map(|s| match s {
            Step::Send(c) => Some(c),
            Step::Pause(_) => None,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
