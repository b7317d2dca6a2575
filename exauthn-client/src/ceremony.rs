use std::fmt;

use crate::RegistrationError;

#[cfg(doc)]
use crate::Client;

/// The phases a registration ceremony goes through.
///
/// A ceremony only ever moves forward: `Idle`, `AwaitingOptions`, `AwaitingCredential`,
/// `AwaitingFinish` and finally `Completed`. Any phase that has not finished yet can fail instead,
/// and `Completed` and `Failed` are final.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CeremonyState {
    /// Nothing was sent yet.
    #[default]
    Idle,
    /// The begin request is in flight, or its answer is being decoded.
    AwaitingOptions,
    /// The authenticator is creating the credential.
    AwaitingCredential,
    /// The finish request is in flight.
    AwaitingFinish,
    /// The Relying Party accepted the credential.
    Completed,
    /// One of the phases failed, see the returned [`RegistrationError`].
    Failed,
}

impl CeremonyState {
    /// Whether the ceremony is over, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, CeremonyState::Completed | CeremonyState::Failed)
    }

    fn successor(self) -> Option<Self> {
        match self {
            CeremonyState::Idle => Some(CeremonyState::AwaitingOptions),
            CeremonyState::AwaitingOptions => Some(CeremonyState::AwaitingCredential),
            CeremonyState::AwaitingCredential => Some(CeremonyState::AwaitingFinish),
            CeremonyState::AwaitingFinish => Some(CeremonyState::Completed),
            CeremonyState::Completed | CeremonyState::Failed => None,
        }
    }

    /// Whether a ceremony in this state may move to `next`.
    pub fn can_advance_to(self, next: CeremonyState) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == CeremonyState::Failed || self.successor() == Some(next)
    }
}

impl fmt::Display for CeremonyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CeremonyState::Idle => "idle",
            CeremonyState::AwaitingOptions => "awaiting options",
            CeremonyState::AwaitingCredential => "awaiting credential",
            CeremonyState::AwaitingFinish => "awaiting finish",
            CeremonyState::Completed => "completed",
            CeremonyState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks a single invocation of [`Client::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ceremony {
    username: String,
    state: CeremonyState,
}

impl Ceremony {
    /// Start a ceremony for `username` in the [`CeremonyState::Idle`] state.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            state: CeremonyState::Idle,
        }
    }

    /// The account being registered.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The current phase.
    pub fn state(&self) -> CeremonyState {
        self.state
    }

    /// Move to `next` if that is a legal transition.
    ///
    /// Returns whether the transition happened. Refused transitions leave the state untouched.
    pub fn advance(&mut self, next: CeremonyState) -> bool {
        if !self.state.can_advance_to(next) {
            log::warn!(
                "registration of {:?}: refusing to go from {} to {next}",
                self.username,
                self.state
            );
            return false;
        }
        log::debug!(
            "registration of {:?}: {} -> {next}",
            self.username,
            self.state
        );
        self.state = next;
        true
    }

    /// Log `error` against the current phase and mark the ceremony as failed.
    pub(crate) fn fail(&mut self, error: impl Into<RegistrationError>) -> RegistrationError {
        let error = error.into();
        log::error!(
            "registration of {:?} failed while {}: {error}",
            self.username,
            self.state
        );
        self.advance(CeremonyState::Failed);
        error
    }
}
