use exauthn_types::webauthn::{CreatedPublicKeyCredential, CredentialCreationOptions};
use serde::Serialize;
use typeshare::typeshare;

#[cfg(doc)]
use crate::Client;

/// Reasons an authenticator gives for not creating a credential.
#[typeshare]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "type", content = "content")]
pub enum AuthenticatorError {
    /// The user declined, or the operation is not allowed in the current context.
    #[error("the user or the platform did not allow the operation")]
    NotAllowed,
    /// The user did not respond before the timeout expired.
    #[error("the operation timed out")]
    Timeout,
    /// The authenticator already holds one of the excluded credentials.
    #[error("the authenticator already holds an excluded credential")]
    ExcludedCredentialExists,
    /// None of the requested algorithms is supported by the authenticator.
    #[error("none of the requested algorithms is supported")]
    UnsupportedAlgorithm,
    /// No authenticator is available.
    #[error("no authenticator is available")]
    Unavailable,
    /// Any other failure, described by the authenticator.
    #[error("{0}")]
    Other(String),
}

/// The authenticator capability the [`Client`] relies on to create credentials.
///
/// Implementations receive options whose binary members are already raw bytes, and must return a
/// credential whose binary members are raw bytes as well. Encoding them for the Relying Party is
/// the client's job.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
#[async_trait::async_trait]
pub trait CredentialCreator {
    /// Create a new public key credential satisfying `options`.
    ///
    /// The timeout of the options, see
    /// [`timeout_millis`](exauthn_types::webauthn::PublicKeyCredentialCreationOptions::timeout_millis),
    /// is the Relying Party's hint of how long the user may take.
    async fn create(
        &self,
        options: CredentialCreationOptions,
    ) -> Result<CreatedPublicKeyCredential, AuthenticatorError>;
}
