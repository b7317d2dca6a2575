//! # ExAuthn Client
//!
//! This crate defines a [`Client`] that drives the client side of a [Webauthn] registration
//! ceremony against a Relying Party exposing a begin and a finish endpoint.
//!
//! The [`Client`] fetches the credential creation options, decodes their binary members, asks a
//! [`CredentialCreator`] for a new credential and submits the encoded attestation back to the
//! Relying Party. The cryptographic work is left to the [`CredentialCreator`] and the networking to
//! a [`RelyingPartyTransport`]. With the `reqwest` feature, on by default, `reqwest::Client` is one.
//!
//! [Webauthn]: https://w3c.github.io/webauthn/
use exauthn_types::{
    webauthn::{BeginRegistrationRequest, CredentialCreationOptions, FinishRegistrationRequest},
    DecodeError, EncodedBytes,
};
use serde::Serialize;
use serde_json::Value;
use url::Url;

mod authenticator;
mod ceremony;
mod endpoints;
mod transport;

#[cfg(test)]
mod tests;

pub use self::{
    authenticator::{AuthenticatorError, CredentialCreator},
    ceremony::{Ceremony, CeremonyState},
    endpoints::RegistrationEndpoints,
    transport::{
        RelyingPartyTransport, TransportError, TransportResponse, JSON_ACCEPT, JSON_CONTENT_TYPE,
    },
};

#[cfg(feature = "testable")]
pub use self::{authenticator::MockCredentialCreator, transport::MockRelyingPartyTransport};

/// Errors produced by a registration ceremony.
///
/// Each variant is the failure of exactly one phase, as it was reported by that phase.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    /// The request did not reach the Relying Party, or its answer could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The Relying Party answered with a `fail` member. Its value is kept verbatim.
    #[error("the relying party rejected the registration: {0}")]
    ServerRejection(Value),

    /// The authenticator declined or could not create the credential.
    #[error("authenticator error: {0}")]
    Authenticator(#[from] AuthenticatorError),

    /// The creation options could not be understood.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A `Client` performs registration ceremonies. Users of this struct should supply a
/// [`RelyingPartyTransport`], a [`CredentialCreator`] and the [`RegistrationEndpoints`] of the
/// Relying Party.
///
/// Every call to [`Client::register`] owns its own ceremony, so a single `Client` can run several
/// of them concurrently.
pub struct Client<T, C>
where
    T: RelyingPartyTransport + Sync,
    C: CredentialCreator + Sync,
{
    transport: T,
    authenticator: C,
    endpoints: RegistrationEndpoints,
}

impl<T, C> Client<T, C>
where
    T: RelyingPartyTransport + Sync,
    C: CredentialCreator + Sync,
{
    /// Create a `Client` talking to the Relying Party at `endpoints` through `transport`.
    pub fn new(transport: T, authenticator: C, endpoints: RegistrationEndpoints) -> Self {
        Self {
            transport,
            authenticator,
            endpoints,
        }
    }

    /// Point the client at a different Relying Party.
    pub fn with_endpoints(mut self, endpoints: RegistrationEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// The endpoints this client registers against.
    pub fn endpoints(&self) -> &RegistrationEndpoints {
        &self.endpoints
    }

    /// Read access to the Client's transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read access to the Client's `CredentialCreator`.
    pub fn authenticator(&self) -> &C {
        &self.authenticator
    }

    /// Register a new credential for `username`.
    ///
    /// `options` is forwarded to the begin endpoint as is and omitted when `None`. On success the
    /// Relying Party's answer to the finish request is returned untouched.
    pub async fn register(
        &self,
        username: &str,
        options: Option<Value>,
    ) -> Result<Value, RegistrationError> {
        let mut ceremony = Ceremony::new(username);
        self.perform(&mut ceremony, options).await
    }

    /// Run every phase of `ceremony`, leaving it either `Completed` or `Failed`.
    pub(crate) async fn perform(
        &self,
        ceremony: &mut Ceremony,
        options: Option<Value>,
    ) -> Result<Value, RegistrationError> {
        ceremony.advance(CeremonyState::AwaitingOptions);
        let request = BeginRegistrationRequest {
            username: ceremony.username().to_owned(),
            options,
        };
        let response = self
            .post(self.endpoints.begin(), &request)
            .await
            .map_err(|e| ceremony.fail(e))?;

        let wire = CredentialCreationOptions::<EncodedBytes>::try_from(response)
            .map_err(|e| ceremony.fail(e))?;
        let options = wire.decode().map_err(|e| ceremony.fail(e))?;

        ceremony.advance(CeremonyState::AwaitingCredential);
        let credential = self
            .authenticator
            .create(options)
            .await
            .map_err(|e| ceremony.fail(e))?;

        ceremony.advance(CeremonyState::AwaitingFinish);
        let request = FinishRegistrationRequest::from(credential);
        let response = self
            .post(self.endpoints.finish(), &request)
            .await
            .map_err(|e| ceremony.fail(e))?;

        ceremony.advance(CeremonyState::Completed);
        Ok(response)
    }

    /// POST `request` to `url` and read the answer as JSON.
    ///
    /// A non-null `fail` member is a rejection whatever the status code. Without one, any status
    /// outside of `2xx` is a transport error.
    ///
    /// Only `null` means no failure: `"fail": false`, `""` or `0` are rejections too.
    async fn post<R: Serialize>(&self, url: &Url, request: &R) -> Result<Value, RegistrationError> {
        let body = serde_json::to_value(request)
            .map_err(|e| TransportError::InvalidJson(e.to_string()))?;
        let response = self.transport.post_json(url, &body).await?;

        let body: Value = match serde_json::from_slice(&response.body) {
            Ok(body) => body,
            Err(_) if !response.is_success() => {
                return Err(TransportError::Status(response.status).into())
            }
            Err(e) => return Err(TransportError::InvalidJson(e.to_string()).into()),
        };

        match body.get("fail") {
            Some(reason) if !reason.is_null() => {
                Err(RegistrationError::ServerRejection(reason.clone()))
            }
            _ if !response.is_success() => Err(TransportError::Status(response.status).into()),
            _ => Ok(body),
        }
    }
}
