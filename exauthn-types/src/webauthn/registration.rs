//! JSON bodies sent to the Relying Party's registration endpoints.
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{
    webauthn::{CreatedPublicKeyCredential, PublicKeyCredentialType},
    EncodedBytes,
};

/// Body of the request to the begin registration endpoint.
///
/// The server answers with a [`CredentialCreationOptions`](crate::webauthn::CredentialCreationOptions)
/// holding [`EncodedBytes`], or with a `fail` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeginRegistrationRequest {
    /// Name of the account to enroll.
    pub username: String,

    /// Application defined registration options, omitted from the body when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_json::Value>,
}

/// Body of the request to the finish registration endpoint.
///
/// This is a [`CreatedPublicKeyCredential`] reshaped for the server: every binary member is wire
/// encoded and the member names are `snake_case`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare]
pub struct FinishRegistrationRequest {
    /// The credential ID as reported by the authenticator.
    pub id: String,

    /// The raw credential ID.
    pub raw_id: EncodedBytes,

    /// The credential type, `"public-key"`.
    #[serde(rename = "type")]
    pub ty: PublicKeyCredentialType,

    /// The wire encoded attestation.
    pub response: EncodedAttestationResponse,
}

/// The attestation part of a [`FinishRegistrationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare]
pub struct EncodedAttestationResponse {
    /// The authenticator data and attestation statement.
    pub attestation_object: EncodedBytes,

    /// The exact client data JSON bytes the authenticator signed over.
    pub client_data_json: EncodedBytes,
}

impl From<CreatedPublicKeyCredential> for FinishRegistrationRequest {
    fn from(credential: CreatedPublicKeyCredential) -> Self {
        FinishRegistrationRequest {
            raw_id: EncodedBytes::from(&credential.raw_id),
            id: credential.id,
            ty: credential.ty,
            response: EncodedAttestationResponse {
                attestation_object: EncodedBytes::from(&credential.response.attestation_object),
                client_data_json: EncodedBytes::from(&credential.response.client_data_json),
            },
        }
    }
}
