//! Types specific to public key credential creation
use coset::iana::{self, EnumI64};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typeshare::typeshare;

use crate::{
    utils::serde::{i64_to_iana, ignore_unknown, integer_or_stringified},
    webauthn::{
        AuthenticatorAttachment, AuthenticatorTransport, MaybeKnown, PublicKeyCredentialDescriptor,
        PublicKeyCredentialHints, PublicKeyCredentialType, UserVerificationRequirement,
    },
    Bytes, EncodedBytes,
};


/// Binary values in the creation options could not be turned into raw bytes, or the options
/// themselves do not have the expected shape.
///
/// Either way the client and the Relying Party disagree on the contract, so retrying the same
/// ceremony will not help.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The member at `field` is not `base64url` nor `base64` encoded.
    #[error("`{field}` is not base64url nor base64 encoded")]
    NotBase64 {
        /// JSON path of the offending member, e.g. `publicKey.excludeCredentials[1].id`.
        field: String,
    },

    /// The Relying Party's response is JSON, but not a set of credential creation options.
    #[error("malformed credential creation options: {0}")]
    MalformedOptions(String),
}

impl DecodeError {
    fn not_base64(field: impl Into<String>) -> Self {
        DecodeError::NotBase64 {
            field: field.into(),
        }
    }

    /// Prefix the reported field path with the name of the member that contained it.
    fn within(self, parent: &str) -> Self {
        match self {
            DecodeError::NotBase64 { field } => DecodeError::NotBase64 {
                field: format!("{parent}.{field}"),
            },
            other => other,
        }
    }
}

/// This is the expected input to [`navigator.credentials.create`] when wanting to create a webauthn
/// credential, and what the Relying Party returns from its begin registration endpoint.
///
/// `B` is the representation of binary members: [`EncodedBytes`] as received over the wire, and
/// [`Bytes`] after [`CredentialCreationOptions::decode`].
///
/// <https://w3c.github.io/webauthn/#sctn-credentialcreationoptions-extension>
///
/// [`navigator.credentials.create`]: https://developer.mozilla.org/en-US/docs/Web/API/CredentialsContainer/create
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "B: Deserialize<'de>", serialize = "B: Serialize")
)]
pub struct CredentialCreationOptions<B = Bytes> {
    /// The key defining that this is a request for a webauthn credential.
    pub public_key: PublicKeyCredentialCreationOptions<B>,
}

impl CredentialCreationOptions<EncodedBytes> {
    /// Decode every binary member into raw bytes, leaving all other members untouched.
    ///
    /// On failure the error names the JSON path of the first member that could not be decoded.
    pub fn decode(self) -> Result<CredentialCreationOptions<Bytes>, DecodeError> {
        Ok(CredentialCreationOptions {
            public_key: self
                .public_key
                .decode()
                .map_err(|e| e.within("publicKey"))?,
        })
    }
}

impl TryFrom<Value> for CredentialCreationOptions<EncodedBytes> {
    type Error = DecodeError;

    /// Read the body of a begin registration response.
    ///
    /// An `excludeCredentials` entry that is not a credential descriptor is reported by its index
    /// rather than skipped, since the authenticator would otherwise never learn about it.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if let Some(entries) = value
            .pointer("/publicKey/excludeCredentials")
            .and_then(Value::as_array)
        {
            for (i, entry) in entries.iter().enumerate() {
                PublicKeyCredentialDescriptor::<EncodedBytes>::deserialize(entry).map_err(|e| {
                    DecodeError::MalformedOptions(format!("publicKey.excludeCredentials[{i}]: {e}"))
                })?;
            }
        }

        serde_json::from_value(value).map_err(|e| DecodeError::MalformedOptions(e.to_string()))
    }
}

/// This defines the request for creating a [`CreatedPublicKeyCredential`].
///
/// Apart from the binary members, everything is kept the way the Relying Party sent it, so that
/// serializing the options again gives back the same JSON. Values this library does not know are
/// held as [`MaybeKnown::Unknown`].
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialcreationoptions>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "B: Deserialize<'de>", serialize = "B: Serialize")
)]
pub struct PublicKeyCredentialCreationOptions<B = Bytes> {
    /// This member contains a name and an identifier for the [Relying Party] responsible for the request.
    ///
    /// [Relying Party]: https://w3c.github.io/webauthn/#relying-party
    pub rp: PublicKeyCredentialRpEntity,

    /// This member contains names and an identifier for the user account performing the registration.
    pub user: PublicKeyCredentialUserEntity<B>,

    /// This member specifies a challenge that the authenticator signs, along with other data,
    /// when producing an attestation for the newly created credential. The Relying Party must never
    /// issue the same challenge twice.
    ///
    /// See the [Cryptographic Challenges] security consideration.
    ///
    /// [Cryptographic Challenges]: https://w3c.github.io/webauthn/#sctn-cryptographic-challenges
    pub challenge: B,

    /// This member lists the key types and signature algorithms the Relying Party supports, ordered
    /// from most preferred to least preferred. The authenticator tries them in order.
    ///
    /// Use [`Self::algorithms`] for the ones an authenticator can act upon.
    pub pub_key_cred_params: Vec<MaybeKnown<PublicKeyCredentialParameters>>,

    /// This OPTIONAL member specifies a time, in milliseconds, that the Relying Party is willing to
    /// wait for the call to complete. This is forwarded to the authenticator as a hint, see
    /// [`Self::timeout_millis`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<MaybeKnown<u32>>,

    /// The Relying Party SHOULD use this OPTIONAL member to list any existing credentials mapped to
    /// this user account. The authenticator must refuse to create a new credential if it already
    /// holds one of these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptor<B>>>,

    /// The Relying Party MAY use this OPTIONAL member to specify capabilities and settings that the
    /// authenticator MUST or SHOULD satisfy to participate in the `create()` operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_selection: Option<MaybeKnown<AuthenticatorSelectionCriteria>>,

    /// This OPTIONAL member contains zero or more elements from [`PublicKeyCredentialHints`] to
    /// guide the user agent in interacting with the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<MaybeKnown<PublicKeyCredentialHints>>>,

    /// The Relying Party MAY use this OPTIONAL member to specify a preference regarding attestation
    /// conveyance. See [`Self::attestation_preference`] for the value in effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<MaybeKnown<AttestationConveyancePreference>>,

    /// Members this library does not model, such as `extensions`, passed through to the
    /// authenticator as they were received. Uses an IndexMap to preserve the order of the keys.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, Value>,
}

impl<B> PublicKeyCredentialCreationOptions<B> {
    /// The public key algorithms the Relying Party accepts, most preferred first.
    ///
    /// Entries of another credential type or with an unassigned algorithm are left out. Algorithm
    /// identifiers sent as strings, e.g. `"alg": "-7"`, are read as numbers.
    pub fn algorithms(&self) -> Vec<iana::Algorithm> {
        self.pub_key_cred_params
            .iter()
            .filter_map(|param| match param {
                MaybeKnown::Known(param) if param.ty == PublicKeyCredentialType::PublicKey => {
                    Some(param.alg)
                }
                MaybeKnown::Known(_) => None,
                MaybeKnown::Unknown(raw) => {
                    if raw.get("type").and_then(Value::as_str) != Some("public-key") {
                        return None;
                    }
                    raw.get("alg")
                        .and_then(integer_or_stringified)
                        .and_then(iana::Algorithm::from_i64)
                }
            })
            .collect()
    }

    /// The timeout hint in milliseconds, when it is a non-negative integer or a string holding one.
    pub fn timeout_millis(&self) -> Option<u32> {
        match self.timeout.as_ref()? {
            MaybeKnown::Known(millis) => Some(*millis),
            MaybeKnown::Unknown(raw) => integer_or_stringified(raw)
                .and_then(|millis| u32::try_from(millis).ok()),
        }
    }

    /// The attestation conveyance preference in effect. A missing or unknown value means
    /// [`AttestationConveyancePreference::None`].
    pub fn attestation_preference(&self) -> AttestationConveyancePreference {
        self.attestation
            .as_ref()
            .and_then(MaybeKnown::known)
            .copied()
            .unwrap_or_default()
    }
}

impl PublicKeyCredentialCreationOptions<EncodedBytes> {
    /// Decode `challenge`, `user.id` and every `excludeCredentials[].id`. Everything else is moved
    /// over unchanged.
    pub fn decode(self) -> Result<PublicKeyCredentialCreationOptions<Bytes>, DecodeError> {
        let challenge = self
            .challenge
            .decode()
            .map_err(|_| DecodeError::not_base64("challenge"))?;
        let user = self.user.decode().map_err(|e| e.within("user"))?;
        let exclude_credentials = self
            .exclude_credentials
            .map(|list| {
                list.into_iter()
                    .enumerate()
                    .map(|(i, descriptor)| {
                        descriptor.decode().map_err(|_| {
                            DecodeError::not_base64(format!("excludeCredentials[{i}].id"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(PublicKeyCredentialCreationOptions {
            rp: self.rp,
            user,
            challenge,
            pub_key_cred_params: self.pub_key_cred_params,
            timeout: self.timeout,
            exclude_credentials,
            authenticator_selection: self.authenticator_selection,
            hints: self.hints,
            attestation: self.attestation,
            unknown_keys: self.unknown_keys,
        })
    }
}

/// This type is used to supply additional Relying Party attributes when creating a new credential.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialrpentity>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PublicKeyCredentialRpEntity {
    /// A unique identifier for the [Relying Party] entity, which sets the [RP ID].
    ///
    /// If omitted, its value will be the requesting origin's [effective domain]
    ///
    /// [Relying Party]: https://w3c.github.io/webauthn/#relying-party
    /// [RP ID]: https://w3c.github.io/webauthn/#rp-id
    /// [effective domain]: https://html.spec.whatwg.org/multipage/browsers.html#concept-origin-effective-domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// A human palatable identifier for the Relying Party, intended only for display.
    pub name: String,

    /// Members this library does not model, such as the deprecated `icon`.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, Value>,
}

/// This type is used to supply additional user account attributes when creating a new credential.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialuserentity>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "B: Deserialize<'de>", serialize = "B: Serialize")
)]
pub struct PublicKeyCredentialUserEntity<B = Bytes> {
    /// The user handle of the user account. A user handle is an opaque byte sequence with a maximum
    /// size of 64 bytes, and is not meant to be displayed to the user.
    ///
    /// The user handle MUST NOT contain personally identifying information about the user, such as
    /// a username or e-mail address; see [User Handle Contents] for details.
    ///
    /// [User Handle Contents]: https://w3c.github.io/webauthn/#sctn-user-handle-privacy
    pub id: B,

    /// A human-palatable name for the user account, intended only for display.
    pub display_name: String,

    /// A human-palatable identifier for a user account, such as `alex.mueller@example.com`.
    pub name: String,

    /// Members this library does not model, such as the deprecated `icon`.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, Value>,
}

impl PublicKeyCredentialUserEntity<EncodedBytes> {
    /// Decode the user handle, keeping the other members as is.
    pub fn decode(self) -> Result<PublicKeyCredentialUserEntity<Bytes>, DecodeError> {
        Ok(PublicKeyCredentialUserEntity {
            id: self.id.decode().map_err(|_| DecodeError::not_base64("id"))?,
            display_name: self.display_name,
            name: self.name,
            unknown_keys: self.unknown_keys,
        })
    }
}

/// This type is used to supply additional parameters when creating a new credential.
///
/// An entry of another credential type, or with an algorithm that is not an assigned
/// [COSEAlgorithmIdentifier], does not read as this type and stays a [`MaybeKnown::Unknown`].
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialparameters>
///
/// [COSEAlgorithmIdentifier]: https://w3c.github.io/webauthn/#typedefdef-cosealgorithmidentifier
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PublicKeyCredentialParameters {
    /// This member specifies the type of credential to be created.
    #[serde(rename = "type")]
    pub ty: PublicKeyCredentialType,

    /// This member specifies the cryptographic signature algorithm with which the newly generated
    /// credential will be used, and thus also the type of asymmetric key pair to be generated.
    #[serde(with = "i64_to_iana")]
    pub alg: iana::Algorithm,

    /// Members this library does not model.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, Value>,
}

/// [Relying Parties] may use this type to specify their requirements regarding authenticator attributes.
///
/// Members that are absent stay absent, see [`Self::user_verification_requirement`] for the
/// defaults Webauthn applies.
///
/// <https://w3c.github.io/webauthn/#dictdef-authenticatorselectioncriteria>
///
/// [Relying Parties]: https://w3c.github.io/webauthn/#webauthn-relying-party
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelectionCriteria {
    /// If this member is present, eligible authenticators are filtered to be only those
    /// authenticators attached with the specified [`AuthenticatorAttachment`] modality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<MaybeKnown<AuthenticatorAttachment>>,

    /// Specifies the extent to which the Relying Party desires to create a client-side
    /// [discoverable credential].
    ///
    /// [discoverable credential]: https://w3c.github.io/webauthn/#client-side-discoverable-credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_key: Option<MaybeKnown<ResidentKeyRequirement>>,

    /// Retained for backwards compatibility with WebAuthn Level 1. Relying Parties SHOULD set it to
    /// `true` if, and only if, [`Self::resident_key`] is set to required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_resident_key: Option<bool>,

    /// This member specifies the Relying Party's requirements regarding [user verification] for the
    /// `create()` operation.
    ///
    /// [user verification]: https://w3c.github.io/webauthn/#user-verification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<MaybeKnown<UserVerificationRequirement>>,

    /// Members this library does not model.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, Value>,
}

impl AuthenticatorSelectionCriteria {
    /// The user verification requirement in effect, [`UserVerificationRequirement::Preferred`]
    /// when the member is missing or unknown.
    pub fn user_verification_requirement(&self) -> UserVerificationRequirement {
        self.user_verification
            .as_ref()
            .and_then(MaybeKnown::known)
            .copied()
            .unwrap_or_default()
    }
}

/// This enumeration's values describe the Relying Party's requirements for client-side
/// [discoverable credentials] (formerly known as resident credentials or resident keys).
///
/// <https://w3c.github.io/webauthn/#enumdef-residentkeyrequirement>
///
/// [discoverable credentials]: https://w3c.github.io/webauthn/#client-side-discoverable-credential
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum ResidentKeyRequirement {
    /// The Relying Party prefers creating a server-side credential.
    Discouraged,

    /// The Relying Party strongly prefers creating a client-side discoverable credential, but will
    /// accept a server-side credential.
    Preferred,

    /// The Relying Party requires a client-side discoverable credential.
    Required,
}

/// Relying Parties may use this enumeration to specify their preference regarding
/// [attestation conveyance] during credential generation.
///
/// <https://w3c.github.io/webauthn/#enumdef-attestationconveyancepreference>
///
/// [attestation conveyance]: https://w3c.github.io/webauthn/#attestation-conveyance
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum AttestationConveyancePreference {
    /// The Relying Party is not interested in authenticator attestation.
    ///
    /// This is the default, and unknown values fall back to the behavior of this value.
    #[default]
    None,

    /// The Relying Party wants a verifiable attestation statement, but allows the client to decide
    /// how to obtain it.
    Indirect,

    /// The Relying Party wants to receive the attestation statement as generated by the authenticator.
    Direct,

    /// The Relying Party wants an attestation statement that may include uniquely identifying
    /// information. This is intended for controlled enterprise deployments.
    Enterprise,
}

/// This is the response from a successful creation of a credential, as returned by the
/// authenticator. All binary members are raw bytes.
///
/// <https://w3c.github.io/webauthn/#iface-pkcredential>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct CreatedPublicKeyCredential {
    /// The id contains the credential ID, chosen by the authenticator. This is usually the base64url
    /// encoded data of [Self::raw_id]
    ///
    /// > NOTE: This API does not constrain the format or length of this identifier, except that it
    /// > MUST be sufficient for the authenticator to uniquely select a key.
    pub id: String,

    /// The raw byte containing the credential ID, see [Self::id] for more information.
    pub raw_id: Bytes,

    /// The type of the credential, currently only `"public-key"` is defined.
    #[serde(rename = "type", deserialize_with = "ignore_unknown")]
    pub ty: PublicKeyCredentialType,

    /// The authenticator's response to the client's request to create a public key credential.
    pub response: AuthenticatorAttestationResponse,

    /// This field contains the authenticator attachment modality in effect at the time the
    /// credential was created, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
}

/// The type represents the authenticator's response to a client's request for the creation of a new
/// credential. It contains information about the new credential that can be used to identify it for
/// later use, and metadata that can be used by the Relying Party to assess the characteristics of
/// the credential during registration.
///
/// <https://w3c.github.io/webauthn/#iface-authenticatorattestationresponse>
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticatorAttestationResponse {
    /// This attribute contains the JSON serialization of the client data passed to the
    /// authenticator by the client in order to generate this credential. The exact JSON
    /// serialization MUST be preserved, as the hash of the serialized client data has been
    /// computed over it.
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: Bytes,

    /// This attribute contains an attestation object, which is opaque to, and cryptographically
    /// protected against tampering by, the client. The attestation object contains both
    /// authenticator data and an attestation statement.
    pub attestation_object: Bytes,

    /// The transports that the authenticator is believed to support, or `None` if the information
    /// is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<AuthenticatorTransport>>,
}
