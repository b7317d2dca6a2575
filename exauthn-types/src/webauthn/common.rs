//! Types shared between the creation options and the created credential.
//!
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use typeshare::typeshare;

use crate::{Bytes, EncodedBytes, NotBase64Encoded};

#[cfg(doc)]
use crate::webauthn::{
    AuthenticatorAttestationResponse, CreatedPublicKeyCredential,
    PublicKeyCredentialCreationOptions,
};

/// A member as the Relying Party sent it: a `T` when it is one this library knows, the raw JSON
/// otherwise.
///
/// Both variants serialize back to the JSON they were read from, so values introduced by newer
/// revisions of Webauthn still reach the authenticator unchanged. Client platforms MUST ignore the
/// [`MaybeKnown::Unknown`] ones.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MaybeKnown<T> {
    /// A value of `T`.
    Known(T),
    /// Anything else, kept verbatim.
    Unknown(Value),
}

impl<T> MaybeKnown<T> {
    /// The value, if it is a known one.
    pub fn known(&self) -> Option<&T> {
        match self {
            MaybeKnown::Known(value) => Some(value),
            MaybeKnown::Unknown(_) => None,
        }
    }
}

/// This enumeration defines the valid credential types. It is an extension point; values can be
/// added to it in the future, as more credential types are defined.
///
/// <https://w3c.github.io/webauthn/#enumdef-publickeycredentialtype>
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[typeshare(serialized_as = "String")]
pub enum PublicKeyCredentialType {
    /// Currently the only type defined is a `PublicKey` meaning the public conterpart of an
    /// asymmetric key pair.
    PublicKey,
    /// This is the default as it will be ignored if the value is unknown during deserialization
    #[default]
    Unknown,
}

/// Identifies a specific public key credential. It is used in
/// [`PublicKeyCredentialCreationOptions::exclude_credentials`] to prevent creating duplicate
/// credentials on the same authenticator.
///
/// The credential ID is held as `B`, which is [`EncodedBytes`] while the descriptor is still in the
/// form received from the Relying Party and [`Bytes`] once decoded. Every other member is kept the
/// way it was received.
///
/// <https://w3c.github.io/webauthn/#dictdef-publickeycredentialdescriptor>
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(bound(deserialize = "B: Deserialize<'de>", serialize = "B: Serialize"))]
pub struct PublicKeyCredentialDescriptor<B = Bytes> {
    /// This member contains the type of the public key credential the caller is referring to.
    /// Some Relying Parties leave it out.
    ///
    /// This mirrors the [`CreatedPublicKeyCredential::ty`] field.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<MaybeKnown<PublicKeyCredentialType>>,

    /// This member contains the credential ID of the public key credential the caller is referring to.
    ///
    /// This mirrors the [`CreatedPublicKeyCredential::raw_id`] field.
    pub id: B,

    /// This OPTIONAL member contains a hint as to how the client might communicate with the managing
    /// authenticator of the credential the caller is referring to.
    ///
    /// This mirrors the [`AuthenticatorAttestationResponse::transports`] field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<MaybeKnown<AuthenticatorTransport>>>,

    /// Members this library does not model, in the order they were received.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, Value>,
}

impl PublicKeyCredentialDescriptor<EncodedBytes> {
    /// Decode the credential ID, keeping every other member as is.
    pub fn decode(self) -> Result<PublicKeyCredentialDescriptor<Bytes>, NotBase64Encoded> {
        Ok(PublicKeyCredentialDescriptor {
            ty: self.ty,
            id: self.id.decode()?,
            transports: self.transports,
            unknown_keys: self.unknown_keys,
        })
    }
}

/// A Relying Party may require [user verification] for some of its operations but not for others,
/// and may use this type to express its needs.
///
/// <https://w3c.github.io/webauthn/#enumdef-userverificationrequirement>
///
/// [user verification]: https://w3c.github.io/webauthn/#user-verification
#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum UserVerificationRequirement {
    /// The Relying Party requires user verification for the operation and will fail the overall
    /// ceremony if the response does not have the UV flag set.
    Required,

    /// The Relying Party prefers user verification for the operation if possible, but will not fail
    /// the operation if the response does not have the UV flag set.
    #[default]
    Preferred,

    /// The Relying Party does not want user verification employed during the operation.
    Discouraged,
}

/// Authenticators may implement various transports for communicating with clients. These are hints
/// as to how clients might communicate with a particular authenticator.
///
/// <https://w3c.github.io/webauthn/#enum-transport>
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[typeshare(serialized_as = "String")]
pub enum AuthenticatorTransport {
    /// Indicates the respective authenticator can be contacted over removable USB.
    Usb,

    /// Indicates the respective authenticator can be contacted over Near Field Communication (NFC).
    Nfc,

    /// Indicates the respective authenticator can be contacted over Bluetooth Smart (Bluetooth Low Energy / BLE).
    Ble,

    /// Indicates the respective authenticator can be contacted using a combination of (often separate)
    /// data-transport and proximity mechanisms.
    #[serde(alias = "cable")]
    Hybrid,

    /// Indicates the respective authenticator is contacted using a client device-specific transport,
    /// i.e. it is a platform authenticator.
    Internal,
}

/// This enumeration's values describe authenticators' attachment modalities. Relying Parties use
/// this to express a preferred authenticator attachment modality, and clients use this to report
/// the authenticator attachment modality used to complete a registration ceremony.
///
/// <https://w3c.github.io/webauthn/#enumdef-authenticatorattachment>
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[typeshare(serialized_as = "String")]
pub enum AuthenticatorAttachment {
    /// A **platform attachment**, usually not removable from the client device.
    Platform,

    /// A **cross-platform attachment**: the authenticator is removable and can "roam" between
    /// client devices.
    CrossPlatform,
}

/// WebAuthn Relying Parties may use this enumeration to communicate hints to the user-agent about
/// how a request may be best completed. Hints are provided in order of decreasing preference.
///
/// <https://w3c.github.io/webauthn/#enum-hints>
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[typeshare(serialized_as = "String")]
#[non_exhaustive]
pub enum PublicKeyCredentialHints {
    /// The Relying Party believes that users will satisfy this request with a physical security key.
    SecurityKey,

    /// The Relying Party believes that users will satisfy this request with a platform
    /// authenticator attached to the client device.
    ClientDevice,

    /// The Relying Party believes that users will satisfy this request with general-purpose
    /// authenticators such as smartphones.
    Hybrid,
}
