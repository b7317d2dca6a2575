use std::{
    fmt,
    ops::{Deref, DerefMut},
};

use serde::{de::Visitor, Deserialize, Deserializer, Serialize};
use typeshare::typeshare;

use super::encoding;

/// A newtype around `Vec<u8>` holding raw binary data, such as a challenge after it has been
/// decoded or a credential ID produced by an authenticator.
///
/// It serializes using the transport format's byte representation: an array of numbers for JSON,
/// and a byte string in CBOR. Use [`EncodedBytes`] for the `base64url` text form.
///
/// It also supports deserializing from `base64` and `base64url` formatted strings.
#[typeshare(transparent)]
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash)]
#[repr(transparent)]
pub struct Bytes(Vec<u8>);

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(inner: Vec<u8>) -> Self {
        Bytes(inner)
    }
}

impl From<&[u8]> for Bytes {
    fn from(inner: &[u8]) -> Self {
        Bytes(inner.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Bytes {
    fn from(inner: [u8; N]) -> Self {
        Bytes(inner.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(src: Bytes) -> Self {
        src.0
    }
}

impl From<Bytes> for String {
    fn from(src: Bytes) -> Self {
        encoding::base64url(&src)
    }
}

/// The string given for decoding is not `base64url` nor `base64` encoded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("value is neither base64url nor base64 encoded")]
pub struct NotBase64Encoded;

impl TryFrom<&str> for Bytes {
    type Error = NotBase64Encoded;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        encoding::decode(value).map(Self)
    }
}

impl FromIterator<u8> for Bytes {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        Bytes(iter.into_iter().collect())
    }
}

impl IntoIterator for Bytes {
    type Item = u8;

    type IntoIter = std::vec::IntoIter<u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bytes {
    type Item = &'a u8;

    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Base64Visitor;

        impl<'de> Visitor<'de> for Base64Visitor {
            type Value = Bytes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "A vector of bytes or a base64(url) encoded string")
            }
            fn visit_borrowed_str<E>(self, v: &'de str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(v)
            }
            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                self.visit_str(&v)
            }
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.try_into().map_err(|_| {
                    E::invalid_value(
                        serde::de::Unexpected::Str(v),
                        &"A base64(url) encoded string",
                    )
                })
            }
            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Bytes(v.to_vec()))
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut buf = Vec::with_capacity(seq.size_hint().unwrap_or_default());
                while let Some(byte) = seq.next_element()? {
                    buf.push(byte);
                }
                Ok(Bytes(buf))
            }
        }
        deserializer.deserialize_any(Base64Visitor)
    }
}

/// Binary data in its wire encoding: `base64url` text without padding.
///
/// This is how every binary value travels in the JSON bodies exchanged with the Relying Party.
/// Values received from a server are kept verbatim until [`EncodedBytes::decode`] is called, so
/// text in the standard `base64` alphabet or with padding is accepted as well. Values produced
/// from [`Bytes`] are always canonical `base64url`.
#[typeshare(transparent)]
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EncodedBytes(String);

impl EncodedBytes {
    /// The encoded text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the text into the raw bytes it represents.
    pub fn decode(&self) -> Result<Bytes, NotBase64Encoded> {
        Bytes::try_from(self.0.as_str())
    }
}

impl From<&Bytes> for EncodedBytes {
    fn from(src: &Bytes) -> Self {
        EncodedBytes(encoding::base64url(src))
    }
}

impl From<Bytes> for EncodedBytes {
    fn from(src: Bytes) -> Self {
        EncodedBytes::from(&src)
    }
}

/// Wraps text that is already wire encoded. No validation happens until it is decoded.
impl From<String> for EncodedBytes {
    fn from(text: String) -> Self {
        EncodedBytes(text)
    }
}

impl From<&str> for EncodedBytes {
    fn from(text: &str) -> Self {
        EncodedBytes(text.to_owned())
    }
}

impl From<EncodedBytes> for String {
    fn from(src: EncodedBytes) -> Self {
        src.0
    }
}

impl TryFrom<&EncodedBytes> for Bytes {
    type Error = NotBase64Encoded;

    fn try_from(value: &EncodedBytes) -> Result<Self, Self::Error> {
        value.decode()
    }
}

impl AsRef<str> for EncodedBytes {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EncodedBytes {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EncodedBytes {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for EncodedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
