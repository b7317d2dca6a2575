//! # ExAuthn Types
//!
//! Rust type definitions for the client side of a `webauthn` registration ceremony, along with
//! the wire encoding used to carry binary values inside JSON bodies.
//!
//! Binary values travel between the Relying Party and the client as [`EncodedBytes`]
//! (`base64url` without padding) and are handed to an authenticator as raw [`Bytes`]. The
//! request types in [`webauthn`] are generic over which of the two representations they hold,
//! so that options still carrying wire text cannot reach an authenticator by mistake.

mod utils;

pub mod webauthn;

// Re-exports
pub use utils::{
    bytes::{Bytes, EncodedBytes, NotBase64Encoded},
    encoding,
};
pub use webauthn::DecodeError;
