//! Implementation of the types defined in [WebAuthn Level 3] that take part in a registration
//! ceremony, plus the JSON messages exchanged with the Relying Party around it.
//!
//! [WebAuthn Level 3]: https://w3c.github.io/webauthn

mod attestation;
mod common;
mod registration;

// re-export types
pub use self::{attestation::*, common::*, registration::*};
