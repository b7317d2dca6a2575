//! # ExAuthn
//!
//! [![github]](https://github.com/exauthn/exauthn-rs/tree/main/exauthn/)
//! [![documentation]](https://docs.rs/exauthn/)
//!
//! `exauthn` registers passkeys with a Relying Party from Rust. It runs the client side of a
//! [Webauthn Level 3][webauthn-3] registration ceremony: fetch the credential creation options from
//! the Relying Party, have an authenticator create a credential, and send the attestation back.
//! It is comprised of two sub-libraries:
//!
//! - `exauthn-client` - usable as [`client`], the [`Client`](client::Client) driving the
//!   ceremony and the seams it is plugged into.
//! - `exauthn-types` - usable as [`types`], the Webauthn types exchanged during the ceremony and
//!   the encoding of their binary members.
//!
//! ## Basic Concepts
//!
//! Binary values such as the challenge or the user handle travel in JSON as `base64url` text. The
//! [`Client`](client::Client) decodes them before handing the options to the authenticator, and
//! encodes the binary members of the new credential before submitting it:
//!
//! Relying Party <-> [`RelyingPartyTransport`](client::RelyingPartyTransport) <->
//! [`Client`](client::Client) <-> [`CredentialCreator`](client::CredentialCreator)
//!
//! - [`RelyingPartyTransport`](client::RelyingPartyTransport) sends JSON to the Relying Party. A
//!   `reqwest::Client` is one out of the box.
//! - [`CredentialCreator`](client::CredentialCreator) is the authenticator. It only ever sees raw
//!   bytes, in [`CredentialCreationOptions<Bytes>`](types::webauthn::CredentialCreationOptions).
//! - [`RegistrationEndpoints`](client::RegistrationEndpoints) tells the client where the begin and
//!   finish endpoints live.
//!
//! A runnable demonstration binary is provided in `exauthn/examples/usage.rs`.
//!
//! [github]: https://img.shields.io/badge/GitHub-exauthn%2Fexauthn--rs%2Fexauthn-informational?logo=github&style=flat
//! [documentation]: https://img.shields.io/docsrs/exauthn/latest?logo=docs.rs&style=flat
//! [webauthn-3]: https://www.w3.org/TR/webauthn-3/
//!
//! ### Example: Registering with a Relying Party
//!
//! ```no_run
//! use exauthn::{
//!     client::{AuthenticatorError, Client, CredentialCreator, RegistrationEndpoints},
//!     types::{webauthn::*, Bytes},
//! };
//! use url::Url;
//!
//! // MyAuthenticator is a stub impl of the CredentialCreator trait.
//! struct MyAuthenticator;
//!
//! #[async_trait::async_trait]
//! impl CredentialCreator for MyAuthenticator {
//!     async fn create(
//!         &self,
//!         options: CredentialCreationOptions,
//!     ) -> Result<CreatedPublicKeyCredential, AuthenticatorError> {
//!         // A real authenticator would sign over the challenge here.
//!         Ok(CreatedPublicKeyCredential {
//!             id: "AQID".into(),
//!             raw_id: Bytes::from([1, 2, 3]),
//!             ty: PublicKeyCredentialType::PublicKey,
//!             response: AuthenticatorAttestationResponse {
//!                 client_data_json: options.public_key.challenge,
//!                 attestation_object: Bytes::from([0xa0]),
//!                 transports: None,
//!             },
//!             authenticator_attachment: None,
//!         })
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let base = Url::parse("http://localhost:4500").expect("Should parse");
//! let endpoints = RegistrationEndpoints::with_default_paths(&base).expect("Should join");
//! let client = Client::new(reqwest::Client::new(), MyAuthenticator, endpoints);
//!
//! match client.register("test@localhost.com", None).await {
//!     Ok(answer) => println!("registered: {answer}"),
//!     Err(error) => eprintln!("registration failed: {error}"),
//! }
//! # });
//! ```

pub use exauthn_client as client;
pub use exauthn_types as types;
