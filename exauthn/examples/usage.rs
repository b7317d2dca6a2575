//! Sample App registering a passkey with the development server on `http://localhost:4500`.
//!
//! Pass the username as the first argument and, optionally, a JSON value of registration options
//! as the second one.
use exauthn::{
    client::{AuthenticatorError, Client, CredentialCreator, RegistrationEndpoints},
    types::{encoding, webauthn::*, Bytes},
};

use coset::iana;
use serde_json::{json, Value};
use url::Url;

// MyAuthenticator is a stub impl of the CredentialCreator trait. It does not sign anything, the
// development server does not verify the attestation.
struct MyAuthenticator;

#[async_trait::async_trait]
impl CredentialCreator for MyAuthenticator {
    async fn create(
        &self,
        options: CredentialCreationOptions,
    ) -> Result<CreatedPublicKeyCredential, AuthenticatorError> {
        let options = options.public_key;
        if !options.algorithms().contains(&iana::Algorithm::ES256) {
            return Err(AuthenticatorError::UnsupportedAlgorithm);
        }

        let client_data = json!({
            "type": "webauthn.create",
            "challenge": encoding::base64url(&options.challenge),
            "origin": "http://localhost:4500",
        });
        let raw_id = Bytes::from(options.user.id.to_vec());

        Ok(CreatedPublicKeyCredential {
            id: encoding::base64url(&raw_id),
            raw_id,
            ty: PublicKeyCredentialType::PublicKey,
            response: AuthenticatorAttestationResponse {
                client_data_json: client_data.to_string().into_bytes().into(),
                attestation_object: Bytes::from([0xa0]),
                transports: Some(vec![AuthenticatorTransport::Internal]),
            },
            authenticator_attachment: Some(AuthenticatorAttachment::Platform),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let username = args.next().unwrap_or_else(|| "test@localhost.com".to_owned());
    let options = args
        .next()
        .map(|raw| serde_json::from_str::<Value>(&raw))
        .transpose()?;

    let base = Url::parse("http://localhost:4500")?;
    let endpoints = RegistrationEndpoints::with_default_paths(&base)?;
    let client = Client::new(reqwest::Client::new(), MyAuthenticator, endpoints);

    println!("Registering {username} at {}", client.endpoints().begin());
    let answer = client.register(&username, options).await?;
    println!("The Relying Party answered: {answer}");

    Ok(())
}
