use exauthn_types::{
    webauthn::{
        AuthenticatorAttestationResponse, AuthenticatorTransport, CreatedPublicKeyCredential,
        PublicKeyCredentialType,
    },
    Bytes,
};
use serde_json::json;

use super::*;
use crate::{authenticator::MockCredentialCreator, transport::MockRelyingPartyTransport};

fn endpoints() -> RegistrationEndpoints {
    let base = Url::parse("http://localhost:4500").unwrap();
    RegistrationEndpoints::with_default_paths(&base).unwrap()
}

fn json_response(status: u16, body: Value) -> TransportResponse {
    TransportResponse {
        status,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

fn is_begin(url: &Url) -> bool {
    url.path() == RegistrationEndpoints::DEFAULT_BEGIN_PATH
}

fn is_finish(url: &Url) -> bool {
    url.path() == RegistrationEndpoints::DEFAULT_FINISH_PATH
}

/// The answer of the development server to a begin request.
fn dev_server_options() -> Value {
    json!({
        "publicKey": {
            "attestation": "direct",
            "authenticatorSelection": {
                "requireResidentKey": false,
                "userVerification": "preferred"
            },
            "challenge": "Gpo2I8bEq3pJm7fzxCuxgCFToxUhYE2Chhg1irZ4Wx8=",
            "pubKeyCredParams": [
                { "alg": -7, "type": "public-key" },
                { "alg": -257, "type": "public-key" }
            ],
            "rp": { "id": "localhost", "name": "Wiwatta Mongkhonchit" },
            "timeout": 60000,
            "user": {
                "name": "test@localhost.com",
                "displayName": "Tester",
                "id": "test"
            }
        }
    })
}

fn created_credential() -> CreatedPublicKeyCredential {
    CreatedPublicKeyCredential {
        id: "AQID".into(),
        raw_id: Bytes::from([1, 2, 3]),
        ty: PublicKeyCredentialType::PublicKey,
        response: AuthenticatorAttestationResponse {
            client_data_json: Bytes::from([6]),
            attestation_object: Bytes::from([4, 5]),
            transports: Some(vec![AuthenticatorTransport::Internal]),
        },
        authenticator_attachment: None,
    }
}

fn expected_finish_body() -> Value {
    json!({
        "id": "AQID",
        "raw_id": "AQID",
        "type": "public-key",
        "response": {
            "attestation_object": "BAU",
            "client_data_json": "Bg"
        }
    })
}

/// A transport answering the begin request with `begin` and expecting no finish request.
fn transport_stopping_after_begin(begin: TransportResponse) -> MockRelyingPartyTransport {
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, _| is_begin(url))
        .return_once(move |_, _| Ok(begin))
        .once();
    transport
        .expect_post_json()
        .withf(|url, _| is_finish(url))
        .never();
    transport
}

fn authenticator_never_called() -> MockCredentialCreator {
    let mut authenticator = MockCredentialCreator::new();
    authenticator.expect_create().never();
    authenticator
}

#[tokio::test]
async fn registers_against_the_dev_server() {
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, body| is_begin(url) && *body == json!({ "username": "test@localhost.com" }))
        .returning(|_, _| Ok(json_response(200, dev_server_options())))
        .once();
    transport
        .expect_post_json()
        .withf(|url, body| is_finish(url) && *body == expected_finish_body())
        .returning(|_, _| Ok(json_response(200, json!({ "success": true }))))
        .once();

    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .withf(|options| {
            let options = &options.public_key;
            options.challenge.len() == 32
                && options.user.id.as_slice() == [0xb5, 0xeb, 0x2d]
                && options.user.name == "test@localhost.com"
                && options.rp.id.as_deref() == Some("localhost")
                && options.timeout_millis() == Some(60_000)
        })
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    let result = client
        .register("test@localhost.com", None)
        .await
        .expect("registration failed");
    assert_eq!(result, json!({ "success": true }));
}

#[tokio::test]
async fn application_options_reach_the_begin_endpoint() {
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, body| {
            is_begin(url)
                && *body == json!({ "username": "wendy", "options": { "residentKey": "required" } })
        })
        .returning(|_, _| Ok(json_response(200, dev_server_options())))
        .once();
    transport
        .expect_post_json()
        .withf(|url, _| is_finish(url))
        .returning(|_, _| Ok(json_response(201, json!({ "credential": "AQID" }))))
        .once();

    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    let result = client
        .register("wendy", Some(json!({ "residentKey": "required" })))
        .await
        .expect("registration failed");
    assert_eq!(result, json!({ "credential": "AQID" }));
}

#[tokio::test]
async fn begin_rejection_stops_the_ceremony() {
    let transport = transport_stopping_after_begin(json_response(
        200,
        json!({ "fail": "username already registered" }),
    ));
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let mut ceremony = Ceremony::new("test@localhost.com");
    let result = client.perform(&mut ceremony, None).await;
    assert_eq!(
        result,
        Err(RegistrationError::ServerRejection(json!(
            "username already registered"
        )))
    );
    assert_eq!(ceremony.state(), CeremonyState::Failed);
}

#[tokio::test]
async fn fail_member_wins_over_the_status() {
    let reason = json!({ "code": 42, "message": "too many attempts" });
    let transport = transport_stopping_after_begin(json_response(
        429,
        json!({ "fail": reason.clone() }),
    ));
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert_eq!(result, Err(RegistrationError::ServerRejection(reason)));
}

#[tokio::test]
async fn null_fail_member_is_not_a_rejection() {
    let mut options = dev_server_options();
    options["fail"] = Value::Null;

    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, _| is_begin(url))
        .return_once(move |_, _| Ok(json_response(200, options)))
        .once();
    transport
        .expect_post_json()
        .withf(|url, _| is_finish(url))
        .returning(|_, _| Ok(json_response(200, json!({ "success": true, "fail": null }))))
        .once();

    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    let result = client.register("wendy", None).await;
    assert_eq!(result, Ok(json!({ "success": true, "fail": null })));
}

#[tokio::test]
async fn falsy_fail_members_are_rejections() {
    for reason in [json!(false), json!(""), json!(0)] {
        let body = json!({ "fail": reason.clone() });
        let transport = transport_stopping_after_begin(json_response(200, body));
        let client = Client::new(transport, authenticator_never_called(), endpoints());

        let result = client.register("wendy", None).await;
        assert_eq!(result, Err(RegistrationError::ServerRejection(reason)));
    }
}

#[tokio::test]
async fn error_status_without_fail_member() {
    let transport =
        transport_stopping_after_begin(json_response(500, json!({ "error": "internal" })));
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert_eq!(
        result,
        Err(RegistrationError::Transport(TransportError::Status(500)))
    );
}

#[tokio::test]
async fn error_status_with_a_body_that_is_not_json() {
    let transport = transport_stopping_after_begin(TransportResponse {
        status: 502,
        body: b"<html>Bad Gateway</html>".to_vec(),
    });
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert_eq!(
        result,
        Err(RegistrationError::Transport(TransportError::Status(502)))
    );
}

#[tokio::test]
async fn success_status_with_a_body_that_is_not_json() {
    let transport = transport_stopping_after_begin(TransportResponse {
        status: 200,
        body: b"<html>Welcome</html>".to_vec(),
    });
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert!(
        matches!(
            result,
            Err(RegistrationError::Transport(TransportError::InvalidJson(_)))
        ),
        "{result:?}"
    );
}

#[tokio::test]
async fn network_failure_is_reported_as_is() {
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, _| is_begin(url))
        .returning(|_, _| Err(TransportError::Network("connection refused".into())))
        .once();
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert_eq!(
        result,
        Err(RegistrationError::Transport(TransportError::Network(
            "connection refused".into()
        )))
    );
}

#[tokio::test]
async fn options_of_the_wrong_shape() {
    let transport = transport_stopping_after_begin(json_response(200, json!({ "ok": true })));
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert!(
        matches!(
            result,
            Err(RegistrationError::Decode(DecodeError::MalformedOptions(_)))
        ),
        "{result:?}"
    );
}

#[tokio::test]
async fn undecodable_excluded_credential_is_named() {
    let mut options = dev_server_options();
    options["publicKey"]["excludeCredentials"] = json!([
        { "type": "public-key", "id": "AQID" },
        { "type": "public-key", "id": "not base64!" }
    ]);
    let transport = transport_stopping_after_begin(json_response(200, options));
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let result = client.register("wendy", None).await;
    assert_eq!(
        result,
        Err(RegistrationError::Decode(DecodeError::NotBase64 {
            field: "publicKey.excludeCredentials[1].id".into()
        }))
    );
}

/// Take out `challenge`, `user.id` and every `excludeCredentials[].id` of a `publicKey` member.
fn without_binary_members(mut options: Value) -> Value {
    let public_key = options["publicKey"]
        .as_object_mut()
        .expect("publicKey is an object");
    public_key.remove("challenge");
    public_key["user"]
        .as_object_mut()
        .expect("user is an object")
        .remove("id");
    if let Some(Value::Array(excluded)) = public_key.get_mut("excludeCredentials") {
        for entry in excluded {
            entry.as_object_mut().expect("entry is an object").remove("id");
        }
    }
    options
}

#[tokio::test]
async fn authenticator_receives_decoded_options() {
    let mut wire = dev_server_options();
    wire["publicKey"]["rp"]["icon"] = json!("https://localhost/rp.png");
    wire["publicKey"]["user"]["icon"] = json!("https://localhost/user.png");
    wire["publicKey"]["pubKeyCredParams"] = json!([
        { "alg": -9, "type": "public-key" },
        { "alg": -7, "type": "public-key" },
        { "alg": -257, "type": "public-key", "vendorHint": 1 }
    ]);
    wire["publicKey"]["authenticatorSelection"] = json!({
        "userVerification": "required",
        "vendorFlag": 1
    });
    wire["publicKey"]["attestation"] = json!("direct-ish");
    wire["publicKey"]["timeout"] = json!(60000.5);
    wire["publicKey"]["excludeCredentials"] = json!([
        { "id": "AQID", "transports": ["usb", "smoke-signal"] },
        { "type": "public-key", "id": "-_8B" }
    ]);
    wire["publicKey"]["extensions"] = json!({ "credProps": true });
    let expected = without_binary_members(wire.clone());

    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, _| is_begin(url))
        .return_once(move |_, _| Ok(json_response(200, wire)))
        .once();
    transport
        .expect_post_json()
        .withf(|url, _| is_finish(url))
        .returning(|_, _| Ok(json_response(200, json!({ "success": true }))))
        .once();

    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .withf(move |options| {
            let excluded = options.public_key.exclude_credentials.as_deref().unwrap_or_default();
            let received = serde_json::to_value(options).expect("failed to serialize options");
            without_binary_members(received) == expected
                && options.public_key.challenge.len() == 32
                && options.public_key.user.id.as_slice() == [0xb5, 0xeb, 0x2d]
                && excluded.len() == 2
                && excluded[0].id.as_slice() == [1, 2, 3]
                && excluded[1].id.as_slice() == [0xfb, 0xff, 0x01]
        })
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    client
        .register("wendy", None)
        .await
        .expect("registration failed");
}

#[tokio::test]
async fn unreadable_excluded_credential_is_named() {
    let mut options = dev_server_options();
    options["publicKey"]["excludeCredentials"] = json!([
        { "type": "public-key", "id": "AQID" },
        { "type": "public-key", "id": 7 }
    ]);
    let transport = transport_stopping_after_begin(json_response(200, options));
    let client = Client::new(transport, authenticator_never_called(), endpoints());

    let mut ceremony = Ceremony::new("wendy");
    let result = client.perform(&mut ceremony, None).await;
    assert!(
        matches!(
            result,
            Err(RegistrationError::Decode(DecodeError::MalformedOptions(ref message)))
                if message.starts_with("publicKey.excludeCredentials[1]")
        ),
        "{result:?}"
    );
    assert_eq!(ceremony.state(), CeremonyState::Failed);
}

#[tokio::test]
async fn padded_base64_members_are_decoded() {
    // Padded standard base64 is accepted next to base64url. "AAA=" is two bytes, see the padding
    // decision in DESIGN.md.
    let options = json!({
        "publicKey": {
            "rp": { "name": "localhost" },
            "user": { "id": "dGVzdA==", "name": "test", "displayName": "Test" },
            "challenge": "AAA=",
            "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }]
        }
    });
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, _| is_begin(url))
        .return_once(move |_, _| Ok(json_response(200, options)))
        .once();
    transport
        .expect_post_json()
        .withf(|url, body| is_finish(url) && *body == expected_finish_body())
        .returning(|_, _| Ok(json_response(200, json!({ "success": true }))))
        .once();

    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .withf(|options| {
            options.public_key.user.id.as_slice() == b"test"
                && options.public_key.challenge.as_slice() == [0, 0]
        })
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    let result = client.register("test", None).await;
    assert_eq!(result, Ok(json!({ "success": true })));
}

#[tokio::test]
async fn authenticator_failure_never_reaches_the_finish_endpoint() {
    let transport = transport_stopping_after_begin(json_response(200, dev_server_options()));
    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .returning(|_| Err(AuthenticatorError::NotAllowed))
        .once();
    let client = Client::new(transport, authenticator, endpoints());

    let mut ceremony = Ceremony::new("wendy");
    let result = client.perform(&mut ceremony, None).await;
    assert_eq!(
        result,
        Err(RegistrationError::Authenticator(AuthenticatorError::NotAllowed))
    );
    assert_eq!(ceremony.state(), CeremonyState::Failed);
}

#[tokio::test]
async fn finish_rejection_is_returned_verbatim() {
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .withf(|url, _| is_begin(url))
        .returning(|_, _| Ok(json_response(200, dev_server_options())))
        .once();
    transport
        .expect_post_json()
        .withf(|url, _| is_finish(url))
        .returning(|_, _| {
            Ok(json_response(
                400,
                json!({ "fail": ["attestation rejected", "untrusted root"] }),
            ))
        })
        .once();

    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    let mut ceremony = Ceremony::new("wendy");
    let result = client.perform(&mut ceremony, None).await;
    assert_eq!(
        result,
        Err(RegistrationError::ServerRejection(json!([
            "attestation rejected",
            "untrusted root"
        ])))
    );
    assert_eq!(ceremony.state(), CeremonyState::Failed);
}

#[tokio::test]
async fn successful_ceremony_ends_completed() {
    let mut transport = MockRelyingPartyTransport::new();
    transport
        .expect_post_json()
        .returning(|url, _| {
            let body = if is_begin(url) {
                dev_server_options()
            } else {
                json!({ "success": true })
            };
            Ok(json_response(200, body))
        })
        .times(2);
    let mut authenticator = MockCredentialCreator::new();
    authenticator
        .expect_create()
        .returning(|_| Ok(created_credential()))
        .once();

    let client = Client::new(transport, authenticator, endpoints());
    let mut ceremony = Ceremony::new("wendy");
    client
        .perform(&mut ceremony, None)
        .await
        .expect("registration failed");
    assert_eq!(ceremony.state(), CeremonyState::Completed);
}

#[test]
fn errors_serialize_for_ffi() {
    assert_eq!(
        serde_json::to_value(AuthenticatorError::Other("no keychain".into())).unwrap(),
        json!({ "type": "Other", "content": "no keychain" })
    );
    assert_eq!(
        serde_json::to_value(AuthenticatorError::Timeout).unwrap(),
        json!({ "type": "Timeout" })
    );
    assert_eq!(
        serde_json::to_value(TransportError::Status(503)).unwrap(),
        json!({ "type": "Status", "content": 503 })
    );
}
