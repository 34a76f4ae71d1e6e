//! Handler-level tests over the nullable infrastructure: DTO decoding,
//! bearer-token scoping and the error-to-status mapping, without a real
//! listener or LMDB environment.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;

use vita_nullables::{NullComparer, NullStore};
use vita_rpc::auth::StaticTokens;
use vita_rpc::handlers::{
    self, AppState, AuthenticateOptionsRequest, AuthenticateVerifyRequest, ClientDataDto,
    FaceVerifyRequest, RegisterOptionsRequest, RegisterVerifyRequest, ReviewDecideRequest,
};
use vita_rpc::RpcError;
use vita_store::ReferenceImageStore;
use vita_types::{Standing, SubjectId, SubjectRecord, VerificationParams};
use vita_verification::wire::{signature_base, AuthenticatorData, ClientData, FLAG_USER_PRESENT, FLAG_USER_VERIFIED};
use vita_verification::{Comparison, VerificationService};

const UV: u8 = FLAG_USER_PRESENT | FLAG_USER_VERIFIED;

fn state(comparer: NullComparer) -> (Arc<NullStore>, AppState) {
    let store = Arc::new(NullStore::new());
    store.add_subject(SubjectRecord {
        id: SubjectId::new("subj-1"),
        display_name: "Amina Diallo".to_string(),
        standing: Standing::Pending,
        next_due: None,
    });
    let service = VerificationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(comparer),
        VerificationParams::default(),
    );
    let identity = StaticTokens::new(
        HashMap::from([("tok-subj".to_string(), "subj-1".to_string())]),
        HashMap::from([("tok-off".to_string(), "officer-7".to_string())]),
    );
    (
        store,
        AppState {
            service: Arc::new(service),
            identity: Arc::new(identity),
        },
    )
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

/// Sign an enrollment response for the options a handler returned.
fn enrollment_request(
    challenge_hex: &str,
    rp_id: &str,
    keys: &vita_types::KeyPair,
) -> RegisterVerifyRequest {
    let challenge = hex::decode(challenge_hex).unwrap();
    let client_data = ClientData {
        purpose: vita_types::CeremonyPurpose::Register,
        challenge: challenge.clone(),
        origin: "https://vita.example".to_string(),
    };
    let auth_data = AuthenticatorData::new(rp_id, UV, 0);
    let signature = vita_crypto::sign_message(&signature_base(&auth_data, &client_data), &keys.private);
    RegisterVerifyRequest {
        modality: "FACE_KEY".to_string(),
        credential_id: hex::encode(b"cred-1"),
        public_key: hex::encode(keys.public.as_bytes()),
        authenticator_data: hex::encode(auth_data.to_bytes()),
        client_data: ClientDataDto {
            purpose: "register".to_string(),
            challenge: challenge_hex.to_string(),
            origin: "https://vita.example".to_string(),
        },
        signature: hex::encode(signature.as_bytes()),
        transports: vec!["internal".to_string()],
    }
}

#[tokio::test]
async fn register_flow_over_handlers() {
    let (_store, state) = state(NullComparer::fixed(Comparison::Score(0)));
    let keys = vita_crypto::keypair_from_seed(&[3; 32]);

    let Json(options) = handlers::register_options(
        State(state.clone()),
        bearer("tok-subj"),
        Json(RegisterOptionsRequest {
            modality: "FACE_KEY".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(options.rp_id, "vita.example");
    assert!(options.require_user_verification);
    assert_eq!(options.algorithms, vec![-8]);

    let Json(enrolled) = handlers::register_verify(
        State(state.clone()),
        bearer("tok-subj"),
        Json(enrollment_request(&options.challenge, &options.rp_id, &keys)),
    )
    .await
    .unwrap();
    assert_eq!(enrolled.credential_id, hex::encode(b"cred-1"));

    // A second options request conflicts.
    let err = handlers::register_options(
        State(state),
        bearer("tok-subj"),
        Json(RegisterOptionsRequest {
            modality: "FACE_KEY".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_and_code(), (StatusCode::CONFLICT, "ALREADY_ENROLLED"));
}

#[tokio::test]
async fn authenticate_flow_over_handlers() {
    let (_store, state) = state(NullComparer::fixed(Comparison::Score(0)));
    let keys = vita_crypto::keypair_from_seed(&[3; 32]);

    let Json(options) = handlers::register_options(
        State(state.clone()),
        bearer("tok-subj"),
        Json(RegisterOptionsRequest {
            modality: "FACE_KEY".to_string(),
        }),
    )
    .await
    .unwrap();
    handlers::register_verify(
        State(state.clone()),
        bearer("tok-subj"),
        Json(enrollment_request(&options.challenge, &options.rp_id, &keys)),
    )
    .await
    .unwrap();

    let Json(options) = handlers::authenticate_options(
        State(state.clone()),
        bearer("tok-subj"),
        Json(AuthenticateOptionsRequest {
            modality: "FACE_KEY".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(options.allowed_credential_ids, vec![hex::encode(b"cred-1")]);

    let challenge = hex::decode(&options.challenge).unwrap();
    let client_data = ClientData {
        purpose: vita_types::CeremonyPurpose::Authenticate,
        challenge,
        origin: "https://vita.example".to_string(),
    };
    let auth_data = AuthenticatorData::new(&options.rp_id, UV, 1);
    let signature =
        vita_crypto::sign_message(&signature_base(&auth_data, &client_data), &keys.private);

    let Json(verified) = handlers::authenticate_verify(
        State(state),
        bearer("tok-subj"),
        Json(AuthenticateVerifyRequest {
            modality: "FACE_KEY".to_string(),
            credential_id: hex::encode(b"cred-1"),
            authenticator_data: hex::encode(auth_data.to_bytes()),
            client_data: ClientDataDto {
                purpose: "authenticate".to_string(),
                challenge: options.challenge.clone(),
                origin: "https://vita.example".to_string(),
            },
            signature: hex::encode(signature.as_bytes()),
        }),
    )
    .await
    .unwrap();
    assert!(verified.success);
    assert_eq!(verified.status, "VERIFIED");
}

#[tokio::test]
async fn face_escalation_then_officer_decides() {
    let (store, state) = state(NullComparer::fixed(Comparison::Score(40)));
    store
        .put_reference(&SubjectId::new("subj-1"), b"reference")
        .unwrap();

    // A low score resolves as 200 with a pending-review body.
    let Json(response) = handlers::face_verify(
        State(state.clone()),
        bearer("tok-subj"),
        Json(FaceVerifyRequest {
            image: hex::encode(b"capture"),
            artifact_ref: Some("img-9".to_string()),
        }),
    )
    .await
    .unwrap();
    assert!(!response.success);
    assert_eq!(response.status, "PENDING_REVIEW");
    assert_eq!(response.score, Some(40));
    let case_id = response.case_id.unwrap();

    // A subject token cannot decide reviews.
    let err = handlers::review_decide(
        State(state.clone()),
        bearer("tok-subj"),
        Json(ReviewDecideRequest {
            case_id: case_id.clone(),
            decision: "APPROVE".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);

    let Json(case) = handlers::review_decide(
        State(state.clone()),
        bearer("tok-off"),
        Json(ReviewDecideRequest {
            case_id: case_id.clone(),
            decision: "APPROVE".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(case.status, "APPROVED");
    assert_eq!(case.decided_by.as_deref(), Some("officer-7"));

    let err = handlers::review_decide(
        State(state),
        bearer("tok-off"),
        Json(ReviewDecideRequest {
            case_id,
            decision: "REJECT".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_and_code(), (StatusCode::CONFLICT, "ALREADY_DECIDED"));
}

#[tokio::test]
async fn malformed_hex_is_a_bad_request() {
    let (_store, state) = state(NullComparer::fixed(Comparison::Score(0)));
    let err = handlers::face_verify(
        State(state),
        bearer("tok-subj"),
        Json(FaceVerifyRequest {
            image: "not-hex".to_string(),
            artifact_ref: None,
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RpcError::InvalidRequest(_)));
    assert_eq!(err.status_and_code().0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (_store, state) = state(NullComparer::fixed(Comparison::Score(0)));
    let err = handlers::register_options(
        State(state),
        HeaderMap::new(),
        Json(RegisterOptionsRequest {
            modality: "FACE_KEY".to_string(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_and_code().0, StatusCode::UNAUTHORIZED);
}
