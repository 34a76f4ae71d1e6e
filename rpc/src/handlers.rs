//! HTTP request handlers and their JSON DTOs.
//!
//! Binary fields (challenges, credential ids, keys, signatures,
//! authenticator data, images) travel hex-encoded. Handlers resolve the
//! caller, decode the DTO into the typed wire structs, and run the core on
//! a blocking task; all policy lives in `vita-verification`.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use vita_types::{
    CaseId, CredentialId, Modality, PublicKey, ReviewCase, ReviewDecision, Signature, Timestamp,
    Transport,
};
use vita_verification::wire::{AssertionResponse, ClientData, EnrollmentResponse};
use vita_verification::{AuthenticatorData, FaceOutcome, VerificationService};

use crate::auth::{self, CallerIdentity};
use crate::error::RpcError;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VerificationService>,
    pub identity: Arc<dyn CallerIdentity>,
}

// ── Decoding helpers ─────────────────────────────────────────────────────

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, RpcError> {
    hex::decode(value).map_err(|e| RpcError::InvalidRequest(format!("{field}: {e}")))
}

fn decode_array<const N: usize>(field: &str, value: &str) -> Result<[u8; N], RpcError> {
    let bytes = decode_hex(field, value)?;
    bytes
        .try_into()
        .map_err(|_| RpcError::InvalidRequest(format!("{field}: expected {N} bytes")))
}

fn parse_modality(value: &str) -> Result<Modality, RpcError> {
    Modality::from_str(value).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}

fn parse_transport(value: &str) -> Result<Transport, RpcError> {
    match value {
        "internal" => Ok(Transport::Internal),
        "hybrid" => Ok(Transport::Hybrid),
        "usb" => Ok(Transport::Usb),
        "nfc" => Ok(Transport::Nfc),
        "ble" => Ok(Transport::Ble),
        other => Err(RpcError::InvalidRequest(format!(
            "unknown transport: {other}"
        ))),
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, RpcError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, RpcError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| RpcError::Server(e.to_string()))?
}

/// The client-data half of a ceremony response.
#[derive(Deserialize)]
pub struct ClientDataDto {
    pub purpose: String,
    pub challenge: String,
    pub origin: String,
}

impl ClientDataDto {
    fn decode(&self) -> Result<ClientData, RpcError> {
        Ok(ClientData {
            purpose: self
                .purpose
                .parse()
                .map_err(|e: vita_types::TypeError| RpcError::InvalidRequest(e.to_string()))?,
            challenge: decode_hex("client_data.challenge", &self.challenge)?,
            origin: self.origin.clone(),
        })
    }
}

fn decode_authenticator_data(value: &str) -> Result<AuthenticatorData, RpcError> {
    let bytes = decode_hex("authenticator_data", value)?;
    AuthenticatorData::from_bytes(&bytes).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}

// ── Registration ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterOptionsRequest {
    pub modality: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterOptionsResponse {
    pub challenge: String,
    pub rp_id: String,
    pub subject: String,
    pub display_name: String,
    /// COSE algorithm identifiers, preference order.
    pub algorithms: Vec<i32>,
    pub require_user_verification: bool,
    pub attachment: String,
}

pub async fn register_options(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterOptionsRequest>,
) -> Result<Json<RegisterOptionsResponse>, RpcError> {
    let subject = auth::require_subject(&*state.identity, &headers)?;
    let modality = parse_modality(&request.modality)?;

    let service = Arc::clone(&state.service);
    let options = run_blocking(move || {
        Ok(service.registration_options(&subject, modality, Timestamp::now())?)
    })
    .await?;

    Ok(Json(RegisterOptionsResponse {
        challenge: hex::encode(&options.challenge),
        rp_id: options.rp_id,
        subject: options.subject.to_string(),
        display_name: options.display_name,
        algorithms: options.allowed_algorithms.iter().map(|a| a.cose_id()).collect(),
        require_user_verification: options.require_user_verification,
        attachment: "platform".to_string(),
    }))
}

#[derive(Deserialize)]
pub struct RegisterVerifyRequest {
    pub modality: String,
    pub credential_id: String,
    pub public_key: String,
    pub authenticator_data: String,
    pub client_data: ClientDataDto,
    pub signature: String,
    #[serde(default)]
    pub transports: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterVerifyResponse {
    pub credential_id: String,
}

pub async fn register_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RegisterVerifyRequest>,
) -> Result<Json<RegisterVerifyResponse>, RpcError> {
    let subject = auth::require_subject(&*state.identity, &headers)?;
    let modality = parse_modality(&request.modality)?;

    let response = EnrollmentResponse {
        credential_id: CredentialId::new(decode_hex("credential_id", &request.credential_id)?),
        public_key: PublicKey(decode_array("public_key", &request.public_key)?),
        authenticator_data: decode_authenticator_data(&request.authenticator_data)?,
        client_data: request.client_data.decode()?,
        signature: Signature(decode_array("signature", &request.signature)?),
        transports: request
            .transports
            .iter()
            .map(|t| parse_transport(t))
            .collect::<Result<_, _>>()?,
    };

    let service = Arc::clone(&state.service);
    let credential_id = run_blocking(move || {
        Ok(service.register(&subject, modality, &response, Timestamp::now())?)
    })
    .await?;

    Ok(Json(RegisterVerifyResponse {
        credential_id: credential_id.to_hex(),
    }))
}

// ── Authentication ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AuthenticateOptionsRequest {
    pub modality: String,
}

#[derive(Serialize)]
pub struct AuthenticateOptionsResponse {
    pub challenge: String,
    pub rp_id: String,
    pub allowed_credential_ids: Vec<String>,
    pub require_user_verification: bool,
}

pub async fn authenticate_options(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AuthenticateOptionsRequest>,
) -> Result<Json<AuthenticateOptionsResponse>, RpcError> {
    let subject = auth::require_subject(&*state.identity, &headers)?;
    let modality = parse_modality(&request.modality)?;

    let service = Arc::clone(&state.service);
    let options = run_blocking(move || {
        Ok(service.authentication_options(&subject, modality, Timestamp::now())?)
    })
    .await?;

    Ok(Json(AuthenticateOptionsResponse {
        challenge: hex::encode(&options.challenge),
        rp_id: options.rp_id,
        allowed_credential_ids: options
            .allowed_credential_ids
            .iter()
            .map(|id| id.to_hex())
            .collect(),
        require_user_verification: options.require_user_verification,
    }))
}

#[derive(Deserialize)]
pub struct AuthenticateVerifyRequest {
    pub modality: String,
    pub credential_id: String,
    pub authenticator_data: String,
    pub client_data: ClientDataDto,
    pub signature: String,
}

#[derive(Serialize)]
pub struct AuthenticateVerifyResponse {
    pub success: bool,
    pub status: String,
    pub next_due: u64,
}

pub async fn authenticate_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AuthenticateVerifyRequest>,
) -> Result<Json<AuthenticateVerifyResponse>, RpcError> {
    let subject = auth::require_subject(&*state.identity, &headers)?;
    let modality = parse_modality(&request.modality)?;

    let response = AssertionResponse {
        credential_id: CredentialId::new(decode_hex("credential_id", &request.credential_id)?),
        authenticator_data: decode_authenticator_data(&request.authenticator_data)?,
        client_data: request.client_data.decode()?,
        signature: Signature(decode_array("signature", &request.signature)?),
    };

    let service = Arc::clone(&state.service);
    let next_due = run_blocking(move || {
        Ok(service.authenticate(&subject, modality, &response, Timestamp::now())?)
    })
    .await?;

    Ok(Json(AuthenticateVerifyResponse {
        success: true,
        status: "VERIFIED".to_string(),
        next_due: next_due.as_secs(),
    }))
}

// ── Face similarity ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FaceVerifyRequest {
    /// Freshly captured image, hex-encoded.
    pub image: String,
    /// Caller-side pointer to the captured artifact, kept on the review
    /// case if the request escalates.
    #[serde(default)]
    pub artifact_ref: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FaceVerifyResponse {
    pub success: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
}

pub async fn face_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<FaceVerifyRequest>,
) -> Result<Json<FaceVerifyResponse>, RpcError> {
    let subject = auth::require_subject(&*state.identity, &headers)?;
    let probe = decode_hex("image", &request.image)?;
    let artifact_ref = request.artifact_ref;

    let service = Arc::clone(&state.service);
    let outcome = run_blocking(move || {
        Ok(service.verify_face(&subject, &probe, artifact_ref, Timestamp::now())?)
    })
    .await?;

    // Escalation is a handled outcome, not an HTTP error.
    let response = match outcome {
        FaceOutcome::Accepted { score, next_due } => FaceVerifyResponse {
            success: true,
            status: "VERIFIED".to_string(),
            score: Some(score),
            next_due: Some(next_due.as_secs()),
            case_id: None,
        },
        FaceOutcome::Escalated { score, case } => FaceVerifyResponse {
            success: false,
            status: "PENDING_REVIEW".to_string(),
            score,
            next_due: None,
            case_id: Some(case.id.to_string()),
        },
    };
    Ok(Json(response))
}

// ── Review ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReviewDecideRequest {
    pub case_id: String,
    /// "APPROVE" or "REJECT".
    pub decision: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewCaseResponse {
    pub id: String,
    pub subject: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_ref: Option<String>,
    pub opened_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl From<ReviewCase> for ReviewCaseResponse {
    fn from(case: ReviewCase) -> Self {
        Self {
            id: case.id.to_string(),
            subject: case.subject.to_string(),
            status: case.status.as_str().to_string(),
            artifact_ref: case.artifact_ref,
            opened_at: case.opened_at.as_secs(),
            decided_at: case.decided_at.map(|t| t.as_secs()),
            decided_by: case.decided_by.map(|o| o.to_string()),
        }
    }
}

pub async fn review_decide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ReviewDecideRequest>,
) -> Result<Json<ReviewCaseResponse>, RpcError> {
    let officer = auth::require_officer(&*state.identity, &headers)?;
    let case_id = CaseId::new(request.case_id);
    let decision = ReviewDecision::from_str(&request.decision)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

    let service = Arc::clone(&state.service);
    let case = run_blocking(move || {
        Ok(service.decide_review(&case_id, decision, &officer, Timestamp::now())?)
    })
    .await?;

    Ok(Json(case.into()))
}
