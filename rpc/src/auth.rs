//! Bearer-token caller identity.
//!
//! The HTTP layer does not own identity; it resolves bearer tokens through
//! the [`CallerIdentity`] seam and hands typed subject/officer ids to the
//! core. A missing, malformed or unknown token is `Unauthorized` before any
//! ceremony state is touched.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

use vita_types::{OfficerId, SubjectId};
use vita_verification::VerificationError;

use crate::error::RpcError;

/// Who a bearer token resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Caller {
    Subject(SubjectId),
    Officer(OfficerId),
}

/// Resolves bearer tokens to callers.
pub trait CallerIdentity: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Caller>;
}

/// Static token table loaded from configuration.
///
/// Suitable for development and single-tenant deployments; production
/// deployments put a real identity provider behind [`CallerIdentity`].
pub struct StaticTokens {
    subjects: HashMap<String, SubjectId>,
    officers: HashMap<String, OfficerId>,
}

impl StaticTokens {
    pub fn new(
        subject_tokens: HashMap<String, String>,
        officer_tokens: HashMap<String, String>,
    ) -> Self {
        Self {
            subjects: subject_tokens
                .into_iter()
                .map(|(token, id)| (token, SubjectId::new(id)))
                .collect(),
            officers: officer_tokens
                .into_iter()
                .map(|(token, id)| (token, OfficerId::new(id)))
                .collect(),
        }
    }
}

impl CallerIdentity for StaticTokens {
    fn resolve(&self, token: &str) -> Option<Caller> {
        if let Some(officer) = self.officers.get(token) {
            return Some(Caller::Officer(officer.clone()));
        }
        self.subjects
            .get(token)
            .map(|subject| Caller::Subject(subject.clone()))
    }
}

/// The token carried in an `Authorization: Bearer ...` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn resolve_caller(identity: &dyn CallerIdentity, headers: &HeaderMap) -> Result<Caller, RpcError> {
    let token = bearer_token(headers)
        .ok_or(RpcError::Verification(VerificationError::Unauthorized))?;
    identity
        .resolve(token)
        .ok_or(RpcError::Verification(VerificationError::Unauthorized))
}

/// Resolve the caller and require a beneficiary identity.
pub fn require_subject(
    identity: &dyn CallerIdentity,
    headers: &HeaderMap,
) -> Result<SubjectId, RpcError> {
    match resolve_caller(identity, headers)? {
        Caller::Subject(subject) => Ok(subject),
        Caller::Officer(_) => Err(RpcError::Verification(VerificationError::Unauthorized)),
    }
}

/// Resolve the caller and require an officer identity.
pub fn require_officer(
    identity: &dyn CallerIdentity,
    headers: &HeaderMap,
) -> Result<OfficerId, RpcError> {
    match resolve_caller(identity, headers)? {
        Caller::Officer(officer) => Ok(officer),
        Caller::Subject(_) => Err(RpcError::Verification(VerificationError::Unauthorized)),
    }
}
