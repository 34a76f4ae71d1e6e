//! HTTP client for the external face-comparison service.
//!
//! One blocking POST per comparison; the handler calls this from a
//! blocking task. Transport and non-2xx failures surface as
//! `SimilarityError::Service`; an image in which the service found no
//! face is a normal [`Comparison::NoFaceDetected`] outcome.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use vita_verification::{Comparison, SimilarityComparer, SimilarityError};

use crate::error::RpcError;

#[derive(Serialize)]
struct CompareRequest {
    reference: String,
    probe: String,
}

#[derive(Deserialize)]
struct CompareResponse {
    face_detected: bool,
    score: Option<u8>,
}

pub struct HttpFaceComparer {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpFaceComparer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Config(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl SimilarityComparer for HttpFaceComparer {
    fn compare(&self, reference: &[u8], probe: &[u8]) -> Result<Comparison, SimilarityError> {
        let request = CompareRequest {
            reference: hex::encode(reference),
            probe: hex::encode(probe),
        };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SimilarityError::Service(e.to_string()))?;
        let body: CompareResponse = response
            .json()
            .map_err(|e| SimilarityError::Service(e.to_string()))?;

        if !body.face_detected {
            return Ok(Comparison::NoFaceDetected);
        }
        match body.score {
            Some(score) => Ok(Comparison::Score(score.min(100))),
            None => Err(SimilarityError::Service(
                "face detected but no score reported".to_string(),
            )),
        }
    }
}
