//! Triage backend client — the two request/response contracts.
//!
//! The backend exposes two lookups: emergency guidance for a symptom, and
//! ranked hospital recommendations for a symptom + position. Both are plain
//! request/response JSON over HTTP; failure of either is non-fatal and is
//! converted to a user-facing message at the session boundary, never
//! propagated further.
//!
//! `TriageApi` is the seam: the shell wires in `TriageClient` (reqwest),
//! tests wire in `MockTriageApi`.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config;
use crate::models::{EmergencyGuidance, HospitalRecommendationResponse};

/// Errors from triage backend calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach the triage backend at {0}")]
    Connection(String),
    #[error("Triage backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("Malformed backend response: {0}")]
    ResponseParsing(String),
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// The two backend lookups the client orchestrates.
#[allow(async_fn_in_trait)]
pub trait TriageApi {
    /// Guidance lookup: symptom text in, guidance object out.
    /// An empty object is a valid response meaning "no guidance".
    async fn emergency_guidance(&self, symptom: &str)
        -> Result<EmergencyGuidance, ApiError>;

    /// Recommendation lookup: symptom + coordinates in, ranked list out.
    /// Ordering is the service's — the client never re-sorts.
    async fn hospital_recommendations(
        &self,
        symptom: &str,
        lat: f64,
        lon: f64,
    ) -> Result<HospitalRecommendationResponse, ApiError>;
}

// ═══════════════════════════════════════════════════════════
// TriageClient — reqwest implementation
// ═══════════════════════════════════════════════════════════

/// HTTP client for the triage backend.
pub struct TriageClient {
    base_url: String,
    client: reqwest::Client,
}

impl TriageClient {
    /// Create a client pointing at the given backend.
    ///
    /// Only a connect timeout is configured; the lookups themselves are
    /// unbounded (a hung request leaves the loading state showing).
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config::API_CONNECT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Client for the backend named by `ER_COMPASS_API_URL` (or the default).
    pub fn from_env() -> Self {
        Self::new(&config::api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ApiError::Connection(self.base_url.clone())
                } else {
                    ApiError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::ResponseParsing(e.to_string()))
    }
}

/// Request body for the guidance lookup.
#[derive(Serialize)]
struct GuidanceRequest<'a> {
    symptom: &'a str,
}

/// Request body for the recommendation lookup.
#[derive(Serialize)]
struct HospitalRequest<'a> {
    symptom: &'a str,
    lat: f64,
    lon: f64,
}

impl TriageApi for TriageClient {
    async fn emergency_guidance(
        &self,
        symptom: &str,
    ) -> Result<EmergencyGuidance, ApiError> {
        self.post_json("/api/emergency-guidance", &GuidanceRequest { symptom })
            .await
    }

    async fn hospital_recommendations(
        &self,
        symptom: &str,
        lat: f64,
        lon: f64,
    ) -> Result<HospitalRecommendationResponse, ApiError> {
        self.post_json(
            "/api/hospital-recommendations",
            &HospitalRequest { symptom, lat, lon },
        )
        .await
    }
}

// ═══════════════════════════════════════════════════════════
// MockTriageApi — configurable test double
// ═══════════════════════════════════════════════════════════

/// Mock backend for tests — returns configurable outcomes and counts calls,
/// so tests can assert which fetches were (not) triggered.
pub struct MockTriageApi {
    guidance: Result<EmergencyGuidance, String>,
    hospitals: Result<HospitalRecommendationResponse, String>,
    guidance_calls: AtomicUsize,
    hospital_calls: AtomicUsize,
}

impl MockTriageApi {
    pub fn new() -> Self {
        Self {
            guidance: Ok(EmergencyGuidance::default()),
            hospitals: Ok(HospitalRecommendationResponse::default()),
            guidance_calls: AtomicUsize::new(0),
            hospital_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_guidance(mut self, guidance: EmergencyGuidance) -> Self {
        self.guidance = Ok(guidance);
        self
    }

    pub fn with_guidance_error(mut self, message: &str) -> Self {
        self.guidance = Err(message.to_string());
        self
    }

    pub fn with_hospitals(mut self, response: HospitalRecommendationResponse) -> Self {
        self.hospitals = Ok(response);
        self
    }

    pub fn with_hospital_error(mut self, message: &str) -> Self {
        self.hospitals = Err(message.to_string());
        self
    }

    pub fn guidance_calls(&self) -> usize {
        self.guidance_calls.load(Ordering::SeqCst)
    }

    pub fn hospital_calls(&self) -> usize {
        self.hospital_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTriageApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageApi for MockTriageApi {
    async fn emergency_guidance(
        &self,
        _symptom: &str,
    ) -> Result<EmergencyGuidance, ApiError> {
        self.guidance_calls.fetch_add(1, Ordering::SeqCst);
        self.guidance.clone().map_err(ApiError::Http)
    }

    async fn hospital_recommendations(
        &self,
        _symptom: &str,
        _lat: f64,
        _lon: f64,
    ) -> Result<HospitalRecommendationResponse, ApiError> {
        self.hospital_calls.fetch_add(1, Ordering::SeqCst);
        self.hospitals.clone().map_err(ApiError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = TriageClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn from_env_honors_default() {
        // ER_COMPASS_API_URL is unset in the test environment.
        let client = TriageClient::from_env();
        assert!(client.base_url().starts_with("http://"));
    }

    #[tokio::test]
    async fn mock_returns_configured_guidance() {
        let api = MockTriageApi::new().with_guidance(EmergencyGuidance {
            situation_summary: Some("test".into()),
            ..Default::default()
        });
        let g = api.emergency_guidance("chest pain").await.unwrap();
        assert_eq!(g.situation_summary.as_deref(), Some("test"));
        assert_eq!(api.guidance_calls(), 1);
        assert_eq!(api.hospital_calls(), 0);
    }

    #[tokio::test]
    async fn mock_returns_configured_error() {
        let api = MockTriageApi::new().with_hospital_error("backend down");
        let err = api
            .hospital_recommendations("fainting", 37.5, 127.0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("backend down"));
        assert_eq!(api.hospital_calls(), 1);
    }

    #[test]
    fn request_bodies_match_the_wire_contract() {
        let json = serde_json::to_string(&GuidanceRequest { symptom: "burn" }).unwrap();
        assert_eq!(json, r#"{"symptom":"burn"}"#);

        let json = serde_json::to_string(&HospitalRequest {
            symptom: "burn",
            lat: 37.5,
            lon: 127.0,
        })
        .unwrap();
        assert_eq!(json, r#"{"symptom":"burn","lat":37.5,"lon":127.0}"#);
    }

    #[test]
    fn api_error_messages_are_human_readable() {
        let err = ApiError::Connection("http://localhost:8000".into());
        assert!(err.to_string().contains("Cannot reach"));

        let err = ApiError::Backend {
            status: 503,
            body: "maintenance".into(),
        };
        assert!(err.to_string().contains("503"));
    }
}
