use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, warn};

use super::messages::DetectionResponse;
use super::{derive_verdict, DEFAULT_LOCATION_LABEL};
use crate::config::{ScanConfig, DEFAULT_CONFIDENCE_PERCENT, DEFAULT_DETECTION_HOST, DEFAULT_MODEL_PATH};
use crate::error::DetectionError;
use crate::types::{CaptureFrame, Verdict};

/// Request behavior for one detection call.
///
/// The defaults mirror what the capture view relies on: exactly one
/// attempt, no local timeout, no backoff. All three are configuration
/// rather than hardcoded call-site behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Total attempts per `detect` call, including the first
    pub max_attempts: u32,
    /// Per-attempt timeout; `None` defers to the transport default
    pub timeout: Option<Duration>,
    /// Delay between attempts
    pub backoff: Option<Duration>,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            timeout: None,
            backoff: None,
        }
    }
}

/// Client for the hosted detection endpoint.
///
/// One instance serves the whole session; each [`detect`](Self::detect)
/// call submits a single encoded frame and returns the derived verdict.
pub struct DetectionClient {
    api_key: String,
    host: String,
    model: String,
    confidence_percent: u32,
    policy: RequestPolicy,
    location_label: String,
    http: reqwest::Client,
}

impl DetectionClient {
    pub fn new(api_key: String) -> Self {
        Self::with_host(api_key, DEFAULT_DETECTION_HOST.to_string())
    }

    pub fn with_host(api_key: String, host: String) -> Self {
        Self {
            api_key,
            host,
            model: DEFAULT_MODEL_PATH.to_string(),
            confidence_percent: DEFAULT_CONFIDENCE_PERCENT,
            policy: RequestPolicy::default(),
            location_label: DEFAULT_LOCATION_LABEL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from an injected configuration object.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::with_host(config.api_key.clone(), config.host.clone())
            .with_model(config.model.clone())
            .with_confidence_percent(config.confidence_percent)
            .with_policy(config.policy.clone())
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_confidence_percent(mut self, percent: u32) -> Self {
        self.confidence_percent = percent;
        self
    }

    pub fn with_policy(mut self, policy: RequestPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_location_label(mut self, label: String) -> Self {
        self.location_label = label;
        self
    }

    /// Submit one captured frame and derive its verdict.
    ///
    /// Attempts are governed by the configured [`RequestPolicy`]; the
    /// default makes exactly one request. A non-success status, transport
    /// failure or malformed response body fails the whole call. No partial
    /// verdict is ever produced.
    pub async fn detect(
        &self,
        frame: &CaptureFrame,
        captured_at: DateTime<Local>,
    ) -> Result<Verdict, DetectionError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.request_once(frame).await {
                Ok(response) => {
                    debug!("detection succeeded on attempt {attempt}: {response}");
                    return Ok(derive_verdict(
                        &response,
                        frame,
                        captured_at,
                        &self.location_label,
                    ));
                }
                Err(err) if attempt < self.policy.max_attempts => {
                    warn!("detection attempt {attempt} failed: {err}");
                    if let Some(delay) = self.policy.backoff {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(err) => {
                    error!("detection failed after {attempt} attempt(s): {err}");
                    return Err(err);
                }
            }
        }
    }

    async fn request_once(&self, frame: &CaptureFrame) -> Result<DetectionResponse, DetectionError> {
        // The key goes into the query string, so never log the full URL.
        let url = format!(
            "{}/{}?api_key={}&confidence={}",
            self.host,
            self.model,
            urlencoding::encode(&self.api_key),
            self.confidence_percent
        );
        debug!(
            "submitting {} byte image to {}/{}",
            frame.image.len(),
            self.host,
            self.model
        );

        let mut request = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(frame.image.payload().to_vec());
        if let Some(timeout) = self.policy.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("response status: {status}");

        let body = response.text().await?;
        if !status.is_success() {
            error!("detection request failed: {body}");
            return Err(DetectionError::Server {
                status_code: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EncodedImage;
    use mockito::{Matcher, Server};
    use tracing_test::traced_test;

    const RESPONSE_BODY: &str = r#"{
        "predictions": [
            {"x": 320.0, "y": 240.0, "width": 100.0, "height": 80.0, "class": "lesion", "confidence": 0.91}
        ],
        "image": {"width": 640, "height": 480}
    }"#;

    fn test_frame() -> CaptureFrame {
        CaptureFrame {
            image: EncodedImage::Jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9]),
            width: 640,
            height: 480,
        }
    }

    fn query_matcher() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
            Matcher::UrlEncoded("confidence".into(), "25".into()),
        ])
    }

    #[test]
    #[traced_test]
    fn test_client_creation() {
        let client = DetectionClient::new("test_key".to_string());
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.host, DEFAULT_DETECTION_HOST);
        assert_eq!(client.confidence_percent, 25);
        assert_eq!(client.policy, RequestPolicy::default());

        let client = DetectionClient::with_host("test_key".to_string(), "http://custom.host".to_string())
            .with_model("custom-model/1".to_string());
        assert_eq!(client.host, "http://custom.host");
        assert_eq!(client.model, "custom-model/1");
    }

    #[test]
    fn test_successful_detection() {
        let mut server = Server::new();

        let mock = server
            .mock("POST", "/fish-hab-screening/2")
            .match_query(query_matcher())
            .match_header("content-type", "application/x-www-form-urlencoded")
            .with_status(200)
            .with_body(RESPONSE_BODY)
            .create();

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let client = DetectionClient::with_host("test_key".to_string(), server.url());
            let verdict = client.detect(&test_frame(), chrono::Local::now()).await;

            let verdict = verdict.expect("detection should succeed");
            assert_eq!(verdict.status, crate::types::SampleStatus::Contaminated);
            assert_eq!(verdict.confidence, 0.91);
            assert_eq!(verdict.bounding_boxes.len(), 1);
        });

        mock.assert();
    }

    #[test]
    fn test_data_uri_prefix_stripped_from_body() {
        let mut server = Server::new();

        let mock = server
            .mock("POST", "/fish-hab-screening/2")
            .match_query(query_matcher())
            .match_body("QUJD")
            .with_status(200)
            .with_body(r#"{"predictions": [], "image": {"width": 1, "height": 1}}"#)
            .create();

        let frame = CaptureFrame {
            image: EncodedImage::DataUri("data:image/jpeg;base64,QUJD".to_string()),
            width: 1,
            height: 1,
        };

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let client = DetectionClient::with_host("test_key".to_string(), server.url());
            let verdict = client.detect(&frame, chrono::Local::now()).await;
            assert!(verdict.is_ok());
        });

        mock.assert();
    }

    #[test]
    fn test_server_error_yields_no_verdict() {
        let mut server = Server::new();

        let mock = server
            .mock("POST", "/fish-hab-screening/2")
            .match_query(query_matcher())
            .with_status(403)
            .with_body("Forbidden")
            .create();

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let client = DetectionClient::with_host("test_key".to_string(), server.url());
            let result = client.detect(&test_frame(), chrono::Local::now()).await;

            match result {
                Err(DetectionError::Server {
                    status_code,
                    message,
                }) => {
                    assert_eq!(status_code, 403);
                    assert_eq!(message, "Forbidden");
                }
                other => panic!("Expected Server error, got {:?}", other.map(|v| v.status)),
            }
        });

        mock.assert();
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        let mut server = Server::new();

        let mock = server
            .mock("POST", "/fish-hab-screening/2")
            .match_query(query_matcher())
            .with_status(200)
            .with_body("not json at all")
            .create();

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let client = DetectionClient::with_host("test_key".to_string(), server.url());
            let result = client.detect(&test_frame(), chrono::Local::now()).await;
            assert!(matches!(result, Err(DetectionError::Json(_))));
        });

        mock.assert();
    }

    #[test]
    fn test_policy_governs_attempt_count() {
        let mut server = Server::new();

        let mock = server
            .mock("POST", "/fish-hab-screening/2")
            .match_query(query_matcher())
            .with_status(500)
            .with_body("unavailable")
            .expect(3)
            .create();

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let client = DetectionClient::with_host("test_key".to_string(), server.url())
                .with_policy(RequestPolicy {
                    max_attempts: 3,
                    timeout: None,
                    backoff: Some(Duration::from_millis(1)),
                });
            let result = client.detect(&test_frame(), chrono::Local::now()).await;
            assert!(result.is_err());
        });

        mock.assert();
    }
}
