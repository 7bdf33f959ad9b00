//! HTTP transport for single model attempts

use std::time::Duration;

use stepmeter_types::Result;

use crate::api::GenerateContentRequest;

/// Raw outcome of one attempt against one model
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One request against a single model. Implementations never retry; the
/// fallback order across models belongs to the extractor.
pub trait ModelTransport {
    fn send(
        &self,
        model_id: &str,
        credential: &str,
        request: &GenerateContentRequest,
    ) -> Result<ApiResponse>;
}

/// Blocking HTTP transport against the generateContent REST endpoint
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTransport {
    /// Error statuses are returned as plain responses so the extractor can
    /// tell a 404 from a 429 from a 500.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ModelTransport for HttpTransport {
    fn send(
        &self,
        model_id: &str,
        credential: &str,
        request: &GenerateContentRequest,
    ) -> Result<ApiResponse> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model_id, credential
        );
        let body = serde_json::to_string(request)?;

        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(&body)?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_covers_the_2xx_range() {
        for status in [200, 201, 299] {
            let response = ApiResponse {
                status,
                body: String::new(),
            };
            assert!(response.is_success());
        }
        for status in [199, 301, 404, 429, 500] {
            let response = ApiResponse {
                status,
                body: String::new(),
            };
            assert!(!response.is_success());
        }
    }
}
