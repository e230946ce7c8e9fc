//! services/client/src/adapters/http.rs
//!
//! The shared HTTP plumbing for the backend adapters: one `reqwest` client, the base
//! URL, and the mapping of HTTP failures onto `PortError`.

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::ConfigError;
use crate::error::ClientError;
use code_explainer_core::ports::{PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `HistoryService` and `CodeService` over the backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        // A trailing slash keeps `Url::join` from dropping the last path segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            ConfigError::InvalidValue("CODE_EXPLAINER_API_URL".to_string(), e.to_string())
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Resolves a path such as `history/explanations` against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> PortResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| PortError::Unexpected(format!("invalid endpoint '{}': {}", path, e)))
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Sends a request and decodes a successful JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> PortResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        read_json(response).await
    }
}

//=========================================================================================
// Response Handling
//=========================================================================================

async fn read_json<T: DeserializeOwned>(response: Response) -> PortResult<T> {
    let status = response.status();
    debug!("{} {}", status, response.url());

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(&body);
        return Err(match status {
            StatusCode::NOT_FOUND => PortError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                PortError::Rejected(detail)
            }
            _ => PortError::Unexpected(format!("backend responded with {}: {}", status, detail)),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| PortError::Unexpected(format!("malformed response body: {}", e)))
}

/// Extracts a readable message from an error body.
///
/// Handles both `{"detail": "..."}` and the validation form
/// `{"detail": [{"msg": "..."}, ...]}`; anything else is returned trimmed.
pub(crate) fn error_detail(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    match parsed.as_ref().and_then(|v| v.get("detail")) {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .collect::<Vec<_>>()
            .join("; "),
        _ if body.trim().is_empty() => "no details provided".to_string(),
        _ => body.trim().to_string(),
    }
}

/// Turns an `{"success": false}` envelope into a rejection.
pub(crate) fn ensure_success(success: bool, action: &str) -> PortResult<()> {
    if success {
        Ok(())
    } else {
        Err(PortError::Rejected(format!("the backend reported failure to {}", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_the_base_path() {
        let backend = HttpBackend::new("http://localhost:8000/api", None).unwrap();
        assert_eq!(
            backend.endpoint("/history/explanations").unwrap().as_str(),
            "http://localhost:8000/api/history/explanations"
        );
        let bare = HttpBackend::new("http://localhost:8000/", None).unwrap();
        assert_eq!(
            bare.endpoint("code/languages").unwrap().as_str(),
            "http://localhost:8000/code/languages"
        );
    }

    #[test]
    fn rejects_unparseable_base_urls() {
        assert!(matches!(
            HttpBackend::new("not a url", None),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn error_detail_reads_every_known_shape() {
        assert_eq!(
            error_detail(r#"{"detail":"Explanation with ID 7 not found"}"#),
            "Explanation with ID 7 not found"
        );
        assert_eq!(
            error_detail(r#"{"detail":[{"msg":"field required"},{"msg":"value too short"}]}"#),
            "field required; value too short"
        );
        assert_eq!(error_detail("Internal Server Error\n"), "Internal Server Error");
        assert_eq!(error_detail(""), "no details provided");
    }
}
