//! Shared HTTP plumbing for the Bedrock clients.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::version;
use crate::{GateError, Result};

/// Default request timeout for both Bedrock endpoints.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// JSON-over-HTTPS transport bound to one service endpoint.
#[derive(Clone)]
pub(crate) struct HttpTransport {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub(crate) fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()
            .map_err(|e| GateError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.into();
        // Fail at construction rather than on the first request.
        Url::parse(&base_url)
            .map_err(|e| GateError::Configuration(format!("invalid endpoint {base_url:?}: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `{base_url}/{segments...}` and decode the JSON reply.
    ///
    /// `resource` names the model or knowledge base in not-found errors.
    pub(crate) async fn post_json<B, R>(
        &self,
        segments: &[&str],
        body: &B,
        resource: &str,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "POST");

        let mut request = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let response = check_status(response, resource).await?;
        Ok(response.json::<R>().await?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            GateError::Configuration(format!("invalid endpoint {:?}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                GateError::Configuration(format!(
                    "endpoint {:?} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[derive(Deserialize)]
struct ServiceErrorBody {
    #[serde(alias = "Message")]
    message: Option<String>,
}

/// Map a non-success response to the matching [`GateError`].
async fn check_status(response: Response, resource: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    // e.g. "ThrottlingException:http://internal.amazon.com/coral/..."
    let error_type = response
        .headers()
        .get("x-amzn-errortype")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(':').next())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ServiceErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    let message = match error_type {
        Some(kind) => format!("{kind}: {detail}"),
        None => detail,
    };

    Err(match status.as_u16() {
        400 => GateError::Validation(message),
        401 | 403 => GateError::AuthenticationFailed(message),
        404 => GateError::ResourceNotFound(format!("{resource} ({message})")),
        429 => GateError::RateLimited { retry_after },
        code => GateError::Api {
            status: code,
            message,
        },
    })
}
