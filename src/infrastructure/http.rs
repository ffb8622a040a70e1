use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::DomainError;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            DomainError::Decode(e.to_string())
        } else {
            DomainError::Unavailable(e.to_string())
        }
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Shared REST plumbing for the backend services: base URL, timeout and an
/// optional bearer token.
///
/// Endpoints are addressed by path segments. Each segment is percent-encoded
/// on its own, so an id containing `/`, `?` or `#` stays inside its segment.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DomainError::Internal(format!("Invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DomainError::Internal(format!(
                "Invalid API base URL '{base_url}'"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Internal(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// A copy of this client that authenticates as `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the endpoint below the base URL named by `segments`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(DomainError::InvalidInput(format!(
                "'{bad}' is not a valid path segment"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::Internal(format!("Invalid API base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, DomainError> {
        let url = self.endpoint(segments)?;
        let request = self.http.get(url.clone()).query(query);
        self.send(request, "GET", &url).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, DomainError> {
        let url = self.endpoint(segments)?;
        let request = self.http.post(url.clone()).json(body);
        self.send(request, "POST", &url).await
    }

    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, DomainError> {
        let url = self.endpoint(segments)?;
        let request = self.http.post(url.clone());
        self.send(request, "POST", &url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &Url,
    ) -> Result<T, DomainError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let path = url.path();
        log::debug!("{} {}", method, path);
        let response = request.send().await?;
        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| DomainError::Decode(format!("{method} {path}: {e}")))
    }
}

async fn check_status(response: Response) -> Result<Response, DomainError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::debug!("Request failed with {}: {}", status, body);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DomainError::Unauthorized,
        StatusCode::NOT_FOUND => DomainError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            DomainError::InvalidInput(body)
        }
        _ => DomainError::Service {
            status: status.as_u16(),
            message: body,
        },
    })
}
