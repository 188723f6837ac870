// Everhome HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, per-request bearer token
// injection, and status/body handling. Endpoint methods live in separate
// files as inherent impls to keep this module focused on transport mechanics.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Public Everhome cloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://everhome.cloud";

/// Raw HTTP client for the Everhome cloud API.
///
/// Every request asks the [`TokenProvider`] for a fresh token first; a
/// provider failure aborts the request before anything is sent.
#[derive(Clone)]
pub struct EverhomeClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl std::fmt::Debug for EverhomeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EverhomeClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl EverhomeClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        tokens: Arc<dyn TokenProvider>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, tokens))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http,
            base_url,
            tokens,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{path}`, keeping any path prefix on the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment as a
    /// single path component so `/`, `?` and `#` stay inside it.
    ///
    /// Empty, `.` and `..` segments would be dropped or resolved away, so
    /// they are rejected with [`Error::InvalidPathSegment`].
    pub(crate) fn url_with_segments(&self, segments: &[&str]) -> Result<Url, Error> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(Error::InvalidPathSegment {
                segment: (*bad).to_owned(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach `Authorization: Bearer <token>` from the token provider.
    async fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.tokens.access_token().await.map_err(|e| match e {
            Error::Authentication { .. } => e,
            other => Error::Authentication {
                message: other.to_string(),
            },
        })?;
        Ok(builder.bearer_auth(token.expose_secret()))
    }

    /// Send a GET request and decode the JSON body.
    ///
    /// Only HTTP 200 is accepted; any other status becomes [`Error::Http`]
    /// carrying the response body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.authorized(self.http.get(url)).await?;
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "response body received");
        serde_json::from_str(&body).map_err(|e| {
            let preview = crate::error::preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Send a POST request with a JSON body. Any 2xx status is success and
    /// the response body is ignored.
    pub(crate) async fn post(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("POST {}", url);

        let builder = self.authorized(self.http.post(url).json(body)).await?;
        let resp = builder.send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
