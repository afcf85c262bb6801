//! Client for the remote EGOT API.
//!
//! [`CelebrityApi`] is the seam the search and detail logic depend on; [`HttpApi`] implements it
//! over HTTP with reqwest.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::{Celebrity, CelebrityBasic, CelebrityWithProgress, OscarCeremony, Suggestion};
use crate::options::EgotOptions;

/// What a lookup was looking for, used to word not-found errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Resource {
    /// A celebrity by name
    Celebrity,
    /// An Oscar ceremony by year
    Ceremony,
    /// Anything else
    #[display("Resource")]
    Other,
}

/// Failures of a single API interaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered 404
    #[error("{0} not found")]
    NotFound(Resource),
    /// No answer within the allowed time
    #[error("Request timed out - please try again")]
    Timeout,
    /// Any other non-success status
    #[error("Server returned status {0}")]
    Status(u16),
    /// Connection or transport failure
    #[error("Network error: {0}")]
    Network(String),
    /// The body could not be decoded
    #[error("Invalid response: {0}")]
    Decode(String),
    /// The configured base URL is unusable
    #[error("Invalid API base url {0:?}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Whether the lookup answered "not found" rather than failing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// A second line telling the user what to do about the failure
    pub fn user_hint(&self) -> &'static str {
        match self {
            Self::NotFound(Resource::Celebrity) => "This person may not have EGOT-eligible awards in Wikidata.",
            Self::NotFound(_) => "Nothing is recorded for this yet.",
            _ => "Please check your connection and try again.",
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Read-only access to the EGOT API
#[allow(async_fn_in_trait)]
pub trait CelebrityApi {
    /// Look a celebrity up by display name, with their awards
    async fn search_celebrity(&self, name: &str) -> Result<Celebrity, ApiError>;

    /// Candidate matches for a partial name
    async fn autocomplete(&self, query: &str) -> Result<Vec<Suggestion>, ApiError>;

    /// Celebrities with exactly three of the four award types
    async fn close_to_egot(&self, limit: Option<usize>) -> Result<Vec<CelebrityWithProgress>, ApiError>;

    /// Celebrities with all four award types
    async fn egot_winners(&self, limit: Option<usize>) -> Result<Vec<CelebrityWithProgress>, ApiError>;

    /// Celebrities without any win
    async fn no_awards(&self, limit: Option<usize>) -> Result<Vec<CelebrityBasic>, ApiError>;

    /// A ceremony with its categories and nominees
    async fn oscar_ceremony(&self, year: i32) -> Result<OscarCeremony, ApiError>;

    /// Years with a recorded ceremony
    async fn oscar_years(&self) -> Result<Vec<i32>, ApiError>;
}

/// [`CelebrityApi`] over HTTP
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    /// Create a client for the API served at `base_url`, with a per-request `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = base_url.trim().trim_end_matches('/');
        match Url::parse(base) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ApiError::InvalidBaseUrl(base_url.to_string())),
        }
        let user_agent = format!("egot/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base: base.to_string(),
        })
    }

    /// Create a client from the api url and request timeout of `options`
    pub fn from_options(options: &EgotOptions) -> Result<Self, ApiError> {
        Self::new(&options.api_url, options.request_timeout())
    }

    /// The base url, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn search_url(&self, name: &str) -> String {
        format!("{}/api/celebrity/search?q={}", self.base, urlencoding::encode(name))
    }

    fn autocomplete_url(&self, query: &str) -> String {
        format!("{}/api/celebrity/autocomplete?q={}", self.base, urlencoding::encode(query))
    }

    fn listing_url(&self, listing: &str, limit: Option<usize>) -> String {
        match limit {
            Some(limit) => format!("{}/api/celebrity/{listing}?limit={limit}", self.base),
            None => format!("{}/api/celebrity/{listing}", self.base),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: Resource) -> Result<T, ApiError> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(resource));
        }
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        response.json::<T>().await.map_err(ApiError::from_reqwest)
    }

    /// Whether the API answers its health check
    pub async fn health(&self) -> Result<(), ApiError> {
        let url = format!("{}/health", self.base);
        let response = self.client.get(&url).send().await.map_err(ApiError::from_reqwest)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::Status(response.status().as_u16()))
        }
    }
}

impl CelebrityApi for HttpApi {
    async fn search_celebrity(&self, name: &str) -> Result<Celebrity, ApiError> {
        self.get_json(&self.search_url(name), Resource::Celebrity).await
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = self.autocomplete_url(query);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await.map_err(ApiError::from_reqwest)?;
        if !response.status().is_success() {
            debug!("autocomplete answered {}, no suggestions", response.status());
            return Ok(Vec::new());
        }
        response.json().await.map_err(ApiError::from_reqwest)
    }

    async fn close_to_egot(&self, limit: Option<usize>) -> Result<Vec<CelebrityWithProgress>, ApiError> {
        self.get_json(&self.listing_url("close-to-egot", limit), Resource::Other)
            .await
    }

    async fn egot_winners(&self, limit: Option<usize>) -> Result<Vec<CelebrityWithProgress>, ApiError> {
        self.get_json(&self.listing_url("egot-winners", limit), Resource::Other)
            .await
    }

    async fn no_awards(&self, limit: Option<usize>) -> Result<Vec<CelebrityBasic>, ApiError> {
        self.get_json(&self.listing_url("no-awards", limit), Resource::Other).await
    }

    async fn oscar_ceremony(&self, year: i32) -> Result<OscarCeremony, ApiError> {
        let url = format!("{}/api/oscar-race/{year}", self.base);
        self.get_json(&url, Resource::Ceremony).await
    }

    async fn oscar_years(&self) -> Result<Vec<i32>, ApiError> {
        let url = format!("{}/api/oscar-race/years", self.base);
        self.get_json(&url, Resource::Other).await
    }
}
