use async_trait::async_trait;
use lojistas_core::error::AppError;
use lojistas_core::{HttpConfig, Listing, ProviderConfig};
use reqwest::{Client, Url};
use serde::Deserialize;

/// Default SerpAPI endpoint host.
pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com";

/// Source of raw shopping listings for a query.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    async fn search_listings(&self, query: &str) -> Result<Vec<Listing>, AppError>;
}

/// Response body of SerpAPI's `search.json`.
///
/// SerpAPI reference: <https://serpapi.com/google-shopping-api>
///
/// Only `shopping_results` and `error` matter here. A missing
/// `shopping_results` array means the search failed, even with HTTP 200.
#[derive(Deserialize, Debug, Default)]
struct SerpApiResponse {
    shopping_results: Option<Vec<Listing>>,
    error: Option<String>,
}

/// HTTP client for SerpAPI's Google Shopping engine.
///
/// Every request uses the fixed Brazilian locale from [`ProviderConfig`].
///
/// # Examples
///
/// ```no_run
/// use lojistas_client::{ListingProvider, SerpApiClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SerpApiClient::new("your-api-key", "https://serpapi.com")?;
/// let listings = client.search_listings("cafeteira elétrica").await?;
/// println!("Found {} listings", listings.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    base_url: Url,
    api_key: String,
    provider: ProviderConfig,
    timeout_secs: u64,
}

impl SerpApiClient {
    /// Creates a new SerpAPI client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if `base_url_str` is not a valid URL.
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(api_key: &str, base_url_str: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url_str)
            .map_err(|_| AppError::InvalidUrl(base_url_str.to_string()))?;

        let http = HttpConfig::default();
        let client = Client::builder()
            .user_agent("Lojistas/0.1 (seller-extraction)")
            .timeout(http.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            provider: ProviderConfig::default(),
            timeout_secs: http.timeout.as_secs(),
        })
    }

    /// Builds the `search.json` URL for `query`, API key included.
    fn search_url(&self, query: &str) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join("search.json")
            .map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        let num = self.provider.num.to_string();
        url.query_pairs_mut()
            .append_pair("engine", self.provider.engine)
            .append_pair("q", query)
            .append_pair("location", self.provider.location)
            .append_pair("google_domain", self.provider.google_domain)
            .append_pair("gl", self.provider.gl)
            .append_pair("hl", self.provider.hl)
            .append_pair("num", &num)
            .append_pair("api_key", &self.api_key);

        Ok(url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            AppError::NetworkError(format!("Connection failed: {}", e))
        } else {
            AppError::ClientError(e.to_string())
        }
    }
}

#[async_trait]
impl ListingProvider for SerpApiClient {
    /// Runs one Google Shopping search. Never retried.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProviderError` on a non-success HTTP status, carrying
    /// the status and SerpAPI's `error` message when present.
    /// Returns `AppError::SerializationError` when a success body does not parse.
    /// Returns `AppError::NoListings` when the body has no `shopping_results`.
    async fn search_listings(&self, query: &str) -> Result<Vec<Listing>, AppError> {
        let url = self.search_url(query)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            // Error bodies are not always JSON
            let parsed: SerpApiResponse = serde_json::from_str(&body).unwrap_or_default();
            return Err(AppError::ProviderError {
                status: Some(status.as_u16()),
                message: parsed
                    .error
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            });
        }

        let parsed: SerpApiResponse = serde_json::from_str(&body)?;

        match parsed.shopping_results {
            Some(listings) => Ok(listings),
            None => {
                tracing::error!("Provider response without shopping_results: {}", body);
                Err(AppError::NoListings(parsed.error))
            }
        }
    }
}
