use async_trait::async_trait;
use lojistas_core::error::AppError;
use lojistas_core::{HttpConfig, SellerRecord, SellerSource};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SearchBody<'a> {
    categoria: &'a str,
}

/// Error body returned by the gateway on failure.
#[derive(Deserialize, Default)]
struct GatewayError {
    error: Option<String>,
    details: Option<String>,
}

/// HTTP client for `lojistas-gateway`.
///
/// # Examples
///
/// ```no_run
/// use lojistas_client::GatewayClient;
/// use lojistas_core::SellerSource;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = GatewayClient::new("http://localhost:3000")?;
/// let sellers = gateway.search_sellers("tênis de corrida").await?;
/// println!("{} sellers", sellers.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Url,
}

impl GatewayClient {
    pub fn new(base_url_str: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url_str)
            .map_err(|_| AppError::InvalidUrl(base_url_str.to_string()))?;

        let client = Client::builder()
            .timeout(HttpConfig::default().timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SellerSource for GatewayClient {
    /// Calls `POST /api/search-sellers`.
    ///
    /// A failed response becomes `AppError::ClientError` holding the
    /// gateway's `details` (or `error`) text, falling back to the status.
    async fn search_sellers(&self, categoria: &str) -> Result<Vec<SellerRecord>, AppError> {
        let url = self
            .base_url
            .join("api/search-sellers")
            .map_err(|e| AppError::InvalidUrl(e.to_string()))?;

        tracing::info!("Requesting sellers for category: {}", categoria);

        let response = self
            .client
            .post(url)
            .json(&SearchBody { categoria })
            .send()
            .await
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: GatewayError = response.json().await.unwrap_or_default();
            return Err(AppError::ClientError(
                body.details
                    .or(body.error)
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())),
            ));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::ClientError(format!("Failed to parse response: {}", e)))?;

        if !value.is_array() {
            return Err(AppError::ClientError(
                "Invalid response format: expected an array".to_string(),
            ));
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_search_sellers_parses_array() {
        let app = Router::new().route(
            "/api/search-sellers",
            post(|Json(body): Json<serde_json::Value>| async move {
                Json(serde_json::json!([{
                    "nome_loja": "Petz",
                    "link": "https://www.petz.com.br",
                    "plataforma": "Petz",
                    "categoria": body["categoria"],
                    "data_extracao": "2024-05-01T12:00:00.000Z"
                }]))
            }),
        );
        let base = spawn(app).await;

        let gateway = GatewayClient::new(&base).unwrap();
        let sellers = gateway.search_sellers("ração").await.unwrap();
        assert_eq!(sellers.len(), 1);
        assert_eq!(sellers[0].categoria, "ração");
        assert_eq!(
            sellers[0].data_extracao,
            chrono::DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap()
        );
    }

    #[tokio::test]
    async fn test_error_details_surface() {
        let app = Router::new().route(
            "/api/search-sellers",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": "Failed to search sellers",
                        "details": "No results found",
                        "timestamp": "2024-05-01T12:00:00Z"
                    })),
                )
            }),
        );
        let base = spawn(app).await;

        let gateway = GatewayClient::new(&base).unwrap();
        let err = gateway.search_sellers("x").await.unwrap_err();
        assert_eq!(err.to_string(), "API Client error: No results found");
    }

    #[tokio::test]
    async fn test_error_without_body_uses_status() {
        let app = Router::new().route(
            "/api/search-sellers",
            post(|| async { StatusCode::BAD_GATEWAY }),
        );
        let base = spawn(app).await;

        let gateway = GatewayClient::new(&base).unwrap();
        let err = gateway.search_sellers("x").await.unwrap_err();
        assert_eq!(err.to_string(), "API Client error: HTTP error! status: 502");
    }

    #[tokio::test]
    async fn test_non_array_response_rejected() {
        let app = Router::new().route(
            "/api/search-sellers",
            post(|| async { Json(serde_json::json!({"sellers": []})) }),
        );
        let base = spawn(app).await;

        let gateway = GatewayClient::new(&base).unwrap();
        let err = gateway.search_sellers("x").await.unwrap_err();
        assert!(err.to_string().contains("Invalid response format"));
    }
}
