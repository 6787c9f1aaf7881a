use axum::{body::Bytes, extract::State, Json};
use chrono::{SubsecRound, Utc};
use lojistas_core::{complete_records, Listing, SellerGrouper, SellerRecord};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::AppState;

/// Number of raw listings echoed to the log per search.
const LOG_SAMPLE_SIZE: usize = 5;

#[derive(Deserialize)]
struct SearchSellersRequest {
    categoria: Option<String>,
}

/// Extracts a non-blank `categoria` from the request body. Bodies that are not
/// JSON objects count as missing.
fn parse_categoria(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<SearchSellersRequest>(body)
        .ok()?
        .categoria
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "lojistas-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `POST /api/search-sellers`
pub async fn search_sellers(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Vec<SellerRecord>>, ApiError> {
    let categoria = parse_categoria(&body).ok_or(ApiError::MissingCategory)?;

    info!("Starting seller search for category: {}", categoria);

    let listings = state.provider.search_listings(&categoria).await?;
    info!("Found {} listings", listings.len());
    log_sample(&listings);

    let extracted_at = Utc::now().trunc_subsecs(3);
    let groups = SellerGrouper::new(&categoria, extracted_at)
        .with_link_mode(state.link_mode)
        .group(&listings);

    for seller in &groups {
        debug!(
            seller = %seller.record.nome_loja,
            products = seller.total_products(),
            min_price = seller.min_price,
            max_price = seller.max_price,
            avg_price = seller.average_price(),
            "Seller aggregate"
        );
    }

    let records = complete_records(groups);

    info!(
        "Extraction finished - {} sellers found for '{}'",
        records.len(),
        categoria
    );

    Ok(Json(records))
}

fn log_sample(listings: &[Listing]) {
    for (i, item) in listings.iter().take(LOG_SAMPLE_SIZE).enumerate() {
        info!(
            index = i + 1,
            title = item.title.as_deref().unwrap_or("N/A"),
            price = item.price.as_deref().unwrap_or("N/A"),
            seller = item.source.as_deref().unwrap_or("N/A"),
            link = item.link.as_deref().unwrap_or("N/A"),
            "Sample listing"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categoria() {
        assert_eq!(
            parse_categoria(r#"{"categoria":" ração "}"#.as_bytes()).as_deref(),
            Some("ração")
        );
        assert!(parse_categoria(br#"{"categoria":"   "}"#).is_none());
        assert!(parse_categoria(br#"{"categoria":null}"#).is_none());
        assert!(parse_categoria(br#"{}"#).is_none());
        assert!(parse_categoria(b"").is_none());
        assert!(parse_categoria(b"not json").is_none());
    }
}
