//! Cache-first seller search.
//!
//! The store is read first; the gateway is only called when the cached rows
//! are missing or stale. Steps run strictly one after another.

use crate::config::SearchConfig;
use crate::error::AppError;
use crate::freshness::{needs_refresh, platform_allows_live_fetch};
use crate::models::{SellerRecord, StoredSeller};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Read/write access to the `lojistas` table.
#[async_trait]
pub trait SellerStore: Send + Sync {
    /// Rows whose category contains `categoria` (case-insensitive), optionally
    /// restricted to one platform, ordered by seller name.
    async fn find_by_category(
        &self,
        categoria: &str,
        plataforma: Option<&str>,
    ) -> Result<Vec<StoredSeller>, AppError>;

    /// Inserts or updates every record. Returns the number of rows written.
    async fn upsert_many(&self, records: &[SellerRecord]) -> Result<u64, AppError>;
}

/// Something that can produce fresh seller records for a category.
#[async_trait]
pub trait SellerSource: Send + Sync {
    async fn search_sellers(&self, categoria: &str) -> Result<Vec<SellerRecord>, AppError>;
}

/// User input for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub categoria: String,
    pub plataforma: Option<String>,
}

impl SearchRequest {
    pub fn new(categoria: impl Into<String>) -> Self {
        Self {
            categoria: categoria.into(),
            plataforma: None,
        }
    }

    pub fn with_platform(mut self, plataforma: impl Into<String>) -> Self {
        self.plataforma = Some(plataforma.into());
        self
    }
}

/// Messages surfaced to the user after a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Sellers were found.
    Found(usize),
    /// Nothing matched.
    NoneFound,
    /// The gateway failed; cached rows (if any) are shown instead.
    RefreshFailed(String),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Found(1) => write!(f, "1 seller found"),
            Notice::Found(n) => write!(f, "{} sellers found", n),
            Notice::NoneFound => write!(f, "No sellers found for this category"),
            Notice::RefreshFailed(msg) => {
                write!(f, "Could not refresh from the search gateway: {}", msg)
            }
        }
    }
}

/// Where the rendered sellers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Cache,
    Gateway,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub sellers: Vec<SellerRecord>,
    pub source: ResultSource,
    pub notices: Vec<Notice>,
}

/// Runs one cache-first search.
///
/// Validation failures and store read failures abort with an error. Gateway
/// failures and upsert failures do not.
pub async fn run_search<S, G>(
    store: &S,
    source: &G,
    request: &SearchRequest,
    config: &SearchConfig,
    now: DateTime<Utc>,
) -> Result<SearchOutcome, AppError>
where
    S: SellerStore + ?Sized,
    G: SellerSource + ?Sized,
{
    let categoria = request.categoria.trim();
    if categoria.is_empty() {
        return Err(AppError::ValidationError(
            "Please enter a category to search".to_string(),
        ));
    }
    let plataforma = request
        .plataforma
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let cached = store.find_by_category(categoria, plataforma).await?;
    let decision = needs_refresh(
        cached.iter().map(|row| row.record.data_extracao),
        now,
        config.staleness_window,
    );
    info!(
        "Category '{}': {} cached sellers, {}",
        categoria,
        cached.len(),
        decision.describe()
    );

    let mut notices = Vec::new();
    let live_ok = platform_allows_live_fetch(plataforma, &config.live_platform);

    let (sellers, result_source) = if decision.needs_refresh && live_ok {
        match source.search_sellers(categoria).await {
            Ok(fresh) => {
                if !fresh.is_empty() {
                    match store.upsert_many(&fresh).await {
                        Ok(written) => info!("Saved {} sellers for '{}'", written, categoria),
                        Err(e) => error!("Failed to save sellers for '{}': {}", categoria, e),
                    }
                }
                (fresh, ResultSource::Gateway)
            }
            Err(e) => {
                warn!("Gateway refresh failed for '{}': {}", categoria, e);
                notices.push(Notice::RefreshFailed(e.to_string()));
                (into_records(cached), ResultSource::Cache)
            }
        }
    } else {
        (into_records(cached), ResultSource::Cache)
    };

    notices.push(if sellers.is_empty() {
        Notice::NoneFound
    } else {
        Notice::Found(sellers.len())
    });

    Ok(SearchOutcome {
        sellers,
        source: result_source,
        notices,
    })
}

fn into_records(rows: Vec<StoredSeller>) -> Vec<SellerRecord> {
    rows.into_iter().map(SellerRecord::from).collect()
}
