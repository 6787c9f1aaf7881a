//! Lojistas Core - Domain types, seller grouping, error handling, and configuration.

pub mod config;
pub mod error;
pub mod flow;
pub mod freshness;
pub mod grouping;
pub mod models;
pub mod price;
pub mod results;

pub use config::{
    default_settings_path, load_client_settings, ClientSettings, DbConfig, HttpConfig,
    ProviderConfig, SearchConfig, LIVE_FETCH_PLATFORM,
};
pub use error::AppError;
pub use flow::{
    run_search, Notice, ResultSource, SearchOutcome, SearchRequest, SellerSource, SellerStore,
};
pub use freshness::{is_stale, needs_refresh, RefreshDecision, RefreshReason};
pub use grouping::{complete_records, LinkMode, SellerAggregate, SellerGrouper};
pub use models::{Listing, SellerRecord, StoreStats, StoredSeller};
pub use results::{
    page_count, paginate, sort_sellers, Page, ResultsView, SortDirection, SortField, SortState,
};
