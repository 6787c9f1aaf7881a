//! Lojistas Client - HTTP clients for external APIs
//!
//! - [`serpapi`] - SerpAPI Google Shopping search (used by the gateway)
//! - [`gateway`] - the Lojistas search gateway (used by the CLI)

pub mod gateway;
pub mod serpapi;

pub use gateway::GatewayClient;
pub use serpapi::{ListingProvider, SerpApiClient, DEFAULT_SERPAPI_URL};
