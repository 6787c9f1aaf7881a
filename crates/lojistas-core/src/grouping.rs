//! Seller grouping for raw shopping listings.
//!
//! A single linear scan builds an insertion-ordered map from seller name to
//! [`SellerAggregate`]. A seller is admitted only once one of its listings
//! carries a usable link; the first usable link wins.

use crate::models::{Listing, SellerRecord};
use crate::price::parse_price;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use url::Url;

/// How a listing link becomes the seller's `link`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkMode {
    /// Reduce to scheme + host + port, e.g. `https://loja.com.br`.
    #[default]
    Origin,
    /// Keep the listing URL as sent by the provider.
    Verbatim,
}

/// A product accumulated under a seller.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductEntry {
    pub title: String,
    pub price: f64,
    pub link: Option<String>,
}

/// Per-seller accumulator. The product list and price statistics are for
/// diagnostics; only [`SellerAggregate::record`] leaves the gateway.
#[derive(Debug, Clone)]
pub struct SellerAggregate {
    pub record: SellerRecord,
    pub products: Vec<ProductEntry>,
    pub min_price: f64,
    pub max_price: f64,
    price_sum: f64,
}

impl SellerAggregate {
    fn new(record: SellerRecord) -> Self {
        Self {
            record,
            products: Vec::new(),
            min_price: f64::INFINITY,
            max_price: f64::NEG_INFINITY,
            price_sum: 0.0,
        }
    }

    fn push(&mut self, listing: &Listing) {
        let price = parse_price(listing.price.as_deref());
        self.min_price = self.min_price.min(price);
        self.max_price = self.max_price.max(price);
        self.price_sum += price;
        self.products.push(ProductEntry {
            title: listing.title.clone().unwrap_or_else(|| "N/A".to_string()),
            price,
            link: listing.link.clone(),
        });
    }

    pub fn total_products(&self) -> usize {
        self.products.len()
    }

    pub fn average_price(&self) -> f64 {
        if self.products.is_empty() {
            0.0
        } else {
            self.price_sum / self.products.len() as f64
        }
    }
}

/// Projects aggregates to complete seller records, keeping admission order.
pub fn complete_records(aggregates: Vec<SellerAggregate>) -> Vec<SellerRecord> {
    aggregates
        .into_iter()
        .map(|aggregate| aggregate.record)
        .filter(SellerRecord::is_complete)
        .collect()
}

/// Groups listings by seller for one search.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use lojistas_core::grouping::SellerGrouper;
/// use lojistas_core::Listing;
///
/// let listings = vec![
///     Listing {
///         source: Some("Loja A".into()),
///         link: Some("https://loja-a.com.br/produto/1".into()),
///         ..Default::default()
///     },
///     Listing {
///         source: Some("Loja A".into()),
///         link: Some("https://outra.com/2".into()),
///         ..Default::default()
///     },
/// ];
///
/// let sellers = SellerGrouper::new("tênis", Utc::now()).group(&listings);
/// assert_eq!(sellers.len(), 1);
/// assert_eq!(sellers[0].record.link, "https://loja-a.com.br");
/// ```
pub struct SellerGrouper<'a> {
    categoria: &'a str,
    extracted_at: DateTime<Utc>,
    link_mode: LinkMode,
}

impl<'a> SellerGrouper<'a> {
    pub fn new(categoria: &'a str, extracted_at: DateTime<Utc>) -> Self {
        Self {
            categoria,
            extracted_at,
            link_mode: LinkMode::default(),
        }
    }

    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    /// Returns one aggregate per admitted seller, in admission order.
    pub fn group(&self, listings: &[Listing]) -> Vec<SellerAggregate> {
        let mut order: Vec<SellerAggregate> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for listing in listings {
            let Some(name) = listing.source.as_deref().map(str::trim).filter(|s| !s.is_empty())
            else {
                continue;
            };

            if let Some(&pos) = index.get(name) {
                order[pos].push(listing);
                continue;
            }

            // Not admitted until a listing with a usable link shows up.
            let Some(link) = self.candidate_link(listing) else {
                continue;
            };

            let mut aggregate = SellerAggregate::new(SellerRecord {
                nome_loja: name.to_string(),
                link,
                plataforma: name.to_string(),
                categoria: self.categoria.to_string(),
                data_extracao: self.extracted_at,
                imagem: listing.thumbnail.clone().filter(|t| !t.is_empty()),
            });
            aggregate.push(listing);
            index.insert(name, order.len());
            order.push(aggregate);
        }

        order
    }

    /// Groups and projects to the seller-level records the API returns.
    pub fn group_records(&self, listings: &[Listing]) -> Vec<SellerRecord> {
        complete_records(self.group(listings))
    }

    fn candidate_link(&self, listing: &Listing) -> Option<String> {
        [listing.link.as_deref(), listing.product_link.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|raw| usable_link(raw, self.link_mode))
    }
}

/// Returns the link in the requested form if `raw` is an absolute http(s)
/// URL with a host.
pub fn usable_link(raw: &str, mode: LinkMode) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(match mode {
        LinkMode::Origin => url.origin().ascii_serialization(),
        LinkMode::Verbatim => url.to_string(),
    })
}
