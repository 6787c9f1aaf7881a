use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Seller-level projection of a `lojistas` row.
///
/// This is the item type of the gateway's JSON response and the payload the
/// client upserts into the store. Field names follow the table columns.
///
/// # Examples
///
/// ```
/// use lojistas_core::SellerRecord;
///
/// let json = r#"{
///     "nome_loja": "Loja A",
///     "link": "https://loja-a.com.br",
///     "plataforma": "Loja A",
///     "categoria": "ração para cães",
///     "data_extracao": "2024-05-01T12:00:00Z"
/// }"#;
///
/// let record: SellerRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.nome_loja, "Loja A");
/// assert!(record.imagem.is_none());
/// assert!(record.is_complete());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SellerRecord {
    pub nome_loja: String,
    pub link: String,
    pub plataforma: String,
    pub categoria: String,
    pub data_extracao: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,
}

impl SellerRecord {
    /// Returns true when every required text field is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.nome_loja.trim().is_empty()
            && !self.link.trim().is_empty()
            && !self.plataforma.trim().is_empty()
            && !self.categoria.trim().is_empty()
    }
}

/// A row of the `lojistas` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StoredSeller {
    pub id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: SellerRecord,
}

impl From<StoredSeller> for SellerRecord {
    fn from(row: StoredSeller) -> Self {
        row.record
    }
}

/// One raw product entry from the shopping-search provider.
///
/// Only the fields the grouping reads are modelled; the provider sends many
/// more and they are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Listing {
    pub title: Option<String>,
    pub source: Option<String>,
    pub link: Option<String>,
    pub product_link: Option<String>,
    pub price: Option<String>,
    pub thumbnail: Option<String>,
}

/// Aggregate table statistics.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_sellers: i64,
    pub total_categories: i64,
    pub total_platforms: i64,
    pub last_extraction: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> SellerRecord {
        SellerRecord {
            nome_loja: "Loja A".to_string(),
            link: "https://loja-a.com.br".to_string(),
            plataforma: "Loja A".to_string(),
            categoria: "tênis".to_string(),
            data_extracao: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            imagem: None,
        }
    }

    #[test]
    fn test_record_serialization_omits_missing_image() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["nome_loja"], "Loja A");
        assert_eq!(json["data_extracao"], "2024-05-01T12:00:00Z");
        assert!(json.get("imagem").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_record_incomplete_when_link_blank() {
        let mut r = record();
        r.link = "  ".to_string();
        assert!(!r.is_complete());
    }

    #[test]
    fn test_stored_seller_flattens_record() {
        let row = StoredSeller {
            id: Uuid::nil(),
            record: record(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["categoria"], "tênis");

        let back: SellerRecord = row.into();
        assert_eq!(back, record());
    }

    #[test]
    fn test_listing_ignores_unknown_fields() {
        let json = r#"{
            "position": 1,
            "title": "Ração Premium 15kg",
            "source": "Petz",
            "price": "R$ 199,90",
            "extracted_price": 199.9
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.source.as_deref(), Some("Petz"));
        assert!(listing.link.is_none());
    }
}
