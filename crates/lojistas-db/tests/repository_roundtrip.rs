//! Integration tests against a live PostgreSQL.
//!
//! Skipped unless `DATABASE_URL` points at a disposable database.

use chrono::{TimeZone, Utc};
use lojistas_core::{SellerRecord, SellerStore};
use lojistas_db::SellerRepository;
use sqlx::postgres::PgPoolOptions;

async fn repo() -> Option<SellerRepository> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to DATABASE_URL");
    let repo = SellerRepository::new(pool);
    repo.migrate().await.expect("Failed to run migrations");
    Some(repo)
}

fn unique_category(tag: &str) -> String {
    format!("Categoria Teste {} {}", tag, uuid::Uuid::new_v4())
}

fn record(name: &str, categoria: &str) -> SellerRecord {
    SellerRecord {
        nome_loja: name.to_string(),
        link: "https://loja-teste.com.br".to_string(),
        plataforma: name.to_string(),
        categoria: categoria.to_string(),
        data_extracao: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        imagem: Some("https://img.loja-teste.com.br/1.jpg".to_string()),
    }
}

#[tokio::test]
async fn test_upsert_then_query_by_substring_roundtrip() {
    let Some(repo) = repo().await else {
        return;
    };
    let categoria = unique_category("roundtrip");
    let original = record("Loja Round Trip", &categoria);

    let stored = repo.upsert(&original).await.unwrap();
    assert_eq!(stored.record, original);

    let needle = categoria.to_uppercase();
    let rows = repo.find_by_category(&needle, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, stored.id);
    assert_eq!(rows[0].record, original);
}

#[tokio::test]
async fn test_resubmission_updates_in_place() {
    let Some(repo) = repo().await else {
        return;
    };
    let categoria = unique_category("upsert");
    let first = record("Loja Upsert", &categoria);
    let first_id = repo.upsert(&first).await.unwrap().id;

    let mut second = first.clone();
    second.link = "https://nova-loja.com.br".to_string();
    second.data_extracao = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let written = repo.upsert_many(&[second.clone()]).await.unwrap();
    assert_eq!(written, 1);

    let rows = repo.find_by_category(&categoria, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, first_id);
    assert_eq!(rows[0].record, second);
}

#[tokio::test]
async fn test_platform_filter_and_ordering() {
    let Some(repo) = repo().await else {
        return;
    };
    let categoria = unique_category("order");
    repo.upsert_all(&[
        record("Zeta", &categoria),
        record("Alfa", &categoria),
        record("Meio", &categoria),
    ])
    .await
    .unwrap();

    let rows = repo.find_by_category(&categoria, None).await.unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.record.nome_loja.as_str()).collect();
    assert_eq!(names, vec!["Alfa", "Meio", "Zeta"]);

    let rows = repo.find_by_category(&categoria, Some("meio")).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.nome_loja, "Meio");
}
