//! Seller repository for PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lojistas_core::error::AppError;
use lojistas_core::models::{SellerRecord, StoreStats, StoredSeller};
use lojistas_core::SellerStore;
use sqlx::migrate::Migrator;
use sqlx::{PgPool, Pool, Postgres};

/// Column list for SELECT queries. Must remain a const literal to ensure SQL safety
/// since format!() bypasses sqlx compile-time validation.
const SELLER_COLUMNS: &str = "id, nome_loja, link, plataforma, categoria, data_extracao, imagem";

/// Default row cap for [`SellerRepository::list_all`].
const DEFAULT_LIST_LIMIT: i64 = 10_000;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Repository for the `lojistas` table.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use lojistas_db::SellerRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(5)
///     .connect("postgresql://localhost/lojistas")
///     .await?;
///
/// let repo = SellerRepository::new(pool);
/// repo.migrate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SellerRepository {
    pool: Pool<Postgres>,
}

impl SellerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(sqlx::Error::Migrate(Box::new(e))))
    }

    /// Inserts or updates one seller. Conflicts resolve on
    /// `(nome_loja, categoria)`; the existing row keeps its `id`.
    pub async fn upsert(&self, record: &SellerRecord) -> Result<StoredSeller, AppError> {
        let query = format!(
            r#"
            INSERT INTO lojistas (nome_loja, link, plataforma, categoria, data_extracao, imagem)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (nome_loja, categoria)
            DO UPDATE SET
                link = EXCLUDED.link,
                plataforma = EXCLUDED.plataforma,
                data_extracao = EXCLUDED.data_extracao,
                imagem = COALESCE(EXCLUDED.imagem, lojistas.imagem)
            RETURNING {}
            "#,
            SELLER_COLUMNS
        );

        let row = sqlx::query_as::<_, StoredSeller>(&query)
            .bind(&record.nome_loja)
            .bind(&record.link)
            .bind(&record.plataforma)
            .bind(&record.categoria)
            .bind(record.data_extracao)
            .bind(&record.imagem)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(row)
    }

    /// Upserts a batch inside one transaction. Returns the number of rows written.
    pub async fn upsert_all(&self, records: &[SellerRecord]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::DatabaseError)?;
        let mut written = 0;

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO lojistas (nome_loja, link, plataforma, categoria, data_extracao, imagem)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (nome_loja, categoria)
                DO UPDATE SET
                    link = EXCLUDED.link,
                    plataforma = EXCLUDED.plataforma,
                    data_extracao = EXCLUDED.data_extracao,
                    imagem = COALESCE(EXCLUDED.imagem, lojistas.imagem)
                "#,
            )
            .bind(&record.nome_loja)
            .bind(&record.link)
            .bind(&record.plataforma)
            .bind(&record.categoria)
            .bind(record.data_extracao)
            .bind(&record.imagem)
            .execute(&mut *tx)
            .await
            .map_err(AppError::DatabaseError)?;

            written += result.rows_affected();
        }

        tx.commit().await.map_err(AppError::DatabaseError)?;
        tracing::debug!("Upserted {} of {} sellers", written, records.len());
        Ok(written)
    }

    /// Rows whose category contains `categoria` (case-insensitive), optionally
    /// restricted to one platform, ordered by seller name.
    pub async fn find_by_category(
        &self,
        categoria: &str,
        plataforma: Option<&str>,
    ) -> Result<Vec<StoredSeller>, AppError> {
        let query = format!(
            r#"
            SELECT {}
            FROM lojistas
            WHERE strpos(lower(categoria), lower($1)) > 0
              AND ($2::text IS NULL OR lower(plataforma) = lower($2))
            ORDER BY nome_loja ASC
            "#,
            SELLER_COLUMNS
        );

        let rows = sqlx::query_as::<_, StoredSeller>(&query)
            .bind(categoria)
            .bind(plataforma)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rows)
    }

    /// Lists rows, newest extraction first, with optional category filter and limit.
    pub async fn list_all(
        &self,
        categoria: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<StoredSeller>, AppError> {
        let limit_val = list_limit(limit);

        let query = format!(
            r#"
            SELECT {}
            FROM lojistas
            WHERE ($1::text IS NULL OR strpos(lower(categoria), lower($1)) > 0)
            ORDER BY data_extracao DESC, nome_loja ASC
            LIMIT $2
            "#,
            SELLER_COLUMNS
        );

        let rows = sqlx::query_as::<_, StoredSeller>(&query)
            .bind(categoria)
            .bind(limit_val)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(rows)
    }

    /// Returns aggregated table statistics.
    pub async fn get_stats(&self) -> Result<StoreStats, AppError> {
        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) as total,
                COUNT(DISTINCT lower(categoria)) as categories,
                COUNT(DISTINCT plataforma) as platforms,
                MAX(data_extracao) as last_extraction
            FROM lojistas
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(StoreStats {
            total_sellers: row.total.unwrap_or(0),
            total_categories: row.categories.unwrap_or(0),
            total_platforms: row.platforms.unwrap_or(0),
            last_extraction: row.last_extraction,
        })
    }
}

#[async_trait]
impl SellerStore for SellerRepository {
    async fn find_by_category(
        &self,
        categoria: &str,
        plataforma: Option<&str>,
    ) -> Result<Vec<StoredSeller>, AppError> {
        SellerRepository::find_by_category(self, categoria, plataforma).await
    }

    async fn upsert_many(&self, records: &[SellerRecord]) -> Result<u64, AppError> {
        self.upsert_all(records).await
    }
}

/// Helper struct for deserializing stats query results
#[derive(sqlx::FromRow)]
struct StatsRow {
    total: Option<i64>,
    categories: Option<i64>,
    platforms: Option<i64>,
    last_extraction: Option<DateTime<Utc>>,
}

/// SQL `LIMIT` for `list_all`; values past `i64::MAX` saturate.
fn list_limit(limit: Option<usize>) -> i64 {
    limit
        .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
        .unwrap_or(DEFAULT_LIST_LIMIT)
}
