use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lojistas_cli::render::{
    csv_line, export_record, render_empty_state, render_page, CSV_HEADER,
};
use lojistas_cli::{Command, Config, ExportFormat, ViewArgs};
use lojistas_client::GatewayClient;
use lojistas_core::{
    load_client_settings, run_search, AppError, DbConfig, Notice, ResultsView, SearchConfig,
    SearchRequest, SellerRecord, SortDirection, SortState, StoredSeller,
};
use lojistas_db::SellerRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Setup logging (stderr to keep stdout clean for exports)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = Config::parse();
    let settings = load_client_settings(config.config.as_deref())?;

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(DbConfig::default().max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = SellerRepository::new(pool);
    repo.migrate().await?;

    let result = match config.command {
        Command::Search { categoria, view } => {
            let gateway = GatewayClient::new(&config.gateway_url)?;
            search(&repo, &gateway, &categoria, &view, &settings).await
        }
        Command::List { categoria, view } => list(&repo, &categoria, &view, &settings).await,
        Command::Export {
            format,
            categoria,
            limit,
        } => export(&repo, format, categoria.as_deref(), limit).await,
        Command::Stats => show_stats(&repo).await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {}\n", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

/// Cache-first search, refreshing from the gateway when needed
async fn search(
    repo: &SellerRepository,
    gateway: &GatewayClient,
    categoria: &str,
    view: &ViewArgs,
    settings: &SearchConfig,
) -> Result<(), AppError> {
    let mut request = SearchRequest::new(categoria);
    if let Some(platform) = &view.platform {
        request = request.with_platform(platform.clone());
    }

    let outcome = run_search(repo, gateway, &request, settings, Utc::now()).await?;

    for notice in &outcome.notices {
        match notice {
            Notice::RefreshFailed(_) => eprintln!("⚠️  {}", notice),
            _ => eprintln!("✓ {}", notice),
        }
    }

    print_results(outcome.sellers, view, settings);
    Ok(())
}

/// Cache-only lookup
async fn list(
    repo: &SellerRepository,
    categoria: &str,
    view: &ViewArgs,
    settings: &SearchConfig,
) -> Result<(), AppError> {
    let categoria = categoria.trim();
    if categoria.is_empty() {
        return Err(AppError::ValidationError(
            "Please enter a category to search".to_string(),
        ));
    }

    let rows = repo
        .find_by_category(categoria, view.platform.as_deref())
        .await?;
    let sellers: Vec<SellerRecord> = rows.into_iter().map(SellerRecord::from).collect();

    eprintln!(
        "✓ {}",
        if sellers.is_empty() {
            Notice::NoneFound
        } else {
            Notice::Found(sellers.len())
        }
    );
    print_results(sellers, view, settings);
    Ok(())
}

fn print_results(sellers: Vec<SellerRecord>, view: &ViewArgs, settings: &SearchConfig) {
    if sellers.is_empty() {
        print!("{}", render_empty_state());
        return;
    }

    let sort = SortState {
        field: view.sort.into(),
        direction: if view.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    };
    let mut results = ResultsView::new(sellers, sort, settings.page_size);
    results.go_to(view.page);
    print!("{}", render_page(&results.current_page()));
}

/// Show database statistics
async fn show_stats(repo: &SellerRepository) -> Result<(), AppError> {
    let stats = repo.get_stats().await?;

    println!("\n📊 Database Statistics\n");
    println!("  Total sellers:         {}", stats.total_sellers);
    println!("  Categories searched:   {}", stats.total_categories);
    println!("  Distinct platforms:    {}", stats.total_platforms);
    if let Some(last) = stats.last_extraction {
        println!("  Last extraction:       {}", last);
    }
    println!();

    Ok(())
}

/// Export stored sellers to various formats
async fn export(
    repo: &SellerRepository,
    format: ExportFormat,
    categoria: Option<&str>,
    limit: Option<usize>,
) -> Result<(), AppError> {
    info!("Exporting sellers...");

    let rows = repo.list_all(categoria, limit).await?;

    if rows.is_empty() {
        eprintln!("No sellers found to export.");
        return Ok(());
    }

    match format {
        ExportFormat::Jsonl => export_jsonl(&rows)?,
        ExportFormat::Json => export_json(&rows)?,
        ExportFormat::Csv => export_csv(&rows),
    }

    info!("Export complete: {} sellers", rows.len());
    Ok(())
}

fn export_jsonl(rows: &[StoredSeller]) -> Result<(), AppError> {
    for row in rows {
        println!("{}", serde_json::to_string(&export_record(row))?);
    }
    Ok(())
}

fn export_json(rows: &[StoredSeller]) -> Result<(), AppError> {
    let records: Vec<_> = rows.iter().map(export_record).collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

fn export_csv(rows: &[StoredSeller]) {
    println!("{}", CSV_HEADER);
    for row in rows {
        println!("{}", csv_line(row));
    }
}
