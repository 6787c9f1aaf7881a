//! Terminal rendering of seller cards and export formats.

use chrono::{DateTime, Utc};
use lojistas_core::{Page, SellerRecord, StoredSeller};
use std::fmt::Write;

/// `dd/mm/yyyy HH:MM`, the pt-BR short date-time form.
pub fn format_date(ts: &DateTime<Utc>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

/// `1 lojista` / `N lojistas`.
pub fn count_label(n: usize) -> String {
    format!("{} lojista{}", n, if n == 1 { "" } else { "s" })
}

fn render_card(out: &mut String, seller: &SellerRecord) {
    let _ = writeln!(out, "┌ {}", seller.nome_loja);
    let _ = writeln!(out, "│ 🔗 {}", seller.link);
    let _ = writeln!(out, "│ 🏷  {}", seller.categoria);
    let _ = writeln!(
        out,
        "└ [{}]  📅 {}",
        seller.plataforma,
        format_date(&seller.data_extracao)
    );
}

/// Categories offered as starting points when a search comes back empty.
pub const SUGGESTED_CATEGORIES: [&str; 8] = [
    "pet",
    "moda fitness",
    "suplementos",
    "eletrônicos",
    "casa e jardim",
    "beleza",
    "esportes",
    "infantil",
];

/// Empty-state hints shown instead of cards.
pub fn render_empty_state() -> String {
    let mut out = String::from("\n🔍 No sellers found.\n\nTry:\n");
    out.push_str("  • A broader category (e.g. \"tênis\" instead of \"tênis de corrida azul\")\n");
    out.push_str("  • Checking the spelling\n");
    let _ = writeln!(out, "  • One of: {}", SUGGESTED_CATEGORIES.join(", "));
    out
}

/// Renders one page of cards with a header and a pager footer.
pub fn render_page(page: &Page<'_, SellerRecord>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nResults ({})\n", count_label(page.total_items));

    for seller in page.items {
        render_card(&mut out, seller);
        out.push('\n');
    }

    let prev = if page.has_previous() { "‹ prev" } else { "      " };
    let next = if page.has_next() { "next ›" } else { "" };
    let _ = writeln!(
        out,
        "{}  page {} of {}  {}",
        prev, page.number, page.total_pages, next
    );
    out
}

/// Export record; `imagem` is kept even when null so every line has the same keys.
pub fn export_record(row: &StoredSeller) -> serde_json::Value {
    serde_json::json!({
        "id": row.id,
        "nome_loja": row.record.nome_loja,
        "link": row.record.link,
        "plataforma": row.record.plataforma,
        "categoria": row.record.categoria,
        "data_extracao": row.record.data_extracao,
        "imagem": row.record.imagem,
    })
}

pub const CSV_HEADER: &str = "id,nome_loja,link,plataforma,categoria,data_extracao,imagem";

pub fn csv_line(row: &StoredSeller) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        row.id,
        escape_csv(&row.record.nome_loja),
        escape_csv(&row.record.link),
        escape_csv(&row.record.plataforma),
        escape_csv(&row.record.categoria),
        row.record.data_extracao.format("%Y-%m-%dT%H:%M:%SZ"),
        row.record
            .imagem
            .as_deref()
            .map(escape_csv)
            .unwrap_or_default(),
    )
}

/// Escape a string for CSV output
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
