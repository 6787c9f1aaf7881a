//! Sorting and client-side pagination of seller results.

use crate::models::SellerRecord;
use std::cmp::Ordering;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Column the result list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    NomeLoja,
    Plataforma,
    DataExtracao,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current sort selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::NomeLoja,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// Re-selecting the current field flips the direction; a new field
    /// starts ascending.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field;
            self.direction = SortDirection::Asc;
        }
    }

    fn compare(&self, a: &SellerRecord, b: &SellerRecord) -> Ordering {
        let ord = match self.field {
            SortField::NomeLoja => text_cmp(&a.nome_loja, &b.nome_loja),
            SortField::Plataforma => text_cmp(&a.plataforma, &b.plataforma),
            SortField::DataExtracao => a.data_extracao.cmp(&b.data_extracao),
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Primary collation key: canonical decomposition with combining marks
/// dropped, then lowercased. `"Época"` and `"epoca"` share a key.
fn base_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// pt-BR style ordering: base letters first, then accents, then case, with
/// the raw strings as final tie-break. `"Óticas"` sorts between `"Fast Shop"`
/// and `"Zattini"`, and `"loja b"` between `"Loja A"` and `"Loja C"`.
fn text_cmp(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Sorts in place. Stable, so equal keys keep their incoming order.
pub fn sort_sellers(sellers: &mut [SellerRecord], sort: SortState) {
    sellers.sort_by(|a, b| sort.compare(a, b));
}

/// Number of pages needed for `len` items; zero items still make one page.
pub fn page_count(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// A 1-based page over a slice.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Returns page `number` (1-based), clamped to `[1, last]`.
///
/// # Examples
///
/// ```
/// use lojistas_core::results::paginate;
///
/// let items: Vec<u32> = (0..13).collect();
/// let last = paginate(&items, 99, 6);
/// assert_eq!(last.number, 3);
/// assert_eq!(last.items, &[12]);
/// ```
pub fn paginate<T>(items: &[T], number: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = page_count(items.len(), page_size);
    let number = number.clamp(1, total_pages);
    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages,
        total_items: items.len(),
    }
}

/// In-memory result list with its sort selection and current page.
///
/// Changing the sort keeps the current page (re-clamped), it does not jump
/// back to the first one.
#[derive(Debug, Clone)]
pub struct ResultsView {
    sellers: Vec<SellerRecord>,
    sort: SortState,
    page: usize,
    page_size: usize,
}

impl ResultsView {
    pub fn new(mut sellers: Vec<SellerRecord>, sort: SortState, page_size: usize) -> Self {
        sort_sellers(&mut sellers, sort);
        Self {
            sellers,
            sort,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.sellers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sellers.is_empty()
    }

    pub fn select_sort(&mut self, field: SortField) {
        self.sort.select(field);
        sort_sellers(&mut self.sellers, self.sort);
        self.go_to(self.page);
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, page_count(self.sellers.len(), self.page_size));
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    pub fn current_page(&self) -> Page<'_, SellerRecord> {
        paginate(&self.sellers, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn seller(name: &str, plataforma: &str, ts: DateTime<Utc>) -> SellerRecord {
        SellerRecord {
            nome_loja: name.to_string(),
            link: format!("https://{}.com", name.to_lowercase().replace(' ', "")),
            plataforma: plataforma.to_string(),
            categoria: "cat".to_string(),
            data_extracao: ts,
            imagem: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    fn names(sellers: &[SellerRecord]) -> Vec<&str> {
        sellers.iter().map(|s| s.nome_loja.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_descending() {
        let t1 = t0();
        let t2 = t0() + Duration::hours(1);
        let t3 = t0() + Duration::hours(2);
        let mut sellers = vec![seller("b", "p", t2), seller("a", "p", t1), seller("c", "p", t3)];

        sort_sellers(
            &mut sellers,
            SortState {
                field: SortField::DataExtracao,
                direction: SortDirection::Desc,
            },
        );

        let stamps: Vec<_> = sellers.iter().map(|s| s.data_extracao).collect();
        assert_eq!(stamps, vec![t3, t2, t1]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut sellers = vec![
            seller("Loja C", "p", t0()),
            seller("loja b", "p", t0()),
            seller("Loja A", "p", t0()),
        ];
        sort_sellers(&mut sellers, SortState::default());
        assert_eq!(names(&sellers), vec!["Loja A", "loja b", "Loja C"]);
    }

    #[test]
    fn test_sort_by_name_with_accents() {
        let mut sellers: Vec<_> = [
            "Zattini",
            "Época Cosméticos",
            "Óticas Carol",
            "Americanas",
            "Fast Shop",
        ]
        .iter()
        .map(|name| seller(name, "p", t0()))
        .collect();

        sort_sellers(&mut sellers, SortState::default());
        assert_eq!(
            names(&sellers),
            vec![
                "Americanas",
                "Época Cosméticos",
                "Fast Shop",
                "Óticas Carol",
                "Zattini"
            ]
        );
    }

    #[test]
    fn test_accent_breaks_ties_after_base_letters() {
        assert_eq!(text_cmp("Pao", "Pão"), Ordering::Less);
        assert_eq!(text_cmp("Pão", "Paz"), Ordering::Less);
        assert_eq!(text_cmp("época", "Época"), Ordering::Greater);
        assert_eq!(text_cmp("Ótica", "Ótica"), Ordering::Equal);
    }

    #[test]
    fn test_sort_by_platform_with_accents() {
        let mut sellers = vec![
            seller("x", "Zoom", t0()),
            seller("y", "Éxito", t0()),
            seller("z", "Dafiti", t0()),
        ];
        let sort = SortState {
            field: SortField::Plataforma,
            direction: SortDirection::Asc,
        };
        sort_sellers(&mut sellers, sort);
        let platforms: Vec<_> = sellers.iter().map(|s| s.plataforma.as_str()).collect();
        assert_eq!(platforms, vec!["Dafiti", "Éxito", "Zoom"]);
    }

    #[test]
    fn test_sort_by_platform() {
        let mut sellers = vec![
            seller("x", "Shopee", t0()),
            seller("y", "Amazon", t0()),
            seller("z", "mercado livre", t0()),
        ];
        sort_sellers(
            &mut sellers,
            SortState {
                field: SortField::Plataforma,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(names(&sellers), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_select_toggles_then_resets() {
        let mut sort = SortState::default();
        sort.select(SortField::NomeLoja);
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.select(SortField::DataExtracao);
        assert_eq!(sort.field, SortField::DataExtracao);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_pagination_sizes() {
        let items: Vec<u32> = (0..13).collect();
        assert_eq!(page_count(items.len(), 6), 3);

        let sizes: Vec<usize> = (1..=3).map(|n| paginate(&items, n, 6).items.len()).collect();
        assert_eq!(sizes, vec![6, 6, 1]);
    }

    #[test]
    fn test_pagination_clamps_out_of_range() {
        let items: Vec<u32> = (0..13).collect();

        let first = paginate(&items, 0, 6);
        assert_eq!(first.number, 1);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = paginate(&items, 4, 6);
        assert_eq!(last.number, 3);
        assert_eq!(last.items, &[12]);
        assert!(!last.has_next());
    }

    #[test]
    fn test_pagination_empty() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 6);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_view_keeps_page_on_resort() {
        let sellers: Vec<_> = (0..13)
            .map(|i| seller(&format!("loja {:02}", i), "p", t0() + Duration::minutes(i)))
            .collect();
        let mut view = ResultsView::new(sellers, SortState::default(), 6);

        view.next_page();
        view.next_page();
        view.next_page();
        assert_eq!(view.current_page().number, 3);

        view.select_sort(SortField::NomeLoja);
        assert_eq!(view.sort().direction, SortDirection::Desc);
        assert_eq!(view.current_page().number, 3);
        assert_eq!(names(view.current_page().items), vec!["loja 00"]);

        view.previous_page();
        assert_eq!(view.current_page().number, 2);
        view.go_to(0);
        assert_eq!(view.current_page().number, 1);
    }
}
