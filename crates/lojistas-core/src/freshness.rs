//! Cache freshness decisions for the search flow.
//!
//! Pure logic: given the rows already stored for a category, decide whether
//! the gateway has to be asked again. Stale rows are never deleted here.

use chrono::{DateTime, Duration, Utc};

/// Why a refresh was (or was not) requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    /// No stored rows matched the category.
    Empty,
    /// At least one stored row is older than the staleness window.
    Stale,
    /// Every stored row is inside the window.
    Fresh,
}

/// Result of checking stored rows against the staleness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDecision {
    pub needs_refresh: bool,
    pub reason: RefreshReason,
}

impl RefreshDecision {
    /// Human-readable reason, used in logs.
    pub fn describe(&self) -> &'static str {
        match self.reason {
            RefreshReason::Empty => "no cached sellers",
            RefreshReason::Stale => "cached sellers older than staleness window",
            RefreshReason::Fresh => "cached sellers are fresh",
        }
    }
}

/// True when `extracted_at` is strictly older than `window` at `now`.
/// Timestamps in the future are never stale.
pub fn is_stale(extracted_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now.signed_duration_since(extracted_at) > window
}

/// Decides whether the rows for a category must be refreshed.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use lojistas_core::freshness::{needs_refresh, RefreshReason};
///
/// let now = Utc::now();
/// let decision = needs_refresh(std::iter::empty(), now, Duration::hours(24));
/// assert!(decision.needs_refresh);
/// assert_eq!(decision.reason, RefreshReason::Empty);
///
/// let decision = needs_refresh([now - Duration::hours(1)], now, Duration::hours(24));
/// assert!(!decision.needs_refresh);
/// ```
pub fn needs_refresh<I>(timestamps: I, now: DateTime<Utc>, window: Duration) -> RefreshDecision
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut seen_any = false;
    for ts in timestamps {
        seen_any = true;
        if is_stale(ts, now, window) {
            return RefreshDecision {
                needs_refresh: true,
                reason: RefreshReason::Stale,
            };
        }
    }

    if seen_any {
        RefreshDecision {
            needs_refresh: false,
            reason: RefreshReason::Fresh,
        }
    } else {
        RefreshDecision {
            needs_refresh: true,
            reason: RefreshReason::Empty,
        }
    }
}

/// Only an absent platform filter, or one naming the live platform, can be
/// served by the gateway.
pub fn platform_allows_live_fetch(filter: Option<&str>, live_platform: &str) -> bool {
    match filter.map(str::trim).filter(|p| !p.is_empty()) {
        None => true,
        Some(platform) => platform.to_lowercase() == live_platform.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_is_stale_boundary() {
        let window = Duration::hours(24);
        assert!(!is_stale(now() - Duration::hours(24), now(), window));
        assert!(is_stale(
            now() - Duration::hours(24) - Duration::seconds(1),
            now(),
            window
        ));
        assert!(!is_stale(now() + Duration::hours(3), now(), window));
    }

    #[test]
    fn test_needs_refresh_empty() {
        let decision = needs_refresh(Vec::new(), now(), Duration::hours(24));
        assert!(decision.needs_refresh);
        assert_eq!(decision.reason, RefreshReason::Empty);
        assert_eq!(decision.describe(), "no cached sellers");
    }

    #[test]
    fn test_needs_refresh_any_stale_row() {
        let rows = vec![now() - Duration::hours(2), now() - Duration::days(3)];
        let decision = needs_refresh(rows, now(), Duration::hours(24));
        assert!(decision.needs_refresh);
        assert_eq!(decision.reason, RefreshReason::Stale);
    }

    #[test]
    fn test_needs_refresh_all_fresh() {
        let rows = vec![now() - Duration::hours(2), now() - Duration::hours(23)];
        let decision = needs_refresh(rows, now(), Duration::hours(24));
        assert!(!decision.needs_refresh);
        assert_eq!(decision.reason, RefreshReason::Fresh);
    }

    #[test]
    fn test_platform_filter_compatibility() {
        assert!(platform_allows_live_fetch(None, "Google Shopping"));
        assert!(platform_allows_live_fetch(Some(" "), "Google Shopping"));
        assert!(platform_allows_live_fetch(
            Some("google shopping"),
            "Google Shopping"
        ));
        assert!(!platform_allows_live_fetch(Some("Shopee"), "Google Shopping"));
    }
}
