//! Best-effort normalization of Brazilian price strings.

/// Parses a localized price such as `"R$ 1.234,56"` into `1234.56`.
///
/// `R$` (and any whitespace after it) is removed, `.` thousand separators are
/// dropped and the first `,` becomes the decimal point. The longest leading
/// decimal number is then parsed, so trailing text is ignored. Empty input,
/// absent input and anything without a leading number yield `0.0`.
///
/// # Examples
///
/// ```
/// use lojistas_core::price::parse_price;
///
/// assert_eq!(parse_price(Some("R$ 1.234,56")), 1234.56);
/// assert_eq!(parse_price(Some("R$ 89,90 à vista")), 89.90);
/// assert_eq!(parse_price(Some("abc")), 0.0);
/// assert_eq!(parse_price(None), 0.0);
/// ```
pub fn parse_price(raw: Option<&str>) -> f64 {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return 0.0;
    };

    let mut cleaned = String::with_capacity(raw.len());
    let mut parts = raw.split("R$");
    if let Some(first) = parts.next() {
        cleaned.push_str(first);
    }
    for part in parts {
        cleaned.push_str(part.trim_start());
    }

    let cleaned = cleaned.replace('.', "").replacen(',', ".", 1);
    leading_number(cleaned.trim()).unwrap_or(0.0)
}

/// Parses the longest `[+-]digits[.digits]` prefix of `s`.
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end += 1;
        }
    }

    if !has_digits {
        return None;
    }

    s[..end].trim_end_matches('.').parse::<f64>().ok()
}
