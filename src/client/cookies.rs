//! Cookie string helpers
//!
//! The stored credential keeps cookies as a single `name=value; name2=value2`
//! string. Comparison always happens on the canonical form: pairs sorted by
//! name and joined with `"; "`.

/// Split a cookie header string into `(name, value)` pairs.
///
/// Segments without `=` or with an empty name are skipped.
pub fn parse_cookie_pairs(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|segment| {
            let (name, value) = segment.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Canonical form of a cookie header string
pub fn canonical_cookie(header: &str) -> String {
    let mut pairs = parse_cookie_pairs(header);
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}
