/// Reads a `season` query value. Blank or non-numeric input falls back to
/// `fallback` rather than rejecting the request.
pub fn parse_season(raw: Option<&str>, fallback: i32) -> i32 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|year| (1900..=9999).contains(year))
        .unwrap_or(fallback)
}

/// `current` and the `back` years before it, newest first.
pub fn recent_seasons(current: i32, back: i32) -> Vec<i32> {
    (0..=back).map(|i| current - i).collect()
}
