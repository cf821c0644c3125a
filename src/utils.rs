use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Normalizes a postcode typed by the user.
///
/// Surrounding whitespace is dropped, inner runs of whitespace collapse to a
/// single space and letters are uppercased, so `" sw1a   1aa "` and
/// `"SW1A 1AA"` file into the same directory. Returns `None` if nothing is left.
pub fn normalize_postcode(input: &str) -> Option<String> {
    let normalized = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}
