//! Response normalization helpers.
//!
//! Pure functions shared by the adapters, the reconciler and the
//! synchronizer: similarity scoring, format classification, duration parsing
//! and track id derivation.

use super::domain::{ReleaseFormat, ReleaseType, Track};

/// Placeholder image for artists without a picture.
pub const DEFAULT_ARTIST_IMAGE: &str = "interfaces/default/images/icon_mic.png";

/// Value used when the catalog omits a country or format.
pub const UNKNOWN: &str = "Unknown";

/// Similarity of two names as a percentage (0-100).
///
/// Edit-distance ratio over the combined length, where a substitution costs
/// two edits. Case is significant.
pub fn similarity(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let distance = indel_distance(&a, &b);
    let ratio = (total - distance) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

/// Levenshtein distance with substitution weighted as delete + insert.
fn indel_distance(a: &[char], b: &[char]) -> usize {
    let n = b.len();
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 2 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Classify a set of format strings into the release-type taxonomy.
///
/// Taxonomy terms are tried in [`ReleaseType::MATCH_ORDER`]; the first one
/// found (case-insensitive substring) in any format string wins, so the
/// result doesn't depend on the order of `formats`.
pub fn classify_formats<S: AsRef<str>>(formats: &[S]) -> ReleaseType {
    let lowered: Vec<String> = formats.iter().map(|f| f.as_ref().to_lowercase()).collect();

    ReleaseType::MATCH_ORDER
        .into_iter()
        .find(|kind| {
            let term = kind.as_str().to_lowercase();
            lowered.iter().any(|format| format.contains(&term))
        })
        .unwrap_or(ReleaseType::Other)
}

/// Parse "H:MM:SS", "MM:SS" or "SS" into seconds.
///
/// Empty input has no duration (not zero). Malformed components, more than
/// three of them, or a total that doesn't fit in `u32` also yield `None`.
pub fn parse_duration(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut seconds = 0u32;
    for (part, multiplier) in parts.iter().rev().zip([1u32, 60, 3600]) {
        let part = part.trim();
        let value: u32 = if part.is_empty() { 0 } else { part.parse().ok()? };
        seconds = seconds.checked_add(value.checked_mul(multiplier)?)?;
    }
    Some(seconds)
}

/// Stable track id: release id plus the MD5 of the UTF-8 title.
pub fn track_id(title: &str, release_id: &str) -> String {
    format!("{}-{:x}", release_id, md5::compute(title.as_bytes()))
}

/// Number tracks 1..N in source order and derive their ids and durations.
///
/// `source` yields `(title, duration)` pairs; a duration is parsed only when
/// the source track exposes one.
pub fn build_tracks<'a, I>(release_id: &str, source: I) -> Vec<Track>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    source
        .into_iter()
        .enumerate()
        .map(|(index, (title, duration))| Track {
            number: index as u32 + 1,
            title: title.to_string(),
            id: track_id(title, release_id),
            duration: duration.and_then(parse_duration),
        })
        .collect()
}

/// Join formats in first-seen order with their counts: `"2xCD + Vinyl"`.
pub fn format_summary<S: AsRef<str>>(formats: &[S]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for format in formats {
        let format = format.as_ref();
        match counts.iter_mut().find(|(seen, _)| *seen == format) {
            Some((_, count)) => *count += 1,
            None => counts.push((format, 1)),
        }
    }

    counts
        .into_iter()
        .map(|(format, count)| {
            if count > 1 {
                format!("{}x{}", count, format)
            } else {
                format.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Describe release formats for storage: `"(LP, Album), (CD)"`.
///
/// A format without descriptions falls back to its name.
pub fn describe_formats(formats: &[ReleaseFormat]) -> String {
    if formats.is_empty() {
        return UNKNOWN.to_string();
    }

    formats
        .iter()
        .map(|format| {
            if format.descriptions.is_empty() {
                format!("({})", format.name)
            } else {
                format!("({})", format.descriptions.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a release search title `"Artist - Title"` into its parts.
///
/// Titles without a separator have no artist part.
pub fn split_search_title(title: &str) -> (Option<&str>, &str) {
    match title.split_once(" - ") {
        Some((artist, release)) => (Some(artist.trim()), release.trim()),
        None => (None, title.trim()),
    }
}

/// Country as stored: missing or blank becomes "Unknown".
pub fn country_or_unknown(country: Option<&str>) -> String {
    match country.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
