//! Clean names: the fuzzy key that links local files to catalog tracks.

/// Normalize text into a clean-name key.
///
/// Lowercases, drops everything that isn't alphanumeric or whitespace and
/// collapses runs of whitespace into single spaces.
pub fn clean_name(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Clean name of a track as stored in `alltracks` and `have`.
pub fn track_clean_name(artist: &str, album: &str, title: &str) -> String {
    clean_name(&format!("{} {} {}", artist, album, title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  AC/DC -  Back in Black! "), "acdc back in black");
        assert_eq!(clean_name("Don't Stop"), "dont stop");
        assert_eq!(clean_name(""), "");
    }

    #[test]
    fn test_track_clean_name() {
        assert_eq!(
            track_clean_name("The Beatles", "Abbey Road", "Come Together"),
            "the beatles abbey road come together"
        );
    }

    proptest! {
        #[test]
        fn clean_name_is_idempotent(input in "[a-zA-Z0-9 .,!'/-]{0,40}") {
            let once = clean_name(&input);
            prop_assert_eq!(clean_name(&once), once);
        }

        #[test]
        fn clean_name_has_no_edge_or_double_spaces(input in "[a-zA-Z .,!-]{0,40}") {
            let cleaned = clean_name(&input);
            prop_assert!(!cleaned.starts_with(' ') && !cleaned.ends_with(' '));
            prop_assert!(!cleaned.contains("  "));
        }
    }
}
