//! Token matching helpers for rule authors.
//!
//! Multi-value text parameters hold a space-delimited list such as
//! `"Cough Insomnia"`. Tokens compare case-insensitively.

use std::collections::BTreeSet;

/// Case-insensitive equality, Unicode aware.
pub(crate) fn same_word(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Whether `list` contains `token`.
pub fn contains_token(list: &str, token: &str) -> bool {
    list.split_whitespace().any(|t| same_word(t, token))
}

/// Number of distinct tokens in `list` that also appear in `reference`.
///
/// Repeated tokens count once: `"Cough cough"` against `["Cough"]` is 1.
pub fn count_matches(list: &str, reference: &[&str]) -> usize {
    let listed: BTreeSet<String> = list.split_whitespace().map(str::to_lowercase).collect();
    let wanted: BTreeSet<String> = reference.iter().map(|r| r.to_lowercase()).collect();
    listed.intersection(&wanted).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_token() {
        assert!(contains_token("Cough Insomnia", "Cough"));
        assert!(contains_token("Cough Insomnia", "insomnia"));
        assert!(!contains_token("Cough Insomnia", "Smoking"));
        assert!(!contains_token("", "Cough"));
    }

    #[test]
    fn test_contains_token_is_whole_word() {
        assert!(!contains_token("Coughing", "Cough"));
    }

    #[test]
    fn test_count_matches() {
        assert_eq!(count_matches("Cough Insomnia", &["Insomnia", "Alcoholism"]), 1);
        assert_eq!(count_matches("alcoholism INSOMNIA", &["Insomnia", "Alcoholism"]), 2);
        assert_eq!(count_matches("", &["Insomnia"]), 0);
    }

    #[test]
    fn test_count_matches_counts_distinct() {
        assert_eq!(count_matches("Cough cough COUGH", &["Cough"]), 1);
        assert_eq!(count_matches("Cough", &["Cough", "cough"]), 1);
    }

    #[test]
    fn test_same_word_non_ascii() {
        assert!(same_word("Бессонница", "БЕССОННИЦА"));
        assert!(!same_word("Rhinitis", "Rhinitis "));
    }
}
