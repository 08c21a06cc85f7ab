//! Error types and utilities for the metro-route toolkit
//!
//! Provides the shared error enum and fuzzy matching used to suggest a station
//! when a lookup by name or id fails.

use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum similarity (0.0 to 1.0) for a candidate to be offered as a suggestion.
///
/// Station names are short, so this sits a little above what a purely
/// character-based score would need: "centrl" still finds "Central" while
/// "xyz" finds nothing.
const MIN_SUGGESTION_SCORE: f64 = 0.65;

/// Find the best fuzzy match using combined character-based scoring
///
/// Jaro-Winkler (70%) handles transpositions and shared prefixes, normalized
/// Levenshtein (30%) handles dropped or inserted letters. A small prefix bonus
/// favours candidates that start the same way as the query, which is how people
/// abbreviate station names ("park st" for "Park Street").
fn find_best_fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.trim().to_lowercase();
    if input_lower.is_empty() {
        return None;
    }

    let mut best_match = None;
    let mut best_score = 0.0f64;

    for &candidate in candidates {
        let candidate_lower = candidate.to_lowercase();

        let jw_score = jaro_winkler(&input_lower, &candidate_lower);
        let lev_score = normalized_levenshtein(&input_lower, &candidate_lower);
        let mut score = (jw_score * 0.7) + (lev_score * 0.3);

        // Prefix bonus (+15% max) on the first four characters.
        let prefix_len = input_lower.chars().count().min(4);
        if prefix_len >= 3 {
            let input_prefix: String = input_lower.chars().take(prefix_len).collect();
            let candidate_prefix: String = candidate_lower.chars().take(prefix_len).collect();
            let prefix_similarity = normalized_levenshtein(&input_prefix, &candidate_prefix);
            if prefix_similarity > 0.7 {
                score += 0.15 * prefix_similarity;
            }
        }

        if score >= MIN_SUGGESTION_SCORE && score > best_score {
            best_score = score;
            best_match = Some(candidate);
        }
    }

    best_match
}

/// Unicode-aware case-insensitive equality
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Suggest a station for a query that did not resolve
///
/// `candidates` are every name and id known to the caller. Returns `None` when
/// the query already matches a candidate exactly (ignoring case) or nothing is
/// close enough.
pub fn suggest_station<'a, I>(query: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidates: Vec<&str> = candidates.into_iter().collect();

    if candidates
        .iter()
        .any(|candidate| eq_ignore_case(candidate, query.trim()))
    {
        return None;
    }

    find_best_fuzzy_match(query, &candidates).map(str::to_string)
}

/// Main error type for metro-route operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Station id or name did not resolve
    #[error("Station '{query}' not found{}", suggestion_suffix(.suggestion))]
    StationNotFound {
        query: String,
        suggestion: Option<String>,
    },

    /// Destination cannot be reached from the source
    #[error("No path found from '{from}' to '{to}'")]
    NoPath { from: String, to: String },

    /// Negative, NaN or infinite edge weight
    #[error("Invalid {field}: {value} (must be a finite, non-negative number)")]
    InvalidWeight { field: &'static str, value: f64 },

    /// Malformed input from a driver
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl Error {
    /// Shorthand for a lookup failure without a suggestion
    pub fn station_not_found(query: impl Into<String>) -> Self {
        Error::StationNotFound {
            query: query.into(),
            suggestion: None,
        }
    }
}

/// Convenience result type for metro-route operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    const STATIONS: [&str; 6] = [
        "Central",
        "Park Street",
        "Lake View",
        "Museum",
        "Airport",
        "Riverside",
    ];

    #[test]
    fn test_suggest_station_fuzzy_matching() {
        assert_eq!(
            suggest_station("Centrl", STATIONS),
            Some("Central".to_string())
        );
        assert_eq!(
            suggest_station("airprot", STATIONS),
            Some("Airport".to_string())
        );
        assert_eq!(
            suggest_station("park stret", STATIONS),
            Some("Park Street".to_string())
        );
    }

    #[test]
    fn test_suggest_station_exact_match_needs_no_suggestion() {
        assert_eq!(suggest_station("museum", STATIONS), None);
    }

    #[test]
    fn test_eq_ignore_case_beyond_ascii() {
        assert!(eq_ignore_case("Östermalmstorg", "östermalmstorg"));
        assert!(eq_ignore_case("ÉTOILE", "étoile"));
        assert!(!eq_ignore_case("Östermalm", "Ostermalm"));
    }

    #[test]
    fn test_suggest_station_exact_non_ascii_match_needs_no_suggestion() {
        assert_eq!(
            suggest_station("östermalmstorg", ["Östermalmstorg", "Slussen"]),
            None
        );
    }

    #[test]
    fn test_suggest_station_rejects_unrelated_input() {
        assert_eq!(suggest_station("qqqq", STATIONS), None);
        assert_eq!(suggest_station("   ", STATIONS), None);
        assert_eq!(suggest_station("Central", []), None);
    }

    #[test]
    fn test_error_display() {
        let err = Error::StationNotFound {
            query: "Centrl".to_string(),
            suggestion: Some("Central".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Station 'Centrl' not found (did you mean 'Central'?)"
        );
        assert_eq!(
            Error::station_not_found("Z").to_string(),
            "Station 'Z' not found"
        );

        let err = Error::InvalidWeight {
            field: "distance_km",
            value: -1.0,
        };
        assert!(err.to_string().contains("distance_km"));
    }
}
