/// Splits every raw value on commas and returns the trimmed, non-empty pieces
/// in request order.
pub fn split_terms<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| term.to_string())
        .collect()
}

/// Builds an `ILIKE` pattern matching `term` anywhere in the column. LIKE
/// metacharacters inside the term are escaped so they match literally.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Splits an aggregated `", "`-joined label string back into its labels.
pub fn split_aggregate(joined: Option<&str>) -> Vec<String> {
    match joined {
        Some(joined) => split_terms([joined]),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_values_are_flattened_in_order() {
        let terms = split_terms(["en,fr", "de"]);
        assert_eq!(terms, vec!["en", "fr", "de"]);
    }

    #[test]
    fn blank_pieces_are_dropped() {
        let terms = split_terms(["  child , ,", "", " war "]);
        assert_eq!(terms, vec!["child", "war"]);
    }

    #[test]
    fn pattern_wraps_term_in_wildcards() {
        assert_eq!(contains_pattern("shake"), "%shake%");
    }

    #[test]
    fn pattern_escapes_like_metacharacters() {
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn aggregate_split_handles_missing_value() {
        assert!(split_aggregate(None).is_empty());
        assert_eq!(
            split_aggregate(Some("Fiction, Drama")),
            vec!["Fiction", "Drama"]
        );
    }
}
