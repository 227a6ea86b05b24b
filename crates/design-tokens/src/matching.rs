//! Tri-level name matching
//!
//! Exact → case-insensitive exact → case-insensitive substring (either
//! direction). First match wins; there is no ranking within a level.

/// Find the first item whose name matches `query`.
pub fn find_by_name<'a, T>(
    items: &'a [T],
    query: &str,
    name_of: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(found) = items.iter().find(|item| name_of(item) == query) {
        return Some(found);
    }

    let lower_query = query.to_lowercase();
    let lowered: Vec<String> = items.iter().map(|item| name_of(item).to_lowercase()).collect();

    if let Some(pos) = lowered.iter().position(|name| *name == lower_query) {
        return items.get(pos);
    }

    lowered
        .iter()
        .position(|name| {
            !name.is_empty() && (name.contains(&lower_query) || lower_query.contains(name.as_str()))
        })
        .and_then(|pos| items.get(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<&'static str> {
        vec!["Primary/500", "primary", "Typography/Body/Regular", "Blue"]
    }

    #[test]
    fn test_exact_before_case_insensitive() {
        let items = names();
        assert_eq!(find_by_name(&items, "primary", |s| s), Some(&"primary"));
        assert_eq!(find_by_name(&items, "Primary/500", |s| s), Some(&"Primary/500"));
    }

    #[test]
    fn test_case_insensitive() {
        let items = names();
        assert_eq!(find_by_name(&items, "PRIMARY/500", |s| s), Some(&"Primary/500"));
    }

    #[test]
    fn test_substring_either_direction() {
        let items = names();
        assert_eq!(
            find_by_name(&items, "body", |s| s),
            Some(&"Typography/Body/Regular")
        );
        assert_eq!(find_by_name(&items, "Blue/600", |s| s), Some(&"Blue"));
    }

    #[test]
    fn test_no_match() {
        let items = names();
        assert_eq!(find_by_name(&items, "Heading", |s| s), None);
        assert_eq!(find_by_name(&items, "  ", |s| s), None);
    }
}
