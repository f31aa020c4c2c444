//! Sort expression parsing.
//!
//! The `sort` parameter is a comma-separated list of field tokens; a `-`
//! prefix sorts that field descending. Token order is significant (primary,
//! secondary, ... sort keys). Field existence is not validated here - unknown
//! fields are a backend concern.

use crate::models::{SortField, SortOrder};

/// Parse a compact sort expression such as `-price,createdAt` into an ordered
/// sort spec.
///
/// Empty tokens are skipped, so an empty or whitespace-only string yields an
/// empty spec (the backend applies its own default ordering).
#[must_use]
pub fn parse_sort(raw: &str) -> Vec<SortField> {
    raw.split(',')
        .filter_map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return None;
            }
            let (field, order) = token
                .strip_prefix('-')
                .map_or((token, SortOrder::Asc), |field| (field, SortOrder::Desc));
            Some(SortField::new(field, order))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_token_sorts_ascending() {
        assert_eq!(
            parse_sort("createdAt"),
            vec![SortField::new("createdAt", SortOrder::Asc)]
        );
    }

    #[test]
    fn test_dash_prefix_sorts_descending_and_is_stripped() {
        assert_eq!(
            parse_sort("-price"),
            vec![SortField::new("price", SortOrder::Desc)]
        );
    }

    #[test]
    fn test_token_order_is_preserved() {
        assert_eq!(
            parse_sort("-price,createdAt,name"),
            vec![
                SortField::new("price", SortOrder::Desc),
                SortField::new("createdAt", SortOrder::Asc),
                SortField::new("name", SortOrder::Asc),
            ]
        );
    }

    #[test]
    fn test_dot_paths_pass_through() {
        assert_eq!(
            parse_sort("-user.address.city"),
            vec![SortField::new("user.address.city", SortOrder::Desc)]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_spec() {
        assert!(parse_sort("").is_empty());
        assert!(parse_sort("  ").is_empty());
        assert!(parse_sort(",,").is_empty());
    }
}
