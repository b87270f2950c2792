//! Slug derivation for catalog entries, categories, and tags.

/// Derive a URL slug from a title: lowercase, alphanumeric runs joined by
/// single hyphens, everything else dropped.
///
/// # Examples
///
/// ```
/// use promptmart_core::slug::slugify;
///
/// assert_eq!(slugify("Code Review Assistant"), "code-review-assistant");
/// assert_eq!(slugify("  GPT-4 & Claude: Tips!  "), "gpt-4-claude-tips");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Append a numeric suffix to a base slug (`my-title-2`, `my-title-3`, ...),
/// used to de-duplicate when the base slug is already taken.
pub fn with_suffix(base: &str, n: u32) -> String {
    format!("{base}-{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_titles() {
        assert_eq!(slugify("Marketing Email Writer"), "marketing-email-writer");
        assert_eq!(slugify("SQL"), "sql");
    }

    #[test]
    fn punctuation_collapses_to_single_hyphens() {
        assert_eq!(slugify("What?! A -- title..."), "what-a-title");
    }

    #[test]
    fn leading_and_trailing_separators_are_dropped() {
        assert_eq!(slugify("  (parens)  "), "parens");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn suffix_formatting() {
        assert_eq!(with_suffix("code-review", 2), "code-review-2");
    }
}
