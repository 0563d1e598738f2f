//! Centralized parsing of navigation targets into in-page anchors.
//!
//! Every navigation item, hero button and CTA in the content document carries
//! an `href`. The page only ever scrolls within itself, so each target must
//! resolve to the id of a section on the page:
//!
//! - `"#products"` → `products`
//! - `"products"` → `products` (the original content files use bare ids)
//! - `" #about "` → `about` (surrounding whitespace is ignored)
//!
//! Anything that would leave the page (`https://…`, `//cdn…`, `/shop`,
//! `mailto:…`) is rejected, as are empty targets and ids with characters
//! outside `[A-Za-z0-9_-]`.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnchorError {
    #[error("navigation target is empty")]
    Empty,
    #[error("`{0}` points outside the page")]
    OutOfPage(String),
    #[error("`{0}` is not a valid anchor id")]
    Invalid(String),
}

/// The id of an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor(String);

impl Anchor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an `href` from the content document into an in-page anchor.
pub fn parse_anchor(href: &str) -> Result<Anchor, AnchorError> {
    let trimmed = href.trim();
    if trimmed.contains(':') || trimmed.starts_with('/') {
        return Err(AnchorError::OutOfPage(trimmed.to_string()));
    }
    let id = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if id.is_empty() {
        return Err(AnchorError::Empty);
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AnchorError::Invalid(trimmed.to_string()));
    }
    Ok(Anchor(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_prefixed() {
        assert_eq!(parse_anchor("#products").unwrap().as_str(), "products");
    }

    #[test]
    fn bare_id() {
        assert_eq!(parse_anchor("features").unwrap().as_str(), "features");
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(parse_anchor("  #about ").unwrap().as_str(), "about");
    }

    #[test]
    fn empty_and_bare_hash() {
        assert_eq!(parse_anchor("").unwrap_err(), AnchorError::Empty);
        assert_eq!(parse_anchor("#").unwrap_err(), AnchorError::Empty);
        assert_eq!(parse_anchor("   ").unwrap_err(), AnchorError::Empty);
    }

    #[test]
    fn absolute_urls_leave_the_page() {
        for href in ["https://example.com", "mailto:hi@example.com", "//cdn.example.com/x"] {
            assert!(
                matches!(parse_anchor(href), Err(AnchorError::OutOfPage(_))),
                "{href} should be out of page"
            );
        }
    }

    #[test]
    fn absolute_paths_leave_the_page() {
        assert_eq!(
            parse_anchor("/shop").unwrap_err(),
            AnchorError::OutOfPage("/shop".to_string())
        );
    }

    #[test]
    fn rejects_odd_characters() {
        assert!(matches!(parse_anchor("#a b"), Err(AnchorError::Invalid(_))));
        assert!(matches!(parse_anchor("a?b=1"), Err(AnchorError::Invalid(_))));
    }

    #[test]
    fn dashes_and_underscores_are_fine() {
        let anchor = parse_anchor("#our-story_2").unwrap();
        assert_eq!(anchor.as_str(), "our-story_2");
    }
}
