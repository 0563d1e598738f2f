//! Shared types used across the page composition.
//!
//! These are the small value types that travel between the content document,
//! the section boundaries, and the composition root.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the visually independent blocks of the page.
///
/// Declaration order is the top-to-bottom page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Navigation,
    Hero,
    Products,
    Features,
    About,
    Footer,
}

impl SectionName {
    /// Every section in page order.
    pub const ALL: [SectionName; 6] = [
        SectionName::Navigation,
        SectionName::Hero,
        SectionName::Products,
        SectionName::Features,
        SectionName::About,
        SectionName::Footer,
    ];

    /// Key of this section's slice in the content document.
    pub fn key(self) -> &'static str {
        match self {
            SectionName::Navigation => "navigation",
            SectionName::Hero => "hero",
            SectionName::Products => "products",
            SectionName::Features => "features",
            SectionName::About => "about",
            SectionName::Footer => "footer",
        }
    }

    /// In-page anchor the section is reachable under.
    ///
    /// The header has no anchor of its own: it is fixed above everything else.
    /// The hero is the top of the page and answers to `home`.
    pub fn anchor(self) -> Option<&'static str> {
        match self {
            SectionName::Navigation => None,
            SectionName::Hero => Some("home"),
            other => Some(other.key()),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifies one mounted section: its name and its position on the page.
///
/// Created by the composition root at mount time and dropped on unmount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHandle {
    pub name: SectionName,
    /// Zero-based position in page order.
    pub ordinal: usize,
}

/// An image reference from the content document (`about.images[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

impl ImageRef {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_order_matches_declaration_order() {
        let mut sorted = SectionName::ALL;
        sorted.sort();
        assert_eq!(sorted, SectionName::ALL);
        assert_eq!(SectionName::ALL[0], SectionName::Navigation);
        assert_eq!(SectionName::ALL[5], SectionName::Footer);
    }

    #[test]
    fn keys_round_trip() {
        for name in SectionName::ALL {
            assert_eq!(SectionName::from_key(name.key()), Some(name));
        }
        assert_eq!(SectionName::from_key("brand"), None);
    }

    #[test]
    fn navigation_has_no_anchor() {
        assert_eq!(SectionName::Navigation.anchor(), None);
        assert_eq!(SectionName::About.anchor(), Some("about"));
    }

    #[test]
    fn hero_is_anchored_as_home() {
        assert_eq!(SectionName::Hero.anchor(), Some("home"));
        assert_eq!(SectionName::Hero.key(), "hero");
    }

    #[test]
    fn image_alt_defaults_to_empty() {
        let image: ImageRef = serde_json::from_str(r#"{"src": "a.jpg"}"#).unwrap();
        assert_eq!(image, ImageRef::new("a.jpg", ""));
    }
}
