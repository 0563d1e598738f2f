//! Inputs to and observable outputs from a mounted page.

use crate::anchor::{Anchor, AnchorError};
use crate::gallery::{GalleryError, GalleryTransition};
use crate::types::SectionName;
use thiserror::Error;

/// A user action directed at one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Pick a gallery image from its indicator control.
    SelectImage(usize),
    /// Open or close the collapsed navigation menu.
    ToggleMenu,
    /// Activate a navigation item, button or link pointing at `href`.
    Navigate(String),
}

/// Scroll an in-page anchor into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub anchor: Anchor,
    pub smooth: bool,
}

impl ScrollRequest {
    pub fn smooth(anchor: Anchor) -> Self {
        Self {
            anchor,
            smooth: true,
        }
    }
}

/// Something a consumer of the page can observe.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A section boundary swapped its placeholder for the real section.
    SectionReady { section: SectionName, at: u64 },
    /// The gallery in `section` moved from one image to another.
    GalleryTransition {
        section: SectionName,
        transition: GalleryTransition,
    },
    Navigate(ScrollRequest),
    /// The page-level boundary caught a failure and switched to the apology view.
    FailureCaught {
        section: SectionName,
        message: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InteractionError {
    #[error("section `{section}` does not handle {action:?}")]
    Unsupported {
        section: SectionName,
        action: Interaction,
    },
    #[error("section `{0}` is not mounted")]
    NotMounted(SectionName),
    #[error("page is showing the error view; reload to continue")]
    PageFailed,
    #[error(transparent)]
    Gallery(#[from] GalleryError),
    #[error(transparent)]
    Anchor(#[from] AnchorError),
    #[error("no section on this page has the anchor `{0}`")]
    UnknownAnchor(Anchor),
}
