//! Shared test utilities for the simple-landing test suite.
//!
//! Provides the fixture document, a mounted page over it, and a few lookup
//! helpers for the events a page emits.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut page = sample_page(SectionRegistry::standard());
//! let events = page.advance(0);
//! assert_eq!(ready_sections(&events).len(), 5);
//! ```

use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::content::ContentDocument;
use crate::event::PageEvent;
use crate::gallery::GalleryTransition;
use crate::page::Page;
use crate::sections::SectionRegistry;
use crate::store::StaticSource;
use crate::types::SectionName;

// =========================================================================
// Fixture setup
// =========================================================================

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

/// The fixture content document from `fixtures/content/content.yaml`.
pub fn sample_document() -> ContentDocument {
    let path = fixtures_dir().join("content.yaml");
    ContentDocument::from_path(&path)
        .unwrap_or_else(|e| panic!("fixture {} failed to load: {e}", path.display()))
}

/// A page over the fixture document with stock config.
pub fn sample_page(registry: SectionRegistry) -> Page {
    Page::mount(
        SiteConfig::default(),
        Rc::new(StaticSource(sample_document())),
        registry,
    )
}

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    copy_dir_recursive(&fixtures_dir(), tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Event extractors
// =========================================================================

/// Sections that became ready, in event order.
pub fn ready_sections(events: &[PageEvent]) -> Vec<SectionName> {
    events
        .iter()
        .filter_map(|e| match e {
            PageEvent::SectionReady { section, .. } => Some(*section),
            _ => None,
        })
        .collect()
}

/// Gallery transitions, in event order.
pub fn gallery_transitions(events: &[PageEvent]) -> Vec<GalleryTransition> {
    events
        .iter()
        .filter_map(|e| match e {
            PageEvent::GalleryTransition { transition, .. } => Some(*transition),
            _ => None,
        })
        .collect()
}
