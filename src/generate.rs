//! HTML site generation.
//!
//! Mounts a [`Page`] over the content document, runs it until every section
//! boundary has settled, and writes the composed page as one static
//! `index.html`. A page that ends in the apology view is never written.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html       # The composed page
//! └── assets/          # Copied verbatim from the content directory
//!     ├── logo.svg
//!     └── ...
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/site.css`: Base styles (colors injected from config)
//! - `static/page.js`: Gallery rotation, smooth scrolling, menu toggle, reload
//!
//! The script reads the same `data-*` attributes the Rust page renders, so
//! the published page keeps rotating the gallery with the configured
//! interval without any server.

use crate::boundary::LoadState;
use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{Brand, ContentDocument, ContentError};
use crate::page::Page;
use crate::sections::SectionRegistry;
use crate::store::StaticSource;
use crate::types::SectionName;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("page failed to render in section `{section}`: {message}")]
    PageFailed {
        section: SectionName,
        message: String,
    },
    #[error("sections still loading after {horizon_ms} ms: {sections:?}")]
    Unsettled {
        horizon_ms: u64,
        sections: Vec<SectionName>,
    },
}

const CSS_STATIC: &str = include_str!("../static/site.css");
const JS: &str = include_str!("../static/page.js");

/// How much page time sections get to finish loading before giving up.
pub const SETTLE_HORIZON_MS: u64 = 60_000;

/// A fully composed page, ready to write.
#[derive(Debug)]
pub struct RenderedSite {
    pub title: String,
    pub fingerprint: String,
    pub sections: Vec<(SectionName, LoadState)>,
    pub html: String,
}

/// What a build produced.
#[derive(Debug)]
pub struct GenerateSummary {
    pub site: RenderedSite,
    pub index_path: PathBuf,
    pub assets_copied: usize,
}

/// Load `config.toml` and the content document it names from `content_dir`.
pub fn load_inputs(content_dir: &Path) -> Result<(SiteConfig, ContentDocument), GenerateError> {
    let config = config::load_config(content_dir)?;
    let document = ContentDocument::from_path(&content_dir.join(&config.content))?;
    Ok((config, document))
}

/// Compose the page for `document` without touching the filesystem.
pub fn render_site(
    config: &SiteConfig,
    document: ContentDocument,
    registry: SectionRegistry,
) -> Result<RenderedSite, GenerateError> {
    let fingerprint = document.fingerprint();
    let title = page_title(config, &document);

    let mut page = Page::mount(config.clone(), Rc::new(StaticSource(document)), registry);
    page.settle(SETTLE_HORIZON_MS);

    if let Some(failure) = page.captured() {
        return Err(GenerateError::PageFailed {
            section: failure.section,
            message: failure.message.clone(),
        });
    }
    let pending: Vec<SectionName> = page
        .load_states()
        .into_iter()
        .filter(|(_, state)| *state == LoadState::Pending)
        .map(|(name, _)| name)
        .collect();
    if !pending.is_empty() {
        return Err(GenerateError::Unsettled {
            horizon_ms: SETTLE_HORIZON_MS,
            sections: pending,
        });
    }

    let body = page.render();
    // The final render may still trip the boundary.
    if let Some(failure) = page.captured() {
        return Err(GenerateError::PageFailed {
            section: failure.section,
            message: failure.message.clone(),
        });
    }
    let sections = page.load_states();
    page.unmount();

    let colors = config::generate_color_css(&config.colors);
    let css = format!("{colors}\n\n{CSS_STATIC}");
    let html = base_document(&title, &css, &fingerprint, body).into_string();
    Ok(RenderedSite {
        title,
        fingerprint,
        sections,
        html,
    })
}

/// `brand.name`, or the configured title when the document has none.
fn page_title(config: &SiteConfig, document: &ContentDocument) -> String {
    document
        .optional_section::<Brand>("brand")
        .ok()
        .flatten()
        .map(|brand| brand.name)
        .unwrap_or_else(|| config.title.clone())
}

/// Build the site from `content_dir` into `output_dir`.
pub fn generate(content_dir: &Path, output_dir: &Path) -> Result<GenerateSummary, GenerateError> {
    let (config, document) = load_inputs(content_dir)?;
    let site = render_site(&config, document, SectionRegistry::standard())?;

    fs::create_dir_all(output_dir)?;
    let index_path = output_dir.join("index.html");
    fs::write(&index_path, &site.html)?;
    let assets_copied = copy_assets(&content_dir.join("assets"), &output_dir.join("assets"))?;

    tracing::info!(
        index = %index_path.display(),
        assets = assets_copied,
        fingerprint = %site.fingerprint,
        "site generated"
    );
    Ok(GenerateSummary {
        site,
        index_path,
        assets_copied,
    })
}

/// Copy every file under `src` into `dst`, keeping relative paths. A missing
/// source directory copies nothing.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, fingerprint: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="content-fingerprint" content=(fingerprint);
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Deferred;
    use crate::sections::{ForcedFailure, build_section};
    use crate::test_helpers::{sample_document, setup_fixtures};
    use tempfile::TempDir;

    #[test]
    fn base_document_includes_doctype_and_fingerprint() {
        let doc = base_document("Test", "body {}", "abc123", html! { p { "x" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(r#"content="abc123""#));
        assert!(doc.contains("<title>Test</title>"));
    }

    #[test]
    fn render_site_composes_every_section() {
        let site = render_site(
            &SiteConfig::default(),
            sample_document(),
            SectionRegistry::standard(),
        )
        .unwrap();
        assert_eq!(site.title, "Leafy");
        assert!(site.sections.iter().all(|(_, s)| *s == LoadState::Ready));
        for id in ["home", "products", "features", "about", "footer"] {
            assert!(site.html.contains(&format!(r#"id="{id}""#)), "missing {id}");
        }
        assert!(!site.html.contains(r#"class="section-pending""#));
        assert!(site.html.contains("--color-accent"));
    }

    #[test]
    fn title_falls_back_to_config() {
        let config = SiteConfig::default();
        assert_eq!(page_title(&config, &sample_document()), "Leafy");
        let bare = ContentDocument::from_value(serde_json::json!({"hero": {}})).unwrap();
        assert_eq!(page_title(&config, &bare), "Home");
    }

    #[test]
    fn empty_document_fails_to_render() {
        let doc = ContentDocument::from_value(serde_json::json!({})).unwrap();
        let err =
            render_site(&SiteConfig::default(), doc, SectionRegistry::standard()).unwrap_err();
        assert!(matches!(err, GenerateError::PageFailed { .. }));
    }

    #[test]
    fn delayed_sections_are_waited_for() {
        let registry = SectionRegistry::standard().with_loader(SectionName::About, || {
            Box::new(Deferred::after(2_000, build_section(SectionName::About)))
        });
        let site = render_site(&SiteConfig::default(), sample_document(), registry).unwrap();
        assert!(!site.html.contains(r#"class="section-pending""#));
    }

    #[test]
    fn never_loading_section_is_unsettled() {
        let registry = SectionRegistry::standard()
            .with_loader(SectionName::Footer, || Box::new(Deferred::never()));
        let err = render_site(&SiteConfig::default(), sample_document(), registry).unwrap_err();
        match err {
            GenerateError::Unsettled { sections, .. } => {
                assert_eq!(sections, vec![SectionName::Footer]);
            }
            other => panic!("expected unsettled, got {other:?}"),
        }
    }

    #[test]
    fn failing_page_is_not_written() {
        let registry = SectionRegistry::standard().with_loader(SectionName::Hero, || {
            Box::new(Deferred::ready(Box::new(ForcedFailure {
                name: SectionName::Hero,
                message: "bad hero".into(),
            })))
        });
        let err = render_site(&SiteConfig::default(), sample_document(), registry).unwrap_err();
        match err {
            GenerateError::PageFailed { section, message } => {
                assert_eq!(section, SectionName::Hero);
                assert!(message.contains("bad hero"));
            }
            other => panic!("expected page failure, got {other:?}"),
        }
    }

    #[test]
    fn generate_writes_index_and_assets() {
        let content = setup_fixtures();
        let out = TempDir::new().unwrap();
        let summary = generate(content.path(), out.path()).unwrap();

        assert_eq!(summary.index_path, out.path().join("index.html"));
        assert_eq!(summary.assets_copied, 1);
        assert!(out.path().join("assets/logo.svg").exists());

        let html = fs::read_to_string(&summary.index_path).unwrap();
        // Fixture config sets a 4s gallery.
        assert!(html.contains(r#"data-interval="4000""#));
        assert!(html.contains(&summary.site.fingerprint));
    }

    #[test]
    fn missing_content_document_is_reported() {
        let content = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let err = generate(content.path(), out.path()).unwrap_err();
        assert!(matches!(err, GenerateError::Content(ContentError::Io(_))));
        assert!(!out.path().join("index.html").exists());
    }
}
