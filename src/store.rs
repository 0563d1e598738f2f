//! Process-wide, read-only holder of the content document.
//!
//! The [`ContentStore`] is owned by the composition root for exactly one page
//! session. Sections never hold the store itself: they receive a
//! [`ContentContext`], a weak handle that can be cloned freely and asked for
//! the current [`ContentView`] from anywhere in the tree. Once the session is
//! torn down the handle stops resolving and reports a [`ConfigurationError`].
//!
//! Publishing swaps the `Rc` wholesale. Every section reading within one
//! render therefore sees the identical snapshot.

use crate::content::{ContentDocument, ContentError};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Content was requested outside an active page session.
///
/// This is a programming error, not a runtime condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("content accessed outside an active page session")]
    NoSession,
}

/// What a section sees when it asks for content.
#[derive(Debug, Clone)]
pub struct ContentView {
    pub content: Option<Rc<ContentDocument>>,
    /// True until a document has been published.
    pub loading: bool,
    /// The last load error, if loading the document failed.
    pub error: Option<Rc<ContentError>>,
}

impl ContentView {
    /// A view with nothing published yet.
    pub fn pending() -> Self {
        Self {
            content: None,
            loading: true,
            error: None,
        }
    }

    pub fn of(doc: Rc<ContentDocument>) -> Self {
        Self {
            content: Some(doc),
            loading: false,
            error: None,
        }
    }

    /// The document, only when it is safe to read nested fields.
    pub fn ready(&self) -> Option<&ContentDocument> {
        if self.loading {
            return None;
        }
        self.content.as_deref()
    }

    /// Loading text for placeholders: `ui.loading`, or the given fallback.
    pub fn loading_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.content
            .as_deref()
            .and_then(ContentDocument::loading_text)
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Default)]
struct Snapshot {
    document: Option<Rc<ContentDocument>>,
    error: Option<Rc<ContentError>>,
}

/// Session-scoped holder of the published document.
#[derive(Debug, Default)]
pub struct ContentStore {
    snapshot: RefCell<Snapshot>,
}

impl ContentStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Ambient handle for sections.
    pub fn context(self: &Rc<Self>) -> ContentContext {
        ContentContext {
            store: Rc::downgrade(self),
        }
    }

    /// Replace the current document. The previous snapshot is left untouched
    /// for anyone still holding it.
    pub fn publish(&self, document: ContentDocument) -> Rc<ContentDocument> {
        let document = Rc::new(document);
        let mut snapshot = self.snapshot.borrow_mut();
        snapshot.document = Some(Rc::clone(&document));
        snapshot.error = None;
        tracing::info!(fingerprint = %document.fingerprint(), "content document published");
        document
    }

    /// Record a failed load. Any previously published document stays current.
    pub fn fail(&self, error: ContentError) {
        tracing::warn!(%error, "content document failed to load");
        self.snapshot.borrow_mut().error = Some(Rc::new(error));
    }

    pub fn view(&self) -> ContentView {
        let snapshot = self.snapshot.borrow();
        ContentView {
            content: snapshot.document.clone(),
            loading: snapshot.document.is_none(),
            error: snapshot.error.clone(),
        }
    }
}

/// Cloneable, non-owning access point to the session's store.
#[derive(Debug, Clone)]
pub struct ContentContext {
    store: Weak<ContentStore>,
}

impl ContentContext {
    /// A handle that was never attached to a session.
    pub fn detached() -> Self {
        Self { store: Weak::new() }
    }

    pub fn view(&self) -> Result<ContentView, ConfigurationError> {
        self.store
            .upgrade()
            .map(|store| store.view())
            .ok_or(ConfigurationError::NoSession)
    }
}

/// Where a session's document comes from. Re-read on every full reload.
pub trait ContentSource {
    /// `Ok(None)` means the document is not available yet.
    fn load(&self) -> Result<Option<ContentDocument>, ContentError>;
}

/// Reads a document file on every load.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn load(&self) -> Result<Option<ContentDocument>, ContentError> {
        ContentDocument::from_path(&self.path).map(Some)
    }
}

/// Serves the same in-memory document on every load.
#[derive(Debug, Clone)]
pub struct StaticSource(pub ContentDocument);

impl ContentSource for StaticSource {
    fn load(&self) -> Result<Option<ContentDocument>, ContentError> {
        Ok(Some(self.0.clone()))
    }
}

/// Never produces a document; the page stays in its loading state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingSource;

impl ContentSource for PendingSource {
    fn load(&self) -> Result<Option<ContentDocument>, ContentError> {
        Ok(None)
    }
}
