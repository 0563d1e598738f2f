//! Deferred loading of one section behind a placeholder.
//!
//! A [`SectionBoundary`] starts in [`LoadState::Pending`] and renders a
//! placeholder. Its [`SectionLoader`] is polled without blocking whenever the
//! page's scheduler says it is worth trying again; the first successful poll
//! mounts the section and the boundary becomes [`LoadState::Ready`] for good.
//! A failed acquisition becomes [`LoadState::Failed`], which is not handled
//! here: the next render reports it to the page-level error boundary.
//!
//! ```text
//! Pending ──poll Ok──▶ Ready
//!    │
//!    └────poll Err──▶ Failed
//! ```
//!
//! Boundaries know nothing about each other. A slow loader only keeps its own
//! placeholder on screen.

use crate::sections::{RenderError, Section, SectionCx};
use crate::store::ContentView;
use crate::types::{SectionHandle, SectionName};
use maud::{Markup, html};
use std::fmt;
use std::task::Poll;
use thiserror::Error;

/// A section's implementation could not be acquired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct AcquisitionFailure {
    pub reason: String,
}

impl AcquisitionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type Acquired = Result<Box<dyn Section>, AcquisitionFailure>;

/// Asynchronously produces a section implementation.
pub trait SectionLoader {
    /// Acquisition starts. Called once, before the first poll.
    fn begin(&mut self, _now_ms: u64) {}

    /// Non-blocking check for the implementation.
    fn poll_load(&mut self, now_ms: u64) -> Poll<Acquired>;

    /// When polling again could make progress, if known.
    fn next_wake(&self) -> Option<u64> {
        None
    }
}

/// A loader that completes a fixed delay after acquisition begins.
pub struct Deferred {
    delay_ms: Option<u64>,
    ready_at: Option<u64>,
    outcome: Option<Acquired>,
}

impl Deferred {
    /// Available on the first poll after acquisition begins.
    pub fn ready(section: Box<dyn Section>) -> Self {
        Self::after(0, section)
    }

    pub fn after(delay_ms: u64, section: Box<dyn Section>) -> Self {
        Self {
            delay_ms: Some(delay_ms),
            ready_at: None,
            outcome: Some(Ok(section)),
        }
    }

    /// Never resolves; the placeholder stays up indefinitely.
    pub fn never() -> Self {
        Self {
            delay_ms: None,
            ready_at: None,
            outcome: None,
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::failing_after(0, reason)
    }

    pub fn failing_after(delay_ms: u64, reason: impl Into<String>) -> Self {
        Self {
            delay_ms: Some(delay_ms),
            ready_at: None,
            outcome: Some(Err(AcquisitionFailure::new(reason))),
        }
    }
}

impl SectionLoader for Deferred {
    fn begin(&mut self, now_ms: u64) {
        self.ready_at = self.delay_ms.map(|d| now_ms.saturating_add(d));
    }

    fn poll_load(&mut self, now_ms: u64) -> Poll<Acquired> {
        match self.ready_at {
            Some(at) if now_ms >= at => match self.outcome.take() {
                Some(outcome) => Poll::Ready(outcome),
                None => Poll::Pending,
            },
            _ => Poll::Pending,
        }
    }

    fn next_wake(&self) -> Option<u64> {
        self.outcome.as_ref().and(self.ready_at)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("delay_ms", &self.delay_ms)
            .field("ready_at", &self.ready_at)
            .field("resolved", &self.outcome.is_none())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

pub struct SectionBoundary {
    handle: SectionHandle,
    state: LoadState,
    loader: Option<Box<dyn SectionLoader>>,
    section: Option<Box<dyn Section>>,
    failure: Option<AcquisitionFailure>,
}

impl SectionBoundary {
    pub fn new(handle: SectionHandle, loader: Box<dyn SectionLoader>) -> Self {
        Self {
            handle,
            state: LoadState::Pending,
            loader: Some(loader),
            section: None,
            failure: None,
        }
    }

    /// A boundary that is already `Ready` with a section that still needs
    /// mounting. Used for the header, which never shows a placeholder.
    pub fn eager(
        handle: SectionHandle,
        section: Box<dyn Section>,
        cx: &mut SectionCx<'_>,
    ) -> Self {
        let mut section = section;
        section.mount(cx);
        Self {
            handle,
            state: LoadState::Ready,
            loader: None,
            section: Some(section),
            failure: None,
        }
    }

    pub fn handle(&self) -> SectionHandle {
        self.handle
    }

    pub fn name(&self) -> SectionName {
        self.handle.name
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn failure(&self) -> Option<&AcquisitionFailure> {
        self.failure.as_ref()
    }

    /// Start acquiring. Returns when the loader wants to be polled.
    pub fn begin(&mut self, now_ms: u64) -> Option<u64> {
        let loader = self.loader.as_mut()?;
        loader.begin(now_ms);
        loader.next_wake()
    }

    pub fn next_wake(&self) -> Option<u64> {
        self.loader.as_ref()?.next_wake()
    }

    /// Poll the loader once. Returns the new state on a transition.
    ///
    /// Only `Pending` boundaries poll; `Ready` and `Failed` are final.
    pub fn poll(&mut self, cx: &mut SectionCx<'_>) -> Option<LoadState> {
        if self.state != LoadState::Pending {
            return None;
        }
        let loader = self.loader.as_mut()?;
        let Poll::Ready(acquired) = loader.poll_load(cx.now()) else {
            return None;
        };
        self.loader = None;
        match acquired {
            Ok(mut section) => {
                section.mount(cx);
                self.section = Some(section);
                self.state = LoadState::Ready;
                tracing::debug!(section = %self.handle.name, at = cx.now(), "section ready");
            }
            Err(failure) => {
                tracing::warn!(section = %self.handle.name, %failure, "section failed to load");
                self.failure = Some(failure);
                self.state = LoadState::Failed;
            }
        }
        Some(self.state)
    }

    pub fn section_mut(&mut self) -> Option<&mut (dyn Section + 'static)> {
        self.section.as_deref_mut()
    }

    /// Placeholder while pending, the section once ready.
    pub fn render(&self, view: &ContentView, fallback_text: &str) -> Result<Markup, RenderError> {
        match self.state {
            LoadState::Pending => Ok(loading_placeholder(view.loading_text(fallback_text))),
            LoadState::Ready => match &self.section {
                Some(section) => section.render(view),
                None => Ok(loading_placeholder(view.loading_text(fallback_text))),
            },
            LoadState::Failed => Err(RenderError::Acquisition {
                section: self.handle.name,
                source: self
                    .failure
                    .clone()
                    .unwrap_or_else(|| AcquisitionFailure::new("unknown")),
            }),
        }
    }

    /// Tear down the mounted section, if any. Safe to call more than once.
    pub fn unmount(&mut self, cx: &mut SectionCx<'_>) {
        if let Some(section) = self.section.as_mut() {
            section.unmount(cx);
        }
        self.loader = None;
    }
}

impl fmt::Debug for SectionBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionBoundary")
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("failure", &self.failure)
            .finish()
    }
}

/// Spinner shown by a boundary while its section is being acquired.
pub fn loading_placeholder(text: &str) -> Markup {
    html! {
        div.section-pending role="status" {
            span.spinner {}
            span.loading-text { (text) }
        }
    }
}
