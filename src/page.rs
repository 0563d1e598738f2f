//! The composition root: one mounted page session.
//!
//! [`Page::mount`] assembles the pieces in a fixed order:
//!
//! ```text
//! ContentStore ─▶ ErrorBoundary ─▶ [ navigation | hero | products | features | about | footer ]
//!                                    eager        └──────── SectionBoundary each ────────┘
//! ```
//!
//! Everything runs on the page's [`Scheduler`]. Nothing moves until the
//! owner calls [`advance`](Page::advance), which fires due timers in deadline
//! order: acquisition wakes poll the owning boundary, section timers are
//! routed to the section that armed them. Every step that changes what the
//! page would show is followed by a render pass through the error boundary,
//! so a failure surfaces as [`PageEvent::FailureCaught`] at the step that
//! caused it.
//!
//! Once the boundary has caught a failure the page is inert: every section is
//! unmounted, every timer is cancelled, and the only way forward is
//! [`reload`](Page::reload).

use crate::anchor::{Anchor, parse_anchor};
use crate::boundary::{LoadState, SectionBoundary};
use crate::config::SiteConfig;
use crate::content::ContentDocument;
use crate::error_boundary::{CapturedFailure, ErrorBoundary};
use crate::event::{Interaction, InteractionError, PageEvent, ScrollRequest};
use crate::scheduler::{Scheduler, TimerId};
use crate::sections::{RenderError, SectionCx, SectionRegistry, Wake, build_section};
use crate::store::{ContentContext, ContentSource, ContentStore, ContentView};
use crate::types::{SectionHandle, SectionName};
use maud::{Markup, html};
use std::fmt;
use std::rc::Rc;

pub struct Page {
    config: SiteConfig,
    source: Rc<dyn ContentSource>,
    registry: SectionRegistry,
    store: Option<Rc<ContentStore>>,
    content: ContentContext,
    timers: Scheduler<Wake>,
    boundaries: Vec<SectionBoundary>,
    /// Pending acquisition wake per boundary, by ordinal.
    acquire: Vec<Option<TimerId>>,
    error: ErrorBoundary,
}

/// A section context over the page's fields. A free function so callers can
/// hold a boundary mutably at the same time.
fn section_cx<'a>(
    handle: SectionHandle,
    store: &Option<Rc<ContentStore>>,
    config: &'a SiteConfig,
    timers: &'a mut Scheduler<Wake>,
) -> SectionCx<'a> {
    let view = store
        .as_ref()
        .map(|s| s.view())
        .unwrap_or_else(ContentView::pending);
    SectionCx::new(handle, view, config, timers)
}

impl Page {
    /// Start a session: load the content source, mount the eager header and
    /// begin acquiring every other section.
    pub fn mount(
        config: SiteConfig,
        source: Rc<dyn ContentSource>,
        registry: SectionRegistry,
    ) -> Self {
        let mut page = Self {
            config,
            source,
            registry,
            store: None,
            content: ContentContext::detached(),
            timers: Scheduler::new(),
            boundaries: Vec::new(),
            acquire: Vec::new(),
            error: ErrorBoundary::new(),
        };
        page.start_session();
        page
    }

    fn start_session(&mut self) {
        let store = ContentStore::new();
        match self.source.load() {
            Ok(Some(doc)) => {
                store.publish(doc);
            }
            Ok(None) => tracing::debug!("content source has nothing to publish yet"),
            Err(error) => store.fail(error),
        }
        self.content = store.context();
        self.store = Some(store);
        self.error = ErrorBoundary::new();

        let now = self.timers.now();
        for (ordinal, name) in SectionName::ALL.into_iter().enumerate() {
            let handle = SectionHandle { name, ordinal };
            if self.registry.is_eager(name) {
                let mut cx = section_cx(handle, &self.store, &self.config, &mut self.timers);
                self.boundaries
                    .push(SectionBoundary::eager(handle, build_section(name), &mut cx));
                self.acquire.push(None);
                continue;
            }
            let mut boundary = SectionBoundary::new(handle, self.registry.loader(name));
            let wake = boundary.begin(now).map(|at| {
                self.timers
                    .schedule_once(at.saturating_sub(now), Wake::Acquire(ordinal))
            });
            self.boundaries.push(boundary);
            self.acquire.push(wake);
        }
        tracing::debug!(sections = self.boundaries.len(), "page mounted");
    }

    /// Move the clock forward by `ms`, firing everything that comes due.
    pub fn advance(&mut self, ms: u64) -> Vec<PageEvent> {
        let until = self.timers.now().saturating_add(ms);
        let mut events = Vec::new();
        while !self.error.has_error() {
            let Some(fired) = self.timers.pop_due(until) else {
                break;
            };
            let changed = match fired.payload {
                Wake::Acquire(ordinal) => self.on_acquire(ordinal, &mut events),
                Wake::Section(ordinal) => self.on_section_timer(ordinal, fired.id, &mut events),
            };
            if changed {
                events.extend(self.check());
            }
        }
        self.timers.settle(until);
        events
    }

    /// Like [`advance`](Self::advance), stepping deadline by deadline so each
    /// event is stamped with the clock value it happened at.
    pub fn advance_timeline(&mut self, ms: u64) -> Vec<(u64, PageEvent)> {
        let until = self.timers.now().saturating_add(ms);
        let mut timeline = Vec::new();
        loop {
            let now = self.timers.now();
            let step_to = match self.timers.next_deadline() {
                Some(at) if at <= until && !self.error.has_error() => at,
                _ => until,
            };
            timeline.extend(
                self.advance(step_to.saturating_sub(now))
                    .into_iter()
                    .map(|event| (step_to, event)),
            );
            if step_to >= until {
                break;
            }
        }
        timeline
    }

    fn on_acquire(&mut self, ordinal: usize, events: &mut Vec<PageEvent>) -> bool {
        let Some(slot) = self.acquire.get_mut(ordinal) else {
            return false;
        };
        *slot = None;
        let Some(boundary) = self.boundaries.get_mut(ordinal) else {
            return false;
        };
        let handle = boundary.handle();
        let mut cx = section_cx(handle, &self.store, &self.config, &mut self.timers);
        let now = cx.now();
        match boundary.poll(&mut cx) {
            Some(LoadState::Ready) => {
                events.push(PageEvent::SectionReady {
                    section: boundary.name(),
                    at: now,
                });
                true
            }
            Some(_) => true,
            None => {
                if let Some(at) = boundary.next_wake().filter(|at| *at > now) {
                    self.acquire[ordinal] =
                        Some(self.timers.schedule_once(at - now, Wake::Acquire(ordinal)));
                }
                false
            }
        }
    }

    fn on_section_timer(
        &mut self,
        ordinal: usize,
        id: TimerId,
        events: &mut Vec<PageEvent>,
    ) -> bool {
        let Some(boundary) = self.boundaries.get_mut(ordinal) else {
            return false;
        };
        let handle = boundary.handle();
        let mut cx = section_cx(handle, &self.store, &self.config, &mut self.timers);
        let Some(section) = boundary.section_mut() else {
            return false;
        };
        match section.on_timer(id, &mut cx) {
            Some(event) => {
                events.push(event);
                true
            }
            None => false,
        }
    }

    /// Run until no boundary is waiting on a known wake-up, or `horizon_ms`
    /// of page time has passed. Loaders that never resolve are left pending.
    pub fn settle(&mut self, horizon_ms: u64) -> Vec<PageEvent> {
        let deadline = self.timers.now().saturating_add(horizon_ms);
        let mut events = self.advance(0);
        while !self.error.has_error() {
            let next = self
                .boundaries
                .iter()
                .filter(|b| b.state() == LoadState::Pending)
                .filter_map(SectionBoundary::next_wake)
                .min();
            let Some(at) = next else {
                break;
            };
            if at > deadline {
                break;
            }
            let now = self.timers.now();
            let before = self.pending();
            events.extend(self.advance(at.saturating_sub(now)));
            // A wake in the past that made no progress would spin forever.
            if at <= now && self.pending() == before {
                break;
            }
        }
        events
    }

    fn pending(&self) -> usize {
        self.boundaries
            .iter()
            .filter(|b| b.state() == LoadState::Pending)
            .count()
    }

    /// Deliver a user action to one section.
    pub fn interact(
        &mut self,
        section: SectionName,
        action: Interaction,
    ) -> Result<Vec<PageEvent>, InteractionError> {
        if self.error.has_error() {
            return Err(InteractionError::PageFailed);
        }
        let scroll = match &action {
            Interaction::Navigate(href) => Some(self.resolve(href)?),
            _ => None,
        };

        let boundary = self
            .boundaries
            .iter_mut()
            .find(|b| b.name() == section && b.state() == LoadState::Ready)
            .ok_or(InteractionError::NotMounted(section))?;
        let handle = boundary.handle();
        let mut cx = section_cx(handle, &self.store, &self.config, &mut self.timers);
        let target = boundary
            .section_mut()
            .ok_or(InteractionError::NotMounted(section))?;
        let mut events = target.interact(&action, &mut cx)?;

        events.extend(scroll.map(|anchor| PageEvent::Navigate(ScrollRequest::smooth(anchor))));
        events.extend(self.check());
        Ok(events)
    }

    /// Resolve an in-page target without going through a section.
    pub fn navigate(&self, href: &str) -> Result<ScrollRequest, InteractionError> {
        self.resolve(href).map(ScrollRequest::smooth)
    }

    fn resolve(&self, href: &str) -> Result<Anchor, InteractionError> {
        let anchor = parse_anchor(href)?;
        let known = self
            .boundaries
            .iter()
            .any(|b| b.name().anchor() == Some(anchor.as_str()));
        if known {
            Ok(anchor)
        } else {
            Err(InteractionError::UnknownAnchor(anchor))
        }
    }

    /// Replace the content document and let every mounted section follow it.
    pub fn publish(&mut self, document: ContentDocument) -> Vec<PageEvent> {
        let Some(store) = &self.store else {
            return Vec::new();
        };
        if self.error.has_error() {
            return Vec::new();
        }
        store.publish(document);
        for boundary in &mut self.boundaries {
            let handle = boundary.handle();
            let mut cx = section_cx(handle, &self.store, &self.config, &mut self.timers);
            if let Some(section) = boundary.section_mut() {
                section.refresh(&mut cx);
            }
        }
        self.check().into_iter().collect()
    }

    /// Compose the page through the error boundary.
    pub fn render(&mut self) -> Markup {
        let was_failed = self.error.has_error();
        let content = &self.content;
        let boundaries = &self.boundaries;
        let fallback = self.config.loading.text.as_str();
        let markup = self
            .error
            .render(|| compose_sections(content, boundaries, fallback));
        if !was_failed && self.error.has_error() {
            self.teardown();
        }
        markup
    }

    /// Render pass after a state change. Returns the failure event on the
    /// pass that trips the boundary.
    fn check(&mut self) -> Option<PageEvent> {
        if self.error.has_error() {
            return None;
        }
        self.render();
        self.error
            .captured()
            .map(|failure| PageEvent::FailureCaught {
                section: failure.section,
                message: failure.message.clone(),
            })
    }

    /// Unmount every section and cancel every pending wake.
    fn teardown(&mut self) {
        for (ordinal, boundary) in self.boundaries.iter_mut().enumerate() {
            let handle = boundary.handle();
            let mut cx = section_cx(handle, &self.store, &self.config, &mut self.timers);
            boundary.unmount(&mut cx);
            if let Some(id) = self.acquire.get_mut(ordinal).and_then(Option::take) {
                self.timers.cancel(id);
            }
        }
    }

    /// Tear the session down and remount from the same source, config and
    /// registry. The clock keeps running.
    pub fn reload(&mut self) {
        tracing::info!("full page reload");
        self.unmount();
        self.start_session();
    }

    /// End the session. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.teardown();
        self.boundaries.clear();
        self.acquire.clear();
        self.store = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.store.is_some()
    }

    /// Ambient content handle. Stops resolving once the session ends.
    pub fn content(&self) -> ContentContext {
        self.content.clone()
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn load_states(&self) -> Vec<(SectionName, LoadState)> {
        self.boundaries
            .iter()
            .map(|b| (b.name(), b.state()))
            .collect()
    }

    pub fn load_state(&self, section: SectionName) -> Option<LoadState> {
        self.boundaries
            .iter()
            .find(|b| b.name() == section)
            .map(SectionBoundary::state)
    }

    pub fn has_error(&self) -> bool {
        self.error.has_error()
    }

    pub fn captured(&self) -> Option<&CapturedFailure> {
        self.error.captured()
    }

    pub fn active_timers(&self) -> usize {
        self.timers.active()
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("now", &self.timers.now())
            .field("boundaries", &self.boundaries)
            .field("error", &self.error)
            .finish()
    }
}

/// Header, then the main sections in page order, then the footer. Any
/// section failing aborts the whole composition.
fn compose_sections(
    content: &ContentContext,
    boundaries: &[SectionBoundary],
    fallback: &str,
) -> Result<Markup, CapturedFailure> {
    let mut header = None;
    let mut main = Vec::new();
    let mut footer = None;
    for boundary in boundaries {
        let name = boundary.name();
        let view = content
            .view()
            .map_err(|e| CapturedFailure::new(name, &RenderError::from(e)))?;
        let markup = boundary
            .render(&view, fallback)
            .map_err(|e| CapturedFailure::new(name, &e))?;
        match name {
            SectionName::Navigation => header = Some(markup),
            SectionName::Footer => footer = Some(markup),
            _ => main.push(markup),
        }
    }
    Ok(html! {
        @if let Some(header) = header {
            (header)
        }
        main #main {
            @for section in &main {
                (section)
            }
        }
        @if let Some(footer) = footer {
            (footer)
        }
    })
}
