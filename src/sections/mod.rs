//! The independently rendered blocks of the page.
//!
//! Every section implements [`Section`]: it reads its own slice of the content
//! document through the [`ContentView`] it is handed, and renders either its
//! real markup or, while `loading` is true, its own placeholder. Sections never
//! assume a document is present before checking.
//!
//! | Section | Anchor | Content slices |
//! |---------|--------|----------------|
//! | [`navigation`] | none | `navigation`, `brand` |
//! | [`hero`] | `home` | `hero` |
//! | [`products`] | `products` | `products` |
//! | [`features`] | `features` | `features` |
//! | [`about`] | `about` | `about` (hosts the gallery) |
//! | [`footer`] | `footer` | `footer`, `brand` |
//!
//! Sections that own timers (only the about gallery today) arm them through
//! the [`SectionCx`] they are given, which tags every timer with the section's
//! position so the page can route firings back to it.

pub mod about;
pub mod features;
pub mod footer;
pub mod hero;
pub mod navigation;
pub mod products;

use crate::boundary::{AcquisitionFailure, Deferred, SectionLoader};
use crate::config::SiteConfig;
use crate::content::ContentShapeError;
use crate::event::{Interaction, InteractionError, PageEvent};
use crate::scheduler::{Scheduler, TimerHost, TimerId};
use crate::store::{ConfigurationError, ContentView};
use crate::types::{SectionHandle, SectionName};
use maud::{Markup, html};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use thiserror::Error;

/// A failure raised while rendering the page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Shape(#[from] ContentShapeError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("section `{section}` failed to load: {source}")]
    Acquisition {
        section: SectionName,
        source: AcquisitionFailure,
    },
    #[error("forced failure in `{section}`: {message}")]
    Forced {
        section: SectionName,
        message: String,
    },
}

/// What a timer armed by the page is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// Poll the boundary at this position again.
    Acquire(usize),
    /// Deliver to the section at this position.
    Section(usize),
}

/// Everything a section may touch during a lifecycle call.
pub struct SectionCx<'a> {
    pub handle: SectionHandle,
    pub content: ContentView,
    pub config: &'a SiteConfig,
    timers: &'a mut Scheduler<Wake>,
}

impl<'a> SectionCx<'a> {
    pub fn new(
        handle: SectionHandle,
        content: ContentView,
        config: &'a SiteConfig,
        timers: &'a mut Scheduler<Wake>,
    ) -> Self {
        Self {
            handle,
            content,
            config,
            timers,
        }
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }
}

impl TimerHost for SectionCx<'_> {
    fn arm_repeating(&mut self, every_ms: u64) -> TimerId {
        self.timers
            .schedule_repeating(every_ms, Wake::Section(self.handle.ordinal))
    }

    fn disarm(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }
}

/// One renderable block of the page.
pub trait Section {
    fn name(&self) -> SectionName;

    /// In-page anchor this section renders under.
    fn anchor(&self) -> Option<&'static str> {
        self.name().anchor()
    }

    /// Called once when the boundary swaps in this section.
    fn mount(&mut self, _cx: &mut SectionCx<'_>) {}

    /// Called when the content document or config was replaced.
    fn refresh(&mut self, _cx: &mut SectionCx<'_>) {}

    /// Release everything acquired in `mount`. Called on every teardown path.
    fn unmount(&mut self, _cx: &mut SectionCx<'_>) {}

    /// A timer this section armed came due.
    fn on_timer(&mut self, _id: TimerId, _cx: &mut SectionCx<'_>) -> Option<PageEvent> {
        None
    }

    /// Handle a user action. In-page navigation is accepted by every section;
    /// the page resolves the scroll target.
    fn interact(
        &mut self,
        action: &Interaction,
        _cx: &mut SectionCx<'_>,
    ) -> Result<Vec<PageEvent>, InteractionError> {
        match action {
            Interaction::Navigate(_) => Ok(Vec::new()),
            other => Err(InteractionError::Unsupported {
                section: self.name(),
                action: other.clone(),
            }),
        }
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError>;
}

/// The placeholder a section shows for itself while content is loading.
pub(crate) fn section_placeholder(name: SectionName, heading: &str) -> Markup {
    html! {
        section.section.section-loading id=[name.anchor()] aria-busy="true" {
            div.container {
                h2.loading-heading { (heading) }
            }
        }
    }
}

/// Build a fresh instance of one of the standard sections.
pub fn build_section(name: SectionName) -> Box<dyn Section> {
    match name {
        SectionName::Navigation => Box::new(navigation::NavigationSection::new()),
        SectionName::Hero => Box::new(hero::HeroSection),
        SectionName::Products => Box::new(products::ProductsSection),
        SectionName::Features => Box::new(features::FeaturesSection),
        SectionName::About => Box::new(about::AboutSection::new()),
        SectionName::Footer => Box::new(footer::FooterSection),
    }
}

/// A section whose render always fails. Used to exercise the page boundary.
#[derive(Debug, Clone)]
pub struct ForcedFailure {
    pub name: SectionName,
    pub message: String,
}

impl Section for ForcedFailure {
    fn name(&self) -> SectionName {
        self.name
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        if view.ready().is_none() {
            return Ok(section_placeholder(self.name, view.loading_text("Loading...")));
        }
        Err(RenderError::Forced {
            section: self.name,
            message: self.message.clone(),
        })
    }
}

pub type LoaderFactory = Rc<dyn Fn() -> Box<dyn SectionLoader>>;

/// Produces a fresh loader per section on every mount and reload.
#[derive(Clone)]
pub struct SectionRegistry {
    factories: BTreeMap<SectionName, LoaderFactory>,
    eager: BTreeSet<SectionName>,
}

impl SectionRegistry {
    /// The six built-in sections, each available on the first scheduler turn.
    /// The navigation header is eager: it is built and mounted directly and
    /// never shows a placeholder.
    pub fn standard() -> Self {
        let mut factories: BTreeMap<SectionName, LoaderFactory> = BTreeMap::new();
        for name in SectionName::ALL {
            factories.insert(
                name,
                Rc::new(move || {
                    Box::new(Deferred::ready(build_section(name))) as Box<dyn SectionLoader>
                }),
            );
        }
        Self {
            factories,
            eager: BTreeSet::from([SectionName::Navigation]),
        }
    }

    /// Replace the loader for one section. The section becomes deferred.
    pub fn with_loader(
        mut self,
        name: SectionName,
        factory: impl Fn() -> Box<dyn SectionLoader> + 'static,
    ) -> Self {
        self.factories.insert(name, Rc::new(factory));
        self.eager.remove(&name);
        self
    }

    /// Make a section deferred even if it was eager.
    pub fn deferred(mut self, name: SectionName) -> Self {
        self.eager.remove(&name);
        self
    }

    pub fn is_eager(&self, name: SectionName) -> bool {
        self.eager.contains(&name)
    }

    /// A new loader for `name`; an unknown name never resolves.
    pub fn loader(&self, name: SectionName) -> Box<dyn SectionLoader> {
        match self.factories.get(&name) {
            Some(factory) => factory(),
            None => Box::new(Deferred::never()),
        }
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for SectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("sections", &self.factories.keys().collect::<Vec<_>>())
            .field("eager", &self.eager)
            .finish()
    }
}
