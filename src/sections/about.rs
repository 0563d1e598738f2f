//! About section: markdown paragraphs beside the rotating gallery.
//!
//! The section owns its [`GalleryController`] for as long as it is mounted.
//! Mounting starts rotation with the configured interval, a content refresh
//! re-syncs it, and unmounting always stops it.

use super::{RenderError, Section, SectionCx, section_placeholder};
use crate::content::About;
use crate::event::{Interaction, InteractionError, PageEvent};
use crate::gallery::{GalleryController, render_gallery};
use crate::scheduler::TimerId;
use crate::store::ContentView;
use crate::types::{ImageRef, SectionName};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

#[derive(Debug, Default)]
pub struct AboutSection {
    gallery: GalleryController,
}

impl AboutSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gallery(&self) -> &GalleryController {
        &self.gallery
    }
}

/// Gallery images from the current document. A malformed or missing slice
/// yields no images here; the render reports the shape problem.
fn images_from(view: &ContentView) -> Vec<ImageRef> {
    view.ready()
        .and_then(|doc| doc.section::<About>("about").ok())
        .map(|about| about.images)
        .unwrap_or_default()
}

impl Section for AboutSection {
    fn name(&self) -> SectionName {
        SectionName::About
    }

    fn mount(&mut self, cx: &mut SectionCx<'_>) {
        let images = images_from(&cx.content);
        let interval = cx.config.gallery.interval_ms;
        self.gallery.start(cx, images, interval);
    }

    fn refresh(&mut self, cx: &mut SectionCx<'_>) {
        let images = images_from(&cx.content);
        let interval = cx.config.gallery.interval_ms;
        if self.gallery.sync(cx, &images, interval) {
            tracing::debug!(images = images.len(), interval, "gallery re-synced");
        }
    }

    fn unmount(&mut self, cx: &mut SectionCx<'_>) {
        self.gallery.stop(cx);
    }

    fn on_timer(&mut self, id: TimerId, _cx: &mut SectionCx<'_>) -> Option<PageEvent> {
        self.gallery
            .on_timer(id)
            .map(|transition| PageEvent::GalleryTransition {
                section: SectionName::About,
                transition,
            })
    }

    fn interact(
        &mut self,
        action: &Interaction,
        _cx: &mut SectionCx<'_>,
    ) -> Result<Vec<PageEvent>, InteractionError> {
        match action {
            Interaction::SelectImage(index) => Ok(self
                .gallery
                .go_to(*index)?
                .map(|transition| PageEvent::GalleryTransition {
                    section: SectionName::About,
                    transition,
                })
                .into_iter()
                .collect()),
            Interaction::Navigate(_) => Ok(Vec::new()),
            other => Err(InteractionError::Unsupported {
                section: SectionName::About,
                action: other.clone(),
            }),
        }
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        let Some(doc) = view.ready() else {
            return Ok(section_placeholder(SectionName::About, "Loading..."));
        };
        let about: About = doc.section("about")?;

        Ok(html! {
            section #about.section.about {
                div.container.about-grid {
                    div.about-text {
                        h2 { (about.title) }
                        @for paragraph in &about.paragraphs {
                            (markdown(paragraph))
                        }
                        @if let Some(cta) = &about.cta_button {
                            button.button.primary type="button" { (cta) }
                        }
                    }
                    div.about-media {
                        (render_gallery(&self.gallery))
                    }
                }
            }
        })
    }
}

/// Markdown to HTML. Raw inline HTML in the source is passed through.
fn markdown(source: &str) -> Markup {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(source));
    PreEscaped(out)
}
