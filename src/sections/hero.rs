//! Full-height opening section.
//!
//! The primary button scrolls to the product grid; the secondary button and
//! the scroll indicator scroll to the feature grid.

use super::{RenderError, Section, section_placeholder};
use crate::content::Hero;
use crate::store::ContentView;
use crate::types::SectionName;
use maud::{Markup, html};

#[derive(Debug, Default)]
pub struct HeroSection;

impl Section for HeroSection {
    fn name(&self) -> SectionName {
        SectionName::Hero
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        let Some(doc) = view.ready() else {
            return Ok(section_placeholder(SectionName::Hero, "Loading..."));
        };
        let hero: Hero = doc.section("hero")?;

        Ok(html! {
            section #home.section.hero {
                div.hero-decoration aria-hidden="true" {}
                div.container.hero-content {
                    h1 {
                        (hero.title.line1)
                        br;
                        span.accent { (hero.title.line2) }
                    }
                    p.hero-subtitle { (hero.subtitle) }
                    div.hero-buttons {
                        button.button.primary type="button" data-scroll-to="products" {
                            (hero.buttons.primary)
                        }
                        button.button.outline type="button" data-scroll-to="features" {
                            (hero.buttons.secondary)
                        }
                    }
                }
                button.scroll-indicator type="button" data-scroll-to="features"
                    aria-label="Scroll down" {
                    "⌄"
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_document;
    use std::rc::Rc;

    #[test]
    fn renders_two_line_title_and_buttons() {
        let view = ContentView::of(Rc::new(sample_document()));
        let html = HeroSection.render(&view).unwrap().into_string();
        assert!(html.contains("Clean homes,<br>"));
        assert!(html.contains("green planet"));
        assert!(html.contains(r#"data-scroll-to="products""#));
        assert_eq!(html.matches(r#"data-scroll-to="features""#).count(), 2);
        assert!(html.contains(r#"id="home""#));
    }

    #[test]
    fn placeholder_while_loading() {
        let html = HeroSection
            .render(&ContentView::pending())
            .unwrap()
            .into_string();
        assert!(html.contains("Loading..."));
        assert!(html.contains(r#"id="home""#));
    }
}
