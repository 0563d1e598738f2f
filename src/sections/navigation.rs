//! Fixed header: brand, in-page navigation and the call-to-action button.
//!
//! On narrow screens the links collapse behind a menu toggle. The open/closed
//! state lives here, and following a link always closes the menu.

use super::{RenderError, Section, SectionCx};
use crate::anchor::parse_anchor;
use crate::content::{Brand, NavLink, Navigation};
use crate::event::{Interaction, InteractionError, PageEvent};
use crate::store::ContentView;
use crate::types::SectionName;
use maud::{Markup, html};

#[derive(Debug, Default)]
pub struct NavigationSection {
    menu_open: bool,
}

impl NavigationSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }
}

impl Section for NavigationSection {
    fn name(&self) -> SectionName {
        SectionName::Navigation
    }

    fn unmount(&mut self, _cx: &mut SectionCx<'_>) {
        self.menu_open = false;
    }

    fn interact(
        &mut self,
        action: &Interaction,
        _cx: &mut SectionCx<'_>,
    ) -> Result<Vec<PageEvent>, InteractionError> {
        match action {
            Interaction::ToggleMenu => {
                self.menu_open = !self.menu_open;
                Ok(Vec::new())
            }
            Interaction::Navigate(_) => {
                self.menu_open = false;
                Ok(Vec::new())
            }
            other => Err(InteractionError::Unsupported {
                section: SectionName::Navigation,
                action: other.clone(),
            }),
        }
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        let Some(doc) = view.ready() else {
            return Ok(html! {
                nav.site-header {
                    div.container {
                        span.brand { "Loading..." }
                    }
                }
            });
        };
        let navigation: Navigation = doc.section("navigation")?;
        let brand: Brand = doc.section("brand")?;

        Ok(html! {
            nav.site-header.menu-open[self.menu_open] {
                div.container {
                    span.brand {
                        @if let Some(logo) = &brand.logo {
                            img.brand-logo src=(logo) alt={ (brand.name) " Logo" };
                        }
                        (brand.name)
                    }
                    div.nav-links {
                        @for item in &navigation.items {
                            (nav_button(item))
                        }
                        button.cta type="button" { (navigation.cta_button) }
                    }
                    button.menu-toggle
                        type="button"
                        aria-expanded=(if self.menu_open { "true" } else { "false" })
                        aria-label="Toggle menu"
                        data-action="toggle-menu" { "☰" }
                }
                @if self.menu_open {
                    div.mobile-menu {
                        @for item in &navigation.items {
                            (nav_button(item))
                        }
                        button.cta type="button" { (navigation.cta_button) }
                    }
                }
            }
        })
    }
}

/// A link that scrolls to an in-page anchor. Targets that leave the page are
/// rendered inert.
fn nav_button(item: &NavLink) -> Markup {
    let target = parse_anchor(&item.href).ok();
    html! {
        button.nav-link type="button" data-scroll-to=[target.as_ref().map(|a| a.as_str())] {
            (item.label)
        }
    }
}
