//! Footer: brand blurb, link columns, social links and copyright.

use super::{RenderError, Section, section_placeholder};
use crate::anchor::parse_anchor;
use crate::content::{Brand, Footer, FooterLink, SocialLink};
use crate::store::ContentView;
use crate::types::SectionName;
use maud::{Markup, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialIcon {
    Facebook,
    Instagram,
    Twitter,
    TikTok,
}

impl SocialIcon {
    /// Resolve from the link's `icon`, then its `platform`. Unknown names
    /// fall back to Facebook.
    pub fn for_link(link: &SocialLink) -> Self {
        let name = link.icon.as_deref().unwrap_or(&link.platform);
        match name.to_ascii_lowercase().as_str() {
            "instagram" => SocialIcon::Instagram,
            "twitter" | "x" => SocialIcon::Twitter,
            "tiktok" => SocialIcon::TikTok,
            _ => SocialIcon::Facebook,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SocialIcon::Facebook => "facebook",
            SocialIcon::Instagram => "instagram",
            SocialIcon::Twitter => "twitter",
            SocialIcon::TikTok => "tiktok",
        }
    }
}

#[derive(Debug, Default)]
pub struct FooterSection;

impl Section for FooterSection {
    fn name(&self) -> SectionName {
        SectionName::Footer
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        let Some(doc) = view.ready() else {
            return Ok(section_placeholder(SectionName::Footer, "Loading..."));
        };
        let footer: Footer = doc.section("footer")?;
        let brand: Brand = doc.section("brand")?;

        Ok(html! {
            footer #footer.site-footer {
                div.container.footer-grid {
                    div.footer-brand {
                        span.brand { (brand.name) }
                        @if let Some(tagline) = &brand.tagline {
                            p.tagline { (tagline) }
                        }
                        @if !footer.social.is_empty() {
                            div.social-links {
                                @for link in &footer.social {
                                    a.social-link
                                        href=(link.href)
                                        aria-label=(link.platform)
                                        data-icon=(SocialIcon::for_link(link).as_str())
                                        rel="noopener" {}
                                }
                            }
                        }
                    }
                    @for column in &footer.sections {
                        div.footer-column {
                            h4 { (column.title) }
                            ul {
                                @for link in &column.links {
                                    li { (footer_link(link)) }
                                }
                            }
                        }
                    }
                }
                @if let Some(copyright) = &footer.copyright {
                    div.container.copyright {
                        p { (copyright) }
                    }
                }
            }
        })
    }
}

/// In-page targets scroll; anything else is an ordinary link.
fn footer_link(link: &FooterLink) -> Markup {
    match parse_anchor(&link.href) {
        Ok(anchor) => html! {
            a href=(link.href) data-scroll-to=(anchor.as_str()) { (link.name) }
        },
        Err(_) => html! {
            a href=(link.href) { (link.name) }
        },
    }
}
