//! Feature grid. Each item names an icon; unknown or missing names fall back
//! to the leaf.

use super::{RenderError, Section, section_placeholder};
use crate::content::Features;
use crate::store::ContentView;
use crate::types::SectionName;
use maud::{Markup, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureIcon {
    Leaf,
    Recycle,
    Heart,
}

impl FeatureIcon {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("recycle") => FeatureIcon::Recycle,
            Some("heart") => FeatureIcon::Heart,
            _ => FeatureIcon::Leaf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureIcon::Leaf => "leaf",
            FeatureIcon::Recycle => "recycle",
            FeatureIcon::Heart => "heart",
        }
    }
}

#[derive(Debug, Default)]
pub struct FeaturesSection;

impl Section for FeaturesSection {
    fn name(&self) -> SectionName {
        SectionName::Features
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        let Some(doc) = view.ready() else {
            return Ok(section_placeholder(SectionName::Features, "Loading Features..."));
        };
        let features: Features = doc.section("features")?;

        Ok(html! {
            section #features.section.features {
                div.container {
                    header.section-header {
                        h2 { (features.section_title) }
                        @if let Some(subtitle) = &features.subtitle {
                            p.section-subtitle { (subtitle) }
                        }
                    }
                    div.feature-grid {
                        @for feature in &features.items {
                            @let icon = FeatureIcon::from_name(feature.icon.as_deref());
                            article.card.feature-card {
                                span.icon data-icon=(icon.as_str()) aria-hidden="true" {}
                                h3 { (feature.title) }
                                p { (feature.description) }
                            }
                        }
                    }
                }
            }
        })
    }
}
