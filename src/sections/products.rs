//! Product grid with optional bestseller badges.

use super::{RenderError, Section, section_placeholder};
use crate::content::{Product, Products};
use crate::store::ContentView;
use crate::types::SectionName;
use maud::{Markup, html};

#[derive(Debug, Default)]
pub struct ProductsSection;

impl Section for ProductsSection {
    fn name(&self) -> SectionName {
        SectionName::Products
    }

    fn render(&self, view: &ContentView) -> Result<Markup, RenderError> {
        let Some(doc) = view.ready() else {
            return Ok(section_placeholder(SectionName::Products, "Loading Products..."));
        };
        let products: Products = doc.section("products")?;

        Ok(html! {
            section #products.section.products {
                div.container {
                    header.section-header {
                        h2 { (products.section_title) }
                        @if let Some(subtitle) = &products.subtitle {
                            p.section-subtitle { (subtitle) }
                        }
                    }
                    div.product-grid {
                        @for product in &products.items {
                            (product_card(product))
                        }
                    }
                    @if let Some(cta) = &products.cta_button {
                        div.section-cta {
                            button.button.outline type="button" { (cta) }
                        }
                    }
                }
            }
        })
    }
}

fn product_card(product: &Product) -> Markup {
    html! {
        article.card.product-card {
            div.product-media {
                @if product.bestseller {
                    span.badge { "★ Bestseller" }
                }
                img src=(product.image) alt=(product.name) loading="lazy";
            }
            div.card-body {
                h3 { (product.name) }
                p.product-description { (product.description) }
                div.product-footer {
                    span.price { (product.price.to_string()) }
                    button.button.primary type="button"
                        aria-label={ "Add " (product.name) " to cart" } {
                        "Add to cart"
                    }
                }
            }
        }
    }
}
