//! End-to-end page sessions driven through the public API.
//!
//! Every test mounts a real page over the fixture content document and moves
//! its virtual clock by hand, so timestamps in the assertions are exact.

use serde_json::{Value, json};
use simple_landing::boundary::{Deferred, LoadState};
use simple_landing::config::SiteConfig;
use simple_landing::content::ContentDocument;
use simple_landing::event::{Interaction, InteractionError, PageEvent};
use simple_landing::gallery::GalleryTransition;
use simple_landing::page::Page;
use simple_landing::sections::{ForcedFailure, SectionRegistry, build_section};
use simple_landing::store::{PendingSource, StaticSource};
use simple_landing::types::SectionName;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

// =========================================================================
// Helpers
// =========================================================================

fn fixture_root() -> Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content/content.yaml");
    let text = std::fs::read_to_string(path).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

fn fixture_with(edit: impl FnOnce(&mut Value)) -> ContentDocument {
    let mut root = fixture_root();
    edit(&mut root);
    ContentDocument::from_value(root).unwrap()
}

fn mount(document: ContentDocument, registry: SectionRegistry) -> Page {
    let source = Rc::new(StaticSource(document));
    Page::mount(SiteConfig::default(), source, registry)
}

fn transitions(events: &[PageEvent]) -> Vec<GalleryTransition> {
    events
        .iter()
        .filter_map(|e| match e {
            PageEvent::GalleryTransition { transition, .. } => Some(*transition),
            _ => None,
        })
        .collect()
}

fn t(exit: usize, enter: usize) -> GalleryTransition {
    GalleryTransition { exit, enter }
}

// =========================================================================
// Gallery rotation
// =========================================================================

#[test]
fn empty_gallery_shows_placeholder_and_arms_nothing() {
    let doc = fixture_with(|root| root["about"]["images"] = json!([]));
    let mut page = mount(doc, SectionRegistry::standard());
    page.advance(0);

    assert_eq!(page.active_timers(), 0);
    assert!(page.render().into_string().contains("No images available"));
    assert!(transitions(&page.advance(30_000)).is_empty());
}

#[test]
fn single_image_never_rotates() {
    let doc = fixture_with(|root| {
        root["about"]["images"] = json!([{ "src": "assets/one.jpg", "alt": "One" }])
    });
    let mut page = mount(doc, SectionRegistry::standard());
    page.advance(0);

    assert!(transitions(&page.advance(50_000)).is_empty());
    assert!(page.render().into_string().contains(r#"data-current="0""#));
}

#[test]
fn three_images_advance_twice_in_twelve_seconds() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);

    let timeline = page.advance_timeline(12_000);
    let stamped: Vec<(u64, GalleryTransition)> = timeline
        .iter()
        .filter_map(|(at, e)| match e {
            PageEvent::GalleryTransition { transition, .. } => Some((*at, *transition)),
            _ => None,
        })
        .collect();
    assert_eq!(stamped, vec![(5_000, t(0, 1)), (10_000, t(1, 2))]);
    assert!(page.render().into_string().contains(r#"data-current="2""#));
}

#[test]
fn index_wraps_modulo_image_count() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);

    let events = page.advance(7 * 5_000);
    let entered: Vec<usize> = transitions(&events).iter().map(|t| t.enter).collect();
    assert_eq!(entered, vec![1, 2, 0, 1, 2, 0, 1]);
}

#[test]
fn manual_selection_keeps_the_rotation_phase() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);
    page.advance(1_000);

    let picked = page
        .interact(SectionName::About, Interaction::SelectImage(2))
        .unwrap();
    assert_eq!(transitions(&picked), vec![t(0, 2)]);

    // Next automatic advance is still due at 5000, not 6000.
    let timeline = page.advance_timeline(4_000);
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].0, 5_000);
    assert_eq!(transitions(&[timeline[0].1.clone()]), vec![t(2, 0)]);
}

#[test]
fn out_of_range_selection_is_rejected() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);

    let err = page
        .interact(SectionName::About, Interaction::SelectImage(9))
        .unwrap_err();
    assert!(matches!(err, InteractionError::Gallery(_)));
    assert!(page.render().into_string().contains(r#"data-current="0""#));
}

#[test]
fn unmounted_gallery_stops_changing() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);
    page.advance(5_000);
    page.unmount();

    assert_eq!(page.active_timers(), 0);
    assert!(page.advance(60_000).is_empty());
}

// =========================================================================
// Deferred sections
// =========================================================================

#[test]
fn slow_section_does_not_hold_back_siblings() {
    let registry = SectionRegistry::standard().with_loader(SectionName::Products, || {
        Box::new(Deferred::after(8_000, build_section(SectionName::Products)))
    });
    let mut page = mount(fixture_with(|_| {}), registry);

    page.advance(0);
    for (name, state) in page.load_states() {
        let expected = if name == SectionName::Products {
            LoadState::Pending
        } else {
            LoadState::Ready
        };
        assert_eq!(state, expected, "{name}");
    }
    let html = page.render().into_string();
    assert!(html.contains(r#"class="section-pending""#));
    assert!(html.contains(r#"id="features""#));

    let events = page.advance(8_000);
    assert!(events.contains(&PageEvent::SectionReady {
        section: SectionName::Products,
        at: 8_000,
    }));
    assert!(
        !page
            .render()
            .into_string()
            .contains(r#"class="section-pending""#)
    );
}

#[test]
fn unpublished_content_renders_placeholders_everywhere() {
    let mut page = Page::mount(
        SiteConfig::default(),
        Rc::new(PendingSource),
        SectionRegistry::standard(),
    );
    page.advance(0);

    let html = page.render().into_string();
    assert!(!page.has_error());
    assert!(html.contains(r#"aria-busy="true""#));
    assert!(!html.contains("Oops! Something went wrong"));
    assert_eq!(page.active_timers(), 0);
}

// =========================================================================
// Failure containment
// =========================================================================

#[test]
fn forced_failure_is_caught_once_and_replaces_the_page() {
    let registry = SectionRegistry::standard().with_loader(SectionName::Features, || {
        Box::new(Deferred::ready(Box::new(ForcedFailure {
            name: SectionName::Features,
            message: "boom".into(),
        })))
    });
    let mut page = mount(fixture_with(|_| {}), registry);

    let events = page.advance(0);
    let caught: Vec<&PageEvent> = events
        .iter()
        .filter(|e| matches!(e, PageEvent::FailureCaught { .. }))
        .collect();
    assert_eq!(caught.len(), 1);
    assert_eq!(page.captured().unwrap().section, SectionName::Features);

    let html = page.render().into_string();
    assert!(html.contains("Oops! Something went wrong"));
    assert!(html.contains(r#"data-action="reload""#));
    assert!(!html.contains(r#"id="home""#));
    assert_eq!(page.active_timers(), 0);

    assert!(page.advance(20_000).is_empty());
    assert_eq!(
        page.interact(SectionName::About, Interaction::SelectImage(1)),
        Err(InteractionError::PageFailed)
    );
}

#[test]
fn missing_required_field_is_a_page_failure() {
    let doc = fixture_with(|root| {
        if let Some(hero) = root["hero"].as_object_mut() {
            hero.remove("subtitle");
        }
    });
    let mut page = mount(doc, SectionRegistry::standard());
    page.advance(0);

    assert_eq!(page.captured().unwrap().section, SectionName::Hero);
    let html = page.render().into_string();
    assert!(html.contains("Oops! Something went wrong"));
}

#[test]
fn reload_starts_a_fresh_session() {
    let mounts = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&mounts);
    let registry = SectionRegistry::standard().with_loader(SectionName::Products, move || {
        counter.set(counter.get() + 1);
        if counter.get() == 1 {
            Box::new(Deferred::after(
                6_000,
                Box::new(ForcedFailure {
                    name: SectionName::Products,
                    message: "first load breaks".into(),
                }),
            ))
        } else {
            Box::new(Deferred::ready(build_section(SectionName::Products)))
        }
    });
    let mut page = mount(fixture_with(|_| {}), registry);
    page.advance(0);

    // The gallery has moved on before the failure lands.
    assert_eq!(transitions(&page.advance(5_000)), vec![t(0, 1)]);
    let events = page.advance(1_000);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, PageEvent::FailureCaught { .. }))
    );
    assert!(page.has_error());

    page.reload();
    assert_eq!(mounts.get(), 2);
    assert!(!page.has_error());
    page.advance(0);

    let html = page.render().into_string();
    assert!(!html.contains("Oops! Something went wrong"));
    assert!(html.contains(r#"data-current="0""#));
    assert_eq!(page.active_timers(), 1);
}

// =========================================================================
// Navigation
// =========================================================================

#[test]
fn navigation_scrolls_to_known_sections_only() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);

    let scroll = page.navigate("#about").unwrap();
    assert_eq!(scroll.anchor.as_str(), "about");
    assert!(scroll.smooth);

    let events = page
        .interact(
            SectionName::Navigation,
            Interaction::Navigate("#products".into()),
        )
        .unwrap();
    assert!(matches!(
        events.last(),
        Some(PageEvent::Navigate(req)) if req.anchor.as_str() == "products"
    ));

    assert!(matches!(
        page.navigate("#pricing"),
        Err(InteractionError::UnknownAnchor(_))
    ));
    assert!(matches!(
        page.navigate("https://example.com"),
        Err(InteractionError::Anchor(_))
    ));
}

#[test]
fn hero_is_reached_through_home() {
    let mut page = mount(fixture_with(|_| {}), SectionRegistry::standard());
    page.advance(0);

    let scroll = page.navigate("#home").unwrap();
    assert_eq!(scroll.anchor.as_str(), "home");
    assert_eq!(page.navigate("home").unwrap().anchor.as_str(), "home");
    assert!(matches!(
        page.navigate("#hero"),
        Err(InteractionError::UnknownAnchor(_))
    ));

    let html = page.render().into_string();
    assert!(html.contains(r#"id="home""#));
    assert!(html.contains(r#"data-scroll-to="home""#));
}
