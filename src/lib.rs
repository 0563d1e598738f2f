//! # Simple Landing
//!
//! A content-driven single-page marketing site. One content document holds
//! every word on the page: navigation, hero, product cards, feature cards,
//! the about story with its image gallery, and the footer. The crate
//! composes that document into a page whose sections load independently,
//! whose gallery rotates on a timer, and whose failures never leave a
//! half-rendered page behind.
//!
//! # Architecture: One Page Session
//!
//! A [`page::Page`] is a single mounted session. Everything it does happens
//! on a deterministic virtual clock, so the same page logic drives both the
//! static build and the `simulate` command:
//!
//! ```text
//! content source ─▶ ContentStore ─▶ ErrorBoundary ─▶ SectionBoundary × 6 ─▶ sections
//!                                        │
//!                                        └─▶ apology view (after the first failure)
//! ```
//!
//! - The **content store** publishes the document once it has loaded and
//!   hands every section a read-only view of it.
//! - Each **section boundary** shows a placeholder until its section has
//!   been acquired, independently of its siblings.
//! - The **error boundary** catches the first failure anywhere below it and
//!   swaps the whole page for an apology with a reload action.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | Composition root: mounts store, error boundary and section boundaries |
//! | [`store`] | Content store, content context and the sources a document is loaded from |
//! | [`content`] | The content document and the typed shapes of its sections |
//! | [`boundary`] | Deferred section acquisition with a loading placeholder |
//! | [`error_boundary`] | Page-wide failure capture and the apology view |
//! | [`sections`] | The six page sections and the registry that decides how each is acquired |
//! | [`gallery`] | Auto-rotating image gallery controller |
//! | [`scheduler`] | Virtual clock and cancellable timers |
//! | [`anchor`] | In-page anchor parsing for navigation links |
//! | [`event`] | What a page reports and what a visitor can do to it |
//! | [`config`] | `config.toml` loading, validation and CSS generation |
//! | [`generate`] | Static build: settle the page and write `index.html` |
//! | [`output`] | CLI output formatting |
//! | [`types`] | Small shared types (`SectionName`, `ImageRef`) |
//!
//! # Design Decisions
//!
//! ## Failures Are Values
//!
//! Sections return `Result<Markup, RenderError>` from every render. A
//! missing content slice, a broken loader and a deliberately failing test
//! section all travel the same path to the error boundary. Nothing relies on
//! unwinding.
//!
//! ## Deterministic Time
//!
//! Timers live in a [`scheduler::Scheduler`] that only moves when the owner
//! advances it. Rotation intervals, loader delays and manual gallery picks
//! are all reproducible, which is what lets the tests pin exact timestamps.
//!
//! ## Manual Selection Keeps the Rhythm
//!
//! Picking a gallery image by hand changes the current image without
//! touching the rotation timer. The next automatic advance happens on the
//! original schedule, continuing from the picked image.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a build error and there is no template directory to ship. Plain text
//! fields are escaped. About paragraphs are Markdown rendered as trusted HTML,
//! so inline HTML in them reaches the page unchanged: the content document is
//! treated as part of the site, not as user input.

pub mod anchor;
pub mod boundary;
pub mod config;
pub mod content;
pub mod error_boundary;
pub mod event;
pub mod gallery;
pub mod generate;
pub mod output;
pub mod page;
pub mod scheduler;
pub mod sections;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
