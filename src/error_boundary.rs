//! Page-level failure containment.
//!
//! The [`ErrorBoundary`] wraps the whole composed page. The first failure any
//! section reports while rendering flips it into the apology view, and it
//! stays there: later renders never re-enter the subtree. The only way back
//! is a full reload, which builds a new boundary.

use crate::types::SectionName;
use maud::{Markup, html};

/// Whether the boundary has caught a failure. One-way for an instance's life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub has_error: bool,
}

/// The failure that switched the page to the apology view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFailure {
    pub section: SectionName,
    pub message: String,
}

impl CapturedFailure {
    pub fn new(section: SectionName, error: &impl std::fmt::Display) -> Self {
        Self {
            section,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    state: ErrorState,
    captured: Option<CapturedFailure>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ErrorState {
        self.state
    }

    pub fn has_error(&self) -> bool {
        self.state.has_error
    }

    pub fn captured(&self) -> Option<&CapturedFailure> {
        self.captured.as_ref()
    }

    /// Render the subtree, or the apology view once anything has failed.
    ///
    /// Whatever the subtree produced before failing is discarded.
    pub fn render(&mut self, subtree: impl FnOnce() -> Result<Markup, CapturedFailure>) -> Markup {
        if self.state.has_error {
            return apology_view();
        }
        match subtree() {
            Ok(markup) => markup,
            Err(failure) => {
                tracing::error!(
                    section = %failure.section,
                    message = %failure.message,
                    "render failure caught by page boundary"
                );
                self.state.has_error = true;
                self.captured = Some(failure);
                apology_view()
            }
        }
    }
}

/// Static view with a single full-reload action.
pub fn apology_view() -> Markup {
    html! {
        div.error-view role="alert" {
            div.card.error-card {
                h2 { "Oops! Something went wrong" }
                p { "We're sorry for the inconvenience. Please refresh the page to try again." }
                button.button.primary type="button" data-action="reload" { "Refresh Page" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn failure() -> CapturedFailure {
        CapturedFailure {
            section: SectionName::Products,
            message: "boom".into(),
        }
    }

    #[test]
    fn passes_through_while_healthy() {
        let mut boundary = ErrorBoundary::new();
        let html = boundary.render(|| Ok(html! { p { "fine" } })).into_string();
        assert_eq!(html, "<p>fine</p>");
        assert!(!boundary.has_error());
        assert!(boundary.captured().is_none());
    }

    #[test]
    fn first_failure_switches_to_apology() {
        let mut boundary = ErrorBoundary::new();
        let html = boundary.render(|| Err(failure())).into_string();
        assert!(html.contains("Oops! Something went wrong"));
        assert!(html.contains(r#"data-action="reload""#));
        assert_eq!(boundary.state(), ErrorState { has_error: true });
        assert_eq!(boundary.captured(), Some(&failure()));
    }

    #[test]
    fn subtree_is_never_re_entered() {
        let mut boundary = ErrorBoundary::new();
        boundary.render(|| Err(failure()));

        let calls = Cell::new(0);
        let html = boundary
            .render(|| {
                calls.set(calls.get() + 1);
                Ok(html! { p { "recovered?" } })
            })
            .into_string();
        assert_eq!(calls.get(), 0);
        assert!(!html.contains("recovered?"));
    }

    #[test]
    fn keeps_the_first_failure() {
        let mut boundary = ErrorBoundary::new();
        boundary.render(|| Err(failure()));
        boundary.render(|| {
            Err(CapturedFailure {
                section: SectionName::About,
                message: "second".into(),
            })
        });
        assert_eq!(
            boundary.captured().map(|f| f.section),
            Some(SectionName::Products)
        );
    }
}
