//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Build / Check
//!
//! ```text
//! Leafy
//!     Content: content.yaml (fingerprint 3f9a0c1d2e4b5a69)
//! Sections
//! 001 navigation ready
//! 002 hero ready
//! ...
//! Generated index.html, 4 assets
//! ```
//!
//! ## Simulate
//!
//! ```text
//!       0 ms  hero ready
//!    4000 ms  about image 1 → 2
//!    6500 ms  scroll to #products
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::boundary::LoadState;
use crate::event::PageEvent;
use crate::generate::{GenerateSummary, RenderedSite};
use crate::types::SectionName;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn state_label(state: LoadState) -> &'static str {
    match state {
        LoadState::Pending => "pending",
        LoadState::Ready => "ready",
        LoadState::Failed => "failed",
    }
}

fn section_lines(sections: &[(SectionName, LoadState)]) -> Vec<String> {
    let mut lines = vec!["Sections".to_string()];
    for (pos, (name, state)) in sections.iter().enumerate() {
        lines.push(format!("{} {} {}", format_index(pos + 1), name, state_label(*state)));
    }
    lines
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of composing the page without writing it.
pub fn format_check_output(site: &RenderedSite, content_file: &str) -> Vec<String> {
    let mut lines = vec![
        site.title.clone(),
        format!(
            "{}Content: {} (fingerprint {})",
            indent(1),
            content_file,
            site.fingerprint
        ),
    ];
    lines.extend(section_lines(&site.sections));
    lines
}

pub fn print_check_output(site: &RenderedSite, content_file: &str) {
    for line in format_check_output(site, content_file) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format build output: the check summary plus what was written.
pub fn format_generate_output(summary: &GenerateSummary, content_file: &str) -> Vec<String> {
    let mut lines = format_check_output(&summary.site, content_file);
    let index = summary
        .index_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| summary.index_path.display().to_string());
    let assets = match summary.assets_copied {
        1 => "1 asset".to_string(),
        n => format!("{} assets", n),
    };
    lines.push(String::new());
    lines.push(format!("Generated {}, {}", index, assets));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary, content_file: &str) {
    for line in format_generate_output(summary, content_file) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

/// One line per page event. Image numbers are 1-based, as on the indicators.
pub fn format_event(at: u64, event: &PageEvent) -> String {
    let what = match event {
        PageEvent::SectionReady { section, .. } => format!("{} ready", section),
        PageEvent::GalleryTransition {
            section,
            transition,
        } => format!(
            "{} image {} → {}",
            section,
            transition.exit + 1,
            transition.enter + 1
        ),
        PageEvent::Navigate(request) => format!("scroll to #{}", request.anchor),
        PageEvent::FailureCaught { section, message } => {
            format!("FAILED in {}: {}", section, message)
        }
    };
    format!("{:>7} ms  {}", at, what)
}

pub fn format_timeline(timeline: &[(u64, PageEvent)]) -> Vec<String> {
    if timeline.is_empty() {
        return vec!["(no events)".to_string()];
    }
    timeline
        .iter()
        .map(|(at, e)| format_event(*at, e))
        .collect()
}

pub fn print_timeline(timeline: &[(u64, PageEvent)]) {
    for line in format_timeline(timeline) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::parse_anchor;
    use crate::event::ScrollRequest;
    use crate::gallery::GalleryTransition;
    use std::path::PathBuf;

    fn site() -> RenderedSite {
        RenderedSite {
            title: "Leafy".into(),
            fingerprint: "0123456789abcdef".into(),
            sections: vec![
                (SectionName::Navigation, LoadState::Ready),
                (SectionName::Hero, LoadState::Ready),
            ],
            html: String::new(),
        }
    }

    #[test]
    fn check_lists_sections_by_position() {
        let lines = format_check_output(&site(), "content.yaml");
        assert_eq!(
            lines,
            vec![
                "Leafy",
                "    Content: content.yaml (fingerprint 0123456789abcdef)",
                "Sections",
                "001 navigation ready",
                "002 hero ready",
            ]
        );
    }

    #[test]
    fn generate_reports_asset_count() {
        let summary = GenerateSummary {
            site: site(),
            index_path: PathBuf::from("dist/index.html"),
            assets_copied: 1,
        };
        let lines = format_generate_output(&summary, "content.yaml");
        assert_eq!(lines.last().unwrap(), "Generated index.html, 1 asset");
    }

    #[test]
    fn events_are_one_line_each() {
        let timeline = vec![
            (
                0,
                PageEvent::SectionReady {
                    section: SectionName::Hero,
                    at: 0,
                },
            ),
            (
                5_000,
                PageEvent::GalleryTransition {
                    section: SectionName::About,
                    transition: GalleryTransition { exit: 0, enter: 1 },
                },
            ),
            (
                6_500,
                PageEvent::Navigate(ScrollRequest::smooth(parse_anchor("#products").unwrap())),
            ),
        ];
        assert_eq!(
            format_timeline(&timeline),
            vec![
                "      0 ms  hero ready",
                "   5000 ms  about image 1 → 2",
                "   6500 ms  scroll to #products",
            ]
        );
    }

    #[test]
    fn empty_timeline_says_so() {
        assert_eq!(format_timeline(&[]), vec!["(no events)"]);
    }
}
