//! Auto-rotating image gallery.
//!
//! [`GalleryController`] owns exactly one piece of mutable state, the current
//! image index, and is the only thing that changes it. Both entry points, the
//! recurring timer ([`on_timer`](GalleryController::on_timer)) and manual
//! selection ([`go_to`](GalleryController::go_to)), funnel into the same
//! transition function, so every change surfaces as one [`GalleryTransition`]
//! (old index exits, new index enters). How that transition is animated is
//! the hosting section's business.
//!
//! ## Timer Rules
//!
//! - One image or none: the timer is never armed and the index stays at 0.
//! - Two or more: a repeating timer advances `(index + 1) % len`.
//! - Manual selection does not touch the timer. The next automatic advance
//!   keeps the phase of the previous automatic one.
//! - [`stop`](GalleryController::stop) is idempotent and must run when the
//!   hosting widget goes away; [`sync`](GalleryController::sync) re-arms
//!   against new parameters without ever leaving two timers behind.

use crate::scheduler::{TimerHost, TimerId};
use crate::types::ImageRef;
use maud::{Markup, html};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    #[error("image index {index} is out of range for {len} images")]
    OutOfRange { index: usize, len: usize },
}

/// One observable index change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryTransition {
    pub exit: usize,
    pub enter: usize,
}

#[derive(Debug, Default)]
pub struct GalleryController {
    images: Vec<ImageRef>,
    current: usize,
    interval_ms: u64,
    timer: Option<TimerId>,
}

impl GalleryController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an image list and start rotating if there is
    /// anything to rotate. The index starts at 0.
    pub fn start(&mut self, host: &mut dyn TimerHost, images: Vec<ImageRef>, interval_ms: u64) {
        self.stop(host);
        self.images = images;
        self.interval_ms = interval_ms;
        self.current = 0;
        self.arm(host);
    }

    /// Follow new parameters. Returns true when the timer was torn down and
    /// re-armed (or dropped) because the images or the interval changed.
    ///
    /// The current index is kept while it is still in range.
    pub fn sync(
        &mut self,
        host: &mut dyn TimerHost,
        images: &[ImageRef],
        interval_ms: u64,
    ) -> bool {
        if self.images == images && self.interval_ms == interval_ms {
            return false;
        }
        self.stop(host);
        self.images = images.to_vec();
        self.interval_ms = interval_ms;
        if self.current >= self.images.len() {
            self.current = 0;
        }
        self.arm(host);
        true
    }

    fn arm(&mut self, host: &mut dyn TimerHost) {
        if self.images.len() > 1 {
            let id = host.arm_repeating(self.interval_ms);
            tracing::trace!(?id, every_ms = self.interval_ms, "gallery timer armed");
            self.timer = Some(id);
        }
    }

    /// Cancel the timer. Safe to call when never started or already stopped.
    pub fn stop(&mut self, host: &mut dyn TimerHost) {
        if let Some(id) = self.timer.take() {
            host.disarm(id);
            tracing::trace!(?id, "gallery timer disarmed");
        }
    }

    /// Handle a timer firing. Ids that are not this controller's live timer
    /// are ignored.
    pub fn on_timer(&mut self, id: TimerId) -> Option<GalleryTransition> {
        if self.timer != Some(id) || self.images.len() <= 1 {
            return None;
        }
        let next = (self.current + 1) % self.images.len();
        self.transition(next)
    }

    /// Jump to `index` without resetting the timer's phase.
    pub fn go_to(&mut self, index: usize) -> Result<Option<GalleryTransition>, GalleryError> {
        if index >= self.images.len() {
            return Err(GalleryError::OutOfRange {
                index,
                len: self.images.len(),
            });
        }
        Ok(self.transition(index))
    }

    fn transition(&mut self, enter: usize) -> Option<GalleryTransition> {
        let exit = self.current;
        if exit == enter {
            return None;
        }
        self.current = enter;
        Some(GalleryTransition { exit, enter })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.images.get(self.current)
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether a timer is armed.
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }
}

/// Gallery markup keyed by the current index.
///
/// Every image is emitted so the embedded script can keep rotating in the
/// browser; only the current one is visible.
pub fn render_gallery(gallery: &GalleryController) -> Markup {
    let images = gallery.images();
    html! {
        @if images.is_empty() {
            div.gallery.gallery-empty {
                div.gallery-placeholder { "No images available" }
            }
        } @else {
            div.gallery
                data-gallery
                data-interval=(gallery.interval_ms())
                data-current=(gallery.current())
            {
                @for (idx, image) in images.iter().enumerate() {
                    @let is_current = idx == gallery.current();
                    img.gallery-image.current[is_current]
                        src=(image.src)
                        alt=(image.alt)
                        data-index=(idx)
                        hidden[!is_current]
                        loading="lazy";
                }
                @if images.len() > 1 {
                    div.gallery-indicators {
                        @for idx in 0..images.len() {
                            button.gallery-indicator.current[idx == gallery.current()]
                                type="button"
                                data-index=(idx)
                                aria-label={ "Go to image " (idx + 1) } {}
                        }
                    }
                }
            }
        }
    }
}
