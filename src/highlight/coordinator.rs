//! Scroll-and-highlight sequencing
//!
//! The platform layer implements [`HighlightSurface`]; the coordinator owns
//! the timing. Every request gets a new highlight key, so re-requesting the
//! section that is already highlighted replays the highlight, and a newer
//! request always wins over an older one still in flight.

use parking_lot::Mutex;
use tokio::time::sleep;

use super::scroll::{plan_scroll, ElementBox, HighlightTimings, ScrollContainer};

/// CSS class applied to the highlighted section
pub const HIGHLIGHT_CLASS: &str = "section-highlight";

/// Platform effects needed to scroll to and highlight a section
pub trait HighlightSurface: Send + Sync {
    /// Current metrics of the designated scroll container
    fn container(&self) -> Option<ScrollContainer>;

    /// Position of the section's element, if it is mounted
    fn element(&self, section_id: &str) -> Option<ElementBox>;

    fn set_scroll_top(&self, scroll_top: f64);

    fn add_highlight(&self, section_id: &str);

    fn remove_highlight(&self, section_id: &str);
}

/// How a highlight request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// Scrolled and highlighted
    Highlighted { key: u64 },
    /// A newer request took over before the highlight was applied
    Superseded { key: u64 },
    /// Element (or scroll container) missing after the retry
    NotFound { key: u64 },
}

#[derive(Default)]
struct HighlightState {
    key: u64,
    active: Option<String>,
}

/// Drives a [`HighlightSurface`]; at most one section is highlighted at a time
pub struct HighlightCoordinator<S> {
    surface: S,
    timings: HighlightTimings,
    state: Mutex<HighlightState>,
}

impl<S: HighlightSurface> HighlightCoordinator<S> {
    pub fn new(surface: S, timings: HighlightTimings) -> Self {
        Self {
            surface,
            timings,
            state: Mutex::new(HighlightState::default()),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Key of the most recent request
    pub fn current_key(&self) -> u64 {
        self.state.lock().key
    }

    /// Section currently carrying the highlight class
    pub fn active_section(&self) -> Option<String> {
        self.state.lock().active.clone()
    }

    /// Claim a new key and drop any existing highlight
    fn begin(&self) -> u64 {
        let mut state = self.state.lock();
        state.key += 1;
        if let Some(previous) = state.active.take() {
            self.surface.remove_highlight(&previous);
        }
        state.key
    }

    fn is_current(&self, key: u64) -> bool {
        self.state.lock().key == key
    }

    async fn locate(&self, section_id: &str) -> Option<ElementBox> {
        if let Some(element) = self.surface.element(section_id) {
            return Some(element);
        }
        // The viewer may still be mounting the target document
        sleep(self.timings.mount_retry_delay).await;
        self.surface.element(section_id)
    }

    /// Scroll `section_id` into the centre of the container and flash it
    pub async fn highlight_section(&self, section_id: &str) -> HighlightOutcome {
        let key = self.begin();

        let element = match self.locate(section_id).await {
            Some(element) => element,
            None => {
                tracing::warn!("Section element not found for highlight: {}", section_id);
                return HighlightOutcome::NotFound { key };
            }
        };
        if !self.is_current(key) {
            return HighlightOutcome::Superseded { key };
        }

        let Some(container) = self.surface.container() else {
            tracing::warn!("Scroll container not available for section {}", section_id);
            return HighlightOutcome::NotFound { key };
        };

        let plan = plan_scroll(&container, &element, &self.timings);
        for frame in plan.frames {
            if !self.is_current(key) {
                return HighlightOutcome::Superseded { key };
            }
            self.surface.set_scroll_top(frame);
            sleep(self.timings.frame_interval).await;
        }

        sleep(self.timings.highlight_delay).await;
        {
            let mut state = self.state.lock();
            if state.key != key {
                return HighlightOutcome::Superseded { key };
            }
            self.surface.add_highlight(section_id);
            state.active = Some(section_id.to_string());
        }

        sleep(self.timings.highlight_duration).await;
        {
            let mut state = self.state.lock();
            if state.key == key && state.active.as_deref() == Some(section_id) {
                self.surface.remove_highlight(section_id);
                state.active = None;
            }
        }

        HighlightOutcome::Highlighted { key }
    }
}
