//! Scroll offset calculation
//!
//! Pure geometry for bringing a section into view inside a scrollable
//! container (not the window). Units are CSS pixels.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Metrics of the scroll container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollContainer {
    /// Current scroll offset
    pub scroll_top: f64,
    /// Visible height
    pub client_height: f64,
    /// Total scrollable content height
    pub scroll_height: f64,
}

impl ScrollContainer {
    /// Largest valid `scroll_top`
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

/// Position of the target element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBox {
    /// Distance from the container's visible top edge to the element's top.
    /// Negative when the element is scrolled above the viewport.
    pub top: f64,
    pub height: f64,
}

/// Timing of the scroll-then-highlight sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTimings {
    /// Length of the scroll animation
    pub scroll_duration: Duration,
    /// Interval between animation frames
    pub frame_interval: Duration,
    /// Pause between the end of the scroll and applying the highlight
    pub highlight_delay: Duration,
    /// How long the highlight class stays on
    pub highlight_duration: Duration,
    /// Wait before the single retry when the element is not mounted yet
    pub mount_retry_delay: Duration,
}

impl Default for HighlightTimings {
    fn default() -> Self {
        Self {
            scroll_duration: Duration::from_millis(400),
            frame_interval: Duration::from_millis(16),
            highlight_delay: Duration::from_millis(150),
            highlight_duration: Duration::from_millis(2500),
            mount_retry_delay: Duration::from_millis(100),
        }
    }
}

/// Precomputed scroll animation and highlight schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPlan {
    pub target_scroll_top: f64,
    /// Successive `scroll_top` values, one per frame, ending at the target
    pub frames: Vec<f64>,
    pub frame_interval_ms: u64,
    pub highlight_delay_ms: u64,
    pub highlight_duration_ms: u64,
}

/// `scroll_top` that vertically centres the element, clamped to the
/// container's scroll range. Elements taller than the viewport are aligned
/// to the top instead.
pub fn centered_scroll_top(container: &ScrollContainer, element: &ElementBox) -> f64 {
    let element_offset = container.scroll_top + element.top;

    let target = if element.height >= container.client_height {
        element_offset
    } else {
        element_offset - (container.client_height - element.height) / 2.0
    };

    target.clamp(0.0, container.max_scroll_top())
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Sample an eased scroll from `from` to `to`. Always ends exactly at `to`.
pub fn scroll_frames(from: f64, to: f64, duration: Duration, frame_interval: Duration) -> Vec<f64> {
    if duration.is_zero() || frame_interval.is_zero() || (to - from).abs() < f64::EPSILON {
        return vec![to];
    }

    let count = (duration.as_secs_f64() / frame_interval.as_secs_f64()).ceil().max(1.0) as usize;
    let mut frames: Vec<f64> = (1..count)
        .map(|i| from + (to - from) * ease_in_out_cubic(i as f64 / count as f64))
        .collect();
    frames.push(to);
    frames
}

/// Build the full scroll plan for centring `element`
pub fn plan_scroll(
    container: &ScrollContainer,
    element: &ElementBox,
    timings: &HighlightTimings,
) -> ScrollPlan {
    let target = centered_scroll_top(container, element);
    ScrollPlan {
        target_scroll_top: target,
        frames: scroll_frames(
            container.scroll_top,
            target,
            timings.scroll_duration,
            timings.frame_interval,
        ),
        frame_interval_ms: timings.frame_interval.as_millis() as u64,
        highlight_delay_ms: timings.highlight_delay.as_millis() as u64,
        highlight_duration_ms: timings.highlight_duration.as_millis() as u64,
    }
}
