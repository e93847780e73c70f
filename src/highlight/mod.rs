//! Section scroll and highlight
//!
//! Split in two layers:
//! - `scroll`: pure offset and animation math, testable without a viewer
//! - `coordinator`: the timed effect sequence over a [`HighlightSurface`]

mod coordinator;
mod scroll;

pub use coordinator::{HighlightCoordinator, HighlightOutcome, HighlightSurface, HIGHLIGHT_CLASS};
pub use scroll::{
    centered_scroll_top, plan_scroll, scroll_frames, ElementBox, HighlightTimings,
    ScrollContainer, ScrollPlan,
};
