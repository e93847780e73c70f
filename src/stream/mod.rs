//! Streamed assistant responses
//!
//! The chat backend answers with `text/event-stream`. [`SseDecoder`] turns
//! raw bytes into events; [`MessageAccumulator`] folds chunk events into the
//! message text and exposes the prefix that can be rendered without cutting
//! a citation marker in half.

mod accumulator;
mod sse;

pub use accumulator::{
    accumulate, accumulate_with, ChatStreamEvent, MessageAccumulator, StreamError,
};
pub use sse::{SseDecoder, SseEvent};
