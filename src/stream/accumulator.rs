//! Streaming assistant message accumulation

use futures::{pin_mut, Stream, StreamExt};
use serde::Deserialize;
use thiserror::Error;

use super::sse::SseDecoder;
use crate::citation::MARKER_PREFIX;
use crate::render::{split_message_into_parts, MessagePart};

/// Errors raised while consuming a response stream
#[derive(Debug, Error)]
pub enum StreamError {
    /// Underlying byte stream failed
    #[error("Stream transport error: {0}")]
    Transport(String),

    /// An event payload was not valid JSON of a known shape
    #[error("Invalid stream event: {0}")]
    Decode(String),

    /// The backend reported an error mid-stream
    #[error("Assistant response failed: {0}")]
    Remote(String),

    /// The stream ended before a completion event
    #[error("Stream ended before completion ({} bytes received)", partial.len())]
    Truncated { partial: String },
}

/// Payload of a `data:` line in the chat stream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    Chunk {
        content: String,
    },
    Done {
        #[serde(default, rename = "messageId")]
        message_id: Option<String>,
    },
    Error {
        message: String,
    },
    /// Frames of any other type (sources, status, ...) carry nothing to accumulate
    #[serde(other)]
    Unknown,
}

impl ChatStreamEvent {
    /// Decode an SSE data payload. The literal `[DONE]` ends the stream.
    pub fn parse(data: &str) -> Result<Self, StreamError> {
        let data = data.trim();
        if data == "[DONE]" {
            return Ok(ChatStreamEvent::Done { message_id: None });
        }
        serde_json::from_str(data).map_err(|e| StreamError::Decode(e.to_string()))
    }
}

fn is_filename_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '.' | '_' | '-')
}

fn is_section_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

/// Start of a trailing fragment that may still grow into a citation marker
fn pending_marker_start(content: &str) -> Option<usize> {
    let start = content.rfind('[')?;
    let tail = &content[start..];
    if tail.contains(']') {
        return None;
    }

    let prefix_len = tail.len().min(MARKER_PREFIX.len());
    if tail.as_bytes()[..prefix_len] != MARKER_PREFIX.as_bytes()[..prefix_len] {
        return None;
    }
    if prefix_len < MARKER_PREFIX.len() {
        return Some(start);
    }

    let body = &tail[MARKER_PREFIX.len()..];
    let (filename, section) = match body.split_once(':') {
        Some((filename, section)) => (filename, Some(section)),
        None => (body, None),
    };
    let plausible = filename.chars().all(is_filename_char)
        && section.map_or(true, |s| s.chars().all(is_section_char));

    plausible.then_some(start)
}

/// Accumulates streamed chunks into the full message text
#[derive(Debug, Default, Clone)]
pub struct MessageAccumulator {
    content: String,
    message_id: Option<String>,
    finished: bool,
}

impl MessageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) {
        self.content.push_str(chunk);
    }

    /// Apply a stream event. Returns `Ok(true)` once the message is complete.
    pub fn apply(&mut self, event: ChatStreamEvent) -> Result<bool, StreamError> {
        match event {
            ChatStreamEvent::Chunk { content } => {
                self.push(&content);
                Ok(false)
            }
            ChatStreamEvent::Done { message_id } => {
                self.message_id = message_id;
                self.finished = true;
                Ok(true)
            }
            ChatStreamEvent::Error { message } => Err(StreamError::Remote(message)),
            ChatStreamEvent::Unknown => {
                tracing::debug!("Ignoring unrecognised stream event");
                Ok(false)
            }
        }
    }

    /// Everything received so far
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Received text minus any trailing, possibly incomplete, citation
    /// marker. Once finished, the whole content is stable.
    pub fn stable_content(&self) -> &str {
        if self.finished {
            return &self.content;
        }
        match pending_marker_start(&self.content) {
            Some(start) => &self.content[..start],
            None => &self.content,
        }
    }

    /// Segments of the stable content, safe to render mid-stream
    pub fn stable_parts(&self) -> Vec<MessagePart> {
        split_message_into_parts(self.stable_content())
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// Drive an SSE byte stream to completion
pub async fn accumulate<S, B, E>(stream: S) -> Result<MessageAccumulator, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    accumulate_with(stream, |_| {}).await
}

/// Drive an SSE byte stream to completion, calling `on_update` after every
/// chunk is applied so the caller can re-render the stable content.
pub async fn accumulate_with<S, B, E, F>(
    stream: S,
    mut on_update: F,
) -> Result<MessageAccumulator, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
    F: FnMut(&MessageAccumulator),
{
    pin_mut!(stream);
    let mut decoder = SseDecoder::new();
    let mut accumulator = MessageAccumulator::new();

    while let Some(item) = stream.next().await {
        let bytes = item.map_err(|e| StreamError::Transport(e.to_string()))?;
        for event in decoder.feed(bytes.as_ref()) {
            if accumulator.apply(ChatStreamEvent::parse(&event.data)?)? {
                on_update(&accumulator);
                return Ok(accumulator);
            }
            on_update(&accumulator);
        }
    }

    if let Some(event) = decoder.finish() {
        if accumulator.apply(ChatStreamEvent::parse(&event.data)?)? {
            on_update(&accumulator);
            return Ok(accumulator);
        }
    }

    tracing::warn!(
        "Assistant stream ended without completion after {} bytes",
        accumulator.content().len()
    );
    Err(StreamError::Truncated {
        partial: accumulator.into_content(),
    })
}
