//! Message rendering
//!
//! - `segment`: lossless split of message text into prose and citations
//! - `markdown`: sanitising markdown renderer with `cite://` link hook
//! - `message`: inline and numbered citation rendering
//! - `navigate`: citation click resolution

mod markdown;
mod message;
mod navigate;
mod segment;

pub use markdown::{is_safe_url, render_markdown, render_markdown_with_citations};
pub use message::{CitationMode, MessageRenderer, RenderedCitation, RenderedMessage};
pub use navigate::{handle_citation_click, resolve_citation, CitationNavigator};
pub use segment::{join_parts, split_message_into_parts, MessagePart};
