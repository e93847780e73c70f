//! Citation marker parsing
//!
//! Assistant responses reference document sections with inline markers:
//!
//! ```text
//! marker   = "[DOC:" filename ":" section "]"
//! filename = [a-zA-Z0-9 whitespace . _ -]+
//! section  = [a-zA-Z0-9 _ -]+
//! ```
//!
//! Parsing never fails. Anything that does not match the grammar exactly
//! (unterminated markers, illegal characters) is left in the text as-is.
//!
//! Two consumers exist:
//! - [`parse_references`] yields every marker with its byte span, used by the
//!   segmenter in `render`.
//! - [`number_citations`] renumbers distinct targets and rewrites markers into
//!   `cite://` markdown links for the numbered rendering mode.

mod numbered;
mod parser;
mod types;

pub use numbered::{
    citation_url, number_citations, parse_citation_url, NumberedCitation, NumberedMessage,
    CITATION_SCHEME,
};
pub use parser::{has_references, parse_references, MARKER_PREFIX};
pub use types::DocumentReference;
