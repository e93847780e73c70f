//! Citeline Server Library
//!
//! Citation handling for shared AI conversations: parsing `[DOC:file:section]`
//! markers out of assistant messages, resolving them against the documents of
//! a share link, and rendering them as navigable references.
//!
//! # Modules
//!
//! - `citation`: Marker parsing and numbering
//! - `lookup`: Per-share document lookup cache
//! - `render`: Message segmentation and HTML rendering
//! - `highlight`: Section scroll and highlight sequencing
//! - `stream`: Streamed assistant response accumulation
//!
//! The HTTP service in main.rs is built from `routes`, `state`, `config`
//! and `error`.

pub mod citation;
pub mod config;
pub mod error;
pub mod highlight;
pub mod lookup;
pub mod render;
pub mod routes;
pub mod state;
pub mod stream;
