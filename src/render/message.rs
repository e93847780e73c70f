//! Assistant message rendering
//!
//! Turns message text with citation markers into HTML, in one of two modes:
//!
//! - **Inline**: each marker becomes a button labelled with the resolved
//!   `document: section` title. Prose between markers is rendered as
//!   independent markdown fragments.
//! - **Numbered**: markers become numbered pills and a collapsible source
//!   list is appended after the message.

use std::fmt::Write as _;
use std::str::FromStr;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use serde::{Deserialize, Serialize};

use super::markdown::{render_markdown, render_markdown_with_citations};
use super::segment::{split_message_into_parts, MessagePart};
use crate::citation::number_citations;
use crate::lookup::DocumentLookup;

/// Citation rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationMode {
    #[default]
    Inline,
    Numbered,
}

impl FromStr for CitationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "numbered" => Ok(Self::Numbered),
            other => Err(format!("unknown citation mode: {}", other)),
        }
    }
}

/// A citation as it was rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCitation {
    /// Assigned number (numbered mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
    /// Filename as written in the marker
    pub filename: String,
    pub section_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    /// Text shown for the citation
    pub label: String,
    /// Whether the document resolved, making the citation clickable
    pub resolved: bool,
}

/// Rendered HTML plus the citations it contains
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub html: String,
    pub mode: CitationMode,
    pub citations: Vec<RenderedCitation>,
}

/// Renders messages against a share's document lookup
pub struct MessageRenderer<'a> {
    lookup: &'a DocumentLookup,
    mode: CitationMode,
}

impl<'a> MessageRenderer<'a> {
    pub fn new(lookup: &'a DocumentLookup, mode: CitationMode) -> Self {
        Self { lookup, mode }
    }

    pub fn render(&self, content: &str) -> RenderedMessage {
        match self.mode {
            CitationMode::Inline => self.render_inline(content),
            CitationMode::Numbered => self.render_numbered(content),
        }
    }

    /// Resolve a citation's titles through the lookup
    ///
    /// Label preference: `document: section`, then the document's display
    /// filename, then the filename as cited.
    pub fn resolve(&self, filename: &str, section_id: &str, number: Option<usize>) -> RenderedCitation {
        let document = self.lookup.lookup_by_filename(filename);
        let section = document.as_ref().and_then(|doc| doc.section(section_id));

        let label = match (&document, section) {
            (Some(doc), Some(section)) => format!("{}: {}", doc.display_title(), section.title),
            (Some(doc), None) => doc.filename.clone(),
            (None, _) => filename.to_string(),
        };

        RenderedCitation {
            number,
            filename: filename.to_string(),
            section_id: section_id.to_string(),
            document_id: document.as_ref().map(|doc| doc.id.clone()),
            document_title: document.as_ref().map(|doc| doc.display_title().to_string()),
            section_title: section.map(|s| s.title.clone()),
            label,
            resolved: document.is_some(),
        }
    }

    fn render_inline(&self, content: &str) -> RenderedMessage {
        let mut html = String::with_capacity(content.len() * 2);
        let mut citations = Vec::new();

        for part in split_message_into_parts(content) {
            match part {
                MessagePart::Text { content } => html.push_str(&render_markdown(&content)),
                MessagePart::Reference { reference, .. } => {
                    let citation = self.resolve(&reference.filename, &reference.section_id, None);
                    html.push_str(&inline_button(&citation));
                    citations.push(citation);
                }
            }
        }

        RenderedMessage {
            html,
            mode: CitationMode::Inline,
            citations,
        }
    }

    fn render_numbered(&self, content: &str) -> RenderedMessage {
        let numbered = number_citations(content);
        let citations: Vec<RenderedCitation> = numbered
            .citations
            .iter()
            .map(|c| self.resolve(&c.filename, &c.section_id, Some(c.number)))
            .collect();

        let mut html = render_markdown_with_citations(&numbered.content, |cited| {
            citations
                .get(cited.number.checked_sub(1)?)
                .filter(|c| c.filename == cited.filename && c.section_id == cited.section_id)
                .map(numbered_pill)
        });

        if !citations.is_empty() {
            html.push_str(&source_list(&citations));
        }

        RenderedMessage {
            html,
            mode: CitationMode::Numbered,
            citations,
        }
    }
}

fn data_attributes(citation: &RenderedCitation) -> String {
    let mut out = format!(
        r#" data-filename="{}" data-section-id="{}""#,
        attr(&citation.filename),
        attr(&citation.section_id)
    );
    if let Some(document_id) = &citation.document_id {
        let _ = write!(out, r#" data-document-id="{}""#, attr(document_id));
    }
    out
}

fn inline_button(citation: &RenderedCitation) -> String {
    if citation.resolved {
        format!(
            r#"<button type="button" class="citation-ref"{}>{}</button>"#,
            data_attributes(citation),
            text(&citation.label)
        )
    } else {
        format!(
            r#"<span class="citation-ref citation-unresolved">{}</span>"#,
            text(&citation.label)
        )
    }
}

fn numbered_pill(citation: &RenderedCitation) -> String {
    let number = citation.number.unwrap_or_default();
    if citation.resolved {
        format!(
            r#"<button type="button" class="citation-pill" data-citation="{}"{} title="{}">{}</button>"#,
            number,
            data_attributes(citation),
            attr(&citation.label),
            number
        )
    } else {
        format!(
            r#"<span class="citation-pill citation-unresolved" data-citation="{}" title="{}">{}</span>"#,
            number,
            attr(&citation.label),
            number
        )
    }
}

fn source_list(citations: &[RenderedCitation]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<details class="citation-sources"><summary>Sources ({})</summary><ol>"#,
        citations.len()
    );
    for citation in citations {
        let _ = write!(
            out,
            r#"<li data-citation="{}">{}</li>"#,
            citation.number.unwrap_or_default(),
            inline_button(citation)
        );
    }
    out.push_str("</ol></details>");
    out
}
