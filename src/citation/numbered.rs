//! Numbered citation mode
//!
//! Distinct `(filename, section)` targets are numbered from 1 in order of
//! first occurrence. Every marker is replaced by a markdown link whose
//! destination uses the internal `cite://` scheme:
//!
//! ```text
//! [DOC:Board Memo.docx:intro]  ->  [1](cite://1/Board%20Memo.docx/intro)
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::parser::parse_references;

/// Scheme prefix of rewritten citation links
pub const CITATION_SCHEME: &str = "cite://";

/// A distinct cited target with its assigned number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedCitation {
    pub number: usize,
    pub filename: String,
    pub section_id: String,
}

/// Message content with markers rewritten to numbered links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedMessage {
    /// Markdown with `cite://` links in place of markers
    pub content: String,
    /// Distinct citations, ordered by number
    pub citations: Vec<NumberedCitation>,
}

/// Build the synthetic link destination for a citation
pub fn citation_url(number: usize, filename: &str, section_id: &str) -> String {
    format!(
        "{}{}/{}/{}",
        CITATION_SCHEME,
        number,
        urlencoding::encode(filename),
        section_id
    )
}

/// Decode a `cite://` destination back into its citation
pub fn parse_citation_url(url: &str) -> Option<NumberedCitation> {
    let rest = url.strip_prefix(CITATION_SCHEME)?;
    let mut parts = rest.splitn(3, '/');

    let number = parts.next()?.parse::<usize>().ok()?;
    let filename = urlencoding::decode(parts.next()?).ok()?.into_owned();
    let section_id = parts.next()?.to_string();

    if number == 0 || filename.is_empty() || section_id.is_empty() {
        return None;
    }

    Some(NumberedCitation {
        number,
        filename,
        section_id,
    })
}

/// Renumber citation markers and rewrite them as `cite://` links
pub fn number_citations(content: &str) -> NumberedMessage {
    let references = parse_references(content);
    if references.is_empty() {
        return NumberedMessage {
            content: content.to_string(),
            citations: Vec::new(),
        };
    }

    let mut numbers: HashMap<(&str, &str), usize> = HashMap::new();
    let mut citations: Vec<NumberedCitation> = Vec::new();
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;

    for reference in &references {
        output.push_str(&content[cursor..reference.start_index]);
        // A bare `!` would turn the link into an image
        if output.ends_with('!') && !output.ends_with("\\!") {
            output.pop();
            output.push_str("\\!");
        }

        let key = reference.target();
        let number = match numbers.get(&key) {
            Some(&n) => n,
            None => {
                let n = citations.len() + 1;
                numbers.insert(key, n);
                citations.push(NumberedCitation {
                    number: n,
                    filename: reference.filename.clone(),
                    section_id: reference.section_id.clone(),
                });
                n
            }
        };

        output.push('[');
        output.push_str(&number.to_string());
        output.push_str("](");
        output.push_str(&citation_url(
            number,
            &reference.filename,
            &reference.section_id,
        ));
        output.push(')');

        cursor = reference.end_index;
    }
    output.push_str(&content[cursor..]);

    NumberedMessage {
        content: output,
        citations,
    }
}
