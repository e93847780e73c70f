//! Message segmentation
//!
//! Splits message text into alternating prose and citation parts. The split
//! is lossless: joining every part's `content` in order gives back the input.

use serde::{Deserialize, Serialize};

use crate::citation::{parse_references, DocumentReference};

/// One segment of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    Text {
        content: String,
    },
    Reference {
        content: String,
        reference: DocumentReference,
    },
}

impl MessagePart {
    /// Source text covered by this part
    pub fn content(&self) -> &str {
        match self {
            MessagePart::Text { content } => content,
            MessagePart::Reference { content, .. } => content,
        }
    }

    pub fn reference(&self) -> Option<&DocumentReference> {
        match self {
            MessagePart::Reference { reference, .. } => Some(reference),
            MessagePart::Text { .. } => None,
        }
    }
}

/// Split `content` into text and reference parts, in order
///
/// Empty text parts are never emitted, so an empty input yields no parts.
pub fn split_message_into_parts(content: &str) -> Vec<MessagePart> {
    let references = parse_references(content);
    let mut parts = Vec::with_capacity(references.len() * 2 + 1);
    let mut cursor = 0;

    for reference in references {
        if reference.start_index > cursor {
            parts.push(MessagePart::Text {
                content: content[cursor..reference.start_index].to_string(),
            });
        }
        cursor = reference.end_index;
        parts.push(MessagePart::Reference {
            content: reference.raw.clone(),
            reference,
        });
    }

    if cursor < content.len() {
        parts.push(MessagePart::Text {
            content: content[cursor..].to_string(),
        });
    }

    parts
}

/// Reassemble parts into the original text
pub fn join_parts(parts: &[MessagePart]) -> String {
    parts.iter().map(MessagePart::content).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_example() {
        let parts = split_message_into_parts("See the results [DOC:report.pdf:section-3]");

        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0],
            MessagePart::Text {
                content: "See the results ".to_string()
            }
        );
        let reference = parts[1].reference().unwrap();
        assert_eq!(reference.filename, "report.pdf");
        assert_eq!(reference.section_id, "section-3");
        assert_eq!(parts[1].content(), "[DOC:report.pdf:section-3]");
    }

    #[test]
    fn test_split_edges() {
        assert!(split_message_into_parts("").is_empty());

        let only = split_message_into_parts("[DOC:a.pdf:s1]");
        assert_eq!(only.len(), 1);
        assert!(only[0].reference().is_some());

        let adjacent = split_message_into_parts("x[DOC:a.pdf:s1][DOC:b.pdf:s2]y");
        let kinds: Vec<bool> = adjacent.iter().map(|p| p.reference().is_some()).collect();
        assert_eq!(kinds, vec![false, true, true, false]);
    }

    #[test]
    fn test_malformed_marker_stays_text() {
        let text = "broken [DOC:report.pdf:section 3] marker";
        let parts = split_message_into_parts(text);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].content(), text);
    }

    #[test]
    fn test_serialized_shape() {
        let parts = split_message_into_parts("a [DOC:r.pdf:s]");
        let json = serde_json::to_value(&parts).unwrap();
        assert_eq!(json[0]["type"], "text");
        assert_eq!(json[1]["type"], "reference");
        assert_eq!(json[1]["reference"]["sectionId"], "s");
    }

    proptest! {
        #[test]
        fn prop_split_round_trips(s in "(\\PC|\\[DOC:[a-z. ]{0,6}:[a-z0-9-]{0,4}\\]?){0,24}") {
            let parts = split_message_into_parts(&s);
            prop_assert_eq!(join_parts(&parts), s);
        }

        #[test]
        fn prop_no_empty_parts(s in "\\PC{0,64}") {
            let parts = split_message_into_parts(&s);
            prop_assert!(parts.iter().all(|p| !p.content().is_empty()));
        }
    }
}
