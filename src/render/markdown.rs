//! Markdown rendering for assistant prose
//!
//! Assistant text is untrusted: raw HTML is escaped and link destinations
//! are restricted to http(s), mailto and relative targets. `cite://` links
//! produced by numbered mode are handed to a caller-supplied closure instead.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::citation::{parse_citation_url, NumberedCitation};

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Whether a link destination may be emitted as-is
pub fn is_safe_url(url: &str) -> bool {
    let lowered = url.trim().to_ascii_lowercase();
    match lowered.find([':', '/', '?', '#']) {
        Some(idx) if lowered.as_bytes()[idx] == b':' => {
            matches!(&lowered[..idx], "http" | "https" | "mailto")
        }
        _ => true,
    }
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Render markdown to HTML. `cite://` links are treated like any other
/// unsafe link.
pub fn render_markdown(text: &str) -> String {
    render_markdown_with_citations(text, |_| None)
}

/// Render markdown to HTML, replacing each `cite://` link (including its
/// link text) with the HTML returned by `render_citation`. Returning `None`
/// falls back to ordinary link handling.
pub fn render_markdown_with_citations<F>(text: &str, mut render_citation: F) -> String
where
    F: FnMut(&NumberedCitation) -> Option<String>,
{
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut inside_citation = false;

    for event in Parser::new_ext(text, markdown_options()) {
        if inside_citation {
            if matches!(event, Event::End(TagEnd::Link)) {
                inside_citation = false;
            }
            continue;
        }

        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let replacement =
                    parse_citation_url(&dest_url).and_then(|citation| render_citation(&citation));
                if let Some(html) = replacement {
                    events.push(Event::InlineHtml(html.into()));
                    inside_citation = true;
                    continue;
                }
                events.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url: sanitize_url(dest_url),
                    title,
                    id,
                }));
            }
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => events.push(Event::Start(Tag::Image {
                link_type,
                dest_url: sanitize_url(dest_url),
                title,
                id,
            })),
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            other => events.push(other),
        }
    }

    let mut output = String::with_capacity(text.len() + text.len() / 2);
    html::push_html(&mut output, events.into_iter());
    output
}
