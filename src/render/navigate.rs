//! Citation click handling

use crate::lookup::{DocumentLookup, NavigationTarget};

/// Receiver of citation navigation requests, typically the document viewer
pub trait CitationNavigator {
    fn navigate(&mut self, filename: &str, section_id: &str);
}

impl<F> CitationNavigator for F
where
    F: FnMut(&str, &str),
{
    fn navigate(&mut self, filename: &str, section_id: &str) {
        self(filename, section_id)
    }
}

/// Resolve where a citation points, without navigating
pub fn resolve_citation(
    lookup: &DocumentLookup,
    filename: &str,
    section_id: &str,
) -> Option<NavigationTarget> {
    lookup.navigation_target(filename, section_id)
}

/// Handle a click on a citation
///
/// The navigator is only invoked when the cited document resolves;
/// unresolved citations are inert.
pub fn handle_citation_click<N>(
    lookup: &DocumentLookup,
    navigator: &mut N,
    filename: &str,
    section_id: &str,
) -> Option<NavigationTarget>
where
    N: CitationNavigator + ?Sized,
{
    let target = resolve_citation(lookup, filename, section_id)?;
    if !target.section_found {
        tracing::debug!(
            "Section {} not in outline of {}, navigating to document",
            section_id,
            target.filename
        );
    }
    navigator.navigate(filename, section_id);
    Some(target)
}
