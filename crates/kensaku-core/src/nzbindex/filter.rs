use crate::models::SearchResult;

/// NZBIndex highlights passworded releases in this colour.
const PASSWORD_MARKER: &str = "#c20000";

/// Reject releases whose description carries the password marker.
pub fn passes_filter(result: &SearchResult) -> bool {
    if result.description.to_lowercase().contains(PASSWORD_MARKER) {
        tracing::info!(name = %result.name, "wrong: seems to be passworded");
        return false;
    }

    true
}
