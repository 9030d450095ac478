use url::form_urlencoded;

use crate::config::ProviderConfig;
use crate::error::KensakuError;
use crate::models::{MediaQuery, QualityConstraint, SearchMode};
use crate::traits::TitleResolver;

/// Results are requested newest first.
const SORT_ORDER: &str = "agedesc";
/// Upper bound on entries per feed page.
const MAX_RESULTS: u32 = 250;

/// Build the urlencoded query string for the NZBIndex RSS endpoint.
///
/// The phrase depends on the mode; every other parameter is shared. Fails
/// before anything touches the network when the query cannot be phrased.
pub fn build_query(
    media: &MediaQuery,
    quality: &QualityConstraint,
    config: &ProviderConfig,
    resolver: &impl TitleResolver,
) -> Result<String, KensakuError> {
    let phrase = search_phrase(media, resolver)?;

    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("q", &phrase)
        .append_pair("age", &config.retention_days.to_string())
        .append_pair("sort", SORT_ORDER);

    if let Some(min) = quality.min_size_mb {
        query.append_pair("minsize", &min.to_string());
    }
    if let Some(max) = quality.max_size_mb {
        query.append_pair("maxsize", &max.to_string());
    }

    query
        .append_pair("rating", "1")
        .append_pair("max", &MAX_RESULTS.to_string())
        .append_pair("more", "1")
        .append_pair("complete", "1");

    Ok(query.finish())
}

fn search_phrase(media: &MediaQuery, resolver: &impl TitleResolver) -> Result<String, KensakuError> {
    let title = resolver
        .resolve_search_title(media, media.mode.includes_identifier())
        .ok_or_else(|| KensakuError::Config(format!("no search title for {:?}", media.title)))?;

    match media.mode {
        SearchMode::Movie => {
            let year = media.year.ok_or_else(|| {
                KensakuError::Config(format!("movie search for {title:?} needs a year"))
            })?;
            Ok(format!("\"{title} {year}\" | \"{title} ({year})\""))
        }
        SearchMode::Season | SearchMode::Episode => Ok(title),
    }
}
