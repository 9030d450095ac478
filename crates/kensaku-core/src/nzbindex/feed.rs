use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{EntryError, KensakuError};
use crate::models::SearchResult;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Zone-less timestamp shapes, read as UTC.
const NAIVE_DATE_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse an NZBIndex RSS document into releases, using the current time for ages.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<SearchResult>, KensakuError> {
    parse_feed_at(bytes, Utc::now())
}

/// Parse an NZBIndex RSS document, computing ages relative to `now`.
///
/// Only a document that is not RSS at all fails as a whole. Entries that
/// cannot be fully extracted are logged and dropped; the rest keep feed order.
pub fn parse_feed_at(bytes: &[u8], now: DateTime<Utc>) -> Result<Vec<SearchResult>, KensakuError> {
    let channel =
        rss::Channel::read_from(bytes).map_err(|e| KensakuError::Feed(e.to_string()))?;

    let mut results = Vec::with_capacity(channel.items().len());
    for item in channel.items() {
        match parse_entry(item, now) {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::warn!(title = item.title().unwrap_or(""), error = %e, "skipping feed entry");
            }
        }
    }

    tracing::debug!(
        parsed = results.len(),
        total = channel.items().len(),
        "parsed NZBIndex feed"
    );
    Ok(results)
}

fn parse_entry(item: &rss::Item, now: DateTime<Utc>) -> Result<SearchResult, EntryError> {
    let enclosure = item
        .enclosure()
        .filter(|e| !e.url().trim().is_empty())
        .ok_or(EntryError::MissingEnclosure)?;
    let download_url = enclosure.url().trim().to_string();

    let id = release_id(item.link())
        .ok_or_else(|| EntryError::BadLink(item.link().map(str::to_string)))?;

    let name = item
        .title()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(EntryError::MissingTitle)?
        .to_string();

    let published = item
        .pub_date()
        .and_then(parse_pub_date)
        .ok_or_else(|| EntryError::BadDate(item.pub_date().map(str::to_string)))?;

    Ok(SearchResult {
        id,
        name,
        age_days: age_in_days(published, now),
        size_mb: size_in_mb(enclosure.length()),
        detail_url: detail_url(&download_url),
        download_url,
        description: item.description().unwrap_or_default().to_string(),
    })
}

/// Release id from a detail link.
///
/// Canonical links look like `https://host/release/<id>/<slug>`, i.e. the id
/// is segment 4 when split on `/`. A numeric segment right after `release` is
/// the id; otherwise the last all-digit segment is, which covers links with
/// extra path levels between `release` and the id. No numeric segment at all
/// means the link is not a release link.
pub fn release_id(link: Option<&str>) -> Option<u64> {
    let url = url::Url::parse(link?.trim()).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();

    let after_release = segments
        .iter()
        .position(|s| s.eq_ignore_ascii_case("release"))
        .and_then(|p| segments.get(p + 1))
        .filter(|s| is_numeric(s));

    after_release
        .or_else(|| segments.iter().rev().find(|s| is_numeric(s)))?
        .parse()
        .ok()
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// The release page for a download link.
pub fn detail_url(download_url: &str) -> String {
    download_url.replace("/download/", "/release/")
}

/// RFC 2822 or RFC 3339 first, then zone-less shapes as UTC. A trailing zone
/// abbreviation chrono cannot resolve (`CEST`, `PDT`) is dropped and the
/// remainder read as UTC.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw).or_else(|_| DateTime::parse_from_rfc3339(raw))
    {
        return Some(dt.with_timezone(&Utc));
    }

    parse_naive_utc(raw).or_else(|| {
        let (rest, zone) = raw.rsplit_once(' ')?;
        if zone.is_empty() || !zone.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        parse_naive_utc(rest.trim_end())
    })
}

fn parse_naive_utc(raw: &str) -> Option<DateTime<Utc>> {
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Whole days since publication; future timestamps count as 0.
fn age_in_days(published: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    u32::try_from((now - published).num_days().max(0)).unwrap_or(u32::MAX)
}

/// Enclosure length in whole megabytes, 0 when missing or not an integer.
fn size_in_mb(length: &str) -> u64 {
    length.trim().parse::<u64>().map_or(0, |bytes| bytes / BYTES_PER_MB)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::nzbindex::filter::passes_filter;
    use chrono::{Duration, TimeZone};

    pub(crate) struct Entry {
        pub title: Option<String>,
        pub link: Option<String>,
        pub pub_date: Option<String>,
        pub description: Option<String>,
        pub enclosure: Option<(String, String)>,
    }

    impl Entry {
        pub fn new(id: u64, now: DateTime<Utc>) -> Self {
            Self {
                title: Some("Some.Release.720p".into()),
                link: Some(format!("https://www.nzbindex.com/release/{id}/Some.Release.nzb")),
                pub_date: Some((now - Duration::days(3)).to_rfc2822()),
                description: Some("plain".into()),
                enclosure: Some((
                    format!("https://www.nzbindex.com/download/{id}/Some.Release.nzb"),
                    "1048576000".into(),
                )),
            }
        }

        pub fn with_description(mut self, description: &str) -> Self {
            self.description = Some(description.into());
            self
        }
    }

    pub(crate) fn feed(entries: &[Entry]) -> Vec<u8> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>NZBIndex</title><link>https://www.nzbindex.com</link><description>search</description>"#,
        );
        for e in entries {
            xml.push_str("<item>");
            if let Some(t) = &e.title {
                xml.push_str(&format!("<title>{t}</title>"));
            }
            if let Some(l) = &e.link {
                xml.push_str(&format!("<link>{l}</link>"));
            }
            if let Some(d) = &e.pub_date {
                xml.push_str(&format!("<pubDate>{d}</pubDate>"));
            }
            if let Some(d) = &e.description {
                xml.push_str(&format!("<description><![CDATA[{d}]]></description>"));
            }
            if let Some((url, length)) = &e.enclosure {
                xml.push_str(&format!(
                    r#"<enclosure url="{url}" length="{length}" type="application/x-nzb"></enclosure>"#
                ));
            }
            xml.push_str("</item>");
        }
        xml.push_str("</channel></rss>");
        xml.into_bytes()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn example_movie(now: DateTime<Utc>, description: &str) -> Entry {
        Entry {
            title: Some("Example.Movie.2020.1080p".into()),
            link: Some("https://host/release/x/y/12345/slug".into()),
            pub_date: Some((now - Duration::days(1)).to_rfc2822()),
            description: Some(description.into()),
            enclosure: Some(("https://host/download/12345".into(), "734003200".into())),
        }
    }

    #[test]
    fn example_movie_entry() {
        let now = now();
        let results = parse_feed_at(&feed(&[example_movie(now, "clean")]), now).unwrap();
        assert_eq!(results.len(), 1);

        let r = &results[0];
        assert_eq!(r.id, 12345);
        assert_eq!(r.name, "Example.Movie.2020.1080p");
        assert_eq!(r.size_mb, 700);
        assert_eq!(r.age_days, 1);
        assert_eq!(r.download_url, "https://host/download/12345");
        assert_eq!(r.detail_url, "https://host/release/12345");
        assert_eq!(r.description, "clean");
        assert!(passes_filter(r));
    }

    #[test]
    fn password_marker_entry_is_rejected() {
        let now = now();
        let entry = example_movie(now, "Password protected #C20000");

        let results = parse_feed_at(&feed(&[entry]), now).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 12345);
        assert_eq!(results[0].description, "Password protected #C20000");
        assert!(!passes_filter(&results[0]));
    }

    #[test]
    fn keeps_feed_order_and_detail_relation() {
        let now = now();
        let entries: Vec<Entry> = (1..=5).map(|id| Entry::new(id, now)).collect();

        let results = parse_feed_at(&feed(&entries), now).unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);

        for r in &results {
            assert_eq!(r.detail_url, r.download_url.replace("/download/", "/release/"));
            assert!(r.detail_url.contains("/release/"));
            assert_eq!(r.age_days, 3);
            assert_eq!(r.size_mb, 1000);
        }
    }

    #[test]
    fn bad_length_degrades_to_zero() {
        let now = now();
        let mut bad = Entry::new(2, now);
        bad.enclosure = Some(("https://www.nzbindex.com/download/2/x.nzb".into(), "lots".into()));

        let results =
            parse_feed_at(&feed(&[Entry::new(1, now), bad, Entry::new(3, now)]), now).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].size_mb, 1000);
        assert_eq!(results[1].size_mb, 0);
        assert_eq!(results[2].size_mb, 1000);
    }

    #[test]
    fn shallow_link_skips_only_that_entry() {
        let now = now();
        let mut bad = Entry::new(2, now);
        bad.link = Some("https://www.nzbindex.com/release".into());

        let results =
            parse_feed_at(&feed(&[Entry::new(1, now), bad, Entry::new(3, now)]), now).unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn bad_date_skips_entry() {
        let now = now();
        let mut bad = Entry::new(2, now);
        bad.pub_date = Some("sometime last week".to_string());
        let mut missing = Entry::new(3, now);
        missing.pub_date = None;

        let results = parse_feed_at(&feed(&[Entry::new(1, now), bad, missing]), now).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn lenient_dates_read_as_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 10, 11, 12).unwrap();
        for raw in [
            "Sat, 01 Jun 2024 10:11:12",
            "01 Jun 2024 10:11:12",
            "2024-06-01 10:11:12",
            "2024-06-01T10:11:12",
            "Sat, 01 Jun 2024 10:11:12 CEST",
        ] {
            assert_eq!(parse_pub_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(
            parse_pub_date("Sat, 01 Jun 2024 10:11:12 +0200"),
            Some(expected - Duration::hours(2))
        );
        assert_eq!(parse_pub_date("sometime last week"), None);
        assert_eq!(parse_pub_date("2024-06-01 10:11:12 +"), None);
    }

    #[test]
    fn zone_less_date_keeps_entry() {
        let now = now();
        let mut entry = Entry::new(1, now);
        entry.pub_date = Some("2024-05-30 12:00:00".into());

        let results = parse_feed_at(&feed(&[entry]), now).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].age_days, 2);
    }

    #[test]
    fn missing_enclosure_or_title_skips_entry() {
        let now = now();
        let mut no_enclosure = Entry::new(2, now);
        no_enclosure.enclosure = None;
        let mut no_title = Entry::new(3, now);
        no_title.title = None;

        let results =
            parse_feed_at(&feed(&[no_enclosure, no_title, Entry::new(4, now)]), now).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 4);
    }

    #[test]
    fn missing_description_is_empty() {
        let now = now();
        let mut entry = Entry::new(1, now);
        entry.description = None;

        let results = parse_feed_at(&feed(&[entry]), now).unwrap();
        assert_eq!(results[0].description, "");
    }

    #[test]
    fn future_date_is_age_zero() {
        let now = now();
        let mut entry = Entry::new(1, now);
        entry.pub_date = Some((now + Duration::hours(5)).to_rfc2822());

        let results = parse_feed_at(&feed(&[entry]), now).unwrap();
        assert_eq!(results[0].age_days, 0);
    }

    #[test]
    fn same_link_same_id() {
        assert_eq!(
            release_id(Some("https://www.nzbindex.com/release/987/a.nzb")),
            release_id(Some("https://www.nzbindex.com/release/987/a.nzb"))
        );
        assert_eq!(release_id(Some("https://www.nzbindex.com/release/987/a.nzb")), Some(987));
        assert_eq!(release_id(Some("not a url")), None);
        assert_eq!(release_id(None), None);
    }

    #[test]
    fn numeric_segment_before_release_is_ignored() {
        assert_eq!(release_id(Some("https://h/2024/release/4/a")), Some(4));
        assert_eq!(release_id(Some("https://h/2024/RELEASE/4/a")), Some(4));
        assert_eq!(release_id(Some("https://host/release/x/y/12345/slug")), Some(12345));
        assert_eq!(release_id(Some("https://h/2024/release/x/77/a")), Some(77));
        assert_eq!(release_id(Some("https://h/release/x/slug")), None);
    }

    #[test]
    fn dated_path_yields_release_id() {
        let now = now();
        let mut entry = Entry::new(4, now);
        entry.link = Some("https://h/2024/release/4/a".into());

        let results = parse_feed_at(&feed(&[entry]), now).unwrap();
        assert_eq!(results[0].id, 4);
    }

    #[test]
    fn non_rss_document_is_feed_error() {
        let err = parse_feed_at(b"<html><body>maintenance</body></html>", now()).unwrap_err();
        assert!(matches!(err, KensakuError::Feed(_)));
    }

    #[test]
    fn empty_feed_is_empty() {
        assert!(parse_feed_at(&feed(&[]), now()).unwrap().is_empty());
    }
}
