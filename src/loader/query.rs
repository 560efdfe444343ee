use compact_str::CompactString;
use url::{form_urlencoded, Url};

use super::QueryError;

/// Name of the page query parameter carrying the project identifiers.
pub const PROJECT_IDS_PARAM: &str = "projectIds";

/// Separator between identifiers inside the parameter value.
pub const ID_SEPARATOR: char = '~';

/// Extract the project identifiers from a page query.
///
/// Accepts a full URL (`https://host/page?projectIds=A~B`), a relative page
/// URL (`/embed/index.html?projectIds=A~B`), a query string with or without
/// the leading `?`, or an empty string. Returns `None` when
/// the parameter is absent, which is the "no data" state rather than an error.
pub fn parse_project_ids(input: &str) -> Result<Option<Vec<CompactString>>, QueryError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let value = if input.contains("://") {
        let url = Url::parse(input)?;
        url.query_pairs()
            .find(|(k, _)| k == PROJECT_IDS_PARAM)
            .map(|(_, v)| v.into_owned())
    } else {
        // Relative page URLs (`/embed/index.html?projectIds=..`) carry the
        // query after the first `?`; a fragment never belongs to it.
        let query = input.split_once('?').map_or(input, |(_, q)| q);
        let query = query.split_once('#').map_or(query, |(q, _)| q);
        form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == PROJECT_IDS_PARAM)
            .map(|(_, v)| v.into_owned())
    };

    let Some(value) = value else {
        tracing::debug!("No '{}' parameter in query '{}'", PROJECT_IDS_PARAM, input);
        return Ok(None);
    };

    let ids = split_ids(&value);
    if ids.is_empty() {
        tracing::warn!(
            "'{}' parameter present but lists no identifiers",
            PROJECT_IDS_PARAM
        );
    }
    Ok(Some(ids))
}

/// Split a `~`-delimited identifier list, trimming and dropping empty segments.
/// Order is preserved; duplicates are kept (each becomes its own leaf).
pub fn split_ids(list: &str) -> Vec<CompactString> {
    list.split(ID_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CompactString::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Option<Vec<CompactString>> {
        Some(v.iter().map(|s| CompactString::new(s)).collect())
    }

    #[test]
    fn query_string_with_leading_question_mark() {
        let parsed = parse_project_ids("?projectIds=00110684~00127603~00094621").unwrap();
        assert_eq!(parsed, ids(&["00110684", "00127603", "00094621"]));
    }

    #[test]
    fn full_url_with_other_params() {
        let parsed =
            parse_project_ids("https://example.org/embed/?lang=en&projectIds=A~B&theme=dark")
                .unwrap();
        assert_eq!(parsed, ids(&["A", "B"]));
    }

    #[test]
    fn relative_page_url() {
        assert_eq!(
            parse_project_ids("/embed/index.html?projectIds=A~B").unwrap(),
            ids(&["A", "B"])
        );
        assert_eq!(
            parse_project_ids("index.html?lang=en&projectIds=A~B#top").unwrap(),
            ids(&["A", "B"])
        );
        assert_eq!(parse_project_ids("/embed/index.html").unwrap(), None);
    }

    #[test]
    fn percent_encoded_separator() {
        let parsed = parse_project_ids("projectIds=A%7EB").unwrap();
        assert_eq!(parsed, ids(&["A", "B"]));
    }

    #[test]
    fn absent_parameter_is_none() {
        assert_eq!(parse_project_ids("").unwrap(), None);
        assert_eq!(parse_project_ids("?lang=fr").unwrap(), None);
        assert_eq!(parse_project_ids("https://example.org/embed/").unwrap(), None);
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(parse_project_ids("?projectIds=~A~~ B ~").unwrap(), ids(&["A", "B"]));
        assert_eq!(parse_project_ids("?projectIds=").unwrap(), Some(Vec::new()));
    }

    #[test]
    fn invalid_url_is_an_error() {
        assert!(parse_project_ids("https://exa mple.org/?projectIds=A").is_err());
    }
}
