//! Parsing of catalog and metadata documents.
//!
//! A catalog is either a JSON array of folder ids or an HTML directory
//! listing, as produced by most static file servers. In a listing, every link
//! to a direct child directory of the listed one is a folder.

use crate::error::SourceError;

use super::model::FolderMetadata;

pub(super) fn parse_catalog(resource: &str, body: &str) -> Result<Vec<String>, SourceError> {
    let trimmed = body.trim_start();

    if trimmed.starts_with('[') {
        let ids: Vec<String> =
            serde_json::from_str(trimmed).map_err(|e| SourceError::malformed(resource, e))?;
        return Ok(dedup_ids(ids.into_iter().map(|id| id.trim().to_string())));
    }

    if trimmed.contains("<a ") || trimmed.contains("<A ") {
        let listed = listed_path(resource);
        return Ok(dedup_ids(
            hrefs(trimmed).filter_map(|href| folder_from_href(href, &listed)),
        ));
    }

    Err(SourceError::malformed(
        resource,
        "expected a JSON array or a directory listing",
    ))
}

pub(super) fn parse_metadata(resource: &str, body: &str) -> Result<FolderMetadata, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::malformed(resource, e))
}

fn dedup_ids(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for id in ids {
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Iterate over `href` attribute values (single or double quoted).
fn hrefs(html: &str) -> impl Iterator<Item = &str> {
    html.match_indices("href=").filter_map(move |(pos, m)| {
        let rest = &html[pos + m.len()..];
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value = &rest[1..];
        value.find(quote).map(|end| &value[..end])
    })
}

/// Directory the listing describes, as a path ending in `/`.
/// A resource naming a file (`.../index.html`) lists its parent.
fn listed_path(resource: &str) -> String {
    let path = match resource.split_once("://") {
        Some((_, rest)) => rest.find('/').map_or("/", |i| &rest[i..]),
        None => resource,
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.rfind('/') {
        Some(i) => path[..=i].to_string(),
        None => String::new(),
    }
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// A folder is a link to a direct child directory of `listed`: either a
/// relative `name/` or an absolute `{listed}name/`.
fn folder_from_href(href: &str, listed: &str) -> Option<String> {
    let href = unescape_html(href);
    // Query links (column sorting) and links to other hosts are not folders.
    if href.starts_with('?') || href.starts_with('#') || href.contains("://") {
        return None;
    }

    let relative = match href.strip_prefix('/') {
        Some(_) => href.strip_prefix(listed)?,
        None => href.strip_prefix("./").unwrap_or(&href),
    };
    let name = relative.strip_suffix('/')?;
    match name {
        "" | "." | ".." => None,
        name if name.contains('/') => None,
        name => Some(name.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_catalog_keeps_order_and_drops_duplicates() {
        let ids = parse_catalog("catalog", r#"["ncs", "cs", " ncs ", ""]"#).unwrap();
        assert_eq!(ids, vec!["ncs".to_string(), "cs".to_string()]);
    }

    #[test]
    fn directory_listing_yields_directory_links_only() {
        let html = r#"
<!DOCTYPE HTML>
<html><body>
<h1>Directory listing for /songs/</h1>
<ul>
<li><a href="../">../</a></li>
<li><a href="?C=N;O=D">Name</a></li>
<li><a href="ncs/">ncs/</a></li>
<li><a href='/songs/chill/'>chill/</a></li>
<li><a href="intro.mp3">intro.mp3</a></li>
<li><a href="ncs/">ncs/</a></li>
</ul>
</body></html>"#;
        let ids = parse_catalog("http://localhost:8000/songs/", html).unwrap();
        assert_eq!(ids, vec!["ncs".to_string(), "chill".to_string()]);
    }

    #[test]
    fn directory_listing_ignores_parent_and_nested_links() {
        let html = r##"
<html><body><h1>Index of /music/songs</h1><table>
<tr><td><a href="/music/">Parent Directory</a></td></tr>
<tr><td><a href="/other/place/">elsewhere</a></td></tr>
<tr><td><a href="./jazz/">jazz/</a></td></tr>
<tr><td><a href="rock/live/">rock/live/</a></td></tr>
<tr><td><a href="/music/songs/r&amp;b/">r&amp;b/</a></td></tr>
<tr><td><a href="#top">top</a></td></tr>
</table></body></html>"##;
        let ids = parse_catalog("http://example.com/music/songs/", html).unwrap();
        assert_eq!(ids, vec!["jazz".to_string(), "r&b".to_string()]);
    }

    #[test]
    fn listed_path_strips_host_and_query() {
        assert_eq!(listed_path("http://h:8000/music/songs/"), "/music/songs/");
        assert_eq!(listed_path("https://h"), "/");
        assert_eq!(listed_path("http://h/songs/?C=N"), "/songs/");
        assert_eq!(listed_path("http://h/songs/index.html"), "/songs/");
        assert_eq!(listed_path("index.html"), "");
    }

    #[test]
    fn garbage_catalog_is_malformed() {
        let err = parse_catalog("catalog", "not a catalog").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));

        let err = parse_catalog("catalog", "[1, 2]").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[test]
    fn metadata_missing_a_field_is_malformed() {
        let body = r#"{"title": "NCS", "description": "Free tracks", "tracks": []}"#;
        let err = parse_metadata("ncs/info.json", body).unwrap_err();
        match err {
            SourceError::Malformed { resource, reason } => {
                assert_eq!(resource, "ncs/info.json");
                assert!(reason.contains("cover"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }
}
