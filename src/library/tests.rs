use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::listing::parse_metadata;
use super::*;
use crate::config::LibrarySettings;
use crate::error::{LibraryError, SourceError};

/// In-memory provider: `metadata` holds raw `info.json` bodies per folder.
struct MemorySource {
    catalog: Option<Vec<String>>,
    metadata: HashMap<String, String>,
    /// Asset paths reported as absent; everything else exists.
    missing_assets: Vec<String>,
}

impl MemorySource {
    fn new(catalog: &[&str]) -> Self {
        Self {
            catalog: Some(catalog.iter().map(|s| s.to_string()).collect()),
            metadata: HashMap::new(),
            missing_assets: Vec::new(),
        }
    }

    fn without_asset(mut self, path: &str) -> Self {
        self.missing_assets.push(path.to_string());
        self
    }

    fn with(mut self, id: &str, body: &str) -> Self {
        self.metadata.insert(id.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch_catalog(&self) -> Result<Vec<String>, SourceError> {
        self.catalog
            .clone()
            .ok_or_else(|| SourceError::NotFound("catalog".into()))
    }

    async fn fetch_metadata(&self, folder_id: &str) -> Result<FolderMetadata, SourceError> {
        let body = self
            .metadata
            .get(folder_id)
            .ok_or_else(|| SourceError::NotFound(folder_id.to_string()))?;
        parse_metadata(folder_id, body)
    }

    async fn asset_exists(&self, path: &str) -> Result<bool, SourceError> {
        Ok(!self.missing_assets.iter().any(|p| p == path))
    }
}

fn info(title: &str, tracks: &[&str]) -> String {
    serde_json::json!({
        "title": title,
        "description": format!("{title} description"),
        "cover": "cover.jpg",
        "tracks": tracks,
    })
    .to_string()
}

fn folder(id: &str) -> Folder {
    Folder {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        cover: "cover.jpg".to_string(),
    }
}

#[test]
fn display_name_decodes_escapes_but_source_path_stays_raw() {
    let track = Track::new("ncs", "Into%20the%20Light.mp3");
    assert_eq!(track.display(), "Into the Light.mp3");
    assert_eq!(track.source_path(), "ncs/Into%20the%20Light.mp3");

    assert_eq!(display_name("plain.mp3"), "plain.mp3");
    // %FF is not valid UTF-8 once decoded; only whitespace escapes are replaced.
    assert_eq!(display_name("bad%FF%20name.mp3"), "bad%FF name.mp3");
}

#[test]
fn source_kind_parse_distinguishes_urls_from_paths() {
    assert_eq!(
        SourceKind::parse("http://localhost:8000/songs/"),
        SourceKind::Http("http://localhost:8000/songs".into())
    );
    assert_eq!(
        SourceKind::parse("songs"),
        SourceKind::Dir(std::path::PathBuf::from("songs"))
    );

    let settings = LibrarySettings {
        url: Some("  ".into()),
        ..LibrarySettings::default()
    };
    assert_eq!(
        SourceKind::from_settings(&settings),
        SourceKind::Dir(settings.root.clone())
    );
}

#[tokio::test]
async fn list_folders_skips_malformed_folder() {
    let source = MemorySource::new(&["a", "b", "c"])
        .with("a", &info("Alpha", &["1.mp3"]))
        .with("b", r#"{"title": "Broken"}"#)
        .with("c", &info("Gamma", &[]));
    let loader = LibraryLoader::new(Box::new(source));

    let folders = loader.list_folders().await.unwrap();
    let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert_eq!(folders[0].title, "Alpha");
    assert_eq!(folders[0].cover_path(), "a/cover.jpg");
}

#[tokio::test]
async fn list_folders_skips_folder_without_metadata() {
    let source = MemorySource::new(&["a", "missing"]).with("a", &info("Alpha", &[]));
    let loader = LibraryLoader::new(Box::new(source));

    let folders = loader.list_folders().await.unwrap();
    assert_eq!(folders.len(), 1);
}

#[tokio::test]
async fn list_folders_skips_folder_whose_cover_is_missing() {
    let source = MemorySource::new(&["a", "b"])
        .with("a", &info("Alpha", &["1.mp3"]))
        .with("b", &info("Beta", &["2.mp3"]))
        .without_asset("a/cover.jpg");
    let loader = LibraryLoader::new(Box::new(source));

    let folders = loader.list_folders().await.unwrap();
    let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);

    // Tracks of such a folder can still be listed directly.
    assert_eq!(loader.list_tracks(&folder("a")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_folders_fails_when_catalog_is_missing() {
    let source = MemorySource {
        catalog: None,
        metadata: HashMap::new(),
        missing_assets: Vec::new(),
    };
    let loader = LibraryLoader::new(Box::new(source));

    let err = loader.list_folders().await.unwrap_err();
    assert!(matches!(err, LibraryError::CatalogUnavailable(_)));
}

#[tokio::test]
async fn list_tracks_keeps_metadata_order() {
    let source =
        MemorySource::new(&["a"]).with("a", &info("Alpha", &["z.mp3", "a%20b.mp3", "m.mp3"]));
    let loader = LibraryLoader::new(Box::new(source));

    let tracks = loader.list_tracks(&folder("a")).await.unwrap();
    let names: Vec<&str> = tracks.iter().map(|t| t.filename.as_str()).collect();
    assert_eq!(names, vec!["z.mp3", "a%20b.mp3", "m.mp3"]);
    assert!(tracks.iter().all(|t| t.folder_id == "a"));
}

#[tokio::test]
async fn list_tracks_of_empty_folder_is_not_an_error() {
    let source = MemorySource::new(&["a"]).with("a", &info("Alpha", &[]));
    let loader = LibraryLoader::new(Box::new(source));

    assert!(loader.list_tracks(&folder("a")).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_tracks_fails_for_missing_or_malformed_metadata() {
    let source = MemorySource::new(&["a", "b"]).with("b", r#"{"title": 3}"#);
    let loader = LibraryLoader::new(Box::new(source));

    match loader.list_tracks(&folder("a")).await.unwrap_err() {
        LibraryError::FolderUnavailable { folder, source } => {
            assert_eq!(folder, "a");
            assert!(matches!(source, SourceError::NotFound(_)));
        }
        other => panic!("expected FolderUnavailable, got {other:?}"),
    }

    let err = loader.list_tracks(&folder("b")).await.unwrap_err();
    assert!(matches!(
        err,
        LibraryError::FolderUnavailable {
            source: SourceError::Malformed { .. },
            ..
        }
    ));
}

fn write_folder(root: &Path, id: &str, body: Option<&str>) {
    let dir = root.join(id);
    fs::create_dir_all(&dir).unwrap();
    if let Some(body) = body {
        fs::write(dir.join("info.json"), body).unwrap();
        fs::write(dir.join("cover.jpg"), b"jpeg").unwrap();
    }
}

#[tokio::test]
async fn dir_source_lists_visible_subdirectories_in_name_order() {
    let dir = tempdir().unwrap();
    write_folder(dir.path(), "rock", Some(&info("Rock", &["r1.mp3"])));
    write_folder(dir.path(), "ambient", Some(&info("Ambient", &[])));
    write_folder(dir.path(), "no-info", None);
    write_folder(dir.path(), "no-cover", Some(&info("No cover", &[])));
    fs::remove_file(dir.path().join("no-cover").join("cover.jpg")).unwrap();
    write_folder(dir.path(), ".hidden", Some(&info("Hidden", &[])));
    fs::write(dir.path().join("loose.mp3"), b"not a folder").unwrap();

    let source = DirSource::new(dir.path().to_path_buf(), &LibrarySettings::default());
    let loader = LibraryLoader::new(Box::new(source));

    let folders = loader.list_folders().await.unwrap();
    let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["ambient", "rock"]);

    let tracks = loader.list_tracks(&folders[1]).await.unwrap();
    assert_eq!(tracks, vec![Track::new("rock", "r1.mp3")]);
}

#[tokio::test]
async fn dir_source_reads_catalog_file_when_configured() {
    let dir = tempdir().unwrap();
    write_folder(dir.path(), "b", Some(&info("B", &[])));
    write_folder(dir.path(), "a", Some(&info("A", &[])));
    fs::write(dir.path().join("index.json"), r#"["b", "a"]"#).unwrap();

    let settings = LibrarySettings {
        catalog_file: Some("index.json".into()),
        ..LibrarySettings::default()
    };
    let source = DirSource::new(dir.path().to_path_buf(), &settings);
    let ids = source.fetch_catalog().await.unwrap();
    assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);
}

#[tokio::test]
async fn dir_source_missing_root_is_catalog_unavailable() {
    let dir = tempdir().unwrap();
    let source = DirSource::new(dir.path().join("nope"), &LibrarySettings::default());
    let loader = LibraryLoader::new(Box::new(source));

    assert!(matches!(
        loader.list_folders().await,
        Err(LibraryError::CatalogUnavailable(SourceError::NotFound(_)))
    ));
}

#[tokio::test]
async fn http_source_reads_directory_listing_and_skips_missing_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/songs/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ul><li><a href="ncs/">ncs/</a></li><li><a href="gone/">gone/</a></li></ul>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/songs/ncs/info.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(info("NCS", &["Song%20One.mp3"])),
        )
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/songs/ncs/cover.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/songs/gone/info.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = format!("{}/songs", server.uri());
    let source = HttpSource::new(base, &LibrarySettings::default()).unwrap();
    let loader = LibraryLoader::new(Box::new(source));

    let folders = loader.list_folders().await.unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].id, "ncs");
    assert_eq!(folders[0].title, "NCS");

    let tracks = loader.list_tracks(&folders[0]).await.unwrap();
    assert_eq!(tracks[0].source_path(), "ncs/Song%20One.mp3");
}

#[tokio::test]
async fn http_source_server_error_on_catalog_is_catalog_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/songs/index.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let settings = LibrarySettings {
        catalog_file: Some("index.json".into()),
        ..LibrarySettings::default()
    };
    let source = HttpSource::new(format!("{}/songs/", server.uri()), &settings).unwrap();
    let loader = LibraryLoader::new(Box::new(source));

    match loader.list_folders().await {
        Err(LibraryError::CatalogUnavailable(SourceError::Status { status, .. })) => {
            assert_eq!(status, 500)
        }
        other => panic!("expected CatalogUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn http_source_skips_folder_whose_cover_is_not_served() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/songs/index.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"["a", "b"]"#))
        .mount(&server)
        .await;

    for id in ["a", "b"] {
        Mock::given(method("GET"))
            .and(path(format!("/songs/{id}/info.json")))
            .respond_with(ResponseTemplate::new(200).set_body_string(info(id, &[])))
            .mount(&server)
            .await;
    }

    Mock::given(method("HEAD"))
        .and(path("/songs/a/cover.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/songs/b/cover.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let settings = LibrarySettings {
        catalog_file: Some("index.json".into()),
        ..LibrarySettings::default()
    };
    let source = HttpSource::new(format!("{}/songs", server.uri()), &settings).unwrap();
    assert!(!source.asset_exists("a/cover.jpg").await.unwrap());

    let loader = LibraryLoader::new(Box::new(source));
    let folders = loader.list_folders().await.unwrap();
    let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["b"]);
}
