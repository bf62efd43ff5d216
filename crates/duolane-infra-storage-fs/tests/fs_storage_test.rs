use duolane_infra_storage_fs::{FsSongLibrary, FsStorage};
use duolane_ports::library::{LibraryError, SongLibraryPort};
use duolane_ports::storage::{SettingsDto, StorageError, StoragePort};
use duolane_ports::types::SongId;
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn missing_settings_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::new(dir.path().join("nested"));

    assert_eq!(storage.load_settings().unwrap(), SettingsDto::default());
}

#[test]
fn settings_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FsStorage::new(dir.path().join("nested"));
    let settings = SettingsDto {
        clock_offset_ms: 42,
        last_song: Some(SongId::from("3")),
        ..SettingsDto::default()
    };

    storage.save_settings(&settings).unwrap();

    assert!(dir.path().join("nested/settings.json").exists());
    assert_eq!(storage.load_settings().unwrap(), settings);
}

#[test]
fn corrupt_settings_file_is_a_serde_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("settings.json"), b"[1, 2").unwrap();
    let storage = FsStorage::new(dir.path().to_path_buf());

    assert!(matches!(storage.load_settings(), Err(StorageError::Serde(_))));
}

fn songs_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("musicInfo.json"),
        r#"{
            "1.mp3": { "artist": "Band", "title": "Opening" },
            "0.mp3": { "artist": "Menu", "title": "Lobby" }
        }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("1.json"),
        r#"{ "bpm": 120, "gridSubdiv": 4, "notes": [] }"#,
    )
    .unwrap();
    dir
}

#[test]
fn lists_catalog_entries_by_id() {
    let dir = songs_dir();
    let library = FsSongLibrary::new(dir.path().to_path_buf());

    let songs = library.list_songs().unwrap();
    let ids: Vec<_> = songs.iter().map(|s| (s.id.as_str(), s.title.as_str())).collect();

    assert_eq!(ids, vec![("0", "Lobby"), ("1", "Opening")]);
    assert_eq!(songs[1].audio_file, "1.mp3");
    assert_eq!(songs[1].artist, "Band");
}

#[test]
fn reads_chart_bytes_for_known_song() {
    let dir = songs_dir();
    let library = FsSongLibrary::new(dir.path().to_path_buf());

    let bytes = library.read_chart(&SongId::from("1")).unwrap();
    assert!(String::from_utf8(bytes).unwrap().contains("gridSubdiv"));
}

#[test]
fn missing_chart_is_not_found() {
    let dir = songs_dir();
    let library = FsSongLibrary::new(dir.path().to_path_buf());

    assert!(matches!(
        library.read_chart(&SongId::from("0")),
        Err(LibraryError::NotFound(_))
    ));
    assert!(matches!(
        library.read_chart(&SongId::from("../1")),
        Err(LibraryError::NotFound(_))
    ));
}

#[test]
fn missing_catalog_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let library = FsSongLibrary::new(dir.path().to_path_buf());

    assert!(matches!(library.list_songs(), Err(LibraryError::Io(_))));
}
