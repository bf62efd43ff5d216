use duolane_ports::library::{LibraryError, SongInfo, SongLibraryPort};
use duolane_ports::types::SongId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

const CATALOG_FILE: &str = "musicInfo.json";

#[derive(Deserialize)]
struct CatalogEntry {
    artist: String,
    title: String,
}

/// Songs directory layout:
///
/// ```text
/// songs/
///   musicInfo.json   { "<audio file>": { "artist": "..", "title": ".." }, .. }
///   <song id>.json   chart
/// ```
pub struct FsSongLibrary {
    songs_dir: PathBuf,
}

impl FsSongLibrary {
    pub fn new(songs_dir: PathBuf) -> Self {
        Self { songs_dir }
    }

    pub fn songs_dir(&self) -> &PathBuf {
        &self.songs_dir
    }

    fn chart_path(&self, song: &SongId) -> Option<PathBuf> {
        let id = song.as_str();
        if id.is_empty() || id.contains(|c: char| c == '/' || c == '\\') || id.contains("..") {
            return None;
        }
        Some(self.songs_dir.join(format!("{id}.json")))
    }
}

impl SongLibraryPort for FsSongLibrary {
    fn list_songs(&self) -> Result<Vec<SongInfo>, LibraryError> {
        let path = self.songs_dir.join(CATALOG_FILE);
        let data = fs::read(&path)
            .map_err(|e| LibraryError::Io(format!("{}: {}", path.display(), e)))?;
        let catalog: BTreeMap<String, CatalogEntry> =
            serde_json::from_slice(&data).map_err(|e| LibraryError::Catalog(e.to_string()))?;

        Ok(catalog
            .into_iter()
            .map(|(audio_file, entry)| SongInfo {
                id: SongId::from_file_name(&audio_file),
                audio_file,
                title: entry.title,
                artist: entry.artist,
            })
            .collect())
    }

    fn read_chart(&self, song: &SongId) -> Result<Vec<u8>, LibraryError> {
        let path = self
            .chart_path(song)
            .ok_or_else(|| LibraryError::NotFound(song.clone()))?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(LibraryError::NotFound(song.clone()))
            }
            Err(err) => Err(LibraryError::Io(format!("{}: {}", path.display(), err))),
        }
    }
}
