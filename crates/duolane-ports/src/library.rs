use crate::types::SongId;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum LibraryError {
    #[error("song not found: {0}")]
    NotFound(SongId),
    #[error("io error: {0}")]
    Io(String),
    #[error("catalog error: {0}")]
    Catalog(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInfo {
    pub id: SongId,
    pub audio_file: String,
    pub title: String,
    pub artist: String,
}

pub trait SongLibraryPort: Send + Sync {
    fn list_songs(&self) -> Result<Vec<SongInfo>, LibraryError>;

    /// Raw chart JSON for `song`.
    fn read_chart(&self, song: &SongId) -> Result<Vec<u8>, LibraryError>;
}
