//! Track and playlist catalog types

use serde::{Deserialize, Serialize};

/// One entry of the playback catalog.
///
/// Immutable once created: the coordinator only ever hands `media_id` to
/// the device, it never rewrites track fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier within the playlist.
    pub id: String,
    /// Opaque identifier understood by the playback device.
    pub media_id: String,
    pub title: String,
    pub artist: String,
}

/// Fixed, ordered sequence of tracks for one playback session.
///
/// Supplied at coordinator construction by the content catalog and never
/// modified afterwards; all navigation happens by index.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Playlist position of a track, looked up by its unique id.
    pub fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }
}
