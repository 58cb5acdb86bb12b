//! Canonical playback state shared with observers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::DEFAULT_VOLUME_PERCENT;

use super::track::Track;

/// Repeat behavior applied when a track plays to completion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop once the playlist is exhausted.
    #[default]
    Off,
    /// Replay the current track indefinitely.
    One,
    /// Wrap around to the start of the playlist.
    All,
}

impl RepeatMode {
    /// Next mode in the user-facing cycle: off → one → all → off.
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatMode::Off => write!(f, "off"),
            RepeatMode::One => write!(f, "one"),
            RepeatMode::All => write!(f, "all"),
        }
    }
}

/// Snapshot of everything an observer needs to render playback.
///
/// Owned and mutated exclusively by the coordinator. Observers receive
/// independent clones, so nothing they do to a snapshot can reach back
/// into the engine.
#[derive(Clone, Debug, Serialize)]
pub struct PlaybackState {
    /// Device is actively outputting audio.
    pub is_playing: bool,
    /// Track currently loaded into the device, if any.
    pub current_track: Option<Track>,
    /// Playlist position of `current_track`. `None` when nothing is loaded
    /// or the playlist was exhausted without repeat.
    pub current_index: Option<usize>,
    /// Last device-reported position, in seconds.
    pub current_time: f64,
    /// Last device-reported length, in seconds; 0 until the device knows it.
    pub duration: f64,
    /// 0-100.
    pub volume: u8,
    /// A requested track is still buffering/cueing.
    pub is_loading: bool,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_track: None,
            current_index: None,
            current_time: 0.0,
            duration: 0.0,
            volume: DEFAULT_VOLUME_PERCENT,
            is_loading: false,
            shuffle_enabled: false,
            repeat_mode: RepeatMode::Off,
        }
    }
}
