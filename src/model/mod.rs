//! Model module - Playback data types and state
//!
//! This module contains the data structures the coordinator owns and the
//! snapshot type it publishes to observers. It is organized into submodules
//! by responsibility:
//!
//! - `track`: catalog types (tracks and the fixed playlist)
//! - `playback`: the mutable playback aggregate and repeat mode

mod playback;
mod track;

// Re-export all public types for convenient access
pub use playback::{PlaybackState, RepeatMode};
pub use track::{Playlist, Track};
