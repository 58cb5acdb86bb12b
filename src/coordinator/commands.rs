//! Playback command surface

use crate::model::Track;
use crate::queue;

use super::PlaybackCoordinator;

impl PlaybackCoordinator {
    /// Load a track into the device without moving the playlist cursor.
    ///
    /// Optimistic: observers see `is_loading` and the new `current_track`
    /// immediately, before the device confirms anything. A load issued
    /// while an earlier one is still in flight supersedes it; late events
    /// for the superseded load are discarded.
    pub async fn load_track(&self, track: Track) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        self.begin_load(&mut state, &track);
    }

    /// Start or resume playback.
    ///
    /// With no track loaded this plays the first playlist entry; on an
    /// empty playlist it is a no-op.
    pub async fn play(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        if state.playback.current_track.is_none() {
            if self.playlist.is_empty() {
                tracing::debug!("Play requested with no track loaded and an empty playlist");
                return;
            }
            self.play_at_index(&mut state, 0);
            return;
        }
        if let Some(device) = &state.device {
            device.play();
        }
    }

    /// Forward pause to the device. Play/pause state must reflect
    /// confirmed device state, so the flag flips only once the device
    /// reports it.
    pub async fn pause(&self) {
        let state = self.state.lock().await;
        if let Some(device) = &state.device {
            device.pause();
        }
    }

    /// Forward stop to the device; state updates arrive via device events.
    pub async fn stop(&self) {
        let state = self.state.lock().await;
        if let Some(device) = &state.device {
            device.stop();
        }
    }

    /// Forward a seek. `current_time` stays device-reported: the next
    /// position poll reflects the committed position, so the UI never
    /// shows an uncommitted one.
    pub async fn seek(&self, seconds: f64) {
        let state = self.state.lock().await;
        if let Some(device) = &state.device {
            device.seek_to(seconds);
        }
    }

    /// Set the volume, clamped to 0-100.
    ///
    /// Volume is the one locally authoritative field: devices do not
    /// reliably echo volume changes, so state updates immediately whether
    /// or not a device is attached yet.
    pub async fn set_volume(&self, volume: u8) {
        let clamped = volume.min(100);
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        if let Some(device) = &state.device {
            device.set_volume(clamped);
        }
        state.playback.volume = clamped;
        state.notify_observers();
    }

    /// Select a playlist entry by position and start loading it.
    /// Out-of-range indices are ignored.
    pub async fn play_track_by_index(&self, index: usize) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        self.play_at_index(&mut state, index);
    }

    /// Advance the cursor: random under shuffle, sequential wraparound
    /// otherwise.
    pub async fn next_track(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down || self.playlist.is_empty() {
            return;
        }
        let current = state.playback.current_index;
        let shuffle = state.playback.shuffle_enabled;
        let next = queue::advance(self.playlist.len(), current, shuffle, &mut state.rng);
        if let Some(index) = next {
            tracing::debug!(from = ?current, to = index, shuffle, "Skipping to next track");
            self.play_at_index(&mut state, index);
        }
    }

    /// Step the cursor back one position, wrapping to the end from the
    /// start. Always sequential; shuffle does not apply backwards.
    pub async fn previous_track(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down || self.playlist.is_empty() {
            return;
        }
        let previous = queue::retreat(self.playlist.len(), state.playback.current_index);
        if let Some(index) = previous {
            tracing::debug!(to = index, "Skipping to previous track");
            self.play_at_index(&mut state, index);
        }
    }

    /// Flip shuffle. Local state only, no device interaction.
    pub async fn toggle_shuffle(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        state.playback.shuffle_enabled = !state.playback.shuffle_enabled;
        tracing::debug!(shuffle = state.playback.shuffle_enabled, "Shuffle toggled");
        state.notify_observers();
    }

    /// Cycle repeat off → one → all → off. Local state only.
    pub async fn cycle_repeat(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        state.playback.repeat_mode = state.playback.repeat_mode.cycle();
        tracing::debug!(repeat = %state.playback.repeat_mode, "Repeat mode cycled");
        state.notify_observers();
    }
}
