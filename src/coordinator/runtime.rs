//! Serialized device-event and position-poll task
//!
//! Device events and the poll tick are the only asynchronous re-entry
//! points into the engine. Both run through this single task, so no two
//! reconciliation steps interleave, and both die together on shutdown.

use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};

use crate::device::DeviceEvent;
use crate::queue::{self, EndedOutcome};

use super::{EngineState, PlaybackCoordinator};

pub(super) fn spawn(
    coordinator: PlaybackCoordinator,
    mut events: mpsc::UnboundedReceiver<DeviceEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let mut ticker = time::interval(coordinator.options.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                maybe_event = events.recv() => match maybe_event {
                    Some(event) => coordinator.reconcile_device_event(event).await,
                    None => break,
                },
                _ = ticker.tick() => coordinator.poll_position().await,
            }
        }
        tracing::debug!("Playback runtime task exited");
    });
}

impl PlaybackCoordinator {
    /// Fold one device report into state.
    ///
    /// A command and the event confirming it are distinct signals that may
    /// arrive in any order relative to unrelated commands; every branch
    /// here is idempotent for the fields it sets, so replays and redundant
    /// confirmations are harmless.
    pub(super) async fn reconcile_device_event(&self, event: DeviceEvent) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }

        // Reports about a load that has since been superseded say nothing
        // about the current track; drop them before touching state.
        if event.request_id() != state.latest_request {
            tracing::trace!(
                event = event.event_type(),
                request_id = event.request_id(),
                latest_request = state.latest_request,
                "Discarding stale device event"
            );
            return;
        }

        tracing::debug!(event = event.event_type(), request_id = event.request_id(), "Device event");
        match event {
            DeviceEvent::Playing { .. } => {
                state.playback.is_playing = true;
                state.playback.is_loading = false;
                state.notify_observers();
            }
            DeviceEvent::Paused { .. } => {
                state.playback.is_playing = false;
                state.notify_observers();
            }
            DeviceEvent::Buffering { .. } => {
                state.playback.is_loading = true;
                state.notify_observers();
            }
            DeviceEvent::Cued { .. } => {
                state.playback.is_loading = false;
                state.notify_observers();
            }
            DeviceEvent::Ended { .. } => self.handle_track_end(&mut state),
            DeviceEvent::Error { code, .. } => self.handle_device_error(&mut state, code),
        }
    }

    fn handle_track_end(&self, state: &mut EngineState) {
        let len = self.playlist.len();
        let current = state.playback.current_index;
        let shuffle = state.playback.shuffle_enabled;
        let repeat = state.playback.repeat_mode;

        match queue::resolve_ended(len, current, shuffle, repeat, &mut state.rng) {
            EndedOutcome::Replay => {
                // Same track from the top. The device's next playing event
                // confirms the resume, so no state change here.
                tracing::debug!(index = ?current, "Track ended, replaying");
                if let Some(device) = &state.device {
                    device.seek_to(0.0);
                    device.play();
                }
            }
            EndedOutcome::Advance(index) => {
                tracing::debug!(index, repeat = %repeat, "Track ended, advancing");
                self.play_at_index(state, index);
            }
            EndedOutcome::Stop => {
                tracing::debug!("Playlist exhausted, stopping");
                state.playback.is_playing = false;
                state.playback.current_index = None;
                state.notify_observers();
            }
        }
    }

    fn handle_device_error(&self, state: &mut EngineState, code: i32) {
        tracing::error!(code, "Playback device error");
        state.playback.is_loading = false;
        state.playback.is_playing = false;
        state.notify_observers();

        // Skip onward after a beat instead of retrying: one bad track must
        // not stall the rest of the playlist.
        let coordinator = self.clone();
        let delay = self.options.error_skip_delay;
        tokio::spawn(async move {
            time::sleep(delay).await;
            coordinator.next_track().await;
        });
    }

    /// Interval tick: merge device-reported position/duration into state.
    /// Only acts while playing; these polls are the sole source of
    /// `current_time` and `duration`.
    pub(super) async fn poll_position(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down || !state.playback.is_playing {
            return;
        }
        let (position, duration) = match &state.device {
            Some(device) => (device.position(), device.duration()),
            None => return,
        };
        state.playback.current_time = position;
        state.playback.duration = duration;
        state.notify_observers();
    }
}
