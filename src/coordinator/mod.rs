//! Coordinator module - Session orchestration and observer plumbing
//!
//! This module contains the playback coordinator that owns canonical
//! state, drives the device, and fans state snapshots out to observers.
//! It is organized into submodules by responsibility:
//!
//! - `commands`: the public playback command surface
//! - `runtime`: the serialized device-event and position-poll task

mod commands;
mod runtime;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, watch, Mutex};

use crate::device::{DeviceEventSink, DeviceFuture, MediaDevice, DEFAULT_VOLUME_PERCENT};
use crate::model::{PlaybackState, Playlist, Track};

/// Tuning for one coordinator session.
#[derive(Clone, Debug)]
pub struct CoordinatorOptions {
    /// How often position/duration are read from the device while playing.
    pub poll_interval: Duration,
    /// How long to wait after a device error before skipping onward.
    pub error_skip_delay: Duration,
    /// Volume until the host sets one; clamped to 100.
    pub initial_volume: u8,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            error_skip_delay: Duration::from_secs(1),
            initial_volume: DEFAULT_VOLUME_PERCENT,
        }
    }
}

/// Handle returned by [`PlaybackCoordinator::subscribe`]; pass it back to
/// [`PlaybackCoordinator::unsubscribe`] to stop receiving snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(PlaybackState) + Send>;

/// Load that arrived while the device was still booting. Single slot: a
/// newer request overwrites an older one that never fired.
struct PendingLoad {
    media_id: String,
    request_id: u64,
}

/// Everything the coordinator guards behind one lock. All transitions run
/// with the guard held, so no two of them interleave mid-mutation.
struct EngineState {
    playback: PlaybackState,
    device: Option<Box<dyn MediaDevice>>,
    pending_load: Option<PendingLoad>,
    /// Id of the most recent outbound load; device events tagged with
    /// anything older are stale and discarded.
    latest_request: u64,
    observers: HashMap<u64, Observer>,
    next_observer_id: u64,
    rng: StdRng,
    torn_down: bool,
}

impl EngineState {
    /// Deliver an independent snapshot to every observer. Runs inside the
    /// mutation that caused it, so observers always see consistent state
    /// in order. Observers must not block.
    fn notify_observers(&self) {
        for observer in self.observers.values() {
            observer(self.playback.clone());
        }
    }
}

/// Session-scoped playback engine.
///
/// Owns the canonical [`PlaybackState`], drives the [`MediaDevice`]
/// produced by the factory, reconciles asynchronous device events back
/// into state, and notifies subscribed observers on every mutation. The
/// handle is cheap to clone; all clones address the same session.
#[derive(Clone)]
pub struct PlaybackCoordinator {
    state: Arc<Mutex<EngineState>>,
    playlist: Arc<Playlist>,
    options: CoordinatorOptions,
    shutdown: Arc<watch::Sender<bool>>,
}

impl PlaybackCoordinator {
    /// Build a coordinator with default options.
    ///
    /// `connect` receives the event sink the device reports through and
    /// returns the device's bootstrap future; the future resolving is the
    /// ready signal. Loads requested before then are queued (latest wins)
    /// and replayed once the device is up. Must be called within a tokio
    /// runtime: construction spawns the bootstrap and the event/poll task.
    pub fn new<F>(playlist: Playlist, connect: F) -> Self
    where
        F: FnOnce(DeviceEventSink) -> DeviceFuture,
    {
        Self::with_options(playlist, connect, CoordinatorOptions::default())
    }

    pub fn with_options<F>(playlist: Playlist, connect: F, options: CoordinatorOptions) -> Self
    where
        F: FnOnce(DeviceEventSink) -> DeviceFuture,
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let playback = PlaybackState {
            volume: options.initial_volume.min(100),
            ..PlaybackState::default()
        };

        let state = EngineState {
            playback,
            device: None,
            pending_load: None,
            latest_request: 0,
            observers: HashMap::new(),
            next_observer_id: 0,
            rng: StdRng::from_entropy(),
            torn_down: false,
        };

        let coordinator = Self {
            state: Arc::new(Mutex::new(state)),
            playlist: Arc::new(playlist),
            options,
            shutdown: Arc::new(shutdown_tx),
        };

        let bootstrap = connect(DeviceEventSink::new(event_tx));
        coordinator.spawn_device_init(bootstrap);
        runtime::spawn(coordinator.clone(), event_rx, shutdown_rx);

        coordinator
    }

    fn spawn_device_init(&self, bootstrap: DeviceFuture) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            match bootstrap.await {
                Ok(device) => coordinator.install_device(device).await,
                Err(e) => {
                    tracing::error!(error = %e, "Device bootstrap failed, playback commands will be ignored");
                }
            }
        });
    }

    async fn install_device(&self, device: Box<dyn MediaDevice>) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            device.shutdown();
            return;
        }

        // Push the session volume before anything plays, then replay the
        // latest load that queued up while the device was booting.
        device.set_volume(state.playback.volume);
        if let Some(pending) = state.pending_load.take() {
            tracing::debug!(
                media_id = %pending.media_id,
                request_id = pending.request_id,
                "Replaying load queued during device bootstrap"
            );
            device.load_media(&pending.media_id, pending.request_id);
        }
        state.device = Some(device);
        tracing::info!("Playback device ready");
    }

    /// Register an observer. It is invoked immediately with the current
    /// snapshot and again on every subsequent state mutation, each time
    /// with its own clone.
    pub async fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(PlaybackState) + Send + 'static,
    {
        let mut state = self.state.lock().await;
        let id = state.next_observer_id;
        state.next_observer_id += 1;
        observer(state.playback.clone());
        state.observers.insert(id, Box::new(observer));
        SubscriptionId(id)
    }

    /// Remove an observer. Unknown ids, including ids already removed
    /// once, are a safe no-op.
    pub async fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.state.lock().await;
        state.observers.remove(&id.0);
    }

    /// Current snapshot.
    pub async fn state(&self) -> PlaybackState {
        self.state.lock().await.playback.clone()
    }

    /// The fixed catalog this session plays from.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Tear the session down: stops the event/poll task, releases the
    /// device, drops any pending load and clears all observers.
    /// Idempotent. The coordinator is not meant to be used afterwards;
    /// late calls degrade to no-ops against the absent device.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if state.torn_down {
            return;
        }
        state.torn_down = true;
        let _ = self.shutdown.send(true);
        if let Some(device) = state.device.take() {
            device.shutdown();
        }
        state.pending_load = None;
        state.observers.clear();
        tracing::info!("Playback coordinator torn down");
    }

    /// Core of every track selection: flip to the optimistic loading
    /// state, notify, then issue the device load or queue it if the
    /// device has not finished booting.
    fn begin_load(&self, state: &mut EngineState, track: &Track) {
        state.latest_request += 1;
        let request_id = state.latest_request;

        state.playback.is_loading = true;
        state.playback.current_track = Some(track.clone());
        state.notify_observers();

        match &state.device {
            Some(device) => {
                tracing::debug!(media_id = %track.media_id, request_id, "Loading media");
                device.load_media(&track.media_id, request_id);
            }
            None => {
                tracing::debug!(media_id = %track.media_id, request_id, "Device not ready, queueing load");
                state.pending_load = Some(PendingLoad {
                    media_id: track.media_id.clone(),
                    request_id,
                });
            }
        }
    }

    /// Move the cursor to `index` and load that track. Out-of-range
    /// indices are ignored.
    fn play_at_index(&self, state: &mut EngineState, index: usize) {
        let Some(track) = self.playlist.get(index).cloned() else {
            tracing::warn!(index, len = self.playlist.len(), "Ignoring out-of-range track index");
            return;
        };
        state.playback.current_index = Some(index);
        state.notify_observers();
        self.begin_load(state, &track);
    }
}
