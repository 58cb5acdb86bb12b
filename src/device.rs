//! Playback device boundary
//!
//! The coordinator drives an opaque, remotely controlled media player
//! through this narrow command surface and hears back through
//! [`DeviceEvent`]s. Nothing in the crate assumes a concrete player: hosts
//! supply one through the async factory passed at construction, and the
//! factory future resolving is the device's "ready" signal.

use anyhow::Result;
use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// Volume applied until the host sets one.
pub const DEFAULT_VOLUME_PERCENT: u8 = 80;

/// Command surface of an external media player.
///
/// Commands are fire-and-forget: completion is observable only through
/// subsequent [`DeviceEvent`]s, never through return values. Implementations
/// must not block and must not panic; readings that are not known yet are
/// reported as the 0.0 sentinel.
pub trait MediaDevice: Send + Sync {
    /// Begin buffering a media item. `request_id` is a monotonically
    /// increasing tag assigned by the coordinator; the device must echo the
    /// tag of its most recent load in every event it emits afterwards.
    fn load_media(&self, media_id: &str, request_id: u64);

    fn play(&self);

    fn pause(&self);

    fn stop(&self);

    fn seek_to(&self, seconds: f64);

    /// Best-effort immediate. Devices do not reliably echo volume changes,
    /// so no event is expected in response.
    fn set_volume(&self, volume: u8);

    /// Last known playback position in seconds; 0.0 until known.
    fn position(&self) -> f64;

    /// Length of the loaded media in seconds; 0.0 until known.
    fn duration(&self) -> f64;

    /// Release device resources. Idempotent.
    fn shutdown(&self);
}

/// Everything a device can tell the coordinator, tagged with the id of the
/// load the report pertains to so that stale reports can be discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceEvent {
    /// Audio output started or resumed.
    Playing { request_id: u64 },
    /// Audio output stopped; the item remains loaded.
    Paused { request_id: u64 },
    /// The device is buffering.
    Buffering { request_id: u64 },
    /// The current item played to completion.
    Ended { request_id: u64 },
    /// A requested item is loaded and ready but not playing.
    Cued { request_id: u64 },
    /// Device-specific failure.
    Error { request_id: u64, code: i32 },
}

impl DeviceEvent {
    /// Id of the load this event refers to; 0 before any load was issued.
    pub fn request_id(&self) -> u64 {
        match self {
            DeviceEvent::Playing { request_id }
            | DeviceEvent::Paused { request_id }
            | DeviceEvent::Buffering { request_id }
            | DeviceEvent::Ended { request_id }
            | DeviceEvent::Cued { request_id }
            | DeviceEvent::Error { request_id, .. } => *request_id,
        }
    }

    /// Event name for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            DeviceEvent::Playing { .. } => "playing",
            DeviceEvent::Paused { .. } => "paused",
            DeviceEvent::Buffering { .. } => "buffering",
            DeviceEvent::Ended { .. } => "ended",
            DeviceEvent::Cued { .. } => "cued",
            DeviceEvent::Error { .. } => "error",
        }
    }
}

/// Sending half of the device event channel, handed to the device factory
/// so the device implementation can report back to the coordinator.
#[derive(Clone)]
pub struct DeviceEventSink {
    tx: mpsc::UnboundedSender<DeviceEvent>,
}

impl DeviceEventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<DeviceEvent>) -> Self {
        Self { tx }
    }

    /// Deliver an event to the coordinator. Events emitted after the
    /// coordinator was torn down are dropped silently.
    pub fn emit(&self, event: DeviceEvent) {
        let _ = self.tx.send(event);
    }
}

/// Future produced by a device factory; resolves once the device finished
/// its asynchronous bootstrap and is ready for commands.
pub type DeviceFuture = BoxFuture<'static, Result<Box<dyn MediaDevice>>>;
