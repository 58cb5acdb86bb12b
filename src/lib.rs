//! jukebox-rs - playback coordination for an opaque external media device
//!
//! This crate owns canonical playback state for one listening session,
//! drives a remotely controlled media player through a narrow command
//! surface, reconciles the player's asynchronous events back into state,
//! applies queue policy (sequential, shuffled, single-repeat and
//! playlist-repeat), and publishes immutable state snapshots to any number
//! of observers.
//!
//! Hosts construct a [`PlaybackCoordinator`] with a fixed [`Playlist`] and
//! an async device factory, subscribe for [`PlaybackState`] snapshots, and
//! call the command surface. The device itself stays behind the
//! [`MediaDevice`] trait; this crate never assumes a concrete player.

pub mod coordinator;
pub mod device;
pub mod logging;
pub mod model;
pub mod queue;

pub use coordinator::{CoordinatorOptions, PlaybackCoordinator, SubscriptionId};
pub use device::{
    DeviceEvent, DeviceEventSink, DeviceFuture, MediaDevice, DEFAULT_VOLUME_PERCENT,
};
pub use model::{PlaybackState, Playlist, RepeatMode, Track};
