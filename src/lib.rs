//! TileSonic turns nearby world features into throttled, stereo-positioned
//! audio beacons.
//!
//! Plug discovery sources into a [`BeaconScheduler`], implement the host
//! traits in [`host`] over your game state, and call
//! [`BeaconScheduler::update`] once per simulation tick. The scheduler
//! rebuilds its candidate set at a fixed scan cadence, filters by distance
//! and visibility every tick, and emits at most one spatial cue per tick in
//! a round-robin sweep with per-candidate cooldowns.

pub mod announce;
pub mod audio;
pub mod config;
pub mod error;
pub mod host;
pub mod math;
pub mod presets;
pub mod profile;
pub mod scheduler;
pub mod sources;
pub mod spatial;
pub mod synth;

pub use announce::{Announcement, AnnouncementQueue, QueuedAnnouncer, announcement_channel};
pub use audio::{AudioDevice, AudioResources, CpalToneOutput, InstanceId, InstanceState, ToneBuffer};
pub use config::TileSonicConfig;
pub use error::{Result, TileSonicError};
pub use host::{
    Announcer, EntityInfo, ExplorationRegistry, ExplorationTarget, ItemInfo, Listener,
    SelectedTarget, TileInfo, ViewRect, WorldQuery,
};
pub use profile::{CueProfile, CueStyle, Envelope, ToneSpec};
pub use scheduler::BeaconScheduler;
pub use sources::{
    Candidate, ClusterDef, DiscoverySource, EntityBeaconSource, ItemDropSource, ScanContext,
    TileClusterSource, TileDef, TileMatchSource, TrackedKey,
};
pub use spatial::{CueParams, cue_params};
