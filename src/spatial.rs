//! Spatial cue math: deterministic mapping from a 2D offset and a profile to
//! playback parameters.

use crate::config::TileSonicConfig;
use crate::math::{self, Vec2};
use crate::profile::CueProfile;

/// Playback parameters derived for one cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueParams {
    /// Stereo pan, -1 (left) .. 1 (right).
    pub pan: f32,
    /// Pitch offset; positive means the target is above the listener.
    pub pitch: f32,
    /// Final output volume, 0..1. At or below zero the cue is suppressed.
    pub volume: f32,
    pub distance_tiles: f32,
}

impl CueParams {
    pub fn audible(&self) -> bool {
        self.volume > 0.0
    }
}

/// Distance-falloff shaping curve: an exponent-shaped attack with a
/// configurable floor, so even the faintest audible cue keeps a minimum
/// presence.
pub fn distance_falloff(closeness: f32, exponent: f32, floor: f32) -> f32 {
    let closeness = closeness.clamp(0.0, 1.0);
    let floor = floor.clamp(0.0, 1.0);
    floor + (1.0 - floor) * closeness.powf(exponent.max(0.0))
}

/// Derives pan, pitch, and volume for a candidate `offset_px` away from the
/// listener (candidate position minus listener position).
pub fn cue_params(
    offset_px: Vec2,
    profile: &CueProfile,
    config: &TileSonicConfig,
    master_volume: f32,
) -> CueParams {
    let pitch = (-offset_px.y / profile.pitch_scale_px)
        .clamp(-profile.pitch_clamp, profile.pitch_clamp);
    let pan = (offset_px.x / profile.pan_scale_px).clamp(-1.0, 1.0);
    let distance_tiles = math::px_to_tiles(offset_px.length(), config.tile_size_px);

    let closeness = if profile.max_audible_tiles > 0.0 {
        1.0 - (distance_tiles / profile.max_audible_tiles).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let volume = math::lerp(profile.min_volume, profile.max_volume, closeness)
        * distance_falloff(closeness, config.falloff_exponent, config.falloff_floor)
        * master_volume
        * config.world_cue_scale;

    CueParams {
        pan,
        pitch,
        volume: volume.clamp(0.0, 1.0),
        distance_tiles,
    }
}
