//! Ready-made cue profiles for the common interest categories.
//!
//! Hosts can wire a working scheduler from these and refine acoustics later;
//! every preset is an ordinary [`CueProfile`] value, so tweaking one is just
//! rebuilding it with different parameters.

use crate::profile::{CueProfile, CueStyle, Envelope, ToneSpec};
use std::sync::Arc;

fn tone(fundamental_hz: f32, partials: Vec<f32>, duration: f32, gain: f32) -> CueStyle {
    CueStyle::Tone(ToneSpec {
        fundamental_hz,
        partials,
        partial_falloff: 1.0,
        duration,
        gain,
        envelope: Envelope::default(),
    })
}

/// Containers: a warm two-partial chime.
pub fn container() -> Arc<CueProfile> {
    Arc::new(
        CueProfile::new("container", tone(660.0, vec![1.0, 2.0], 0.12, 0.8))
            .volume_range(0.15, 0.9)
            .max_audible_tiles(85.0)
            .interval_frames(90, 300)
            .arrival_label("container"),
    )
}

/// Ore and gem veins: a low buzz with odd harmonics.
pub fn ore_vein() -> Arc<CueProfile> {
    Arc::new(
        CueProfile::new("ore vein", tone(220.0, vec![1.0, 3.0, 5.0], 0.15, 0.7))
            .volume_range(0.1, 0.8)
            .max_audible_tiles(60.0)
            .interval_frames(120, 360)
            .arrival_label("ore vein"),
    )
}

/// Rescuable characters: a bright rising-feel triad.
pub fn character() -> Arc<CueProfile> {
    Arc::new(
        CueProfile::new("character", tone(523.0, vec![1.0, 1.25, 1.5], 0.2, 0.8))
            .volume_range(0.2, 1.0)
            .max_audible_tiles(100.0)
            .interval_frames(60, 240)
            .arrival_label("character"),
    )
}

/// Valuable dropped items: a short high ping.
pub fn item_drop() -> Arc<CueProfile> {
    Arc::new(
        CueProfile::new("item", tone(880.0, vec![1.0, 2.0, 4.0], 0.08, 0.7))
            .volume_range(0.15, 0.9)
            .max_audible_tiles(40.0)
            .interval_frames(45, 180)
            .arrival_label("item"),
    )
}

/// Landmark tiles: a slow hollow tone with a Hann-shaped body.
pub fn landmark() -> Arc<CueProfile> {
    let style = CueStyle::Tone(ToneSpec {
        fundamental_hz: 330.0,
        partials: vec![1.0, 2.0],
        partial_falloff: 1.0,
        duration: 0.3,
        gain: 0.6,
        envelope: Envelope {
            attack: 0.01,
            release: 0.05,
            hann: true,
        },
    });
    Arc::new(
        CueProfile::new("landmark", style)
            .volume_range(0.1, 0.7)
            .max_audible_tiles(120.0)
            .interval_frames(180, 600)
            .arrival_label("landmark"),
    )
}
