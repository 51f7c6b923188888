//! Discovery sources: pluggable scanners that enumerate candidate world
//! features around the listener.
//!
//! Each source covers one category of interest and is polymorphic over a
//! single capability, [`DiscoverySource::collect`]. New categories implement
//! the trait; the scheduler itself never changes.

mod entities;
mod items;
mod tiles;

pub use entities::EntityBeaconSource;
pub use items::ItemDropSource;
pub use tiles::{ClusterDef, TileClusterSource, TileDef, TileMatchSource};

use crate::config::TileSonicConfig;
use crate::host::{Listener, WorldQuery};
use crate::math::{self, Vec2};
use crate::profile::CueProfile;
use std::sync::Arc;

/// Stable composite identity of a tracked world feature.
///
/// `source_id` names the producing source; `local_id` is whatever that source
/// can re-derive for "the same" feature on every rebuild (packed tile
/// coordinates, an entity slot index). Within one source, two
/// simultaneously-collected candidates never share a `local_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackedKey {
    pub source_id: u16,
    pub local_id: u64,
}

impl TrackedKey {
    pub fn new(source_id: u16, local_id: u64) -> Self {
        Self {
            source_id,
            local_id,
        }
    }

    /// Key for a tile-anchored feature: packs the definition index and the
    /// anchor tile coordinates into the local id. Coordinates are taken
    /// modulo 2^24, far above any real world extent.
    pub fn for_tile(source_id: u16, def_index: u16, x: i32, y: i32) -> Self {
        let local_id = ((def_index as u64) << 48)
            | (((x as u32 as u64) & 0xFF_FFFF) << 24)
            | ((y as u32 as u64) & 0xFF_FFFF);
        Self {
            source_id,
            local_id,
        }
    }
}

/// A world feature eligible for a proximity cue in the current scan.
///
/// Rebuilt from scratch on every scan pass; identity across rebuilds lives in
/// `key`, not in the struct itself.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub key: TrackedKey,
    /// World position in pixels.
    pub position: Vec2,
    pub profile: Arc<CueProfile>,
    /// Display label replacing the profile's default when present.
    pub label_override: Option<String>,
}

impl Candidate {
    /// Label shown in the exploration UI and arrival announcements.
    pub fn label(&self) -> &str {
        if let Some(label) = self.label_override.as_deref() {
            return label;
        }
        if !self.profile.arrival_label.is_empty() {
            return &self.profile.arrival_label;
        }
        &self.profile.name
    }
}

/// Inclusive tile rectangle, already clamped to world bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TileWindow {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Everything a source needs for one collection pass.
pub struct ScanContext<'a> {
    pub world: &'a dyn WorldQuery,
    pub listener: &'a Listener,
    pub tile_size_px: f32,
}

impl<'a> ScanContext<'a> {
    pub fn new(world: &'a dyn WorldQuery, listener: &'a Listener, config: &TileSonicConfig) -> Self {
        Self {
            world,
            listener,
            tile_size_px: config.tile_size_px,
        }
    }

    /// Tile coordinates under the listener.
    pub fn listener_tile(&self) -> (i32, i32) {
        math::px_to_tile(self.listener.position, self.tile_size_px)
    }

    /// World-space pixel position of a tile's top-left corner.
    pub fn tile_px(&self, x: i32, y: i32) -> Vec2 {
        math::tile_origin_px(x, y, self.tile_size_px)
    }

    /// The scan window of `radius_tiles` around the listener, clamped to
    /// world bounds. `None` when the window falls entirely outside the world
    /// or the radius is degenerate.
    pub fn tile_window(&self, radius_tiles: i32) -> Option<TileWindow> {
        if radius_tiles <= 0 {
            return None;
        }
        let (width, height) = self.world.bounds();
        if width == 0 || height == 0 {
            return None;
        }
        let (cx, cy) = self.listener_tile();
        let x0 = (cx - radius_tiles).clamp(0, width as i32 - 1);
        let x1 = (cx + radius_tiles).clamp(0, width as i32 - 1);
        let y0 = (cy - radius_tiles).clamp(0, height as i32 - 1);
        let y1 = (cy + radius_tiles).clamp(0, height as i32 - 1);
        if cx + radius_tiles < 0
            || cy + radius_tiles < 0
            || cx - radius_tiles >= width as i32
            || cy - radius_tiles >= height as i32
        {
            return None;
        }
        Some(TileWindow { x0, y0, x1, y1 })
    }
}

/// A scanner producing unordered candidates for one category of interest.
///
/// `collect` receives `&mut self` so implementations may keep reusable
/// scratch buffers (the flood-fill source reuses its visited set across
/// passes). Implementations must tolerate empty or out-of-range scan windows
/// by producing nothing, and a source with no configured definitions is a
/// no-op.
pub trait DiscoverySource {
    /// Identifier baked into every key this source produces.
    fn source_id(&self) -> u16;

    /// Append all candidates within the source's scan radius to `out`.
    fn collect(&mut self, ctx: &ScanContext<'_>, out: &mut Vec<Candidate>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_key_packing_distinct() {
        let a = TrackedKey::for_tile(1, 0, 10, 20);
        let b = TrackedKey::for_tile(1, 0, 20, 10);
        let c = TrackedKey::for_tile(1, 1, 10, 20);
        assert_ne!(a, b);
        assert_ne!(a, c);
        // Re-deriving the same feature yields the same key.
        assert_eq!(a, TrackedKey::for_tile(1, 0, 10, 20));
    }

    #[test]
    fn test_candidate_label_priority() {
        let profile = Arc::new(
            CueProfile::new(
                "ore",
                crate::profile::CueStyle::Library {
                    style: 0,
                    volume_scale: 1.0,
                },
            )
            .arrival_label("ore vein"),
        );
        let mut candidate = Candidate {
            key: TrackedKey::new(0, 0),
            position: Vec2::ZERO,
            profile,
            label_override: Some("silver vein".into()),
        };
        assert_eq!(candidate.label(), "silver vein");
        candidate.label_override = None;
        assert_eq!(candidate.label(), "ore vein");
    }
}
