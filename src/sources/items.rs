//! Dropped-item discovery.

use super::{Candidate, DiscoverySource, ScanContext, TrackedKey};
use crate::profile::CueProfile;
use std::sync::Arc;

/// Scans active world item instances for an allow-list of item types.
///
/// The distance cutoff compares squared pixels, keeping the hot filter free
/// of square roots.
pub struct ItemDropSource {
    source_id: u16,
    scan_radius_tiles: f32,
    allowed_types: Vec<i32>,
    profile: Arc<CueProfile>,
}

impl ItemDropSource {
    pub fn new(
        source_id: u16,
        scan_radius_tiles: f32,
        allowed_types: Vec<i32>,
        profile: Arc<CueProfile>,
    ) -> Self {
        Self {
            source_id,
            scan_radius_tiles,
            allowed_types,
            profile,
        }
    }
}

impl DiscoverySource for ItemDropSource {
    fn source_id(&self) -> u16 {
        self.source_id
    }

    fn collect(&mut self, ctx: &ScanContext<'_>, out: &mut Vec<Candidate>) {
        if self.allowed_types.is_empty() || self.scan_radius_tiles <= 0.0 {
            return;
        }
        let max_px = self.scan_radius_tiles * ctx.tile_size_px;
        let max_sq = max_px * max_px;
        for item in ctx.world.items() {
            if !item.active || !self.allowed_types.contains(&item.type_id) {
                continue;
            }
            if item.position.distance_squared(ctx.listener.position) > max_sq {
                continue;
            }
            out.push(Candidate {
                key: TrackedKey::new(self.source_id, item.slot as u64),
                position: item.position,
                profile: self.profile.clone(),
                label_override: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TileSonicConfig;
    use crate::host::{EntityInfo, ItemInfo, Listener, TileInfo, WorldQuery};
    use crate::math::Vec2;
    use crate::profile::CueStyle;

    struct ItemWorld {
        items: Vec<ItemInfo>,
    }

    impl WorldQuery for ItemWorld {
        fn bounds(&self) -> (u32, u32) {
            (100, 100)
        }
        fn tile_at(&self, _x: i32, _y: i32) -> Option<TileInfo> {
            None
        }
        fn light_level_at(&self, _x: i32, _y: i32) -> f32 {
            1.0
        }
        fn entities(&self) -> &[EntityInfo] {
            &[]
        }
        fn items(&self) -> &[ItemInfo] {
            &self.items
        }
    }

    #[test]
    fn test_allow_list_and_cutoff() {
        let world = ItemWorld {
            items: vec![
                ItemInfo {
                    slot: 0,
                    type_id: 71,
                    position: Vec2::new(20.0, 0.0),
                    active: true,
                },
                ItemInfo {
                    slot: 1,
                    type_id: 71,
                    position: Vec2::new(20_000.0, 0.0),
                    active: true,
                },
                ItemInfo {
                    slot: 2,
                    type_id: 8,
                    position: Vec2::new(20.0, 0.0),
                    active: true,
                },
                ItemInfo {
                    slot: 3,
                    type_id: 71,
                    position: Vec2::new(20.0, 0.0),
                    active: false,
                },
            ],
        };
        let config = TileSonicConfig::default();
        let listener = Listener::new(Vec2::ZERO, 1.0);
        let ctx = ScanContext::new(&world, &listener, &config);
        let profile = Arc::new(CueProfile::new(
            "item",
            CueStyle::Library {
                style: 0,
                volume_scale: 1.0,
            },
        ));
        let mut source = ItemDropSource::new(4, 40.0, vec![71], profile);
        let mut out = Vec::new();
        source.collect(&ctx, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key, TrackedKey::new(4, 0));
    }
}
