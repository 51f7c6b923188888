//! Entity-list discovery: rescuable characters and other interesting actors.

use super::{Candidate, DiscoverySource, ScanContext, TrackedKey};
use crate::profile::CueProfile;
use std::sync::Arc;

/// Scans the host's active-entity array for an allow-list of subtypes.
///
/// Eligibility follows the host flags: the entity must be active, not hidden,
/// and not already defeated. Keys use the raw slot index, which the host
/// keeps stable for a living entity.
pub struct EntityBeaconSource {
    source_id: u16,
    scan_radius_tiles: f32,
    allowed_types: Vec<i32>,
    profile: Arc<CueProfile>,
}

impl EntityBeaconSource {
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

impl DiscoverySource for EntityBeaconSource {
    fn source_id(&self) -> u16 {
        self.source_id
    }

    fn collect(&mut self, ctx: &ScanContext<'_>, out: &mut Vec<Candidate>) {
        if self.allowed_types.is_empty() || self.scan_radius_tiles <= 0.0 {
            return;
        }
        let max_px = self.scan_radius_tiles * ctx.tile_size_px;
        let max_sq = max_px * max_px;
        for entity in ctx.world.entities() {
            if !entity.active || entity.hidden || entity.defeated {
                continue;
            }
            if !self.allowed_types.contains(&entity.type_id) {
                continue;
            }
            if entity.position.distance_squared(ctx.listener.position) > max_sq {
                continue;
            }
            out.push(Candidate {
                key: TrackedKey::new(self.source_id, entity.slot as u64),
                position: entity.position,
                profile: self.profile.clone(),
                label_override: (!entity.name.is_empty()).then(|| entity.name.clone()),
            });
        }
    }
}
