//! Tile-based discovery: pattern matching and connected-component clustering.

use super::{Candidate, DiscoverySource, ScanContext, TrackedKey};
use crate::host::TileInfo;
use crate::profile::CueProfile;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// One matchable tile feature.
#[derive(Clone)]
pub struct TileDef {
    /// Tile types this definition matches.
    pub type_ids: Vec<u16>,
    /// When set, only the tile whose sprite frame equals this anchor counts,
    /// so a multi-tile object yields one candidate at its canonical top-left
    /// cell instead of one per occupied cell.
    pub anchor_frame: Option<(i16, i16)>,
    /// Extra per-tile condition, e.g. "chest is not trapped".
    pub predicate: Option<fn(&TileInfo) -> bool>,
    pub profile: Arc<CueProfile>,
    /// Label override for candidates of this definition.
    pub label: Option<String>,
}

impl TileDef {
    pub fn new(type_ids: Vec<u16>, profile: Arc<CueProfile>) -> Self {
        Self {
            type_ids,
            anchor_frame: None,
            predicate: None,
            profile,
            label: None,
        }
    }

    pub fn anchor_frame(mut self, frame_x: i16, frame_y: i16) -> Self {
        self.anchor_frame = Some((frame_x, frame_y));
        self
    }

    pub fn predicate(mut self, predicate: fn(&TileInfo) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn matches(&self, tile: &TileInfo) -> bool {
        if !tile.active || !self.type_ids.contains(&tile.type_id) {
            return false;
        }
        if let Some((fx, fy)) = self.anchor_frame {
            if tile.frame_x != fx || tile.frame_y != fy {
                return false;
            }
        }
        match self.predicate {
            Some(predicate) => predicate(tile),
            None => true,
        }
    }
}

/// Scans a bounded tile window for definition matches.
///
/// Every matching tile yields one candidate keyed by its definition index and
/// anchor coordinates, so identity is stable across rebuilds while the tile
/// stays put.
pub struct TileMatchSource {
    source_id: u16,
    scan_radius_tiles: i32,
    defs: Vec<TileDef>,
}

impl TileMatchSource {
    pub fn new(source_id: u16, scan_radius_tiles: i32, defs: Vec<TileDef>) -> Self {
        Self {
            source_id,
            scan_radius_tiles,
            defs,
        }
    }
}

impl DiscoverySource for TileMatchSource {
    fn source_id(&self) -> u16 {
        self.source_id
    }

    fn collect(&mut self, ctx: &ScanContext<'_>, out: &mut Vec<Candidate>) {
        if self.defs.is_empty() {
            return;
        }
        let Some(window) = ctx.tile_window(self.scan_radius_tiles) else {
            return;
        };
        for y in window.y0..=window.y1 {
            for x in window.x0..=window.x1 {
                let Some(tile) = ctx.world.tile_at(x, y) else {
                    continue;
                };
                for (def_index, def) in self.defs.iter().enumerate() {
                    if !def.matches(&tile) {
                        continue;
                    }
                    out.push(Candidate {
                        key: TrackedKey::for_tile(self.source_id, def_index as u16, x, y),
                        position: ctx.tile_px(x, y),
                        profile: def.profile.clone(),
                        label_override: def.label.clone(),
                    });
                }
            }
        }
    }
}

/// One clusterable tile feature (an ore or gem type).
#[derive(Clone)]
pub struct ClusterDef {
    pub type_ids: Vec<u16>,
    pub profile: Arc<CueProfile>,
    pub label: Option<String>,
}

impl ClusterDef {
    pub fn new(type_ids: Vec<u16>, profile: Arc<CueProfile>) -> Self {
        Self {
            type_ids,
            profile,
            label: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Connected-component source for naturally clustered single-tile features.
///
/// Runs a bounded breadth-first flood fill over 4-adjacent tiles of the same
/// type and emits exactly one candidate per cluster, positioned at the
/// cluster tile nearest the listener and keyed by the cluster's minimum
/// in-window tile. The search never leaves the scan window, so a huge vein
/// costs at most one window's worth of visits.
pub struct TileClusterSource {
    source_id: u16,
    scan_radius_tiles: i32,
    defs: Vec<ClusterDef>,
    // Scratch reused across passes.
    visited: HashSet<(i32, i32)>,
    frontier: VecDeque<(i32, i32)>,
}

impl TileClusterSource {
    pub fn new(source_id: u16, scan_radius_tiles: i32, defs: Vec<ClusterDef>) -> Self {
        Self {
            source_id,
            scan_radius_tiles,
            defs,
            visited: HashSet::new(),
            frontier: VecDeque::new(),
        }
    }

    fn def_matching(&self, tile: &TileInfo) -> Option<usize> {
        if !tile.active {
            return None;
        }
        self.defs
            .iter()
            .position(|def| def.type_ids.contains(&tile.type_id))
    }
}

impl DiscoverySource for TileClusterSource {
    fn source_id(&self) -> u16 {
        self.source_id
    }

    fn collect(&mut self, ctx: &ScanContext<'_>, out: &mut Vec<Candidate>) {
        if self.defs.is_empty() {
            return;
        }
        let Some(window) = ctx.tile_window(self.scan_radius_tiles) else {
            return;
        };
        self.visited.clear();

        for y in window.y0..=window.y1 {
            for x in window.x0..=window.x1 {
                if self.visited.contains(&(x, y)) {
                    continue;
                }
                let Some(tile) = ctx.world.tile_at(x, y) else {
                    continue;
                };
                let Some(def_index) = self.def_matching(&tile) else {
                    continue;
                };
                let seed_type = tile.type_id;

                // Flood the whole cluster of `seed_type` tiles, tracking the
                // tile nearest the listener and the minimum corner for the
                // stable key.
                self.frontier.clear();
                self.frontier.push_back((x, y));
                self.visited.insert((x, y));
                let mut nearest = (x, y);
                let mut nearest_dist = ctx
                    .tile_px(x, y)
                    .distance_squared(ctx.listener.position);
                let mut min_tile = (x, y);

                while let Some((cx, cy)) = self.frontier.pop_front() {
                    let dist = ctx
                        .tile_px(cx, cy)
                        .distance_squared(ctx.listener.position);
                    if dist < nearest_dist {
                        nearest_dist = dist;
                        nearest = (cx, cy);
                    }
                    if (cx, cy) < min_tile {
                        min_tile = (cx, cy);
                    }
                    for (nx, ny) in [(cx - 1, cy), (cx + 1, cy), (cx, cy - 1), (cx, cy + 1)] {
                        if !window.contains(nx, ny) || self.visited.contains(&(nx, ny)) {
                            continue;
                        }
                        let Some(neighbor) = ctx.world.tile_at(nx, ny) else {
                            continue;
                        };
                        if neighbor.active && neighbor.type_id == seed_type {
                            self.visited.insert((nx, ny));
                            self.frontier.push_back((nx, ny));
                        }
                    }
                }

                let def = &self.defs[def_index];
                out.push(Candidate {
                    key: TrackedKey::for_tile(
                        self.source_id,
                        def_index as u16,
                        min_tile.0,
                        min_tile.1,
                    ),
                    position: ctx.tile_px(nearest.0, nearest.1),
                    profile: def.profile.clone(),
                    label_override: def.label.clone(),
                });
            }
        }
    }
}
