//! The proximity beacon scheduler: turns unordered per-scan candidate sets
//! into a time-multiplexed, non-overlapping cue stream.
//!
//! One [`BeaconScheduler::update`] call per simulation tick drives the whole
//! pipeline: rebuild (at scan cadence) → filter → selected-target narrowing →
//! sweep ordering → arrival detection → at most one cue emission → pruning →
//! instance reaping. All timing is in wrapping tick counters; nothing here
//! blocks or touches wall-clock time.

use crate::audio::{AudioDevice, AudioResources};
use crate::config::TileSonicConfig;
use crate::error::Result;
use crate::host::{Announcer, ExplorationRegistry, ExplorationTarget, Listener, WorldQuery};
use crate::math;
use crate::profile::CueStyle;
use crate::sources::{Candidate, DiscoverySource, ScanContext, TrackedKey};
use crate::spatial;
use std::collections::{HashMap, HashSet};

/// One filtered candidate in sweep order.
#[derive(Debug, Clone, Copy)]
struct SweepEntry {
    key: TrackedKey,
    /// Index into the current candidate buffer.
    index: usize,
    distance_tiles: f32,
}

pub struct BeaconScheduler {
    config: TileSonicConfig,
    sources: Vec<Box<dyn DiscoverySource>>,
    resources: AudioResources,

    tick: u32,
    last_scan: Option<u32>,

    // Rebuilt by the sources every scan pass; buffers reused across passes.
    candidates: Vec<Candidate>,
    visible: Vec<SweepEntry>,
    snapshot: Vec<ExplorationTarget>,
    seen: HashSet<TrackedKey>,

    // Sweep state.
    sweep_keys: Vec<TrackedKey>,
    cursor: usize,
    cued_this_pass: HashSet<TrackedKey>,

    // Per-key bookkeeping, pruned when a key goes unseen for a full tick.
    next_eligible: HashMap<TrackedKey, u32>,
    arrived: HashSet<TrackedKey>,
    last_seen: HashMap<TrackedKey, u32>,
}

impl BeaconScheduler {
    pub fn new(config: TileSonicConfig) -> Self {
        let resources = AudioResources::new(config.sample_rate);
        Self {
            config,
            sources: Vec::new(),
            resources,
            tick: 0,
            last_scan: None,
            candidates: Vec::new(),
            visible: Vec::new(),
            snapshot: Vec::new(),
            seen: HashSet::new(),
            sweep_keys: Vec::new(),
            cursor: 0,
            cued_this_pass: HashSet::new(),
            next_eligible: HashMap::new(),
            arrived: HashSet::new(),
            last_seen: HashMap::new(),
        }
    }

    /// Registers a discovery source. Source ids must be unique; keys from
    /// two sources sharing an id could collide and merge their tracking
    /// state.
    pub fn add_source(&mut self, source: Box<dyn DiscoverySource>) {
        if self
            .sources
            .iter()
            .any(|existing| existing.source_id() == source.source_id())
        {
            log::warn!(
                "Discovery source id {} registered twice; tracked keys may collide",
                source.source_id()
            );
        }
        self.sources.push(source);
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// The candidate set from the most recent scan pass, pre-filtering.
    pub fn tracked_candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn resources(&self) -> &AudioResources {
        &self.resources
    }

    /// Runs one scheduling tick.
    pub fn update(
        &mut self,
        world: &dyn WorldQuery,
        listener: &Listener,
        device: &mut dyn AudioDevice,
        announcer: &mut dyn Announcer,
        registry: &mut dyn ExplorationRegistry,
    ) {
        self.tick = self.tick.wrapping_add(1);

        if listener.master_volume <= 0.0 {
            self.silence(device, registry);
            return;
        }

        let scan_due = match self.last_scan {
            None => true,
            Some(last) => math::tick_age(self.tick, last) >= self.config.scan_interval_ticks,
        };
        if scan_due {
            self.rebuild(world, listener);
        }

        self.refresh_visible(world, listener);
        self.narrow_to_selection(registry);

        if self.visible.is_empty() {
            self.sweep_keys.clear();
            self.cursor = 0;
            self.cued_this_pass.clear();
            self.arrived.clear();
            registry.update_targets(&[]);
            self.prune();
            self.resources.reap(device);
            return;
        }

        self.order_sweep();
        self.publish_snapshot(registry);
        self.detect_arrivals(announcer);
        self.emit_due_cue(listener, device);

        self.prune();
        self.resources.reap(device);
    }

    /// Stops all playback and clears every cache and tracking map. Call at
    /// world unload.
    pub fn reset(&mut self, device: &mut dyn AudioDevice) {
        self.resources.reset(device);
        self.clear_tracking();
    }

    /// Disabled path: master volume is zero, so nothing may keep sounding
    /// and the next enable starts from a fresh scan.
    fn silence(&mut self, device: &mut dyn AudioDevice, registry: &mut dyn ExplorationRegistry) {
        if self.resources.live_count() > 0 {
            log::debug!(
                "Master volume zero, stopping {} live instances",
                self.resources.live_count()
            );
        }
        self.resources.stop_all(device);
        self.clear_tracking();
        registry.update_targets(&[]);
    }

    fn clear_tracking(&mut self) {
        self.candidates.clear();
        self.visible.clear();
        self.snapshot.clear();
        self.seen.clear();
        self.sweep_keys.clear();
        self.cursor = 0;
        self.cued_this_pass.clear();
        self.next_eligible.clear();
        self.arrived.clear();
        self.last_seen.clear();
        self.last_scan = None;
    }

    fn rebuild(&mut self, world: &dyn WorldQuery, listener: &Listener) {
        self.candidates.clear();
        let ctx = ScanContext::new(world, listener, &self.config);
        for source in &mut self.sources {
            source.collect(&ctx, &mut self.candidates);
        }
        self.last_scan = Some(self.tick);
        log::debug!(
            "Scan pass at tick {} collected {} candidates",
            self.tick,
            self.candidates.len()
        );
    }

    /// Distance/visibility filter, run every tick over the current candidate
    /// buffer. Also refreshes the last-seen bookkeeping that pruning relies
    /// on.
    fn refresh_visible(&mut self, world: &dyn WorldQuery, listener: &Listener) {
        self.visible.clear();
        self.seen.clear();
        for (index, candidate) in self.candidates.iter().enumerate() {
            if !listener.view.contains(candidate.position) {
                continue;
            }
            let (tile_x, tile_y) = math::px_to_tile(candidate.position, self.config.tile_size_px);
            if world.light_level_at(tile_x, tile_y) < self.config.min_light_level {
                continue;
            }
            let distance_tiles = math::px_to_tiles(
                candidate.position.distance(listener.position),
                self.config.tile_size_px,
            );
            if distance_tiles > candidate.profile.max_audible_tiles {
                continue;
            }
            self.visible.push(SweepEntry {
                key: candidate.key,
                index,
                distance_tiles,
            });
            self.seen.insert(candidate.key);
            self.last_seen.insert(candidate.key, self.tick);
        }
    }

    /// Narrows the working set to the externally selected target: identity
    /// match first, then nearest position within the configured tolerance.
    /// A selection that matches neither is cleared and the full set stands.
    fn narrow_to_selection(&mut self, registry: &mut dyn ExplorationRegistry) {
        let Some(selected) = registry.selected_target() else {
            return;
        };

        if let Some(found) = self.visible.iter().position(|e| e.key == selected.key) {
            let entry = self.visible[found];
            self.visible.clear();
            self.visible.push(entry);
            return;
        }

        let tolerance_px =
            self.config.selected_target_tolerance_tiles * self.config.tile_size_px;
        let mut best: Option<(usize, f32)> = None;
        for (i, entry) in self.visible.iter().enumerate() {
            let distance = self.candidates[entry.index]
                .position
                .distance(selected.position);
            if distance <= tolerance_px && best.is_none_or(|(_, b)| distance < b) {
                best = Some((i, distance));
            }
        }
        match best {
            Some((i, _)) => {
                let entry = self.visible[i];
                self.visible.clear();
                self.visible.push(entry);
            }
            None => {
                log::debug!("Selected target no longer matches, reverting to full sweep");
                registry.clear_selected_target();
            }
        }
    }

    /// Stable raster order: world X, then Y. Sorting by position rather than
    /// distance keeps a sweep moving coherently across the screen instead of
    /// hopping toward and away from the listener.
    fn order_sweep(&mut self) {
        let candidates = &self.candidates;
        self.visible.sort_by(|a, b| {
            let pa = candidates[a.index].position;
            let pb = candidates[b.index].position;
            pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
        });

        let changed = self.visible.len() != self.sweep_keys.len()
            || self
                .visible
                .iter()
                .zip(&self.sweep_keys)
                .any(|(entry, key)| entry.key != *key);
        if changed {
            self.sweep_keys.clear();
            self.sweep_keys.extend(self.visible.iter().map(|e| e.key));
            self.cursor = 0;
            self.cued_this_pass.clear();
            log::debug!(
                "Sweep order changed, {} candidates, cursor reset",
                self.sweep_keys.len()
            );
        }
    }

    fn publish_snapshot(&mut self, registry: &mut dyn ExplorationRegistry) {
        self.snapshot.clear();
        for entry in &self.visible {
            let candidate = &self.candidates[entry.index];
            self.snapshot.push(ExplorationTarget {
                key: entry.key,
                label: candidate.label().to_owned(),
                position: candidate.position,
                distance_tiles: entry.distance_tiles,
            });
        }
        registry.update_targets(&self.snapshot);
    }

    /// Marks candidates inside the arrival radius and announces each once.
    /// The mark clears silently when a key drops out of the visible set, so
    /// re-entering the set re-announces but hovering at the radius boundary
    /// does not.
    fn detect_arrivals(&mut self, announcer: &mut dyn Announcer) {
        let seen = &self.seen;
        self.arrived.retain(|key| seen.contains(key));

        for entry in &self.visible {
            if entry.distance_tiles > self.config.arrival_radius_tiles {
                continue;
            }
            if !self.arrived.insert(entry.key) {
                continue;
            }
            let candidate = &self.candidates[entry.index];
            if candidate.profile.arrival_label.is_empty() {
                continue;
            }
            announcer.announce(&format!("Arrived at {}", candidate.label()), false);
        }
    }

    /// Advances the round-robin cursor and emits at most one cue. Keys
    /// already cued this pass or still cooling down are skipped; a wrap back
    /// to the start of the sweep clears the pass memory so the next full
    /// sweep can re-cue everyone.
    fn emit_due_cue(&mut self, listener: &Listener, device: &mut dyn AudioDevice) {
        let len = self.visible.len();
        for _ in 0..len {
            if self.cursor >= len {
                self.cursor = 0;
                self.cued_this_pass.clear();
            }
            let entry = self.visible[self.cursor];
            self.cursor += 1;

            if self.cued_this_pass.contains(&entry.key) {
                continue;
            }
            if let Some(&next) = self.next_eligible.get(&entry.key) {
                if !math::tick_reached(self.tick, next) {
                    continue;
                }
            }

            // The candidate takes its sweep turn whether or not anything
            // ends up audible.
            self.cued_this_pass.insert(entry.key);
            let cooldown = self.candidates[entry.index].profile.cooldown_ticks();

            match self.emit_cue(&entry, listener, device) {
                Ok(true) => {
                    self.next_eligible
                        .insert(entry.key, self.tick.wrapping_add(cooldown));
                    return;
                }
                Ok(false) => {
                    // Suppressed (inaudible); let another candidate use this
                    // tick.
                }
                Err(e) => {
                    log::warn!("Cue for {:?} failed: {e}", entry.key);
                    self.next_eligible
                        .insert(entry.key, self.tick.wrapping_add(cooldown));
                    return;
                }
            }
        }
    }

    /// Emits one cue. `Ok(false)` means the cue was suppressed (volume fell
    /// to zero); any device failure disposes the partial instance and is
    /// reported to the caller.
    fn emit_cue(
        &mut self,
        entry: &SweepEntry,
        listener: &Listener,
        device: &mut dyn AudioDevice,
    ) -> Result<bool> {
        let (profile, position) = {
            let candidate = &self.candidates[entry.index];
            (candidate.profile.clone(), candidate.position)
        };
        let params = spatial::cue_params(
            position - listener.position,
            &profile,
            &self.config,
            listener.master_volume,
        );
        if !params.audible() {
            return Ok(false);
        }

        match &profile.style {
            CueStyle::Tone(_) => {
                let Some(buffer) = self.resources.tone_for(&profile) else {
                    return Ok(false);
                };
                let id = device.create_instance(&buffer)?;
                let started = device
                    .set_pan(id, params.pan)
                    .and_then(|_| device.set_pitch(id, params.pitch))
                    .and_then(|_| device.set_volume(id, params.volume))
                    .and_then(|_| device.play(id));
                if let Err(e) = started {
                    device.dispose(id);
                    return Err(e);
                }
                self.resources.register(id);
                log::debug!(
                    "Cue '{}': pan {:.2}, pitch {:.2}, volume {:.2}, {:.1} tiles",
                    profile.name,
                    params.pan,
                    params.pitch,
                    params.volume,
                    params.distance_tiles
                );
                Ok(true)
            }
            CueStyle::Library {
                style,
                volume_scale,
            } => {
                device.play_library(*style, position, params.volume * volume_scale, params.pitch)?;
                Ok(true)
            }
        }
    }

    /// Drops bookkeeping for keys unseen for more than a full tick, so
    /// silently departed features do not leak tracking memory.
    fn prune(&mut self) {
        let tick = self.tick;
        self.last_seen
            .retain(|_, seen| math::tick_age(tick, *seen) <= 1);
        let last_seen = &self.last_seen;
        self.next_eligible.retain(|key, _| last_seen.contains_key(key));
        self.arrived.retain(|key| last_seen.contains_key(key));
        self.cued_this_pass.retain(|key| last_seen.contains_key(key));
    }
}
