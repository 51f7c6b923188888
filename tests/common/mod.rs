//! Shared mock collaborators for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use tilesonic::error::Result;
use tilesonic::math::Vec2;
use tilesonic::{
    Announcer, AudioDevice, CueProfile, CueStyle, EntityInfo, ExplorationRegistry,
    ExplorationTarget, InstanceId, InstanceState, ItemInfo, SelectedTarget, TileInfo,
    TileSonicError, ToneBuffer, ToneSpec, WorldQuery,
};

/// Opt-in logging for debugging test runs: `RUST_LOG=debug cargo test`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct MockWorld {
    pub width: u32,
    pub height: u32,
    pub tiles: HashMap<(i32, i32), TileInfo>,
    pub light: HashMap<(i32, i32), f32>,
    pub entities: Vec<EntityInfo>,
    pub items: Vec<ItemInfo>,
}

impl MockWorld {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: HashMap::new(),
            light: HashMap::new(),
            entities: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn set_tile(&mut self, x: i32, y: i32, type_id: u16) {
        self.tiles.insert(
            (x, y),
            TileInfo {
                active: true,
                type_id,
                frame_x: 0,
                frame_y: 0,
                liquid: 0,
            },
        );
    }

    pub fn clear_tile(&mut self, x: i32, y: i32) {
        self.tiles.remove(&(x, y));
    }

    pub fn set_light(&mut self, x: i32, y: i32, level: f32) {
        self.light.insert((x, y), level);
    }
}

impl WorldQuery for MockWorld {
    fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn tile_at(&self, x: i32, y: i32) -> Option<TileInfo> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.tiles.get(&(x, y)).copied().unwrap_or(TileInfo {
            active: false,
            type_id: 0,
            frame_x: 0,
            frame_y: 0,
            liquid: 0,
        }))
    }

    fn light_level_at(&self, x: i32, y: i32) -> f32 {
        self.light.get(&(x, y)).copied().unwrap_or(1.0)
    }

    fn entities(&self) -> &[EntityInfo] {
        &self.entities
    }

    fn items(&self) -> &[ItemInfo] {
        &self.items
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayedCue {
    pub id: InstanceId,
    pub pan: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Records every device call so tests can assert on the emitted cue stream.
#[derive(Default)]
pub struct MockDevice {
    states: HashMap<InstanceId, InstanceState>,
    pans: HashMap<InstanceId, f32>,
    pitches: HashMap<InstanceId, f32>,
    volumes: HashMap<InstanceId, f32>,
    pub played: Vec<PlayedCue>,
    pub library_played: Vec<(u32, f32, f32)>,
    pub stopped: Vec<InstanceId>,
    pub disposed: Vec<InstanceId>,
    pub fail_play: bool,
}

impl MockDevice {
    /// Marks an instance as finished so the next reap disposes it.
    pub fn finish(&mut self, id: InstanceId) {
        self.states.insert(id, InstanceState::Stopped);
    }
}

impl AudioDevice for MockDevice {
    fn create_instance(&mut self, _buffer: &Arc<ToneBuffer>) -> Result<InstanceId> {
        let id = InstanceId::new();
        self.states.insert(id, InstanceState::Stopped);
        Ok(id)
    }

    fn set_pan(&mut self, id: InstanceId, pan: f32) -> Result<()> {
        self.pans.insert(id, pan);
        Ok(())
    }

    fn set_pitch(&mut self, id: InstanceId, pitch: f32) -> Result<()> {
        self.pitches.insert(id, pitch);
        Ok(())
    }

    fn set_volume(&mut self, id: InstanceId, volume: f32) -> Result<()> {
        self.volumes.insert(id, volume);
        Ok(())
    }

    fn play(&mut self, id: InstanceId) -> Result<()> {
        if self.fail_play {
            return Err(TileSonicError::AudioDevice("mock play failure".into()));
        }
        self.states.insert(id, InstanceState::Playing);
        self.played.push(PlayedCue {
            id,
            pan: self.pans.get(&id).copied().unwrap_or(0.0),
            pitch: self.pitches.get(&id).copied().unwrap_or(0.0),
            volume: self.volumes.get(&id).copied().unwrap_or(1.0),
        });
        Ok(())
    }

    fn stop(&mut self, id: InstanceId) -> Result<()> {
        self.states.insert(id, InstanceState::Stopped);
        self.stopped.push(id);
        Ok(())
    }

    fn dispose(&mut self, id: InstanceId) {
        self.states.remove(&id);
        self.disposed.push(id);
    }

    fn state(&self, id: InstanceId) -> InstanceState {
        self.states
            .get(&id)
            .copied()
            .unwrap_or(InstanceState::Disposed)
    }

    fn play_library(
        &mut self,
        style: u32,
        _position: Vec2,
        volume_scale: f32,
        pitch_offset: f32,
    ) -> Result<()> {
        self.library_played.push((style, volume_scale, pitch_offset));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockAnnouncer {
    pub messages: Vec<(String, bool)>,
}

impl Announcer for MockAnnouncer {
    fn announce(&mut self, text: &str, interrupt: bool) {
        self.messages.push((text.to_owned(), interrupt));
    }
}

#[derive(Default)]
pub struct MockRegistry {
    pub targets: Vec<ExplorationTarget>,
    pub selected: Option<SelectedTarget>,
    pub clear_count: usize,
}

impl ExplorationRegistry for MockRegistry {
    fn update_targets(&mut self, targets: &[ExplorationTarget]) {
        self.targets = targets.to_vec();
    }

    fn selected_target(&self) -> Option<SelectedTarget> {
        self.selected
    }

    fn clear_selected_target(&mut self) {
        self.selected = None;
        self.clear_count += 1;
    }
}

/// A short synthesized-tone profile with the given audible range, cooldown
/// bounds, and arrival label.
pub fn tone_profile(name: &str, max_tiles: f32, interval: (u32, u32)) -> Arc<CueProfile> {
    Arc::new(
        CueProfile::new(
            name,
            CueStyle::Tone(ToneSpec::new(440.0, vec![1.0, 2.0], 0.05)),
        )
        .volume_range(0.1, 1.0)
        .max_audible_tiles(max_tiles)
        .interval_frames(interval.0, interval.1)
        .arrival_label(name),
    )
}
