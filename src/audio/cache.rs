//! Owner object for synthesized tones and live playback instances.
//!
//! Replaces what a host engine would keep in process-wide statics: the tone
//! cache and the live-instance list live here, inside the scheduler, with an
//! explicit [`AudioResources::reset`] teardown at world unload.

use super::{AudioDevice, InstanceId, InstanceState, ToneBuffer};
use crate::profile::{CueProfile, CueStyle};
use crate::synth;
use std::collections::HashMap;
use std::sync::Arc;

pub struct AudioResources {
    sample_rate: u32,
    tones: HashMap<String, Arc<ToneBuffer>>,
    live: Vec<InstanceId>,
}

impl AudioResources {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            tones: HashMap::new(),
            live: Vec::new(),
        }
    }

    /// The cached tone for a profile, synthesizing on first use.
    ///
    /// Returns `None` for library-style profiles, which have no buffer of
    /// their own.
    pub fn tone_for(&mut self, profile: &CueProfile) -> Option<Arc<ToneBuffer>> {
        let CueStyle::Tone(spec) = &profile.style else {
            return None;
        };
        if let Some(buffer) = self.tones.get(profile.cache_key()) {
            return Some(buffer.clone());
        }
        log::debug!("Synthesizing tone for profile '{}'", profile.name);
        let buffer = Arc::new(ToneBuffer::new(
            synth::synthesize(spec, self.sample_rate),
            self.sample_rate,
        ));
        self.tones
            .insert(profile.cache_key().to_owned(), buffer.clone());
        Some(buffer)
    }

    /// Tracks a freshly played instance for later reaping.
    pub fn register(&mut self, id: InstanceId) {
        self.live.push(id);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn cached_tone_count(&self) -> usize {
        self.tones.len()
    }

    /// Disposes instances that have finished or errored since the last tick.
    pub fn reap(&mut self, device: &mut dyn AudioDevice) {
        self.live.retain(|&id| match device.state(id) {
            InstanceState::Playing => true,
            InstanceState::Stopped => {
                device.dispose(id);
                false
            }
            InstanceState::Disposed => false,
        });
    }

    /// Stops and disposes every live instance.
    pub fn stop_all(&mut self, device: &mut dyn AudioDevice) {
        for id in self.live.drain(..) {
            if let Err(e) = device.stop(id) {
                log::warn!("Failed to stop instance {id}: {e}");
            }
            device.dispose(id);
        }
    }

    /// Full teardown: all instances stopped and disposed, both caches
    /// cleared. Called at world unload.
    pub fn reset(&mut self, device: &mut dyn AudioDevice) {
        let tones = self.tones.len();
        self.stop_all(device);
        self.tones.clear();
        log::info!("Audio resources reset ({tones} cached tones dropped)");
    }
}
