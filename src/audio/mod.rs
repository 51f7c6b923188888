//! Audio device abstraction and synthesized tone resources.

mod cache;
pub mod output;

pub use cache::AudioResources;
pub use output::CpalToneOutput;

use crate::error::Result;
use crate::math::Vec2;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Opaque handle for one live playback instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a playback instance as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Playing,
    Stopped,
    Disposed,
}

/// Immutable mono sample buffer shared between playback instances.
///
/// Buffers are shared (`Arc`); instances are not. Every `play` spawns a new
/// instance over the same buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
}

impl ToneBuffer {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// Playback backend contract.
///
/// The crate ships [`CpalToneOutput`] for standalone use; hosts with their
/// own audio engine implement this over it instead. Instance methods may fail
/// transiently (device lost, instance table full); the scheduler treats any
/// failure as "this cue is skipped" and recovers on the next cooldown window.
pub trait AudioDevice {
    /// Creates a new idle instance over a shared buffer.
    fn create_instance(&mut self, buffer: &Arc<ToneBuffer>) -> Result<InstanceId>;

    fn set_pan(&mut self, id: InstanceId, pan: f32) -> Result<()>;

    /// Pitch offset in octaves: 1.0 doubles the playback rate.
    fn set_pitch(&mut self, id: InstanceId, pitch: f32) -> Result<()>;

    fn set_volume(&mut self, id: InstanceId, volume: f32) -> Result<()>;

    fn play(&mut self, id: InstanceId) -> Result<()>;

    fn stop(&mut self, id: InstanceId) -> Result<()>;

    /// Releases the instance; unknown ids are ignored.
    fn dispose(&mut self, id: InstanceId);

    /// Unknown ids report [`InstanceState::Disposed`].
    fn state(&self, id: InstanceId) -> InstanceState;

    /// Plays a host-side library sound instead of a synthesized instance.
    fn play_library(
        &mut self,
        style: u32,
        position: Vec2,
        volume_scale: f32,
        pitch_offset: f32,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_buffer_duration() {
        let buffer = ToneBuffer::new(vec![0; 22050], 44100);
        assert_eq!(buffer.duration(), Duration::from_millis(500));
        assert_eq!(ToneBuffer::new(Vec::new(), 0).duration(), Duration::ZERO);
    }

    #[test]
    fn test_instance_ids_unique() {
        assert_ne!(InstanceId::new(), InstanceId::new());
    }
}
