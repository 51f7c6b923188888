//! Standalone cpal-backed playback device.
//!
//! Mixes live tone instances into the default output stream with per-voice
//! pan, pitch, and volume. Hosts embedding TileSonic in an engine with its
//! own audio path implement [`AudioDevice`] there instead; this device exists
//! so the crate is audible out of the box.

use super::{AudioDevice, InstanceId, InstanceState, ToneBuffer};
use crate::error::{Result, TileSonicError};
use crate::math::Vec2;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_4;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoiceState {
    Idle,
    Playing,
    Stopped,
}

struct Voice {
    buffer: Arc<ToneBuffer>,
    /// Fractional read position in frames.
    cursor: f64,
    /// Frames advanced per output frame; carries both the pitch offset and
    /// the tone-rate to device-rate conversion.
    step: f64,
    pan: f32,
    volume: f32,
    state: VoiceState,
    /// Library one-shots clean themselves up when finished.
    ephemeral: bool,
}

type VoiceTable = Arc<Mutex<HashMap<InstanceId, Voice>>>;

/// Audio device playing synthesized tones through the default cpal output.
pub struct CpalToneOutput {
    _stream: cpal::Stream,
    voices: VoiceTable,
    library: HashMap<u32, Arc<ToneBuffer>>,
    output_sample_rate: u32,
}

impl CpalToneOutput {
    /// Opens the default output device and starts the mix stream.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| {
            TileSonicError::AudioDevice("No default output device available".into())
        })?;
        let default_config = device.default_output_config().map_err(|e| {
            TileSonicError::AudioDevice(format!("Failed to get default config: {e}"))
        })?;

        let config = default_config.config();
        let output_sample_rate = config.sample_rate.0;
        let channels = config.channels;
        let voices: VoiceTable = Arc::new(Mutex::new(HashMap::new()));

        log::info!(
            "Opening cpal output ({} Hz, {} channels, {:?})",
            output_sample_rate,
            channels,
            default_config.sample_format()
        );

        let stream = match default_config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config, voices.clone(), channels)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config, voices.clone(), channels)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config, voices.clone(), channels)?
            }
            format => {
                return Err(TileSonicError::AudioDevice(format!(
                    "Unsupported sample format {format:?}"
                )));
            }
        };
        stream
            .play()
            .map_err(|e| TileSonicError::AudioDevice(format!("Failed to start stream: {e}")))?;

        Ok(Self {
            _stream: stream,
            voices,
            library: HashMap::new(),
            output_sample_rate,
        })
    }

    /// Registers a buffer behind a library style id so `play_library` has
    /// something to render.
    pub fn register_library_style(&mut self, style: u32, buffer: Arc<ToneBuffer>) {
        self.library.insert(style, buffer);
    }

    fn lock_voices(&self) -> Result<std::sync::MutexGuard<'_, HashMap<InstanceId, Voice>>> {
        self.voices
            .lock()
            .map_err(|_| TileSonicError::AudioDevice("Voice table poisoned".into()))
    }

    fn base_step(&self, buffer: &ToneBuffer) -> f64 {
        buffer.sample_rate() as f64 / self.output_sample_rate.max(1) as f64
    }
}

impl AudioDevice for CpalToneOutput {
    fn create_instance(&mut self, buffer: &Arc<ToneBuffer>) -> Result<InstanceId> {
        let id = InstanceId::new();
        let step = self.base_step(buffer);
        self.lock_voices()?.insert(
            id,
            Voice {
                buffer: buffer.clone(),
                cursor: 0.0,
                step,
                pan: 0.0,
                volume: 1.0,
                state: VoiceState::Idle,
                ephemeral: false,
            },
        );
        Ok(id)
    }

    fn set_pan(&mut self, id: InstanceId, pan: f32) -> Result<()> {
        let mut voices = self.lock_voices()?;
        let voice = voices
            .get_mut(&id)
            .ok_or_else(|| TileSonicError::AudioInstance(format!("Unknown instance {id}")))?;
        voice.pan = pan.clamp(-1.0, 1.0);
        Ok(())
    }

    fn set_pitch(&mut self, id: InstanceId, pitch: f32) -> Result<()> {
        let output_rate = self.output_sample_rate.max(1) as f64;
        let mut voices = self.lock_voices()?;
        let voice = voices
            .get_mut(&id)
            .ok_or_else(|| TileSonicError::AudioInstance(format!("Unknown instance {id}")))?;
        let base = voice.buffer.sample_rate() as f64 / output_rate;
        voice.step = base * 2f64.powf(pitch as f64);
        Ok(())
    }

    fn set_volume(&mut self, id: InstanceId, volume: f32) -> Result<()> {
        let mut voices = self.lock_voices()?;
        let voice = voices
            .get_mut(&id)
            .ok_or_else(|| TileSonicError::AudioInstance(format!("Unknown instance {id}")))?;
        voice.volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    fn play(&mut self, id: InstanceId) -> Result<()> {
        let mut voices = self.lock_voices()?;
        let voice = voices
            .get_mut(&id)
            .ok_or_else(|| TileSonicError::AudioInstance(format!("Unknown instance {id}")))?;
        voice.cursor = 0.0;
        voice.state = VoiceState::Playing;
        Ok(())
    }

    fn stop(&mut self, id: InstanceId) -> Result<()> {
        let mut voices = self.lock_voices()?;
        let voice = voices
            .get_mut(&id)
            .ok_or_else(|| TileSonicError::AudioInstance(format!("Unknown instance {id}")))?;
        voice.state = VoiceState::Stopped;
        Ok(())
    }

    fn dispose(&mut self, id: InstanceId) {
        if let Ok(mut voices) = self.voices.lock() {
            voices.remove(&id);
        }
    }

    fn state(&self, id: InstanceId) -> InstanceState {
        let Ok(voices) = self.voices.lock() else {
            return InstanceState::Disposed;
        };
        match voices.get(&id) {
            Some(voice) if voice.state == VoiceState::Playing => InstanceState::Playing,
            Some(_) => InstanceState::Stopped,
            None => InstanceState::Disposed,
        }
    }

    fn play_library(
        &mut self,
        style: u32,
        _position: Vec2,
        volume_scale: f32,
        pitch_offset: f32,
    ) -> Result<()> {
        let Some(buffer) = self.library.get(&style).cloned() else {
            log::debug!("No buffer registered for library style {style}, skipping");
            return Ok(());
        };
        let step = self.base_step(&buffer) * 2f64.powf(pitch_offset as f64);
        self.lock_voices()?.insert(
            InstanceId::new(),
            Voice {
                buffer,
                cursor: 0.0,
                step,
                pan: 0.0,
                volume: volume_scale.clamp(0.0, 1.0),
                state: VoiceState::Playing,
                ephemeral: true,
            },
        );
        Ok(())
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    voices: VoiceTable,
    channels: u16,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = channels.max(1) as usize;
    let mut mix_buf: Vec<f32> = Vec::new();

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mix_buf.clear();
                mix_buf.resize(data.len(), 0.0);

                // Never block the render thread; a missed lock is one silent
                // callback.
                if let Ok(mut voices) = voices.try_lock() {
                    mix_voices(&mut voices, &mut mix_buf, channels);
                    voices.retain(|_, voice| {
                        !(voice.ephemeral && voice.state == VoiceState::Stopped)
                    });
                }

                for (out, mixed) in data.iter_mut().zip(mix_buf.iter()) {
                    *out = T::from_sample(*mixed);
                }
            },
            move |err| {
                log::error!("Audio stream error: {err}");
            },
            None,
        )
        .map_err(|e| TileSonicError::AudioDevice(format!("Failed to build stream: {e}")))?;

    Ok(stream)
}

fn mix_voices(voices: &mut HashMap<InstanceId, Voice>, buffer: &mut [f32], channels: usize) {
    let frame_count = buffer.len() / channels;
    for voice in voices.values_mut() {
        if voice.state != VoiceState::Playing {
            continue;
        }
        let samples = voice.buffer.samples();
        // Equal-power pan.
        let angle = (voice.pan + 1.0) * FRAC_PI_4;
        let (gain_l, gain_r) = (angle.cos() * voice.volume, angle.sin() * voice.volume);

        for frame in 0..frame_count {
            let index = voice.cursor as usize;
            if index >= samples.len() {
                voice.state = VoiceState::Stopped;
                break;
            }
            let sample = samples[index] as f32 / i16::MAX as f32;
            voice.cursor += voice.step;

            let base = frame * channels;
            if channels >= 2 {
                buffer[base] += sample * gain_l;
                buffer[base + 1] += sample * gain_r;
                for channel in 2..channels {
                    buffer[base + channel] += sample * voice.volume;
                }
            } else {
                buffer[base] += sample * voice.volume;
            }
        }
    }
}
