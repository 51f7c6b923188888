//! Cue profiles: the immutable acoustic descriptor for a category of interest.

/// Amplitude envelope applied to a synthesized tone.
///
/// The attack and release ramps are linear fades at the buffer edges; the
/// optional Hann window shapes the whole tone on top of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Attack ramp length in seconds.
    pub attack: f32,
    /// Release ramp length in seconds.
    pub release: f32,
    /// Apply a Hann window over the full duration.
    pub hann: bool,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.005,
            release: 0.02,
            hann: false,
        }
    }
}

/// Synthesis parameters for a procedural tone.
///
/// Identical specs always render to bit-identical buffers; the spec is the
/// deterministic input of [`crate::synth::synthesize`].
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpec {
    /// Fundamental frequency in Hz.
    pub fundamental_hz: f32,
    /// Harmonic partial multipliers, in order. Partial `i` is weighted
    /// `partial_falloff / (i + 1)`.
    pub partials: Vec<f32>,
    /// Weight numerator shared by all partials.
    pub partial_falloff: f32,
    /// Tone length in seconds.
    pub duration: f32,
    /// Linear gain applied after normalization.
    pub gain: f32,
    pub envelope: Envelope,
}

impl ToneSpec {
    pub fn new(fundamental_hz: f32, partials: Vec<f32>, duration: f32) -> Self {
        Self {
            fundamental_hz,
            partials,
            partial_falloff: 1.0,
            duration,
            gain: 1.0,
            envelope: Envelope::default(),
        }
    }
}

/// How a cue is emitted: a synthesized tone instance, or a pre-existing
/// library sound played through the host's own channel.
#[derive(Debug, Clone, PartialEq)]
pub enum CueStyle {
    /// Synthesize (and cache) a tone from the given spec.
    Tone(ToneSpec),
    /// Defer to a host-side library sound identified by `style`.
    Library {
        style: u32,
        /// Extra scale applied to the computed cue volume.
        volume_scale: f32,
    },
}

impl CueStyle {
    pub fn is_tone(&self) -> bool {
        matches!(self, Self::Tone(_))
    }
}

/// Immutable per-category cue descriptor.
///
/// The `name` is the profile's identity: it keys the tone cache, so two
/// profiles with the same name must describe the same acoustics.
#[derive(Debug, Clone, PartialEq)]
pub struct CueProfile {
    pub name: String,
    pub style: CueStyle,
    /// Loudness bounds mapped over closeness (far .. near).
    pub min_volume: f32,
    pub max_volume: f32,
    /// Candidates farther than this are inaudible and filtered out.
    pub max_audible_tiles: f32,
    /// Cue cooldown bounds in ticks.
    pub min_interval_frames: u32,
    pub max_interval_frames: u32,
    /// Pixel offsets are divided by these scales to derive pan and pitch.
    pub pan_scale_px: f32,
    pub pitch_scale_px: f32,
    pub pitch_clamp: f32,
    /// Label for the one-shot arrival announcement; empty disables it.
    pub arrival_label: String,
}

impl CueProfile {
    pub fn new(name: impl Into<String>, style: CueStyle) -> Self {
        Self {
            name: name.into(),
            style,
            min_volume: 0.1,
            max_volume: 1.0,
            max_audible_tiles: 60.0,
            min_interval_frames: 90,
            max_interval_frames: 300,
            pan_scale_px: 640.0,
            pitch_scale_px: 640.0,
            pitch_clamp: 1.0,
            arrival_label: String::new(),
        }
    }

    pub fn volume_range(mut self, min: f32, max: f32) -> Self {
        self.min_volume = min.clamp(0.0, 1.0);
        self.max_volume = max.clamp(self.min_volume, 1.0);
        self
    }

    pub fn max_audible_tiles(mut self, tiles: f32) -> Self {
        self.max_audible_tiles = tiles.max(0.0);
        self
    }

    pub fn interval_frames(mut self, min: u32, max: u32) -> Self {
        self.max_interval_frames = max.max(1);
        self.min_interval_frames = min.clamp(1, self.max_interval_frames);
        self
    }

    pub fn spatial_scales(mut self, pan_px: f32, pitch_px: f32, pitch_clamp: f32) -> Self {
        self.pan_scale_px = pan_px;
        self.pitch_scale_px = pitch_px;
        self.pitch_clamp = pitch_clamp;
        self
    }

    pub fn arrival_label(mut self, label: impl Into<String>) -> Self {
        self.arrival_label = label.into();
        self
    }

    /// Identity string keying the tone cache.
    pub fn cache_key(&self) -> &str {
        &self.name
    }

    /// Ticks until this profile's next cue may fire after an emission.
    pub fn cooldown_ticks(&self) -> u32 {
        self.min_interval_frames.max(1)
    }
}
