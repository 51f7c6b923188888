//! Deterministic additive tone synthesis.
//!
//! A [`ToneSpec`] is a pure function input: the same spec always renders to a
//! bit-identical mono `i16` buffer, which is what lets the tone cache key
//! buffers by profile identity alone.

use crate::profile::ToneSpec;
use std::f32::consts::TAU;

/// Renders a tone spec into quantized 16-bit mono samples.
///
/// Each partial `i` contributes a sine at `fundamental * partials[i]`,
/// weighted `partial_falloff / (i + 1)`; the mix is normalized by the weight
/// sum, enveloped, scaled by the spec gain, and quantized. A degenerate spec
/// (no partials, non-positive fundamental or duration) renders to a single
/// silent sample rather than an error.
pub fn synthesize(spec: &ToneSpec, sample_rate: u32) -> Vec<i16> {
    if spec.partials.is_empty()
        || spec.fundamental_hz <= 0.0
        || spec.duration <= 0.0
        || sample_rate == 0
    {
        return vec![0];
    }

    let sample_count = ((spec.duration * sample_rate as f32) as usize).max(1);
    let weight_sum: f32 = (0..spec.partials.len())
        .map(|i| spec.partial_falloff / (i as f32 + 1.0))
        .sum();
    if weight_sum <= 0.0 {
        return vec![0];
    }

    let mut samples = Vec::with_capacity(sample_count);
    for i in 0..sample_count {
        let t = i as f32 / sample_rate as f32;
        let mut mix = 0.0f32;
        for (p, multiplier) in spec.partials.iter().enumerate() {
            let weight = spec.partial_falloff / (p as f32 + 1.0);
            mix += weight * (TAU * spec.fundamental_hz * multiplier * t).sin();
        }
        mix /= weight_sum;

        let sample = mix * spec.gain * envelope_at(spec, i, sample_count, sample_rate);
        samples.push((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
    }
    samples
}

fn envelope_at(spec: &ToneSpec, index: usize, sample_count: usize, sample_rate: u32) -> f32 {
    let t = index as f32 / sample_rate as f32;
    let remaining = spec.duration - t;
    let mut env = 1.0f32;

    if spec.envelope.attack > 0.0 {
        env *= (t / spec.envelope.attack).min(1.0);
    }
    if spec.envelope.release > 0.0 {
        env *= (remaining / spec.envelope.release).clamp(0.0, 1.0);
    }
    if spec.envelope.hann && sample_count > 1 {
        let phase = index as f32 / (sample_count - 1) as f32;
        env *= 0.5 * (1.0 - (TAU * phase).cos());
    }
    env
}
