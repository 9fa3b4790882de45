/// Everything below -50 dB is clipped to the floor.
pub const SILENCE_FLOOR_DB: f32 = -50.0;

/// Maximum magnitude storable in an `i16`, treated as 0 dB (loudest).
const ZERO_DB_EQUIVALENT: f32 = i16::MAX as f32;

/// Number of input samples averaged into each output value.
///
/// `total_samples` of 0 (unknown length) falls back to a factor of 1.
pub fn decimation_factor(total_samples: usize, target_samples: usize) -> usize {
    if target_samples == 0 {
        return 1;
    }
    (total_samples / target_samples).max(1)
}

/// Loudness of one sample in dB relative to full scale, clipped into
/// `[SILENCE_FLOOR_DB, 0]`.
pub fn sample_to_db(sample: i16) -> f32 {
    let magnitude = (sample as f32).abs();
    if magnitude == 0.0 {
        return SILENCE_FLOOR_DB;
    }
    (20.0 * (magnitude / ZERO_DB_EQUIVALENT).log10()).clamp(SILENCE_FLOOR_DB, 0.0)
}

/// Rectangular-filter decimator over clipped dB magnitudes.
#[derive(Clone, Copy, Debug)]
pub struct Downsampler {
    factor: usize,
}

impl Downsampler {
    pub fn new(factor: usize) -> Self {
        Self {
            factor: factor.max(1),
        }
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Number of outputs `process` yields for `sample_count` buffered samples.
    pub fn output_len(&self, sample_count: usize) -> usize {
        sample_count / self.factor
    }

    /// One averaged dB value per complete block of `factor` samples.
    ///
    /// Samples past the last complete block are ignored; the caller keeps them
    /// buffered and evicts only `output_len * factor` samples.
    pub fn process(&self, samples: &[i16]) -> Vec<f32> {
        samples
            .chunks_exact(self.factor)
            .map(|block| {
                let sum: f32 = block.iter().map(|&s| sample_to_db(s)).sum();
                (sum / self.factor as f32).clamp(SILENCE_FLOOR_DB, 0.0)
            })
            .collect()
    }
}
