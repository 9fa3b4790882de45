use super::downsample::SILENCE_FLOOR_DB;

/// Map clipped dB loudness into `[0, 1]`: 0 is the loudest signal, 1 is at or
/// below the silence floor. Renderers invert this (`1 - v`) for bar heights.
pub fn normalize(samples: &[f32]) -> Vec<f32> {
    samples.iter().map(|&s| s / SILENCE_FLOOR_DB).collect()
}
