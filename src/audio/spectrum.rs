use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::features::BandEnergyResult;

/// Samples per FFT frame: ~100ms at 44.1kHz, rounded to a power of two.
pub const FFT_FRAME_SIZE: usize = 4096;

/// Assumed when the source cannot report its sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Windowed FFT over fixed, non-overlapping frames, folded into linear bands.
pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    band_count: usize,
    sample_rate: u32,
}

impl SpectralAnalyzer {
    pub fn new(band_count: usize, sample_rate: u32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FFT_FRAME_SIZE);
        let sample_rate = if sample_rate == 0 {
            DEFAULT_SAMPLE_RATE
        } else {
            sample_rate
        };

        Self {
            fft,
            window: hann_window(FFT_FRAME_SIZE),
            buffer: vec![Complex::new(0.0, 0.0); FFT_FRAME_SIZE],
            band_count: band_count.max(1),
            sample_rate,
        }
    }

    pub fn band_count(&self) -> usize {
        self.band_count
    }

    pub fn nyquist_frequency(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Analyze every complete frame in `samples`, in order. A trailing partial
    /// frame is ignored and left for the caller to keep or drop.
    pub fn process(&mut self, samples: &[i16]) -> Vec<BandEnergyResult> {
        samples
            .chunks_exact(FFT_FRAME_SIZE)
            .map(|frame| self.analyze_frame(frame))
            .collect()
    }

    pub fn analyze_frame(&mut self, frame: &[i16]) -> BandEnergyResult {
        debug_assert_eq!(frame.len(), FFT_FRAME_SIZE);

        let full_scale = i16::MAX as f32;
        for ((slot, &s), &w) in self.buffer.iter_mut().zip(frame).zip(&self.window) {
            *slot = Complex::new(s as f32 / full_scale * w, 0.0);
        }
        self.fft.process(&mut self.buffer);

        let half = FFT_FRAME_SIZE / 2;
        let scale = 2.0 / FFT_FRAME_SIZE as f32;
        let magnitudes: Vec<f32> = self.buffer[..half].iter().map(|c| c.norm() * scale).collect();

        let bin_width = self.sample_rate as f32 / FFT_FRAME_SIZE as f32;
        linear_bands(&magnitudes, self.band_count, bin_width)
    }
}

/// Fold `magnitudes` (bins spanning 0..Nyquist) into `band_count` equally wide
/// bands. Each band averages its bins; when there are more bands than bins a
/// band reuses the single bin it starts on.
pub fn linear_bands(magnitudes: &[f32], band_count: usize, bin_width: f32) -> BandEnergyResult {
    let bins = magnitudes.len();
    if bins == 0 || band_count == 0 {
        return BandEnergyResult {
            magnitudes: vec![0.0; band_count],
            frequencies: vec![0.0; band_count],
        };
    }

    let ratio = bins as f32 / band_count as f32;
    let mut band_magnitudes = Vec::with_capacity(band_count);
    let mut frequencies = Vec::with_capacity(band_count);

    for i in 0..band_count {
        let start = ((i as f32 * ratio).floor() as usize).min(bins - 1);
        let end = (((i + 1) as f32 * ratio).floor() as usize).min(bins);

        let magnitude = if end <= start {
            magnitudes[start]
        } else {
            magnitudes[start..end].iter().sum::<f32>() / (end - start) as f32
        };

        band_magnitudes.push(magnitude);
        frequencies.push((start + end.max(start)) as f32 * 0.5 * bin_width);
    }

    BandEnergyResult {
        magnitudes: band_magnitudes,
        frequencies,
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (amplitude * (2.0 * std::f32::consts::PI * freq * t).sin() * i16::MAX as f32) as i16
            })
            .collect()
    }

    #[test]
    fn band_count_matches_request() {
        let mut analyzer = SpectralAnalyzer::new(16, 44100);
        let results = analyzer.process(&sine(1000.0, 44100, FFT_FRAME_SIZE * 2, 0.5));
        assert_eq!(results.len(), 2);
        for r in &results {
            assert_eq!(r.magnitudes.len(), 16);
            assert_eq!(r.frequencies.len(), 16);
        }
    }

    #[test]
    fn partial_frame_is_ignored() {
        let mut analyzer = SpectralAnalyzer::new(8, 44100);
        assert!(analyzer.process(&vec![0; FFT_FRAME_SIZE - 1]).is_empty());
        assert_eq!(analyzer.process(&vec![0; FFT_FRAME_SIZE * 2 + 10]).len(), 2);
    }

    #[test]
    fn silence_has_zero_energy() {
        let mut analyzer = SpectralAnalyzer::new(8, 44100);
        let result = analyzer.analyze_frame(&[0; FFT_FRAME_SIZE]);
        assert!(result.magnitudes.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn tone_lands_in_matching_band() {
        // 8 bands over 0..22050 Hz, ~2756 Hz each; 5 kHz belongs to band 1
        let mut analyzer = SpectralAnalyzer::new(8, 44100);
        let result = analyzer.analyze_frame(&sine(5000.0, 44100, FFT_FRAME_SIZE, 0.8));
        let loudest = result
            .magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i);
        assert_eq!(loudest, Some(1));
        assert!(result.frequencies[1] > 2000.0 && result.frequencies[1] < 4500.0);
    }

    #[test]
    fn frequencies_increase_up_to_nyquist() {
        let mut analyzer = SpectralAnalyzer::new(4, 48000);
        assert_eq!(analyzer.nyquist_frequency(), 24000.0);

        let result = analyzer.analyze_frame(&[0; FFT_FRAME_SIZE]);
        assert!(result.frequencies.windows(2).all(|w| w[0] < w[1]));
        assert!(*result.frequencies.last().unwrap() < 24000.0);
    }

    #[test]
    fn more_bands_than_bins_reuses_bins() {
        let mags = [1.0, 2.0, 3.0, 4.0];
        let result = linear_bands(&mags, 8, 10.0);
        assert_eq!(result.magnitudes, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn fewer_bands_average_bins() {
        let mags = [1.0, 3.0, 5.0, 7.0];
        let result = linear_bands(&mags, 2, 10.0);
        assert_eq!(result.magnitudes, vec![2.0, 6.0]);
        assert_eq!(result.frequencies, vec![10.0, 30.0]);
    }

    #[test]
    fn zero_sample_rate_uses_default() {
        let analyzer = SpectralAnalyzer::new(4, 0);
        assert_eq!(analyzer.nyquist_frequency(), DEFAULT_SAMPLE_RATE as f32 / 2.0);
    }
}
