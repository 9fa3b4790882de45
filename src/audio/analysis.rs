use std::path::Path;

use super::accumulator::{ChunkAccumulator, SAMPLE_SIZE};
use super::decode::SymphoniaSource;
use super::downsample::{decimation_factor, Downsampler};
use super::features::{BandEnergyResult, WaveformAnalysis};
use super::normalize::normalize;
use super::source::PcmSource;
use super::spectrum::{SpectralAnalyzer, FFT_FRAME_SIZE};
use crate::error::{AnalysisError, Result};

/// Parameters for one analysis run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Exact number of amplitude values to produce (> 0).
    pub target_samples: usize,
    /// Number of linear frequency bands per FFT frame; `None` or 0 disables
    /// spectral analysis.
    pub fft_bands: Option<usize>,
}

impl AnalysisOptions {
    pub fn new(target_samples: usize) -> Self {
        Self {
            target_samples,
            fft_bands: None,
        }
    }

    pub fn with_fft_bands(mut self, bands: usize) -> Self {
        self.fft_bands = Some(bands);
        self
    }

    fn band_count(&self) -> Option<usize> {
        self.fft_bands.filter(|&b| b > 0)
    }
}

/// Decode `path` and reduce it to a waveform.
pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> Result<WaveformAnalysis> {
    let mut source = SymphoniaSource::open(path)?;
    analyze(&mut source, options)
}

/// Pull `source` to completion, downsampling to exactly
/// `options.target_samples` amplitudes and, if requested, collecting band
/// energies per full FFT frame.
///
/// Any error from the source aborts the run; already computed values are
/// discarded.
pub fn analyze<S: PcmSource + ?Sized>(
    source: &mut S,
    options: &AnalysisOptions,
) -> Result<WaveformAnalysis> {
    let target = options.target_samples;
    if target == 0 {
        return Err(AnalysisError::InvalidParameter(
            "target sample count must be greater than zero".into(),
        ));
    }

    let info = source.info();
    if info.total_samples == 0 {
        log::warn!("Source did not report its length, downsampling without decimation");
    }

    let downsampler = Downsampler::new(decimation_factor(info.total_samples, target));
    let mut spectral = options
        .band_count()
        .map(|bands| SpectralAnalyzer::new(bands, info.sample_rate));

    log::debug!(
        "Analyzing {} samples ({} channel(s)) into {} values, decimation factor {}",
        info.total_samples,
        info.channels,
        target,
        downsampler.factor()
    );

    let mut amplitude_buffer = ChunkAccumulator::new();
    let mut fft_buffer = ChunkAccumulator::new();
    let mut amplitudes: Vec<f32> = Vec::with_capacity(target);
    let mut bands: Vec<BandEnergyResult> = Vec::new();
    let mut overflow = 0usize;

    while let Some(chunk) = source.next_chunk()? {
        amplitude_buffer.append(&chunk);
        if spectral.is_some() {
            fft_buffer.append(&chunk);
        }

        if amplitude_buffer.sample_count(SAMPLE_SIZE) >= downsampler.factor() {
            let processed = downsampler.process(&amplitude_buffer.samples());
            amplitude_buffer.consume_head(processed.len() * downsampler.factor(), SAMPLE_SIZE);

            let room = target - amplitudes.len();
            overflow += processed.len().saturating_sub(room);
            amplitudes.extend(processed.into_iter().take(room));
        }

        if let Some(analyzer) = spectral.as_mut() {
            if fft_buffer.sample_count(SAMPLE_SIZE) >= FFT_FRAME_SIZE {
                let frames = analyzer.process(&fft_buffer.samples());
                fft_buffer.consume_head(frames.len() * FFT_FRAME_SIZE, SAMPLE_SIZE);
                bands.extend(frames);
            }
        }
    }

    if overflow > 0 {
        log::warn!(
            "Source produced more audio than reported, dropped {} trailing values",
            overflow
        );
    }

    pad_to_target(&mut amplitude_buffer, &downsampler, &mut amplitudes, target);

    if !fft_buffer.is_empty() {
        log::debug!(
            "Dropping partial FFT frame of {} samples",
            fft_buffer.sample_count(SAMPLE_SIZE)
        );
    }

    Ok(WaveformAnalysis {
        amplitudes: normalize(&amplitudes),
        fft: spectral.map(|_| bands),
    })
}

/// End-of-stream backfill: zero-pad the leftover samples so that one last
/// downsampling pass yields exactly the missing number of values.
fn pad_to_target(
    buffer: &mut ChunkAccumulator,
    downsampler: &Downsampler,
    amplitudes: &mut Vec<f32>,
    target: usize,
) {
    if amplitudes.len() >= target {
        return;
    }

    let missing = target - amplitudes.len();
    let missing_samples = missing * downsampler.factor();
    let padding = missing_samples.saturating_sub(buffer.sample_count(SAMPLE_SIZE));
    log::debug!(
        "Padding {} missing values with {} zero samples",
        missing,
        padding
    );

    buffer.pad_zeros(padding, SAMPLE_SIZE);
    let processed = downsampler.process(&buffer.samples());
    amplitudes.extend(processed.into_iter().take(missing));
}
