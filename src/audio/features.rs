use serde::Serialize;

/// Band energies for one FFT frame
#[derive(Clone, Debug, Serialize)]
pub struct BandEnergyResult {
    /// Average bin magnitude per band, lowest band first
    pub magnitudes: Vec<f32>,
    /// Representative frequency (Hz) of each band
    pub frequencies: Vec<f32>,
}

/// Final output of one analysis run, ready for a waveform renderer
#[derive(Clone, Debug, Serialize)]
pub struct WaveformAnalysis {
    /// Normalized loudness (0.0 = loudest, 1.0 = silence floor), exactly the
    /// requested count
    pub amplitudes: Vec<f32>,
    /// One entry per complete FFT frame, in stream order; `None` when spectral
    /// analysis was not requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fft: Option<Vec<BandEnergyResult>>,
}

impl WaveformAnalysis {
    /// Amplitudes flipped so that louder segments are taller (1.0 = loudest).
    pub fn heights(&self) -> Vec<f32> {
        self.amplitudes.iter().map(|a| 1.0 - a).collect()
    }
}
