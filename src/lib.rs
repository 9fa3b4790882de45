//! Reduce decoded audio to a fixed number of normalized loudness values, with
//! optional per-frame frequency band energies, for drawing waveforms.

pub mod audio;
pub mod error;

pub use audio::analysis::{analyze, analyze_file, AnalysisOptions};
pub use audio::decode::SymphoniaSource;
pub use audio::downsample::SILENCE_FLOOR_DB;
pub use audio::features::{BandEnergyResult, WaveformAnalysis};
pub use audio::source::{MemorySource, PcmSource, SourceInfo};
pub use audio::spectrum::FFT_FRAME_SIZE;
pub use error::AnalysisError;
