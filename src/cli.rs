use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_SAMPLES: usize = 500;

#[derive(Parser, Debug)]
#[command(name = "waveprint", about = "Reduce audio files to normalized waveform samples")]
pub struct Cli {
    /// Input audio files (WAV, MP3, FLAC, OGG, AAC)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Number of amplitude values per file
    #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLES,
          value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub samples: usize,

    /// Frequency bands per FFT frame (0 disables spectral analysis)
    #[arg(long)]
    pub fft_bands: Option<usize>,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Config file (defaults to waveprint.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
