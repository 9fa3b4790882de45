use crate::error::Result;

/// Stream parameters reported by a PCM source before reading starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    pub channels: usize,
    pub sample_rate: u32,
    /// Interleaved sample count (frames * channels); 0 when unknown.
    pub total_samples: usize,
}

/// Producer of interleaved 16-bit little-endian PCM.
///
/// `next_chunk` yields `Ok(Some(bytes))` until the stream completes with
/// `Ok(None)`. An `Err` is terminal.
pub trait PcmSource {
    fn info(&self) -> SourceInfo;

    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>>;
}

const DEFAULT_CHUNK_BYTES: usize = 8192;

/// Replays already-decoded samples in fixed-size byte chunks.
pub struct MemorySource {
    bytes: Vec<u8>,
    position: usize,
    chunk_bytes: usize,
    info: SourceInfo,
}

impl MemorySource {
    pub fn new(samples: &[i16], channels: usize, sample_rate: u32) -> Self {
        Self {
            bytes: samples.iter().flat_map(|s| s.to_le_bytes()).collect(),
            position: 0,
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            info: SourceInfo {
                channels: channels.max(1),
                sample_rate,
                total_samples: samples.len(),
            },
        }
    }

    /// Chunk size in bytes; need not be sample-aligned.
    pub fn with_chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_bytes = bytes.max(1);
        self
    }

    /// Override the advertised total, e.g. to mimic an inaccurate container
    /// duration.
    pub fn with_total_samples(mut self, total_samples: usize) -> Self {
        self.info.total_samples = total_samples;
        self
    }
}

impl PcmSource for MemorySource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        if self.position >= self.bytes.len() {
            return Ok(None);
        }
        let end = (self.position + self.chunk_bytes).min(self.bytes.len());
        let chunk = self.bytes[self.position..end].to_vec();
        self.position = end;
        Ok(Some(chunk))
    }
}
