use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::source::{PcmSource, SourceInfo};
use super::spectrum::DEFAULT_SAMPLE_RATE;
use crate::error::{AnalysisError, Result};

/// Streams a container's first audio track as interleaved 16-bit PCM.
pub struct SymphoniaSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    info: SourceInfo,
}

impl SymphoniaSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| AnalysisError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        Self::from_media(Box::new(file), hint)
    }

    pub fn from_media(media: Box<dyn MediaSource>, hint: Hint) -> Result<Self> {
        let mss = MediaSourceStream::new(media, Default::default());

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AnalysisError::SourceUnavailable(format!("failed to probe audio format: {}", e)))?;

        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AnalysisError::SourceUnavailable("no audio tracks found".into()))?;

        let track_id = track.id;
        let channels = track.codec_params.channels.map_or(1, |c| c.count());
        let sample_rate = track.codec_params.sample_rate.unwrap_or_else(|| {
            log::warn!("Unknown sample rate, assuming {}Hz", DEFAULT_SAMPLE_RATE);
            DEFAULT_SAMPLE_RATE
        });
        let total_samples = track
            .codec_params
            .n_frames
            .map_or(0, |frames| frames as usize * channels);

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AnalysisError::SourceUnavailable(format!("failed to create audio decoder: {}", e)))?;

        log::info!(
            "Opened audio track: {} channel(s), {}Hz, {} samples",
            channels,
            sample_rate,
            total_samples
        );

        Ok(Self {
            format,
            decoder,
            track_id,
            info: SourceInfo {
                channels,
                sample_rate,
                total_samples,
            },
        })
    }
}

impl PcmSource for SymphoniaSource {
    fn info(&self) -> SourceInfo {
        self.info
    }

    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(e) => {
                    log::error!("Reading audio packets failed: {}", e);
                    return Err(AnalysisError::DecodeFailure(e.to_string()));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self.decoder.decode(&packet).map_err(|e| {
                log::error!("Decoding audio packet failed: {}", e);
                AnalysisError::DecodeFailure(e.to_string())
            })?;

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let mut sample_buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            let bytes = sample_buf
                .samples()
                .iter()
                .flat_map(|s| s.to_le_bytes())
                .collect();
            return Ok(Some(bytes));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    fn wav_source(samples: &[i16], channels: u16, sample_rate: u32) -> Result<SymphoniaSource> {
        let mut hint = Hint::new();
        hint.with_extension("wav");
        let cursor = Cursor::new(wav_bytes(samples, channels, sample_rate));
        SymphoniaSource::from_media(Box::new(cursor), hint)
    }

    #[test]
    fn reports_stream_parameters() {
        let samples = vec![0i16; 2000];
        let source = wav_source(&samples, 2, 22050).unwrap();
        let info = source.info();
        assert_eq!(info.channels, 2);
        assert_eq!(info.sample_rate, 22050);
        assert_eq!(info.total_samples, 2000);
    }

    #[test]
    fn streams_samples_unchanged() {
        let samples: Vec<i16> = (0..5000).map(|i| ((i * 37) % 20000 - 10000) as i16).collect();
        let mut source = wav_source(&samples, 1, 44100).unwrap();

        let mut bytes = Vec::new();
        while let Some(chunk) = source.next_chunk().unwrap() {
            bytes.extend(chunk);
        }
        let decoded: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn garbage_input_is_unavailable() {
        let cursor = Cursor::new(vec![0x42u8; 512]);
        let result = SymphoniaSource::from_media(Box::new(cursor), Hint::new());
        assert!(matches!(result, Err(AnalysisError::SourceUnavailable(_))));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let result = SymphoniaSource::open(Path::new("/nonexistent/track.wav"));
        assert!(matches!(result, Err(AnalysisError::Open { .. })));
    }
}
