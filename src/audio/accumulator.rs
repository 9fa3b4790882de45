/// Size in bytes of one interleaved PCM element (signed 16-bit).
pub const SAMPLE_SIZE: usize = std::mem::size_of::<i16>();

/// Growable byte queue fed by irregular PCM chunks and drained from the head.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    bytes: Vec<u8>,
}

impl ChunkAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Remove `count` processed samples from the head of the buffer.
    pub fn consume_head(&mut self, count: usize, element_size: usize) {
        let len = (count * element_size).min(self.bytes.len());
        self.bytes.drain(..len);
    }

    pub fn sample_count(&self, element_size: usize) -> usize {
        self.bytes.len() / element_size
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode all whole samples currently buffered (little-endian `i16`).
    /// A dangling half sample at the tail stays buffered for the next chunk.
    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(SAMPLE_SIZE)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    /// Append `count` zero samples, first dropping any partial trailing sample
    /// so the padding stays element-aligned.
    pub fn pad_zeros(&mut self, count: usize, element_size: usize) {
        let aligned = self.sample_count(element_size) * element_size;
        self.bytes.truncate(aligned);
        self.bytes.resize(aligned + count * element_size, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn appends_and_consumes_from_head() {
        let mut acc = ChunkAccumulator::new();
        acc.append(&bytes_of(&[1, 2, 3]));
        acc.append(&bytes_of(&[4, 5]));
        assert_eq!(acc.sample_count(SAMPLE_SIZE), 5);

        acc.consume_head(2, SAMPLE_SIZE);
        assert_eq!(acc.samples(), vec![3, 4, 5]);
    }

    #[test]
    fn consume_past_end_empties_buffer() {
        let mut acc = ChunkAccumulator::new();
        acc.append(&bytes_of(&[7, 8]));
        acc.consume_head(10, SAMPLE_SIZE);
        assert!(acc.is_empty());
    }

    #[test]
    fn split_sample_across_chunks() {
        let mut acc = ChunkAccumulator::new();
        let raw = bytes_of(&[-2, 300]);
        acc.append(&raw[..3]);
        assert_eq!(acc.samples(), vec![-2]);
        acc.append(&raw[3..]);
        assert_eq!(acc.samples(), vec![-2, 300]);
    }

    #[test]
    fn pad_zeros_drops_partial_tail() {
        let mut acc = ChunkAccumulator::new();
        let raw = bytes_of(&[9, 10]);
        acc.append(&raw[..3]);
        acc.pad_zeros(2, SAMPLE_SIZE);
        assert_eq!(acc.samples(), vec![9, 0, 0]);
    }
}
