
use alloc::vec::Vec;

use log::debug;

use crate::adpcm_ima::{encode_adpcm_ima_sample, AdpcmState};

/// IMA ADPCM encoder for streams that arrive in chunks of any length.
///
/// [`encode_adpcm_ima()`](crate::encode_adpcm_ima) writes a lone trailing code of an
/// odd-length chunk as its own byte, which shifts the nibble pairing of everything encoded
/// after it. `StreamEncoder` holds that code back until the next sample arrives, so the
/// bytes from a series of [`encode()`](StreamEncoder::encode) calls followed by
/// [`flush()`](StreamEncoder::flush) are the same as encoding the whole stream at once.
///
/// ```
/// use simple_adpcm::{encode_adpcm_ima, AdpcmState, StreamEncoder};
///
/// let samples = [100, 200, 300, 400, 500];
/// let mut encoder = StreamEncoder::new();
/// let mut out = encoder.encode(&samples[..3]);
/// out.extend(encoder.encode(&samples[3..]));
/// out.extend(encoder.flush());
/// assert_eq!(out, encode_adpcm_ima(&samples, &mut AdpcmState::new()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamEncoder {
    state: AdpcmState,
    pending: Option<u8>,
}

impl StreamEncoder {
    pub fn new() -> StreamEncoder {
        StreamEncoder::with_state(AdpcmState::new())
    }

    /// Creates an encoder that continues from `state`.
    pub fn with_state(state: AdpcmState) -> StreamEncoder {
        StreamEncoder {
            state,
            pending: None,
        }
    }

    /// Codec state after the last encoded sample, including a pending one.
    pub fn state(&self) -> &AdpcmState {
        &self.state
    }

    /// Returns `true` if a code is waiting for its pair.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Encodes `samples` and returns the completed bytes.
    ///
    /// If the total number of samples seen so far is odd, the last code is kept for the
    /// next call or for [`flush()`](StreamEncoder::flush).
    pub fn encode(&mut self, samples: &[i16]) -> Vec<u8> {
        let total = samples.len() + usize::from(self.pending.is_some());
        let mut out = Vec::with_capacity(total / 2);
        for &sample in samples {
            let code = encode_adpcm_ima_sample(sample, &mut self.state);
            match self.pending.take() {
                Some(low) => out.push(code << 4 | low),
                None => self.pending = Some(code),
            }
        }
        out
    }

    /// Returns the pending code as a byte with a zero high nibble, if there is one.
    pub fn flush(&mut self) -> Option<u8> {
        self.pending.take()
    }

    /// Starts a new, independent stream. A pending code is discarded.
    pub fn reset(&mut self) {
        if let Some(code) = self.pending.take() {
            debug!("discarding pending ADPCM code {:#x} on reset", code);
        }
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adpcm_ima::encode_adpcm_ima;

    const SAMPLES: [i16; 9] = [1000, -1000, 500, 32767, -32768, 0, 12, -12, 7000];

    #[test]
    fn test_chunked_matches_whole() {
        let whole = encode_adpcm_ima(&SAMPLES, &mut AdpcmState::new());
        for split in 0..=SAMPLES.len() {
            let mut encoder = StreamEncoder::new();
            let mut out = encoder.encode(&SAMPLES[..split]);
            out.extend(encoder.encode(&SAMPLES[split..]));
            out.extend(encoder.flush());
            assert_eq!(out, whole);
        }
    }

    #[test]
    fn test_pending_code() {
        let mut encoder = StreamEncoder::new();
        assert!(encoder.encode(&[1000]).is_empty());
        assert!(encoder.has_pending());
        assert_eq!(encoder.encode(&[-1000, 500]), [0xF7]);
        assert!(encoder.has_pending());
        assert_eq!(encoder.flush(), Some(0x07));
        assert!(!encoder.has_pending());
        assert_eq!(encoder.flush(), None);
        assert_eq!(encoder.state(), &AdpcmState::from_parts(44, 24).unwrap_or_default());
    }

    #[test]
    fn test_reset() {
        let mut encoder = StreamEncoder::new();
        encoder.encode(&[1000, -1000, 500]);
        encoder.reset();
        assert!(!encoder.has_pending());
        assert_eq!(encoder.state(), &AdpcmState::new());
        assert_eq!(encoder.encode(&[0, 0]), [0x00]);
    }

    #[test]
    fn test_with_state() {
        let start = AdpcmState::from_parts(10, 0).unwrap_or_default();
        let mut encoder = StreamEncoder::with_state(start.clone());
        let mut s = start;
        assert_eq!(encoder.encode(&[10, 20, 50, 80]), encode_adpcm_ima(&[10, 20, 50, 80], &mut s));
        assert_eq!(encoder.state(), &s);
    }
}
