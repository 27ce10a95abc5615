
#[cfg(feature = "internal-no-panic")]
use no_panic::no_panic;

use alloc::vec;
use alloc::vec::Vec;

use crate::Error;

/// Largest valid index into [`STEP_TABLE`].
pub const MAX_STEP_INDEX: u8 = 88;

/// Step index adjustment for each 4-bit code.
pub const INDEX_TABLE: [i8; 16] = [
    -1, -1, -1, -1, 2, 4, 6, 8,
    -1, -1, -1, -1, 2, 4, 6, 8
];

/// Quantizer step sizes, indexed by the state's step index.
pub const STEP_TABLE: [i16; 89] = [
    7, 8, 9, 10, 11, 12, 13, 14, 16, 17,
    19, 21, 23, 25, 28, 31, 34, 37, 41, 45,
    50, 55, 60, 66, 73, 80, 88, 97, 107, 118,
    130, 143, 157, 173, 190, 209, 230, 253, 279, 307,
    337, 371, 408, 449, 494, 544, 598, 658, 724, 796,
    876, 963, 1060, 1166, 1282, 1411, 1552, 1707, 1878, 2066,
    2272, 2499, 2749, 3024, 3327, 3660, 4026, 4428, 4871, 5358,
    5894, 6484, 7132, 7845, 8630, 9493, 10442, 11487, 12635, 13899,
    15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794, 32767
];

/// State of one IMA ADPCM stream: the predicted sample and the step index.
///
/// The encoder and the decoder of a stream each own one state. Both start from
/// [`AdpcmState::new()`] (or a [`reset()`](AdpcmState::reset) state) and the same samples
/// move both states through the same values, so a decoder stays in sync with the encoder
/// as long as every code is decoded in order.
///
/// The fields can't be modified directly, so the step index is always in `0..=88`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdpcmState {
    predicted_sample: i16,
    step_index: u8,
}

impl AdpcmState {
    /// Creates a new state for the start of a stream (predicted sample 0, step index 0).
    pub const fn new() -> AdpcmState {
        AdpcmState {
            predicted_sample: 0,
            step_index: 0,
        }
    }

    /// Creates a state from values stored elsewhere, for instance a packet header.
    ///
    /// Returns [`Error::InvalidStepIndex`] if `step_index` is greater than 88.
    pub fn from_parts(predicted_sample: i16, step_index: u8) -> Result<AdpcmState, Error> {
        if step_index > MAX_STEP_INDEX {
            return Err(Error::InvalidStepIndex(step_index));
        }
        Ok(AdpcmState {
            predicted_sample,
            step_index,
        })
    }

    /// Resets the state for a new, independent stream.
    pub fn reset(&mut self) {
        *self = AdpcmState::new();
    }

    /// The current prediction, which is also the last encoded or decoded sample value.
    pub fn predicted_sample(&self) -> i16 {
        self.predicted_sample
    }

    pub fn step_index(&self) -> u8 {
        self.step_index
    }

    /// Step size used to quantize the next sample.
    #[inline(always)]
    pub fn step_size(&self) -> i16 {
        // min() lets the compiler drop the bounds check
        STEP_TABLE[usize::from(self.step_index.min(MAX_STEP_INDEX))]
    }
}

// steps shared by the encoder and the decoder: rebuild the quantized difference
// from the code, move the predictor and adapt the step index
#[inline(always)]
fn apply_code(code: u8, state: &mut AdpcmState) {
    let step = i32::from(state.step_size());
    let mut diff_q = step >> 3;
    if (code & 4) != 0 { diff_q += step; }
    if (code & 2) != 0 { diff_q += step >> 1; }
    if (code & 1) != 0 { diff_q += step >> 2; }
    let mut predicted = i32::from(state.predicted_sample);
    if (code & 8) != 0 {
        predicted -= diff_q;
    } else {
        predicted += diff_q;
    }
    #[allow(clippy::cast_possible_truncation)] // value is clamped so truncation never happens
    {
    state.predicted_sample = predicted.clamp(-32768, 32767) as i16;
    }
    state.step_index = state.step_index
        .saturating_add_signed(INDEX_TABLE[usize::from(code & 0x0f)])
        .min(MAX_STEP_INDEX);
}

/// Decodes one 4-bit IMA ADPCM code to a linear 16-bit signed integer sample value.
///
/// Only the lowest 4 bits of `nibble` are used.
///
/// `state` is updated; pass the same state to the call for the next nibble.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn decode_adpcm_ima_nibble(nibble: u8, state: &mut AdpcmState) -> i16 {
    apply_code(nibble & 0x0f, state);
    state.predicted_sample
}

/// Encodes a linear 16-bit signed integer sample value to a 4-bit IMA ADPCM code (0..=15).
///
/// `state` is updated; pass the same state to the call for the next sample.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn encode_adpcm_ima_sample(sample: i16, state: &mut AdpcmState) -> u8 {
    let step = i32::from(state.step_size());
    let mut diff = i32::from(sample) - i32::from(state.predicted_sample);
    let mut code: u8 = 0;
    if diff < 0 {
        code = 8;
        diff = -diff;
    }
    let mut threshold = step;
    if diff >= threshold {
        code |= 4;
        diff -= threshold;
    }
    threshold >>= 1;
    if diff >= threshold {
        code |= 2;
        diff -= threshold;
    }
    // the last bit doesn't reduce diff
    threshold >>= 1;
    if diff >= threshold {
        code |= 1;
    }
    apply_code(code, state);
    code
}

/// Number of bytes produced by encoding `sample_count` samples.
pub fn encoded_len(sample_count: usize) -> usize {
    sample_count.div_ceil(2)
}

/// Number of samples produced by decoding `byte_count` bytes.
pub fn decoded_len(byte_count: usize) -> usize {
    byte_count.saturating_mul(2)
}

// out must hold exactly encoded_len(samples.len()) bytes
fn encode_packed(samples: &[i16], state: &mut AdpcmState, out: &mut [u8]) -> usize {
    let mut written = 0;
    for (out_b, pair) in out.iter_mut().zip(samples.chunks(2)) {
        let mut codes = pair.iter().map(|&s| encode_adpcm_ima_sample(s, state));
        let low = codes.next().unwrap_or(0);
        let high = codes.next().unwrap_or(0);
        *out_b = high << 4 | low;
        written += 1;
    }
    written
}

fn decode_packed(buf: &[u8], state: &mut AdpcmState, out: &mut [i16]) -> usize {
    let mut written = 0;
    for (&b, out_pair) in buf.iter().zip(out.chunks_exact_mut(2)) {
        for (out_s, nibble) in out_pair.iter_mut().zip([b & 0x0f, b >> 4]) {
            *out_s = decode_adpcm_ima_nibble(nibble, state);
        }
        written += 2;
    }
    written
}

/// Encodes 16-bit signed integer samples to packed IMA ADPCM codes.
///
/// Two codes are packed in each byte, the first sample in the low nibble. If there is an
/// odd number of samples, the high nibble of the last byte is zero. The result has
/// `samples.len().div_ceil(2)` bytes.
///
/// `state` should be a new (or reset) state at the start of a stream. It is updated so that
/// the next chunk of the same stream can be encoded by passing it in again. A half-filled
/// last byte is not carried over to the next call; use [`StreamEncoder`](crate::StreamEncoder)
/// when chunks can have an odd number of samples.
pub fn encode_adpcm_ima(samples: &[i16], state: &mut AdpcmState) -> Vec<u8> {
    let mut out = vec![0u8; encoded_len(samples.len())];
    encode_packed(samples, state, &mut out);
    out
}

/// Encodes samples like [`encode_adpcm_ima()`], writing to `out_buf` instead of allocating.
///
/// Returns the number of bytes written, `samples.len().div_ceil(2)`. Bytes after that in
/// `out_buf` are left as they were.
///
/// An error is returned if `out_buf` is too short.
/// If an error is returned, `out_buf` and `state` are left unmodified.
pub fn encode_adpcm_ima_into(samples: &[i16], state: &mut AdpcmState, out_buf: &mut [u8])
    -> Result<usize, Error> {
    let needed = encoded_len(samples.len());
    let got = out_buf.len();
    let out = out_buf.get_mut(..needed)
        .ok_or(Error::InvalidBufferSize { needed, got })?;
    Ok(encode_packed(samples, state, out))
}

/// Decodes packed IMA ADPCM codes to 16-bit signed integer samples.
///
/// Each byte is decoded low nibble first, so the result always has `2 * buf.len()` samples.
/// If the stream was encoded from an odd number of samples, the last sample is padding and
/// the caller should drop it.
///
/// `state` must match the encoder's state at the start of `buf`; it is updated so that the
/// next chunk can be decoded by passing it in again.
pub fn decode_adpcm_ima(buf: &[u8], state: &mut AdpcmState) -> Vec<i16> {
    let mut out = vec![0i16; decoded_len(buf.len())];
    decode_packed(buf, state, &mut out);
    out
}

/// Decodes bytes like [`decode_adpcm_ima()`], writing to `out_samples` instead of allocating.
///
/// Returns the number of samples written, `2 * buf.len()`.
///
/// An error is returned if `out_samples` is too short.
/// If an error is returned, `out_samples` and `state` are left unmodified.
pub fn decode_adpcm_ima_into(buf: &[u8], state: &mut AdpcmState, out_samples: &mut [i16])
    -> Result<usize, Error> {
    let needed = decoded_len(buf.len());
    let got = out_samples.len();
    let out = out_samples.get_mut(..needed)
        .ok_or(Error::InvalidBufferSize { needed, got })?;
    Ok(decode_packed(buf, state, out))
}
