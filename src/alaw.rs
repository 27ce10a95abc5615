#[cfg(feature = "internal-no-panic")]
use no_panic::no_panic;

use alloc::vec::Vec;

// see ITU-T G.711 and https://en.wikipedia.org/wiki/G.711#A-law
// codes are stored with every even bit inverted (xor 0x55), positive values have the top bit set

/// Decodes a 8-bit encoded G.711 A-law value to a linear 16-bit signed integer sample value.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn decode_alaw(encoded: u8) -> i16 {
    let code = encoded ^ 0x55;
    let mantissa = i16::from(code & 0x0f) << 4;
    let segment = (code & 0x70) >> 4;
    // decoded values are in the middle of the quantization interval
    let magnitude = match segment {
        0 => mantissa + 8,
        1 => mantissa + 0x108,
        _ => (mantissa + 0x108) << (segment - 1),
    };
    if (code & 0x80) != 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Encodes a linear 16-bit signed integer sample value to a 8-bit encoded G.711 A-law value.
#[cfg_attr(feature = "internal-no-panic", no_panic)]
#[inline(always)]
pub fn encode_alaw(linear: i16) -> u8 {
    // 12-bit magnitude, negative values use 1s' complement
    let (sign, magnitude) = if linear >= 0 {
        (0x80, linear >> 3)
    } else {
        (0x00, !linear >> 3)
    };
    let magnitude = magnitude.unsigned_abs();
    // segment 0 and 1 share the same step, after that each segment doubles it
    let segment = (u16::BITS - magnitude.leading_zeros()).saturating_sub(5);
    let mantissa = (magnitude >> segment.max(1)) & 0x0f;
    #[allow(clippy::cast_possible_truncation)] // segment is at most 7 and mantissa at most 15
    let code = (segment << 4) as u8 | mantissa as u8;
    (sign | code) ^ 0x55
}

/// Decodes G.711 A-law bytes to 16-bit signed integer samples, one sample per byte.
pub fn decode_alaw_buf(buf: &[u8]) -> Vec<i16> {
    buf.iter().map(|&b| decode_alaw(b)).collect()
}

/// Encodes 16-bit signed integer samples to G.711 A-law bytes, one byte per sample.
pub fn encode_alaw_buf(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&s| encode_alaw(s)).collect()
}
