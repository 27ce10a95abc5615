//!
//! IMA ADPCM encoder and decoder for mono 16-bit PCM streams.
//!
//! Samples are compressed 4:1 into 4-bit codes, two codes per byte with the earlier
//! sample in the low nibble. The codec state ([`AdpcmState`]) is owned by the caller and
//! threaded through every call, so one stream can be processed in chunks and independent
//! streams can be processed in parallel.
//!
//! ```
//! use simple_adpcm::{decode_adpcm_ima, encode_adpcm_ima, AdpcmState};
//!
//! let mut enc_state = AdpcmState::new();
//! let encoded = encode_adpcm_ima(&[0, 120, 240, 360], &mut enc_state);
//! assert_eq!(encoded.len(), 2);
//!
//! let mut dec_state = AdpcmState::new();
//! let decoded = decode_adpcm_ima(&encoded, &mut dec_state);
//! assert_eq!(decoded.len(), 4);
//! assert_eq!(enc_state, dec_state);
//! ```
//!
//! [G.711 A-law](https://en.wikipedia.org/wiki/G.711#A-law) is also included for links
//! that carry companded audio instead of ADPCM.
//!

#![no_std]

#![forbid(
    unsafe_code,
    clippy::panic,
    clippy::exit,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unimplemented,
    clippy::todo,
    clippy::unreachable,
)]
#![deny(
    clippy::cast_ptr_alignment,
    clippy::char_lit_as_u8,
    clippy::unnecessary_cast,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
)]
#![allow(clippy::manual_range_contains)]

extern crate alloc;

mod alaw;
pub use alaw::{decode_alaw, decode_alaw_buf, encode_alaw, encode_alaw_buf};

mod adpcm_ima;
pub use adpcm_ima::{AdpcmState, INDEX_TABLE, MAX_STEP_INDEX, STEP_TABLE};
pub use adpcm_ima::{decode_adpcm_ima, decode_adpcm_ima_into, decode_adpcm_ima_nibble};
pub use adpcm_ima::{encode_adpcm_ima, encode_adpcm_ima_into, encode_adpcm_ima_sample};
pub use adpcm_ima::{decoded_len, encoded_len};

mod stream;
pub use stream::StreamEncoder;

/// Error values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Output buffer is too small for the result.
    #[error("output buffer has room for {got} items, {needed} needed")]
    InvalidBufferSize { needed: usize, got: usize },

    /// Step index is outside the step table (0..=88).
    #[error("step index {0} is out of range (valid range: 0-88)")]
    InvalidStepIndex(u8),
}
