//! UTF-16 hex payload codec for LedgerKit.
//!
//! Text embedded in ledger call data is written as one 4-digit lowercase hex
//! group per UTF-16 code unit. [`encode_hex`] never fails; [`decode_hex`]
//! rejects anything that is not a whole number of well-formed groups, while
//! [`DecodeMode::Lenient`] keeps the legacy best-effort behaviour.

pub mod error;
pub mod payload;

pub use error::{CodecError, CodecResult};
pub use payload::{decode_hex, decode_hex_with, encode_hex, DecodeMode, EncodedPayload, GROUP_WIDTH};
