use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Hex digits per UTF-16 code unit.
pub const GROUP_WIDTH: usize = 4;

const REPLACEMENT_UNIT: u16 = 0xfffd;

/// Hex-encoded text: one zero-padded 4-digit lowercase group per UTF-16
/// code unit.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Number of UTF-16 code units carried.
    pub fn unit_count(&self) -> usize {
        self.0.len() / GROUP_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedPayload({})", self.0)
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for EncodedPayload {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Decoding policy for malformed payloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Reject partial groups, non-hex digits and unpaired surrogates.
    #[default]
    Strict,
    /// Ignore a trailing partial group; malformed groups and unpaired
    /// surrogates become U+FFFD. Never fails.
    Lenient,
}

/// Encode text as 4-digit hex groups, one per UTF-16 code unit.
pub fn encode_hex(text: &str) -> EncodedPayload {
    let mut out = String::with_capacity(text.len() * GROUP_WIDTH);
    for unit in text.encode_utf16() {
        // Writing to a String cannot fail.
        let _ = write!(out, "{unit:04x}");
    }
    EncodedPayload(out)
}

/// Strictly decode a payload produced by [`encode_hex`].
pub fn decode_hex(payload: impl AsRef<str>) -> CodecResult<String> {
    decode_hex_with(payload, DecodeMode::Strict)
}

/// Decode a payload under the given [`DecodeMode`].
pub fn decode_hex_with(payload: impl AsRef<str>, mode: DecodeMode) -> CodecResult<String> {
    let bytes = payload.as_ref().as_bytes();
    match mode {
        DecodeMode::Strict => decode_strict(bytes),
        DecodeMode::Lenient => Ok(decode_lenient(bytes)),
    }
}

fn decode_strict(bytes: &[u8]) -> CodecResult<String> {
    if bytes.len() % GROUP_WIDTH != 0 {
        return Err(CodecError::InvalidEncoding {
            position: bytes.len() - bytes.len() % GROUP_WIDTH,
            reason: format!("trailing partial group of {} digits", bytes.len() % GROUP_WIDTH),
        });
    }

    let mut units = Vec::with_capacity(bytes.len() / GROUP_WIDTH);
    for (index, group) in bytes.chunks_exact(GROUP_WIDTH).enumerate() {
        let unit = parse_group(group).map_err(|offset| CodecError::InvalidEncoding {
            position: index * GROUP_WIDTH + offset,
            reason: "not a hex digit".into(),
        })?;
        units.push(unit);
    }

    let mut text = String::with_capacity(units.len());
    let mut unit_index = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => {
                text.push(c);
                unit_index += c.len_utf16();
            }
            Err(e) => {
                return Err(CodecError::InvalidEncoding {
                    position: unit_index * GROUP_WIDTH,
                    reason: format!("unpaired surrogate {:04x}", e.unpaired_surrogate()),
                });
            }
        }
    }
    Ok(text)
}

fn decode_lenient(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(GROUP_WIDTH)
        .map(|group| parse_group(group).unwrap_or(REPLACEMENT_UNIT))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Parse one group; on failure returns the offset of the bad digit.
fn parse_group(group: &[u8]) -> Result<u16, usize> {
    group.iter().enumerate().try_fold(0u16, |acc, (offset, &b)| {
        let nibble = (b as char).to_digit(16).ok_or(offset)?;
        Ok((acc << 4) | nibble as u16)
    })
}
