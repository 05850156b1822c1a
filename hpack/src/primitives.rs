//! HPACK's variable-length integer and string primitives.

use std::io::{self, Write};

use crate::error::DecoderError;

/// Continuation bytes beyond which an integer is rejected rather than kept
/// growing. Five continuation bytes cover every integer this codec produces
/// (table sizes and indices both fit comfortably in 32 bits) with headroom
/// to spare, and bounds the work a decoder does on adversarial input.
const MAX_CONTINUATION_BYTES: usize = 5;

/// A decoded string literal longer than this is rejected outright. Chosen
/// generously above any header a real deployment would send, while still
/// giving a decoder a hard ceiling instead of growing a buffer unboundedly
/// on hostile input.
pub const MAX_STRING_LEN: usize = 1 << 20;

/// Encodes `value` with an `prefix_bits`-wide prefix (1..=8), per the HPACK
/// integer representation. The caller is responsible for OR-ing any flag
/// bits into the returned first byte.
pub fn encode_integer(value: u32, prefix_bits: u8) -> Vec<u8> {
    debug_assert!((1..=8).contains(&prefix_bits));
    let max_prefix = (1u32 << prefix_bits) - 1;

    if value < max_prefix {
        return vec![value as u8];
    }

    let mut out = vec![max_prefix as u8];
    let mut remaining = value - max_prefix;
    while remaining >= 128 {
        out.push(((remaining % 128) + 128) as u8);
        remaining /= 128;
    }
    out.push(remaining as u8);
    out
}

/// Decodes an integer with an `prefix_bits`-wide prefix from the start of
/// `data`. Returns the decoded value and the number of bytes consumed.
pub fn decode_integer(data: &[u8], prefix_bits: u8) -> Result<(u32, usize), DecoderError> {
    debug_assert!((1..=8).contains(&prefix_bits));
    let mask = (1u8 << prefix_bits) - 1;
    let first = *data.first().ok_or(DecoderError::Truncated)?;
    let prefix_value = (first & mask) as u32;
    let max_prefix = mask as u32;

    if prefix_value < max_prefix {
        return Ok((prefix_value, 1));
    }

    let mut value = max_prefix;
    let mut index = 1;
    loop {
        if index - 1 >= MAX_CONTINUATION_BYTES {
            return Err(DecoderError::StringTooLong);
        }
        let byte = *data.get(index).ok_or(DecoderError::Truncated)?;
        let continuation = (byte & 0x7f) as u32;
        value = value
            .checked_add(continuation << (7 * (index - 1)))
            .ok_or(DecoderError::StringTooLong)?;
        index += 1;
        if byte & 0x80 == 0 {
            return Ok((value, index));
        }
    }
}

/// Writes a string literal: a 7-bit-prefixed length (top bit of that first
/// byte set iff Huffman-coded) followed by the raw or Huffman-coded octets.
pub fn write_string<W: Write>(dst: &mut W, value: &[u8], huffman: bool) -> io::Result<()> {
    let payload = if huffman {
        httlib_huffman::encode(value)
    } else {
        value.to_vec()
    };

    let mut len = encode_integer(payload.len() as u32, 7);
    if huffman {
        len[0] |= 0x80;
    }
    dst.write_all(&len)?;
    dst.write_all(&payload)
}

/// Reads a string literal from the start of `data`, returning the decoded
/// octets and the number of bytes consumed.
pub fn read_string(data: &[u8]) -> Result<(Vec<u8>, usize), DecoderError> {
    let first = *data.first().ok_or(DecoderError::Truncated)?;
    let huffman = first & 0x80 != 0;
    let (len, len_size) = decode_integer(data, 7)?;
    let len = len as usize;
    if len > MAX_STRING_LEN {
        return Err(DecoderError::StringTooLong);
    }

    let body_start = len_size;
    let body_end = body_start
        .checked_add(len)
        .ok_or(DecoderError::StringTooLong)?;
    let body = data.get(body_start..body_end).ok_or(DecoderError::Truncated)?;

    let value = if huffman {
        let mut out = Vec::new();
        httlib_huffman::decode(body, &mut out, httlib_huffman::DecoderSpeed::OneBit)?;
        out
    } else {
        body.to_vec()
    };

    Ok((value, body_end))
}
