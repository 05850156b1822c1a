//! The draft-07 HPACK decoder.
//!
//! Decoding walks the header block once, dispatching on the high bits of
//! each representation's first byte (§4.3), and mutates the dynamic table
//! and reference set exactly as the paired encoder does. Anything still
//! sitting in the reference set once the block is exhausted is implicitly
//! part of the header list and gets appended, in a deterministic order, to
//! whatever was explicitly decoded.

use std::collections::HashSet;

use crate::error::DecoderError;
use crate::primitives::{decode_integer, read_string};
use crate::table::Table;

type HeaderField = (Vec<u8>, Vec<u8>);

/// Decodes HPACK draft-07 header blocks into header lists, maintaining the
/// dynamic table and reference set across calls.
pub struct Decoder {
    table: Table,
    references: HashSet<HeaderField>,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder {
            table: Table::new(),
            references: HashSet::new(),
        }
    }
}

impl Decoder {
    pub fn new() -> Self {
        Decoder::default()
    }

    /// The dynamic table's current maximum size. Only ever changed by a
    /// context-update representation sent by the peer; there is no local
    /// setter.
    pub fn header_table_size(&self) -> u32 {
        self.table.max_size()
    }

    /// Decodes one header block, returning the header list in the order the
    /// block produced it (explicit representations first, then whatever
    /// remained in the reference set at block end).
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<(String, String)>, DecoderError> {
        let mut emitted: Vec<HeaderField> = Vec::new();
        let mut cursor = 0;

        while cursor < data.len() {
            let input = &data[cursor..];
            let first = input[0];
            let consumed = if first & 0x80 != 0 {
                self.decode_indexed(input, &mut emitted)?
            } else if first & 0x40 != 0 {
                self.decode_literal(input, true, &mut emitted)?
            } else if first & 0x20 != 0 {
                self.update_context(input)?
            } else {
                self.decode_literal(input, false, &mut emitted)?
            };
            cursor += consumed;
        }

        let mut remaining: Vec<HeaderField> = self
            .references
            .iter()
            .filter(|header| !emitted.contains(header))
            .cloned()
            .collect();
        remaining.sort();
        emitted.extend(remaining);

        emitted
            .into_iter()
            .map(|(name, value)| {
                let name = String::from_utf8(name).map_err(|_| DecoderError::InvalidUtf8)?;
                let value = String::from_utf8(value).map_err(|_| DecoderError::InvalidUtf8)?;
                Ok((name, value))
            })
            .collect()
    }

    /// Decodes an indexed representation (`1xxxxxxx`, 7-bit prefix). A
    /// resolved static-table entry is promoted into the dynamic table so
    /// later references stay stable. If the entry is already in the
    /// reference set it's removed (and nothing is emitted this step),
    /// otherwise it's added and appended to `emitted`.
    fn decode_indexed(&mut self, data: &[u8], emitted: &mut Vec<HeaderField>) -> Result<usize, DecoderError> {
        let (index, consumed) = decode_integer(data, 7)?;
        if index == 0 {
            return Err(DecoderError::ZeroIndex);
        }
        let dyn_len = self.table.dynamic_len();
        let (name, value) = self.table.get(index)?;
        let header: HeaderField = (name.to_vec(), value.to_vec());

        if index > dyn_len {
            self.table.insert(header.0.clone(), header.1.clone());
        }

        if self.references.remove(&header) {
            // Was implicitly held by the peer; this representation tells us
            // to stop holding it, so nothing is emitted.
        } else {
            self.references.insert(header.clone());
            emitted.push(header);
        }

        Ok(consumed)
    }

    /// Decodes a literal representation, indexed (`01xxxxxx`, 6-bit name
    /// prefix, §4.3) or not (`0000xxxx`, 4-bit name prefix). In both cases
    /// the name may itself be indexed (nonzero prefix value) or spelled out
    /// literally (zero prefix value, name follows as a string literal).
    fn decode_literal(
        &mut self,
        data: &[u8],
        should_index: bool,
        emitted: &mut Vec<HeaderField>,
    ) -> Result<usize, DecoderError> {
        let name_prefix_bits = if should_index { 6 } else { 4 };
        let mask = (1u8 << name_prefix_bits) - 1;
        let indexed_name = *data.first().ok_or(DecoderError::Truncated)? & mask;

        let (name, mut cursor) = if indexed_name != 0 {
            let (index, consumed) = decode_integer(data, name_prefix_bits)?;
            let (name, _) = self.table.get(index)?;
            (name.to_vec(), consumed)
        } else {
            // The length-prefix byte of the name's string literal starts
            // right after the flag byte we've already dispatched on; capture
            // its Huffman bit from this slice, not from `data` after it's
            // been advanced, so the Huffman flag can't be misread.
            let (name, consumed) = read_string(&data[1..])?;
            (name, 1 + consumed)
        };

        let (value, value_len) = read_string(&data[cursor..])?;
        cursor += value_len;

        let header: HeaderField = (name, value);
        if should_index {
            self.table.insert(header.0.clone(), header.1.clone());
            self.references.insert(header.clone());
        }
        emitted.push(header);

        Ok(cursor)
    }

    /// Decodes a context-update representation (`001xxxxx`). A first byte of
    /// exactly `0x30` clears the reference set outright; any other byte in
    /// the range carries a new dynamic table size, 4-bit prefixed — not the
    /// 5 bits the general `001xxxxx` layout would suggest, matching the
    /// draft-07 reference implementation this codec must interoperate with.
    fn update_context(&mut self, data: &[u8]) -> Result<usize, DecoderError> {
        let first = *data.first().ok_or(DecoderError::Truncated)?;
        if first == 0x30 {
            self.references.clear();
            return Ok(1);
        }
        let (new_size, consumed) = decode_integer(data, 4)?;
        let evicted = self.table.set_max_size(new_size);
        for header in evicted {
            self.references.remove(&header);
        }
        Ok(consumed)
    }
}
