//! The draft-07 HPACK encoder.
//!
//! Encoding a header list is a three-step pipeline: compare the list against
//! the reference set (headers already believed to be held by the peer need
//! no bytes at all), encode whatever's left using the most compact
//! representation the tables allow, then flush whatever the reference set
//! still holds that wasn't touched this call.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::error::EncoderError;
use crate::primitives::{encode_integer, write_string};
use crate::table::Table;

type HeaderField = (Vec<u8>, Vec<u8>);

/// A reference's ephemeral per-block emission state. Reset to `NotEmitted`
/// at the start of every `encode()` call; the tag itself only has meaning
/// for the duration of that one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitted {
    NotEmitted,
    ImplicitlyEmitted,
    Emitted,
}

/// Encodes header lists into HPACK draft-07 header blocks, maintaining the
/// dynamic table and reference set across calls.
pub struct Encoder {
    table: Table,
    references: HashMap<HeaderField, Emitted>,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder {
            table: Table::new(),
            references: HashMap::new(),
        }
    }
}

impl Encoder {
    pub fn new() -> Self {
        Encoder::default()
    }

    /// Builds an encoder whose dynamic table starts at `max_size` octets
    /// rather than the default 4096.
    pub fn with_dynamic_size(max_size: u32) -> Self {
        Encoder {
            table: Table::with_max_size(max_size),
            references: HashMap::new(),
        }
    }

    pub fn header_table_size(&self) -> u32 {
        self.table.max_size()
    }

    /// Lowers or raises the dynamic table's maximum size, evicting entries
    /// (and their reference-set membership) as required.
    pub fn set_header_table_size(&mut self, max_size: u32) {
        let evicted = self.table.set_max_size(max_size);
        for header in evicted {
            self.references.remove(&header);
        }
    }

    /// Encodes `headers` into `dst` as one HPACK header block, mutating the
    /// dynamic table and reference set in the process.
    pub fn encode<W, I, N, V>(&mut self, headers: I, huffman: bool, dst: &mut W) -> Result<(), EncoderError>
    where
        W: Write,
        I: IntoIterator<Item = (N, V)>,
        N: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        for tag in self.references.values_mut() {
            *tag = Emitted::NotEmitted;
        }

        for (name, value) in headers {
            self.encode_one((name.into(), value.into()), huffman, dst)?;
        }

        let mut remaining: Vec<HeaderField> = self
            .references
            .iter()
            .filter(|(_, tag)| **tag == Emitted::NotEmitted)
            .map(|(header, _)| header.clone())
            .collect();
        remaining.sort();
        for header in remaining {
            self.remove(&header, dst)?;
        }

        Ok(())
    }

    fn encode_one<W: Write>(
        &mut self,
        header: HeaderField,
        huffman: bool,
        dst: &mut W,
    ) -> Result<(), EncoderError> {
        let mut tag = self.exact_reference_tag(&header);

        if tag == Some(Emitted::NotEmitted) {
            self.references.insert(header, Emitted::ImplicitlyEmitted);
            return Ok(());
        }

        if tag.is_some() {
            if tag == Some(Emitted::ImplicitlyEmitted) {
                // The crazy unemit-reemit dance: the peer already implicitly
                // holds this header from an earlier block, but we need to
                // deliver it again, so take it out of the reference set and
                // put it straight back in.
                self.remove(&header, dst)?;
                self.add(header.clone(), huffman, dst)?;
                tag = self.exact_reference_tag(&header);
            }
            if tag.is_some() {
                self.remove(&header, dst)?;
            }
            tag = None;
        }

        if tag.is_none() {
            self.add(header, huffman, dst)?;
        }

        Ok(())
    }

    /// Looks up the reference-set tag for `header`, but only if `header` is
    /// itself an exact match in the tables right now — mirrors the source's
    /// behavior of keying reference lookups off the resolved table match
    /// rather than the raw input header.
    fn exact_reference_tag(&self, header: &HeaderField) -> Option<Emitted> {
        match self.table.find(&header.0, &header.1) {
            Some((_, true)) => self.references.get(header).copied(),
            _ => None,
        }
    }

    /// Emits the most compact representation of `header` and updates the
    /// tables/reference set accordingly, per the `add` operation.
    fn add<W: Write>(&mut self, header: HeaderField, huffman: bool, dst: &mut W) -> Result<(), EncoderError> {
        let (name, value) = header;
        match self.table.find(&name, &value) {
            None => {
                encode_literal(dst, &name, &value, true, huffman)?;
                self.table.insert(name.clone(), value.clone());
                self.references.insert((name, value), Emitted::Emitted);
            }
            Some((index, true)) => {
                encode_indexed(dst, index)?;
                if index > self.table.dynamic_len() {
                    self.table.insert(name.clone(), value.clone());
                }
                self.references.insert((name, value), Emitted::Emitted);
            }
            Some((index, false)) => {
                encode_indexed_literal(dst, index, &value, huffman)?;
            }
        }
        Ok(())
    }

    /// Emits an indexed representation removing `header` from the
    /// reference set. `header` must resolve to an exact match in the
    /// dynamic table (the static table can't participate in removal, since
    /// it's never mutated).
    fn remove<W: Write>(&mut self, header: &HeaderField, dst: &mut W) -> Result<(), EncoderError> {
        let not_indexable = || {
            EncoderError::NotIndexable(format!(
                "{}: {}",
                String::from_utf8_lossy(&header.0),
                String::from_utf8_lossy(&header.1)
            ))
        };
        let (index, exact) = self.table.find(&header.0, &header.1).ok_or_else(not_indexable)?;
        if !exact || index > self.table.dynamic_len() {
            return Err(not_indexable());
        }
        encode_indexed(dst, index)?;
        self.references.remove(header);
        Ok(())
    }
}

fn encode_indexed<W: Write>(dst: &mut W, index: u32) -> io::Result<()> {
    let mut field = encode_integer(index, 7);
    field[0] |= 0x80;
    dst.write_all(&field)
}

fn encode_literal<W: Write>(
    dst: &mut W,
    name: &[u8],
    value: &[u8],
    indexing: bool,
    huffman: bool,
) -> io::Result<()> {
    dst.write_all(&[if indexing { 0x40 } else { 0x00 }])?;
    write_string(dst, name, huffman)?;
    write_string(dst, value, huffman)
}

fn encode_indexed_literal<W: Write>(dst: &mut W, index: u32, value: &[u8], huffman: bool) -> io::Result<()> {
    let name = encode_integer(index, 4);
    dst.write_all(&name)?;
    write_string(dst, value, huffman)
}
