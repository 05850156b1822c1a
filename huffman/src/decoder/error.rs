use std::{error, fmt};

/// Contains error options that can be encountered while performing the decoding
/// operations.
#[derive(Debug, PartialEq, Eq)]
pub enum DecoderError {
    /// Indicates that the decoder received an invalid Huffman code. This should
    /// never happen if the input is encoded according to the HPACK spec.
    InvalidInput,

    /// Indicates that the trailing padding bits left over after the last full
    /// symbol were not all ones, or that more than 7 padding bits remained.
    InvalidPadding,
}

impl fmt::Display for DecoderError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(fmt, "Invalid Huffman sequence."),
            Self::InvalidPadding => write!(fmt, "Invalid Huffman padding."),
        }
    }
}

impl error::Error for DecoderError {}
