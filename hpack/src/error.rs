//! Error types returned by the encoder and decoder.

use std::{error, fmt, io};

/// Errors that can occur while encoding a header list.
#[derive(Debug)]
pub enum EncoderError {
    /// The caller asked to remove a header pair that isn't present in either
    /// table, or whose only match lives in the (immutable) static table and
    /// so cannot be removed. The message names the offending header.
    NotIndexable(String),

    /// Propagated from the `Write` sink the caller provided.
    Io(io::Error),
}

impl fmt::Display for EncoderError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotIndexable(header) => {
                write!(fmt, "{} not present in the header table", header)
            }
            Self::Io(err) => write!(fmt, "write error: {}", err),
        }
    }
}

impl error::Error for EncoderError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for EncoderError {
    fn from(err: io::Error) -> Self {
        EncoderError::Io(err)
    }
}

/// Errors that can occur while decoding a header block. Decoder state must
/// be considered corrupt once any of these is returned; the connection is
/// typically terminated.
#[derive(Debug, PartialEq, Eq)]
pub enum DecoderError {
    /// An indexed representation referenced index zero, which is never
    /// valid: the index space starts at one.
    ZeroIndex,

    /// An indexed representation referenced an index beyond the combined
    /// dynamic+static table size.
    IndexOutOfRange,

    /// The input ended in the middle of an integer, a string length, or a
    /// string body.
    Truncated,

    /// A decoded string literal exceeded the internal length ceiling.
    StringTooLong,

    /// Propagated from the Huffman decoder.
    InvalidHuffman,

    /// A decoded name or value was not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for DecoderError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ZeroIndex => write!(fmt, "index 0 is not a valid table index"),
            Self::IndexOutOfRange => write!(fmt, "index is out of range of the table"),
            Self::Truncated => write!(fmt, "input ended before the value could be decoded"),
            Self::StringTooLong => write!(fmt, "decoded string exceeds the length limit"),
            Self::InvalidHuffman => write!(fmt, "invalid Huffman-coded string"),
            Self::InvalidUtf8 => write!(fmt, "decoded bytes are not valid UTF-8"),
        }
    }
}

impl error::Error for DecoderError {}

impl From<httlib_huffman::DecoderError> for DecoderError {
    fn from(_: httlib_huffman::DecoderError) -> Self {
        DecoderError::InvalidHuffman
    }
}
