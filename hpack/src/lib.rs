//! An implementation of the HPACK header-compression format as described by
//! the January 2014 (draft-07) HTTP/2 specification draft.
//!
//! Unlike later HPACK drafts, draft-07 keeps a *reference set*: a set of
//! table entries the encoder believes the decoding peer currently holds.
//! Headers that are already in the reference set cost nothing to
//! (re-)transmit, which is why [`Encoder::encode`] can legitimately return an
//! empty byte string for a header list identical to the previous one. This
//! crate implements both halves of that protocol — [`Encoder`] and
//! [`Decoder`] — sharing a combined static/dynamic header table and relying
//! on [`httlib_huffman`] for the Huffman-coded string literals.
//!
//! Both types are stateful and single-threaded: every call to `encode` or
//! `decode` mutates the dynamic table and reference set, and a single
//! instance must not be shared across concurrent callers.

mod decoder;
mod encoder;
mod error;
mod primitives;
mod table;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{DecoderError, EncoderError};
pub use table::DEFAULT_MAX_SIZE;
