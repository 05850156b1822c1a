//! The combined static/dynamic header table.
//!
//! Addressing is unified across both halves: index `1..=dynamic_len()`
//! reaches the dynamic table (1 is most recent), and
//! `dynamic_len()+1..=dynamic_len()+61` reaches the immutable static table.
//! There is no index 0. This collapses the 0-based/1-based split the
//! original implementation juggled at nearly every call site into a single
//! addressing scheme callers can use directly.

use std::collections::VecDeque;

use crate::error::DecoderError;

/// The 61-entry static table, identical in every encoder and decoder
/// instance and across resets. Never mutated.
#[rustfmt::skip]
pub const STATIC_TABLE: [(&[u8], &[u8]); 61] = [
    (b":authority", b""),
    (b":method", b"GET"),
    (b":method", b"POST"),
    (b":path", b"/"),
    (b":path", b"/index.html"),
    (b":scheme", b"http"),
    (b":scheme", b"https"),
    (b":status", b"200"),
    (b":status", b"204"),
    (b":status", b"206"),
    (b":status", b"304"),
    (b":status", b"400"),
    (b":status", b"404"),
    (b":status", b"500"),
    (b"accept-charset", b""),
    (b"accept-encoding", b"gzip, deflate"),
    (b"accept-language", b""),
    (b"accept-ranges", b""),
    (b"accept", b""),
    (b"access-control-allow-origin", b""),
    (b"age", b""),
    (b"allow", b""),
    (b"authorization", b""),
    (b"cache-control", b""),
    (b"content-disposition", b""),
    (b"content-encoding", b""),
    (b"content-language", b""),
    (b"content-length", b""),
    (b"content-location", b""),
    (b"content-range", b""),
    (b"content-type", b""),
    (b"cookie", b""),
    (b"date", b""),
    (b"etag", b""),
    (b"expect", b""),
    (b"expires", b""),
    (b"from", b""),
    (b"host", b""),
    (b"if-match", b""),
    (b"if-modified-since", b""),
    (b"if-none-match", b""),
    (b"if-range", b""),
    (b"if-unmodified-since", b""),
    (b"last-modified", b""),
    (b"link", b""),
    (b"location", b""),
    (b"max-forwards", b""),
    (b"proxy-authenticate", b""),
    (b"proxy-authorization", b""),
    (b"range", b""),
    (b"referer", b""),
    (b"refresh", b""),
    (b"retry-after", b""),
    (b"server", b""),
    (b"set-cookie", b""),
    (b"strict-transport-security", b""),
    (b"transfer-encoding", b""),
    (b"user-agent", b""),
    (b"vary", b""),
    (b"via", b""),
    (b"www-authenticate", b""),
];

/// Per-entry overhead the specification charges against `max_size`, on top
/// of the raw name/value octets.
const ENTRY_OVERHEAD: u32 = 32;

fn entry_size(name: &[u8], value: &[u8]) -> u32 {
    ENTRY_OVERHEAD + name.len() as u32 + value.len() as u32
}

/// The default initial dynamic table size mandated by the specification.
pub const DEFAULT_MAX_SIZE: u32 = 4096;

/// The dynamic table, plus a view over the static table, addressed as one
/// combined 1-based index space.
pub struct Table {
    dynamic: VecDeque<(Vec<u8>, Vec<u8>)>,
    size: u32,
    max_size: u32,
}

impl Default for Table {
    fn default() -> Self {
        Table {
            dynamic: VecDeque::new(),
            size: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn with_max_size(max_size: u32) -> Self {
        Table {
            max_size,
            ..Table::default()
        }
    }

    pub fn dynamic_len(&self) -> u32 {
        self.dynamic.len() as u32
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Resolves `index` (1-based, across both halves) to a header pair.
    pub fn get(&self, index: u32) -> Result<(&[u8], &[u8]), DecoderError> {
        if index == 0 {
            return Err(DecoderError::ZeroIndex);
        }
        let dyn_len = self.dynamic_len();
        if index <= dyn_len {
            let (name, value) = &self.dynamic[(index - 1) as usize];
            return Ok((name.as_slice(), value.as_slice()));
        }
        let static_index = (index - dyn_len - 1) as usize;
        STATIC_TABLE
            .get(static_index)
            .map(|&(name, value)| (name, value))
            .ok_or(DecoderError::IndexOutOfRange)
    }

    /// Scans the dynamic table (smaller indices first), then the static
    /// table, for a header matching `name`. Returns `(index, true)` for an
    /// exact `(name, value)` match, `(index, false)` for the first
    /// name-only match, preferring an exact match found anywhere over a
    /// partial match found earlier.
    pub fn find(&self, name: &[u8], value: &[u8]) -> Option<(u32, bool)> {
        let mut partial: Option<u32> = None;

        for (offset, (n, v)) in self.dynamic.iter().enumerate() {
            if n.as_slice() == name {
                if v.as_slice() == value {
                    return Some((offset as u32 + 1, true));
                } else if partial.is_none() {
                    partial = Some(offset as u32 + 1);
                }
            }
        }

        let dyn_len = self.dynamic_len();
        for (offset, &(n, v)) in STATIC_TABLE.iter().enumerate() {
            if n == name {
                if v == value {
                    return Some((dyn_len + offset as u32 + 1, true));
                } else if partial.is_none() {
                    partial = Some(dyn_len + offset as u32 + 1);
                }
            }
        }

        partial.map(|index| (index, false))
    }

    /// Prepends a new entry to the dynamic table, evicting from the back
    /// until the size invariant holds. Returns every evicted entry so the
    /// caller can remove matching reference-set members.
    pub fn insert(&mut self, name: Vec<u8>, value: Vec<u8>) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.size += entry_size(&name, &value);
        self.dynamic.push_front((name, value));
        self.evict()
    }

    /// Lowers (or raises) the maximum dynamic table size, evicting as
    /// needed. Returns every evicted entry.
    pub fn set_max_size(&mut self, max_size: u32) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.max_size = max_size;
        self.evict()
    }

    fn evict(&mut self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut evicted = Vec::new();
        while self.size > self.max_size {
            match self.dynamic.pop_back() {
                Some((name, value)) => {
                    self.size -= entry_size(&name, &value);
                    evicted.push((name, value));
                }
                None => {
                    self.size = 0;
                    break;
                }
            }
        }
        evicted
    }
}
