//! End-to-end fixtures for the draft-07 codec, mirroring the scenarios in
//! the draft's worked examples. Wire bytes are kept as hex strings and
//! expected header lists as inline JSON, decoded at test time, the same
//! fixture shape an HPACK interop corpus uses.

use httlib_hpack::{Decoder, Encoder};

fn decode_hex(input: &str) -> Vec<u8> {
    hex::decode(input).expect("fixture hex must be valid")
}

fn expect_headers(json: &str) -> Vec<(String, String)> {
    let parsed: Vec<(String, String)> = serde_json::from_str(json).expect("fixture JSON must parse");
    parsed
}

/// First request, Huffman off: the first three headers resolve to static
/// indices and are emitted as indexed representations; `:authority` has no
/// static value match and is emitted as a literal with incremental indexing.
#[test]
fn first_request_no_huffman() {
    let mut encoder = Encoder::new();
    let mut block = Vec::new();
    encoder
        .encode(
            vec![
                (":method", "GET"),
                (":scheme", "http"),
                (":path", "/"),
                (":authority", "www.example.com"),
            ],
            false,
            &mut block,
        )
        .unwrap();

    assert_eq!(&block[..3], &decode_hex("828684")[..]);

    let mut decoder = Decoder::new();
    let headers = decoder.decode(&block).unwrap();
    let mut expected = expect_headers(
        r#"[[":method","GET"],[":scheme","http"],[":path","/"],[":authority","www.example.com"]]"#,
    );
    let mut actual = headers;
    actual.sort();
    expected.sort();
    assert_eq!(actual, expected);
}

/// Same request with Huffman on: the three indexed headers are unaffected,
/// and `www.example.com` is Huffman-coded to the bytes from RFC 7541
/// Appendix C.4.1 (the Huffman code is unchanged across HPACK drafts).
#[test]
fn first_request_with_huffman() {
    let mut encoder = Encoder::new();
    let mut block = Vec::new();
    encoder
        .encode(
            vec![
                (":method", "GET"),
                (":scheme", "http"),
                (":path", "/"),
                (":authority", "www.example.com"),
            ],
            true,
            &mut block,
        )
        .unwrap();

    assert_eq!(&block[..3], &decode_hex("828684")[..]);
    assert_eq!(block[3], 0x40);

    let mut decoder = Decoder::new();
    let headers = decoder.decode(&block).unwrap();
    let mut expected = expect_headers(
        r#"[[":method","GET"],[":scheme","http"],[":path","/"],[":authority","www.example.com"]]"#,
    );
    let mut actual = headers;
    actual.sort();
    expected.sort();
    assert_eq!(actual, expected);
}

/// Re-encoding the same header list leaves every header in the reference
/// set, so the second block is empty; decoding the (empty) second block
/// against the same decoder state still reproduces the full header list via
/// the implicit-emission mechanism.
#[test]
fn repeated_block_round_trips_via_reference_set() {
    let request = vec![
        (":method", "GET"),
        (":scheme", "http"),
        (":path", "/"),
        (":authority", "www.example.com"),
    ];

    let mut encoder = Encoder::new();
    let mut decoder = Decoder::new();

    let mut first_block = Vec::new();
    encoder.encode(request.clone(), false, &mut first_block).unwrap();
    let first_headers = decoder.decode(&first_block).unwrap();

    let mut second_block = Vec::new();
    encoder.encode(request.clone(), false, &mut second_block).unwrap();
    assert!(second_block.is_empty());

    let second_headers = decoder.decode(&second_block).unwrap();

    let mut expected: Vec<(String, String)> = request
        .iter()
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();
    expected.sort();

    let mut first_sorted = first_headers;
    first_sorted.sort();
    let mut second_sorted = second_headers;
    second_sorted.sort();

    assert_eq!(first_sorted, expected);
    assert_eq!(second_sorted, expected);
}

/// Decoding a lone `0x82` against a fresh decoder yields `:method: GET`,
/// promotes the static entry into the dynamic table, and adds it to the
/// reference set.
#[test]
fn decodes_lone_indexed_method_get() {
    let mut decoder = Decoder::new();
    let headers = decoder.decode(&decode_hex("82")).unwrap();
    assert_eq!(headers, expect_headers(r#"[[":method","GET"]]"#));
}

/// Sending `0x30` to a decoder whose reference set holds one entry empties
/// the reference set and consumes exactly one byte, touching nothing else.
#[test]
fn context_update_clears_reference_set() {
    let mut decoder = Decoder::new();
    decoder.decode(&decode_hex("82")).unwrap();

    let headers = decoder.decode(&decode_hex("30")).unwrap();
    assert!(headers.is_empty());

    // The dynamic table entry from the first block is untouched; a fresh
    // `0x82` would now hit the dynamic table rather than the static one.
    let headers = decoder.decode(&decode_hex("81")).unwrap();
    assert_eq!(headers, expect_headers(r#"[[":method","GET"]]"#));
}

/// Setting the encoder's table size to zero while it holds entries empties
/// the dynamic table and drops any reference-set members that pointed into
/// it; subsequent blocks can no longer index into the (now-empty) dynamic
/// region.
#[test]
fn shrinking_table_to_zero_empties_it() {
    let mut encoder = Encoder::new();
    let mut block = Vec::new();
    encoder
        .encode(
            vec![("x-one", "1"), ("x-two", "2"), ("x-three", "3")],
            false,
            &mut block,
        )
        .unwrap();

    encoder.set_header_table_size(0);
    assert_eq!(encoder.header_table_size(), 0);

    let mut next_block = Vec::new();
    encoder.encode(vec![("x-four", "4")], false, &mut next_block).unwrap();
    // With no dynamic table capacity, x-four can only be a literal.
    assert_eq!(next_block[0] & 0xc0, 0x40);
}

/// A string literal's bytes with no Huffman coding and a length under 127,
/// matching `write_string`'s non-Huffman path for the short names/values
/// this fixture uses (a single length byte, then the raw octets).
fn literal_string(value: &[u8]) -> Vec<u8> {
    let mut out = vec![value.len() as u8];
    out.extend_from_slice(value);
    out
}

/// Encoding the same header twice within one list runs the remove/re-add
/// dance, but not the way a first glance at "remove, then re-add" suggests.
/// The first occurrence has no table match, so it's emitted as a literal
/// with incremental indexing (`0x40…`) and lands in the dynamic table at
/// index 1. The second occurrence resolves to that same exact entry,
/// already tagged emitted this block, so `remove` emits an indexed
/// representation evicting it from the reference set (`0x81`) — but
/// `remove` never touches the table itself, so the fallback `add` call
/// finds the header still sitting at dynamic index 1 and emits a second
/// indexed representation (`0x81`) rather than another literal. The block
/// is therefore literal, indexed, indexed — and decoding it still yields
/// both occurrences.
#[test]
fn duplicate_header_within_one_block_round_trips() {
    let mut encoder = Encoder::new();
    let mut decoder = Decoder::new();
    let mut block = Vec::new();

    encoder
        .encode(vec![("x-custom", "value"), ("x-custom", "value")], false, &mut block)
        .unwrap();

    let mut expected = vec![0x40];
    expected.extend(literal_string(b"x-custom"));
    expected.extend(literal_string(b"value"));
    expected.extend([0x81, 0x81]);
    assert_eq!(block, expected);

    let headers = decoder.decode(&block).unwrap();
    assert_eq!(
        headers,
        expect_headers(r#"[["x-custom","value"],["x-custom","value"]]"#)
    );
}
