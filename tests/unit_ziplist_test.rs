use bytes::{BufMut, Bytes, BytesMut};
use rdbscan::RdbError;
use rdbscan::core::rdb::ziplist;

/// Wraps raw entry bytes in the ziplist framing: zlbytes + zltail + zllen.
fn ziplist(count: u16, entries: &[u8]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u32_le(11 + entries.len() as u32);
    buf.put_u32_le(0);
    buf.put_u16_le(count);
    buf.put_slice(entries);
    buf.put_u8(0xFF);
    buf.freeze()
}

#[test]
fn test_every_entry_encoding() {
    let mut entries = BytesMut::new();

    // 6-bit string
    entries.put_u8(0x00); // prevlen
    entries.put_u8(0x03);
    entries.put_slice(b"abc");
    // 14-bit string
    entries.put_u8(0x05);
    entries.put_u8(0x40);
    entries.put_u8(0x05);
    entries.put_slice(b"hello");
    // 32-bit string
    entries.put_u8(0x08);
    entries.put_u8(0x80);
    entries.put_u32(3);
    entries.put_slice(b"big");
    // int8
    entries.put_u8(0x09);
    entries.put_u8(0xFE);
    entries.put_i8(-7);
    // int16
    entries.put_u8(0x03);
    entries.put_u8(0xC0);
    entries.put_i16_le(-1234);
    // int24: three LE bytes of -100000
    entries.put_u8(0x04);
    entries.put_u8(0xF0);
    entries.put_slice(&[0x60, 0x79, 0xFE]);
    // int32
    entries.put_u8(0x05);
    entries.put_u8(0xD0);
    entries.put_i32_le(123_456_789);
    // int64
    entries.put_u8(0x06);
    entries.put_u8(0xE0);
    entries.put_i64_le(-9_000_000_000);
    // 4-bit immediates: header 0xF1 is 0, 0xFD is 12
    entries.put_u8(0x0A);
    entries.put_u8(0xF1);
    entries.put_u8(0x02);
    entries.put_u8(0xFD);

    let decoded = ziplist::decode(ziplist(10, &entries)).unwrap();
    let expected: Vec<&[u8]> = vec![
        b"abc",
        b"hello",
        b"big",
        b"-7",
        b"-1234",
        b"-100000",
        b"123456789",
        b"-9000000000",
        b"0",
        b"12",
    ];
    assert_eq!(decoded.len(), expected.len());
    for (got, want) in decoded.iter().zip(expected) {
        assert_eq!(&got[..], want);
    }
}

#[test]
fn test_prevlen_extension_is_skipped() {
    let mut entries = BytesMut::new();
    entries.put_u8(0xFE); // big-prevlen marker
    entries.put_u32_le(0xDEAD_BEEF); // 4 ignored bytes
    entries.put_u8(0x02);
    entries.put_slice(b"ok");

    let decoded = ziplist::decode(ziplist(1, &entries)).unwrap();
    assert_eq!(&decoded[0][..], b"ok");
}

#[test]
fn test_unknown_header_byte() {
    let mut entries = BytesMut::new();
    entries.put_u8(0x00);
    entries.put_u8(0xC5);

    let err = ziplist::decode(ziplist(1, &entries)).unwrap_err();
    match err {
        RdbError::Format(detail) => assert!(detail.contains("ziplist"), "{detail}"),
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn test_count_is_taken_from_zllen() {
    // Three encoded entries but zllen says two: only two decode.
    let mut entries = BytesMut::new();
    for value in [b"a", b"b", b"c"] {
        entries.put_u8(0x00);
        entries.put_u8(0x01);
        entries.put_slice(&value[..]);
    }
    let decoded = ziplist::decode(ziplist(2, &entries)).unwrap();
    assert_eq!(decoded.len(), 2);
}

#[test]
fn test_truncated_payload() {
    let err = ziplist::decode(Bytes::from_static(&[0x00, 0x01, 0x02])).unwrap_err();
    assert!(matches!(err, RdbError::Truncated));
}
