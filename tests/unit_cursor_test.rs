use bytes::Bytes;
use rdbscan::RdbError;
use rdbscan::core::rdb::{ByteCursor, Reader};

#[test]
fn test_slice_advances() {
    let mut cursor = ByteCursor::new(Bytes::from_static(b"abcdef"));
    assert_eq!(&cursor.slice(3).unwrap()[..], b"abc");
    assert_eq!(cursor.position(), 3);
    assert_eq!(&cursor.slice(3).unwrap()[..], b"def");
    assert_eq!(cursor.remaining(), 0);
}

#[test]
fn test_slice_past_end() {
    let mut cursor = ByteCursor::new(Bytes::from_static(b"ab"));
    let err = cursor.slice(3).unwrap_err();
    assert!(matches!(err, RdbError::Truncated));
}

#[test]
fn test_read_byte_and_seek() {
    let mut cursor = ByteCursor::new(Bytes::from_static(b"xyz"));
    assert_eq!(cursor.read_byte().unwrap(), b'x');
    cursor.seek_to(2).unwrap();
    assert_eq!(cursor.read_byte().unwrap(), b'z');
    assert!(cursor.read_byte().is_err());
}

#[test]
fn test_seek_to_end_is_allowed() {
    let mut cursor = ByteCursor::new(Bytes::from_static(b"ab"));
    cursor.seek_to(2).unwrap();
    assert!(cursor.seek_to(3).is_err());
}

#[test]
fn test_skip() {
    let mut cursor = ByteCursor::new(Bytes::from_static(b"abcd"));
    cursor.skip(2).unwrap();
    assert_eq!(cursor.read_byte().unwrap(), b'c');
    assert!(cursor.skip(2).is_err());
}

#[test]
fn test_reader_integer_accessors() {
    let bytes = [
        0x01, // byte
        0x02, 0x01, // u16le = 258
        0x01, 0x00, 0x00, 0x00, // u32le = 1
        0x00, 0x00, 0x00, 0x02, // u32be = 2
    ];
    let mut reader = Reader::new(&bytes[..]);
    assert_eq!(reader.read_byte().unwrap(), 1);
    assert_eq!(reader.u16_le().unwrap(), 258);
    assert_eq!(reader.u32_le().unwrap(), 1);
    assert_eq!(reader.u32_be().unwrap(), 2);
    assert_eq!(reader.position(), 11);
    assert!(matches!(reader.read_byte().unwrap_err(), RdbError::Truncated));
}

#[test]
fn test_reader_checksum_tracks_consumed_bytes() {
    let mut a = Reader::new(&b"REDIS"[..]);
    let mut b = Reader::new(&b"REDIS"[..]);
    a.read_full(5).unwrap();
    b.read_full(5).unwrap();
    assert_eq!(a.checksum(), b.checksum());

    let mut c = Reader::new(&b"XEDIS"[..]);
    c.read_full(5).unwrap();
    assert_ne!(a.checksum(), c.checksum());
}
