use bytes::{BufMut, Bytes, BytesMut};
use rdbscan::RdbError;
use rdbscan::core::rdb::zipmap;

#[test]
fn test_small_map() {
    let mut buf = BytesMut::new();
    buf.put_u8(2); // pair count
    // field: length byte only
    buf.put_u8(4);
    buf.put_slice(b"name");
    // value: length byte plus a free byte
    buf.put_u8(3);
    buf.put_u8(0);
    buf.put_slice(b"Tom");
    buf.put_u8(3);
    buf.put_slice(b"age");
    buf.put_u8(2);
    buf.put_u8(0);
    buf.put_slice(b"30");
    buf.put_u8(0xFF);

    let pairs = zipmap::decode(buf.freeze()).unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(&pairs[0].0[..], b"name");
    assert_eq!(&pairs[0].1[..], b"Tom");
    assert_eq!(&pairs[1].0[..], b"age");
    assert_eq!(&pairs[1].1[..], b"30");
}

#[test]
fn test_value_free_padding_is_skipped() {
    let mut buf = BytesMut::new();
    buf.put_u8(2);
    buf.put_u8(1);
    buf.put_slice(b"a");
    buf.put_u8(1);
    buf.put_u8(3); // three bytes of trailing free space
    buf.put_slice(b"b");
    buf.put_slice(&[0xAA, 0xBB, 0xCC]);
    buf.put_u8(1);
    buf.put_slice(b"c");
    buf.put_u8(1);
    buf.put_u8(0);
    buf.put_slice(b"d");
    buf.put_u8(0xFF);

    let pairs = zipmap::decode(buf.freeze()).unwrap();
    assert_eq!(&pairs[1].0[..], b"c");
    assert_eq!(&pairs[1].1[..], b"d");
}

#[test]
fn test_long_item_length() {
    let long_field = vec![b'x'; 300];
    let mut buf = BytesMut::new();
    buf.put_u8(1);
    // 253 marker: 4 big-endian length bytes plus a free byte
    buf.put_u8(253);
    buf.put_u32(300);
    buf.put_u8(0);
    buf.put_slice(&long_field);
    buf.put_u8(2);
    buf.put_u8(0);
    buf.put_slice(b"ok");
    buf.put_u8(0xFF);

    let pairs = zipmap::decode(buf.freeze()).unwrap();
    assert_eq!(pairs[0].0.len(), 300);
    assert_eq!(&pairs[0].1[..], b"ok");
}

#[test]
fn test_count_derived_by_walking() {
    // Stored length 255 forces a walk over the items.
    let mut buf = BytesMut::new();
    buf.put_u8(255);
    buf.put_u8(1);
    buf.put_slice(b"f");
    buf.put_u8(1);
    buf.put_u8(0);
    buf.put_slice(b"v");
    buf.put_u8(0xFF);

    let pairs = zipmap::decode(buf.freeze()).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(&pairs[0].0[..], b"f");
    assert_eq!(&pairs[0].1[..], b"v");
}

#[test]
fn test_invalid_item_length_marker() {
    let payload = Bytes::from_static(&[1, 254, 0, 0]);
    let err = zipmap::decode(payload).unwrap_err();
    assert!(matches!(err, RdbError::Format(_)), "got {err:?}");
}

#[test]
fn test_early_end_sentinel_is_an_error() {
    // Declared two pairs, but the map ends after one.
    let mut buf = BytesMut::new();
    buf.put_u8(2);
    buf.put_u8(1);
    buf.put_slice(b"f");
    buf.put_u8(1);
    buf.put_u8(0);
    buf.put_slice(b"v");
    buf.put_u8(0xFF);

    let err = zipmap::decode(buf.freeze()).unwrap_err();
    assert!(matches!(err, RdbError::Format(_)), "got {err:?}");
}
