//! Integration tests for the bit-vector codec.

use aes_conformance::codec::{decode, decode_bits, encode, from_bytes, to_bytes, to_hex};
use aes_conformance::common::{BitVector, HarnessError};

/// Tests big-endian encoding of a full-width value.
#[test]
fn test_encode_big_endian() {
    let v = BitVector::wide(0x000102030405060708090a0b0c0d0e0f);
    assert_eq!(encode(&v, false), "000102030405060708090a0b0c0d0e0f");
    assert_eq!(encode(&v, true), "0f0e0d0c0b0a09080706050403020100");
}

/// Tests that leading zero bytes are kept.
#[test]
fn test_encode_pads_to_width() {
    let v = BitVector::new(32, 0x1).unwrap();
    assert_eq!(encode(&v, false), "00000001");
    let byte = BitVector::new(8, 0xab).unwrap();
    assert_eq!(encode(&byte, false), "ab");
}

/// Tests hex decoding, including upper case and surrounding whitespace.
#[test]
fn test_decode_hex() {
    assert_eq!(decode("00ff7F").unwrap(), vec![0x00, 0xff, 0x7f]);
    assert_eq!(decode("  2B7E  ").unwrap(), vec![0x2b, 0x7e]);
    assert_eq!(decode("").unwrap(), Vec::<u8>::new());
}

/// Tests rejection of malformed hex.
#[test]
fn test_decode_rejects_malformed() {
    assert!(matches!(decode("abc"), Err(HarnessError::Codec(_))));
    assert!(matches!(decode("zz"), Err(HarnessError::Codec(_))));
    assert!(matches!(decode("é0"), Err(HarnessError::Codec(_))));
    assert!(matches!(decode("+f"), Err(HarnessError::Codec(_))));
    assert!(matches!(decode("-1"), Err(HarnessError::Codec(_))));
    assert!(matches!(
        decode_bits("+f+f", 16, false),
        Err(HarnessError::Codec(_))
    ));
}

/// Tests byte splitting in both orders.
#[test]
fn test_to_bytes_orders() {
    let v = BitVector::new(16, 0x1234).unwrap();
    assert_eq!(to_bytes(&v, false), vec![0x12, 0x34]);
    assert_eq!(to_bytes(&v, true), vec![0x34, 0x12]);
}

/// Tests packing bytes back into a value.
#[test]
fn test_from_bytes() {
    let v = from_bytes(&[0x12, 0x34], 16, false).unwrap();
    assert_eq!(v.value(), 0x1234);
    let r = from_bytes(&[0x12, 0x34], 16, true).unwrap();
    assert_eq!(r.value(), 0x3412);
    assert!(matches!(
        from_bytes(&[0x12], 16, false),
        Err(HarnessError::InvalidInput {
            expected: 2,
            actual: 1,
            ..
        })
    ));
}

/// Tests that decode_bits inverts encode.
#[test]
fn test_decode_bits_inverts_encode() {
    let v = BitVector::new(20, 0xabcde).unwrap();
    let hex = encode(&v, true);
    assert_eq!(decode_bits(&hex, 20, true).unwrap(), v);
}

/// Tests width validation of bit vectors.
#[test]
fn test_bit_vector_widths() {
    assert_eq!(BitVector::new(0, 0), Err(HarnessError::InvalidWidth(0)));
    assert_eq!(BitVector::new(129, 0), Err(HarnessError::InvalidWidth(129)));
    assert_eq!(
        BitVector::new(4, 0x10),
        Err(HarnessError::ValueOverflow {
            width: 4,
            value: 0x10
        })
    );
    assert_eq!(BitVector::truncated(4, 0x1f).unwrap().value(), 0xf);
}

/// Tests two's-complement conversion used for FSM encodings.
#[test]
fn test_signed_values() {
    let v = BitVector::from_signed(4, -3).unwrap();
    assert_eq!(v.value(), 0b1101);
    assert_eq!(v.as_signed(), -3);
    assert_eq!(BitVector::from_signed(4, 5).unwrap().as_signed(), 5);
    assert!(BitVector::from_signed(4, -9).is_err());
    assert_eq!(format!("{}", v), "4'hd");
}

/// Tests lowercase hex of raw bytes.
#[test]
fn test_to_hex() {
    assert_eq!(to_hex(&[0xde, 0xad, 0x0b]), "dead0b");
}
