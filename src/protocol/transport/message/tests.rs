//! Codec tests: framing, check-by-inclusion, header extraction and encoding.
use super::*;

/// Ping addressed to slot 0, carrying two opaque parameter bytes (9 bytes).
fn ping_message() -> MessageBytes {
    encode_command(0x0A, 0x0100, &[0x00, 0x00]).expect("small command")
}

#[test]
/// Framing: nothing is complete before the length byte, then exactly at `length + 5`.
fn test_is_complete_boundaries() {
    assert!(!is_complete(&[]));
    assert!(!is_complete(&[0xC0]));
    assert!(!is_complete(&[0xC0, 0x00, 0x0A, 0x00]));
    assert!(is_complete(&[0xC0, 0x00, 0x0A, 0x00, 0x00]));

    for length in 0..=u8::MAX {
        let mut buffer = [0u8; MAX_MESSAGE_BYTES];
        buffer[LENGTH_FIELD] = length;
        let expected = length as usize + BASE_MESSAGE_SIZE;
        for size in 0..expected {
            assert!(!is_complete(&buffer[..size]), "length {length} size {size}");
        }
        assert!(is_complete(&buffer[..expected]), "length {length}");
        assert_eq!(message_len(&buffer[..2]), Some(expected));
    }
}

#[test]
/// A freshly encoded message verifies.
fn test_verify_encoded_message() {
    let message = ping_message();
    assert_eq!(message.len(), 9);
    assert_eq!(message.as_slice()[LENGTH_FIELD], 4);
    assert!(verify_checksum(message.as_slice()));
}

#[test]
/// Verification is equivalent to comparing against the CRC of the body (LE).
fn test_verify_matches_plain_comparison() {
    let body = [0xC0, 0x04, 0x0B, 0x34, 0x12, 0xAA, 0x55];
    let crc = checksum(&body).to_le_bytes();
    let mut message = [0u8; 9];
    message[..7].copy_from_slice(&body);
    message[7..].copy_from_slice(&crc);
    assert!(verify_checksum(&message));

    message[7..].copy_from_slice(&checksum(&body).to_be_bytes());
    assert_eq!(
        verify_checksum(&message),
        crc[0] == crc[1],
        "byte-swapped checksum only verifies when both bytes are equal"
    );
}

#[test]
/// Any single flipped bit is detected.
fn test_single_bit_flip_detected() {
    let message = ping_message();
    for byte in 0..message.len() {
        for bit in 0..8 {
            let mut corrupted = [0u8; 9];
            corrupted.copy_from_slice(message.as_slice());
            corrupted[byte] ^= 1 << bit;
            assert!(!verify_checksum(&corrupted), "byte {byte} bit {bit}");
        }
    }
}

#[test]
/// Buffers too short to hold a checksum never verify.
fn test_verify_short_buffers() {
    assert!(!verify_checksum(&[]));
    assert!(!verify_checksum(&[0x00]));
}

#[test]
/// Header fields come from fixed offsets, command id little-endian.
fn test_header_decode() {
    let header = MessageHeader::decode(&[0xC0, 0x04, 0x0C, 0x34, 0x12]).expect("long enough");
    assert_eq!(
        header,
        MessageHeader {
            message_type: MESSAGE_TYPE_COMMAND,
            length: 4,
            recipient: 0x0C,
            command_id: 0x1234,
        }
    );
    assert!(header.is_command());
    assert_eq!(
        MessageHeader::decode(&[0xC0, 0x04]),
        Err(MessageError::TooShort { len: 2 })
    );
}

#[test]
/// Response layout: type, length, master, response code, command id, params, CRC.
fn test_encode_response_layout() {
    let response = encode_response(0x0000, 0x0100, &[]).expect("empty response");
    let bytes = response.as_slice();
    assert_eq!(bytes.len(), 9);
    assert_eq!(&bytes[..7], &[0xC0, 0x04, MASTER_ADDRESS, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(&bytes[7..], &checksum(&bytes[..7]).to_le_bytes());
}

#[test]
/// Decoding an encoded response gives back its fields.
fn test_response_round_trip() {
    let parameters = [0x01, 0x02, 0x03, 0x04, 0x05];
    let response = encode_response(0x0001, 0xBEEF, &parameters).expect("fits");
    let view = ResponseView::parse(response.as_slice()).expect("valid");
    assert_eq!(view.recipient, MASTER_ADDRESS);
    assert_eq!(view.response_code, 0x0001);
    assert_eq!(view.command_id, 0xBEEF);
    assert_eq!(view.parameters, &parameters);
}

#[test]
/// The largest parameter block still fits the length byte; one more does not.
fn test_encode_response_limits() {
    let parameters = [0xA5u8; MAX_PARAMETER_BYTES];
    let response = encode_response(0, 1, &parameters).expect("max size");
    assert_eq!(response.len(), MAX_MESSAGE_BYTES);
    assert_eq!(response.as_slice()[LENGTH_FIELD], u8::MAX);
    assert!(is_complete(response.as_slice()));

    let too_long = [0u8; MAX_PARAMETER_BYTES + 1];
    assert_eq!(
        encode_response(0, 1, &too_long),
        Err(MessageError::ParametersTooLong {
            len: MAX_PARAMETER_BYTES + 1,
            max: MAX_PARAMETER_BYTES,
        })
    );
}

#[test]
/// Views validate completeness and checksum and ignore trailing bytes.
fn test_message_view_parse() {
    let message = ping_message();
    let mut with_trailer = [0xFFu8; 12];
    with_trailer[..9].copy_from_slice(message.as_slice());

    let view = MessageView::parse(&with_trailer).expect("valid prefix");
    assert_eq!(view.header.command_id, 0x0100);
    assert_eq!(view.header.recipient, 0x0A);
    assert_eq!(view.parameters, &[0x00, 0x00]);

    assert_eq!(
        MessageView::parse(&message.as_slice()[..8]),
        Err(MessageError::Incomplete {
            expected: 9,
            actual: 8
        })
    );

    let mut corrupted = [0u8; 9];
    corrupted.copy_from_slice(message.as_slice());
    corrupted[8] ^= 0x01;
    assert_eq!(
        MessageView::parse(&corrupted),
        Err(MessageError::ChecksumMismatch)
    );
}

#[test]
/// Appending beyond capacity fails and leaves the buffer untouched.
fn test_message_bytes_capacity() {
    let mut bytes = MessageBytes::new();
    bytes.extend_from_slice(&[1, 2, 3]).expect("fits");
    assert!(bytes
        .extend_from_slice(&[0u8; MAX_MESSAGE_BYTES])
        .is_err());
    assert_eq!(bytes.as_slice(), &[1, 2, 3]);
    bytes.clear();
    assert!(bytes.is_empty());
}
