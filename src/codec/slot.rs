//! Bucket slot encoding: an 8-byte `(hash: u32 LE, record_offset: u32 LE)` pair.
//!
//! A slot with `record_offset == 0` is empty and terminates a probe.

/// Byte size of one encoded slot.
pub const SLOT_SIZE: usize = 8;

/// Encode a `(hash, record_offset)` pair into its 8-byte on-disk form.
#[inline]
pub fn encode_slot(hash: u32, record_offset: u32) -> [u8; SLOT_SIZE] {
    let mut buf = [0u8; SLOT_SIZE];
    buf[0..4].copy_from_slice(&hash.to_le_bytes());
    buf[4..8].copy_from_slice(&record_offset.to_le_bytes());
    buf
}

/// Decode an 8-byte slot into `(hash, record_offset)`.
#[inline]
pub fn decode_slot(bytes: &[u8; SLOT_SIZE]) -> (u32, u32) {
    let hash = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
    let record_offset = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    (hash, record_offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let encoded = encode_slot(0xdead_beef, 0x1234_5678);
        assert_eq!(decode_slot(&encoded), (0xdead_beef, 0x1234_5678));
    }

    #[test]
    fn empty_slot_has_zero_record_offset() {
        let encoded = encode_slot(42, 0);
        let (_, record_offset) = decode_slot(&encoded);
        assert_eq!(record_offset, 0);
    }

    #[test]
    fn is_little_endian() {
        let encoded = encode_slot(1, 1);
        assert_eq!(&encoded, &[1, 0, 0, 0, 1, 0, 0, 0]);
    }
}
