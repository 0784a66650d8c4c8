//! The CDB hash function.
//!
//! Translated from the `cdb_hash` routine of D. J. Bernstein's reference
//! `cdb.c`: seed 5381, then for each input byte `h = ((h << 5) + h) ^ b`
//! with 32-bit wraparound. Not cryptographic — it exists purely to define
//! the on-disk bucket layout, so every writer and reader must compute
//! exactly this function, bit for bit, on every platform.

/// Seed value for an empty input, and the starting accumulator for every hash.
pub const SEED: u32 = 5381;

/// One-shot CDB hash — equivalent to the reference implementation's `cdb_hash`.
///
/// # Parity vectors
/// * `hash(b"") == 5381`
/// * `hash(b"a") == 177604`
#[inline]
pub fn hash(data: &[u8]) -> u32 {
    let mut h = SEED;
    for &b in data {
        h = (h << 5).wrapping_add(h) ^ (b as u32);
    }
    h
}

/// Low byte of a hash — selects one of the 256 slot-directory buckets.
#[inline]
pub fn bucket_of(h: u32) -> usize {
    (h & 0xff) as usize
}

/// High 24 bits of a hash, reduced mod `bucket_len` — the starting probe slot.
///
/// `bucket_len` is the number of slots in the bucket, not its byte size.
#[inline]
pub fn start_slot(h: u32, bucket_len: u32) -> u32 {
    (h >> 8) % bucket_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_seed() {
        assert_eq!(hash(b""), 5381);
    }

    #[test]
    fn known_vector_a() {
        assert_eq!(hash(b"a"), 177_604);
    }

    #[test]
    fn deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(hash(data), hash(data));
    }

    #[test]
    fn distinct_inputs_usually_differ() {
        assert_ne!(hash(b"key1"), hash(b"key2"));
    }

    #[test]
    fn wraps_on_overflow_without_panicking() {
        // A long input drives many additions/shifts; this must not panic in
        // debug builds, where unchecked `+`/`<<` would abort on overflow.
        let data = vec![0x42u8; 1 << 20];
        let _ = hash(&data);
    }

    #[test]
    fn bucket_of_matches_low_byte() {
        let h = hash(b"some-key");
        assert_eq!(bucket_of(h), (h & 0xff) as usize);
    }

    #[test]
    fn start_slot_within_bounds() {
        let h = hash(b"some-key");
        let len = 16;
        assert!(start_slot(h, len) < len);
    }
}
