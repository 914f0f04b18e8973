/// Byte-for-byte equality of two file contents. Buffers of different lengths are rejected
/// without looking at their contents.
#[must_use]
pub fn is_byte_identical(first: &[u8], second: &[u8]) -> bool {
    if first.len() != second.len() {
        return false;
    }

    first == second
}

#[cfg(test)]
mod test {
    use rand::prelude::*;

    use super::*;

    #[test]
    fn test_buffer_is_identical_to_itself() {
        let mut rng = StdRng::seed_from_u64(1);
        for len in [0usize, 1, 7, 4096] {
            let mut buf = vec![0u8; len];
            rng.fill_bytes(&mut buf);
            assert!(is_byte_identical(&buf, &buf.clone()));
        }
    }

    #[test]
    fn test_empty_buffers() {
        assert!(is_byte_identical(&[], &[]));
        assert!(!is_byte_identical(&[], &[0]));
    }

    #[test]
    fn test_different_lengths_are_not_identical() {
        assert!(!is_byte_identical(&[1, 2, 3], &[1, 2, 3, 4]));
    }

    #[test]
    fn test_single_flipped_byte() {
        let first = vec![7u8; 1024];
        let mut second = first.clone();
        second[1023] = 8;
        assert!(!is_byte_identical(&first, &second));
    }
}
