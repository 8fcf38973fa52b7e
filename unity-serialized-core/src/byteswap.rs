//! In-place endian swap for wire scalars.

use crate::scalar::SCRATCH_LEN;

/// Reverse an `N`-byte buffer in place.
///
/// `N` must be 1, 2, 4, or 8; other widths are rejected at compile time.
/// A 1-byte swap is a no-op.
pub fn byte_swap<const N: usize>(bytes: &mut [u8; N]) {
    const {
        assert!(
            N == 1 || N == 2 || N == 4 || N == 8,
            "byte_swap expects a 1, 2, 4, or 8 byte buffer"
        );
    }
    bytes.reverse();
}

/// Swap a scalar inside a scratch buffer, dispatching on the wire width
/// the backend actually used.
pub(crate) fn swap_scratch(buf: &mut [u8; SCRATCH_LEN], width: usize) {
    match width {
        1 => {}
        2 => {
            if let Some(chunk) = buf.first_chunk_mut::<2>() {
                byte_swap(chunk);
            }
        }
        4 => {
            if let Some(chunk) = buf.first_chunk_mut::<4>() {
                byte_swap(chunk);
            }
        }
        8 => byte_swap(buf),
        _ => debug_assert!(false, "scalar wire width must be 1, 2, 4, or 8"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_two() {
        let mut bytes = [0x12, 0x34];
        byte_swap(&mut bytes);
        assert_eq!(bytes, [0x34, 0x12]);
    }

    #[test]
    fn test_swap_four() {
        let mut bytes = [0x12, 0x34, 0x56, 0x78];
        byte_swap(&mut bytes);
        assert_eq!(bytes, [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_swap_eight() {
        let mut bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        byte_swap(&mut bytes);
        assert_eq!(bytes, [8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_swap_one_is_noop() {
        let mut bytes = [0xAB];
        byte_swap(&mut bytes);
        assert_eq!(bytes, [0xAB]);
    }

    #[test]
    fn test_swap_scratch_partial() {
        let mut buf = [1, 2, 3, 4, 5, 6, 7, 8];
        swap_scratch(&mut buf, 4);
        assert_eq!(buf, [4, 3, 2, 1, 5, 6, 7, 8]);
    }
}
