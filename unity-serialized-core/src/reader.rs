//! Binary reading backend.

use std::io::{Cursor, Read as _};

use crate::byteswap;
use crate::flags::Flags;
use crate::scalar::{SCRATCH_LEN, Scalar, ScalarKind};
use crate::ser::Serializer;
use crate::state::SerializerState;

/// Pull-mode backend that decodes scalars from an in-memory byte slice.
///
/// Short reads set the sticky `errored`/`eof` flags on the state and leave
/// the target value untouched; schemas keep running (and stay balanced)
/// but consult `is_errored` before entering element loops.
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
    state: SerializerState,
    /// Scratch holding the current NUL-terminated string's payload.
    cstring: Vec<u8>,
    string_index: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            state: SerializerState::new(),
            cstring: Vec::new(),
            string_index: 0,
        }
    }

    /// Current stream offset.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Consume the reader, yielding the final state for inspection.
    pub fn into_state(self) -> SerializerState {
        self.state
    }

    /// Advance to the next 4-byte boundary.
    fn align(&mut self) {
        let pos = self.cursor.position();
        let aligned = (pos + 3) & !3;
        if aligned != pos {
            self.cursor.set_position(aligned);
        }
    }

    /// Read the NUL-terminated byte run at the cursor into the scratch
    /// buffer, returning its length. Hitting end-of-data before the
    /// terminator is a malformed cstring.
    fn read_cstring(&mut self) -> usize {
        self.cstring.clear();
        loop {
            let mut byte = [0u8];
            if self.cursor.read_exact(&mut byte).is_err() {
                self.state.mark_errored();
                self.state.mark_eof();
                break;
            }
            if byte[0] == 0 {
                break;
            }
            self.cstring.push(byte[0]);
        }
        self.string_index = 0;
        self.cstring.len()
    }

    /// True while serializing the size or data scalars of a string scope
    /// flagged `CString` (the string node sits two levels up).
    fn in_cstring_scope(&self) -> bool {
        self.state
            .ancestor(2)
            .is_some_and(|node| node.flags.contains(Flags::C_STRING))
    }
}

impl Serializer for BinaryReader<'_> {
    fn state(&self) -> &SerializerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SerializerState {
        &mut self.state
    }

    fn scalar<T: Scalar>(&mut self, value: &mut T) {
        let mut buf = [0u8; SCRATCH_LEN];

        // A CString scope bypasses the length-prefixed layout: the length
        // scalar captures the NUL-terminated run and the chars drain the
        // scratch.
        if self.in_cstring_scope() {
            match T::KIND {
                ScalarKind::I32 => {
                    let len = self.read_cstring() as i32;
                    len.put_le(&mut buf);
                    *value = T::get_le(&buf);
                    self.state.record_scalar(&buf[..T::SIZE]);
                    return;
                }
                ScalarKind::U8 => {
                    buf[0] = self.cstring.get(self.string_index).copied().unwrap_or(0);
                    self.string_index += 1;
                    *value = T::get_le(&buf);
                    self.state.record_scalar(&buf[..T::SIZE]);
                    return;
                }
                _ => {}
            }
        }

        let flags = self.state.current().map_or(Flags::empty(), |n| n.flags);
        if flags.contains(Flags::PRE_ALIGN) {
            self.align();
        }

        let mut wire = T::SIZE;
        if flags.contains(Flags::VALUE_IS_32_BIT) {
            if T::SIZE >= 4 && !T::KIND.is_float() {
                wire = 4;
            } else {
                debug_assert!(false, "ValueIs32Bit requires an integer of at least 4 bytes");
                self.state.mark_errored();
            }
        }

        match self.cursor.read_exact(&mut buf[..wire]) {
            Ok(()) => {
                if self.state.is_big_endian() {
                    byteswap::swap_scratch(&mut buf, wire);
                }
                if wire < T::SIZE && T::KIND.is_signed_int() && buf[wire - 1] & 0x80 != 0 {
                    // Sign-extend a narrowed read into the logical width.
                    for byte in &mut buf[wire..T::SIZE] {
                        *byte = 0xFF;
                    }
                }
                *value = T::get_le(&buf);
            }
            Err(_) => {
                self.state.mark_errored();
                self.state.mark_eof();
                // Keep the caller's value; record its current bytes.
                buf = [0; SCRATCH_LEN];
                value.put_le(&mut buf);
            }
        }

        if flags.contains(Flags::POST_ALIGN) {
            self.align();
        }
        self.state.record_scalar(&buf[..T::SIZE]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{scalar_val, string_val};

    #[test]
    fn test_plain_scalars_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);
        let mut value = 0u32;
        scalar_val(&mut reader, &mut value, "UInt32", "value", Flags::empty());
        assert_eq!(value, 0x0403_0201);
        assert!(!reader.is_errored());
    }

    #[test]
    fn test_big_endian_node_flag() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = BinaryReader::new(&data);
        let mut value = 0u32;
        scalar_val(&mut reader, &mut value, "UInt32", "value", Flags::BIG_ENDIAN);
        assert_eq!(value, 0x0102_0304);
    }

    #[test]
    fn test_short_read_sets_sticky_flags() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);
        let mut value = 7u32;
        scalar_val(&mut reader, &mut value, "UInt32", "value", Flags::empty());
        assert!(reader.state().is_errored());
        assert!(reader.state().is_eof());
        // Value untouched on a failed read.
        assert_eq!(value, 7);
    }

    #[test]
    fn test_pre_align_skips_padding() {
        let data = [0xAA, 0x00, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
        let mut reader = BinaryReader::new(&data);
        let mut byte = 0u8;
        scalar_val(&mut reader, &mut byte, "UInt8", "byte", Flags::empty());
        let mut value = 0u32;
        scalar_val(&mut reader, &mut value, "UInt32", "value", Flags::PRE_ALIGN);
        assert_eq!(value, 42);
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_align_is_idempotent() {
        let data = [0x2A, 0x00, 0x00, 0x00];
        let mut reader = BinaryReader::new(&data);
        reader.align();
        assert_eq!(reader.position(), 0);
        let mut value = 0u32;
        scalar_val(&mut reader, &mut value, "UInt32", "value", Flags::PRE_ALIGN);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_value_is_32_bit_zero_extends() {
        let data = [0xEF, 0xBE, 0xAD, 0xDE];
        let mut reader = BinaryReader::new(&data);
        let mut value = 0u64;
        scalar_val(
            &mut reader,
            &mut value,
            "UInt32",
            "path_id",
            Flags::VALUE_IS_32_BIT,
        );
        assert_eq!(value, 0xDEAD_BEEF);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_value_is_32_bit_sign_extends() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF];
        let mut reader = BinaryReader::new(&data);
        let mut value = 0i64;
        scalar_val(
            &mut reader,
            &mut value,
            "SInt32",
            "id",
            Flags::VALUE_IS_32_BIT,
        );
        assert_eq!(value, -1);
    }

    #[test]
    fn test_cstring_read() {
        let data = b"foo\0rest";
        let mut reader = BinaryReader::new(data);
        let mut value = String::new();
        string_val(&mut reader, &mut value, "name", Flags::C_STRING);
        assert_eq!(value, "foo");
        assert_eq!(reader.position(), 4);
        assert!(!reader.is_errored());
    }

    #[test]
    fn test_empty_cstring_read() {
        let data = [0x00, 0x2A];
        let mut reader = BinaryReader::new(&data);
        let mut value = String::from("stale");
        string_val(&mut reader, &mut value, "name", Flags::C_STRING);
        assert_eq!(value, "");
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_unterminated_cstring_errors() {
        let data = b"foo";
        let mut reader = BinaryReader::new(data);
        let mut value = String::new();
        string_val(&mut reader, &mut value, "name", Flags::C_STRING);
        assert!(reader.state().is_errored());
        assert!(reader.state().is_eof());
    }

    #[test]
    fn test_plain_string_is_length_prefixed() {
        let mut data = vec![3, 0, 0, 0];
        data.extend_from_slice(b"abc");
        let mut reader = BinaryReader::new(&data);
        let mut value = String::new();
        string_val(&mut reader, &mut value, "name", Flags::empty());
        assert_eq!(value, "abc");
        assert_eq!(reader.position(), 7);
    }
}
