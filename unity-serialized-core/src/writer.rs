//! Binary writing backend.

use crate::byteswap;
use crate::flags::Flags;
use crate::scalar::{SCRATCH_LEN, Scalar, ScalarKind};
use crate::ser::Serializer;
use crate::state::SerializerState;

/// Push-mode backend that encodes scalars into a byte buffer.
///
/// Mirror of the reader: alignment happens at the same points (padding
/// bytes are zeros) and endianness is applied before the bytes land in
/// the output. A CString scope writes its payload bytes followed by a
/// single NUL, with no length prefix.
#[derive(Default)]
pub struct BinaryWriter {
    out: Vec<u8>,
    state: SerializerState,
    /// Payload bytes still expected before the NUL terminator of the
    /// cstring currently being written.
    cstring_pending: Option<usize>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stream offset.
    pub fn position(&self) -> usize {
        self.out.len()
    }

    /// Consume the writer, yielding the encoded bytes and the final state.
    pub fn finish(self) -> (Vec<u8>, SerializerState) {
        (self.out, self.state)
    }

    /// Pad with zeros to the next 4-byte boundary.
    fn align(&mut self) {
        while self.out.len() % 4 != 0 {
            self.out.push(0);
        }
    }

    fn in_cstring_scope(&self) -> bool {
        self.state
            .ancestor(2)
            .is_some_and(|node| node.flags.contains(Flags::C_STRING))
    }
}

impl Serializer for BinaryWriter {
    fn state(&self) -> &SerializerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SerializerState {
        &mut self.state
    }

    fn scalar<T: Scalar>(&mut self, value: &mut T) {
        let mut buf = [0u8; SCRATCH_LEN];
        value.put_le(&mut buf);

        if self.in_cstring_scope() {
            match T::KIND {
                ScalarKind::I32 => {
                    // The wire carries no length; an empty payload is just
                    // the terminator.
                    let len = i32::get_le(&buf);
                    if len <= 0 {
                        self.out.push(0);
                        self.cstring_pending = None;
                    } else {
                        self.cstring_pending = Some(len as usize);
                    }
                    self.state.record_scalar(&buf[..T::SIZE]);
                    return;
                }
                ScalarKind::U8 => {
                    self.out.push(buf[0]);
                    if let Some(remaining) = self.cstring_pending {
                        if remaining <= 1 {
                            self.out.push(0);
                            self.cstring_pending = None;
                        } else {
                            self.cstring_pending = Some(remaining - 1);
                        }
                    }
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
                // Truncate to the low 4 bytes.
                wire = 4;
            } else {
                debug_assert!(false, "ValueIs32Bit requires an integer of at least 4 bytes");
                self.state.mark_errored();
            }
        }

        let mut wire_buf = buf;
        if self.state.is_big_endian() {
            byteswap::swap_scratch(&mut wire_buf, wire);
        }
        self.out.extend_from_slice(&wire_buf[..wire]);

        if flags.contains(Flags::POST_ALIGN) {
            self.align();
        }
        self.state.record_scalar(&buf[..T::SIZE]);
    }
}
