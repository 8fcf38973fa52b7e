//! Text dumping backend.

use std::fmt::Write as _;

use crate::flags::Flags;
use crate::scalar::{SCRATCH_LEN, Scalar, ScalarKind};
use crate::ser::Serializer;
use crate::state::SerializerState;

/// Renders one line per scalar, indented by tree depth:
/// `<type> <name> = <value>`. CString scopes collapse into a single
/// quoted-string line. Variables and conditionals behave exactly as in
/// the binary backends, so the dump follows the same version gates the
/// wire format would.
#[derive(Default)]
pub struct TextDumper {
    state: SerializerState,
    out: String,
    pending: Option<PendingString>,
}

/// A cstring being collected until all payload bytes have passed through.
struct PendingString {
    type_name: &'static str,
    name: &'static str,
    indent: usize,
    remaining: usize,
    bytes: Vec<u8>,
}

impl TextDumper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the dumper, yielding the rendered text.
    pub fn into_text(self) -> String {
        self.out
    }

    fn push_line(&mut self, indent: usize, type_name: &str, name: &str, value: &str) {
        for _ in 0..indent {
            self.out.push_str("  ");
        }
        let _ = writeln!(self.out, "{type_name} {name} = {value}");
    }

    fn in_cstring_scope(&self) -> bool {
        self.state
            .ancestor(2)
            .is_some_and(|node| node.flags.contains(Flags::C_STRING))
    }
}

impl Serializer for TextDumper {
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
                    let len = i32::get_le(&buf).max(0) as usize;
                    let (type_name, name) = self
                        .state
                        .ancestor(2)
                        .map_or(("string", ""), |n| (n.type_name, n.name));
                    let indent = self.state.depth().saturating_sub(3);
                    if len == 0 {
                        self.push_line(indent, type_name, name, "\"\"");
                    } else {
                        self.pending = Some(PendingString {
                            type_name,
                            name,
                            indent,
                            remaining: len,
                            bytes: Vec::with_capacity(len),
                        });
                    }
                    self.state.record_scalar(&buf[..T::SIZE]);
                    return;
                }
                ScalarKind::U8 => {
                    let finished = match &mut self.pending {
                        Some(pending) => {
                            pending.bytes.push(buf[0]);
                            pending.remaining -= 1;
                            pending.remaining == 0
                        }
                        None => false,
                    };
                    if finished {
                        if let Some(done) = self.pending.take() {
                            let text = String::from_utf8_lossy(&done.bytes).into_owned();
                            self.push_line(
                                done.indent,
                                done.type_name,
                                done.name,
                                &format!("{text:?}"),
                            );
                        }
                    }
                    self.state.record_scalar(&buf[..T::SIZE]);
                    return;
                }
                _ => {}
            }
        }

        let (type_name, name) = self
            .state
            .current()
            .map_or(("?", "?"), |n| (n.type_name, n.name));
        let indent = self.state.depth().saturating_sub(1);
        self.push_line(indent, type_name, name, &value.to_string());
        self.state.record_scalar(&buf[..T::SIZE]);
    }
}
