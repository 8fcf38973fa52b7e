//! Schema introspection backend.

use crate::flags::Flags;
use crate::scalar::{SCRATCH_LEN, Scalar};
use crate::ser::Serializer;
use crate::state::SerializerState;

/// One node entry recorded by [`SchemaIntrospector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Nesting depth of the node (0 = top level).
    pub depth: usize,
    pub type_name: &'static str,
    pub name: &'static str,
    pub flags: Flags,
    /// Wire width for scalar fields; `None` for structural nodes.
    pub wire_size: Option<usize>,
}

/// Records every node the schema visits, and the wire width of each
/// scalar, for the branch taken by the value being walked.
///
/// Variables and conditionals run as usual, so the listing reflects the
/// version gates that the value's own contents select.
#[derive(Default)]
pub struct SchemaIntrospector {
    state: SerializerState,
    fields: Vec<FieldInfo>,
}

impl SchemaIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<FieldInfo> {
        self.fields
    }
}

impl Serializer for SchemaIntrospector {
    fn state(&self) -> &SerializerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SerializerState {
        &mut self.state
    }

    fn begin(&mut self, type_name: &'static str, name: &'static str, flags: Flags) {
        self.state.begin(type_name, name, flags);
        self.fields.push(FieldInfo {
            depth: self.state.depth() - 1,
            type_name,
            name,
            flags,
            wire_size: None,
        });
    }

    fn scalar<T: Scalar>(&mut self, value: &mut T) {
        let flags = self.state.current().map_or(Flags::empty(), |n| n.flags);
        let wire = if flags.contains(Flags::VALUE_IS_32_BIT) {
            4
        } else {
            T::SIZE
        };
        if let Some(last) = self.fields.last_mut() {
            last.wire_size = Some(wire);
        }
        let mut buf = [0u8; SCRATCH_LEN];
        value.put_le(&mut buf);
        self.state.record_scalar(&buf[..T::SIZE]);
    }
}
