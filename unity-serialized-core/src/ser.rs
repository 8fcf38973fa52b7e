//! The backend capability trait and the schema trait.

use crate::flags::Flags;
use crate::scalar::Scalar;
use crate::state::SerializerState;

/// A serialization backend.
///
/// Backends own a [`SerializerState`] and implement [`Serializer::scalar`]
/// for their direction (reading, writing, dumping, introspecting); the
/// tree-walk operations are provided on top of the shared state. Schemas
/// are generic over this trait, so one schema definition drives every
/// backend through static dispatch.
pub trait Serializer {
    fn state(&self) -> &SerializerState;
    fn state_mut(&mut self) -> &mut SerializerState;

    /// Serialize one scalar through the backend.
    fn scalar<T: Scalar>(&mut self, value: &mut T);

    /// Visit a new child node.
    fn begin(&mut self, type_name: &'static str, name: &'static str, flags: Flags) {
        self.state_mut().begin(type_name, name, flags);
    }

    /// Leave the current node.
    fn end(&mut self) {
        self.state_mut().end();
    }

    /// Enter the if branch when `condition` holds for the named variable.
    fn begin_if(
        &mut self,
        var_name: &'static str,
        label: &'static str,
        condition: impl FnOnce(i32) -> bool,
    ) -> bool {
        self.state_mut().begin_if(var_name, label, condition)
    }

    /// Enter the else branch when the preceding if was not taken.
    fn begin_else(&mut self) -> bool {
        self.state_mut().begin_else()
    }

    /// Set a variable to a constant value.
    fn set_variable(&mut self, name: &'static str, value: i32) {
        self.state_mut().set_variable(name, value);
    }

    fn is_big_endian(&self) -> bool {
        self.state().is_big_endian()
    }

    fn is_errored(&self) -> bool {
        self.state().is_errored()
    }
}

/// A struct with a declarative schema.
///
/// `serialize` describes the wire layout once; the same method reads,
/// writes, dumps, or introspects depending on the backend it is handed.
pub trait Schema {
    /// Type label used for vector elements and diagnostics.
    const TYPE_NAME: &'static str;

    fn serialize<S: Serializer>(&mut self, s: &mut S);
}
