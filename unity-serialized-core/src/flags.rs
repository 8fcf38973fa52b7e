//! Node flags for the serializer tree.

use bitflags::bitflags;

bitflags! {
    /// Behavior flags carried by a node on the visit stack.
    ///
    /// Flags are set by the schema when a scope is opened and interpreted
    /// by the shared state machine and by the individual backends.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u32 {
        /// This scalar always serializes big-endian, regardless of the
        /// stream's endianness latch.
        const BIG_ENDIAN = 0x1;
        /// Capture this integral scalar into the variables map under the
        /// node's field name when the scope closes. Conditional schema
        /// logic (version gates) reads from that map.
        const VARIABLE = 0x2;
        /// If the captured bytes are non-zero, latch the stream's
        /// endianness to big-endian for the rest of the serialize call.
        const BIG_ENDIAN_WHEN_TRUE = 0x4;
        /// The enclosed string serializes as a NUL-terminated byte run
        /// instead of a length-prefixed array of char.
        const C_STRING = 0x8;
        /// This node is an array root; scalar sizes below it do not
        /// aggregate into enclosing scopes.
        const ARRAY = 0x10;
        /// This node hosts the taken branch of a conditional.
        const CONDITIONAL_IF = 0x20;
        /// This node hosts the untaken-side branch of a conditional.
        const CONDITIONAL_ELSE = 0x40;
        /// Serialize exactly 4 bytes on the wire even when the field's
        /// logical width is larger.
        const VALUE_IS_32_BIT = 0x80;
        /// Informational marker on a type tree child count, for
        /// introspection backends.
        const TREE_NODE_CHILD_COUNT = 0x100;
        /// Advance the stream to the next 4-byte boundary before this
        /// scalar.
        const PRE_ALIGN = 0x2000;
        /// Advance the stream to the next 4-byte boundary after this
        /// scalar.
        const POST_ALIGN = 0x4000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_values() {
        assert_eq!(Flags::BIG_ENDIAN.bits(), 0x1);
        assert_eq!(Flags::VARIABLE.bits(), 0x2);
        assert_eq!(Flags::BIG_ENDIAN_WHEN_TRUE.bits(), 0x4);
        assert_eq!(Flags::C_STRING.bits(), 0x8);
        assert_eq!(Flags::ARRAY.bits(), 0x10);
        assert_eq!(Flags::VALUE_IS_32_BIT.bits(), 0x80);
        assert_eq!(Flags::PRE_ALIGN.bits(), 0x2000);
        assert_eq!(Flags::POST_ALIGN.bits(), 0x4000);
    }

    #[test]
    fn test_flag_combination() {
        let flags = Flags::BIG_ENDIAN | Flags::VARIABLE;
        assert!(flags.contains(Flags::BIG_ENDIAN));
        assert!(flags.contains(Flags::VARIABLE));
        assert!(!flags.contains(Flags::ARRAY));
    }
}
