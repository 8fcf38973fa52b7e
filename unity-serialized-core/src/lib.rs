//! Declarative versioned binary serialization.
//!
//! A wire format is described once, as a tree of typed, named, flagged
//! scopes, and the same description then drives every backend: the
//! [`BinaryReader`] decodes, the [`BinaryWriter`] encodes, the
//! [`TextDumper`] renders, and the [`SchemaIntrospector`] reflects.
//!
//! The engine was built for Unity's SerializedFile container, whose
//! layout changes with a version number read from its own header and
//! whose byte order flips mid-stream: node flags cover per-scalar
//! endianness, an endianness latch, variable capture for version gates,
//! conditional scopes, NUL-terminated strings, forced 4-byte wire widths,
//! and 4-byte alignment.
//!
//! # Example
//!
//! ```rust
//! use unity_serialized_core::{
//!     scalar_val, BinaryReader, BinaryWriter, Flags, Schema, Serializer,
//! };
//!
//! #[derive(Default)]
//! struct Extent {
//!     width: i32,
//!     height: i32,
//! }
//!
//! impl Schema for Extent {
//!     const TYPE_NAME: &'static str = "Extent";
//!
//!     fn serialize<S: Serializer>(&mut self, s: &mut S) {
//!         scalar_val(s, &mut self.width, "int", "width", Flags::empty());
//!         scalar_val(s, &mut self.height, "int", "height", Flags::empty());
//!     }
//! }
//!
//! let mut extent = Extent { width: 640, height: 480 };
//! let mut writer = BinaryWriter::new();
//! extent.serialize(&mut writer);
//! let (bytes, _) = writer.finish();
//!
//! let mut decoded = Extent::default();
//! let mut reader = BinaryReader::new(&bytes);
//! decoded.serialize(&mut reader);
//! assert_eq!(decoded.width, 640);
//! assert_eq!(decoded.height, 480);
//! assert!(!reader.is_errored());
//! ```

pub mod byteswap;
pub mod flags;
pub mod introspect;
pub mod node;
pub mod reader;
pub mod scalar;
pub mod schema;
pub mod ser;
pub mod state;
pub mod text;
pub mod writer;

pub use byteswap::byte_swap;
pub use flags::Flags;
pub use introspect::{FieldInfo, SchemaIntrospector};
pub use node::{ARRAY_SENTINEL, SerializerNode};
pub use reader::BinaryReader;
pub use scalar::{SCRATCH_LEN, Scalar, ScalarKind};
pub use schema::{array_scope, else_cond, if_cond, scalar_val, string_val, struct_val, vec_val};
pub use ser::{Schema, Serializer};
pub use state::SerializerState;
pub use text::TextDumper;
pub use writer::BinaryWriter;
