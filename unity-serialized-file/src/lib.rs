//! Unity SerializedFile container codec.
//!
//! This crate decodes and re-encodes the binary container format Unity
//! builds use for serialized assets (`globalgamemanagers`, `*.assets`):
//! a header, metadata describing the contained types and objects
//! (including embedded type trees), and a raw object payload block. One
//! declarative schema, written against the engine in
//! `unity-serialized-core`, handles container versions from roughly 5
//! through 17+, including the mid-stream endianness switch and the two
//! type tree wire dialects.
//!
//! Only the container metadata is in scope; decoding per-class object
//! payloads is not.
//!
//! # Example
//!
//! ```rust,no_run
//! use unity_serialized_file::SerializedFile;
//!
//! let data = std::fs::read("globalgamemanagers")?;
//! let (file, status) = SerializedFile::decode(&data);
//! println!("version {}", file.header.version);
//! println!("num types: {}", file.metadata.types.len());
//! if status.errored {
//!     eprintln!("file did not decode cleanly");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod file;
pub mod header;
pub mod metadata;
pub mod strings;
pub mod types;
pub mod typetree;

pub use error::{FormatError, Result};
pub use file::{DecodeStatus, SerializedFile, decode_file};
pub use header::Header;
pub use metadata::Metadata;
pub use strings::{COMMON_STRINGS, GLOBAL_STRING_FLAG};
pub use types::{FileReference, Hash, ObjectInfo, ObjectPtr, TypeMetadata};
pub use typetree::{TypeTree, TypeTreeNode};
