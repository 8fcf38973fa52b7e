//! Top-level SerializedFile container.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use unity_serialized_core::{
    BinaryReader, BinaryWriter, FieldInfo, Flags, Schema, SchemaIntrospector, Serializer,
    TextDumper, struct_val,
};

use crate::error::{FormatError, Result};
use crate::header::Header;
use crate::metadata::Metadata;

/// Sticky outcome flags from a lenient decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStatus {
    /// Something in the stream did not decode cleanly; the returned value
    /// is partially filled.
    pub errored: bool,
    /// The stream ended early.
    pub eof: bool,
    /// Whether the endianness latch was set, i.e. the body after the
    /// header was big-endian.
    pub big_endian: bool,
}

impl DecodeStatus {
    pub fn is_clean(&self) -> bool {
        !self.errored
    }
}

/// A decoded SerializedFile: header plus metadata. The raw object payload
/// block that follows the metadata on disk is not part of the container
/// schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedFile {
    pub header: Header,
    pub metadata: Metadata,
}

impl Schema for SerializedFile {
    const TYPE_NAME: &'static str = "SerializedFile";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        struct_val(s, &mut self.header, "header", Flags::empty());
        struct_val(s, &mut self.metadata, "metadata", Flags::empty());
    }
}

impl SerializedFile {
    /// Decode a SerializedFile, returning the (possibly partial) value
    /// together with the sticky outcome flags. A truncated or malformed
    /// stream still yields whatever decoded before the failure.
    pub fn decode(data: &[u8]) -> (Self, DecodeStatus) {
        debug!(len = data.len(), "decoding SerializedFile");
        let mut file = Self::default();
        let mut reader = BinaryReader::new(data);
        Schema::serialize(&mut file, &mut reader);
        let state = reader.into_state();
        let status = DecodeStatus {
            errored: state.is_errored(),
            eof: state.is_eof(),
            big_endian: state.big_endian_latched(),
        };
        if status.errored {
            warn!(eof = status.eof, "SerializedFile did not decode cleanly");
        } else {
            debug!(
                version = file.header.version,
                types = file.metadata.types.len(),
                objects = file.metadata.objects.len(),
                "decoded SerializedFile"
            );
        }
        (file, status)
    }

    /// Decode, failing on any sticky error.
    pub fn decode_strict(data: &[u8]) -> Result<Self> {
        let (file, status) = Self::decode(data);
        if status.eof {
            return Err(FormatError::UnexpectedEof);
        }
        if status.errored {
            return Err(FormatError::malformed("stream did not match the schema"));
        }
        Ok(file)
    }

    /// Encode back to bytes. Alignment padding is zeroed, so a file
    /// decoded from well-formed input re-encodes byte-for-byte.
    pub fn encode(&mut self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        Schema::serialize(self, &mut writer);
        let (bytes, state) = writer.finish();
        if state.is_errored() {
            return Err(FormatError::malformed("value did not match the schema"));
        }
        debug!(len = bytes.len(), "encoded SerializedFile");
        Ok(bytes)
    }

    /// Render every field this value serializes as indented text.
    pub fn dump_text(&mut self) -> String {
        let mut dumper = TextDumper::new();
        Schema::serialize(self, &mut dumper);
        dumper.into_text()
    }

    /// The field layout selected by this value's version gates.
    pub fn describe_schema(&mut self) -> Vec<FieldInfo> {
        let mut introspector = SchemaIntrospector::new();
        Schema::serialize(self, &mut introspector);
        introspector.into_fields()
    }
}

/// Read and decode a file from disk (lenient).
pub fn decode_file(path: impl AsRef<Path>) -> Result<(SerializedFile, DecodeStatus)> {
    let data = std::fs::read(path)?;
    Ok(SerializedFile::decode(&data))
}
