//! SerializedFile header.

use serde::{Deserialize, Serialize};
use unity_serialized_core::{Flags, Schema, Serializer, scalar_val};

use crate::error::{FormatError, Result};

/// Fixed header at the start of every SerializedFile.
///
/// Header scalars are big-endian regardless of the stream's own byte
/// order. The trailing `big_endian` flag then latches the byte order for
/// everything after it, and `version` drives every version gate in the
/// metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Size of the metadata section.
    pub metadata_size: i32,
    /// Total file size.
    pub file_size: i32,
    /// Container format version (not the Unity release version).
    pub version: i32,
    /// Offset to the raw object payload block.
    pub object_data_offset: i32,
    /// Non-zero when the rest of the stream is big-endian.
    pub big_endian: bool,
}

impl Header {
    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// Wide (8-byte, pre-aligned) path and object ids.
    pub fn has_wide_ids(&self) -> bool {
        self.version >= 14
    }

    /// The metadata carries an explicit serialize-type-trees flag.
    pub fn has_type_tree_flag(&self) -> bool {
        self.version >= 13
    }

    /// Objects reference their type by table index instead of class id.
    pub fn has_type_indices(&self) -> bool {
        self.version >= 17
    }

    /// Sanity-check a decoded header.
    pub fn validate(&self) -> Result<()> {
        if self.version <= 0 {
            return Err(FormatError::malformed(format!(
                "implausible format version {}",
                self.version
            )));
        }
        if self.metadata_size < 0 || self.file_size < 0 || self.object_data_offset < 0 {
            return Err(FormatError::malformed("negative size field in header"));
        }
        if self.file_size < self.object_data_offset {
            return Err(FormatError::malformed(
                "file size smaller than object data offset",
            ));
        }
        Ok(())
    }
}

impl Schema for Header {
    const TYPE_NAME: &'static str = "Header";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        scalar_val(s, &mut self.metadata_size, "int", "metadata_size", Flags::BIG_ENDIAN);
        scalar_val(s, &mut self.file_size, "int", "file_size", Flags::BIG_ENDIAN);
        scalar_val(
            s,
            &mut self.version,
            "int",
            "version",
            Flags::BIG_ENDIAN | Flags::VARIABLE,
        );
        scalar_val(
            s,
            &mut self.object_data_offset,
            "int",
            "object_data_offset",
            Flags::BIG_ENDIAN,
        );
        scalar_val(
            s,
            &mut self.big_endian,
            "bool",
            "big_endian",
            Flags::POST_ALIGN | Flags::BIG_ENDIAN_WHEN_TRUE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_gates() {
        let mut header = Header {
            version: 13,
            ..Header::default()
        };
        assert!(header.has_type_tree_flag());
        assert!(!header.has_wide_ids());
        assert!(!header.has_type_indices());

        header.version = 17;
        assert!(header.has_wide_ids());
        assert!(header.has_type_indices());
    }

    #[test]
    fn test_validate() {
        let header = Header {
            metadata_size: 16,
            file_size: 4096,
            version: 17,
            object_data_offset: 128,
            big_endian: false,
        };
        assert!(header.validate().is_ok());

        let bad = Header {
            version: 0,
            ..header
        };
        assert!(bad.validate().is_err());

        let bad = Header {
            file_size: 64,
            object_data_offset: 128,
            ..header
        };
        assert!(bad.validate().is_err());
    }
}
