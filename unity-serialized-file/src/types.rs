//! Metadata record types: hashes, type records, object tables, and file
//! references.

use serde::{Deserialize, Serialize};
use unity_serialized_core::{
    Flags, Schema, Serializer, else_cond, if_cond, scalar_val, string_val, struct_val,
};

use crate::typetree::TypeTree;

/// 16-byte hash stored as four 32-bit words in stream byte order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hash {
    pub words: [u32; 4],
}

impl Hash {
    pub fn is_zero(&self) -> bool {
        self.words == [0; 4]
    }
}

impl Schema for Hash {
    const TYPE_NAME: &'static str = "Hash";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        scalar_val(s, &mut self.words[0], "UInt32", "hash[0]", Flags::empty());
        scalar_val(s, &mut self.words[1], "UInt32", "hash[1]", Flags::empty());
        scalar_val(s, &mut self.words[2], "UInt32", "hash[2]", Flags::empty());
        scalar_val(s, &mut self.words[3], "UInt32", "hash[3]", Flags::empty());
    }
}

/// Per-type record: class identity, optional script/type hashes, and an
/// optional embedded type tree.
///
/// Version 17 moved the class id and script id here from the object
/// table; older files carry a single signed class id (negative for
/// script types).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    /// Pre-v17 class id; negative values denote script types.
    pub old_class_id: i32,
    /// v17+ class id (114 is MonoBehaviour).
    pub class_id: i32,
    pub unk0: u8,
    pub script_id: i16,
    pub script_hash: Hash,
    pub type_hash: Hash,
    pub tree: TypeTree,
}

impl Schema for TypeMetadata {
    const TYPE_NAME: &'static str = "TypeMetadata";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        if_cond(s, "version", "version >= 17", |v| v >= 17, |s| {
            s.set_variable("old_class_id", 0);
            scalar_val(s, &mut self.class_id, "int", "class_id", Flags::VARIABLE);
            scalar_val(s, &mut self.unk0, "UInt8", "unk0", Flags::empty());
            scalar_val(s, &mut self.script_id, "SInt16", "script_id", Flags::empty());
        });
        else_cond(s, |s| {
            scalar_val(
                s,
                &mut self.old_class_id,
                "int",
                "old_class_id",
                Flags::VARIABLE,
            );
            s.set_variable("class_id", 0);
        });
        if_cond(s, "version", "version >= 13", |v| v >= 13, |s| {
            if_cond(s, "old_class_id", "old_class_id < 0", |v| v < 0, |s| {
                struct_val(s, &mut self.script_hash, "script_hash", Flags::empty());
            });
            if_cond(s, "class_id", "class_id == 114", |v| v == 114, |s| {
                struct_val(s, &mut self.script_hash, "script_hash", Flags::empty());
            });
            struct_val(s, &mut self.type_hash, "type_hash", Flags::empty());
        });
        if_cond(
            s,
            "serialize_type_trees",
            "serialize_type_trees != 0",
            |v| v != 0,
            |s| {
                struct_val(s, &mut self.tree, "tree", Flags::empty());
            },
        );
    }
}

/// Entry of the object table: where an object's payload lives and what
/// type it has.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub object_id: u64,
    /// Offset of the payload, relative to the header's object data
    /// offset.
    pub data_offset: i32,
    pub data_size: i32,
    /// Pre-v17 type id.
    pub type_id: i32,
    /// Pre-v17 class id.
    pub class_id: i16,
    /// v17+ index into the metadata's type table.
    pub type_index: i32,
    pub script_id: i16,
    pub unk0: u8,
}

impl Schema for ObjectInfo {
    const TYPE_NAME: &'static str = "ObjectInfo";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        if_cond(s, "version", "version >= 14", |v| v >= 14, |s| {
            scalar_val(s, &mut self.object_id, "UInt64", "object_id", Flags::PRE_ALIGN);
        });
        else_cond(s, |s| {
            scalar_val(
                s,
                &mut self.object_id,
                "UInt32",
                "object_id",
                Flags::VALUE_IS_32_BIT,
            );
        });
        scalar_val(s, &mut self.data_offset, "int", "data_offset", Flags::empty());
        scalar_val(s, &mut self.data_size, "int", "data_size", Flags::empty());
        if_cond(s, "version", "version >= 17", |v| v >= 17, |s| {
            scalar_val(s, &mut self.type_index, "int", "type_index", Flags::empty());
        });
        else_cond(s, |s| {
            scalar_val(s, &mut self.type_id, "int", "type_id", Flags::empty());
            scalar_val(s, &mut self.class_id, "SInt16", "class_id", Flags::empty());
        });
        if_cond(s, "version", "version <= 16", |v| v <= 16, |s| {
            scalar_val(s, &mut self.script_id, "SInt16", "script_id", Flags::empty());
        });
        if_cond(
            s,
            "version",
            "15 <= version && version <= 16",
            |v| (15..=16).contains(&v),
            |s| {
                scalar_val(s, &mut self.unk0, "UInt8", "unk0", Flags::empty());
            },
        );
    }
}

/// Reference to an object in this or another file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPtr {
    pub file_id: i32,
    pub path_id: u64,
}

impl Schema for ObjectPtr {
    const TYPE_NAME: &'static str = "ObjectPtr";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        scalar_val(s, &mut self.file_id, "int", "file_id", Flags::empty());
        if_cond(s, "version", "version >= 14", |v| v >= 14, |s| {
            scalar_val(s, &mut self.path_id, "UInt64", "path_id", Flags::PRE_ALIGN);
        });
        else_cond(s, |s| {
            scalar_val(
                s,
                &mut self.path_id,
                "UInt32",
                "path_id",
                Flags::VALUE_IS_32_BIT,
            );
        });
    }
}

/// Reference to an external asset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub asset_name: String,
    pub guid: Hash,
    /// Reference kind (serialized as `type`).
    pub kind: i32,
    pub file_name: String,
}

impl Schema for FileReference {
    const TYPE_NAME: &'static str = "FileReference";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        if_cond(s, "version", "version >= 6", |v| v >= 6, |s| {
            string_val(s, &mut self.asset_name, "asset_name", Flags::C_STRING);
        });
        if_cond(s, "version", "version >= 5", |v| v >= 5, |s| {
            struct_val(s, &mut self.guid, "guid", Flags::empty());
            scalar_val(s, &mut self.kind, "int", "type", Flags::empty());
        });
        string_val(s, &mut self.file_name, "file_name", Flags::C_STRING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unity_serialized_core::{BinaryReader, BinaryWriter};

    #[test]
    fn test_object_ptr_narrow_then_wide() {
        let mut writer = BinaryWriter::new();
        writer.set_variable("version", 13);
        let mut ptr = ObjectPtr {
            file_id: 2,
            path_id: 77,
        };
        Schema::serialize(&mut ptr, &mut writer);
        let (bytes, _) = writer.finish();
        // 4-byte file id plus 4-byte narrowed path id.
        assert_eq!(bytes.len(), 8);

        let mut reader = BinaryReader::new(&bytes);
        reader.set_variable("version", 13);
        let mut decoded = ObjectPtr::default();
        Schema::serialize(&mut decoded, &mut reader);
        assert_eq!(decoded, ptr);
    }

    #[test]
    fn test_hash_is_zero() {
        let mut hash = Hash::default();
        assert!(hash.is_zero());
        hash.words[2] = 9;
        assert!(!hash.is_zero());
    }
}
