//! SerializedFile metadata: everything between the header and the raw
//! object payload block.

use serde::{Deserialize, Serialize};
use unity_serialized_core::{
    Flags, Schema, Serializer, else_cond, if_cond, scalar_val, string_val, vec_val,
};

use crate::types::{FileReference, ObjectInfo, ObjectPtr, TypeMetadata};

/// Generator version, platform, type table, object table, add table, and
/// external references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unity release that produced the file, e.g. `5.6.1f1`.
    pub generator_version: String,
    pub platform: i32,
    /// Whether type records embed their type trees. Not stored before
    /// v13; those files always embed.
    pub serialize_type_trees: bool,
    pub types: Vec<TypeMetadata>,
    /// Only present for 7 <= version <= 13.
    pub unk0: i32,
    pub objects: Vec<ObjectInfo>,
    /// Preload/add table, v11+.
    pub adds: Vec<ObjectPtr>,
    pub external_files: Vec<FileReference>,
    /// Trailing string, v5+.
    pub unk1: String,
}

impl Schema for Metadata {
    const TYPE_NAME: &'static str = "Metadata";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        string_val(
            s,
            &mut self.generator_version,
            "generator_version",
            Flags::C_STRING,
        );
        scalar_val(s, &mut self.platform, "int", "platform", Flags::empty());
        if_cond(s, "version", "version >= 13", |v| v >= 13, |s| {
            scalar_val(
                s,
                &mut self.serialize_type_trees,
                "bool",
                "serialize_type_trees",
                Flags::VARIABLE,
            );
        });
        else_cond(s, |s| {
            // Older files always embed their trees.
            self.serialize_type_trees = true;
            s.set_variable("serialize_type_trees", 1);
        });
        vec_val(s, &mut self.types, "types", Flags::empty());
        if_cond(
            s,
            "version",
            "7 <= version && version <= 13",
            |v| (7..=13).contains(&v),
            |s| {
                scalar_val(s, &mut self.unk0, "int", "unk0", Flags::empty());
            },
        );
        vec_val(s, &mut self.objects, "objects", Flags::empty());
        if_cond(s, "version", "version >= 11", |v| v >= 11, |s| {
            vec_val(s, &mut self.adds, "adds", Flags::empty());
        });
        vec_val(s, &mut self.external_files, "external_files", Flags::empty());
        if_cond(s, "version", "version >= 5", |v| v >= 5, |s| {
            string_val(s, &mut self.unk1, "unk1", Flags::C_STRING);
        });
    }
}
