//! Tests for the two TypeTree wire dialects and string interning.

use unity_serialized_core::{BinaryReader, BinaryWriter, Schema, Serializer};
use unity_serialized_file::{GLOBAL_STRING_FLAG, TypeTree, TypeTreeNode};

fn node(
    depth: u8,
    type_index: u32,
    name_index: u32,
    byte_size: i32,
    index: i32,
) -> TypeTreeNode {
    TypeTreeNode {
        version: 1,
        depth,
        is_array: false,
        type_index,
        name_index,
        byte_size,
        index,
        meta_flag: 0,
    }
}

/// GameObject { string m_Name { Array { int size; char data } }, int m_LevelCount }
/// flattened with one name outside the global table.
fn sample_tree() -> TypeTree {
    let mut tree = TypeTree::new();
    let go = tree.intern("GameObject");
    let base = tree.intern("Base");
    let string_ty = tree.intern("string");
    let m_name = tree.intern("m_Name");
    let int_ty = tree.intern("int");
    let level = tree.intern("m_LevelCount");
    tree.nodes = vec![
        node(0, go, base, -1, 0),
        node(1, string_ty, m_name, -1, 1),
        node(1, int_ty, level, 4, 2),
    ];
    tree
}

fn encode_tree(tree: &mut TypeTree, version: i32) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.set_variable("version", version);
    tree.serialize(&mut writer);
    let (bytes, state) = writer.finish();
    assert!(!state.is_errored(), "version {version} encode failed");
    bytes
}

fn decode_tree(data: &[u8], version: i32) -> TypeTree {
    let mut reader = BinaryReader::new(data);
    reader.set_variable("version", version);
    let mut tree = TypeTree::new();
    tree.serialize(&mut reader);
    assert!(!reader.is_errored(), "version {version} decode failed");
    tree
}

#[test]
fn test_dialects_agree_on_the_same_logical_tree() {
    let mut flat_source = sample_tree();
    let flat_bytes = encode_tree(&mut flat_source, 15);

    let mut recursive_source = sample_tree();
    let recursive_bytes = encode_tree(&mut recursive_source, 11);

    let from_flat = decode_tree(&flat_bytes, 15);
    let from_recursive = decode_tree(&recursive_bytes, 11);

    assert_eq!(from_flat.nodes, sample_tree().nodes);
    assert_eq!(from_flat.nodes, from_recursive.nodes);
}

#[test]
fn test_flat_layout_is_packed() {
    // num_nodes + buffer_size, then 24 bytes per node, then the buffer.
    let mut tree = sample_tree();
    let bytes = encode_tree(&mut tree, 15);
    assert_eq!(bytes.len(), 8 + 24 * tree.nodes.len() + tree.buffer.len());
}

#[test]
fn test_flat_fixture_decodes() {
    let mut data = Vec::new();
    data.extend_from_slice(&3i32.to_le_bytes());
    data.extend_from_slice(&10i32.to_le_bytes());
    for (depth, index) in [(0u8, 0i32), (1, 1), (1, 2)] {
        data.extend_from_slice(&1u16.to_le_bytes()); // version
        data.push(depth);
        data.push(0); // is_array
        data.extend_from_slice(&GLOBAL_STRING_FLAG.to_le_bytes()); // "AABB"
        data.extend_from_slice(&0u32.to_le_bytes()); // local offset 0
        data.extend_from_slice(&16i32.to_le_bytes()); // byte_size
        data.extend_from_slice(&index.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes()); // meta_flag
    }
    data.extend_from_slice(b"m_Custom\0\0");
    assert_eq!(data.len(), 8 + 3 * 24 + 10);

    let tree = decode_tree(&data, 15);
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.buffer.len(), 10);
    assert_eq!(tree.nodes[1].depth, 1);
    assert_eq!(tree.type_name_of(&tree.nodes[0]), "AABB");
    assert_eq!(tree.field_name_of(&tree.nodes[0]), "m_Custom");
}

#[test]
fn test_recursive_roundtrip_with_nesting() {
    let mut tree = TypeTree::new();
    let go = tree.intern("GameObject");
    let base = tree.intern("Base");
    let vec_ty = tree.intern("vector");
    let comps = tree.intern("m_Component");
    let array_ty = tree.intern("Array");
    let array_name = tree.intern("Array");
    let size_ty = tree.intern("SInt32");
    let size_name = tree.intern("size");
    let enabled = tree.intern("m_Enabled");
    let bool_ty = tree.intern("bool");
    tree.nodes = vec![
        node(0, go, base, -1, 0),
        node(1, vec_ty, comps, -1, 1),
        node(2, array_ty, array_name, -1, 2),
        node(3, size_ty, size_name, 4, 3),
        node(1, bool_ty, enabled, 1, 4),
    ];

    let mut source = tree.clone();
    let bytes = encode_tree(&mut source, 9);
    let decoded = decode_tree(&bytes, 9);
    assert_eq!(decoded.nodes, tree.nodes);

    // Re-encoding the decoded tree is byte-stable.
    let mut decoded = decoded;
    assert_eq!(encode_tree(&mut decoded, 9), bytes);
}

#[test]
fn test_recursive_wire_strings_are_nul_terminated() {
    let mut tree = TypeTree::new();
    let int_ty = tree.intern("int");
    let m_name = tree.intern("m_Name");
    tree.nodes = vec![node(0, int_ty, m_name, 4, 0)];

    let bytes = encode_tree(&mut tree, 9);
    // type cstring, name cstring, five ints, child count.
    let expected = b"int\0m_Name\0".len() + 5 * 4 + 4;
    assert_eq!(bytes.len(), expected);
    assert_eq!(&bytes[..4], b"int\0");
    assert_eq!(&bytes[4..11], b"m_Name\0");
}

#[test]
fn test_truncated_flat_tree_reports_error() {
    let mut data = Vec::new();
    data.extend_from_slice(&3i32.to_le_bytes());
    data.extend_from_slice(&0i32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // lone fragment of a node

    let mut reader = BinaryReader::new(&data);
    reader.set_variable("version", 15);
    let mut tree = TypeTree::new();
    tree.serialize(&mut reader);
    assert!(reader.is_errored());
    // The partially filled vector is still there for diagnostics.
    assert_eq!(tree.node_count(), 3);
}

#[test]
fn test_local_names_survive_both_dialects() {
    let mut tree = TypeTree::new();
    let custom_ty = tree.intern("MyComponent");
    let custom_name = tree.intern("m_CustomField");
    tree.nodes = vec![node(0, custom_ty, custom_name, 12, 0)];

    for version in [9, 15] {
        let mut source = tree.clone();
        let bytes = encode_tree(&mut source, version);
        let decoded = decode_tree(&bytes, version);
        assert_eq!(
            decoded.type_name_of(&decoded.nodes[0]),
            "MyComponent",
            "version {version}"
        );
        assert_eq!(
            decoded.field_name_of(&decoded.nodes[0]),
            "m_CustomField",
            "version {version}"
        );
    }
}
