//! Type trees: per-type layout descriptions embedded in a SerializedFile.
//!
//! Two wire encodings exist. Versions 10 and 12+ store a flat vector of
//! fixed-size node records followed by a local string buffer ("flat"
//! dialect); every other version stores each node inline, depth-first,
//! with its child count ("recursive" dialect). Both decode into the same
//! flat `nodes` vector, with each node's depth carrying the tree shape.

use serde::{Deserialize, Serialize};
use unity_serialized_core::{
    Flags, Schema, Serializer, else_cond, if_cond, scalar_val, string_val, struct_val,
};

use crate::strings::{self, GLOBAL_STRING_FLAG};

/// One node record of a type tree.
///
/// `type_index` and `name_index` use the split string-index convention:
/// top bit set means the global table, clear means this tree's local
/// buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTreeNode {
    pub version: u16,
    pub depth: u8,
    pub is_array: bool,
    pub type_index: u32,
    pub name_index: u32,
    pub byte_size: i32,
    pub index: i32,
    pub meta_flag: u32,
}

impl Schema for TypeTreeNode {
    const TYPE_NAME: &'static str = "TypeTreeNode";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        scalar_val(s, &mut self.version, "UInt16", "version", Flags::empty());
        scalar_val(s, &mut self.depth, "UInt8", "depth", Flags::empty());
        scalar_val(s, &mut self.is_array, "bool", "is_array", Flags::empty());
        scalar_val(s, &mut self.type_index, "UInt32", "type", Flags::empty());
        scalar_val(s, &mut self.name_index, "UInt32", "name", Flags::empty());
        scalar_val(s, &mut self.byte_size, "int", "byte_size", Flags::empty());
        scalar_val(s, &mut self.index, "int", "index", Flags::empty());
        scalar_val(s, &mut self.meta_flag, "UInt32", "meta_flag", Flags::empty());
    }
}

/// A complete type tree: flat node vector plus the local extension buffer
/// for names missing from the global table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTree {
    pub nodes: Vec<TypeTreeNode>,
    /// NUL-separated local names referenced by indices without the top
    /// bit.
    pub buffer: Vec<u8>,
}

impl TypeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve a split string index against the global table or the local
    /// buffer. Unknown offsets resolve to the empty string.
    pub fn get_string(&self, index: u32) -> &str {
        if index & GLOBAL_STRING_FLAG != 0 {
            return strings::global_string(index & !GLOBAL_STRING_FLAG).unwrap_or("");
        }
        let start = index as usize;
        if start >= self.buffer.len() {
            return "";
        }
        let end = self.buffer[start..]
            .iter()
            .position(|&b| b == 0)
            .map_or(self.buffer.len(), |pos| start + pos);
        std::str::from_utf8(&self.buffer[start..end]).unwrap_or("")
    }

    /// Find or intern a name, preferring the global table, then existing
    /// local entries, then appending to the local buffer.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(index) = strings::find_global(name) {
            return index;
        }
        let mut i = 0;
        while i < self.buffer.len() {
            let end = self.buffer[i..]
                .iter()
                .position(|&b| b == 0)
                .map_or(self.buffer.len(), |pos| i + pos);
            if &self.buffer[i..end] == name.as_bytes() {
                return i as u32;
            }
            i = end + 1;
        }
        let offset = self.buffer.len() as u32;
        self.buffer.extend_from_slice(name.as_bytes());
        self.buffer.push(0);
        offset
    }

    pub fn type_name_of(&self, node: &TypeTreeNode) -> &str {
        self.get_string(node.type_index)
    }

    pub fn field_name_of(&self, node: &TypeTreeNode) -> &str {
        self.get_string(node.name_index)
    }

    /// Flat dialect: node count, buffer size, packed node records, raw
    /// buffer bytes.
    fn serialize_flat<S: Serializer>(&mut self, s: &mut S) {
        let mut num_nodes = self.nodes.len() as i32;
        scalar_val(s, &mut num_nodes, "int", "num_nodes", Flags::empty());
        let mut buffer_size = self.buffer.len() as i32;
        scalar_val(s, &mut buffer_size, "int", "buffer_size", Flags::empty());
        if num_nodes < 0 || buffer_size < 0 {
            s.state_mut().mark_errored();
            return;
        }
        self.nodes
            .resize_with(num_nodes as usize, TypeTreeNode::default);
        self.buffer.resize(buffer_size as usize, 0);

        s.begin("Array", "Array", Flags::ARRAY);
        for node in &mut self.nodes {
            if s.is_errored() {
                break;
            }
            struct_val(s, node, "data", Flags::empty());
        }
        s.end();

        s.begin("Array", "Array", Flags::ARRAY);
        for byte in &mut self.buffer {
            if s.is_errored() {
                break;
            }
            scalar_val(s, byte, "char", "data", Flags::empty());
        }
        s.end();
    }

    /// Recursive dialect: the node count is not stored up front. A single
    /// root is assumed and the flat vector grows as child counts are
    /// discovered.
    fn serialize_recursive<S: Serializer>(&mut self, s: &mut S) {
        if self.nodes.is_empty() {
            self.nodes.push(TypeTreeNode::default());
        }
        let mut index = 0;
        let mut known = 1;
        self.serialize_recursive_node(s, &mut index, 0, &mut known);
    }

    fn serialize_recursive_node<S: Serializer>(
        &mut self,
        s: &mut S,
        index: &mut usize,
        depth: u8,
        known: &mut usize,
    ) {
        if depth == u8::MAX {
            // Deeper than any real tree; the stream is garbage.
            s.state_mut().mark_errored();
            return;
        }
        s.begin(TypeTreeNode::TYPE_NAME, "node", Flags::empty());

        let i = *index;
        let mut type_name = self.get_string(self.nodes[i].type_index).to_owned();
        let mut field_name = self.get_string(self.nodes[i].name_index).to_owned();
        string_val(s, &mut type_name, "type", Flags::C_STRING);
        string_val(s, &mut field_name, "name", Flags::C_STRING);
        self.nodes[i].type_index = self.intern(&type_name);
        self.nodes[i].name_index = self.intern(&field_name);

        scalar_val(s, &mut self.nodes[i].byte_size, "int", "byte_size", Flags::empty());
        scalar_val(s, &mut self.nodes[i].index, "int", "index", Flags::empty());
        let mut is_array = i32::from(self.nodes[i].is_array);
        scalar_val(s, &mut is_array, "int", "is_array", Flags::empty());
        self.nodes[i].is_array = is_array != 0;
        let mut version = i32::from(self.nodes[i].version);
        scalar_val(s, &mut version, "int", "version", Flags::empty());
        self.nodes[i].version = version as u16;
        scalar_val(s, &mut self.nodes[i].meta_flag, "UInt32", "meta_flag", Flags::empty());
        // The wire carries no depth; recursion supplies it.
        self.nodes[i].depth = depth;

        // On write the count comes from counting consecutive successors
        // one level deeper; on read it is overwritten from the stream.
        let mut num_children: i32 = 0;
        for j in (i + 1)..self.nodes.len() {
            let d = self.nodes[j].depth;
            if d <= depth {
                break;
            }
            if d == depth + 1 {
                num_children += 1;
            }
        }

        s.begin("Array", "Array", Flags::ARRAY);
        scalar_val(
            s,
            &mut num_children,
            "int",
            "num_children",
            Flags::TREE_NODE_CHILD_COUNT,
        );
        if num_children < 0 {
            s.state_mut().mark_errored();
            num_children = 0;
        }
        *known += num_children as usize;
        if *known > self.nodes.len() {
            self.nodes.resize_with(*known, TypeTreeNode::default);
        }
        for _ in 0..num_children {
            if s.is_errored() {
                break;
            }
            *index += 1;
            self.serialize_recursive_node(s, index, depth + 1, known);
        }
        s.end();

        s.end();
    }
}

impl Schema for TypeTree {
    const TYPE_NAME: &'static str = "TypeTree";

    fn serialize<S: Serializer>(&mut self, s: &mut S) {
        // The flat layout appeared in 10, disappeared in 11, and returned
        // for good in 12.
        if_cond(
            s,
            "version",
            "version == 10 || version >= 12",
            |v| v == 10 || v >= 12,
            |s| self.serialize_flat(s),
        );
        else_cond(s, |s| self.serialize_recursive(s));
    }
}
