//! The process-wide table of well-known Unity type and field names.
//!
//! Type tree nodes reference their type and field names through a split
//! 32-bit index: when the top bit is set, the low 31 bits are a byte
//! offset into this immutable global table; when clear, they are an
//! offset into the tree's own local buffer. Offsets always point at the
//! first byte of a NUL-terminated run.

use once_cell::sync::Lazy;

/// Index bit selecting the global table.
pub const GLOBAL_STRING_FLAG: u32 = 0x8000_0000;

/// NUL-separated concatenation of the names Unity itself interns.
///
/// This is a verbatim copy of the upstream table; the byte offsets must
/// match Unity's own for re-serialized files to compare byte-for-byte.
pub const COMMON_STRINGS: &str = "AABB\0AnimationClip\0AnimationCurve\0AnimationState\0Array\0Base\0BitField\0bitset\0bool\0char\0\
ColorRGBA\0Component\0data\0deque\0double\0dynamic_array\0FastPropertyName\0first\0float\0Font\0\
GameObject\0Generic Mono\0GradientNEW\0GUID\0GUIStyle\0int\0list\0long long\0map\0Matrix4x4f\0\
MdFour\0MonoBehaviour\0MonoScript\0m_ByteSize\0m_Curve\0m_EditorClassIdentifier\0m_EditorHideFlags\0\
m_Enabled\0m_ExtensionPtr\0m_GameObject\0m_Index\0m_IsArray\0m_IsStatic\0m_MetaFlag\0m_Name\0\
m_ObjectHideFlags\0m_PrefabInternal\0m_PrefabParentObject\0m_Script\0m_StaticEditorFlags\0m_Type\0\
m_Version\0Object\0pair\0PPtr<Component>\0PPtr<GameObject>\0PPtr<Material>\0PPtr<MonoBehaviour>\0\
PPtr<MonoScript>\0PPtr<Object>\0PPtr<Prefab>\0PPtr<Sprite>\0PPtr<TextAsset>\0PPtr<Texture>\0\
PPtr<Texture2D>\0PPtr<Transform>\0Prefab\0Quaternionf\0Rectf\0RectInt\0RectOffset\0second\0set\0\
short\0size\0SInt16\0SInt32\0SInt64\0SInt8\0staticvector\0string\0TextAsset\0TextMesh\0Texture\0\
Texture2D\0Transform\0TypelessData\0UInt16\0UInt32\0UInt64\0UInt8\0unsigned int\0unsigned long long\0\
unsigned short\0vector\0Vector2f\0Vector3f\0Vector4f\0m_ScriptingClassIdentifier\0Gradient\0";

static COMMON_INDEX: Lazy<Vec<(u32, &'static str)>> = Lazy::new(|| {
    let mut entries = Vec::new();
    let mut offset = 0u32;
    for entry in COMMON_STRINGS.split_terminator('\0') {
        entries.push((offset, entry));
        offset += entry.len() as u32 + 1;
    }
    entries
});

/// Resolve a byte offset into the global table, up to the next NUL.
pub fn global_string(offset: u32) -> Option<&'static str> {
    let start = offset as usize;
    if start >= COMMON_STRINGS.len() {
        return None;
    }
    let rest = &COMMON_STRINGS[start..];
    Some(rest.split('\0').next().unwrap_or(rest))
}

/// Find a name in the global table, returning its flagged index.
pub fn find_global(name: &str) -> Option<u32> {
    COMMON_INDEX
        .iter()
        .find(|(_, entry)| *entry == name)
        .map(|(offset, _)| GLOBAL_STRING_FLAG | offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entry() {
        assert_eq!(global_string(0), Some("AABB"));
        assert_eq!(find_global("AABB"), Some(GLOBAL_STRING_FLAG));
    }

    #[test]
    fn test_lookup_roundtrip() {
        for name in ["Array", "int", "m_Name", "vector", "Gradient"] {
            let index = find_global(name).unwrap_or_else(|| panic!("{name} must be interned"));
            assert!(index & GLOBAL_STRING_FLAG != 0);
            assert_eq!(global_string(index & !GLOBAL_STRING_FLAG), Some(name));
        }
    }

    #[test]
    fn test_unknown_name_misses() {
        assert_eq!(find_global("m_DefinitelyNotAUnityField"), None);
    }

    #[test]
    fn test_out_of_range_offset() {
        assert_eq!(global_string(u32::MAX & !GLOBAL_STRING_FLAG), None);
    }
}
