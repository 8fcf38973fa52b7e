//! Scoped schema helpers.
//!
//! These wrap `begin`/`end` pairs so schema code reads declaratively and
//! the scopes balance on every path.

use std::mem;

use crate::flags::Flags;
use crate::scalar::Scalar;
use crate::ser::{Schema, Serializer};

/// Serialize one scalar field in its own scope.
pub fn scalar_val<S: Serializer, T: Scalar>(
    s: &mut S,
    value: &mut T,
    type_name: &'static str,
    name: &'static str,
    flags: Flags,
) {
    s.begin(type_name, name, flags);
    s.scalar(value);
    s.end();
}

/// Serialize a nested struct field in its own scope.
pub fn struct_val<S: Serializer, T: Schema>(
    s: &mut S,
    value: &mut T,
    name: &'static str,
    flags: Flags,
) {
    s.begin(T::TYPE_NAME, name, flags);
    value.serialize(s);
    s.end();
}

/// Open an array scope, serialize its length, and hand the element count
/// to `body`. The scope closes on all paths; a negative decoded length
/// marks the state errored and yields a zero count.
pub fn array_scope<S: Serializer>(s: &mut S, len: &mut i32, body: impl FnOnce(&mut S, usize)) {
    s.begin("Array", "Array", Flags::ARRAY);
    scalar_val(s, len, "int", "size", Flags::empty());
    if *len < 0 {
        s.state_mut().mark_errored();
        *len = 0;
    }
    body(s, *len as usize);
    s.end();
}

/// Serialize a vector of schema structs, resizing on read.
pub fn vec_val<S: Serializer, T: Schema + Default>(
    s: &mut S,
    items: &mut Vec<T>,
    name: &'static str,
    flags: Flags,
) {
    s.begin("vector", name, flags);
    let mut len = items.len() as i32;
    array_scope(s, &mut len, |s, count| {
        items.resize_with(count, T::default);
        for item in items.iter_mut() {
            if s.is_errored() {
                break;
            }
            s.begin(T::TYPE_NAME, "data", Flags::empty());
            item.serialize(s);
            s.end();
        }
    });
    s.end();
}

/// Serialize a string field.
///
/// Strings are modeled as `string { Array { size, data.. } }`. With
/// [`Flags::C_STRING`] the backends replace that length-prefixed layout
/// with a NUL-terminated byte run on the wire.
pub fn string_val<S: Serializer>(s: &mut S, value: &mut String, name: &'static str, flags: Flags) {
    s.begin("string", name, flags);
    let mut bytes = mem::take(value).into_bytes();
    let mut len = bytes.len() as i32;
    array_scope(s, &mut len, |s, count| {
        bytes.resize(count, 0);
        for byte in &mut bytes {
            if s.is_errored() {
                break;
            }
            scalar_val(s, byte, "char", "data", Flags::empty());
        }
    });
    *value = String::from_utf8_lossy(&bytes).into_owned();
    s.end();
}

/// Serialize `then_body` only when `condition` holds for the named
/// variable.
pub fn if_cond<S: Serializer>(
    s: &mut S,
    var_name: &'static str,
    label: &'static str,
    condition: impl FnOnce(i32) -> bool,
    then_body: impl FnOnce(&mut S),
) {
    if s.begin_if(var_name, label, condition) {
        then_body(s);
        s.end();
    }
}

/// Serialize `else_body` when the preceding [`if_cond`] (or `begin_if`)
/// did not take its branch.
pub fn else_cond<S: Serializer>(s: &mut S, else_body: impl FnOnce(&mut S)) {
    if s.begin_else() {
        else_body(s);
        s.end();
    }
}
