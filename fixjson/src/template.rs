// SPDX-License-Identifier: Apache-2.0

//! Template types: the caller-declared, immutable description of the
//! expected shape of a document, sufficient to direct the parser's writes.

use core::cell::Cell;

use crate::target::{Dest, StrDest};

/// One name→integer pair of an enumerated-value map.
#[derive(Debug, Clone, Copy)]
pub struct JsonEnum<'a> {
    pub name: &'a str,
    pub value: i32,
}

/// One attribute of an object template.
///
/// Several consecutive entries may share a name but differ in kind; the
/// syntactic kind of the incoming value then selects which entry applies.
#[derive(Debug, Clone, Copy)]
pub struct JsonAttr<'a> {
    /// Attribute name as it appears in the input.
    pub attribute: &'a str,
    /// Kind, destination and default, keyed together.
    pub spec: AttrSpec<'a>,
    /// Suppress default priming for this entry.
    pub nodefault: bool,
}

impl<'a> JsonAttr<'a> {
    /// Entry with default priming enabled.
    pub const fn new(attribute: &'a str, spec: AttrSpec<'a>) -> Self {
        JsonAttr {
            attribute,
            spec,
            nodefault: false,
        }
    }

    /// Entry whose destination is left untouched when the attribute is
    /// absent from the input.
    pub const fn without_default(attribute: &'a str, spec: AttrSpec<'a>) -> Self {
        JsonAttr {
            attribute,
            spec,
            nodefault: true,
        }
    }
}

/// Kind of an attribute together with the storage shape that kind needs.
#[derive(Debug, Clone, Copy)]
pub enum AttrSpec<'a> {
    /// Signed machine integer. An attached enum map requires the incoming
    /// value to be quoted and one of the listed names; the mapped integer
    /// is what gets stored.
    Integer {
        dest: Dest<'a, i32>,
        default: i32,
        map: Option<&'a [JsonEnum<'a>]>,
    },
    /// Unsigned machine integer.
    Uinteger { dest: Dest<'a, u32>, default: u32 },
    /// Signed 16-bit integer.
    Short { dest: Dest<'a, i16>, default: i16 },
    /// Unsigned 16-bit integer.
    Ushort { dest: Dest<'a, u16>, default: u16 },
    /// 64-bit IEEE float.
    Real { dest: Dest<'a, f64>, default: f64 },
    /// One-byte truth value.
    Boolean { dest: Dest<'a, bool>, default: bool },
    /// Single byte.
    Character { dest: Dest<'a, u8>, default: u8 },
    /// ISO-8601 timestamp stored as seconds since the Unix epoch.
    #[cfg(feature = "time")]
    Time { dest: Dest<'a, f64>, default: f64 },
    /// NUL-terminated string. The default is the empty string.
    String { dest: StrDest<'a> },
    /// No destination: the parsed value must equal `literal` exactly.
    Check { literal: &'a str },
    /// Accept and discard.
    Ignore,
    /// Homogeneous array, described by its own template.
    Array(JsonArray<'a>),
}

/// Template for a homogeneous array and its destination bank.
#[derive(Debug, Clone, Copy)]
pub struct JsonArray<'a> {
    /// Declared element kind plus the bank elements are written to.
    pub elements: ElementTarget<'a>,
    /// Where the number of elements actually written is reported.
    pub count: Option<&'a Cell<usize>>,
    /// Maximum number of elements accepted.
    pub maxlen: usize,
}

/// Element kind and destination bank of an array template.
#[derive(Debug, Clone, Copy)]
pub enum ElementTarget<'a> {
    Integers(&'a [Cell<i32>]),
    Uintegers(&'a [Cell<u32>]),
    Shorts(&'a [Cell<i16>]),
    Ushorts(&'a [Cell<u16>]),
    Reals(&'a [Cell<f64>]),
    Booleans(&'a [Cell<bool>]),
    /// Strings packed NUL-terminated into `store`; the start offset of
    /// element `i` is reported in `offsets[i]`.
    Strings {
        offsets: &'a [Cell<usize>],
        store: &'a [Cell<u8>],
    },
    /// Sub-objects in parallel-array representation: each sub-field's
    /// destination in `subtype` is its own bank, indexed by element.
    Objects { subtype: &'a [JsonAttr<'a>] },
    /// Sub-objects stored contiguously as `stride`-sized elements of a
    /// flat byte bank; sub-field destinations are byte offsets.
    StructObjects {
        subtype: &'a [JsonAttr<'a>],
        base: &'a [Cell<u8>],
        stride: usize,
    },
}
