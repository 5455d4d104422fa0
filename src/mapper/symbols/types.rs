// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type shapes understood by the mapper.

/// Interned handle to a [`TypeKind`] inside a
/// [`TypeModel`](super::TypeModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Structural shape of a type.
///
/// Composite kinds refer to their components by [`TypeId`], so the kind
/// itself is the interning key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Unit,
    Primitive(Primitive),
    /// `Option<T>`, the only nullable shape.
    Option(TypeId),
    Boxed(TypeId),
    /// Shared reference `&T`; marks a borrowed source.
    Ref(TypeId),
    Collection(CollectionKind, TypeId),
    Map(MapKind, TypeId, TypeId),
    /// `impl Iterator<Item = T>`, the lazily evaluated sequence.
    Iter(TypeId),
    /// Struct declared in the annotated module, by declaration index.
    Struct(usize),
    /// Enum declared in the annotated module, by declaration index.
    Enum(usize),
    /// Anything else, keyed by its normalized spelling.
    Opaque(String)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Vec,
    VecDeque,
    HashSet,
    BTreeSet
}

impl CollectionKind {
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "Vec" => Some(Self::Vec),
            "VecDeque" => Some(Self::VecDeque),
            "HashSet" => Some(Self::HashSet),
            "BTreeSet" => Some(Self::BTreeSet),
            _ => None
        }
    }

    /// Fully qualified path used in generated code.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Vec => "::std::vec::Vec",
            Self::VecDeque => "::std::collections::VecDeque",
            Self::HashSet => "::std::collections::HashSet",
            Self::BTreeSet => "::std::collections::BTreeSet"
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Vec => "Vec",
            Self::VecDeque => "VecDeque",
            Self::HashSet => "HashSet",
            Self::BTreeSet => "BTreeSet"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    HashMap,
    BTreeMap
}

impl MapKind {
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "HashMap" => Some(Self::HashMap),
            "BTreeMap" => Some(Self::BTreeMap),
            _ => None
        }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::HashMap => "::std::collections::HashMap",
            Self::BTreeMap => "::std::collections::BTreeMap"
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::HashMap => "HashMap",
            Self::BTreeMap => "BTreeMap"
        }
    }
}

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String
}

impl Primitive {
    #[must_use]
    pub fn from_ident(ident: &str) -> Option<Self> {
        let primitive = match ident {
            "bool" => Self::Bool,
            "char" => Self::Char,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "isize" => Self::Isize,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "usize" => Self::Usize,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "String" => Self::String,
            _ => return None
        };
        Some(primitive)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String"
        }
    }

    #[must_use]
    pub fn is_copy(self) -> bool {
        !matches!(self, Self::String)
    }

    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::I128
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::U128
                | Self::Usize
        )
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Whether the standard library provides `impl From<self> for target`.
    #[must_use]
    pub fn converts_losslessly_to(self, target: Self) -> bool {
        use Primitive::*;

        match self {
            Bool => target.is_integer(),
            Char => matches!(target, U32 | U64 | U128),
            U8 => matches!(
                target,
                Char | U16 | U32 | U64 | U128 | Usize | I16 | I32 | I64 | I128 | Isize | F32 | F64
            ),
            U16 => matches!(target, U32 | U64 | U128 | Usize | I32 | I64 | I128 | F32 | F64),
            U32 => matches!(target, U64 | U128 | I64 | I128 | F64),
            U64 => matches!(target, U128 | I128),
            I8 => matches!(target, I16 | I32 | I64 | I128 | Isize | F32 | F64),
            I16 => matches!(target, I32 | I64 | I128 | Isize | F32 | F64),
            I32 => matches!(target, I64 | I128 | F64),
            I64 => matches!(target, I128),
            F32 => matches!(target, F64),
            _ => false
        }
    }

    /// Whether `self as target` is a valid primitive cast.
    #[must_use]
    pub fn casts_to(self, target: Self) -> bool {
        use Primitive::*;

        match (self, target) {
            (String, _) | (_, String) | (_, Bool) => false,
            (U8, Char) => true,
            (_, Char) => false,
            (Bool | Char, other) => other.is_integer(),
            (source, other) => source.is_numeric() && other.is_numeric()
        }
    }
}
