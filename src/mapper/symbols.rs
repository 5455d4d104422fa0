// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type model of the annotated module.
//!
//! Mapping resolution never looks at raw `syn` types. Every type spelled in
//! the module is resolved once into an interned [`TypeId`], so two spellings
//! of the same shape compare equal and cache keys stay cheap to hash.
//!
//! # Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | [`TypeKind`] and primitive classification |
//! | [`model`] | [`TypeModel`] arena, struct and enum declarations |
//! | [`path`] | [`MemberPath`] resolution, getters and setters |

pub mod model;
pub mod path;
pub mod types;

pub use model::{EnumDecl, FieldStyle, Member, StructDecl, TypeModel, Variant};
pub use path::MemberPath;
pub use types::{CollectionKind, MapKind, Primitive, TypeId, TypeKind};
