// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute and item parsing for the `#[mapper]` macro.
//!
//! Mapper-wide options come from the macro arguments and are parsed with
//! darling's `FromMeta` derive. Method attributes such as
//! `#[map_property(...)]` are collected by hand from each method because
//! they repeat and must keep their spans for diagnostics.
//!
//! # Module Structure
//!
//! - [`mapper_args`] - `#[mapper(...)]` arguments
//! - [`directives`] - per-method mapping attributes
//! - [`method`] - mapping method signatures
//! - [`module`] - the annotated module and its `#[mappings]` impls
//!
//! # Data Structures
//!
//! ```text
//! ModuleDef
//! ├── ident: Ident                (module name)
//! └── items: Vec<ModuleItem>
//!     ├── Plain(Item)             (structs, enums, other impls)
//!     └── Mapper(MapperDef)       (#[mappings] impl blocks)
//!         ├── self_ty: Type
//!         └── methods: Vec<MethodDef>
//!             ├── sig: Signature
//!             ├── body: Option<Block>   (None = generated)
//!             └── directives: MethodDirectives
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! #[mapper(enum_ignore_case, disabled_conversions(explicit_cast))]
//! mod mapping {
//!     pub struct Car { pub name: String, pub engine: Engine }
//!     pub struct CarDto { pub name: String, pub engine_power: u32 }
//!
//!     pub struct CarMapper;
//!
//!     #[mappings]
//!     impl CarMapper {
//!         #[map_ignore_source("internal_code")]
//!         pub fn to_dto(car: Car) -> CarDto;
//!     }
//! }
//! ```

mod directives;
mod mapper_args;
mod method;
mod module;

pub use directives::{
    MapDerivedTypeArgs, MapDerivedTypesArgs, MapEnumArgs, MapEnumValueArgs, MapPropertyArgs,
    MapValueArgs, MemberValueArg, MethodDirectives, TypeArg, ValueExpr, WithSpan
};
pub use mapper_args::{ConversionList, Edition, EnumStrategy, MapperArgs};
pub use method::{MappingSignature, MethodDef, SignatureShape};
pub use module::{MapperDef, ModuleDef, ModuleItem};
