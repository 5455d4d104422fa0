// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! # object-mapper
//!
//! Compile-time object-to-object mapping.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use object_mapper::mapper;
//!
//! #[mapper]
//! mod cars {
//!     pub struct Engine { pub power: u32 }
//!     pub struct Car { pub name: String, pub engine: Engine, pub tags: Vec<String> }
//!     pub struct CarDto { pub name: String, pub engine_power: u64, pub tags: Vec<String> }
//!
//!     pub struct CarMapper;
//!
//!     #[mappings]
//!     impl CarMapper {
//!         pub fn to_dto(car: Car) -> CarDto;
//!
//!         pub fn update(car: &Car, target: &mut CarDto);
//!     }
//! }
//! ```
//!
//! Body-less methods of a `#[mappings]` impl get generated bodies. Methods
//! with a body are reused wherever their signature fits, and
//! parameterless ones can feed `#[map_value(use_method = "..")]`.
//!
//! ## Method Attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[map_property(source = "a.b", target = "c")]` | explicit member path |
//! | `#[map_ignore_source("x")]` | source member is intentionally unused |
//! | `#[map_ignore_target("x")]` | target member gets `Default::default()` |
//! | `#[map_value(target = "x", value = ..)]` | constant value |
//! | `#[map_value(target = "x", use_method = "f")]` | value from `Self::f()` |
//! | `#[map_derived_types(discriminator = "kind")]` | derived type switch settings |
//! | `#[map_derived_type(source = A, target = B)]` | one derived type arm |
//! | `#[map_enum(strategy = "by_value", ignore_case, fallback = ..)]` | enum settings |
//! | `#[map_enum_value(source = A::X, target = B::Y)]` | explicit variant pair |
//!
//! ## Mapper Arguments
//!
//! `#[mapper(enum_strategy = "by_name", enum_ignore_case, use_deep_cloning,
//! throw_on_mapping_null_mismatch = true,
//! throw_on_property_mapping_null_mismatch = false, edition = "2024",
//! disabled_conversions(explicit_cast, to_string))]`

mod mapper;
mod utils;

use proc_macro::TokenStream;

/// Attribute macro generating the bodies of mapping methods.
#[proc_macro_attribute]
pub fn mapper(attr: TokenStream, item: TokenStream) -> TokenStream {
    mapper::expand(attr, item)
}
