// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[mapper]` attribute implementation.
//!
//! # Pipeline
//!
//! ```text
//! #[mapper(..)] mod m { .. }
//!   │
//!   ├─ parse ────────► MapperArgs + ModuleDef
//!   ├─ symbols ──────► TypeModel of every struct and enum in the module
//!   ├─ descriptors ──► MapperDescriptor per #[mappings] impl
//!   │                  (registry of resolved mappings + diagnostics)
//!   └─ emit ─────────► impl block with generated bodies and helpers
//! ```
//!
//! Errors found while resolving are emitted as `compile_error!` next to the
//! rewritten module, so code that does not depend on the failing method
//! still type checks. Warnings cannot be raised from a stable proc macro
//! and are logged through `tracing` instead.

pub mod config;
pub mod descriptors;
pub mod diagnostics;
pub mod emit;
pub mod mappings;
pub mod parse;
pub mod symbols;

use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemMod, parse_macro_input};

use self::{
    descriptors::describe,
    emit::emit_mapper,
    parse::{MapperArgs, ModuleDef},
    symbols::TypeModel
};

/// Main entry point for the `#[mapper]` attribute.
pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemMod);

    match expand_module(attr.into(), item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into()
    }
}

/// Rewrite `item` under the mapper-wide arguments `attr`.
///
/// # Errors
///
/// Returns malformed arguments, attributes and type declarations; mapping
/// diagnostics are appended to the output instead.
fn expand_module(
    attr: proc_macro2::TokenStream,
    item: ItemMod
) -> darling::Result<proc_macro2::TokenStream> {
    let args = MapperArgs::parse(attr)?;
    let module = ModuleDef::from_item_mod(item)?;
    let mut model = TypeModel::from_items(&module.plain_items())?;

    let mut generated = Vec::new();
    let mut errors = Vec::new();
    for mapper in module.mappers() {
        let descriptor = describe(&mut model, mapper, &args);
        for diagnostic in descriptor.diagnostics.iter() {
            if diagnostic.is_error() {
                errors.push(diagnostic.to_darling());
            } else {
                tracing::warn!(code = diagnostic.kind.code(), "{}", diagnostic.render());
            }
        }
        generated.push(emit_mapper(&model, mapper, &descriptor));
    }

    let rendered = module.render(generated);
    if errors.is_empty() {
        return Ok(rendered);
    }
    let errors = darling::Error::multiple(errors).write_errors();
    Ok(quote! {
        #rendered
        #errors
    })
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn expand(attr: proc_macro2::TokenStream, item: proc_macro2::TokenStream) -> String {
        let item: ItemMod = syn::parse2(item).unwrap();
        match expand_module(attr, item) {
            Ok(tokens) => tokens.to_string(),
            Err(err) => err.write_errors().to_string()
        }
    }

    #[test]
    fn declared_methods_get_bodies() {
        let output = expand(quote! {}, quote! {
            pub mod cars {
                pub struct Car { pub name: String }
                pub struct CarDto { pub name: String }
                pub struct CarMapper;

                #[mappings]
                impl CarMapper {
                    pub fn to_dto(car: Car) -> CarDto;
                }
            }
        });
        assert!(output.starts_with("pub mod cars"), "{output}");
        assert!(output.contains("pub fn to_dto (car : Car) -> CarDto"), "{output}");
        assert!(!output.contains("mappings"), "{output}");
        assert!(!output.contains("compile_error"), "{output}");
    }

    #[test]
    fn mapping_errors_become_compile_errors() {
        let output = expand(quote! {}, quote! {
            mod cars {
                pub struct A {}
                pub struct B { pub value: i32 }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_b(a: A) -> B;
                }
            }
        });
        assert!(output.contains("mod cars"), "{output}");
        assert!(output.contains("compile_error"), "{output}");
        assert!(output.contains("OM003"), "{output}");
    }

    #[test]
    fn warnings_do_not_fail_the_expansion() {
        let output = expand(quote! {}, quote! {
            mod users {
                pub struct User { pub name: String, pub password: String }
                pub struct UserDto { pub name: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(user: User) -> UserDto;
                }
            }
        });
        assert!(!output.contains("compile_error"), "{output}");
    }

    #[test]
    fn malformed_arguments_are_reported() {
        let output = expand(quote! { enum_strategy = "sideways" }, quote! {
            mod empty {}
        });
        assert!(output.contains("compile_error"), "{output}");
    }

    #[test]
    fn external_modules_are_rejected() {
        let output = expand(quote! {}, quote! { mod elsewhere; });
        assert!(output.contains("inline module"), "{output}");
    }
}
