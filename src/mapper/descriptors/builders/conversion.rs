// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use quote::quote;

use super::{Built, MappingBuilder};
use crate::mapper::{
    config::MappingConversionType,
    descriptors::context::MappingBuilderContext,
    mappings::{ConstructorMapping, ConversionKind, ConversionMapping, Mapping},
    symbols::{Primitive, TypeKind, model::ConstructorKind}
};

/// Single-argument `From` impls and associated constructors of the target.
///
/// Skipped when the request's configuration names members explicitly, so
/// that member configuration is never silently bypassed.
pub struct ConstructorBuilder;

impl MappingBuilder for ConstructorBuilder {
    fn name(&self) -> &'static str {
        "constructor"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        if !ctx.is_conversion_enabled(MappingConversionType::CONSTRUCTOR)
            || ctx.config().members.has_overrides()
        {
            return Built::Declined;
        }
        let (source, target) = (ctx.source(), ctx.target());
        let model = ctx.model();
        let constructor = model.constructors(target).iter().find_map(|constructor| {
            if constructor.parameter == source {
                Some((constructor, false))
            } else if model.is_nullable(constructor.parameter)
                && model.non_nullable(constructor.parameter) == source
            {
                Some((constructor, true))
            } else {
                None
            }
        });
        let Some((constructor, wrap_some)) = constructor else {
            return Built::Declined;
        };
        let target_path = model.tokens(target);
        let call = match &constructor.kind {
            ConstructorKind::From => {
                let parameter = model.tokens(constructor.parameter);
                quote! { <#target_path as ::std::convert::From<#parameter>>::from }
            }
            ConstructorKind::Function(name) => quote! { #target_path::#name }
        };
        Built::Mapping(Mapping::Constructor(ConstructorMapping::new(
            source, target, call, wrap_some
        )))
    }
}

/// Primitive widening and casts, `to_string` and fieldless enum casts.
pub struct ConversionBuilder;

impl MappingBuilder for ConversionBuilder {
    fn name(&self) -> &'static str {
        "conversion"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        let (source, target) = (ctx.source(), ctx.target());
        let model = ctx.model();
        let (value, deref) = match model.referent(source) {
            Some(referent) => (referent, model.is_copy(referent)),
            None => (source, false)
        };
        let borrowed = value != source;
        let TypeKind::Primitive(to) = *model.kind(target) else {
            return Built::Declined;
        };
        let enabled = |flag| ctx.is_conversion_enabled(flag);
        let target_tokens = model.tokens(target).clone();
        let kind = match model.kind(value) {
            TypeKind::Primitive(from) if *from == to => return Built::Declined,
            TypeKind::Primitive(_) | TypeKind::Opaque(_)
                if to == Primitive::String && enabled(MappingConversionType::TO_STRING) =>
            {
                return Built::Mapping(Mapping::Conversion(ConversionMapping::new(
                    source,
                    target,
                    ConversionKind::ToString,
                    false
                )));
            }
            TypeKind::Primitive(from)
                if from.converts_losslessly_to(to)
                    && enabled(MappingConversionType::IMPLICIT_CAST) =>
            {
                ConversionKind::From(target_tokens)
            }
            TypeKind::Primitive(from)
                if from.casts_to(to) && enabled(MappingConversionType::EXPLICIT_CAST) =>
            {
                ConversionKind::Cast(target_tokens)
            }
            TypeKind::Enum(_)
                if to.is_integer()
                    && model.enum_decl(value).is_some_and(|decl| decl.is_unit_only())
                    && enabled(MappingConversionType::EXPLICIT_CAST) =>
            {
                ConversionKind::Cast(target_tokens)
            }
            _ => return Built::Declined
        };
        if borrowed && !deref {
            return Built::Declined;
        }
        Built::Mapping(Mapping::Conversion(ConversionMapping::new(
            source, target, kind, deref
        )))
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use crate::mapper::{
        config::MappingConversionType,
        descriptors::fixture::Described,
        diagnostics::DiagnosticKind,
        parse::{ConversionList, MapperArgs}
    };

    #[test]
    fn primitives_widen_cast_and_format() {
        let output = Described::new(quote! {
            mod mapping {
                #[derive(Clone, Copy)]
                pub enum Level { Low, High }
                pub struct Reading { pub value: i32, pub ratio: f64, pub level: Level, pub id: uuid::Uuid }
                pub struct ReadingDto { pub value: i64, pub ratio: f32, pub level: u8, pub id: String }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(reading: Reading) -> ReadingDto;
                }
            }
        })
        .expand();
        assert!(output.contains("value : i64 :: from (reading . value)"), "{output}");
        assert!(output.contains("ratio : reading . ratio as f32"), "{output}");
        assert!(output.contains("level : reading . level as u8"), "{output}");
        assert!(output.contains("id : reading . id . to_string ()"), "{output}");
    }

    #[test]
    fn disabled_casts_are_not_used() {
        let args = MapperArgs {
            disabled_conversions: ConversionList(MappingConversionType::EXPLICIT_CAST),
            ..MapperArgs::default()
        };
        let described = Described::with_args(
            quote! {
                mod mapping {
                    pub struct Mapper;

                    #[mappings]
                    impl Mapper {
                        pub fn narrow(value: i64) -> i32;
                    }
                }
            },
            &args
        );
        assert_eq!(described.count(DiagnosticKind::CouldNotCreateMapping), 1);
    }

    #[test]
    fn from_impls_of_the_target_are_constructors() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Email(String);
                impl From<String> for Email {
                    fn from(value: String) -> Self { Self(value) }
                }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn email(value: String) -> Email;
                }
            }
        })
        .expand();
        assert!(output.contains("< Email as :: std :: convert :: From <"), "{output}");
        assert!(output.contains(":: from (value)"), "{output}");
    }

    #[test]
    fn borrowed_copy_sources_are_dereferenced() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn widen(value: &u16) -> u64;
                }
            }
        })
        .expand();
        assert!(output.contains("u64 :: from (* value)"), "{output}");
    }
}
