// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Enum conversions: enum to enum, enum to `String` and `String` to enum.
//!
//! Enum to enum pairs variants in this order:
//!
//! | Step | Rule |
//! |------|------|
//! | 1 | explicit `#[map_enum_value(source = .., target = ..)]` pair |
//! | 2 | same name (case and separators ignored with `ignore_case`), or same discriminant for `by_value` |
//! | 3 | the configured fallback value |
//!
//! A source variant left without a target is an error; a target variant no
//! source reaches is a warning.

use convert_case::{Case, Casing};
use quote::ToTokens;
use rustc_hash::FxHashSet;
use syn::Ident;

use super::{Built, MappingBuilder};
use crate::mapper::{
    config::{EnumMappingConfiguration, MappingConversionType},
    descriptors::{BuildFailure, context::MappingBuilderContext},
    diagnostics::DiagnosticKind,
    mappings::{
        EnumArm, EnumMapping, EnumToStringMapping, Mapping, PayloadField, StringToEnumMapping
    },
    parse::EnumStrategy,
    symbols::{
        EnumDecl, FieldStyle, Member, Primitive, TypeId, TypeKind, Variant,
        model::normalize_tokens
    }
};

pub struct EnumBuilder;

impl MappingBuilder for EnumBuilder {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        let (source, target) = (ctx.source(), ctx.target());
        let model = ctx.model();
        let source_base = model.referent(source).unwrap_or(source);
        let borrowed = source_base != source;
        let is_string =
            |id: TypeId| matches!(model.kind(id), TypeKind::Primitive(Primitive::String));
        let target_is_string = is_string(target);
        let source_is_string = is_string(source_base);

        match (model.enum_decl(source_base).cloned(), model.enum_decl(target).cloned()) {
            (Some(source_decl), Some(target_decl))
                if ctx.is_conversion_enabled(MappingConversionType::ENUM_TO_ENUM) =>
            {
                enum_to_enum(ctx, &source_decl, &target_decl, borrowed)
            }
            (Some(source_decl), None)
                if target_is_string
                    && ctx.is_conversion_enabled(MappingConversionType::ENUM_TO_STRING) =>
            {
                let variants = source_decl
                    .variants
                    .iter()
                    .map(|v| (v.ident.clone(), v.style))
                    .collect();
                Built::Mapping(Mapping::EnumToString(EnumToStringMapping::new(
                    source, target, variants
                )))
            }
            (None, Some(target_decl))
                if source_is_string
                    && target_decl.is_unit_only()
                    && ctx.is_conversion_enabled(MappingConversionType::STRING_TO_ENUM) =>
            {
                let enums = &ctx.config().enums;
                let variants = target_decl.variants.iter().map(|v| v.ident.clone()).collect();
                Built::Mapping(Mapping::StringToEnum(StringToEnumMapping::new(
                    source,
                    target,
                    variants,
                    enums.ignore_case,
                    enums.fallback.clone()
                )))
            }
            _ => Built::Declined
        }
    }
}

fn enum_to_enum(
    ctx: &mut MappingBuilderContext<'_, '_>,
    source_decl: &EnumDecl,
    target_decl: &EnumDecl,
    borrowed: bool
) -> Built {
    let (source, target) = (ctx.source(), ctx.target());
    let source_base = ctx.model().referent(source).unwrap_or(source);
    let source_name = ctx.display(source_base);
    let target_name = ctx.display(target);
    let enums = &ctx.config().enums;

    if enums.strategy == EnumStrategy::ByValue
        && !(source_decl.is_unit_only() && target_decl.is_unit_only())
    {
        ctx.report(
            DiagnosticKind::EnumMappingStrategyByValueNotSupported,
            ctx.span(),
            &[&source_name, &target_name]
        );
        return Built::Failed;
    }

    let mut failed = false;
    let Some(explicit) = explicit_pairs(ctx, enums, source_decl, target_decl) else {
        return Built::Failed;
    };

    let mut reached = FxHashSet::default();
    if let Some(fallback) = &enums.fallback
        && let Some(variant) = fallback_variant(fallback, target_decl)
    {
        reached.insert(variant);
    }

    let mut arms = Vec::with_capacity(source_decl.variants.len());
    for variant in &source_decl.variants {
        let counterpart = explicit
            .iter()
            .find(|(from, _)| *from == variant.ident)
            .and_then(|(_, to)| target_decl.variant(&to.to_string()))
            .or_else(|| matching_variant(enums, variant, target_decl));
        let pairs = counterpart.and_then(|to| payload_pairs(variant, to));

        match (counterpart, pairs) {
            (Some(to), Some(pairs)) => {
                let mut fields = Vec::with_capacity(pairs.len());
                for (from_member, to_member) in pairs {
                    let field_source = if borrowed {
                        ctx.model_mut().reference(from_member.ty)
                    } else {
                        from_member.ty
                    };
                    match ctx.find_or_build(field_source, to_member.ty) {
                        Ok(mapping) => fields.push(PayloadField {
                            source: from_member.member.clone(),
                            target: to_member.member.clone(),
                            mapping
                        }),
                        Err(BuildFailure::NoStrategy) => {
                            let from_path = format!("{}.{}", variant.ident, from_member.name);
                            let to_path = format!("{}.{}", to.ident, to_member.name);
                            let from_ty = ctx.display(field_source);
                            let to_ty = ctx.display(to_member.ty);
                            ctx.report(
                                DiagnosticKind::CouldNotMapMember,
                                ctx.span(),
                                &[&from_path, &from_ty, &to_path, &to_ty]
                            );
                            failed = true;
                        }
                        Err(BuildFailure::Reported) => failed = true
                    }
                }
                reached.insert(to.ident.to_string());
                arms.push(EnumArm::Variant {
                    source: variant.ident.clone(),
                    source_style: variant.style,
                    target: to.ident.clone(),
                    target_style: to.style,
                    fields
                });
            }
            _ => match &enums.fallback {
                Some(value) => arms.push(EnumArm::Fallback {
                    source:       variant.ident.clone(),
                    source_style: variant.style,
                    value:        value.clone()
                }),
                None => {
                    ctx.report(
                        DiagnosticKind::EnumSourceValueNotMapped,
                        ctx.span(),
                        &[&variant.ident, &source_name, &target_name]
                    );
                    failed = true;
                }
            }
        }
    }

    for variant in &target_decl.variants {
        if !reached.contains(&variant.ident.to_string()) {
            ctx.report(
                DiagnosticKind::EnumTargetValueNotMapped,
                ctx.span(),
                &[&variant.ident, &target_name, &source_name]
            );
        }
    }

    if failed {
        return Built::Failed;
    }
    Built::Mapping(Mapping::Enum(EnumMapping::new(source, target, arms)))
}

/// Configured variant pairs, or `None` when one of them names no variant.
fn explicit_pairs(
    ctx: &mut MappingBuilderContext<'_, '_>,
    enums: &EnumMappingConfiguration,
    source_decl: &EnumDecl,
    target_decl: &EnumDecl
) -> Option<Vec<(Ident, Ident)>> {
    let mut pairs = Vec::with_capacity(enums.explicit.len());
    let mut valid = true;
    for entry in &enums.explicit {
        let from = last_segment(&entry.source)
            .filter(|variant| source_decl.variant(&variant.to_string()).is_some());
        let to = last_segment(&entry.target)
            .filter(|variant| target_decl.variant(&variant.to_string()).is_some());
        if from.is_none() {
            let path = normalize_tokens(&entry.source.to_token_stream());
            ctx.report(
                DiagnosticKind::EnumConfiguredValueNotFound,
                entry.span,
                &[&path, &source_decl.ident]
            );
        }
        if to.is_none() {
            let path = normalize_tokens(&entry.target.to_token_stream());
            ctx.report(
                DiagnosticKind::EnumConfiguredValueNotFound,
                entry.span,
                &[&path, &target_decl.ident]
            );
        }
        match (from, to) {
            (Some(from), Some(to)) => pairs.push((from.clone(), to.clone())),
            _ => valid = false
        }
    }
    valid.then_some(pairs)
}

fn last_segment(path: &syn::Path) -> Option<&Ident> {
    path.segments.last().map(|segment| &segment.ident)
}

/// Target variant named by a fallback such as `Shade::Unknown`.
fn fallback_variant(fallback: &syn::Expr, target_decl: &EnumDecl) -> Option<String> {
    let syn::Expr::Path(path) = fallback else {
        return None;
    };
    let name = last_segment(&path.path)?.to_string();
    target_decl.variant(&name).map(|_| name)
}

fn matching_variant<'t>(
    enums: &EnumMappingConfiguration,
    variant: &Variant,
    target_decl: &'t EnumDecl
) -> Option<&'t Variant> {
    match enums.strategy {
        EnumStrategy::ByName => {
            let name = variant.ident.to_string();
            target_decl.variants.iter().find(|candidate| {
                let candidate = candidate.ident.to_string();
                let folded = || candidate.to_case(Case::Flat) == name.to_case(Case::Flat);
                candidate == name || (enums.ignore_case && folded())
            })
        }
        EnumStrategy::ByValue => target_decl.variants.iter().find(|candidate| {
            candidate.discriminant.is_some() && candidate.discriminant == variant.discriminant
        })
    }
}

/// Payload fields of `from` feeding each field of `to`.
///
/// Tuple payloads pair by position and need the same arity, struct payloads
/// pair by name. A unit target drops whatever the source carries.
fn payload_pairs<'v>(from: &'v Variant, to: &'v Variant) -> Option<Vec<(&'v Member, &'v Member)>> {
    match (from.style, to.style) {
        (_, FieldStyle::Unit) => Some(Vec::new()),
        (FieldStyle::Unnamed, FieldStyle::Unnamed) if from.members.len() == to.members.len() => {
            Some(from.members.iter().zip(&to.members).collect())
        }
        (FieldStyle::Named, FieldStyle::Named) => to
            .members
            .iter()
            .map(|target| {
                from.members
                    .iter()
                    .find(|source| source.name == target.name)
                    .map(|source| (source, target))
            })
            .collect(),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use crate::mapper::{descriptors::fixture::Described, diagnostics::DiagnosticKind};

    #[test]
    fn unmatched_variants_use_the_fallback() {
        let described = Described::new(quote! {
            mod mapping {
                pub enum Color { Red, Green }
                pub enum Shade { Red }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_enum(fallback = Shade::Red)]
                    pub fn to_shade(color: Color) -> Shade;
                }
            }
        });
        assert!(described.descriptor.diagnostics.iter().next().is_none());
        let output = described.expand();
        assert!(output.contains("Color :: Red => Shade :: Red"), "{output}");
        assert!(output.contains("Color :: Green => Shade :: Red"), "{output}");
    }

    #[test]
    fn unmatched_variants_without_fallback_are_errors() {
        let described = Described::new(quote! {
            mod mapping {
                pub enum Color { Red, Green }
                pub enum Shade { Red, Blue }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_shade(color: Color) -> Shade;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::EnumSourceValueNotMapped), 1);
        assert_eq!(described.count(DiagnosticKind::EnumTargetValueNotMapped), 1);
    }

    #[test]
    fn explicit_pairs_and_ignore_case() {
        let output = Described::new(quote! {
            mod mapping {
                pub enum Status { Active, Disabled }
                pub enum StatusDto { ACTIVE, Off }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_enum(ignore_case = true)]
                    #[map_enum_value(source = Status::Disabled, target = StatusDto::Off)]
                    pub fn to_dto(status: Status) -> StatusDto;
                }
            }
        })
        .expand();
        assert!(output.contains("Status :: Active => StatusDto :: ACTIVE"), "{output}");
        assert!(output.contains("Status :: Disabled => StatusDto :: Off"), "{output}");
    }

    #[test]
    fn unknown_configured_variant_is_reported() {
        let described = Described::new(quote! {
            mod mapping {
                pub enum Color { Red }
                pub enum Shade { Red }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_enum_value(source = Color::Purple, target = Shade::Red)]
                    pub fn to_shade(color: Color) -> Shade;
                }
            }
        });
        assert_eq!(described.count(DiagnosticKind::EnumConfiguredValueNotFound), 1);
    }

    #[test]
    fn by_value_requires_unit_variants() {
        let described = Described::new(quote! {
            mod mapping {
                pub enum Event { Created(u32), Deleted }
                pub enum EventDto { Created(u32), Deleted }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    #[map_enum(strategy = "by_value")]
                    pub fn to_dto(event: Event) -> EventDto;
                }
            }
        });
        assert_eq!(
            described.count(DiagnosticKind::EnumMappingStrategyByValueNotSupported),
            1
        );
    }

    #[test]
    fn payload_fields_are_converted() {
        let output = Described::new(quote! {
            mod mapping {
                pub enum Shape { Circle { radius: f32 }, Square(u16) }
                pub enum ShapeDto { Circle { radius: f64 }, Square(u32) }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_dto(shape: Shape) -> ShapeDto;
                }
            }
        })
        .expand();
        assert!(output.contains("f64 :: from (radius)"), "{output}");
        assert!(output.contains("ShapeDto :: Square (u32 :: from ("), "{output}");
    }

    #[test]
    fn enums_convert_to_and_from_strings() {
        let output = Described::new(quote! {
            mod mapping {
                pub enum Level { Low, High }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn to_name(level: Level) -> String;
                    pub fn parse(name: String) -> Level;
                }
            }
        })
        .expand();
        assert!(
            output.contains("Level :: High => :: std :: string :: String :: from (\"High\")"),
            "{output}"
        );
        assert!(output.contains("match name . as_str ()"), "{output}");
        assert!(output.contains("\"Low\" => Level :: Low"), "{output}");
    }
}
