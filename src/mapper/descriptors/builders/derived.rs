// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Switch over configured derived types.
//!
//! Every `#[map_derived_type]` entry becomes one arm. The arm either matches
//! the newtype variant of the source enum carrying the configured source
//! type, or tests a discriminator member against a constant. The arm's
//! payload is mapped through a nested request that keeps the method's
//! configuration but ignores derived types, so the switch never recurses
//! into itself.

use rustc_hash::FxHashSet;
use syn::Ident;

use super::{Built, MappingBuilder, source_value::discriminator_fits};
use crate::mapper::{
    config::{DerivedTypeMappingConfiguration, DerivedTypesMappingConfiguration},
    descriptors::{BuildFailure, MappingBuildingOptions, context::MappingBuilderContext},
    diagnostics::DiagnosticKind,
    mappings::{
        DerivedExistingTargetTypeSwitchMapping, DerivedTypeMapping, DerivedTypeSwitchMapping,
        Discriminator, Mapping
    },
    symbols::{MemberPath, Primitive, TypeId, TypeKind, TypeModel}
};

pub struct DerivedTypeBuilder;

impl MappingBuilder for DerivedTypeBuilder {
    fn name(&self) -> &'static str {
        "derived type"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        if ctx
            .options()
            .contains(MappingBuildingOptions::IGNORE_DERIVED_TYPES)
        {
            return Built::Declined;
        }
        let Some(derived) = ctx.config().derived_types.as_ref() else {
            return Built::Declined;
        };
        if derived.mappings.is_empty() {
            return Built::Declined;
        }

        let (source, target) = (ctx.source(), ctx.target());
        let source_base = ctx.model().referent(source).unwrap_or(source);
        let borrowed = source_base != source;

        let mut seen = FxHashSet::default();
        let mut arms = Vec::with_capacity(derived.mappings.len());
        let mut failed = false;
        for entry in &derived.mappings {
            match derived_arm(ctx, derived, entry, source_base, borrowed, &mut seen) {
                ArmOutcome::Arm(arm) => arms.push(arm),
                ArmOutcome::Skipped => {}
                ArmOutcome::Failed => failed = true
            }
        }

        if failed || arms.is_empty() {
            return Built::Failed;
        }
        let mapping = if ctx.is_existing() {
            Mapping::ExistingDerivedSwitch(DerivedExistingTargetTypeSwitchMapping::new(
                source, target, arms
            ))
        } else {
            Mapping::DerivedSwitch(DerivedTypeSwitchMapping::new(source, target, arms))
        };
        Built::Mapping(mapping)
    }
}

enum ArmOutcome {
    Arm(DerivedTypeMapping),
    /// The entry was reported and left out; the remaining arms still apply.
    Skipped,
    /// The derived configuration as a whole is unusable.
    Failed
}

fn derived_arm(
    ctx: &mut MappingBuilderContext<'_, '_>,
    derived: &DerivedTypesMappingConfiguration,
    entry: &DerivedTypeMappingConfiguration,
    source_base: TypeId,
    borrowed: bool,
    seen: &mut FxHashSet<(TypeId, Option<String>)>
) -> ArmOutcome {
    let (source, target) = (ctx.source(), ctx.target());
    let derived_source = entry.source;

    if derived_source.is_none() && entry.discriminator_value.is_none() {
        let name = ctx.display(entry.target);
        ctx.report(DiagnosticKind::DerivedSourceTypeRequired, entry.span, &[&name]);
        return ArmOutcome::Skipped;
    }
    let member = entry.member.as_ref().or(derived.discriminator.as_ref());
    if entry.discriminator_value.is_some() && member.is_none() {
        let name = ctx.display(entry.target);
        ctx.report(DiagnosticKind::DerivedTypeDiscriminatorMissing, entry.span, &[&name]);
        return ArmOutcome::Skipped;
    }

    let key = (
        derived_source.unwrap_or(source_base),
        entry.discriminator_value.as_ref().map(Discriminator::value_key)
    );
    if !seen.insert(key) && !derived.allow_duplicates {
        let name = ctx.display(derived_source.unwrap_or(source_base));
        ctx.report(DiagnosticKind::DerivedSourceTypeDuplicated, entry.span, &[&name]);
        return ArmOutcome::Skipped;
    }

    let source_variant = match derived_source {
        Some(payload) if payload != source_base => {
            match newtype_variant(ctx.model(), source_base, payload) {
                Some(variant) => Some(variant),
                None => {
                    let (payload, parameter) = (ctx.display(payload), ctx.display(source_base));
                    ctx.report(
                        DiagnosticKind::DerivedSourceTypeIsNotAssignableToParameterType,
                        entry.span,
                        &[&payload, &parameter]
                    );
                    return ArmOutcome::Skipped;
                }
            }
        }
        _ => None
    };
    let target_variant = if entry.target == target {
        None
    } else {
        match newtype_variant(ctx.model(), target, entry.target) {
            Some(variant) => Some(variant),
            None => {
                let (payload, ret) = (ctx.display(entry.target), ctx.display(target));
                ctx.report(
                    DiagnosticKind::DerivedTargetTypeIsNotAssignableToReturnType,
                    entry.span,
                    &[&payload, &ret]
                );
                return ArmOutcome::Skipped;
            }
        }
    };

    let discriminator = match (&entry.discriminator_value, member) {
        (Some(value), Some(names)) => {
            let root = derived_source.unwrap_or(source_base);
            let Some(path) = MemberPath::resolve(ctx.model(), root, names) else {
                let (path, owner) = (names.join("."), ctx.display(root));
                ctx.report(DiagnosticKind::DerivedTypeDiscriminatorNotFound, entry.span, &[
                    &path, &owner
                ]);
                return ArmOutcome::Failed;
            };
            let leaf = path.leaf().ty;
            if !discriminator_fits(ctx, leaf, value, entry.span) {
                return ArmOutcome::Skipped;
            }
            let as_str = matches!(ctx.model().kind(leaf), TypeKind::Primitive(Primitive::String));
            Some(Discriminator {
                path,
                value: value.clone(),
                as_str
            })
        }
        _ => None
    };

    let arm_source = match derived_source {
        Some(payload) if borrowed => ctx.model_mut().reference(payload),
        Some(payload) => payload,
        None => source
    };
    let options = MappingBuildingOptions::KEEP_USER_SYMBOL
        | MappingBuildingOptions::MARK_AS_REUSABLE
        | MappingBuildingOptions::IGNORE_DERIVED_TYPES;
    let nested = if ctx.is_existing() {
        ctx.find_or_build_existing_with(arm_source, entry.target, options)
    } else {
        ctx.find_or_build_with(arm_source, entry.target, options)
    };
    let mapping = match nested {
        Ok(id) => id,
        Err(BuildFailure::NoStrategy) => {
            let (from, to) = (ctx.display(arm_source), ctx.display(entry.target));
            ctx.report(DiagnosticKind::CouldNotCreateMapping, entry.span, &[&from, &to]);
            return ArmOutcome::Skipped;
        }
        Err(BuildFailure::Reported) => return ArmOutcome::Skipped
    };

    ArmOutcome::Arm(DerivedTypeMapping {
        source: arm_source,
        target: entry.target,
        explicit_source: derived_source.is_some(),
        source_variant,
        target_variant,
        discriminator,
        mapping
    })
}

/// Newtype variant of the enum `owner` whose payload is `payload`.
fn newtype_variant(model: &TypeModel, owner: TypeId, payload: TypeId) -> Option<Ident> {
    model
        .enum_decl(owner)?
        .variants
        .iter()
        .find(|variant| variant.newtype_payload() == Some(payload))
        .map(|variant| variant.ident.clone())
}
