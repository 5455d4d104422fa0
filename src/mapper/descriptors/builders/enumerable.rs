// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{Built, MappingBuilder};
use crate::mapper::{
    config::MappingConversionType,
    descriptors::context::MappingBuilderContext,
    mappings::{
        DictionaryMapping, EnumerableMapping, ExistingEnumerableMapping, IterSource, Mapping,
        QueryableProjectionMapping
    },
    symbols::{TypeId, TypeKind}
};

/// Element type produced by iterating `source`, and how to iterate it.
///
/// Borrowed collections yield references to their elements.
fn elements(
    ctx: &mut MappingBuilderContext<'_, '_>,
    source: TypeId
) -> Option<(TypeId, IterSource)> {
    match *ctx.model().kind(source) {
        TypeKind::Collection(_, element) => Some((element, IterSource::IntoIter)),
        TypeKind::Iter(element) => Some((element, IterSource::Itself)),
        TypeKind::Ref(referent) => match *ctx.model().kind(referent) {
            TypeKind::Collection(_, element) => {
                Some((ctx.model_mut().reference(element), IterSource::Iter))
            }
            _ => None
        },
        _ => None
    }
}

/// Collection into collection through `map(..).collect()`, or `extend` for
/// existing targets.
pub struct EnumerableBuilder;

impl MappingBuilder for EnumerableBuilder {
    fn name(&self) -> &'static str {
        "enumerable"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        if !ctx.is_conversion_enabled(MappingConversionType::ENUMERABLE) {
            return Built::Declined;
        }
        let (source, target) = (ctx.source(), ctx.target());
        let TypeKind::Collection(_, target_element) = *ctx.model().kind(target) else {
            return Built::Declined;
        };
        let Some((source_element, iter)) = elements(ctx, source) else {
            return Built::Declined;
        };
        let element = match ctx.find_or_build(source_element, target_element) {
            Ok(id) => id,
            Err(failure) => return failure.into()
        };
        let mapping = if ctx.is_existing() {
            Mapping::ExistingEnumerable(ExistingEnumerableMapping::new(
                source, target, element, iter
            ))
        } else {
            Mapping::Enumerable(EnumerableMapping::new(source, target, element, iter))
        };
        Built::Mapping(mapping)
    }
}

/// Collection or iterator into a lazy `impl Iterator`.
pub struct QueryableBuilder;

impl MappingBuilder for QueryableBuilder {
    fn name(&self) -> &'static str {
        "queryable"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        if !ctx.is_conversion_enabled(MappingConversionType::QUERYABLE) {
            return Built::Declined;
        }
        let (source, target) = (ctx.source(), ctx.target());
        let TypeKind::Iter(target_element) = *ctx.model().kind(target) else {
            return Built::Declined;
        };
        let Some((source_element, iter)) = elements(ctx, source) else {
            return Built::Declined;
        };
        let element = match ctx.find_or_build(source_element, target_element) {
            Ok(id) => id,
            Err(failure) => return failure.into()
        };
        Built::Mapping(Mapping::Queryable(QueryableProjectionMapping::new(
            source, target, element, iter
        )))
    }
}

/// Map into map, converting keys and values separately.
pub struct DictionaryBuilder;

impl MappingBuilder for DictionaryBuilder {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        if !ctx.is_conversion_enabled(MappingConversionType::DICTIONARY) {
            return Built::Declined;
        }
        let (source, target) = (ctx.source(), ctx.target());
        let TypeKind::Map(_, target_key, target_value) = *ctx.model().kind(target) else {
            return Built::Declined;
        };
        let (source_key, source_value, iter) = match *ctx.model().kind(source) {
            TypeKind::Map(_, key, value) => (key, value, IterSource::IntoIter),
            TypeKind::Ref(referent) => match *ctx.model().kind(referent) {
                TypeKind::Map(_, key, value) => {
                    let model = ctx.model_mut();
                    (model.reference(key), model.reference(value), IterSource::Iter)
                }
                _ => return Built::Declined
            },
            _ => return Built::Declined
        };
        let key = match ctx.find_or_build(source_key, target_key) {
            Ok(id) => id,
            Err(failure) => return failure.into()
        };
        let value = match ctx.find_or_build(source_value, target_value) {
            Ok(id) => id,
            Err(failure) => return failure.into()
        };
        Built::Mapping(Mapping::Dictionary(DictionaryMapping::new(
            source, target, key, value, iter
        )))
    }
}
