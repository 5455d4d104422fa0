// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{Built, MappingBuilder};
use crate::mapper::{
    descriptors::context::MappingBuilderContext,
    mappings::{DirectKind, DirectMapping, Mapping}
};

/// Same type, or `&T` into `T` by copy or clone.
///
/// With deep cloning enabled, values containing the mapper's own types are
/// left to the memberwise and collection builders so they are rebuilt
/// field by field.
pub struct DirectBuilder;

impl MappingBuilder for DirectBuilder {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        let (source, target) = (ctx.source(), ctx.target());
        let model = ctx.model();
        let kind = if source == target {
            DirectKind::Move
        } else if model.referent(source) == Some(target) {
            if model.is_copy(target) {
                DirectKind::Copy
            } else if ctx.config().use_deep_cloning && model.contains_declared(target) {
                return Built::Declined;
            } else if model.is_cloneable(target) {
                DirectKind::Clone
            } else {
                return Built::Declined;
            }
        } else {
            return Built::Declined;
        };
        Built::Mapping(Mapping::Direct(DirectMapping::new(source, target, kind)))
    }
}
