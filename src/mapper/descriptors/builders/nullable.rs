// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use super::{Built, MappingBuilder};
use crate::mapper::{
    descriptors::context::MappingBuilderContext,
    mappings::{
        BoxMapping, BoxShape, ExistingNullableMapping, Mapping, NullableMapping, NullableShape
    },
    symbols::{TypeId, TypeKind, TypeModel}
};

/// Inner type of an `Option` source, looking through one reference.
///
/// Returns the inner type and whether the source is `&Option<T>`.
fn nullable_source(model: &TypeModel, source: TypeId) -> Option<(TypeId, bool)> {
    match model.kind(source) {
        TypeKind::Option(inner) => Some((*inner, false)),
        TypeKind::Ref(referent) => match model.kind(*referent) {
            TypeKind::Option(inner) => Some((*inner, true)),
            _ => None
        },
        _ => None
    }
}

/// Adds, keeps or removes an `Option` layer and maps the inner values.
pub struct NullableBuilder;

impl MappingBuilder for NullableBuilder {
    fn name(&self) -> &'static str {
        "nullable"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        let (source, target) = (ctx.source(), ctx.target());
        let nullable = nullable_source(ctx.model(), source);
        let target_inner = match ctx.model().kind(target) {
            TypeKind::Option(inner) => Some(*inner),
            _ => None
        };
        // `Option<&T>` is what `as_ref` yields for `&Option<T>`.
        let inner_source = nullable.map(|(inner, as_ref)| {
            if as_ref {
                ctx.model_mut().reference(inner)
            } else {
                inner
            }
        });
        let as_ref = nullable.is_some_and(|(_, as_ref)| as_ref);

        if ctx.is_existing() {
            let Some(inner_source) = inner_source else {
                return Built::Declined;
            };
            if target_inner.is_some() {
                return Built::Declined;
            }
            let inner = match ctx.find_or_build_existing(inner_source, target) {
                Ok(id) => id,
                Err(failure) => return failure.into()
            };
            return Built::Mapping(Mapping::ExistingNullable(ExistingNullableMapping::new(
                source, target, inner, as_ref
            )));
        }

        let (inner_target, shape) = match (inner_source, target_inner) {
            (None, None) => return Built::Declined,
            (Some(_), Some(inner_target)) => (inner_target, NullableShape::Map),
            (None, Some(inner_target)) => (inner_target, NullableShape::Wrap),
            (Some(_), None) => {
                let config = ctx.config();
                let panic_message = (config.throw_on_mapping_null_mismatch
                    || !ctx.model().has_default(target))
                .then(|| {
                    format!(
                        "{} is None and cannot be mapped to {}",
                        ctx.display(source),
                        ctx.display(target)
                    )
                });
                (target, NullableShape::Unwrap {
                    panic_message
                })
            }
        };
        let inner = match ctx.find_or_build(inner_source.unwrap_or(source), inner_target) {
            Ok(id) => id,
            Err(failure) => return failure.into()
        };
        Built::Mapping(Mapping::Nullable(NullableMapping::new(
            source, target, inner, shape, as_ref
        )))
    }
}

/// Adds, keeps or removes a `Box` layer.
pub struct BoxBuilder;

impl MappingBuilder for BoxBuilder {
    fn name(&self) -> &'static str {
        "box"
    }

    fn build(&self, ctx: &mut MappingBuilderContext<'_, '_>) -> Built {
        let (source, target) = (ctx.source(), ctx.target());
        let model = ctx.model();
        let boxed_target = match model.kind(target) {
            TypeKind::Boxed(inner) => Some(*inner),
            _ => None
        };
        let (inner_source, inner_target, shape) = match (model.kind(source), boxed_target) {
            (TypeKind::Boxed(inner), Some(inner_target)) => {
                (*inner, inner_target, BoxShape::Rewrap)
            }
            (TypeKind::Boxed(inner), None) => (*inner, target, BoxShape::Unwrap),
            (TypeKind::Ref(referent), None) => match model.kind(*referent) {
                TypeKind::Boxed(inner) => {
                    let inner = *inner;
                    (ctx.model_mut().reference(inner), target, BoxShape::UnwrapRef)
                }
                _ => return Built::Declined
            },
            (_, Some(inner_target)) => (source, inner_target, BoxShape::Wrap),
            _ => return Built::Declined
        };
        let inner = match ctx.find_or_build(inner_source, inner_target) {
            Ok(id) => id,
            Err(failure) => return failure.into()
        };
        Built::Mapping(Mapping::Boxed(BoxMapping::new(source, target, inner, shape)))
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use crate::mapper::{descriptors::fixture::Described, parse::MapperArgs};

    #[test]
    fn optional_values_are_mapped_inside_the_option() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn widen(value: Option<i32>) -> Option<i64>;
                }
            }
        })
        .expand();
        assert!(output.contains("value . map (i64 :: from)"), "{output}");
    }

    #[test]
    fn none_into_non_optional_panics_by_default() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn require(value: Option<String>) -> String;
                }
            }
        })
        .expand();
        let expected = "Option<String> is None and cannot be mapped to String";
        assert!(output.contains(&format!("value . expect (\"{expected}\")")), "{output}");
    }

    #[test]
    fn none_into_non_optional_defaults_when_allowed() {
        let args = MapperArgs {
            throw_on_mapping_null_mismatch: false,
            ..MapperArgs::default()
        };
        let output = Described::with_args(
            quote! {
                mod mapping {
                    pub struct Mapper;

                    #[mappings]
                    impl Mapper {
                        pub fn lenient(value: Option<String>) -> String;
                    }
                }
            },
            &args
        )
        .expand();
        assert!(output.contains("value . unwrap_or_default ()"), "{output}");
    }

    #[test]
    fn boxed_values_are_rewrapped() {
        let output = Described::new(quote! {
            mod mapping {
                pub struct Leaf { pub value: i32 }
                pub struct LeafDto { pub value: i32 }
                pub struct Mapper;

                #[mappings]
                impl Mapper {
                    pub fn boxed(leaf: Box<Leaf>) -> Box<LeafDto>;
                }
            }
        })
        .expand();
        let expected = ":: std :: boxed :: Box :: new (Self :: map_to_leaf_dto (* leaf))";
        assert!(output.contains(expected), "{output}");
    }
}
