// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Enum to enum, enum to string and string to enum mappings.
//!
//! All three build a single `match`. Variant payloads are matched field by
//! field and every field is converted through its own nested mapping.

use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, quote};

use crate::mapper::{
    descriptors::MappingId,
    emit::{
        BuildContext, Emitter,
        syntax::{Arm, Expr, Pat}
    },
    symbols::{FieldStyle, TypeId}
};

/// One payload field converted from a source variant field.
#[derive(Debug, Clone)]
pub struct PayloadField {
    pub source:  syn::Member,
    pub target:  syn::Member,
    pub mapping: MappingId
}

#[derive(Debug, Clone)]
pub enum EnumArm {
    /// `S::A(..) => T::B(..)`
    Variant {
        source:       Ident,
        source_style: FieldStyle,
        target:       Ident,
        target_style: FieldStyle,
        fields:       Vec<PayloadField>
    },
    /// `S::A { .. } => fallback`
    Fallback {
        source:       Ident,
        source_style: FieldStyle,
        value:        syn::Expr
    }
}

/// Pattern matching any payload of the variant.
fn any_payload(path: TokenStream, style: FieldStyle) -> Pat {
    match style {
        FieldStyle::Unit => Pat::Verbatim(path),
        FieldStyle::Unnamed => Pat::TupleStruct {
            path,
            elems: vec![Pat::Verbatim(quote! { .. })]
        },
        FieldStyle::Named => Pat::Struct {
            path,
            fields: Vec::new(),
            rest: true
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnumMapping {
    source: TypeId,
    target: TypeId,
    arms:   Vec<EnumArm>
}

impl EnumMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, arms: Vec<EnumArm>) -> Self {
        Self {
            source,
            target,
            arms
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    #[must_use]
    pub fn arms(&self) -> &[EnumArm] {
        &self.arms
    }

    /// Nested payload mappings.
    pub fn dependencies(&self) -> impl Iterator<Item = MappingId> + '_ {
        self.arms.iter().flat_map(|arm| match arm {
            EnumArm::Variant {
                fields, ..
            } => fields.iter().map(|f| f.mapping).collect::<Vec<_>>(),
            EnumArm::Fallback { .. } => Vec::new()
        })
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let source_ty = em.declared_path(self.source);
        let target_ty = em.declared_path(self.target);
        let arms = self
            .arms
            .iter()
            .map(|arm| match arm {
                EnumArm::Variant {
                    source,
                    source_style,
                    target,
                    target_style,
                    fields
                } => {
                    let scope = em.new_scope(ctx.scope);
                    let mut bound = Vec::with_capacity(fields.len());
                    let mut built = Vec::with_capacity(fields.len());
                    for field in fields {
                        let hint = field.source.to_token_stream().to_string();
                        let name = em.new_name(scope, &hint);
                        let inner = BuildContext::new(Expr::ident(&name), scope);
                        let value = em.build(field.mapping, inner);
                        bound.push((field.source.clone(), Pat::ident(&name)));
                        built.push((field.target.clone(), value));
                    }
                    let pattern =
                        variant_pattern(quote! { #source_ty::#source }, *source_style, bound);
                    let body =
                        variant_value(quote! { #target_ty::#target }, *target_style, built);
                    Arm::new(pattern, body)
                }
                EnumArm::Fallback {
                    source,
                    source_style,
                    value
                } => Arm::new(
                    any_payload(quote! { #source_ty::#source }, *source_style),
                    Expr::verbatim(value.to_token_stream())
                )
            })
            .collect();
        Expr::matches(ctx.source, arms)
    }
}

fn variant_pattern(path: TokenStream, style: FieldStyle, bound: Vec<(syn::Member, Pat)>) -> Pat {
    match style {
        FieldStyle::Unit => Pat::Verbatim(path),
        FieldStyle::Unnamed => {
            let arity = bound
                .iter()
                .filter_map(|(member, _)| match member {
                    syn::Member::Unnamed(index) => Some(index.index as usize + 1),
                    syn::Member::Named(_) => None
                })
                .max()
                .unwrap_or(0);
            let mut elems = vec![Pat::Wild; arity];
            for (member, pat) in bound {
                if let syn::Member::Unnamed(index) = member {
                    elems[index.index as usize] = pat;
                }
            }
            elems.push(Pat::Verbatim(quote! { .. }));
            Pat::TupleStruct {
                path,
                elems
            }
        }
        FieldStyle::Named => Pat::Struct {
            path,
            fields: bound,
            rest: true
        }
    }
}

fn variant_value(
    path: TokenStream,
    style: FieldStyle,
    mut built: Vec<(syn::Member, Expr)>
) -> Expr {
    match style {
        FieldStyle::Unit => Expr::verbatim(path),
        FieldStyle::Unnamed => {
            built.sort_by_key(|(member, _)| match member {
                syn::Member::Unnamed(index) => index.index,
                syn::Member::Named(_) => u32::MAX
            });
            Expr::call(path, built.into_iter().map(|(_, value)| value).collect())
        }
        FieldStyle::Named => Expr::Struct {
            path,
            fields: built
        }
    }
}

/// `S::A => String::from("A")`.
#[derive(Debug, Clone)]
pub struct EnumToStringMapping {
    source:   TypeId,
    target:   TypeId,
    variants: Vec<(Ident, FieldStyle)>
}

impl EnumToStringMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, variants: Vec<(Ident, FieldStyle)>) -> Self {
        Self {
            source,
            target,
            variants
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let source_ty = em.declared_path(self.source);
        let arms = self
            .variants
            .iter()
            .map(|(variant, style)| {
                let name = variant.to_string();
                Arm::new(
                    any_payload(quote! { #source_ty::#variant }, *style),
                    Expr::call(quote! { ::std::string::String::from }, vec![Expr::verbatim(
                        quote! { #name }
                    )])
                )
            })
            .collect();
        Expr::matches(ctx.source, arms)
    }
}

/// `match source.as_str() { "A" => T::A, .. }`.
#[derive(Debug, Clone)]
pub struct StringToEnumMapping {
    source:      TypeId,
    target:      TypeId,
    variants:    Vec<Ident>,
    ignore_case: bool,
    fallback:    Option<syn::Expr>
}

impl StringToEnumMapping {
    #[must_use]
    pub fn new(
        source: TypeId,
        target: TypeId,
        variants: Vec<Ident>,
        ignore_case: bool,
        fallback: Option<syn::Expr>
    ) -> Self {
        Self {
            source,
            target,
            variants,
            ignore_case,
            fallback
        }
    }

    #[must_use]
    pub fn source(&self) -> TypeId {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> TypeId {
        self.target
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let target_ty = em.declared_path(self.target);
        let scope = em.new_scope(ctx.scope);
        let binding = em.new_name(scope, "value");
        let mut arms: Vec<Arm> = self
            .variants
            .iter()
            .map(|variant| {
                let name = variant.to_string();
                let body = Expr::verbatim(quote! { #target_ty::#variant });
                if self.ignore_case {
                    let guard = Expr::ident(&binding)
                        .method("eq_ignore_ascii_case", vec![Expr::verbatim(quote! { #name })]);
                    Arm::new(Pat::ident(&binding), body).with_guard(guard)
                } else {
                    Arm::new(Pat::Verbatim(quote! { #name }), body)
                }
            })
            .collect();
        let otherwise = match &self.fallback {
            Some(fallback) => Expr::verbatim(fallback.to_token_stream()),
            None => Expr::Panic(format!(
                "string value has no matching {} variant",
                em.display(self.target)
            ))
        };
        arms.push(Arm::new(Pat::Wild, otherwise));
        Expr::matches(ctx.source.method("as_str", Vec::new()), arms)
    }
}
