// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Dispatch over derived types.
//!
//! A derived type is the payload of a newtype variant (`Shape::Circle(Circle)`)
//! or, for value discrimination, the source type itself narrowed by a
//! discriminator member. Each arm maps one derived pair through its own
//! nested mapping; a final arm panics when nothing matched.

use proc_macro2::{Ident, TokenStream};
use quote::{ToTokens, quote};

use crate::{
    mapper::{
        descriptors::MappingId,
        emit::{
            BuildContext, Emitter,
            syntax::{Arm, Expr, Pat, Stmt}
        },
        symbols::{MemberPath, TypeId, model::normalize_tokens}
    },
    utils::names::ScopeId
};

/// Discriminator member compared against a constant pattern.
#[derive(Debug, Clone)]
pub struct Discriminator {
    pub path:   MemberPath,
    pub value:  syn::Expr,
    /// The member is a `String` and is matched through `as_str()`.
    pub as_str: bool
}

impl Discriminator {
    fn condition(&self, em: &mut Emitter<'_>, source: Expr, scope: ScopeId) -> Expr {
        let borrowed = self.path.has_nullable_hop(em.model());
        let mut read = em.member_getter(&self.path, source, borrowed, scope);
        if self.as_str && !borrowed {
            read = read.method("as_str", Vec::new());
        }
        let value = &self.value;
        Expr::verbatim(quote! { ::std::matches!(#read, #value) })
    }

    /// Key used to detect duplicate entries.
    #[must_use]
    pub fn value_key(value: &syn::Expr) -> String {
        normalize_tokens(&value.to_token_stream())
    }
}

/// One arm of a derived type switch.
#[derive(Debug, Clone)]
pub struct DerivedTypeMapping {
    /// Type handed to the nested mapping.
    pub source:          TypeId,
    pub target:          TypeId,
    /// The source type was configured rather than inferred from the value.
    pub explicit_source: bool,
    /// Variant of the source enum carrying `source`.
    pub source_variant:  Option<Ident>,
    /// Variant of the target enum wrapping `target`.
    pub target_variant:  Option<Ident>,
    pub discriminator:   Option<Discriminator>,
    pub mapping:         MappingId
}

fn source_pattern(path: &TokenStream, arm: &DerivedTypeMapping, binding: &str) -> Pat {
    match &arm.source_variant {
        Some(variant) => Pat::TupleStruct {
            path:  quote! { #path::#variant },
            elems: vec![Pat::ident(binding)]
        },
        None => Pat::ident(binding)
    }
}

fn no_match_message(em: &Emitter<'_>, source: TypeId, target: TypeId) -> String {
    format!(
        "Cannot map {} to {} as there is no known derived type mapping",
        em.display(source),
        em.display(target)
    )
}

/// New instance switch.
#[derive(Debug, Clone)]
pub struct DerivedTypeSwitchMapping {
    source: TypeId,
    target: TypeId,
    arms:   Vec<DerivedTypeMapping>
}

impl DerivedTypeSwitchMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, arms: Vec<DerivedTypeMapping>) -> Self {
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
    pub fn arms(&self) -> &[DerivedTypeMapping] {
        &self.arms
    }

    fn wrap(&self, em: &Emitter<'_>, arm: &DerivedTypeMapping, value: Expr) -> Expr {
        match &arm.target_variant {
            Some(variant) => {
                let target = em.declared_path(self.target);
                Expr::call(quote! { #target::#variant }, vec![value])
            }
            None => value
        }
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let panic = Expr::Panic(no_match_message(em, self.source, self.target));
        let by_value = self
            .arms
            .iter()
            .all(|arm| arm.source_variant.is_none() && arm.discriminator.is_some());
        if by_value && ctx.source.is_place() {
            let branches = self
                .arms
                .iter()
                .filter_map(|arm| {
                    let discriminator = arm.discriminator.as_ref()?;
                    let condition = discriminator.condition(em, ctx.source.clone(), ctx.scope);
                    let value = em.build(arm.mapping, ctx.clone());
                    Some((condition, self.wrap(em, arm, value)))
                })
                .collect();
            return Expr::if_chain(branches, panic);
        }

        let source_path = em.declared_path(self.source);
        let mut arms: Vec<Arm> = self
            .arms
            .iter()
            .map(|arm| {
                let scope = em.new_scope(ctx.scope);
                let hint = em.type_hint(arm.source);
                let binding = em.new_name(scope, &hint);
                let pattern = source_pattern(&source_path, arm, &binding);
                let inner = BuildContext::new(Expr::ident(&binding), scope);
                let value = em.build(arm.mapping, inner);
                let body = self.wrap(em, arm, value);
                let mut built = Arm::new(pattern, body);
                if let Some(discriminator) = &arm.discriminator {
                    let guard = discriminator.condition(em, Expr::ident(&binding), scope);
                    built = built.with_guard(guard);
                }
                built
            })
            .collect();
        arms.push(Arm::new(Pat::Wild, panic).unreachable_allowed());
        Expr::matches(ctx.source, arms)
    }
}

/// Existing target switch; arms match the source and target together.
#[derive(Debug, Clone)]
pub struct DerivedExistingTargetTypeSwitchMapping {
    source: TypeId,
    target: TypeId,
    arms:   Vec<DerivedTypeMapping>
}

impl DerivedExistingTargetTypeSwitchMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, arms: Vec<DerivedTypeMapping>) -> Self {
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
    pub fn arms(&self) -> &[DerivedTypeMapping] {
        &self.arms
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext, target: Expr) -> Vec<Stmt> {
        let source_path = em.declared_path(self.source);
        let target_path = em.declared_path(self.target);
        let mut arms: Vec<Arm> = self
            .arms
            .iter()
            .map(|arm| {
                let scope = em.new_scope(ctx.scope);
                let source_hint = em.type_hint(arm.source);
                let source_binding = em.new_name(scope, &source_hint);
                let target_binding = em.new_name(scope, "target");
                let target_pattern = match &arm.target_variant {
                    Some(variant) => Pat::TupleStruct {
                        path:  quote! { #target_path::#variant },
                        elems: vec![Pat::ident(&target_binding)]
                    },
                    None => Pat::ident(&target_binding)
                };
                let pattern = Pat::Tuple(vec![
                    source_pattern(&source_path, arm, &source_binding),
                    target_pattern
                ]);
                let body = em.build_existing(
                    arm.mapping,
                    BuildContext::new(Expr::ident(&source_binding), scope),
                    Expr::ident(&target_binding).deref()
                );
                let mut built = Arm::new(pattern, Expr::Block(body));
                if let Some(discriminator) = &arm.discriminator {
                    let guard = discriminator.condition(em, Expr::ident(&source_binding), scope);
                    built = built.with_guard(guard);
                }
                built
            })
            .collect();
        arms.push(
            Arm::new(Pat::Wild, Expr::Panic(no_match_message(em, self.source, self.target)))
                .unreachable_allowed()
        );
        let scrutinee = Expr::Tuple(vec![ctx.source, Expr::RefMut(Box::new(target))]);
        vec![Stmt::Expr(Expr::matches(scrutinee, arms))]
    }
}
