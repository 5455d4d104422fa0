// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mappings that add, keep or remove an `Option` layer around an inner
//! mapping.

use quote::quote;

use crate::mapper::{
    descriptors::MappingId,
    emit::{
        BuildContext, Emitter,
        syntax::{Expr, Pat, Stmt}
    },
    symbols::TypeId
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NullableShape {
    /// `Option<A> -> Option<B>`
    Map,
    /// `A -> Option<B>`
    Wrap,
    /// `Option<A> -> B`; panics with the message or falls back to
    /// `Default::default()`.
    Unwrap { panic_message: Option<String> }
}

#[derive(Debug, Clone)]
pub struct NullableMapping {
    source: TypeId,
    target: TypeId,
    inner:  MappingId,
    shape:  NullableShape,
    /// Source is `&Option<A>` and is viewed as `Option<&A>`.
    as_ref: bool
}

impl NullableMapping {
    #[must_use]
    pub fn new(
        source: TypeId,
        target: TypeId,
        inner: MappingId,
        shape: NullableShape,
        as_ref: bool
    ) -> Self {
        Self {
            source,
            target,
            inner,
            shape,
            as_ref
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
    pub fn inner(&self) -> MappingId {
        self.inner
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext) -> Expr {
        let source = if self.as_ref {
            ctx.source.clone().method("as_ref", Vec::new())
        } else {
            ctx.source.clone()
        };
        match &self.shape {
            NullableShape::Wrap => em.build(self.inner, ctx.with_source(source)).some(),
            NullableShape::Map => em.map_option(source, self.inner, ctx.scope),
            NullableShape::Unwrap {
                panic_message: Some(message)
            } => {
                let message = Expr::verbatim(quote! { #message });
                let unwrapped = source.method("expect", vec![message]);
                em.build(self.inner, ctx.with_source(unwrapped))
            }
            NullableShape::Unwrap {
                panic_message: None
            } => em
                .map_option(source, self.inner, ctx.scope)
                .method("unwrap_or_default", Vec::new())
        }
    }
}

/// `Option<A>` into an existing `B`: the update only runs for `Some`.
#[derive(Debug, Clone)]
pub struct ExistingNullableMapping {
    source: TypeId,
    target: TypeId,
    inner:  MappingId,
    as_ref: bool
}

impl ExistingNullableMapping {
    #[must_use]
    pub fn new(source: TypeId, target: TypeId, inner: MappingId, as_ref: bool) -> Self {
        Self {
            source,
            target,
            inner,
            as_ref
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
    pub fn inner(&self) -> MappingId {
        self.inner
    }

    pub fn build(&self, em: &mut Emitter<'_>, ctx: BuildContext, target: Expr) -> Vec<Stmt> {
        let source = if self.as_ref {
            ctx.source.clone().method("as_ref", Vec::new())
        } else {
            ctx.source.clone()
        };
        let scope = em.new_scope(ctx.scope);
        let hint = ctx.source.name_hint();
        let binding = em.new_name(scope, hint.as_deref().unwrap_or("value"));
        let inner_ctx = BuildContext::new(Expr::ident(&binding), scope);
        let then = em.build_existing(self.inner, inner_ctx, target);
        vec![Stmt::IfLet {
            bindings: vec![(Pat::some(Pat::ident(&binding)), source)],
            chained: false,
            then
        }]
    }
}
